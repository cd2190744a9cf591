// Annotation Builder - one reply body per text item
// Enlisted candidates are processed before officer candidates, and a code
// mentioned twice in one item is annotated once

use crate::dataset::{Category, ReferenceDataset};
use crate::matcher::extract;
use crate::resolver::resolve;
use std::collections::HashSet;

/// Fixed header line prepended to every reply by the stream loop.
pub const REPLY_HEADER: &str =
    "You've mentioned an AFSC, here's the associated job title:\n\n";

/// The built reply body for one item, plus the distinct codes it annotates
/// (in emission order, for logging).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub body: String,
    pub codes: Vec<String>,
}

impl Annotation {
    /// An empty annotation means "do not reply".
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Build the annotation for one item body: all enlisted matches in scan
/// order, then all officer matches in scan order, one
/// `"<code> = <title>"` block per first occurrence. A repeated whole-match
/// text is skipped before any resolution work; a candidate with no base-code
/// entry contributes nothing.
pub fn build_annotation(body: &str, dataset: &ReferenceDataset) -> Annotation {
    let mut emitted: HashSet<String> = HashSet::new();
    let mut annotation = Annotation::default();

    for category in [Category::Enlisted, Category::Officer] {
        for candidate in extract(body, category) {
            if emitted.contains(&candidate.whole_text) {
                continue;
            }

            if let Some(resolved) = resolve(&candidate, dataset) {
                emitted.insert(resolved.whole_text.clone());
                annotation.body.push_str(&resolved.whole_text);
                annotation.body.push_str(" = ");
                annotation.body.push_str(&resolved.title);
                annotation.body.push_str("\n\n");
                annotation.codes.push(resolved.whole_text);
            }
        }
    }

    annotation
}

// ============================================================================
// TESTS
// ============================================================================
