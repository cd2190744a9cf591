// Code Resolver - turns one lexical candidate into a composed job title
// All lookups are ordered linear scans over the reference tables; first match
// wins, so source row order is part of the contract

use crate::dataset::{Category, ReferenceDataset};
use crate::matcher::Candidate;

/// The wildcard character standing in for the skill slot in base codes.
pub const WILDCARD: char = 'X';

/// Tier words indexed by skill digit minus one. The blank slots sit between
/// named tiers and never produce a word; neither do digit 0 or the wildcard.
pub const SKILL_LEVELS: [&str; 9] = [
    "Helper",
    "",
    "Apprentice",
    "",
    "Journeyman",
    "",
    "Craftsman",
    "",
    "Superintendent",
];

/// A successfully resolved candidate: the matched text and the full
/// human-readable title composed from base, prefix, skill tier, and shred.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCode {
    pub whole_text: String,
    pub title: String,
}

/// Resolve one candidate against the dataset. `None` means the candidate is
/// lexically code-shaped but not a real code; that is a normal outcome, not
/// an error.
pub fn resolve(candidate: &Candidate, dataset: &ReferenceDataset) -> Option<ResolvedCode> {
    let tables = dataset.tables(candidate.category);
    let normalized = normalized_base_code(candidate);

    let base = tables
        .base
        .iter()
        .find(|entry| entry.code.contains(&normalized))?;

    let mut title = String::new();

    if let Some(prefix) = &candidate.prefix {
        if let Some(entry) = tables.prefixes.iter().find(|p| &p.symbol == prefix) {
            title.push_str(&entry.title);
            title.push(' ');
        }
    }

    title.push_str(&base.title);

    if candidate.category == Category::Enlisted {
        if let Some(word) = candidate.skill.and_then(skill_level_word) {
            title.push(' ');
            title.push_str(word);
        }
    }

    if let Some(suffix) = &candidate.suffix {
        if let Some(entry) = tables
            .shreds
            .iter()
            .find(|s| s.base_code == normalized && &s.symbol == suffix)
        {
            title.push_str(", ");
            title.push_str(&entry.title);
        }
    }

    Some(ResolvedCode {
        whole_text: candidate.whole_text.clone(),
        title,
    })
}

/// The normalized base code used as the table key. The literal skill digit is
/// never a key, only an index into the tier table.
pub fn normalized_base_code(candidate: &Candidate) -> String {
    match candidate.category {
        // Skill slot is always the fourth character of the enlisted core
        Category::Enlisted => format!(
            "{}{}{}",
            &candidate.core[..3],
            WILDCARD,
            &candidate.core[4..]
        ),
        // Officer cores carry the wildcard only when the author wrote it
        Category::Officer => match candidate.skill {
            Some(_) => candidate.core.clone(),
            None => format!("{}{}", candidate.core, WILDCARD),
        },
    }
}

/// Tier word for a literal skill character, if that character names one.
fn skill_level_word(skill: char) -> Option<&'static str> {
    if skill == WILDCARD {
        return None;
    }
    let digit = skill.to_digit(10)? as usize;
    if digit == 0 {
        return None;
    }
    let word = SKILL_LEVELS[digit - 1];
    if word.is_empty() {
        None
    } else {
        Some(word)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{BaseCodeEntry, CategoryTables, PrefixEntry, ShredEntry};
    use crate::matcher::extract;

    fn test_dataset() -> ReferenceDataset {
        ReferenceDataset {
            enlisted: CategoryTables {
                base: vec![
                    BaseCodeEntry {
                        code: "3D0X2".to_string(),
                        title: "Cyber Systems Operations".to_string(),
                    },
                    BaseCodeEntry {
                        code: "1N4X1".to_string(),
                        title: "Fusion Analyst".to_string(),
                    },
                ],
                prefixes: vec![PrefixEntry {
                    symbol: "A".to_string(),
                    title: "Air National Guard".to_string(),
                }],
                shreds: vec![ShredEntry {
                    base_code: "3D0X2".to_string(),
                    symbol: "B".to_string(),
                    title: "Systems Administration".to_string(),
                }],
            },
            officer: CategoryTables {
                base: vec![BaseCodeEntry {
                    code: "62EX".to_string(),
                    title: "Developmental Engineer".to_string(),
                }],
                prefixes: vec![PrefixEntry {
                    symbol: "Q".to_string(),
                    title: "Standardization/Evaluation".to_string(),
                }],
                shreds: vec![ShredEntry {
                    base_code: "62EX".to_string(),
                    symbol: "B".to_string(),
                    title: "Bioenvironmental".to_string(),
                }],
            },
        }
    }

    fn only_candidate(text: &str, category: Category) -> Candidate {
        let mut found = extract(text, category);
        assert_eq!(found.len(), 1, "expected one candidate in {text:?}");
        found.remove(0)
    }

    #[test]
    fn test_enlisted_base_with_skill_word() {
        let dataset = test_dataset();
        let resolved = resolve(&only_candidate("3D052", Category::Enlisted), &dataset).unwrap();
        assert_eq!(resolved.whole_text, "3D052");
        assert_eq!(resolved.title, "Cyber Systems Operations Journeyman");
    }

    #[test]
    fn test_enlisted_skill_tiers() {
        let dataset = test_dataset();
        let cases = [
            ("3D012", "Cyber Systems Operations Helper"),
            ("3D032", "Cyber Systems Operations Apprentice"),
            ("3D052", "Cyber Systems Operations Journeyman"),
            ("3D072", "Cyber Systems Operations Craftsman"),
            ("3D092", "Cyber Systems Operations Superintendent"),
        ];
        for (code, expected) in cases {
            let resolved = resolve(&only_candidate(code, Category::Enlisted), &dataset).unwrap();
            assert_eq!(resolved.title, expected, "for {code}");
        }
    }

    #[test]
    fn test_enlisted_wildcard_and_zero_have_no_tier_word() {
        let dataset = test_dataset();
        let resolved = resolve(&only_candidate("3D0X2", Category::Enlisted), &dataset).unwrap();
        assert_eq!(resolved.title, "Cyber Systems Operations");

        let resolved = resolve(&only_candidate("3D002", Category::Enlisted), &dataset).unwrap();
        assert_eq!(resolved.title, "Cyber Systems Operations");
    }

    #[test]
    fn test_enlisted_prefix_expansion() {
        let dataset = test_dataset();
        let resolved = resolve(&only_candidate("A3D032", Category::Enlisted), &dataset).unwrap();
        assert_eq!(resolved.whole_text, "A3D032");
        assert_eq!(
            resolved.title,
            "Air National Guard Cyber Systems Operations Apprentice"
        );
    }

    #[test]
    fn test_enlisted_unknown_prefix_is_ignored() {
        let dataset = test_dataset();
        let resolved = resolve(&only_candidate("Z3D052", Category::Enlisted), &dataset).unwrap();
        assert_eq!(resolved.title, "Cyber Systems Operations Journeyman");
    }

    #[test]
    fn test_enlisted_shred_scoped_to_base_code() {
        let dataset = test_dataset();
        let resolved = resolve(&only_candidate("3D052B", Category::Enlisted), &dataset).unwrap();
        assert_eq!(
            resolved.title,
            "Cyber Systems Operations Journeyman, Systems Administration"
        );

        // Same suffix letter on a base code with no such shred row
        let resolved = resolve(&only_candidate("1N451B", Category::Enlisted), &dataset).unwrap();
        assert_eq!(resolved.title, "Fusion Analyst Journeyman");
    }

    #[test]
    fn test_officer_with_shred() {
        let dataset = test_dataset();
        let resolved = resolve(&only_candidate("62EXB", Category::Officer), &dataset).unwrap();
        assert_eq!(resolved.whole_text, "62EXB");
        assert_eq!(resolved.title, "Developmental Engineer, Bioenvironmental");
    }

    #[test]
    fn test_officer_normalization_appends_wildcard() {
        let dataset = test_dataset();
        let candidate = only_candidate("62E", Category::Officer);
        assert_eq!(normalized_base_code(&candidate), "62EX");

        let resolved = resolve(&candidate, &dataset).unwrap();
        assert_eq!(resolved.title, "Developmental Engineer");
    }

    #[test]
    fn test_officer_never_gets_skill_word() {
        let dataset = test_dataset();
        // Officer grammar has no tier digit; the composed title is base only
        let resolved = resolve(&only_candidate("Q62EX", Category::Officer), &dataset).unwrap();
        assert_eq!(
            resolved.title,
            "Standardization/Evaluation Developmental Engineer"
        );
    }

    #[test]
    fn test_unknown_code_resolves_to_none() {
        let dataset = test_dataset();
        assert!(resolve(&only_candidate("9Z992", Category::Enlisted), &dataset).is_none());
        assert!(resolve(&only_candidate("99ZX", Category::Officer), &dataset).is_none());
    }

    #[test]
    fn test_base_lookup_is_first_match_in_row_order() {
        let mut dataset = test_dataset();
        // Second row also contains the normalized code as a substring
        dataset.enlisted.base.push(BaseCodeEntry {
            code: "3D0X2/3D0X3".to_string(),
            title: "Combined Legacy Row".to_string(),
        });

        let resolved = resolve(&only_candidate("3D052", Category::Enlisted), &dataset).unwrap();
        assert_eq!(resolved.title, "Cyber Systems Operations Journeyman");
    }

    #[test]
    fn test_normalized_enlisted_code_wildcards_skill_slot() {
        let candidate = only_candidate("3D052", Category::Enlisted);
        assert_eq!(normalized_base_code(&candidate), "3D0X2");
    }
}
