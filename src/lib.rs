// AFSC Annotator - Core Library
// Recognizes military job-specialty codes in text items, resolves them
// against the reference tables, and replies at most once per item

pub mod annotation;
pub mod config;
pub mod dataset;
pub mod ledger;
pub mod lock;
pub mod matcher;
pub mod resolver;
pub mod runner;
pub mod stream;

// Re-export commonly used types
pub use annotation::{build_annotation, Annotation, REPLY_HEADER};
pub use config::BotConfig;
pub use dataset::{
    BaseCodeEntry, Category, CategoryTables, LoadError, PrefixEntry, ReferenceDataset, ShredEntry,
};
pub use ledger::{MarkOutcome, ProcessedLedger};
pub use lock::PidLock;
pub use matcher::{extract, Candidate, ENLISTED_CODE_PATTERN, OFFICER_CODE_PATTERN};
pub use resolver::{normalized_base_code, resolve, ResolvedCode, SKILL_LEVELS};
pub use runner::{AnnotatorLoop, LoopSummary};
pub use stream::{ItemStream, JsonlStream, MemoryStream, StreamError, StreamItem};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
