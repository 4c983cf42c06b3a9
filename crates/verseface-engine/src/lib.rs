pub mod analysis;
pub mod io;
pub mod models;
pub mod parsing;

// Re-export key types for easier usage
pub use analysis::{AnalysisError, AnalysisSet, AnnotatedVerse, VerseAnalysis, annotate};
pub use io::IoError;
pub use models::{Chapter, ParsedBook, VerseRef, VerseRefError};
pub use parsing::{ParsedRows, clean_verse_text, parse_csv, parse_usfm};
