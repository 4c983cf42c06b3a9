pub mod book;
pub mod verse_ref;

pub use book::{Chapter, ParsedBook};
pub use verse_ref::{VerseRef, VerseRefError};
