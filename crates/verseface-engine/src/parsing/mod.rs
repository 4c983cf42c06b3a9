pub mod csv;
pub mod usfm;

pub use csv::{ParsedRows, parse as parse_csv};
pub use usfm::{clean_verse_text, parse as parse_usfm};
