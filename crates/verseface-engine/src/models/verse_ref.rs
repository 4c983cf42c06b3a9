use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VerseRefError {
    #[error("Invalid verse reference: {0:?}")]
    Invalid(String),
    #[error("Chapter or verse number out of range in {0:?}")]
    OutOfRange(String),
}

/// A `BOOK chapter:verse` reference such as `PHM 1:7`.
///
/// The book code is optional; `1:7` refers to whichever book is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VerseRef {
    pub book: Option<String>,
    pub chapter: u32,
    pub verse: u32,
}

impl VerseRef {
    pub fn new(chapter: u32, verse: u32) -> Self {
        Self {
            book: None,
            chapter,
            verse,
        }
    }

    pub fn in_book(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book: Some(book.into()),
            chapter,
            verse,
        }
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.book {
            Some(book) => write!(f, "{book} {}:{}", self.chapter, self.verse),
            None => write!(f, "{}:{}", self.chapter, self.verse),
        }
    }
}

impl FromStr for VerseRef {
    type Err = VerseRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        static REF_REGEX: OnceLock<Regex> = OnceLock::new();
        let ref_regex = REF_REGEX.get_or_init(|| {
            Regex::new(r"^\s*(?:([0-9A-Za-z]{3})\s+)?([0-9]+):([0-9]+)\s*$")
                .expect("Invalid verse reference regex")
        });

        let captures = ref_regex
            .captures(s)
            .ok_or_else(|| VerseRefError::Invalid(s.to_string()))?;
        let number = |index: usize| {
            captures[index]
                .parse::<u32>()
                .map_err(|_| VerseRefError::OutOfRange(s.to_string()))
        };

        Ok(Self {
            book: captures.get(1).map(|m| m.as_str().to_ascii_uppercase()),
            chapter: number(2)?,
            verse: number(3)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("PHM 1:7", Some("PHM"), 1, 7)]
    #[case("phm 1:7", Some("PHM"), 1, 7)]
    #[case("1CO 13:4", Some("1CO"), 13, 4)]
    #[case("  2:10 ", None, 2, 10)]
    fn parses_references(
        #[case] input: &str,
        #[case] book: Option<&str>,
        #[case] chapter: u32,
        #[case] verse: u32,
    ) {
        let parsed: VerseRef = input.parse().unwrap();
        assert_eq!(parsed.book.as_deref(), book);
        assert_eq!(parsed.chapter, chapter);
        assert_eq!(parsed.verse, verse);
    }

    #[rstest]
    #[case("")]
    #[case("PHM")]
    #[case("PHM 1")]
    #[case("Philemon 1:7")]
    #[case("1:x")]
    fn rejects_malformed_references(#[case] input: &str) {
        assert_eq!(
            input.parse::<VerseRef>(),
            Err(VerseRefError::Invalid(input.to_string()))
        );
    }

    #[test]
    fn rejects_numbers_that_overflow() {
        let input = "1:99999999999";
        assert_eq!(
            input.parse::<VerseRef>(),
            Err(VerseRefError::OutOfRange(input.to_string()))
        );
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(VerseRef::in_book("PHM", 1, 25).to_string(), "PHM 1:25");
        assert_eq!(VerseRef::new(3, 4).to_string(), "3:4");
    }
}
