use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use super::VerseRef;

/// Verses of one chapter, keyed by verse number.
///
/// Every stored text is non-empty; verses that clean up to nothing are never
/// inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chapter {
    verses: BTreeMap<u32, String>,
}

impl Chapter {
    pub fn get(&self, verse: u32) -> Option<&str> {
        self.verses.get(&verse).map(String::as_str)
    }

    /// Verses in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.verses.iter().map(|(n, text)| (*n, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    /// Last write wins for a repeated verse number.
    pub(crate) fn insert(&mut self, verse: u32, text: String) {
        debug_assert!(!text.is_empty());
        self.verses.insert(verse, text);
    }
}

impl Serialize for Chapter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.verses.serialize(serializer)
    }
}

/// A whole book parsed from one USFM text: chapter → verse → plain text.
///
/// Built in a single parse call and read-only afterwards. A new upload
/// produces a new `ParsedBook` rather than mutating an old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBook {
    book_id: Option<String>,
    chapters: BTreeMap<u32, Chapter>,
}

impl ParsedBook {
    /// Book code from the `\id` line, e.g. `PHM`.
    pub fn book_id(&self) -> Option<&str> {
        self.book_id.as_deref()
    }

    pub fn chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.get(&number)
    }

    pub fn verse(&self, chapter: u32, verse: u32) -> Option<&str> {
        self.chapter(chapter)?.get(verse)
    }

    /// Look up a reference. A reference naming a different book never matches.
    pub fn lookup(&self, reference: &VerseRef) -> Option<&str> {
        if let (Some(wanted), Some(ours)) = (reference.book.as_deref(), self.book_id())
            && !wanted.eq_ignore_ascii_case(ours)
        {
            return None;
        }
        self.verse(reference.chapter, reference.verse)
    }

    /// Chapters in ascending order, including chapters without any verses.
    pub fn chapters(&self) -> impl Iterator<Item = (u32, &Chapter)> {
        self.chapters.iter().map(|(n, chapter)| (*n, chapter))
    }

    /// Every verse of the book in chapter/verse order.
    pub fn verses(&self) -> impl Iterator<Item = (VerseRef, &str)> {
        self.chapters.iter().flat_map(move |(chapter, verses)| {
            verses.iter().map(move |(verse, text)| {
                (
                    VerseRef {
                        book: self.book_id.clone(),
                        chapter: *chapter,
                        verse,
                    },
                    text,
                )
            })
        })
    }

    /// Number of chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn verse_count(&self) -> usize {
        self.chapters.values().map(Chapter::len).sum()
    }

    pub(crate) fn set_book_id(&mut self, book_id: Option<String>) {
        self.book_id = book_id;
    }

    /// A repeated chapter number replaces the earlier chapter wholesale.
    pub(crate) fn insert_chapter(&mut self, number: u32, chapter: Chapter) {
        self.chapters.insert(number, chapter);
    }
}

/// Serializes as the bare chapter → verse → text mapping.
impl Serialize for ParsedBook {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.chapters.serialize(serializer)
    }
}
