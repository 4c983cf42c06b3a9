//! Per-verse analysis records loaded next to a book.
//!
//! Analyses come from a CSV table (see [`table`]) or a per-chapter JSON
//! document (see [`json`]). Both end up as [`VerseAnalysis`] records in an
//! [`AnalysisSet`], which [`annotate`] joins against a [`ParsedBook`].

pub mod json;
pub mod table;

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{ParsedBook, VerseRef};

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis file is empty")]
    Empty,
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Invalid analysis JSON: {0}")]
    InvalidJson(String),
    #[error("Could not decode JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Analysis values for one verse, in source column/key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseAnalysis {
    pub chapter: u32,
    pub verse: u32,
    pub fields: Vec<(String, String)>,
}

impl VerseAnalysis {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// First field whose name contains `face`.
    pub fn face(&self) -> Option<&str> {
        self.field_containing("face")
    }

    /// First field whose name contains `analysis`.
    pub fn analysis(&self) -> Option<&str> {
        self.field_containing("analysis")
    }

    fn field_containing(&self, needle: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.to_lowercase().contains(needle))
            .map(|(_, value)| value.as_str())
    }
}

/// Analyses keyed by (chapter, verse). A later record for the same verse
/// replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisSet {
    records: BTreeMap<(u32, u32), VerseAnalysis>,
}

impl AnalysisSet {
    pub fn get(&self, chapter: u32, verse: u32) -> Option<&VerseAnalysis> {
        self.records.get(&(chapter, verse))
    }

    pub fn insert(&mut self, record: VerseAnalysis) {
        self.records.insert((record.chapter, record.verse), record);
    }

    /// Merge another set in, e.g. the next chapter's JSON file.
    pub fn extend(&mut self, other: AnalysisSet) {
        self.records.extend(other.records);
    }

    pub fn iter(&self) -> impl Iterator<Item = &VerseAnalysis> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records that point at verses the book does not contain.
    pub fn unmatched<'a>(&'a self, book: &ParsedBook) -> Vec<&'a VerseAnalysis> {
        self.records
            .values()
            .filter(|record| book.verse(record.chapter, record.verse).is_none())
            .collect()
    }
}

/// A book verse with its analysis, if one was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedVerse<'a> {
    pub reference: VerseRef,
    pub text: &'a str,
    pub analysis: Option<&'a VerseAnalysis>,
}

/// Join every verse of `book`, in order, with its analysis record.
pub fn annotate<'a>(book: &'a ParsedBook, analyses: &'a AnalysisSet) -> Vec<AnnotatedVerse<'a>> {
    book.verses()
        .map(|(reference, text)| {
            let analysis = analyses.get(reference.chapter, reference.verse);
            AnnotatedVerse {
                reference,
                text,
                analysis,
            }
        })
        .collect()
}
