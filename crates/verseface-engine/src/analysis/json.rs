//! Analysis records from a per-chapter JSON document:
//!
//! ```json
//! { "chapter": 1, "analysis": [ { "verse": 1, "face": "...", ... } ] }
//! ```

use serde_json::{Map, Value};

use super::{AnalysisError, AnalysisSet, VerseAnalysis};

impl AnalysisSet {
    /// Decode and shape-check a JSON analysis document.
    ///
    /// The document must be an object with a numeric `chapter` and an array
    /// `analysis`. Entries without a numeric `verse` are skipped with a
    /// warning; every other key becomes a field.
    pub fn from_json_str(text: &str) -> Result<Self, AnalysisError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }

    pub fn from_json_value(value: &Value) -> Result<Self, AnalysisError> {
        let document = value
            .as_object()
            .ok_or_else(|| invalid("expected a JSON object at the top level"))?;
        let chapter = document
            .get("chapter")
            .ok_or_else(|| invalid("missing `chapter`"))
            .and_then(|chapter| {
                as_number(chapter).ok_or_else(|| invalid("`chapter` must be a whole number"))
            })?;
        let entries = document
            .get("analysis")
            .and_then(Value::as_array)
            .ok_or_else(|| invalid("`analysis` must be an array"))?;

        let mut set = AnalysisSet::default();
        for (index, entry) in entries.iter().enumerate() {
            let Some((verse, entry)) = entry
                .as_object()
                .and_then(|entry| Some((as_number(entry.get("verse")?)?, entry)))
            else {
                log::warn!("Skipping analysis[{index}] of chapter {chapter}: no numeric `verse`");
                continue;
            };
            set.insert(VerseAnalysis {
                chapter,
                verse,
                fields: fields(entry),
            });
        }

        log::debug!("Loaded {} verse analyses for chapter {chapter}", set.len());
        Ok(set)
    }
}

fn invalid(message: &str) -> AnalysisError {
    AnalysisError::InvalidJson(message.to_string())
}

fn as_number(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn fields(entry: &Map<String, Value>) -> Vec<(String, String)> {
    entry
        .iter()
        .filter(|(key, _)| key.as_str() != "verse")
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect()
}
