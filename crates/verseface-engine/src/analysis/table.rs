//! Analysis records from CSV rows.
//!
//! The first row is the header. Column names are matched case-insensitively:
//! `chapter` and `verse` exactly, plus at least one column whose name
//! contains `face` or `analysis`.

use super::{AnalysisError, AnalysisSet, VerseAnalysis};

struct Columns {
    chapter: usize,
    verse: usize,
}

impl Columns {
    fn match_header(header: &[String]) -> Result<Self, AnalysisError> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let position = |wanted: &str| names.iter().position(|name| name == wanted);

        let chapter = position("chapter");
        let verse = position("verse");
        let has_values = names
            .iter()
            .any(|name| name.contains("face") || name.contains("analysis"));

        let mut missing = Vec::new();
        if chapter.is_none() {
            missing.push("chapter".to_string());
        }
        if verse.is_none() {
            missing.push("verse".to_string());
        }
        if !has_values {
            missing.push("face or analysis".to_string());
        }

        match (chapter, verse) {
            (Some(chapter), Some(verse)) if missing.is_empty() => Ok(Self { chapter, verse }),
            _ => Err(AnalysisError::MissingColumns(missing)),
        }
    }
}

impl AnalysisSet {
    /// Build from parsed CSV rows (header first).
    ///
    /// Rows whose chapter or verse cell is not a non-negative integer are
    /// skipped with a warning.
    pub fn from_csv_rows(rows: &[Vec<String>]) -> Result<Self, AnalysisError> {
        let (header, data) = rows.split_first().ok_or(AnalysisError::Empty)?;
        let columns = Columns::match_header(header)?;

        let mut set = AnalysisSet::default();
        let mut skipped = 0;
        for (index, row) in data.iter().enumerate() {
            let cell = |column: usize| row.get(column).map(String::as_str).unwrap_or("");
            let (Ok(chapter), Ok(verse)) = (
                cell(columns.chapter).parse::<u32>(),
                cell(columns.verse).parse::<u32>(),
            ) else {
                // +2: one for the header, one for 1-based line numbers
                log::warn!(
                    "Skipping analysis row {}: chapter {:?}, verse {:?}",
                    index + 2,
                    cell(columns.chapter),
                    cell(columns.verse)
                );
                skipped += 1;
                continue;
            };

            let fields = header
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != columns.chapter && *i != columns.verse)
                .map(|(i, name)| (name.clone(), cell(i).to_string()))
                .collect();
            set.insert(VerseAnalysis {
                chapter,
                verse,
                fields,
            });
        }

        log::debug!(
            "Loaded {} verse analyses from CSV ({skipped} rows skipped)",
            set.len()
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_csv;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn loads_rows_by_header_name() {
        let rows = parse_csv(
            "Verse,CHAPTER,Face_Act,Commentary\n1,1,Mitigate Negative Face,\"Polite, indirect\"\n2,1,Direct,none\n",
        );
        let set = AnalysisSet::from_csv_rows(&rows).unwrap();

        assert_eq!(set.len(), 2);
        let first = set.get(1, 1).unwrap();
        assert_eq!(first.face(), Some("Mitigate Negative Face"));
        assert_eq!(first.field("commentary"), Some("Polite, indirect"));
        assert_eq!(
            first.fields,
            vec![
                ("Face_Act".to_string(), "Mitigate Negative Face".to_string()),
                ("Commentary".to_string(), "Polite, indirect".to_string()),
            ]
        );
        assert_eq!(set.get(1, 2).unwrap().face(), Some("Direct"));
    }

    #[rstest]
    #[case("verse,face\n", vec!["chapter"])]
    #[case("chapter,face\n", vec!["verse"])]
    #[case("chapter,verse,notes\n", vec!["face or analysis"])]
    #[case("ch,vs\n", vec!["chapter", "verse", "face or analysis"])]
    fn reports_missing_columns(#[case] csv: &str, #[case] expected: Vec<&str>) {
        let rows = parse_csv(csv);
        match AnalysisSet::from_csv_rows(&rows) {
            Err(AnalysisError::MissingColumns(missing)) => assert_eq!(missing, expected),
            other => panic!("expected missing columns, got {other:?}"),
        }
    }

    #[test]
    fn analysis_column_satisfies_header() {
        let rows = parse_csv("Chapter,Verse,Analysis\n1,3,fine\n");
        let set = AnalysisSet::from_csv_rows(&rows).unwrap();
        assert_eq!(set.get(1, 3).unwrap().analysis(), Some("fine"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(
            AnalysisSet::from_csv_rows(&[]),
            Err(AnalysisError::Empty)
        ));
    }

    #[test]
    fn rows_with_bad_numbers_are_skipped() {
        let rows = parse_csv("chapter,verse,face\none,1,x\n1,,y\n1,2,z\n");
        let set = AnalysisSet::from_csv_rows(&rows).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(1, 2).unwrap().face(), Some("z"));
    }

    #[test]
    fn short_rows_get_empty_fields() {
        let rows = parse_csv("chapter,verse,face,analysis\n1,4,only face\n");
        let set = AnalysisSet::from_csv_rows(&rows).unwrap();
        let record = set.get(1, 4).unwrap();
        assert_eq!(record.face(), Some("only face"));
        assert_eq!(record.analysis(), Some(""));
    }

    #[test]
    fn header_only_is_an_empty_set() {
        let rows = parse_csv("chapter,verse,face\n");
        assert!(AnalysisSet::from_csv_rows(&rows).unwrap().is_empty());
    }
}
