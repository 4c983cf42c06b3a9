/// Rows of trimmed string fields, in input order.
pub type ParsedRows = Vec<Vec<String>>;

/// Parse comma-separated text with double-quoted fields.
///
/// Quoted fields may contain commas, line breaks and `""` escaped quotes.
/// Every field is trimmed, quoted or not. Blank lines produce no row.
pub fn parse(text: &str) -> ParsedRows {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                // Check for escaped quote ("")
                if in_quotes && chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => close_field(&mut row, &mut field),
            '\r' | '\n' if !in_quotes => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                close_field(&mut row, &mut field);
                push_row(&mut rows, std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    // Input without a trailing newline
    if !field.is_empty() || !row.is_empty() {
        close_field(&mut row, &mut field);
        push_row(&mut rows, row);
    }

    rows
}

fn close_field(row: &mut Vec<String>, field: &mut String) {
    row.push(field.trim().to_string());
    field.clear();
}

/// A row holding a single empty field is a blank line, not data.
fn push_row(rows: &mut ParsedRows, row: Vec<String>) {
    if row.len() > 1 || row.first().is_some_and(|f| !f.is_empty()) {
        rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn rows(lines: &[&[&str]]) -> ParsedRows {
        lines
            .iter()
            .map(|row| row.iter().map(|f| f.to_string()).collect())
            .collect()
    }

    #[test]
    fn parses_header_and_rows() {
        let parsed = parse("Chapter,Verse,Face\n1,1,positive\n1,2,negative\n");
        assert_eq!(
            parsed,
            rows(&[
                &["Chapter", "Verse", "Face"],
                &["1", "1", "positive"],
                &["1", "2", "negative"],
            ])
        );
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert_eq!(parse(""), ParsedRows::new());
    }

    #[test]
    fn quoted_field_keeps_commas_and_newlines() {
        let parsed = parse("\"a, b\nc\",d\n");
        assert_eq!(parsed, rows(&[&["a, b\nc", "d"]]));
    }

    #[test]
    fn quoted_field_keeps_crlf() {
        let parsed = parse("\"x\r\ny\"\r\nz\r\n");
        assert_eq!(parsed, rows(&[&["x\r\ny"], &["z"]]));
    }

    #[test]
    fn escaped_quotes_become_literal_quotes() {
        let parsed = parse(r#""He said ""hi""""#);
        assert_eq!(parsed, rows(&[&[r#"He said "hi""#]]));
    }

    #[rstest]
    #[case("a,b\n")]
    #[case("a,b\n\n")]
    #[case("a,b\r\n\r\n")]
    #[case("a,b\n   \n")]
    #[case("a,b\n   ")]
    #[case("\n\na,b")]
    fn blank_lines_produce_no_rows(#[case] input: &str) {
        assert_eq!(parse(input), rows(&[&["a", "b"]]));
    }

    #[test]
    fn lone_carriage_return_ends_a_row() {
        assert_eq!(parse("a\rb"), rows(&[&["a"], &["b"]]));
    }

    #[test]
    fn rows_with_empty_fields_are_kept() {
        let parsed = parse(",\na,,\n,b");
        assert_eq!(parsed, rows(&[&["", ""], &["a", "", ""], &["", "b"]]));
    }

    #[test]
    fn fields_are_trimmed_including_quoted_ones() {
        let parsed = parse("  a  ,\"  b  \" ,\t c\t\n");
        assert_eq!(parsed, rows(&[&["a", "b", "c"]]));
    }

    #[test]
    fn quoted_empty_field_on_its_own_line_is_blank() {
        assert_eq!(parse("a\n\"\"\nb"), rows(&[&["a"], &["b"]]));
    }

    #[test]
    fn unterminated_quote_swallows_the_rest() {
        let parsed = parse("a,\"b,c\nd");
        assert_eq!(parsed, rows(&[&["a", "b,c\nd"]]));
    }

    #[test]
    fn ragged_rows_are_kept_as_is() {
        let parsed = parse("a,b,c\n1\n1,2,3,4\n");
        assert_eq!(parsed, rows(&[&["a", "b", "c"], &["1"], &["1", "2", "3", "4"]]));
    }
}
