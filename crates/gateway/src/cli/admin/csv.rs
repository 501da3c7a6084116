//! Minimal CSV reader for the legacy directory export.
//!
//! The export is well-formed: a header row, comma separators, double-quoted
//! fields with `""` escapes. This covers exactly that shape — it is not a
//! general CSV implementation.

use std::collections::HashMap;

use rv_domain::error::{Error, Result};

/// One row, keyed by lower-cased header name.
pub type CsvRow = HashMap<String, String>;

/// Parse an export into header-keyed rows. Blank lines are skipped; a row
/// with the wrong field count is a hard error (a truncated export should
/// stop the batch, not half-run it).
pub fn parse(input: &str) -> Result<Vec<CsvRow>> {
    let mut records = records(input).into_iter();

    let Some(header) = records.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = header
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();

    let mut rows = Vec::new();
    for (line_no, record) in records.enumerate() {
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }
        if record.len() != header.len() {
            return Err(Error::Other(format!(
                "csv line {}: expected {} fields, got {}",
                line_no + 2,
                header.len(),
                record.len()
            )));
        }
        rows.push(header.iter().cloned().zip(record).collect());
    }
    Ok(rows)
}

fn records(input: &str) -> Vec<Vec<String>> {
    let mut out = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            // Bare `\r` is swallowed; `\r\n` ends the record at `\n`.
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                out.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        out.push(record);
    }
    out
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_export() {
        let input = "id,email,first_name,last_name\nuser_1,a@example.com,Ada,Lovelace\n";
        let rows = parse(input).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "user_1");
        assert_eq!(rows[0]["email"], "a@example.com");
        assert_eq!(rows[0]["first_name"], "Ada");
    }

    #[test]
    fn handles_quoted_fields_with_commas() {
        let input = "id,email,first_name,last_name\nuser_1,a@example.com,\"Smith, Jr.\",Jones\n";
        let rows = parse(input).unwrap();
        assert_eq!(rows[0]["first_name"], "Smith, Jr.");
    }

    #[test]
    fn handles_escaped_quotes() {
        let input = "id,name\nuser_1,\"the \"\"one\"\"\"\n";
        let rows = parse(input).unwrap();
        assert_eq!(rows[0]["name"], "the \"one\"");
    }

    #[test]
    fn handles_crlf_and_missing_trailing_newline() {
        let input = "id,email\r\nuser_1,a@example.com\r\nuser_2,b@example.com";
        let rows = parse(input).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["email"], "b@example.com");
    }

    #[test]
    fn skips_blank_lines() {
        let input = "id,email\nuser_1,a@example.com\n\n";
        let rows = parse(input).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn header_names_are_lowercased() {
        let input = "ID,Email\nuser_1,a@example.com\n";
        let rows = parse(input).unwrap();
        assert_eq!(rows[0]["id"], "user_1");
        assert_eq!(rows[0]["email"], "a@example.com");
    }

    #[test]
    fn field_count_mismatch_is_an_error() {
        let input = "id,email\nuser_1\n";
        let err = parse(input).unwrap_err();
        assert!(err.to_string().contains("expected 2 fields"));
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse("").unwrap().is_empty());
    }
}
