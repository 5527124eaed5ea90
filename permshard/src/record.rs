//! Text codec for permutation records.
//!
//! A record is written as one line: the elements' `Display` text separated by
//! `", "` and wrapped in square brackets, e.g. `[1, 2, 3]`. Element text must
//! pass [`check_element_text`] for a record to parse back to the elements it
//! was written from; [`crate::sequence::InputSequence`] enforces this.

use std::fmt::{self, Display, Write};
use std::str::FromStr;

use thiserror::Error;

const OPEN: char = '[';
const CLOSE: char = ']';
const SEPARATOR: &str = ", ";

/// Errors from parsing a record line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    /// The line is not wrapped in `[` and `]`
    #[error("record '{0}' is not enclosed in brackets")]
    MissingBrackets(String),

    /// An element could not be converted to the target type
    #[error("element '{element}' at position {position} is invalid: {reason}")]
    InvalidElement {
        position: usize,
        element: String,
        reason: String,
    },
}

/// Check that `text` can stand for one element inside a record.
///
/// Returns the reason when it cannot: empty text would vanish from a
/// single-element record, brackets and the separator would split or
/// unwrap it, and a line break would split the record itself.
pub fn check_element_text(text: &str) -> Result<(), &'static str> {
    if text.is_empty() {
        Err("display text is empty")
    } else if text.contains(SEPARATOR) {
        Err("display text contains the record separator ', '")
    } else if text.contains(OPEN) || text.contains(CLOSE) {
        Err("display text contains a bracket")
    } else if text.contains(['\n', '\r']) {
        Err("display text contains a line break")
    } else {
        Ok(())
    }
}

/// Append the textual form of a record to `out`.
///
/// Used by the writer to reuse one line buffer across records.
pub fn write_record<'a, T, I>(out: &mut String, elements: I) -> fmt::Result
where
    T: Display + 'a,
    I: IntoIterator<Item = &'a T>,
{
    out.push(OPEN);
    for (i, element) in elements.into_iter().enumerate() {
        if i > 0 {
            out.push_str(SEPARATOR);
        }
        write!(out, "{}", element)?;
    }
    out.push(CLOSE);
    Ok(())
}

/// Format a record as a single line (without the trailing newline).
pub fn format_record<T: Display>(elements: &[T]) -> String {
    let mut line = String::new();
    // Writing into a String cannot fail
    let _ = write_record(&mut line, elements);
    line
}

/// Split a record line back into the display text of its elements.
///
/// Surrounding whitespace, including a trailing newline, is ignored.
pub fn parse_record(line: &str) -> Result<Vec<String>, RecordParseError> {
    let trimmed = line.trim();
    let inner = trimmed
        .strip_prefix(OPEN)
        .and_then(|rest| rest.strip_suffix(CLOSE))
        .ok_or_else(|| RecordParseError::MissingBrackets(trimmed.to_string()))?;

    if inner.is_empty() {
        return Ok(Vec::new());
    }

    Ok(inner.split(SEPARATOR).map(str::to_string).collect())
}

/// Parse a record line into typed elements.
pub fn parse_record_as<T>(line: &str) -> Result<Vec<T>, RecordParseError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_record(line)?
        .into_iter()
        .enumerate()
        .map(|(position, element)| {
            element
                .parse::<T>()
                .map_err(|e| RecordParseError::InvalidElement {
                    position,
                    reason: e.to_string(),
                    element,
                })
        })
        .collect()
}

/// Display text of the first element of a record line, without allocating.
///
/// Returns `None` for malformed or empty records.
pub fn record_head(line: &str) -> Option<&str> {
    let inner = line.trim().strip_prefix(OPEN)?.strip_suffix(CLOSE)?;
    if inner.is_empty() {
        return None;
    }
    Some(inner.split(SEPARATOR).next().unwrap_or(inner))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record() {
        assert_eq!(format_record(&[1, 2, 3]), "[1, 2, 3]");
        assert_eq!(format_record(&["a"]), "[a]");
        assert_eq!(format_record::<u8>(&[]), "[]");
    }

    #[test]
    fn test_write_record_appends() {
        let mut line = String::from("prefix:");
        write_record(&mut line, &[10, 20]).unwrap();
        assert_eq!(line, "prefix:[10, 20]");
    }

    #[test]
    fn test_parse_record() {
        assert_eq!(
            parse_record("[1, 2, 3]\n").unwrap(),
            vec!["1".to_string(), "2".to_string(), "3".to_string()]
        );
        assert_eq!(parse_record("[]").unwrap(), Vec::<String>::new());
        assert_eq!(parse_record("  [x]  ").unwrap(), vec!["x".to_string()]);
    }

    #[test]
    fn test_parse_record_missing_brackets() {
        let err = parse_record("1, 2, 3").unwrap_err();
        assert_eq!(err, RecordParseError::MissingBrackets("1, 2, 3".to_string()));
        assert!(parse_record("[1, 2").is_err());
    }

    #[test]
    fn test_parse_record_as_typed() {
        let parsed: Vec<u32> = parse_record_as("[4, 5, 6]").unwrap();
        assert_eq!(parsed, vec![4, 5, 6]);
    }

    #[test]
    fn test_parse_record_as_invalid_element() {
        let err = parse_record_as::<u32>("[4, x, 6]").unwrap_err();
        match err {
            RecordParseError::InvalidElement {
                position, element, ..
            } => {
                assert_eq!(position, 1);
                assert_eq!(element, "x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_typed_round_trip() {
        let record = vec![10i64, -3, 7];
        let parsed: Vec<i64> = parse_record_as(&format_record(&record)).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_check_element_text() {
        assert!(check_element_text("a").is_ok());
        assert!(check_element_text("a,b").is_ok());
        assert!(check_element_text("two words").is_ok());
        assert!(check_element_text("").is_err());
        assert!(check_element_text("a, b").is_err());
        assert!(check_element_text("[x").is_err());
        assert!(check_element_text("x]").is_err());
        assert!(check_element_text("line\nbreak").is_err());
        assert!(check_element_text("cr\r").is_err());
    }

    #[test]
    fn test_checked_text_round_trips() {
        let elements = ["a,", " b", "c,d", "e f"];
        for text in elements {
            check_element_text(text).unwrap();
        }
        let parsed = parse_record(&format_record(&elements)).unwrap();
        assert_eq!(parsed, elements);
    }

    #[test]
    fn test_record_head() {
        assert_eq!(record_head("[7, 1, 2]\n"), Some("7"));
        assert_eq!(record_head("[x]"), Some("x"));
        assert_eq!(record_head("[]"), None);
        assert_eq!(record_head("garbage"), None);
    }
}
