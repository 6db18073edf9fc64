//! Row transformer: one raw export record into one [`BookRecord`].

use chrono::NaiveDate;
use csv::ByteRecord;
use tracing::debug;

use crate::error::{DateParseError, RowError, RowResult};
use crate::models::{BookRecord, Field, CSV_LAYOUT};
use crate::parser::{decode_field, TextEncoding};
use crate::validation::normalize_identifier;

/// A transformed row plus the identifier fields that were dropped to NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedRow {
    pub record: BookRecord,
    pub nulled: Vec<Field>,
}

/// Parse a `day.month.year` date such as `5.3.2004`.
///
/// Each part may carry surrounding whitespace; anything else is an error.
pub fn parse_available_since(value: &str) -> Result<NaiveDate, DateParseError> {
    let parts: Vec<&str> = value.split('.').collect();
    let [day, month, year] = parts.as_slice() else {
        return Err(DateParseError::PartCount(parts.len()));
    };

    let day: u32 = parse_part(day)?;
    let month: u32 = parse_part(month)?;
    let year: i32 = parse_part(year)?;

    // A DATE literal has a four-digit year.
    if !(1..=9999).contains(&year) {
        return Err(DateParseError::OutOfRange { day, month, year });
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(DateParseError::OutOfRange { day, month, year })
}

fn parse_part<T: std::str::FromStr>(part: &str) -> Result<T, DateParseError> {
    part.trim()
        .parse()
        .map_err(|_| DateParseError::NotANumber(part.to_string()))
}

/// Transform one export record.
///
/// `line` is the input line number used in errors. Decoding and date
/// errors are fatal; identifiers of the wrong length are nulled.
pub fn transform_record(
    raw: &ByteRecord,
    line: u64,
    encoding: TextEncoding,
) -> RowResult<TransformedRow> {
    if raw.len() != CSV_LAYOUT.len() {
        return Err(RowError::ColumnCount {
            line,
            expected: CSV_LAYOUT.len(),
            found: raw.len(),
        });
    }

    let text = |field: Field| -> RowResult<String> {
        decode_field(&raw[field.csv_index()], encoding).ok_or(RowError::Decode {
            line,
            column: field.column(),
            encoding: encoding.name(),
        })
    };

    let mut nulled = Vec::new();
    let mut identifier = |field: Field| -> RowResult<Option<String>> {
        let value = normalize_identifier(field, text(field)?);
        if value.is_none() {
            debug!(line, column = field.column(), "identifier has wrong length, storing NULL");
            nulled.push(field);
        }
        Ok(value)
    };

    let isbn10 = identifier(Field::Isbn10)?;
    let isbn10_formatted = identifier(Field::Isbn10Formatted)?;
    let isbn13 = identifier(Field::Isbn13)?;
    let isbn13_formatted = identifier(Field::Isbn13Formatted)?;

    let since = text(Field::AvailableSince)?;
    let available_since = parse_available_since(&since).map_err(|source| RowError::Date {
        line,
        value: since.clone(),
        source,
    })?;

    let record = BookRecord {
        author: text(Field::Author)?,
        title: text(Field::Title)?,
        publisher: text(Field::Publisher)?,
        isbn10,
        isbn10_formatted,
        isbn13,
        isbn13_formatted,
        book_id: text(Field::BookId)?,
        available_since,
        grade: text(Field::Grade)?,
        num_read: text(Field::NumRead)?,
    };

    Ok(TransformedRow { record, nulled })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(fields: &[&[u8]]) -> ByteRecord {
        ByteRecord::from(fields.to_vec())
    }

    fn valid_fields() -> Vec<&'static [u8]> {
        [
            "Funke, Cornelia",
            "Tintenherz",
            "Dressler",
            "3791504657",
            "5.3.2004",
            "5",
            "812",
            "9783791504652",
            "3-7915-0465-7",
            "978-3-7915-0465-2",
            "12345",
        ]
        .iter()
        .map(|s| s.as_bytes())
        .collect()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_available_since("5.3.2004").unwrap(),
            NaiveDate::from_ymd_opt(2004, 3, 5).unwrap()
        );
        assert_eq!(
            parse_available_since("05.03.2004").unwrap(),
            NaiveDate::from_ymd_opt(2004, 3, 5).unwrap()
        );
        assert_eq!(
            parse_available_since(" 1. 12 .1999").unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_date_wrong_separator() {
        assert_eq!(
            parse_available_since("2004-03-05"),
            Err(DateParseError::PartCount(1))
        );
        assert_eq!(
            parse_available_since("5.3.2004.1"),
            Err(DateParseError::PartCount(4))
        );
    }

    #[test]
    fn test_parse_date_not_a_number() {
        assert_eq!(
            parse_available_since("5.März.2004"),
            Err(DateParseError::NotANumber("März".into()))
        );
        assert!(parse_available_since("..").is_err());
    }

    #[test]
    fn test_parse_date_impossible_day() {
        assert_eq!(
            parse_available_since("31.2.2004"),
            Err(DateParseError::OutOfRange { day: 31, month: 2, year: 2004 })
        );
    }

    #[test]
    fn test_parse_date_year_out_of_range() {
        assert_eq!(
            parse_available_since("5.3.0"),
            Err(DateParseError::OutOfRange { day: 5, month: 3, year: 0 })
        );
        assert_eq!(
            parse_available_since("5.3.-2004"),
            Err(DateParseError::OutOfRange { day: 5, month: 3, year: -2004 })
        );
        assert_eq!(
            parse_available_since("5.3.10000"),
            Err(DateParseError::OutOfRange { day: 5, month: 3, year: 10000 })
        );
        assert_eq!(
            parse_available_since("1.1.1").unwrap(),
            NaiveDate::from_ymd_opt(1, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_transform_valid_row() {
        let row = transform_record(&raw(&valid_fields()), 2, TextEncoding::Utf8).unwrap();

        assert!(row.nulled.is_empty());
        let r = row.record;
        assert_eq!(r.author, "Funke, Cornelia");
        assert_eq!(r.isbn10.as_deref(), Some("3791504657"));
        assert_eq!(r.isbn13.as_deref(), Some("9783791504652"));
        assert_eq!(r.isbn10_formatted.as_deref(), Some("3-7915-0465-7"));
        assert_eq!(r.isbn13_formatted.as_deref(), Some("978-3-7915-0465-2"));
        assert_eq!(r.book_id, "12345");
        assert_eq!(r.grade, "5");
        assert_eq!(r.num_read, "812");
        assert_eq!(r.available_since, NaiveDate::from_ymd_opt(2004, 3, 5).unwrap());
    }

    #[test]
    fn test_bad_identifiers_are_nulled() {
        let mut fields = valid_fields();
        fields[3] = b"379150465"; // isbn10, 9 chars
        fields[7] = b"978379150465"; // isbn13, 12 chars
        fields[9] = b""; // isbn13_formatted, empty

        let row = transform_record(&raw(&fields), 4, TextEncoding::Utf8).unwrap();

        assert_eq!(row.record.isbn10, None);
        assert_eq!(row.record.isbn13, None);
        assert_eq!(row.record.isbn13_formatted, None);
        assert_eq!(row.record.isbn10_formatted.as_deref(), Some("3-7915-0465-7"));
        assert_eq!(
            row.nulled,
            vec![Field::Isbn10, Field::Isbn13, Field::Isbn13Formatted]
        );
    }

    #[test]
    fn test_bad_date_is_fatal() {
        let mut fields = valid_fields();
        fields[4] = b"2004-03-05";

        let err = transform_record(&raw(&fields), 9, TextEncoding::Utf8).unwrap_err();
        assert!(matches!(err, RowError::Date { line: 9, .. }));
    }

    #[test]
    fn test_invalid_bytes_are_fatal() {
        let mut fields = valid_fields();
        fields[1] = b"M\xe4rchen"; // latin-1 "ä"

        let err = transform_record(&raw(&fields), 3, TextEncoding::Utf8).unwrap_err();
        match err {
            RowError::Decode { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "title");
            }
            other => panic!("unexpected error: {other}"),
        }

        let row = transform_record(&raw(&fields), 3, TextEncoding::Windows1252).unwrap();
        assert_eq!(row.record.title, "Märchen");
    }

    #[test]
    fn test_wrong_field_count() {
        let fields = valid_fields();
        let err = transform_record(&raw(&fields[..10]), 5, TextEncoding::Utf8).unwrap_err();
        assert!(matches!(
            err,
            RowError::ColumnCount { line: 5, expected: 11, found: 10 }
        ));
    }
}
