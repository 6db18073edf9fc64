//! Identifier validation.
//!
//! Antolin exports contain some broken ISBNs. Identifier fields are only
//! checked for their exact length; a value of any other length is dropped
//! to NULL instead of rejecting the row.
//!
//! | Field              | Length |
//! |--------------------|--------|
//! | `isbn10`           | 10     |
//! | `isbn10_formatted` | 13     |
//! | `isbn13`           | 13     |
//! | `isbn13_formatted` | 17     |

use crate::models::Field;

/// Required length, in characters, of every identifier field.
pub const IDENTIFIER_LENGTHS: [(Field, usize); 4] = [
    (Field::Isbn10, 10),
    (Field::Isbn10Formatted, 13),
    (Field::Isbn13, 13),
    (Field::Isbn13Formatted, 17),
];

/// Required length of `field`, or `None` if it is not an identifier.
pub fn required_length(field: Field) -> Option<usize> {
    IDENTIFIER_LENGTHS
        .iter()
        .find(|(f, _)| *f == field)
        .map(|(_, len)| *len)
}

/// Drop an identifier of the wrong length to `None`.
///
/// Values of non-identifier fields are returned unchanged.
pub fn normalize_identifier(field: Field, value: String) -> Option<String> {
    if is_valid_identifier(field, &value) {
        Some(value)
    } else {
        None
    }
}

/// Quick check without taking ownership.
pub fn is_valid_identifier(field: Field, value: &str) -> bool {
    required_length(field).map_or(true, |len| value.chars().count() == len)
}
