//! Domain models for the Antolin import.
//!
//! - [`Field`] - The eleven fields of an Antolin export row
//! - [`CSV_LAYOUT`] - Positional order of the fields in the input file
//! - [`INSERT_LAYOUT`] - Column order of the insertion statement
//! - [`BookRecord`] - One validated row, ready to be inserted
//!
//! The two layouts differ in the middle: the file lists `available_since`,
//! `grade` and `num_read` right after `isbn10`, the table puts them last.
//! Fields are matched by name, never by position, and both orders live
//! here so the mapping can be reviewed in one place.

use chrono::NaiveDate;

// =============================================================================
// Fields
// =============================================================================

/// One field of an Antolin export row.
///
/// Each field maps to exactly one destination column of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Author,
    Title,
    Publisher,
    Isbn10,
    AvailableSince,
    Grade,
    NumRead,
    Isbn13,
    Isbn10Formatted,
    Isbn13Formatted,
    BookId,
}

/// Field order in the input file.
pub const CSV_LAYOUT: [Field; 11] = [
    Field::Author,
    Field::Title,
    Field::Publisher,
    Field::Isbn10,
    Field::AvailableSince,
    Field::Grade,
    Field::NumRead,
    Field::Isbn13,
    Field::Isbn10Formatted,
    Field::Isbn13Formatted,
    Field::BookId,
];

/// Column order of the `antolin` insertion statement.
pub const INSERT_LAYOUT: [Field; 11] = [
    Field::Author,
    Field::Title,
    Field::Publisher,
    Field::Isbn10,
    Field::Isbn10Formatted,
    Field::Isbn13,
    Field::Isbn13Formatted,
    Field::BookId,
    Field::AvailableSince,
    Field::Grade,
    Field::NumRead,
];

impl Field {
    /// Destination column name.
    pub fn column(self) -> &'static str {
        match self {
            Field::Author => "author",
            Field::Title => "title",
            Field::Publisher => "publisher",
            Field::Isbn10 => "isbn10",
            Field::AvailableSince => "available_since",
            Field::Grade => "grade",
            Field::NumRead => "num_read",
            Field::Isbn13 => "isbn13",
            Field::Isbn10Formatted => "isbn10_formatted",
            Field::Isbn13Formatted => "isbn13_formatted",
            Field::BookId => "book_id",
        }
    }

    /// Zero-based position of this field in an input row.
    pub fn csv_index(self) -> usize {
        match self {
            Field::Author => 0,
            Field::Title => 1,
            Field::Publisher => 2,
            Field::Isbn10 => 3,
            Field::AvailableSince => 4,
            Field::Grade => 5,
            Field::NumRead => 6,
            Field::Isbn13 => 7,
            Field::Isbn10Formatted => 8,
            Field::Isbn13Formatted => 9,
            Field::BookId => 10,
        }
    }
}

// =============================================================================
// Book Record
// =============================================================================

/// One book, as inserted into the `antolin` table.
///
/// Identifier fields are `None` when the export carried a value of the
/// wrong length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub author: String,
    pub title: String,
    pub publisher: String,
    pub isbn10: Option<String>,
    pub isbn10_formatted: Option<String>,
    pub isbn13: Option<String>,
    pub isbn13_formatted: Option<String>,
    pub book_id: String,
    pub available_since: NaiveDate,
    pub grade: String,
    pub num_read: String,
}

impl BookRecord {
    /// Value bound for `field`'s column. `None` binds SQL NULL.
    ///
    /// Dates are rendered as ISO `YYYY-MM-DD`, which `DATE` columns accept.
    pub fn column_value(&self, field: Field) -> Option<String> {
        match field {
            Field::Author => Some(self.author.clone()),
            Field::Title => Some(self.title.clone()),
            Field::Publisher => Some(self.publisher.clone()),
            Field::Isbn10 => self.isbn10.clone(),
            Field::Isbn10Formatted => self.isbn10_formatted.clone(),
            Field::Isbn13 => self.isbn13.clone(),
            Field::Isbn13Formatted => self.isbn13_formatted.clone(),
            Field::BookId => Some(self.book_id.clone()),
            Field::AvailableSince => Some(self.available_since.format("%Y-%m-%d").to_string()),
            Field::Grade => Some(self.grade.clone()),
            Field::NumRead => Some(self.num_read.clone()),
        }
    }

    /// Values in [`INSERT_LAYOUT`] order.
    pub fn insert_values(&self) -> Vec<Option<String>> {
        INSERT_LAYOUT.iter().map(|f| self.column_value(*f)).collect()
    }
}
