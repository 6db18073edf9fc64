//! Destination table access.
//!
//! The loader talks to the database through sqlx's `Any` driver so the same
//! code path serves MySQL in production and SQLite in tests. Both accept `?`
//! placeholders.

use sqlx::any::AnyQueryResult;
use sqlx::{AnyConnection, Connection};

use crate::models::{BookRecord, INSERT_LAYOUT};

/// Destination table.
pub const TABLE: &str = "antolin";

/// The parameterized insertion statement, columns in [`INSERT_LAYOUT`] order.
pub fn insert_statement() -> String {
    let columns: Vec<&str> = INSERT_LAYOUT.iter().map(|f| f.column()).collect();
    let placeholders = vec!["?"; columns.len()];

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        TABLE,
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Open a single connection to `url`.
pub async fn connect(url: &str) -> Result<AnyConnection, sqlx::Error> {
    sqlx::any::install_default_drivers();
    AnyConnection::connect(url).await
}

/// Insert one record using a prepared `statement` from [`insert_statement`].
pub async fn insert_record(
    conn: &mut AnyConnection,
    statement: &str,
    record: &BookRecord,
) -> Result<AnyQueryResult, sqlx::Error> {
    let mut query = sqlx::query(statement);
    for value in record.insert_values() {
        query = query.bind(value);
    }
    query.execute(conn).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// SQLite stand-in for the production `antolin` table.
    pub(crate) const CREATE_TABLE: &str = r#"
        CREATE TABLE antolin (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            author TEXT NOT NULL,
            title TEXT NOT NULL,
            publisher TEXT NOT NULL,
            isbn10 TEXT,
            isbn10_formatted TEXT,
            isbn13 TEXT,
            isbn13_formatted TEXT,
            book_id TEXT NOT NULL,
            available_since TEXT NOT NULL,
            grade TEXT NOT NULL,
            num_read INTEGER NOT NULL CHECK (num_read GLOB '[0-9]*')
        )
    "#;

    pub(crate) async fn memory_db() -> AnyConnection {
        let mut conn = connect("sqlite::memory:").await.unwrap();
        sqlx::query(CREATE_TABLE).execute(&mut conn).await.unwrap();
        conn
    }

    #[test]
    fn test_insert_statement() {
        assert_eq!(
            insert_statement(),
            "INSERT INTO antolin (author, title, publisher, isbn10, isbn10_formatted, \
             isbn13, isbn13_formatted, book_id, available_since, grade, num_read) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
    }

    #[tokio::test]
    async fn test_insert_record_binds_by_column() {
        let mut conn = memory_db().await;
        let record = BookRecord {
            author: "Ende, Michael".into(),
            title: "Momo".into(),
            publisher: "Thienemann".into(),
            isbn10: Some("3522119209".into()),
            isbn10_formatted: None,
            isbn13: Some("9783522119209".into()),
            isbn13_formatted: Some("978-3-522-11920-9".into()),
            book_id: "B-77".into(),
            available_since: NaiveDate::from_ymd_opt(2001, 9, 14).unwrap(),
            grade: "4".into(),
            num_read: "1503".into(),
        };

        let result = insert_record(&mut conn, &insert_statement(), &record)
            .await
            .unwrap();
        assert_eq!(result.rows_affected(), 1);

        let (isbn10_formatted, isbn13, book_id, since): (Option<String>, Option<String>, String, String) =
            sqlx::query_as(
                "SELECT isbn10_formatted, isbn13, book_id, available_since FROM antolin",
            )
            .fetch_one(&mut conn)
            .await
            .unwrap();

        assert_eq!(isbn10_formatted, None);
        assert_eq!(isbn13.as_deref(), Some("9783522119209"));
        assert_eq!(book_id, "B-77");
        assert_eq!(since, "2001-09-14");
    }
}
