//! Opening the application database and creating monthly tables.
//!
//! The server only ever reads the monthly tables; the create/insert helpers
//! exist for the `create_test_db` binary and for tests that need a populated
//! database.

use std::{thread, time::Duration};

use rusqlite::{Connection, OpenFlags};

use crate::{
    Error,
    catalog::TABLE_PREFIX,
    month::month_name,
    union::{COL_BANK_NAME, COL_IN_AMOUNT, COL_IN_COUNT, COL_OUT_AMOUNT, COL_OUT_COUNT},
};

/// How many times to attempt opening the database before giving up.
const OPEN_ATTEMPTS: u32 = 3;

/// How long to wait before the first retry; doubles per attempt.
const OPEN_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Open the SQLite database at `path` read-only, retrying transient
/// failures.
///
/// The server never writes to the monthly tables, so the connection is
/// opened read-only. Opening retries up to two times with a doubling
/// backoff, since the first attempt can fail transiently (e.g. another
/// process briefly holds an exclusive lock on the file).
///
/// # Errors
/// Returns [Error::DatabaseOpenError] with the last failure's diagnostic if
/// every attempt fails.
pub fn open_database(path: &str) -> Result<Connection, Error> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let mut backoff = OPEN_RETRY_BACKOFF;
    let mut last_error = None;

    for attempt in 1..=OPEN_ATTEMPTS {
        match Connection::open_with_flags(path, flags) {
            Ok(connection) => return Ok(connection),
            Err(error) => {
                tracing::warn!(
                    "could not open database at {path} (attempt {attempt}/{OPEN_ATTEMPTS}): {error}"
                );
                last_error = Some(error);
            }
        }

        if attempt < OPEN_ATTEMPTS {
            thread::sleep(backoff);
            backoff *= 2;
        }
    }

    Err(Error::DatabaseOpenError(
        last_error.map(|error| error.to_string()).unwrap_or_default(),
    ))
}

/// Create the monthly table for `(year, month)` with the standard NEFT
/// schema.
///
/// # Errors
/// Returns [Error::NotFound] if `month` is not in 1-12, or [Error::SqlError]
/// if the table already exists or the statement fails.
pub fn create_month_table(connection: &Connection, year: i32, month: u8) -> Result<(), Error> {
    let table_name = physical_table_name(year, month)?;

    connection.execute(
        &format!(
            "CREATE TABLE \"{table_name}\" (
                {COL_BANK_NAME} TEXT NOT NULL,
                {COL_OUT_COUNT} INTEGER NOT NULL,
                {COL_OUT_AMOUNT} REAL NOT NULL,
                {COL_IN_COUNT} INTEGER NOT NULL,
                {COL_IN_AMOUNT} REAL NOT NULL
            )"
        ),
        (),
    )?;

    Ok(())
}

/// Insert one bank's row into the monthly table for `(year, month)`.
///
/// # Errors
/// Returns [Error::NotFound] if `month` is not in 1-12, or [Error::SqlError]
/// if the monthly table does not exist or the insert fails.
#[allow(clippy::too_many_arguments)]
pub fn insert_bank_row(
    connection: &Connection,
    year: i32,
    month: u8,
    bank_name: &str,
    outward_count: i64,
    outward_amount: f64,
    inward_count: i64,
    inward_amount: f64,
) -> Result<(), Error> {
    let table_name = physical_table_name(year, month)?;

    connection.execute(
        &format!(
            "INSERT INTO \"{table_name}\" \
            ({COL_BANK_NAME}, {COL_OUT_COUNT}, {COL_OUT_AMOUNT}, {COL_IN_COUNT}, {COL_IN_AMOUNT}) \
            VALUES (?1, ?2, ?3, ?4, ?5)"
        ),
        (
            bank_name,
            outward_count,
            outward_amount,
            inward_count,
            inward_amount,
        ),
    )?;

    Ok(())
}

fn physical_table_name(year: i32, month: u8) -> Result<String, Error> {
    let month_name = month_name(month).ok_or(Error::NotFound)?;

    Ok(format!(
        "{TABLE_PREFIX}_{}_{year}",
        month_name.to_lowercase()
    ))
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use crate::Error;

    use super::{create_month_table, insert_bank_row, open_database, physical_table_name};

    #[test]
    fn physical_table_names_follow_the_convention() {
        assert_eq!(
            physical_table_name(2023, 1),
            Ok("neft_january_2023".to_owned())
        );
        assert_eq!(
            physical_table_name(2024, 12),
            Ok("neft_december_2024".to_owned())
        );
    }

    #[test]
    fn physical_table_name_rejects_invalid_month() {
        assert_eq!(physical_table_name(2023, 0), Err(Error::NotFound));
        assert_eq!(physical_table_name(2023, 13), Err(Error::NotFound));
    }

    #[test]
    fn create_and_insert_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        create_month_table(&conn, 2023, 1).unwrap();

        insert_bank_row(&conn, 2023, 1, "State Bank", 10, 1_000.0, 20, 2_000.0).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM neft_january_2023", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn insert_into_missing_month_fails() {
        let conn = Connection::open_in_memory().unwrap();

        let result = insert_bank_row(&conn, 2023, 1, "State Bank", 1, 1.0, 1, 1.0);

        assert!(matches!(result, Err(Error::SqlError(_))));
    }

    #[test]
    fn open_database_succeeds_on_existing_file() {
        let path = std::env::temp_dir().join("neft_dashboard_open_test.db");
        let _ = std::fs::remove_file(&path);
        Connection::open(&path).unwrap();

        let connection = open_database(path.to_str().unwrap());

        assert!(connection.is_ok());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_database_fails_on_missing_file() {
        let result = open_database("/no/such/directory/neft.db");

        assert!(matches!(result, Err(Error::DatabaseOpenError(_))));
    }
}
