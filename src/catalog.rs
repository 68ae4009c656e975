//! Discovery of the monthly NEFT tables present in the database.
//!
//! The data set is spread across one physical table per month, named
//! `neft_<monthname>_<year>` (e.g. `neft_january_2023`). This module lists
//! the tables in the database, parses those names into [TableDescriptor]s,
//! and caches the result so the (comparatively expensive) introspection runs
//! once per process unless explicitly refreshed.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::Redirect,
};
use rusqlite::Connection;

use crate::{AppState, Error, endpoints, month::month_number};

/// The table name prefix that marks a table as monthly NEFT data.
pub(crate) const TABLE_PREFIX: &str = "neft";

/// A physical monthly table resolved from its name.
///
/// One descriptor exists per valid `(year, month)` pair, ordered
/// chronologically so the union query is built in a deterministic order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TableDescriptor {
    /// The table name as it appears in the database.
    pub physical_name: String,
    /// The four digit year parsed from the table name.
    pub year: i32,
    /// The month (1-12) parsed from the table name.
    pub month: u8,
}

/// List the monthly NEFT tables in the database, ordered by (year, month).
///
/// Table names that do not parse to a valid month and four digit year are
/// skipped silently; a second table resolving to an already seen
/// `(year, month)` is skipped with a warning so that totals are never
/// counted twice. An empty database yields an empty list, not an error.
///
/// # Errors
/// Returns [Error::SqlError] if listing the table names fails.
pub(crate) fn scan_tables(connection: &Connection) -> Result<Vec<TableDescriptor>, Error> {
    let table_names: Vec<String> = connection
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name ASC;")?
        .query_map([], |row| row.get(0))?
        .collect::<Result<_, _>>()?;

    let mut tables: Vec<TableDescriptor> = table_names
        .into_iter()
        .filter_map(|name| match parse_table_name(&name) {
            Some((year, month)) => Some(TableDescriptor {
                physical_name: name,
                year,
                month,
            }),
            None => {
                tracing::debug!("skipping table {name:?}: not a monthly NEFT table");
                None
            }
        })
        .collect();

    // Stable sort keeps name order within a (year, month), so the first
    // table by name wins when duplicates are dropped below.
    tables.sort_by_key(|table| (table.year, table.month));
    tables.dedup_by(|current, previous| {
        let is_duplicate = (current.year, current.month) == (previous.year, previous.month);

        if is_duplicate {
            tracing::warn!(
                "skipping table {:?}: table {:?} already covers {}-{:02}",
                current.physical_name,
                previous.physical_name,
                current.year,
                current.month,
            );
        }

        is_duplicate
    });

    if tables.is_empty() {
        tracing::warn!("no tables matching '{TABLE_PREFIX}_<monthname>_<year>' were found");
    }

    Ok(tables)
}

/// Parse `neft_<monthname>_<year>` into `(year, month)`.
///
/// The month name is matched case-insensitively and the year must have
/// exactly four digits.
fn parse_table_name(name: &str) -> Option<(i32, u8)> {
    let (month_name, year) = sscanf::sscanf!(name, "neft_{str}_{u16}")?;

    if !(1000..=9999).contains(&year) {
        return None;
    }

    let month = month_number(month_name)?;

    Some((year as i32, month))
}

/// A mutex-guarded, lazily initialised cache of the table catalog.
///
/// Introspection runs at most once per process; concurrent readers share the
/// cached descriptor list via an [Arc]. [CatalogCache::refresh] recomputes on
/// demand, which is only needed when monthly tables are added while the
/// server is running.
#[derive(Debug, Default)]
pub(crate) struct CatalogCache {
    tables: Mutex<Option<Arc<Vec<TableDescriptor>>>>,
}

impl CatalogCache {
    /// Get the cached catalog, scanning the database on first use.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the cache mutex is poisoned, or
    /// [Error::SqlError] if the initial scan fails.
    pub fn get(&self, connection: &Connection) -> Result<Arc<Vec<TableDescriptor>>, Error> {
        let mut guard = self
            .tables
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        if let Some(tables) = guard.as_ref() {
            return Ok(Arc::clone(tables));
        }

        let tables = Arc::new(scan_tables(connection)?);
        *guard = Some(Arc::clone(&tables));

        tracing::info!(
            "catalog scan found {} monthly NEFT tables",
            tables.len()
        );

        Ok(tables)
    }

    /// Rescan the database and replace the cached catalog.
    ///
    /// # Errors
    /// Returns [Error::DatabaseLockError] if the cache mutex is poisoned, or
    /// [Error::SqlError] if the scan fails. A failed scan leaves the
    /// previously cached catalog in place.
    pub fn refresh(&self, connection: &Connection) -> Result<Arc<Vec<TableDescriptor>>, Error> {
        let tables = Arc::new(scan_tables(connection)?);

        let mut guard = self
            .tables
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;
        *guard = Some(Arc::clone(&tables));

        tracing::info!(
            "catalog refresh found {} monthly NEFT tables",
            tables.len()
        );

        Ok(tables)
    }
}

/// The state needed for refreshing the table catalog.
#[derive(Debug, Clone)]
pub(crate) struct CatalogState {
    /// The database connection to rescan.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The catalog cache to replace.
    pub catalog: Arc<CatalogCache>,
}

impl FromRef<AppState> for CatalogState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            catalog: state.catalog.clone(),
        }
    }
}

/// Rescan the database for monthly tables and go back to the filters page.
pub(crate) async fn refresh_catalog_endpoint(
    State(state): State<CatalogState>,
) -> Result<Redirect, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    state.catalog.refresh(&connection)?;

    Ok(Redirect::to(endpoints::FILTERS_VIEW))
}

#[cfg(test)]
mod scan_tests {
    use rusqlite::Connection;

    use crate::db::create_month_table;

    use super::{TableDescriptor, parse_table_name, scan_tables};

    fn get_test_connection() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn scan_returns_tables_sorted_chronologically() {
        let conn = get_test_connection();
        create_month_table(&conn, 2023, 2).unwrap();
        create_month_table(&conn, 2022, 12).unwrap();
        create_month_table(&conn, 2023, 1).unwrap();

        let tables = scan_tables(&conn).expect("could not scan tables");

        let want = vec![
            TableDescriptor {
                physical_name: "neft_december_2022".to_owned(),
                year: 2022,
                month: 12,
            },
            TableDescriptor {
                physical_name: "neft_january_2023".to_owned(),
                year: 2023,
                month: 1,
            },
            TableDescriptor {
                physical_name: "neft_february_2023".to_owned(),
                year: 2023,
                month: 2,
            },
        ];
        assert_eq!(tables, want);
    }

    #[test]
    fn scan_skips_tables_with_invalid_names() {
        let conn = get_test_connection();
        create_month_table(&conn, 2023, 1).unwrap();
        conn.execute_batch(
            "CREATE TABLE neft_xyz_2023 (bank_name TEXT);
            CREATE TABLE neft_january_23 (bank_name TEXT);
            CREATE TABLE banks (bank_name TEXT);
            CREATE TABLE neft_summary (bank_name TEXT);",
        )
        .unwrap();

        let tables = scan_tables(&conn).expect("could not scan tables");

        assert_eq!(tables.len(), 1, "only neft_january_2023 should be found");
        assert_eq!(tables[0].physical_name, "neft_january_2023");
    }

    #[test]
    fn scan_on_empty_database_returns_empty_list() {
        let conn = get_test_connection();

        let tables = scan_tables(&conn).expect("could not scan tables");

        assert!(tables.is_empty());
    }

    #[test]
    fn scan_drops_duplicate_year_month_tables() {
        let conn = get_test_connection();
        create_month_table(&conn, 2023, 1).unwrap();
        // Same (year, month) under a different name must not double totals.
        conn.execute("CREATE TABLE neft_January_2023 (bank_name TEXT)", ())
            .unwrap();

        let tables = scan_tables(&conn).expect("could not scan tables");

        assert_eq!(tables.len(), 1);
        // "neft_January_2023" sorts before "neft_january_2023", so it wins.
        assert_eq!(tables[0].physical_name, "neft_January_2023");
    }

    #[test]
    fn parses_valid_table_names() {
        assert_eq!(parse_table_name("neft_january_2023"), Some((2023, 1)));
        assert_eq!(parse_table_name("neft_DECEMBER_2019"), Some((2019, 12)));
    }

    #[test]
    fn rejects_malformed_table_names() {
        assert_eq!(parse_table_name("neft_xyz_2023"), None);
        assert_eq!(parse_table_name("neft_january_23"), None);
        assert_eq!(parse_table_name("neft_january"), None);
        assert_eq!(parse_table_name("rtgs_january_2023"), None);
        assert_eq!(parse_table_name("neft"), None);
    }
}

#[cfg(test)]
mod cache_tests {
    use rusqlite::Connection;

    use crate::db::create_month_table;

    use super::CatalogCache;

    #[test]
    fn get_memoizes_the_first_scan() {
        let conn = Connection::open_in_memory().unwrap();
        create_month_table(&conn, 2023, 1).unwrap();

        let cache = CatalogCache::default();
        let first = cache.get(&conn).unwrap();

        // A table added after the first scan is invisible until a refresh.
        create_month_table(&conn, 2023, 2).unwrap();
        let second = cache.get(&conn).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn refresh_picks_up_new_tables() {
        let conn = Connection::open_in_memory().unwrap();
        create_month_table(&conn, 2023, 1).unwrap();

        let cache = CatalogCache::default();
        cache.get(&conn).unwrap();

        create_month_table(&conn, 2023, 2).unwrap();
        let refreshed = cache.refresh(&conn).unwrap();

        assert_eq!(refreshed.len(), 2);
        assert_eq!(cache.get(&conn).unwrap().len(), 2);
    }
}
