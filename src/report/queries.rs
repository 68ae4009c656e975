//! The SQL queries behind the listing, filter, and chart pages.
//!
//! Every query runs against the union of the monthly tables built by
//! [build_union_query], so callers never name a physical table. All of them
//! return [Error::NoDataAvailable] before touching SQL when the catalog is
//! empty.

use rusqlite::{Connection, Row, ToSql};

use crate::{
    Error,
    catalog::TableDescriptor,
    union::{
        COL_BANK_NAME, COL_IN_AMOUNT, COL_IN_COUNT, COL_MONTH, COL_OUT_AMOUNT, COL_OUT_COUNT,
        COL_YEAR, build_union_query,
    },
};

use super::models::{BankMonthRecord, BankTotal, FilterCriteria, FilterOptions, TrendPoint};

/// How many banks the top banks charts show.
pub(crate) const TOP_BANKS_LIMIT: u32 = 10;

/// One crore in rupees; chart values are reported in crore.
pub(crate) const CRORE_DIVISOR: f64 = 10_000_000.0;

/// The union of every monthly table, or [Error::NoDataAvailable] when there
/// are none.
fn combined_tables(tables: &[TableDescriptor]) -> Result<String, Error> {
    build_union_query(tables).ok_or(Error::NoDataAvailable)
}

/// Get the distinct values for the bank, year, and month dropdowns.
///
/// Banks come back alphabetically, years newest first, and months in
/// calendar order.
///
/// # Errors
/// Returns [Error::NoDataAvailable] if no monthly tables exist, or
/// [Error::SqlError] if a query fails.
pub(crate) fn get_filter_options(
    connection: &Connection,
    tables: &[TableDescriptor],
) -> Result<FilterOptions, Error> {
    let combined = combined_tables(tables)?;

    let banks = connection
        .prepare(&format!(
            "SELECT DISTINCT {COL_BANK_NAME} FROM ({combined}) ORDER BY {COL_BANK_NAME} ASC"
        ))?
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;

    let years = connection
        .prepare(&format!(
            "SELECT DISTINCT {COL_YEAR} FROM ({combined}) ORDER BY {COL_YEAR} DESC"
        ))?
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<i32>, _>>()?;

    let months = connection
        .prepare(&format!(
            "SELECT DISTINCT {COL_MONTH} FROM ({combined}) ORDER BY {COL_MONTH} ASC"
        ))?
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<u8>, _>>()?;

    Ok(FilterOptions {
        banks,
        years,
        months,
    })
}

/// Get the rows matching `criteria`, newest month first and banks
/// alphabetical within a month.
///
/// Criteria left as [Filter::All](super::models::Filter::All) do not
/// constrain the listing; the rest are ANDed together and bound as query
/// parameters.
///
/// # Errors
/// Returns [Error::NoDataAvailable] if no monthly tables exist, or
/// [Error::SqlError] if the query fails.
pub(crate) fn get_filtered_records(
    connection: &Connection,
    tables: &[TableDescriptor],
    criteria: &FilterCriteria,
) -> Result<Vec<BankMonthRecord>, Error> {
    let combined = combined_tables(tables)?;

    let mut conditions = Vec::new();
    let mut params: Vec<(&str, &dyn ToSql)> = Vec::new();

    if let Some(bank) = criteria.bank.selected() {
        conditions.push(format!("{COL_BANK_NAME} = :bank"));
        params.push((":bank", bank));
    }

    if let Some(year) = criteria.year.selected() {
        conditions.push(format!("{COL_YEAR} = :year"));
        params.push((":year", year));
    }

    if let Some(month) = criteria.month.selected() {
        conditions.push(format!("{COL_MONTH} = :month"));
        params.push((":month", month));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let records = connection
        .prepare(&format!(
            "SELECT {COL_BANK_NAME}, {COL_OUT_COUNT}, {COL_OUT_AMOUNT}, \
            {COL_IN_COUNT}, {COL_IN_AMOUNT}, {COL_YEAR}, {COL_MONTH} \
            FROM ({combined}){where_clause} \
            ORDER BY {COL_YEAR} DESC, {COL_MONTH} DESC, {COL_BANK_NAME} ASC"
        ))?
        .query_map(&params[..], map_bank_month_record)?
        .collect::<Result<_, _>>()?;

    Ok(records)
}

fn map_bank_month_record(row: &Row) -> Result<BankMonthRecord, rusqlite::Error> {
    Ok(BankMonthRecord {
        bank_name: row.get(0)?,
        outward_count: row.get(1)?,
        outward_amount: row.get(2)?,
        inward_count: row.get(3)?,
        inward_amount: row.get(4)?,
        year: row.get(5)?,
        month: row.get(6)?,
    })
}

/// Get the total transaction count (inward plus outward) per month, oldest
/// month first.
///
/// # Errors
/// Returns [Error::NoDataAvailable] if no monthly tables exist, or
/// [Error::SqlError] if the query fails.
pub(crate) fn monthly_count_trend(
    connection: &Connection,
    tables: &[TableDescriptor],
) -> Result<Vec<TrendPoint>, Error> {
    let combined = combined_tables(tables)?;

    let points = connection
        .prepare(&format!(
            "SELECT {COL_YEAR}, {COL_MONTH}, \
            SUM({COL_IN_COUNT} + {COL_OUT_COUNT}) AS total \
            FROM ({combined}) \
            GROUP BY {COL_YEAR}, {COL_MONTH} \
            ORDER BY {COL_YEAR} ASC, {COL_MONTH} ASC"
        ))?
        .query_map([], map_trend_point)?
        .collect::<Result<_, _>>()?;

    Ok(points)
}

/// Get the total transaction value (inward plus outward) per month in crore,
/// oldest month first.
///
/// # Errors
/// Returns [Error::NoDataAvailable] if no monthly tables exist, or
/// [Error::SqlError] if the query fails.
pub(crate) fn monthly_value_trend(
    connection: &Connection,
    tables: &[TableDescriptor],
) -> Result<Vec<TrendPoint>, Error> {
    let combined = combined_tables(tables)?;

    let points = connection
        .prepare(&format!(
            "SELECT {COL_YEAR}, {COL_MONTH}, \
            SUM({COL_IN_AMOUNT} + {COL_OUT_AMOUNT}) / {CRORE_DIVISOR} AS total \
            FROM ({combined}) \
            GROUP BY {COL_YEAR}, {COL_MONTH} \
            ORDER BY {COL_YEAR} ASC, {COL_MONTH} ASC"
        ))?
        .query_map([], map_trend_point)?
        .collect::<Result<_, _>>()?;

    Ok(points)
}

fn map_trend_point(row: &Row) -> Result<TrendPoint, rusqlite::Error> {
    Ok(TrendPoint {
        year: row.get(0)?,
        month: row.get(1)?,
        total: row.get(2)?,
    })
}

/// Get the ten banks with the most transactions across every month, busiest
/// first.
///
/// # Errors
/// Returns [Error::NoDataAvailable] if no monthly tables exist, or
/// [Error::SqlError] if the query fails.
pub(crate) fn top_banks_by_count(
    connection: &Connection,
    tables: &[TableDescriptor],
) -> Result<Vec<BankTotal>, Error> {
    let combined = combined_tables(tables)?;

    let totals = connection
        .prepare(&format!(
            "SELECT {COL_BANK_NAME}, \
            SUM({COL_IN_COUNT} + {COL_OUT_COUNT}) AS total \
            FROM ({combined}) \
            GROUP BY {COL_BANK_NAME} \
            ORDER BY total DESC \
            LIMIT {TOP_BANKS_LIMIT}"
        ))?
        .query_map([], map_bank_total)?
        .collect::<Result<_, _>>()?;

    Ok(totals)
}

/// Get the ten banks with the highest transaction value across every month
/// in crore, highest first.
///
/// # Errors
/// Returns [Error::NoDataAvailable] if no monthly tables exist, or
/// [Error::SqlError] if the query fails.
pub(crate) fn top_banks_by_value(
    connection: &Connection,
    tables: &[TableDescriptor],
) -> Result<Vec<BankTotal>, Error> {
    let combined = combined_tables(tables)?;

    let totals = connection
        .prepare(&format!(
            "SELECT {COL_BANK_NAME}, \
            SUM({COL_IN_AMOUNT} + {COL_OUT_AMOUNT}) / {CRORE_DIVISOR} AS total \
            FROM ({combined}) \
            GROUP BY {COL_BANK_NAME} \
            ORDER BY total DESC \
            LIMIT {TOP_BANKS_LIMIT}"
        ))?
        .query_map([], map_bank_total)?
        .collect::<Result<_, _>>()?;

    Ok(totals)
}

fn map_bank_total(row: &Row) -> Result<BankTotal, rusqlite::Error> {
    Ok(BankTotal {
        bank_name: row.get(0)?,
        total: row.get(1)?,
    })
}
