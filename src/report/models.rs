//! The types that report queries accept and produce.

use std::str::FromStr;

use serde::Deserialize;

/// A single criterion that either matches everything or one exact value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter<T> {
    /// Match every row (the "all" option in the UI).
    #[default]
    All,
    /// Match rows whose column equals the value exactly.
    Only(T),
}

impl<T> Filter<T> {
    /// The selected value, or `None` when the filter matches everything.
    pub fn selected(&self) -> Option<&T> {
        match self {
            Filter::All => None,
            Filter::Only(value) => Some(value),
        }
    }
}

impl<T: FromStr> Filter<T> {
    /// Parse a raw query string value into a filter.
    ///
    /// A missing, empty, or literal "all" value (any case) matches
    /// everything. So does a value that does not parse as a `T`, since a
    /// hand-edited URL should degrade to the unfiltered view rather than
    /// error.
    fn parse(raw: Option<&str>) -> Self {
        let raw = match raw {
            Some(raw) if !raw.is_empty() && !raw.eq_ignore_ascii_case("all") => raw,
            _ => return Filter::All,
        };

        match raw.parse() {
            Ok(value) => Filter::Only(value),
            Err(_) => {
                tracing::debug!("ignoring unparsable filter value {raw:?}");
                Filter::All
            }
        }
    }
}

/// The raw, unvalidated filter values from the URL query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFilterQuery {
    /// The raw bank name, if given.
    pub bank: Option<String>,
    /// The raw year, if given.
    pub year: Option<String>,
    /// The raw month number, if given.
    pub month: Option<String>,
}

/// The validated filter criteria for the transactions listing.
///
/// Criteria set to [Filter::All] do not constrain the listing; the rest are
/// combined with AND.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// Restrict rows to one bank.
    pub bank: Filter<String>,
    /// Restrict rows to one year.
    pub year: Filter<i32>,
    /// Restrict rows to one month (1-12).
    pub month: Filter<u8>,
}

impl FilterCriteria {
    /// Validate raw query string values, falling back to [Filter::All] for
    /// anything missing or malformed.
    pub fn from_query(query: &RawFilterQuery) -> Self {
        let month = match Filter::<u8>::parse(query.month.as_deref()) {
            Filter::Only(month) if !(1..=12).contains(&month) => {
                tracing::debug!("ignoring out of range month filter {month}");
                Filter::All
            }
            month => month,
        };

        Self {
            bank: Filter::parse(query.bank.as_deref()),
            year: Filter::parse(query.year.as_deref()),
            month,
        }
    }
}

/// The distinct values available for each filter dropdown.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterOptions {
    /// Bank names in alphabetical order.
    pub banks: Vec<String>,
    /// Years in descending order, newest first.
    pub years: Vec<i32>,
    /// Month numbers in ascending order.
    pub months: Vec<u8>,
}

/// One bank's row from one monthly table.
#[derive(Debug, Clone, PartialEq)]
pub struct BankMonthRecord {
    /// The reporting bank.
    pub bank_name: String,
    /// Count of outward transactions.
    pub outward_count: i64,
    /// Value of outward transactions in rupees.
    pub outward_amount: f64,
    /// Count of inward transactions.
    pub inward_count: i64,
    /// Value of inward transactions in rupees.
    pub inward_amount: f64,
    /// The year the monthly table covers.
    pub year: i32,
    /// The month (1-12) the monthly table covers.
    pub month: u8,
}

/// One month's total in a trend series, ordered chronologically.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    /// The year of the month this point covers.
    pub year: i32,
    /// The month (1-12) this point covers.
    pub month: u8,
    /// The total for the month: a transaction count, or a value in crore.
    pub total: f64,
}

/// One bank's total across every month, for the top banks charts.
#[derive(Debug, Clone, PartialEq)]
pub struct BankTotal {
    /// The reporting bank.
    pub bank_name: String,
    /// The bank's total: a transaction count, or a value in crore.
    pub total: f64,
}

#[cfg(test)]
mod filter_tests {
    use super::{Filter, FilterCriteria, RawFilterQuery};

    fn query(bank: Option<&str>, year: Option<&str>, month: Option<&str>) -> RawFilterQuery {
        RawFilterQuery {
            bank: bank.map(str::to_owned),
            year: year.map(str::to_owned),
            month: month.map(str::to_owned),
        }
    }

    #[test]
    fn missing_values_match_everything() {
        let criteria = FilterCriteria::from_query(&query(None, None, None));

        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn the_all_sentinel_matches_everything_in_any_case() {
        let criteria = FilterCriteria::from_query(&query(Some("all"), Some("All"), Some("ALL")));

        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn valid_values_become_exact_criteria() {
        let criteria =
            FilterCriteria::from_query(&query(Some("State Bank"), Some("2023"), Some("2")));

        assert_eq!(criteria.bank, Filter::Only("State Bank".to_owned()));
        assert_eq!(criteria.year, Filter::Only(2023));
        assert_eq!(criteria.month, Filter::Only(2));
    }

    #[test]
    fn unparsable_values_fall_back_to_all() {
        let criteria =
            FilterCriteria::from_query(&query(None, Some("not-a-year"), Some("not-a-month")));

        assert_eq!(criteria.year, Filter::All);
        assert_eq!(criteria.month, Filter::All);
    }

    #[test]
    fn out_of_range_month_falls_back_to_all() {
        let criteria = FilterCriteria::from_query(&query(None, None, Some("13")));

        assert_eq!(criteria.month, Filter::All);

        let criteria = FilterCriteria::from_query(&query(None, None, Some("0")));

        assert_eq!(criteria.month, Filter::All);
    }

    #[test]
    fn empty_strings_match_everything() {
        let criteria = FilterCriteria::from_query(&query(Some(""), Some(""), Some("")));

        assert_eq!(criteria, FilterCriteria::default());
    }
}
