//! The application's route URIs.

/// The root route, which redirects to the transactions page.
pub const ROOT: &str = "/";
/// The page for choosing bank/year/month filters.
pub const FILTERS_VIEW: &str = "/filters";
/// The page listing (optionally filtered) monthly transaction rows.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The chart of total transaction counts per month.
pub const VOLUME_CHART_VIEW: &str = "/charts/volume";
/// The chart of total transaction value per month, in crore.
pub const VALUE_CHART_VIEW: &str = "/charts/value";
/// The chart of the ten banks with the most transactions.
pub const TOP_BANKS_BY_COUNT_VIEW: &str = "/charts/top-banks-by-count";
/// The chart of the ten banks with the highest transaction value.
pub const TOP_BANKS_BY_VALUE_VIEW: &str = "/charts/top-banks-by-value";

/// The route that rescans the database for monthly tables.
pub const REFRESH_CATALOG: &str = "/api/catalog/refresh";

// These tests are here so that we know the routes will parse as URIs.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::FILTERS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::VOLUME_CHART_VIEW);
        assert_endpoint_is_valid_uri(endpoints::VALUE_CHART_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TOP_BANKS_BY_COUNT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::TOP_BANKS_BY_VALUE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::REFRESH_CATALOG);
    }
}
