//! Report module
//!
//! Answers filter and aggregation queries over the logical union of the
//! monthly tables, and renders the listing, filter, and chart pages.

use std::sync::{Arc, Mutex};

use axum::{
    extract::FromRef,
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState,
    catalog::CatalogCache,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

mod charts;
mod charts_page;
mod filters_page;
mod models;
mod queries;
mod transactions_page;

pub(crate) use charts_page::{
    get_top_banks_by_count_page, get_top_banks_by_value_page, get_value_chart_page,
    get_volume_chart_page,
};
pub(crate) use filters_page::get_filters_page;
pub(crate) use transactions_page::get_transactions_page;

/// The state needed for answering report queries.
#[derive(Debug, Clone)]
pub(crate) struct ReportState {
    /// The database connection holding the monthly tables.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The cached table catalog.
    pub catalog: Arc<CatalogCache>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            catalog: state.catalog.clone(),
        }
    }
}

/// The page shown by every view when no monthly tables exist yet.
pub(crate) fn no_data_response() -> Response {
    let nav_bar = NavBar::new(endpoints::ROOT).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "No monthly NEFT tables were found in the database.
                Tables must be named like 'neft_january_2023'. Load some data
                (the create_test_db binary makes a sample database) and
                refresh the catalog from the filters page."
            }
        }
    );

    base("No Data", &[], &content).into_response()
}
