//! A web dashboard for monthly NEFT (National Electronic Funds Transfer)
//! statistics published per bank.
//!
//! Each month of data lives in its own physical SQLite table named
//! `neft_<monthname>_<year>`. The crate discovers those tables at runtime,
//! combines them into one logical relation with a `UNION ALL` query, and
//! serves filtered listings and charts over that relation as HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod catalog;
mod db;
mod endpoints;
mod html;
mod month;
mod navigation;
mod not_found;
mod report;
mod routing;
mod union;

pub use app_state::AppState;
pub use db::{create_month_table, insert_bank_row, open_database};
pub use routing::build_router;

use crate::html::error_view;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// No tables matching the `neft_<monthname>_<year>` naming convention
    /// exist in the database, so there is nothing to query.
    ///
    /// This is the "no data" state, not a failure of the process: pages
    /// render a prompt explaining how to load data instead of an error.
    #[error("no monthly NEFT tables were found in the database")]
    NoDataAvailable,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    ///
    /// Execution-time failures are always surfaced to the caller with their
    /// diagnostic detail, never turned into a misleadingly empty result.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The database could not be opened, even after retrying.
    #[error("could not open the database: {0}")]
    DatabaseOpenError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => not_found::get_404_not_found_response(),
            Error::NoDataAvailable => report::no_data_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    error_view(
                        "Something went wrong",
                        "500",
                        "Sorry, something went wrong.",
                        "Try again later or check the server logs.",
                    ),
                )
                    .into_response()
            }
        }
    }
}
