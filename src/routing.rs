//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};

use crate::{
    AppState,
    catalog::refresh_catalog_endpoint,
    endpoints,
    not_found::get_404_not_found,
    report::{
        get_filters_page, get_top_banks_by_count_page, get_top_banks_by_value_page,
        get_transactions_page, get_value_chart_page, get_volume_chart_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::FILTERS_VIEW, get(get_filters_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(endpoints::VOLUME_CHART_VIEW, get(get_volume_chart_page))
        .route(endpoints::VALUE_CHART_VIEW, get(get_value_chart_page))
        .route(
            endpoints::TOP_BANKS_BY_COUNT_VIEW,
            get(get_top_banks_by_count_page),
        )
        .route(
            endpoints::TOP_BANKS_BY_VALUE_VIEW,
            get(get_top_banks_by_value_page),
        )
        .route(endpoints::REFRESH_CATALOG, post(refresh_catalog_endpoint))
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::TRANSACTIONS_VIEW)
}

#[cfg(test)]
mod routing_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header::LOCATION},
    };
    use rusqlite::Connection;
    use tower::ServiceExt;

    use crate::{
        AppState,
        db::{create_month_table, insert_bank_row},
        endpoints,
    };

    use super::build_router;

    fn get_test_router() -> axum::Router {
        let conn = Connection::open_in_memory().unwrap();
        create_month_table(&conn, 2023, 1).unwrap();
        insert_bank_row(&conn, 2023, 1, "Axis", 20, 200.0, 10, 100.0).unwrap();

        build_router(AppState::new(conn))
    }

    async fn get(router: axum::Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn root_redirects_to_transactions() {
        let response = get(get_test_router(), endpoints::ROOT).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            endpoints::TRANSACTIONS_VIEW
        );
    }

    #[tokio::test]
    async fn every_view_responds_ok() {
        for uri in [
            endpoints::FILTERS_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::VOLUME_CHART_VIEW,
            endpoints::VALUE_CHART_VIEW,
            endpoints::TOP_BANKS_BY_COUNT_VIEW,
            endpoints::TOP_BANKS_BY_VALUE_VIEW,
        ] {
            let response = get(get_test_router(), uri).await;

            assert_eq!(response.status(), StatusCode::OK, "GET {uri} should be OK");
        }
    }

    #[tokio::test]
    async fn refresh_catalog_redirects_to_filters() {
        let router = get_test_router();

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(endpoints::REFRESH_CATALOG)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).unwrap(),
            endpoints::FILTERS_VIEW
        );
    }

    #[tokio::test]
    async fn unknown_path_returns_404() {
        let response = get(get_test_router(), "/no-such-page").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
