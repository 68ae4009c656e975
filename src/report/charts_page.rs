//! The four chart pages: monthly volume and value trends, and the top banks
//! by count and by value.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, endpoints,
    html::{ECHARTS_SCRIPT_URL, HeadElement, base},
    navigation::NavBar,
};

use super::{
    ReportState,
    charts::{
        ReportChart, chart_view, charts_script, top_banks_by_count_chart, top_banks_by_value_chart,
        value_trend_chart, volume_trend_chart,
    },
    queries,
};

/// Display the total transaction count per month as a line chart.
pub(crate) async fn get_volume_chart_page(
    State(state): State<ReportState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let tables = state.catalog.get(&connection)?;

    let points = queries::monthly_count_trend(&connection, &tables)?;
    let chart = ReportChart {
        id: "volume-chart",
        options: volume_trend_chart(&points).to_string(),
    };

    Ok(chart_page(endpoints::VOLUME_CHART_VIEW, "Monthly Volume", &chart).into_response())
}

/// Display the total transaction value per month, in crore, as a line chart.
pub(crate) async fn get_value_chart_page(
    State(state): State<ReportState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let tables = state.catalog.get(&connection)?;

    let points = queries::monthly_value_trend(&connection, &tables)?;
    let chart = ReportChart {
        id: "value-chart",
        options: value_trend_chart(&points).to_string(),
    };

    Ok(chart_page(endpoints::VALUE_CHART_VIEW, "Monthly Value", &chart).into_response())
}

/// Display the ten banks with the most transactions as a bar chart.
pub(crate) async fn get_top_banks_by_count_page(
    State(state): State<ReportState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let tables = state.catalog.get(&connection)?;

    let totals = queries::top_banks_by_count(&connection, &tables)?;
    let chart = ReportChart {
        id: "top-banks-by-count-chart",
        options: top_banks_by_count_chart(&totals).to_string(),
    };

    Ok(
        chart_page(
            endpoints::TOP_BANKS_BY_COUNT_VIEW,
            "Top Banks by Count",
            &chart,
        )
        .into_response(),
    )
}

/// Display the ten banks with the highest transaction value as a bar chart.
pub(crate) async fn get_top_banks_by_value_page(
    State(state): State<ReportState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let tables = state.catalog.get(&connection)?;

    let totals = queries::top_banks_by_value(&connection, &tables)?;
    let chart = ReportChart {
        id: "top-banks-by-value-chart",
        options: top_banks_by_value_chart(&totals).to_string(),
    };

    Ok(
        chart_page(
            endpoints::TOP_BANKS_BY_VALUE_VIEW,
            "Top Banks by Value",
            &chart,
        )
        .into_response(),
    )
}

fn chart_page(active_endpoint: &str, title: &str, chart: &ReportChart) -> Markup {
    let nav_bar = NavBar::new(active_endpoint).into_html();

    let content = html!(
        (nav_bar)

        div class="px-6 py-8 mx-auto lg:py-5 max-w-screen-xl"
        {
            (chart_view(chart))
        }
    );

    base(
        title,
        &[
            HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
            charts_script(std::slice::from_ref(chart)),
        ],
        &content,
    )
}

#[cfg(test)]
mod chart_page_tests {
    use axum::{
        body::Body,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{
        AppState,
        db::{create_month_table, insert_bank_row},
        report::ReportState,
    };

    use super::{
        get_top_banks_by_count_page, get_top_banks_by_value_page, get_value_chart_page,
        get_volume_chart_page,
    };

    fn get_test_state() -> ReportState {
        let conn = Connection::open_in_memory().unwrap();
        create_month_table(&conn, 2023, 1).unwrap();
        insert_bank_row(&conn, 2023, 1, "Axis", 20, 20_000_000.0, 10, 10_000_000.0).unwrap();

        let app_state = AppState::new(conn);

        ReportState {
            db_connection: app_state.db_connection.clone(),
            catalog: app_state.catalog.clone(),
        }
    }

    fn get_empty_state() -> ReportState {
        let app_state = AppState::new(Connection::open_in_memory().unwrap());

        ReportState {
            db_connection: app_state.db_connection.clone(),
            catalog: app_state.catalog.clone(),
        }
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[tokio::test]
    async fn volume_chart_page_renders_chart_container() {
        let response = get_volume_chart_page(State(get_test_state()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        let selector = Selector::parse("#volume-chart").unwrap();
        assert!(html.select(&selector).next().is_some());
    }

    #[tokio::test]
    async fn value_chart_page_renders_chart_container() {
        let response = get_value_chart_page(State(get_test_state())).await.unwrap();

        let html = parse_html(response).await;
        let selector = Selector::parse("#value-chart").unwrap();
        assert!(html.select(&selector).next().is_some());
    }

    #[tokio::test]
    async fn top_banks_pages_render_chart_containers() {
        let response = get_top_banks_by_count_page(State(get_test_state()))
            .await
            .unwrap();
        let html = parse_html(response).await;
        let selector = Selector::parse("#top-banks-by-count-chart").unwrap();
        assert!(html.select(&selector).next().is_some());

        let response = get_top_banks_by_value_page(State(get_test_state()))
            .await
            .unwrap();
        let html = parse_html(response).await;
        let selector = Selector::parse("#top-banks-by-value-chart").unwrap();
        assert!(html.select(&selector).next().is_some());
    }

    #[tokio::test]
    async fn chart_page_without_tables_shows_no_data_prompt() {
        let error = get_volume_chart_page(State(get_empty_state()))
            .await
            .expect_err("empty database should report no data");

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert!(html.html().contains("Nothing here yet"));
    }
}
