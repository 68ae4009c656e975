//! The transactions listing: every bank-month row matching the selected
//! filters, newest month first, with a volume chart when a single bank is
//! selected.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, endpoints,
    html::{
        ECHARTS_SCRIPT_URL, HeadElement, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_crore, link,
    },
    month::month_year_label,
    navigation::NavBar,
};

use super::{
    ReportState,
    charts::{ReportChart, bank_volume_chart, chart_view, charts_script},
    models::{BankMonthRecord, FilterCriteria, RawFilterQuery},
    queries::{self, CRORE_DIVISOR},
};

/// Display the rows matching the query string filters.
///
/// Unknown filter values fall back to showing everything. When the rows are
/// filtered to one bank, the page also charts that bank's monthly volume.
pub(crate) async fn get_transactions_page(
    State(state): State<ReportState>,
    Query(query): Query<RawFilterQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let tables = state.catalog.get(&connection)?;

    let criteria = FilterCriteria::from_query(&query);
    let records = queries::get_filtered_records(&connection, &tables, &criteria)?;

    let bank_chart = match criteria.bank.selected() {
        Some(bank) if !records.is_empty() => Some(ReportChart {
            id: "bank-volume-chart",
            options: bank_volume_chart(bank, &records).to_string(),
        }),
        _ => None,
    };

    Ok(transactions_view(&criteria, &records, bank_chart.as_ref()).into_response())
}

fn transactions_view(
    criteria: &FilterCriteria,
    records: &[BankMonthRecord],
    bank_chart: Option<&ReportChart>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let head_elements = match bank_chart {
        Some(chart) => vec![
            HeadElement::ScriptLink(ECHARTS_SCRIPT_URL.to_owned()),
            charts_script(std::slice::from_ref(chart)),
        ],
        None => Vec::new(),
    };

    let content = html!(
        (nav_bar)

        div class="px-6 py-8 mx-auto lg:py-5 max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="flex items-center justify-between mb-4"
            {
                h2 class="text-xl font-bold" { "Transactions" }

                p { (filter_summary(criteria)) " " (link(endpoints::FILTERS_VIEW, "Change filters")) }
            }

            @if let Some(chart) = bank_chart {
                (chart_view(chart))
            }

            @if records.is_empty() {
                p { "No transactions match the selected filters." }
            } @else {
                div class="relative overflow-x-auto shadow rounded"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Bank" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Outward Count" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Outward Amount (₹)" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Inward Count" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Inward Amount (₹)" }
                            }
                        }

                        tbody
                        {
                            @for record in records {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE) { (record.bank_name) }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (month_year_label(record.year, record.month))
                                    }
                                    td class=(TABLE_CELL_STYLE) { (record.outward_count) }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (format!("{:.2}", record.outward_amount))
                                    }
                                    td class=(TABLE_CELL_STYLE) { (record.inward_count) }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (format!("{:.2}", record.inward_amount))
                                    }
                                }
                            }
                        }
                    }
                }

                p class="mt-4 text-sm"
                {
                    (totals_summary(records))
                }
            }
        }
    );

    base("Transactions", &head_elements, &content)
}

fn totals_summary(records: &[BankMonthRecord]) -> String {
    let transaction_count: i64 = records
        .iter()
        .map(|record| record.inward_count + record.outward_count)
        .sum();
    let total_value: f64 = records
        .iter()
        .map(|record| record.inward_amount + record.outward_amount)
        .sum();

    format!(
        "{} rows, {} transactions totalling {}.",
        records.len(),
        transaction_count,
        format_crore(total_value / CRORE_DIVISOR),
    )
}

fn filter_summary(criteria: &FilterCriteria) -> String {
    let mut parts = Vec::new();

    if let Some(bank) = criteria.bank.selected() {
        parts.push(format!("bank {bank}"));
    }

    if let Some(year) = criteria.year.selected() {
        parts.push(format!("year {year}"));
    }

    if let Some(month) = criteria.month.selected() {
        parts.push(format!("month {month}"));
    }

    if parts.is_empty() {
        "Showing all months and banks.".to_owned()
    } else {
        format!("Filtered by {}.", parts.join(", "))
    }
}
