//! The filters page: dropdowns of the distinct banks, years, and months in
//! the data, submitting to the transactions listing.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error, endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE, PAGE_CONTAINER_STYLE, base},
    month::month_name,
    navigation::NavBar,
};

use super::{
    ReportState,
    models::{Filter, FilterCriteria, FilterOptions, RawFilterQuery},
    queries,
};

/// Display the filter form, with the current selection (if any) preselected.
pub(crate) async fn get_filters_page(
    State(state): State<ReportState>,
    Query(query): Query<RawFilterQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;
    let tables = state.catalog.get(&connection)?;

    // Wrap the distinct-value queries in one read transaction so the three
    // dropdowns always describe the same snapshot of the data.
    let transaction = connection.unchecked_transaction()?;
    let options = queries::get_filter_options(&transaction, &tables)?;
    drop(transaction);

    let criteria = FilterCriteria::from_query(&query);

    Ok(filters_view(&options, &criteria).into_response())
}

fn filters_view(options: &FilterOptions, criteria: &FilterCriteria) -> Markup {
    let nav_bar = NavBar::new(endpoints::FILTERS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md p-6 bg-white rounded-lg shadow dark:bg-gray-800"
            {
                h2 class="mb-4 text-xl font-bold"
                {
                    "Filter Transactions"
                }

                form method="get" action=(endpoints::TRANSACTIONS_VIEW) class="space-y-4"
                {
                    div
                    {
                        label for="bank" class=(FORM_LABEL_STYLE) { "Bank" }

                        select id="bank" name="bank" class=(FORM_SELECT_STYLE)
                        {
                            option value="all" { "All" }

                            @for bank in &options.banks {
                                option
                                    value=(bank)
                                    selected[criteria.bank == Filter::Only(bank.clone())]
                                {
                                    (bank)
                                }
                            }
                        }
                    }

                    div
                    {
                        label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                        select id="year" name="year" class=(FORM_SELECT_STYLE)
                        {
                            option value="all" { "All" }

                            @for year in &options.years {
                                option
                                    value=(year)
                                    selected[criteria.year == Filter::Only(*year)]
                                {
                                    (year)
                                }
                            }
                        }
                    }

                    div
                    {
                        label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                        select id="month" name="month" class=(FORM_SELECT_STYLE)
                        {
                            option value="all" { "All" }

                            @for month in &options.months {
                                option
                                    value=(month)
                                    selected[criteria.month == Filter::Only(*month)]
                                {
                                    (month_name(*month).unwrap_or("Unknown"))
                                }
                            }
                        }
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Show Transactions"
                    }
                }

                form method="post" action=(endpoints::REFRESH_CATALOG) class="mt-4"
                {
                    button
                        type="submit"
                        class="w-full px-4 py-2 text-sm text-gray-900 dark:text-white
                            bg-gray-50 dark:bg-gray-700 border border-gray-300
                            dark:border-gray-600 rounded hover:bg-gray-100
                            dark:hover:bg-gray-600"
                    {
                        "Refresh Table Catalog"
                    }
                }
            }
        }
    );

    base("Filters", &[], &content)
}
