//! Chart generation and rendering for the report pages.
//!
//! This module creates the ECharts visualizations over the monthly tables:
//! - **Monthly Volume**: Total transaction count per month
//! - **Monthly Value**: Total transaction value per month, in crore
//! - **Top Banks**: The ten busiest banks, by count or by value
//! - **Bank Volume**: One bank's monthly counts on the filtered listing
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a corresponding HTML container and JavaScript
//! initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Bar, Line},
};
use maud::{Markup, PreEscaped, html};

use crate::{html::HeadElement, month::month_year_label};

use super::models::{BankMonthRecord, BankTotal, TrendPoint};

/// A chart with its HTML container ID and ECharts configuration.
pub(super) struct ReportChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML container for a report chart.
pub(super) fn chart_view(chart: &ReportChart) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div
                id=(chart.id)
                class="min-h-[480px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// Generates JavaScript initialization code for report charts.
///
/// Creates a script that initializes an ECharts instance per chart with dark
/// mode support and responsive resizing.
pub(super) fn charts_script(charts: &[ReportChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

pub(super) fn volume_trend_chart(points: &[TrendPoint]) -> Chart {
    let (labels, values) = trend_labels_and_values(points);

    Chart::new()
        .title(
            Title::new()
                .text("Monthly Transaction Volume")
                .subtext("Inward and outward transactions per month"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("Transactions").data(values))
}

pub(super) fn value_trend_chart(points: &[TrendPoint]) -> Chart {
    let (labels, values) = trend_labels_and_values(points);

    Chart::new()
        .title(
            Title::new()
                .text("Monthly Transaction Value")
                .subtext("Inward and outward value per month, in crore"),
        )
        .tooltip(crore_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(crore_formatter())),
        )
        .series(Line::new().name("Value").data(values))
}

pub(super) fn top_banks_by_count_chart(totals: &[BankTotal]) -> Chart {
    let (labels, values) = bank_labels_and_values(totals);

    Chart::new()
        .title(
            Title::new()
                .text("Top Banks by Transaction Count")
                .subtext("Across every month on record"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Value))
        .y_axis(Axis::new().type_(AxisType::Category).data(labels))
        .series(Bar::new().name("Transactions").data(values))
}

pub(super) fn top_banks_by_value_chart(totals: &[BankTotal]) -> Chart {
    let (labels, values) = bank_labels_and_values(totals);

    Chart::new()
        .title(
            Title::new()
                .text("Top Banks by Transaction Value")
                .subtext("Across every month on record, in crore"),
        )
        .tooltip(crore_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(crore_formatter())),
        )
        .y_axis(Axis::new().type_(AxisType::Category).data(labels))
        .series(Bar::new().name("Value").data(values))
}

/// A chart of one bank's monthly transaction counts, shown on the listing
/// when it is filtered to a single bank.
///
/// The records arrive newest first, so the series is rebuilt oldest first.
pub(super) fn bank_volume_chart(bank_name: &str, records: &[BankMonthRecord]) -> Chart {
    let mut monthly: Vec<(&BankMonthRecord, i64)> = records
        .iter()
        .map(|record| (record, record.inward_count + record.outward_count))
        .collect();
    monthly.sort_by_key(|(record, _)| (record.year, record.month));

    let labels: Vec<String> = monthly
        .iter()
        .map(|(record, _)| month_year_label(record.year, record.month))
        .collect();
    let values: Vec<f64> = monthly.iter().map(|(_, total)| *total as f64).collect();

    Chart::new()
        .title(
            Title::new()
                .text(format!("Monthly Volume: {bank_name}"))
                .subtext("Inward and outward transactions per month"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Transactions").data(values))
}

fn trend_labels_and_values(points: &[TrendPoint]) -> (Vec<String>, Vec<f64>) {
    points
        .iter()
        .map(|point| (month_year_label(point.year, point.month), point.total))
        .unzip()
}

/// The busiest bank comes first in the query results, but a horizontal bar
/// chart draws its first category at the bottom, so the order is reversed.
fn bank_labels_and_values(totals: &[BankTotal]) -> (Vec<String>, Vec<f64>) {
    totals
        .iter()
        .rev()
        .map(|total| (total.bank_name.clone(), total.total))
        .unzip()
}

#[inline]
fn crore_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const croreFormatter = new Intl.NumberFormat('en-IN', {
              maximumFractionDigits: 2,
            });
            return (number) ? '\u{20B9}' + croreFormatter.format(number) + ' Cr' : \"-\";",
    )
}

/// Creates a tooltip configuration for values reported in crore.
fn crore_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(crore_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
