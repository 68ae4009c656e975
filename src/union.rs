//! Builds the `UNION ALL` query that presents the monthly tables as one
//! logical relation.
//!
//! Query construction is pure text assembly over an in-memory descriptor
//! list, so it is unit-testable without a database. Execution happens in
//! [crate::report::queries].

use crate::catalog::TableDescriptor;

/// Column name for the bank in the logical relation.
pub(crate) const COL_BANK_NAME: &str = "bank_name";
/// Column name for the number of outward transactions.
pub(crate) const COL_OUT_COUNT: &str = "outward_count";
/// Column name for the outward amount in rupees.
pub(crate) const COL_OUT_AMOUNT: &str = "outward_amount";
/// Column name for the number of inward transactions.
pub(crate) const COL_IN_COUNT: &str = "inward_count";
/// Column name for the inward amount in rupees.
pub(crate) const COL_IN_AMOUNT: &str = "inward_amount";
/// Column name for the year injected from the table name.
pub(crate) const COL_YEAR: &str = "year";
/// Column name for the month injected from the table name.
pub(crate) const COL_MONTH: &str = "month";

/// Build the `UNION ALL` subquery over all monthly tables in `tables`.
///
/// Each branch selects the same base columns in the same order and tags its
/// rows with the year and month parsed from that table's name, so downstream
/// queries can filter and group across periods as if the data lived in one
/// table. `UNION ALL` keeps every source row (no deduplication).
///
/// Returns `None` when `tables` is empty since a union with no branches is
/// not valid SQL; callers must treat that as the "no data" case.
pub(crate) fn build_union_query(tables: &[TableDescriptor]) -> Option<String> {
    if tables.is_empty() {
        return None;
    }

    let selects: Vec<String> = tables
        .iter()
        .map(|table| {
            format!(
                "SELECT {COL_BANK_NAME}, {COL_OUT_COUNT}, {COL_OUT_AMOUNT}, \
                {COL_IN_COUNT}, {COL_IN_AMOUNT}, \
                {year} AS {COL_YEAR}, {month} AS {COL_MONTH} \
                FROM \"{name}\"",
                year = table.year,
                month = table.month,
                name = table.physical_name,
            )
        })
        .collect();

    Some(selects.join(" UNION ALL "))
}

#[cfg(test)]
mod union_tests {
    use crate::catalog::TableDescriptor;

    use super::build_union_query;

    fn descriptor(name: &str, year: i32, month: u8) -> TableDescriptor {
        TableDescriptor {
            physical_name: name.to_owned(),
            year,
            month,
        }
    }

    #[test]
    fn empty_catalog_builds_no_query() {
        assert_eq!(build_union_query(&[]), None);
    }

    #[test]
    fn single_table_builds_one_select() {
        let tables = [descriptor("neft_january_2023", 2023, 1)];

        let query = build_union_query(&tables).expect("query should be built");

        assert!(!query.contains("UNION ALL"));
        assert!(query.contains("2023 AS year"));
        assert!(query.contains("1 AS month"));
        assert!(query.contains("FROM \"neft_january_2023\""));
    }

    #[test]
    fn branches_are_joined_in_descriptor_order() {
        let tables = [
            descriptor("neft_january_2023", 2023, 1),
            descriptor("neft_february_2023", 2023, 2),
        ];

        let query = build_union_query(&tables).expect("query should be built");

        let january = query.find("neft_january_2023").unwrap();
        let february = query.find("neft_february_2023").unwrap();
        assert!(january < february, "branches should follow catalog order");
        assert_eq!(query.matches("UNION ALL").count(), 1);
    }

    #[test]
    fn every_branch_selects_the_same_columns() {
        let tables = [
            descriptor("neft_january_2023", 2023, 1),
            descriptor("neft_february_2023", 2023, 2),
            descriptor("neft_march_2023", 2023, 3),
        ];

        let query = build_union_query(&tables).expect("query should be built");

        let column_list = "SELECT bank_name, outward_count, outward_amount, \
            inward_count, inward_amount,";
        assert_eq!(query.matches(column_list).count(), tables.len());
    }

    #[test]
    fn literals_come_from_the_table_name_not_the_data() {
        let tables = [descriptor("neft_december_2019", 2019, 12)];

        let query = build_union_query(&tables).expect("query should be built");

        assert!(query.contains("2019 AS year"));
        assert!(query.contains("12 AS month"));
    }
}
