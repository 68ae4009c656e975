//! The month name table shared by table-name parsing and page labels.
//!
//! The scanner resolves month names found in physical table names against
//! this table, and the presentation layer uses the same table to label
//! months, so the two can never disagree.

/// English month names indexed by month number minus one.
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Resolve a month name to its number (1-12), ignoring case.
///
/// Returns `None` for anything that is not a full English month name.
pub fn month_number(name: &str) -> Option<u8> {
    MONTH_NAMES
        .iter()
        .position(|month_name| month_name.eq_ignore_ascii_case(name))
        .map(|index| (index + 1) as u8)
}

/// The full English name for a month number (1-12).
pub fn month_name(number: u8) -> Option<&'static str> {
    match number {
        1..=12 => Some(MONTH_NAMES[(number - 1) as usize]),
        _ => None,
    }
}

/// A short "Jan 2023" style label for chart axes and table cells.
pub fn month_year_label(year: i32, month: u8) -> String {
    match month_name(month) {
        Some(name) => format!("{} {}", &name[..3], year),
        None => format!("{}-{}", year, month),
    }
}

#[cfg(test)]
mod month_tests {
    use super::{month_name, month_number, month_year_label};

    #[test]
    fn resolves_all_twelve_months() {
        for number in 1..=12 {
            let name = month_name(number).expect("month name should exist");
            assert_eq!(month_number(name), Some(number));
        }
    }

    #[test]
    fn resolution_ignores_case() {
        assert_eq!(month_number("january"), Some(1));
        assert_eq!(month_number("JANUARY"), Some(1));
        assert_eq!(month_number("December"), Some(12));
    }

    #[test]
    fn rejects_invalid_names() {
        assert_eq!(month_number("xyz"), None);
        assert_eq!(month_number("jan"), None);
        assert_eq!(month_number(""), None);
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn formats_month_year_labels() {
        assert_eq!(month_year_label(2023, 1), "Jan 2023");
        assert_eq!(month_year_label(2024, 12), "Dec 2024");
    }
}
