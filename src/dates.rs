use chrono::{Datelike, Duration, NaiveDate};

/// Month names as shown in the month picker. Search is case-insensitive but
/// the stored/displayed form is always the capitalized one.
pub const MONTHS: [&str; 12] = [
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

/// Years offered by the year picker.
pub fn years() -> Vec<i32> {
    (2023..2033).collect()
}

pub fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(name))
        .map(|i| i as u32 + 1)
}

pub fn month_name(number: u32) -> &'static str {
    MONTHS.get(number.saturating_sub(1) as usize).unwrap_or(&MONTHS[0])
}

/// Number of days in the given month: day 1 of the following month minus one.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    first_of_next
        .map(|d| (d - Duration::days(1)).day())
        .unwrap_or(0)
}

/// Query window spanning the whole month, in the backend's timestamp format:
/// local midnight of day 1 through the last instant of the last day.
pub fn month_window(year: i32, month: u32) -> (String, String) {
    (
        format!("{year:04}-{month:02}-01 00:00:00"),
        format!("{year:04}-{month:02}-{:02} 23:59:59", days_in_month(year, month)),
    )
}

pub fn format_ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Long human-readable form used in the import form labels.
pub fn format_long(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_number_is_case_insensitive() {
        assert_eq!(month_number("January"), Some(1));
        assert_eq!(month_number("january"), Some(1));
        assert_eq!(month_number("DECEMBER"), Some(12));
        assert_eq!(month_number("Smarch"), None);
    }

    #[test]
    fn month_name_round_trips() {
        for (i, name) in MONTHS.iter().enumerate() {
            assert_eq!(month_name(i as u32 + 1), *name);
            assert_eq!(month_number(name), Some(i as u32 + 1));
        }
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2023, 1), 31);
    }

    #[test]
    fn month_window_spans_the_whole_month() {
        let (start, end) = month_window(2024, 2);
        assert_eq!(start, "2024-02-01 00:00:00");
        assert_eq!(end, "2024-02-29 23:59:59");

        let (start, end) = month_window(2023, 12);
        assert_eq!(start, "2023-12-01 00:00:00");
        assert_eq!(end, "2023-12-31 23:59:59");
    }

    #[test]
    fn formats() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(format_ymd(d), "2024-03-09");
        assert_eq!(format_long(d), "March 9, 2024");
    }
}
