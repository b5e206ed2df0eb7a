use crate::{CalendarDate, DateSpan};

pub fn date(iso: &str) -> CalendarDate {
    iso.parse().expect("test date must be valid ISO yyyy-MM-dd")
}

pub fn span(start: &str, end: &str) -> DateSpan {
    DateSpan::new(date(start), date(end)).expect("test span must not be inverted")
}
