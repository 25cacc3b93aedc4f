//! Static reference data used for parameter options and code translation.
//!
//! Everything here is fixed at compile time except the election cycle list,
//! which is computed relative to the current year.

use chrono::Datelike;
use indexmap::IndexMap;

use crate::getters::titleize;

/// Ordered value -> label map, as shown in a select parameter.
pub type Choices = IndexMap<String, String>;

pub const PARTIES: &[(&str, &str)] = &[("D", "Democrat"), ("R", "Republican"), ("I", "Independent")];

pub const SEATS: &[(&str, &str)] = &[
    ("federal:senate", "US Senate"),
    ("federal:house", "US House of Representatives"),
    ("federal:president", "US President"),
    ("state:upper", "Upper chamber of state legislature"),
    ("state:lower", "Lower chamber of state legislature"),
    ("state:governor", "State governor"),
];

/// Office codes used in FEC summary reports.
pub const FEC_OFFICES: &[(&str, &str)] = &[("P", "President"), ("H", "House"), ("S", "Senate")];

/// Lobbying filing classification codes.
pub const FILING_TYPES: &[(&str, &str)] = &[
    ("n", "Non-self filer parent"),
    ("m", "Non-self filer subsidiary for a non-self filer parent"),
    ("x", "Self filer subsidiary for a non-self filer parent"),
    ("p", "Self filer parent"),
    ("i", "Non-self filer for a self filter parent that has same catorder as the parent"),
    ("s", "Self filer subsidiary for a self filer parent"),
    ("e", "Non-self filer subsidiary for a self filer subsidiary"),
    ("c", "Non-self filer subsidiary for a self filer parent with same catorder"),
    ("b", "Non-self filer subidiary for a self-filer parent that has different catorder"),
];

/// Option key meaning "every cycle" on the top-N endpoints.
pub const ALL_CYCLES: &str = "-1";

fn to_choices(pairs: &[(&str, &str)]) -> Choices {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn lookup(pairs: &'static [(&'static str, &'static str)], code: &str) -> Option<&'static str> {
    pairs.iter().find(|(k, _)| *k == code).map(|(_, v)| *v)
}

pub fn parties() -> Choices {
    to_choices(PARTIES)
}

pub fn seats() -> Choices {
    to_choices(SEATS)
}

pub fn fec_offices() -> Choices {
    to_choices(FEC_OFFICES)
}

pub fn filing_type_choices() -> Choices {
    to_choices(FILING_TYPES)
}

pub fn party_label(code: &str) -> Option<&'static str> {
    lookup(PARTIES, code)
}

pub fn fec_office_label(code: &str) -> Option<&'static str> {
    lookup(FEC_OFFICES, code)
}

/// Display label for an office code. Unknown codes are split on `:` and
/// title-cased: `state:other` becomes `State, Other`.
pub fn seat_label(code: &str) -> String {
    match lookup(SEATS, code) {
        Some(label) => label.to_string(),
        None => titleize(&code.split(':').collect::<Vec<_>>().join(", ")),
    }
}

/// Election cycles from `start_year` through the current year.
pub fn election_cycles_since(start_year: i32) -> Choices {
    election_cycles_between(start_year, current_year())
}

/// The wall-clock year, used wherever cycle lists run "through today".
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Every even year `y` in `start_year..=current_year` maps `"y"` to
/// `"y-1 - y"`. An odd start year begins at the following even year.
pub fn election_cycles_between(start_year: i32, current_year: i32) -> Choices {
    let first = if start_year % 2 == 0 {
        start_year
    } else {
        start_year + 1
    };
    (first..=current_year)
        .step_by(2)
        .map(|y| (y.to_string(), format!("{} - {}", y - 1, y)))
        .collect()
}

/// Cycle options for the top-N endpoints: cycles since 2000 plus "All available".
pub fn top_list_cycles(current_year: i32) -> Choices {
    let mut cycles = election_cycles_between(2000, current_year);
    cycles.insert(ALL_CYCLES.to_string(), "All available".to_string());
    cycles
}
