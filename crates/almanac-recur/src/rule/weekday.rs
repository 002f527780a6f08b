//! Weekday helpers using the Monday = 0 numbering.

use std::fmt;

use chrono::Weekday;

const MONDAY_FIRST: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Returns the weekday for an index where 0 is Monday and 6 is Sunday.
#[must_use]
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    MONDAY_FIRST.get(usize::from(index)).copied()
}

/// Returns the Monday = 0 index of a weekday.
#[must_use]
pub fn weekday_index(weekday: Weekday) -> u8 {
    match weekday {
        Weekday::Mon => 0,
        Weekday::Tue => 1,
        Weekday::Wed => 2,
        Weekday::Thu => 3,
        Weekday::Fri => 4,
        Weekday::Sat => 5,
        Weekday::Sun => 6,
    }
}

#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Two-letter RFC 5545 weekday code.
#[must_use]
pub const fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// A set of weekdays, iterated Monday first.
///
/// The wire form is a comma-separated list of ascending Monday = 0 indices
/// without duplicates, e.g. `"0,2,4"` for Monday, Wednesday and Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: Self = Self(0);

    /// Adds a weekday; returns `false` if it was already present.
    pub fn insert(&mut self, weekday: Weekday) -> bool {
        let bit = 1 << weekday_index(weekday);
        let added = self.0 & bit == 0;
        self.0 |= bit;
        added
    }

    #[must_use]
    pub fn contains(self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday_index(weekday)) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates the contained weekdays from Monday to Sunday.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        MONDAY_FIRST
            .into_iter()
            .filter(move |weekday| self.contains(*weekday))
    }

    /// ## Summary
    /// Parses the wire form. Order and duplicates in the input are normalized away.
    ///
    /// ## Errors
    /// Returns the first token that is not an integer between 0 and 6.
    pub fn parse_wire(s: &str) -> Result<Self, String> {
        let mut set = Self::EMPTY;
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let weekday = token
                .parse::<u8>()
                .ok()
                .and_then(weekday_from_index)
                .ok_or_else(|| token.to_string())?;
            set.insert(weekday);
        }
        Ok(set)
    }

    #[must_use]
    pub fn to_wire(self) -> String {
        self.iter()
            .map(|weekday| weekday_index(weekday).to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for weekday in iter {
            set.insert(weekday);
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.iter().map(weekday_name).collect();
        write!(f, "{}", names.join(", "))
    }
}

/// Which occurrence of a weekday within a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekOfMonth {
    /// Parses the wire value: 1 to 4, or -1 for the last.
    #[must_use]
    pub const fn from_wire(value: i64) -> Option<Self> {
        Some(match value {
            1 => Self::First,
            2 => Self::Second,
            3 => Self::Third,
            4 => Self::Fourth,
            -1 => Self::Last,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn to_wire(self) -> i8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
            Self::Last => -1,
        }
    }

    /// 1-based position from the start of the month, `None` for [`Self::Last`].
    #[must_use]
    pub const fn nth(self) -> Option<u8> {
        match self {
            Self::First => Some(1),
            Self::Second => Some(2),
            Self::Third => Some(3),
            Self::Fourth => Some(4),
            Self::Last => None,
        }
    }

    #[must_use]
    pub const fn as_word(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Last => "last",
        }
    }
}
