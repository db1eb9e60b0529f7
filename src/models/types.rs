//! Categorical domain types
//!
//! Closed enumerations for the segmentation attributes of a customer and the
//! calendar attributes derived from a transaction date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Customer lifestage segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Lifestage {
    #[serde(rename = "YOUNG SINGLES/COUPLES")]
    YoungSinglesCouples,
    #[serde(rename = "YOUNG FAMILIES")]
    YoungFamilies,
    #[serde(rename = "MIDAGE SINGLES/COUPLES")]
    MidageSinglesCouples,
    #[serde(rename = "NEW FAMILIES")]
    NewFamilies,
    #[serde(rename = "OLDER SINGLES/COUPLES")]
    OlderSinglesCouples,
    #[serde(rename = "OLDER FAMILIES")]
    OlderFamilies,
    #[serde(rename = "RETIREES")]
    Retirees,
}

impl Lifestage {
    /// Every lifestage, in declaration order
    pub const ALL: [Self; 7] = [
        Self::YoungSinglesCouples,
        Self::YoungFamilies,
        Self::MidageSinglesCouples,
        Self::NewFamilies,
        Self::OlderSinglesCouples,
        Self::OlderFamilies,
        Self::Retirees,
    ];

    /// Label as it appears in the source data
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::YoungSinglesCouples => "YOUNG SINGLES/COUPLES",
            Self::YoungFamilies => "YOUNG FAMILIES",
            Self::MidageSinglesCouples => "MIDAGE SINGLES/COUPLES",
            Self::NewFamilies => "NEW FAMILIES",
            Self::OlderSinglesCouples => "OLDER SINGLES/COUPLES",
            Self::OlderFamilies => "OLDER FAMILIES",
            Self::Retirees => "RETIREES",
        }
    }
}

impl FromStr for Lifestage {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AnalysisError::parse("LIFESTAGE", s))
    }
}

impl fmt::Display for Lifestage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Customer price-sensitivity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PremiumTier {
    Budget,
    Mainstream,
    Premium,
}

impl PremiumTier {
    /// Every tier, in declaration order
    pub const ALL: [Self; 3] = [Self::Budget, Self::Mainstream, Self::Premium];

    /// Label as it appears in the source data
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::Mainstream => "Mainstream",
            Self::Premium => "Premium",
        }
    }
}

impl FromStr for PremiumTier {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AnalysisError::parse("PREMIUM_CUSTOMER", s))
    }
}

impl fmt::Display for PremiumTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Day of the week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Monday through Sunday
    pub const ALL: [Self; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Day of the week a date falls on
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calendar month, January first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonthName {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthName {
    /// January through December
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }

    /// Month a date falls in
    #[must_use]
    pub fn of(date: NaiveDate) -> Self {
        // month0() is always in 0..12
        Self::ALL[date.month0() as usize]
    }
}

impl fmt::Display for MonthName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
