use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of day a report entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Company,
    School,
    Vacation,
    Sick,
    Holiday,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Company,
        Category::School,
        Category::Vacation,
        Category::Sick,
        Category::Holiday,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Category::Company => "company",
            Category::School => "school",
            Category::Vacation => "vacation",
            Category::Sick => "sick",
            Category::Holiday => "holiday",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "company" => Some(Category::Company),
            "school" => Some(Category::School),
            "vacation" => Some(Category::Vacation),
            "sick" => Some(Category::Sick),
            "holiday" => Some(Category::Holiday),
            _ => None,
        }
    }

    /// Labels written by the old JSON data files.
    pub fn from_legacy_label(s: &str) -> Option<Self> {
        match s.trim() {
            "Betrieb" => Some(Category::Company),
            "Schule" => Some(Category::School),
            "Urlaub" => Some(Category::Vacation),
            "Krank" => Some(Category::Sick),
            "Feiertag" => Some(Category::Holiday),
            other => Self::from_db_str(&other.to_lowercase()),
        }
    }

    /// Days on which no training takes place.
    pub fn is_absence(&self) -> bool {
        matches!(self, Category::Vacation | Category::Sick | Category::Holiday)
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_legacy_label(s).ok_or_else(|| AppError::InvalidCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.to_db_str())
    }
}
