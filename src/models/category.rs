use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GuestCategory {
    #[serde(rename = "adult")]
    Adult,
    #[serde(rename = "child_0_5")]
    Child05,
    #[serde(rename = "child_6_10")]
    Child610,
}

impl GuestCategory {
    /// Fixed ordering: drives roster layout, display, and aggregation.
    pub const ALL: [GuestCategory; 3] = [
        GuestCategory::Adult,
        GuestCategory::Child05,
        GuestCategory::Child610,
    ];

    /// Badge text shown next to a guest.
    pub fn label(&self) -> &'static str {
        match self {
            GuestCategory::Adult => "Adulto",
            GuestCategory::Child05 => "Bambino (0-5)",
            GuestCategory::Child610 => "Bambino (6-10)",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            GuestCategory::Adult => 0,
            GuestCategory::Child05 => 1,
            GuestCategory::Child610 => 2,
        }
    }
}

impl fmt::Display for GuestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuestCategory::Adult => write!(f, "adult"),
            GuestCategory::Child05 => write!(f, "child_0_5"),
            GuestCategory::Child610 => write!(f, "child_6_10"),
        }
    }
}

impl FromStr for GuestCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "adult" => Ok(GuestCategory::Adult),
            "child_0_5" => Ok(GuestCategory::Child05),
            "child_6_10" => Ok(GuestCategory::Child610),
            _ => Err(format!(
                "Invalid guest category '{}'. Valid options: adult, child_0_5, child_6_10",
                s
            )),
        }
    }
}
