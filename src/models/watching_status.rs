use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::error::AppError;

/// A user's watching progress on a series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WatchingStatus {
    /// No episode watched yet
    ToWatch,
    /// Some, but not all, episodes watched
    InProgress,
    /// Every episode watched
    Finished,
}

impl WatchingStatus {
    /// Label used for the persisted `status` column
    pub fn as_label(&self) -> &'static str {
        match self {
            WatchingStatus::ToWatch => "ToWatch",
            WatchingStatus::InProgress => "InProgress",
            WatchingStatus::Finished => "Finished",
        }
    }
}

impl Display for WatchingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for WatchingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ToWatch" => Ok(WatchingStatus::ToWatch),
            "InProgress" => Ok(WatchingStatus::InProgress),
            "Finished" => Ok(WatchingStatus::Finished),
            other => Err(AppError::UnknownStatus(other.to_string())),
        }
    }
}
