//! The two package collections

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Which remote table a package lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Travel,
    Discovery,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Travel, Collection::Discovery];

    /// Table name in the data store
    pub fn table(self) -> &'static str {
        match self {
            Collection::Travel => "travel_packages",
            Collection::Discovery => "discovery_packages",
        }
    }

    /// Human-readable noun used in notifications ("Failed to fetch {noun}s")
    pub fn noun(self) -> &'static str {
        match self {
            Collection::Travel => "package",
            Collection::Discovery => "discovery package",
        }
    }

    pub fn from_table(table: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.table() == table)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

impl FromStr for Collection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "travel" | "travel_packages" => Ok(Collection::Travel),
            "discovery" | "discovery_packages" => Ok(Collection::Discovery),
            other => Err(Error::UnknownCollection(other.to_string())),
        }
    }
}
