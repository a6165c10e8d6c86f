use crate::error::SelectError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPolicy {
    Fixed,
    Block,
    Random,
    Biased,
    Staircase,
}

impl SelectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::Fixed => "fixed",
            SelectionPolicy::Block => "block",
            SelectionPolicy::Random => "random",
            SelectionPolicy::Biased => "biased",
            SelectionPolicy::Staircase => "staircase",
        }
    }
}

impl FromStr for SelectionPolicy {
    type Err = SelectError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim() {
            "fixed" => Ok(SelectionPolicy::Fixed),
            "block" => Ok(SelectionPolicy::Block),
            "random" => Ok(SelectionPolicy::Random),
            "biased" => Ok(SelectionPolicy::Biased),
            "staircase" => Ok(SelectionPolicy::Staircase),
            other => Err(SelectError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
