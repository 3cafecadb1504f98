//! Slash-delimited node addresses.
//!
//! An address is rendered with a trailing separator, so the child `area` of
//! `MainInput/xgeometry/` is `MainInput/xgeometry/area/`.

use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SEPARATOR: char = '/';

/// A node address. Never empty: the first segment is the tree name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PathAddress {
    segments: Vec<String>,
}

fn check_segment(name: &str) -> Result<(), TreeError> {
    if name.is_empty() || name.contains(SEPARATOR) {
        return Err(TreeError::InvalidSegment(name.to_string()));
    }
    Ok(())
}

impl PathAddress {
    pub fn root(name: &str) -> Result<Self, TreeError> {
        check_segment(name)?;
        Ok(Self {
            segments: vec![name.to_string()],
        })
    }

    pub fn child(&self, name: &str) -> Result<Self, TreeError> {
        check_segment(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// The address one level up, or `None` for a root address.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() < 2 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Last segment: the node's own name.
    pub fn name(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// True when `other` extends this address by exactly one segment.
    pub fn is_parent_of(&self, other: &PathAddress) -> bool {
        other.segments.len() == self.segments.len() + 1
            && other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{}{}", segment, SEPARATOR)?;
        }
        Ok(())
    }
}

impl FromStr for PathAddress {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_suffix(SEPARATOR).unwrap_or(s);
        let segments: Vec<String> = trimmed.split(SEPARATOR).map(str::to_string).collect();
        for segment in &segments {
            check_segment(segment)?;
        }
        Ok(Self { segments })
    }
}

impl TryFrom<String> for PathAddress {
    type Error = TreeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PathAddress> for String {
    fn from(address: PathAddress) -> Self {
        address.to_string()
    }
}
