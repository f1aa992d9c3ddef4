//! Entity types for the recommendation registry

use anyhow::bail;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle classification of a recommendation.
///
/// Variant order is the order statuses are exported and rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Experimental,
    Standard,
    Deprecated,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Experimental, Status::Standard, Status::Deprecated];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Experimental => "experimental",
            Status::Standard => "standard",
            Status::Deprecated => "deprecated",
        }
    }

    /// Heading form used in the Markdown report
    pub fn title(&self) -> &'static str {
        match self {
            Status::Experimental => "Experimental",
            Status::Standard => "Standard",
            Status::Deprecated => "Deprecated",
        }
    }

    /// Status derived from ingestion flags. A superseding id wins over the
    /// experimental flag.
    pub fn derive(experimental: bool, superseded_by: Option<&str>) -> Self {
        if superseded_by.is_some() {
            Status::Deprecated
        } else if experimental {
            Status::Experimental
        } else {
            Status::Standard
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "experimental" => Ok(Status::Experimental),
            "standard" => Ok(Status::Standard),
            "deprecated" => Ok(Status::Deprecated),
            _ => bail!("Unknown status: {}", s),
        }
    }
}

/// Short paper identifier, e.g. `Smith001`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperId(String);

impl PaperId {
    pub fn new(prefix: &str, seq: u32) -> Self {
        Self(format!("{}{:03}", prefix, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PaperId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Externally visible recommendation identifier, e.g. `MLR-2020-Smith001-0001`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MlrId(String);

impl MlrId {
    pub fn new(year: i32, paper_id: &PaperId, seq: u32) -> Self {
        Self(format!("MLR-{}-{}-{:04}", year, paper_id, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MlrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MlrId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<&str> for MlrId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Paper a recommendation was extracted from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub paper: String,
    pub paper_id: PaperId,
    pub year: i32,
    pub first_author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arxiv_id: Option<String>,
}

impl Source {
    /// Short citation, e.g. `Smith et al. (2020)`
    pub fn citation(&self) -> String {
        format!("{} et al. ({})", self.first_author, self.year)
    }
}

/// Additional paper backing an existing recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub paper: String,
    pub paper_id: PaperId,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arxiv_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: MlrId,
    pub recommendation: String,
    pub topic: String,
    pub topic_id: String,
    pub source: Source,
    pub status: Status,
    #[serde(default)]
    pub supporting_evidence: Vec<Evidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated_date: Option<NaiveDate>,
    #[serde(default)]
    pub implementations: Vec<String>,
}
