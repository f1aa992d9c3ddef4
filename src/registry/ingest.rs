//! Research YAML loading, validation and conversion into registry entries

use chrono::{Datelike, Local};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::error::{RegistryError, Result};
use super::identifiers::IdentifierRegistry;
use super::recommendations::{NewRecommendation, RecommendationRegistry};

pub const DEFAULT_TOPIC: &str = "general";
pub const MIN_YEAR: i32 = 1900;

const REQUIRED_FIELDS: [&str; 3] = ["title", "first_author", "year"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attic {
    #[serde(default)]
    pub superseded_by: Option<String>,
}

/// One paper entry from the research file. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub first_author: String,
    pub year: i32,
    #[serde(default)]
    pub arxiv_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub topics: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sota: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub models: Vec<String>,
    #[serde(default)]
    pub experimental: bool,
    #[serde(default)]
    pub attic: Option<Attic>,
}

impl PaperRecord {
    pub fn primary_topic(&self) -> &str {
        self.topics
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_TOPIC)
    }

    /// Superseding id; a blank value counts as absent.
    pub fn superseded_by(&self) -> Option<&str> {
        self.attic
            .as_ref()?
            .superseded_by
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Validated research data, keyed by year in ascending order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResearchData {
    pub years: BTreeMap<i32, Vec<PaperRecord>>,
}

impl ResearchData {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content)?;
        Self::from_value(value)
    }

    /// Validate the whole document, failing on the first malformed entry.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Mapping(map) = value else {
            return Err(RegistryError::InvalidFormat);
        };

        let max_year = Local::now().year();
        let mut years = BTreeMap::new();
        for (key, papers) in map {
            let year = parse_year(&key, max_year)?;
            if years.contains_key(&year) {
                return Err(RegistryError::DuplicateYear(year));
            }

            let Value::Sequence(entries) = papers else {
                return Err(RegistryError::PapersNotList(year));
            };

            let records = entries
                .into_iter()
                .enumerate()
                .map(|(index, entry)| parse_paper(year, index, entry))
                .collect::<Result<Vec<_>>>()?;
            debug!("Validated {} papers for {}", records.len(), year);
            years.insert(year, records);
        }

        Ok(Self { years })
    }

    pub fn paper_count(&self) -> usize {
        self.years.values().map(Vec::len).sum()
    }

    /// Number of `sota` entries across all papers
    pub fn sota_count(&self) -> usize {
        self.papers().map(|(_, p)| p.sota.len()).sum()
    }

    pub fn papers(&self) -> impl Iterator<Item = (i32, &PaperRecord)> {
        self.years
            .iter()
            .flat_map(|(&year, papers)| papers.iter().map(move |p| (year, p)))
    }
}

fn parse_year(key: &Value, max_year: i32) -> Result<i32> {
    let year = match key {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| RegistryError::InvalidYearFormat(n.to_string()))?,
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| RegistryError::InvalidYearFormat(s.clone()))?,
        other => return Err(RegistryError::InvalidYearFormat(format!("{:?}", other))),
    };

    if !(i64::from(MIN_YEAR)..=i64::from(max_year)).contains(&year) {
        return Err(RegistryError::InvalidYear(year, max_year));
    }
    Ok(year as i32)
}

fn parse_paper(year: i32, index: usize, entry: Value) -> Result<PaperRecord> {
    let Some(fields) = entry.as_mapping() else {
        return Err(RegistryError::InvalidPaperEntry { year, index });
    };

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|f| !fields.contains_key(**f))
        .map(|f| f.to_string())
        .collect();
    if !missing.is_empty() {
        warn!("Rejected paper #{} in {}: {:?}", index, year, entry);
        return Err(RegistryError::MissingFields {
            year,
            fields: missing,
        });
    }

    let title = fields
        .get("title")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| format!("#{}", index));

    // Unquoted arXiv ids load as numbers and lose trailing zeros.
    if let Some(arxiv_id) = fields.get("arxiv_id") {
        if !arxiv_id.is_string() && !arxiv_id.is_null() {
            return Err(RegistryError::InvalidField {
                year,
                paper: title,
                reason: "arxiv_id must be a quoted string, e.g. arxiv_id: \"2010.11920\""
                    .to_string(),
            });
        }
    }

    let record: PaperRecord =
        serde_yaml::from_value(entry).map_err(|e| RegistryError::InvalidField {
            year,
            paper: title,
            reason: e.to_string(),
        })?;

    if record.year != year {
        warn!(
            "Paper '{}' lists year {} but is filed under {}; using {}",
            record.title, record.year, year, year
        );
    }
    Ok(record)
}

pub fn load_research_yaml<P: AsRef<Path>>(path: P) -> Result<ResearchData> {
    let path = path.as_ref();
    info!("Loading research data from {}", path.display());
    let content = fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
    ResearchData::from_yaml_str(&content)
}

/// Build a registry from validated research data.
///
/// Each paper's `sota` entries are inserted once as standard, again as
/// experimental when the paper is flagged experimental, and again as
/// deprecated when the paper has an `attic.superseded_by` entry.
pub fn build_registry_from_yaml(
    data: &ResearchData,
    ids: IdentifierRegistry,
) -> Result<RecommendationRegistry> {
    let mut registry = RecommendationRegistry::new(ids);

    for (year, paper) in data.papers() {
        let mut passes: Vec<(bool, Option<&str>)> = vec![(false, None)];
        if paper.experimental {
            passes.push((true, None));
        }
        if let Some(superseded_by) = paper.superseded_by() {
            passes.push((false, Some(superseded_by)));
        }

        for (experimental, superseded_by) in passes {
            for text in &paper.sota {
                let mlr_id = registry.add_recommendation(NewRecommendation {
                    topic: paper.primary_topic().to_string(),
                    recommendation: text.clone(),
                    first_author: paper.first_author.clone(),
                    source_paper: paper.title.clone(),
                    year,
                    arxiv_id: paper.arxiv_id.clone(),
                    experimental,
                    superseded_by: superseded_by.map(String::from),
                    implementations: paper.models.clone(),
                })?;
                debug!("Added {}: {}", mlr_id, text);
            }
        }
    }

    info!(
        "Built registry with {} recommendations across {} topics",
        registry.len(),
        registry.get_topics().len()
    );
    Ok(registry)
}
