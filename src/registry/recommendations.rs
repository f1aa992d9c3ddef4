//! In-memory recommendation registry

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

use super::error::Result;
use super::identifiers::IdentifierRegistry;
use super::types::{Evidence, MlrId, Recommendation, Source, Status};

pub const SCHEMA_VERSION: &str = "1.0";

/// Grouping key from the topic and the first five words of the text,
/// e.g. `optimization/use-gradient-clipping-with-dynamic`.
pub fn generate_topic_id(topic: &str, recommendation: &str) -> String {
    let words: Vec<String> = recommendation
        .split_whitespace()
        .take(5)
        .map(str::to_lowercase)
        .collect();
    let slug: String = words
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect();
    format!("{}/{}", topic.to_lowercase().replace(' ', "-"), slug)
}

/// Input for [`RecommendationRegistry::add_recommendation`].
#[derive(Debug, Clone, Default)]
pub struct NewRecommendation {
    pub topic: String,
    pub recommendation: String,
    pub first_author: String,
    /// Paper title
    pub source_paper: String,
    pub year: i32,
    pub arxiv_id: Option<String>,
    pub experimental: bool,
    /// External id of the work that replaces this one
    pub superseded_by: Option<String>,
    pub implementations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRange {
    pub earliest: Option<i32>,
    pub latest: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStats {
    pub total_count: usize,
    pub status_counts: BTreeMap<Status, usize>,
    pub years: YearRange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub last_updated: NaiveDate,
    pub schema_version: String,
    pub status_types: Vec<Status>,
}

/// Exported snapshot. Recommendations are grouped by status, then topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub metadata: Metadata,
    pub recommendations: BTreeMap<Status, BTreeMap<String, Vec<Recommendation>>>,
    pub topics: BTreeMap<String, TopicStats>,
}

impl RegistryDocument {
    pub fn count_by_status(&self, status: Status) -> usize {
        self.recommendations
            .get(&status)
            .map(|topics| topics.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

/// Owns every recommendation and the identifier state used to name them.
#[derive(Debug)]
pub struct RecommendationRegistry {
    ids: IdentifierRegistry,
    recommendations: Vec<Recommendation>,
    by_id: HashMap<MlrId, usize>,
    by_topic: BTreeMap<String, Vec<usize>>,
}

impl RecommendationRegistry {
    pub fn new(ids: IdentifierRegistry) -> Self {
        info!(
            "Initialized recommendation registry (id store: {})",
            ids.path().display()
        );
        Self {
            ids,
            recommendations: Vec::new(),
            by_id: HashMap::new(),
            by_topic: BTreeMap::new(),
        }
    }

    pub fn identifiers(&self) -> &IdentifierRegistry {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    /// Insert a recommendation under a freshly minted MLR id. Never merges
    /// with an existing entry, even when the topic id matches.
    pub fn add_recommendation(&mut self, new: NewRecommendation) -> Result<MlrId> {
        let topic_id = generate_topic_id(&new.topic, &new.recommendation);
        let paper_id = self
            .ids
            .get_paper_id(&new.first_author, new.year, new.arxiv_id.as_deref())?;
        let mlr_id = self.ids.generate_id(new.year, &paper_id)?;

        let status = Status::derive(new.experimental, new.superseded_by.as_deref());
        let deprecated_date = new
            .superseded_by
            .as_ref()
            .map(|_| Local::now().date_naive());

        let rec = Recommendation {
            id: mlr_id.clone(),
            recommendation: new.recommendation,
            topic: new.topic,
            topic_id,
            source: Source {
                paper: new.source_paper,
                paper_id,
                year: new.year,
                first_author: new.first_author,
                arxiv_id: new.arxiv_id,
            },
            status,
            supporting_evidence: Vec::new(),
            superseded_by: new.superseded_by,
            deprecated_date,
            implementations: new.implementations,
        };

        let index = self.recommendations.len();
        self.by_topic
            .entry(rec.topic.clone())
            .or_default()
            .push(index);
        self.by_id.insert(mlr_id.clone(), index);
        self.recommendations.push(rec);

        info!("Added recommendation {} with status {}", mlr_id, status);
        Ok(mlr_id)
    }

    pub fn get_recommendation(&self, mlr_id: &MlrId) -> Option<&Recommendation> {
        self.by_id.get(mlr_id).map(|&i| &self.recommendations[i])
    }

    /// Append supporting evidence. Returns false for an unknown id.
    pub fn add_evidence(&mut self, mlr_id: &MlrId, evidence: Evidence) -> bool {
        match self.by_id.get(mlr_id) {
            Some(&i) => {
                debug!("Attached evidence {} to {}", evidence.paper_id, mlr_id);
                self.recommendations[i].supporting_evidence.push(evidence);
                true
            }
            None => false,
        }
    }

    /// All recommendations with `status`, in insertion order.
    pub fn get_recommendations_by_status(&self, status: Status) -> Vec<&Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.status == status)
            .collect()
    }

    /// Recommendations for `topic`, oldest source year first. Equal years keep
    /// insertion order.
    pub fn get_recommendations_by_topic(
        &self,
        topic: &str,
        status: Option<Status>,
    ) -> Vec<&Recommendation> {
        let mut recs: Vec<&Recommendation> = self
            .by_topic
            .get(topic)
            .into_iter()
            .flatten()
            .map(|&i| &self.recommendations[i])
            .filter(|r| status.is_none_or(|s| r.status == s))
            .collect();
        recs.sort_by_key(|r| r.source.year);
        recs
    }

    /// Topic names, sorted
    pub fn get_topics(&self) -> Vec<&str> {
        self.by_topic.keys().map(String::as_str).collect()
    }

    /// Ids of the other recommendations filed under the same topic.
    pub fn related_recommendations(&self, mlr_id: &MlrId) -> Vec<&MlrId> {
        let Some(rec) = self.get_recommendation(mlr_id) else {
            return Vec::new();
        };
        self.by_topic
            .get(&rec.topic)
            .into_iter()
            .flatten()
            .map(|&i| &self.recommendations[i].id)
            .filter(|id| *id != mlr_id)
            .collect()
    }

    pub fn get_topic_stats(&self, topic: &str) -> TopicStats {
        let recs = self.get_recommendations_by_topic(topic, None);
        let status_counts: BTreeMap<Status, usize> = Status::ALL
            .iter()
            .map(|&s| (s, recs.iter().filter(|r| r.status == s).count()))
            .collect();
        TopicStats {
            total_count: recs.len(),
            status_counts,
            years: YearRange {
                earliest: recs.iter().map(|r| r.source.year).min(),
                latest: recs.iter().map(|r| r.source.year).max(),
            },
        }
    }

    pub fn export_registry(&self) -> RegistryDocument {
        let recommendations: BTreeMap<Status, BTreeMap<String, Vec<Recommendation>>> = Status::ALL
            .iter()
            .map(|&status| {
                let by_topic: BTreeMap<String, Vec<Recommendation>> = self
                    .by_topic
                    .keys()
                    .map(|topic| {
                        let recs: Vec<Recommendation> = self
                            .get_recommendations_by_topic(topic, Some(status))
                            .into_iter()
                            .cloned()
                            .collect();
                        (topic.clone(), recs)
                    })
                    .collect();
                (status, by_topic)
            })
            .collect();

        let topics: BTreeMap<String, TopicStats> = self
            .by_topic
            .keys()
            .map(|topic| (topic.clone(), self.get_topic_stats(topic)))
            .collect();

        RegistryDocument {
            metadata: Metadata {
                last_updated: Local::now().date_naive(),
                schema_version: SCHEMA_VERSION.to_string(),
                status_types: Status::ALL.to_vec(),
            },
            recommendations,
            topics,
        }
    }
}
