//! Registry export to YAML and Markdown, and loading of saved registries

use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use super::error::{RegistryError, Result};
use super::recommendations::{RecommendationRegistry, RegistryDocument};
use super::types::{Recommendation, Status};

pub const MARKDOWN_TITLE: &str = "ML Training Recommendations Registry";

const REQUIRED_SECTIONS: [&str; 3] = ["metadata", "recommendations", "topics"];

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RegistryError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| {
        error!("Error writing {}: {}", path.display(), e);
        RegistryError::io(path, e)
    })
}

/// Write the exported registry as YAML.
pub fn save_registry<P: AsRef<Path>>(registry: &RecommendationRegistry, path: P) -> Result<()> {
    let path = path.as_ref();
    let yaml = serde_yaml::to_string(&registry.export_registry())?;
    write_file(path, &yaml)?;
    info!("Registry saved to {}", path.display());
    Ok(())
}

/// Load a registry document written by [`save_registry`], checking its
/// required sections before decoding it.
pub fn load_registry<P: AsRef<Path>>(path: P) -> Result<RegistryDocument> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
    let value: Value = serde_yaml::from_str(&content)?;

    let Some(map) = value.as_mapping() else {
        return Err(RegistryError::InvalidRegistry(
            "expected a mapping at the top level".to_string(),
        ));
    };

    let missing: Vec<&str> = REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|s| !map.contains_key(*s))
        .collect();
    if !missing.is_empty() {
        return Err(RegistryError::InvalidRegistry(format!(
            "missing required sections: {}",
            missing.join(", ")
        )));
    }

    if value["metadata"].get("schema_version").is_none() {
        return Err(RegistryError::InvalidRegistry(
            "missing schema version".to_string(),
        ));
    }

    if let Some(statuses) = value["recommendations"].as_mapping() {
        for key in statuses.keys() {
            let known = key
                .as_str()
                .is_some_and(|k| Status::ALL.iter().any(|s| s.as_str() == k));
            if !known {
                return Err(RegistryError::InvalidRegistry(format!(
                    "invalid status type in recommendations: {:?}",
                    key
                )));
            }
        }
    }

    serde_yaml::from_value(value).map_err(|e| RegistryError::InvalidRegistry(e.to_string()))
}

fn render_recommendation(out: &mut String, rec: &Recommendation) {
    out.push_str(&format!("- {} ({})\n", rec.recommendation, rec.id));
    if !rec.implementations.is_empty() {
        out.push_str(&format!(
            "  - Implementations: {}\n",
            rec.implementations.join(", ")
        ));
    }

    let mut source = format!("{}, {}", rec.source.citation(), rec.source.paper);
    if let Some(arxiv_id) = &rec.source.arxiv_id {
        source.push_str(&format!(", arXiv:{}", arxiv_id));
    }
    out.push_str(&format!("  - Source: {}\n", source));

    if let Some(superseded_by) = &rec.superseded_by {
        out.push_str(&format!("  - Superseded by: {}", superseded_by));
        if let Some(date) = rec.deprecated_date {
            out.push_str(&format!(" (since {})", date));
        }
        out.push('\n');
    }
}

/// Render a registry document as Markdown: recommendations grouped by
/// status then topic, followed by per-topic statistics.
pub fn render_markdown(doc: &RegistryDocument) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", MARKDOWN_TITLE));
    out.push_str(&format!("Last updated: {}\n\n", doc.metadata.last_updated));

    for status in Status::ALL {
        out.push_str(&format!("## {} Recommendations\n\n", status.title()));
        let Some(topics) = doc.recommendations.get(&status) else {
            continue;
        };
        for (topic, recs) in topics.iter().filter(|(_, recs)| !recs.is_empty()) {
            out.push_str(&format!("### {}\n\n", topic));
            for rec in recs {
                render_recommendation(&mut out, rec);
            }
            out.push('\n');
        }
    }

    out.push_str("## Statistics\n\n");
    for (topic, stats) in &doc.topics {
        out.push_str(&format!("### {}\n\n", topic));
        out.push_str(&format!("- Total recommendations: {}\n", stats.total_count));
        out.push_str("- By status:\n");
        for (status, count) in &stats.status_counts {
            out.push_str(&format!("  - {}: {}\n", status.title(), count));
        }
        let year = |y: Option<i32>| y.map_or_else(|| "n/a".to_string(), |y| y.to_string());
        out.push_str(&format!(
            "- Year range: {} - {}\n\n",
            year(stats.years.earliest),
            year(stats.years.latest)
        ));
    }

    out
}

pub fn registry_to_markdown<P: AsRef<Path>>(
    registry: &RecommendationRegistry,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    write_file(path, &render_markdown(&registry.export_registry()))?;
    info!("Registry exported to markdown: {}", path.display());
    Ok(())
}
