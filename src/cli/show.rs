use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::registry::{load_registry, RegistryDocument, Status};

pub fn run(path: &str) -> Result<RegistryDocument> {
    let file = Path::new(path);
    if !file.is_file() {
        bail!("Registry file not found: {}", path);
    }

    let doc = load_registry(file).with_context(|| format!("Failed to load registry {}", path))?;

    println!(
        "Registry {} (schema {}, updated {})",
        path, doc.metadata.schema_version, doc.metadata.last_updated
    );
    for status in Status::ALL {
        println!("  {}: {}", status.title(), doc.count_by_status(status));
    }
    for (topic, stats) in &doc.topics {
        let range = match (stats.years.earliest, stats.years.latest) {
            (Some(first), Some(last)) => format!("{}-{}", first, last),
            _ => "n/a".to_string(),
        };
        println!("  {} ({} total, {})", topic, stats.total_count, range);
    }

    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{
        save_registry, IdentifierRegistry, NewRecommendation, RecommendationRegistry,
    };
    use tempfile::TempDir;

    #[test]
    fn test_run_file_not_found() {
        let result = run("/tmp/nonexistent-registry-xyz.yaml");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_run_saved_registry() {
        let dir = TempDir::new().unwrap();
        let mut registry =
            RecommendationRegistry::new(IdentifierRegistry::open(dir.path().join("ids.json")));
        registry
            .add_recommendation(NewRecommendation {
                topic: "attention".to_string(),
                recommendation: "Use flash attention".to_string(),
                first_author: "Jones".to_string(),
                source_paper: "Test Paper 2".to_string(),
                year: 2021,
                experimental: true,
                ..Default::default()
            })
            .unwrap();
        let path = dir.path().join("registry.yaml");
        save_registry(&registry, &path).unwrap();

        let doc = run(path.to_str().unwrap()).unwrap();
        assert_eq!(doc.count_by_status(Status::Experimental), 1);
        assert_eq!(doc.topics["attention"].total_count, 1);
    }
}
