use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::registry::{
    build_registry_from_yaml, load_research_yaml, registry_to_markdown, save_registry,
    IdentifierRegistry, Status,
};

/// Paths written by a successful build
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutputs {
    pub registry: PathBuf,
    pub markdown: PathBuf,
    pub readme_section: Option<PathBuf>,
}

pub fn run(
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    id_store: Option<PathBuf>,
    readme_section: Option<PathBuf>,
    config_path: Option<String>,
) -> Result<BuildOutputs> {
    let mut config = Config::load_with_path(config_path)?;

    // Apply CLI overrides
    if let Some(input) = input {
        info!("CLI override: input = {}", input.display());
        config.paths.input = input;
    }
    if let Some(dir) = output_dir {
        info!("CLI override: output_dir = {}", dir.display());
        config.paths.output_dir = dir;
    }
    if let Some(store) = id_store {
        info!("CLI override: id_store = {}", store.display());
        config.paths.id_store = store;
    }
    if let Some(section) = readme_section {
        info!("CLI override: readme_section = {}", section.display());
        config.paths.readme_section = Some(section);
    }

    build(&config)
}

/// Ingest the configured research file and write every registry output.
/// Nothing is written when the input fails validation.
pub fn build(config: &Config) -> Result<BuildOutputs> {
    info!("Building registry from {}", config.paths.input.display());
    let data = load_research_yaml(&config.paths.input).with_context(|| {
        format!(
            "Failed to load research data from {}",
            config.paths.input.display()
        )
    })?;

    let ids = IdentifierRegistry::open(&config.paths.id_store);
    let registry = build_registry_from_yaml(&data, ids)?;

    let outputs = BuildOutputs {
        registry: config.registry_path(),
        markdown: config.markdown_path(),
        readme_section: config.paths.readme_section.clone(),
    };

    save_registry(&registry, &outputs.registry)?;
    registry_to_markdown(&registry, &outputs.markdown)?;
    if let Some(section) = &outputs.readme_section {
        registry_to_markdown(&registry, section)?;
    }

    info!(
        "Registry outputs saved to {} ({} standard, {} experimental, {} deprecated)",
        config.paths.output_dir.display(),
        registry.get_recommendations_by_status(Status::Standard).len(),
        registry.get_recommendations_by_status(Status::Experimental).len(),
        registry.get_recommendations_by_status(Status::Deprecated).len(),
    );
    Ok(outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const RESEARCH: &str = r#"
2020:
  - title: Test Paper 1
    first_author: Smith
    year: 2020
    topics: [optimization]
    sota:
      - Use gradient clipping with threshold 1.0
"#;

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.paths.input = dir.path().join("research.yaml");
        config.paths.output_dir = dir.path().join("out");
        config.paths.id_store = dir.path().join("out/mlr_registry.json");
        config
    }

    #[test]
    fn test_build_writes_outputs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("research.yaml"), RESEARCH).unwrap();
        let mut config = config_in(&dir);
        config.paths.readme_section = Some(dir.path().join("docs/sections/registry.md.j2"));

        let outputs = build(&config).unwrap();
        assert!(outputs.registry.exists());
        assert!(outputs.markdown.exists());
        assert!(outputs.readme_section.as_ref().unwrap().exists());
        assert!(config.paths.id_store.exists());

        let md = fs::read_to_string(&outputs.markdown).unwrap();
        assert!(md.contains("MLR-2020-Smith001-0001"));
    }

    #[test]
    fn test_build_invalid_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("research.yaml"), "2020:\n  - title: Only\n").unwrap();
        let config = config_in(&dir);

        let err = build(&config).unwrap_err();
        assert!(format!("{:#}", err).contains("missing required fields"));
        assert!(!config.registry_path().exists());
        assert!(!config.markdown_path().exists());
    }

    #[test]
    fn test_run_applies_overrides() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("papers.yaml");
        fs::write(&input, RESEARCH).unwrap();
        let config_path = dir.path().join("mlregistry.toml");
        fs::write(&config_path, "[export]\nmarkdown_file = \"REPORT.md\"\n").unwrap();

        let outputs = run(
            Some(input),
            Some(dir.path().join("site")),
            Some(dir.path().join("ids.json")),
            None,
            Some(config_path.to_string_lossy().into_owned()),
        )
        .unwrap();

        assert_eq!(outputs.markdown, dir.path().join("site/REPORT.md"));
        assert!(outputs.markdown.exists());
        assert!(dir.path().join("ids.json").exists());
    }
}
