use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::Config;
use crate::registry::{load_research_yaml, ResearchData};

pub fn run(input: Option<PathBuf>, config_path: Option<String>) -> Result<ResearchData> {
    let config = Config::load_with_path(config_path)?;
    let input = input.unwrap_or(config.paths.input);

    let data = load_research_yaml(&input)
        .with_context(|| format!("Invalid research data in {}", input.display()))?;

    let experimental = data.papers().filter(|(_, p)| p.experimental).count();
    let superseded = data
        .papers()
        .filter(|(_, p)| p.superseded_by().is_some())
        .count();

    println!("✓ {} is valid", input.display());
    println!("  Years: {}", data.years.len());
    println!("  Papers: {}", data.paper_count());
    println!("  SOTA entries: {}", data.sota_count());
    println!("  Experimental papers: {}", experimental);
    println!("  Superseded papers: {}", superseded);

    Ok(data)
}
