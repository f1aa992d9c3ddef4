//! mlregistry - Registry of ML training recommendations
//!
//! Builds a registry of training recommendations from a YAML corpus of
//! research papers, assigns stable identifiers to papers and recommendations,
//! and exports the registry as YAML and Markdown.

pub mod cli;
pub mod config;
pub mod registry;
