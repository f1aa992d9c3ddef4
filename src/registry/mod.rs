//! ML training recommendations registry
//!
//! Tracks recommendations extracted from research papers, assigns each a
//! stable `MLR-{year}-{paper_id}-{seq}` identifier and exports the result as
//! YAML and Markdown.

pub mod error;
pub mod identifiers;
pub mod ingest;
pub mod io;
pub mod recommendations;
pub mod types;

pub use error::{RegistryError, Result};
pub use identifiers::{IdStore, IdentifierRegistry};
pub use ingest::{build_registry_from_yaml, load_research_yaml, PaperRecord, ResearchData};
pub use io::{load_registry, registry_to_markdown, render_markdown, save_registry};
pub use recommendations::{
    generate_topic_id, NewRecommendation, RecommendationRegistry, RegistryDocument, TopicStats,
};
pub use types::{Evidence, MlrId, PaperId, Recommendation, Source, Status};
