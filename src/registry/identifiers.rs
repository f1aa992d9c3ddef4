//! Paper and MLR identifier allocation backed by a flat JSON file

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::error::{RegistryError, Result};
use super::types::{MlrId, PaperId};

/// On-disk identifier state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdStore {
    /// `"{first_author}-{year}-{arxiv_id|none}"` -> paper id
    #[serde(default)]
    pub paper_ids: BTreeMap<String, PaperId>,
    /// `"{year}-{paper_id}"` -> last sequence number handed out
    #[serde(default)]
    pub recommendation_ids: BTreeMap<String, u32>,
}

/// Allocates identifiers and flushes the store after every allocation.
#[derive(Debug)]
pub struct IdentifierRegistry {
    path: PathBuf,
    store: IdStore,
    author_counters: HashMap<String, u32>,
}

impl IdentifierRegistry {
    /// Open the store at `path`. A missing, unreadable or corrupt file yields
    /// an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let store = Self::load_store(&path);
        let author_counters = author_counters_from(&store);
        Self {
            path,
            store,
            author_counters,
        }
    }

    fn load_store(path: &Path) -> IdStore {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No existing identifier store at {}", path.display());
                return IdStore::default();
            }
            Err(e) => {
                warn!(
                    "Could not read identifier store {}: {}. Starting fresh.",
                    path.display(),
                    e
                );
                return IdStore::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(store) => store,
            Err(e) => {
                warn!(
                    "Error parsing identifier store {}: {}. Starting fresh.",
                    path.display(),
                    e
                );
                IdStore::default()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> &IdStore {
        &self.store
    }

    /// Look up the paper id for `(first_author, year, arxiv_id)`, allocating
    /// the next one in the author's sequence on first use.
    pub fn get_paper_id(
        &mut self,
        first_author: &str,
        year: i32,
        arxiv_id: Option<&str>,
    ) -> Result<PaperId> {
        let paper_key = format!("{}-{}-{}", first_author, year, arxiv_id.unwrap_or("none"));
        if let Some(existing) = self.store.paper_ids.get(&paper_key) {
            return Ok(existing.clone());
        }

        let prefix = author_prefix(first_author);
        let counter = self.author_counters.entry(prefix.clone()).or_insert(0);
        *counter += 1;
        let paper_id = PaperId::new(&prefix, *counter);

        self.store
            .paper_ids
            .insert(paper_key.clone(), paper_id.clone());
        self.save()?;
        debug!("Generated new paper ID {} for {}", paper_id, paper_key);

        Ok(paper_id)
    }

    /// Mint the next MLR id for `(year, paper_id)`. Every call allocates.
    pub fn generate_id(&mut self, year: i32, paper_id: &PaperId) -> Result<MlrId> {
        let key = format!("{}-{}", year, paper_id);
        let seq = self.store.recommendation_ids.entry(key).or_insert(0);
        *seq += 1;
        let mlr_id = MlrId::new(year, paper_id, *seq);

        self.save()?;
        debug!("Generated new MLR ID {}", mlr_id);
        Ok(mlr_id)
    }

    /// Rewrite the whole store through a temp file and rename, so a crash
    /// never leaves a half-written file behind.
    fn save(&self) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|e| RegistryError::io(parent, e))?;

        let json = serde_json::to_string_pretty(&self.store)?;
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| RegistryError::io(parent, e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| RegistryError::io(tmp.path(), e))?;
        tmp.persist(&self.path)
            .map_err(|e| RegistryError::io(&self.path, e.error))?;
        Ok(())
    }
}

/// ASCII letters of the author name; `"O'Brien"` becomes `"OBrien"`.
pub fn author_prefix(first_author: &str) -> String {
    first_author
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect()
}

fn author_counters_from(store: &IdStore) -> HashMap<String, u32> {
    let mut counters: HashMap<String, u32> = HashMap::new();
    for paper_id in store.paper_ids.values() {
        let id = paper_id.as_str();
        let split = id
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(id.len());
        let (prefix, digits) = id.split_at(split);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if let Ok(n) = digits.parse::<u32>() {
            let entry = counters.entry(prefix.to_string()).or_insert(0);
            *entry = (*entry).max(n);
        }
    }
    counters
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_author_prefix_strips_non_letters() {
        assert_eq!(author_prefix("O'Brien"), "OBrien");
        assert_eq!(author_prefix("von Neumann"), "vonNeumann");
        assert_eq!(author_prefix("Smith-Jones 2nd"), "SmithJonesnd");
    }

    #[test]
    fn test_counters_rebuilt_from_existing_ids() {
        let mut store = IdStore::default();
        store
            .paper_ids
            .insert("Smith-2020-a".to_string(), PaperId::from("Smith002".to_string()));
        store
            .paper_ids
            .insert("Smith-2019-b".to_string(), PaperId::from("Smith001".to_string()));
        store
            .paper_ids
            .insert("junk".to_string(), PaperId::from("not-an-id".to_string()));

        let counters = author_counters_from(&store);
        assert_eq!(counters.get("Smith"), Some(&2));
        assert_eq!(counters.len(), 1);
    }

    #[test]
    fn test_fresh_registry_is_empty() {
        let dir = TempDir::new().unwrap();
        let ids = IdentifierRegistry::open(dir.path().join("ids.json"));
        assert_eq!(ids.store(), &IdStore::default());
        assert!(!ids.path().exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/ids.json");
        let mut ids = IdentifierRegistry::open(&path);
        ids.get_paper_id("Smith", 2020, None).unwrap();
        assert!(path.exists());

        let saved: IdStore = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            saved.paper_ids.get("Smith-2020-none").map(|p| p.as_str()),
            Some("Smith001")
        );
    }

    #[test]
    fn test_shared_prefix_shares_sequence() {
        let dir = TempDir::new().unwrap();
        let mut ids = IdentifierRegistry::open(dir.path().join("ids.json"));
        let a = ids.get_paper_id("OBrien", 2020, None).unwrap();
        let b = ids.get_paper_id("O'Brien", 2020, None).unwrap();
        assert_eq!(a.as_str(), "OBrien001");
        assert_eq!(b.as_str(), "OBrien002");
    }
}
