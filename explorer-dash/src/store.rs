//! Local JSON blob persistence
//!
//! Operator state lives in five independent JSON files under the root
//! folder, one per concern. Every mutation rewrites the owning file
//! immediately. A missing or unparseable file degrades to the empty
//! default with a warning; bad state on disk never prevents startup.

use crate::issues::IssueStatus;
use crate::objectives::Objective;
use explorer_common::Result;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::warn;

pub const STATE_FILE: &str = "state.json";
pub const NOTES_FILE: &str = "failure_notes.json";
pub const IMAGES_FILE: &str = "failure_images.json";
pub const ISSUES_FILE: &str = "issues.json";
pub const OBJECTIVES_FILE: &str = "objectives.json";

/// The operator's saved filter selections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedFilters {
    pub family: Option<String>,
    /// Normalized days (YYYY-MM-DD)
    pub days: BTreeSet<String>,
    pub processes: BTreeSet<String>,
}

/// Dashboard state blob: filters, manual overrides, testcode selections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardState {
    pub filters: SavedFilters,
    /// family -> day -> field -> raw entered value
    pub manual: BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>,
    /// process -> testcodes the operator chose to show
    pub testcode_selections: BTreeMap<String, BTreeSet<String>>,
}

/// Operator note attached to a failure row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureNote {
    pub cause: String,
    pub action: String,
}

/// Note/image key for a failure row
pub fn failure_key(process: &str, testcode: &str) -> String {
    format!("{}-{}", process, testcode)
}

/// In-memory image of all five blobs
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreData {
    pub state: DashboardState,
    pub notes: BTreeMap<String, FailureNote>,
    pub images: BTreeMap<String, String>,
    pub issue_states: BTreeMap<u32, IssueStatus>,
    pub objectives: Vec<Objective>,
}

/// Persistent store over the dashboard root folder
pub struct Store {
    root: PathBuf,
    inner: RwLock<StoreData>,
}

impl Store {
    /// Open the store, loading whatever blobs exist under the root
    pub fn open(root: &Path) -> Self {
        let data = StoreData {
            state: load_blob(root, STATE_FILE),
            notes: load_blob(root, NOTES_FILE),
            images: load_blob(root, IMAGES_FILE),
            issue_states: load_blob(root, ISSUES_FILE),
            objectives: load_blob(root, OBJECTIVES_FILE),
        };
        Self {
            root: root.to_path_buf(),
            inner: RwLock::new(data),
        }
    }

    pub async fn filters(&self) -> SavedFilters {
        self.inner.read().await.state.filters.clone()
    }

    pub async fn set_filters(&self, filters: SavedFilters) -> Result<()> {
        let mut data = self.inner.write().await;
        data.state.filters = filters;
        self.write_blob(STATE_FILE, &data.state)
    }

    /// Manual overrides for one family: day -> field -> value
    pub async fn manual_for(&self, family: &str) -> BTreeMap<String, BTreeMap<String, String>> {
        self.inner
            .read()
            .await
            .state
            .manual
            .get(family)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set_manual(
        &self,
        family: &str,
        day: &str,
        field: &str,
        value: String,
    ) -> Result<()> {
        let mut data = self.inner.write().await;
        data.state
            .manual
            .entry(family.to_string())
            .or_default()
            .entry(day.to_string())
            .or_default()
            .insert(field.to_string(), value);
        self.write_blob(STATE_FILE, &data.state)
    }

    /// Saved testcode selection for a process. `None` means never saved;
    /// an empty set is a real selection that matches nothing.
    pub async fn testcode_selection(&self, process: &str) -> Option<BTreeSet<String>> {
        self.inner
            .read()
            .await
            .state
            .testcode_selections
            .get(process)
            .cloned()
    }

    pub async fn set_testcode_selection(
        &self,
        process: &str,
        testcodes: BTreeSet<String>,
    ) -> Result<()> {
        let mut data = self.inner.write().await;
        data.state
            .testcode_selections
            .insert(process.to_string(), testcodes);
        self.write_blob(STATE_FILE, &data.state)
    }

    pub async fn note(&self, key: &str) -> Option<FailureNote> {
        self.inner.read().await.notes.get(key).cloned()
    }

    pub async fn set_note(&self, key: &str, note: FailureNote) -> Result<()> {
        let mut data = self.inner.write().await;
        data.notes.insert(key.to_string(), note);
        self.write_blob(NOTES_FILE, &data.notes)
    }

    pub async fn image(&self, key: &str) -> Option<String> {
        self.inner.read().await.images.get(key).cloned()
    }

    pub async fn has_image(&self, key: &str) -> bool {
        self.inner.read().await.images.contains_key(key)
    }

    /// Attach an image to a failure row; `None` removes the entry
    pub async fn set_image(&self, key: &str, image: Option<String>) -> Result<()> {
        let mut data = self.inner.write().await;
        match image {
            Some(image) => {
                data.images.insert(key.to_string(), image);
            }
            None => {
                data.images.remove(key);
            }
        }
        self.write_blob(IMAGES_FILE, &data.images)
    }

    pub async fn issue_states(&self) -> BTreeMap<u32, IssueStatus> {
        self.inner.read().await.issue_states.clone()
    }

    pub async fn set_issue_status(&self, id: u32, status: IssueStatus) -> Result<()> {
        let mut data = self.inner.write().await;
        data.issue_states.insert(id, status);
        self.write_blob(ISSUES_FILE, &data.issue_states)
    }

    pub async fn objectives(&self) -> Vec<Objective> {
        self.inner.read().await.objectives.clone()
    }

    pub async fn add_objective(&self, objective: Objective) -> Result<()> {
        let mut data = self.inner.write().await;
        data.objectives.push(objective);
        self.write_blob(OBJECTIVES_FILE, &data.objectives)
    }

    /// Replace the objective with the same id; false when no match
    pub async fn update_objective(&self, objective: Objective) -> Result<bool> {
        let mut data = self.inner.write().await;
        match data.objectives.iter_mut().find(|o| o.id == objective.id) {
            Some(slot) => {
                *slot = objective;
                self.write_blob(OBJECTIVES_FILE, &data.objectives)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn delete_objective(&self, id: uuid::Uuid) -> Result<bool> {
        let mut data = self.inner.write().await;
        let before = data.objectives.len();
        data.objectives.retain(|o| o.id != id);
        if data.objectives.len() == before {
            return Ok(false);
        }
        self.write_blob(OBJECTIVES_FILE, &data.objectives)?;
        Ok(true)
    }

    /// Rewrite every objective's product to the newly selected family
    pub async fn sync_objectives_product(&self, family: &str) -> Result<()> {
        let mut data = self.inner.write().await;
        let mut changed = false;
        for o in data.objectives.iter_mut() {
            if o.product != family {
                o.product = family.to_string();
                o.updated_at = chrono::Utc::now();
                changed = true;
            }
        }
        if changed {
            self.write_blob(OBJECTIVES_FILE, &data.objectives)?;
        }
        Ok(())
    }

    /// Clone of everything persisted, for the backup export
    pub async fn export(&self) -> StoreData {
        self.inner.read().await.clone()
    }

    /// Remove all five blob files and reset in-memory state
    pub async fn clear_all(&self) -> Result<()> {
        let mut data = self.inner.write().await;
        for file in [
            STATE_FILE,
            NOTES_FILE,
            IMAGES_FILE,
            ISSUES_FILE,
            OBJECTIVES_FILE,
        ] {
            let path = self.root.join(file);
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        *data = StoreData::default();
        Ok(())
    }

    fn write_blob<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.root.join(file);
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}

fn load_blob<T: DeserializeOwned + Default>(root: &Path, file: &str) -> T {
    let path = root.join(file);
    if !path.exists() {
        return T::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring unparseable {}: {}", path.display(), e);
                T::default()
            }
        },
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            T::default()
        }
    }
}
