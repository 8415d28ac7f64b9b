//! Line-readiness issue tracking
//!
//! The tracked issues are a fixed catalog (id, product, description);
//! only their statuses change, and only statuses are persisted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status of a tracked issue. Serialized forms match the persisted blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IssueStatus {
    #[default]
    Open,
    #[serde(rename = "On going")]
    OnGoing,
    Closed,
}

/// One tracked issue with its current status
#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub id: u32,
    pub product: &'static str,
    pub description: &'static str,
    pub status: IssueStatus,
}

/// Issue completion stats
#[derive(Debug, Clone, Serialize)]
pub struct IssueStats {
    pub total: usize,
    pub open: usize,
    pub on_going: usize,
    pub closed: usize,
    /// Closed issues as a percentage of the total
    pub completion_rate: f64,
}

const CATALOG: &[(u32, &str, &str)] = &[
    (1, "EXPLORER", "CQA1 2000"),
    (2, "EXPLORER", "RUNNING: 24hs, 2000"),
    (3, "EXPLORER", "CQA2 2000"),
    (4, "EXPLORER", "BO PACKING"),
    (5, "EXPLORER", "PSO Videos"),
    (6, "EXPLORER", "ORT: 3 unidades"),
    (7, "EXPLORER", "Consumer screen protector: 100pcs."),
    (8, "EXPLORER", "200 Gate: 100 Unidades no destructivo."),
    (9, "EXPLORER", "R&R"),
    (10, "EXPLORER", "AMFE CFC"),
    (
        11,
        "EXPLORER",
        "PSA activation check: 10pcs. Battery cover, camera deco y Battery PSA.",
    ),
    (12, "EXPLORER", "ISTA (packing). Prioridad."),
    (
        13,
        "EXPLORER",
        "ALT: 17 muestras (destructivo). Prioridad. Shower test - Tumbler test",
    ),
    (14, "EXPLORER", "BO SW"),
    (15, "EXPLORER", "Droptest"),
    (16, "EXPLORER", "Instructivo CQA1 y CQA2"),
    (17, "EXPLORER", "IQC: Cosmético Funcional"),
];

/// True when the id names a catalog issue
pub fn is_known_issue(id: u32) -> bool {
    CATALOG.iter().any(|(i, _, _)| *i == id)
}

/// The full catalog with statuses applied from the persisted state.
/// Issues without a persisted entry are Open.
pub fn catalog(states: &BTreeMap<u32, IssueStatus>) -> Vec<Issue> {
    CATALOG
        .iter()
        .map(|(id, product, description)| Issue {
            id: *id,
            product,
            description,
            status: states.get(id).copied().unwrap_or_default(),
        })
        .collect()
}

/// Completion stats over the catalog
pub fn stats(states: &BTreeMap<u32, IssueStatus>) -> IssueStats {
    let issues = catalog(states);
    let total = issues.len();
    let open = issues.iter().filter(|i| i.status == IssueStatus::Open).count();
    let on_going = issues
        .iter()
        .filter(|i| i.status == IssueStatus::OnGoing)
        .count();
    let closed = issues
        .iter()
        .filter(|i| i.status == IssueStatus::Closed)
        .count();
    let completion_rate = if total > 0 {
        closed as f64 * 100.0 / total as f64
    } else {
        0.0
    };
    IssueStats {
        total,
        open,
        on_going,
        closed,
        completion_rate,
    }
}
