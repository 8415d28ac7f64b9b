//! Quality objectives tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectiveStatus {
    #[default]
    Open,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObjectivePriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// One quality objective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: Uuid,
    /// Product family the objective belongs to; kept in sync with the
    /// selected family filter
    pub product: String,
    pub description: String,
    pub status: ObjectiveStatus,
    pub priority: ObjectivePriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Objective {
    pub fn new(
        product: String,
        description: String,
        status: ObjectiveStatus,
        priority: ObjectivePriority,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            product,
            description,
            status,
            priority,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Objective counts by status
#[derive(Debug, Clone, Serialize)]
pub struct ObjectiveStats {
    pub total: usize,
    pub open: usize,
    pub in_progress: usize,
    pub completed: usize,
}

pub fn stats(objectives: &[Objective]) -> ObjectiveStats {
    let count = |s: ObjectiveStatus| objectives.iter().filter(|o| o.status == s).count();
    ObjectiveStats {
        total: objectives.len(),
        open: count(ObjectiveStatus::Open),
        in_progress: count(ObjectiveStatus::InProgress),
        completed: count(ObjectiveStatus::Completed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_objective_gets_id_and_timestamps() {
        let o = Objective::new(
            "EXPLORER".to_string(),
            "Reduce CFC DPHU below 2".to_string(),
            ObjectiveStatus::Open,
            ObjectivePriority::High,
        );
        assert!(!o.id.is_nil());
        assert_eq!(o.created_at, o.updated_at);
    }

    #[test]
    fn stats_count_by_status() {
        let mut objs = vec![
            Objective::new("A".into(), "x".into(), ObjectiveStatus::Open, ObjectivePriority::Low),
            Objective::new("A".into(), "y".into(), ObjectiveStatus::Completed, ObjectivePriority::Low),
        ];
        objs[0].status = ObjectiveStatus::InProgress;

        let s = stats(&objs);
        assert_eq!(s.total, 2);
        assert_eq!(s.open, 0);
        assert_eq!(s.in_progress, 1);
        assert_eq!(s.completed, 1);
    }

    #[test]
    fn status_uses_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ObjectiveStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::to_string(&ObjectivePriority::Critical).unwrap(),
            "\"critical\""
        );
    }
}
