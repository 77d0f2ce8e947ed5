use super::ProjectStatus;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Dashboard aggregates over the projects a user created
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatistics {
    pub total_projects: i64,
    /// Every status is present, zero when unused
    pub status_counts: BTreeMap<ProjectStatus, i64>,
    pub total_budget: f64,
    pub total_samples: i64,
}
