use crate::{
    error::AppResult,
    models::{Project, ProjectStatistics, ProjectStatus, Sample, SampleStatus},
    repositories::ProjectRepository,
};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Percentage of analyzed samples, rounded; 0 for a project without samples
pub fn progress_of(samples: &[Sample]) -> u8 {
    let analyzed = samples
        .iter()
        .filter(|s| s.status == SampleStatus::Analyzed)
        .count();
    percent(analyzed, samples.len())
}

fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let part = part.min(total);
    (100.0 * part as f64 / total as f64).round() as u8
}

/// Dashboard aggregates over a set of projects
pub fn summarize(projects: &[Project]) -> ProjectStatistics {
    let mut status_counts: BTreeMap<ProjectStatus, i64> =
        ProjectStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for project in projects {
        *status_counts.entry(project.status).or_insert(0) += 1;
    }

    ProjectStatistics {
        total_projects: projects.len() as i64,
        status_counts,
        total_budget: projects.iter().filter_map(|p| p.budget).sum(),
        total_samples: projects.iter().map(|p| p.samples.len() as i64).sum(),
    }
}

/// Aggregates over every project created by the user
pub async fn statistics_for<R>(projects: &R, user_id: Uuid) -> AppResult<ProjectStatistics>
where
    R: ProjectRepository + ?Sized,
{
    let created = projects.list_projects_by_creator(user_id).await?;
    Ok(summarize(&created))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectFields, SampleFields};
    use chrono::Utc;

    fn sample(status: SampleStatus) -> Sample {
        let mut sample = Sample::new(
            Uuid::new_v4(),
            SampleFields {
                name: "S".into(),
                identification: Uuid::new_v4().to_string(),
                sample_type: None,
                origin: None,
                collection_date: None,
                storage_conditions: None,
                technician_responsible: None,
            },
            Uuid::new_v4(),
        );
        sample.status = status;
        sample
    }

    fn project(status: ProjectStatus, budget: Option<f64>, samples: usize) -> Project {
        let mut project = Project::new(
            ProjectFields {
                project_name: Uuid::new_v4().to_string(),
                research_domain: "Genomics".into(),
                team_lead: Uuid::new_v4(),
                team_members: vec![],
                start_date: Utc::now(),
                deadline: Utc::now(),
                description: "d".into(),
                budget,
                status: Some(status),
            },
            Uuid::new_v4(),
        );
        project.samples = (0..samples).map(|_| Uuid::new_v4()).collect();
        project
    }

    #[test]
    fn test_progress_of_empty_project_is_zero() {
        assert_eq!(progress_of(&[]), 0);
    }

    #[test]
    fn test_progress_rounds_percentage() {
        use SampleStatus::*;
        let half = [Analyzed, Analyzed, Pending, InAnalysis].map(sample);
        assert_eq!(progress_of(&half), 50);

        let three_quarters = [Analyzed, Analyzed, Analyzed, Pending].map(sample);
        assert_eq!(progress_of(&three_quarters), 75);

        let two_thirds = [Analyzed, Analyzed, Pending].map(sample);
        assert_eq!(progress_of(&two_thirds), 67);
    }

    #[test]
    fn test_summary_zero_fills_statuses() {
        let projects = vec![
            project(ProjectStatus::Active, Some(1000.0), 2),
            project(ProjectStatus::Active, None, 1),
            project(ProjectStatus::OnHold, Some(250.5), 0),
        ];

        let stats = summarize(&projects);
        assert_eq!(stats.total_projects, 3);
        assert_eq!(stats.status_counts.len(), ProjectStatus::ALL.len());
        assert_eq!(stats.status_counts[&ProjectStatus::Active], 2);
        assert_eq!(stats.status_counts[&ProjectStatus::OnHold], 1);
        assert_eq!(stats.status_counts[&ProjectStatus::Planning], 0);
        assert_eq!(stats.total_budget, 1250.5);
        assert_eq!(stats.total_samples, 3);
    }

    #[test]
    fn test_summary_of_nothing() {
        let stats = summarize(&[]);
        assert_eq!(stats.total_projects, 0);
        assert!(stats.status_counts.values().all(|c| *c == 0));
        assert_eq!(stats.total_budget, 0.0);
    }
}
