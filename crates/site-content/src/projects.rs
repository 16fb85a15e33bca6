use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    Live,
    #[serde(rename = "In Progress")]
    InProgress,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
}

impl Project {
    /// Numeric year for ordering; missing or non-numeric years count as 0.
    fn year_value(&self) -> i32 {
        self.year
            .as_deref()
            .and_then(|y| y.trim().parse().ok())
            .unwrap_or(0)
    }
}

/// All projects, newest year first. Projects from the same year keep their order.
pub fn all_projects(projects: &[Project]) -> Vec<Project> {
    let mut sorted = projects.to_vec();
    sorted.sort_by_key(|p| std::cmp::Reverse(p.year_value()));
    sorted
}

pub fn all_tags(projects: &[Project]) -> Vec<String> {
    projects
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn project_by_id(projects: &[Project], id: u32) -> Option<&Project> {
    projects.iter().find(|p| p.id == id)
}

pub fn projects_by_tag<'a>(projects: &'a [Project], tag: &str) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| p.tags.iter().any(|t| t == tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Project> {
        serde_json::from_str(
            r#"[
                {"id": 1, "title": "Events", "description": "d", "tags": ["Next.js", "SEO"],
                 "link": "https://a.example", "year": "2025", "status": "Live"},
                {"id": 2, "title": "Bot", "description": "d", "tags": ["Python"],
                 "link": "https://b.example", "year": "2026", "status": "In Progress"},
                {"id": 3, "title": "Old", "description": "d", "tags": ["SEO"],
                 "link": "https://c.example"},
                {"id": 4, "title": "Site", "description": "d", "tags": [],
                 "link": "https://d.example", "year": "2025", "status": "Archived"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn sorts_by_year_descending_and_stable() {
        let ids: Vec<u32> = all_projects(&sample()).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1, 4, 3]);
    }

    #[test]
    fn tags_and_lookups() {
        let projects = sample();
        assert_eq!(all_tags(&projects), vec!["Next.js", "Python", "SEO"]);
        assert_eq!(project_by_id(&projects, 2).map(|p| p.status), Some(Some(ProjectStatus::InProgress)));
        assert!(project_by_id(&projects, 99).is_none());
        let seo: Vec<u32> = projects_by_tag(&projects, "SEO").iter().map(|p| p.id).collect();
        assert_eq!(seo, vec![1, 3]);
    }
}
