use serde::Serialize;

use crate::content::Project;
use crate::domain::category::Category;
use crate::github::RepositoryRecord;

/// One card in the projects grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShowcaseItem {
    Project {
        #[serde(flatten)]
        project: Project,
        /// Featured project shown in the grid because a filter is active.
        highlighted: bool,
    },
    Repository {
        #[serde(flatten)]
        repo: RepositoryRecord,
        language_color: &'static str,
        demo_url: Option<String>,
    },
}

impl ShowcaseItem {
    fn project(project: Project, highlighted: bool) -> Self {
        ShowcaseItem::Project {
            project,
            highlighted,
        }
    }

    fn repository(repo: RepositoryRecord) -> Self {
        let language_color = repo.language_color();
        let demo_url = repo.demo_url().map(str::to_string);
        ShowcaseItem::Repository {
            repo,
            language_color,
            demo_url,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ShowcaseItem::Project { project, .. } => &project.title,
            ShowcaseItem::Repository { repo, .. } => &repo.name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmptyState {
    pub message: &'static str,
    pub clear_filter: &'static str,
}

/// Projects page contents for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct Showcase {
    pub filter: Option<Category>,
    /// Carousel section, only populated when no filter is active.
    pub featured: Vec<Project>,
    pub grid: Vec<ShowcaseItem>,
}

impl Showcase {
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.is_empty() {
            return None;
        }
        Some(EmptyState {
            message: "No projects found with the selected filter.",
            clear_filter: "/api/projects",
        })
    }
}

impl Showcase {
    /// Narrow the project cards to one technology. Repository cards stay.
    pub fn retain_technology(&mut self, technology: &str) {
        self.grid.retain(|item| match item {
            ShowcaseItem::Project { project, .. } => project
                .technologies
                .iter()
                .any(|t| t.eq_ignore_ascii_case(technology)),
            ShowcaseItem::Repository { .. } => true,
        });
    }

    /// Narrow the repository cards to one primary language. Project cards stay.
    pub fn retain_language(&mut self, language: &str) {
        self.grid.retain(|item| match item {
            ShowcaseItem::Project { .. } => true,
            ShowcaseItem::Repository { repo, .. } => repo
                .language
                .as_deref()
                .is_some_and(|l| l.eq_ignore_ascii_case(language)),
        });
    }
}

/// Every technology used by the projects, first appearance first.
pub fn technologies(projects: &[Project]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for technology in projects.iter().flat_map(|p| &p.technologies) {
        if !seen.contains(technology) {
            seen.push(technology.clone());
        }
    }
    seen
}

/// Every primary language among the repositories, first appearance first.
pub fn languages(repos: &[RepositoryRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for language in repos.iter().filter_map(|r| r.language.as_ref()) {
        if !seen.contains(language) {
            seen.push(language.clone());
        }
    }
    seen
}

/// Combine curated projects with fetched repositories.
///
/// Without a filter, featured projects go to the carousel and stay out of the
/// grid. With a filter, everything is classified and only matching items are
/// kept, featured projects included. Projects always come before repositories.
pub fn merge(projects: &[Project], repos: &[RepositoryRecord], filter: Option<Category>) -> Showcase {
    let (featured, grid_projects): (Vec<Project>, Vec<ShowcaseItem>) = match filter {
        None => (
            projects.iter().filter(|p| p.featured).cloned().collect(),
            projects
                .iter()
                .filter(|p| !p.featured)
                .cloned()
                .map(|p| ShowcaseItem::project(p, false))
                .collect(),
        ),
        Some(category) => (
            Vec::new(),
            projects
                .iter()
                .filter(|p| p.category() == category)
                .cloned()
                .map(|p| {
                    let highlighted = p.featured;
                    ShowcaseItem::project(p, highlighted)
                })
                .collect(),
        ),
    };

    let grid_repos = repos
        .iter()
        .filter(|r| filter.map_or(true, |category| r.category() == category))
        .cloned()
        .map(ShowcaseItem::repository);

    let mut grid = grid_projects;
    grid.extend(grid_repos);

    Showcase {
        filter,
        featured,
        grid,
    }
}
