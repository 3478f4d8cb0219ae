use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::application::events::{Event, EventBus};
use crate::application::ports::RepositorySource;
use crate::content::{Project, SiteContent};
use crate::domain::{languages, merge, technologies, Category, EmptyState, Showcase};
use crate::github::{GitHubError, RepositoryRecord};
use crate::infrastructure::logging::{BoundaryLogger, Hop, Timer};

/// Why the repository list is empty, when it is empty for a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoNotice {
    NotFound,
    RateLimited,
    Unavailable,
}

impl RepoNotice {
    pub fn message(&self) -> &'static str {
        match self {
            RepoNotice::NotFound => "GitHub profile not found.",
            RepoNotice::RateLimited => "GitHub rate limit reached. Repositories will be back shortly.",
            RepoNotice::Unavailable => "GitHub repositories are temporarily unavailable.",
        }
    }
}

impl From<&GitHubError> for RepoNotice {
    fn from(e: &GitHubError) -> Self {
        match e {
            GitHubError::NotFound(_) => RepoNotice::NotFound,
            GitHubError::RateLimited => RepoNotice::RateLimited,
            GitHubError::UnexpectedStatus { .. }
            | GitHubError::Transport(_)
            | GitHubError::Malformed(_) => RepoNotice::Unavailable,
        }
    }
}

/// Last known repository list.
#[derive(Debug, Clone, Default)]
pub struct RepoSnapshot {
    pub repos: Vec<RepositoryRecord>,
    pub notice: Option<RepoNotice>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Filters accepted by the projects page. All of them are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowcaseFilter {
    pub category: Option<Category>,
    /// Narrows project cards.
    pub technology: Option<String>,
    /// Narrows repository cards.
    pub language: Option<String>,
}

impl ShowcaseFilter {
    pub fn category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.category.is_some() || self.technology.is_some() || self.language.is_some()
    }
}

/// Projects page payload.
#[derive(Debug, Clone, Serialize)]
pub struct ShowcaseView {
    #[serde(flatten)]
    pub showcase: Showcase,
    pub notice: Option<RepoNotice>,
    pub notice_message: Option<&'static str>,
    pub empty_state: Option<EmptyState>,
    pub technology: Option<String>,
    pub language: Option<String>,
    /// Values offered by the technology and language filters.
    pub technologies: Vec<String>,
    pub languages: Vec<String>,
    pub github_profile: Option<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// ShowcaseService - 프로젝트 페이지 데이터를 담당
///
/// - 사이트 콘텐츠의 프로젝트 + GitHub 저장소 스냅샷 병합
/// - 카테고리 필터링
/// - 저장소 목록 갱신 (실패 시 빈 목록으로 대체)
pub struct ShowcaseService<RS, EB>
where
    RS: RepositorySource,
    EB: EventBus,
{
    content: Arc<SiteContent>,
    source: Arc<RS>,
    event_bus: EB,
    username: String,
    snapshot: RwLock<RepoSnapshot>,
    refresh_generation: AtomicU64,
    logger: Arc<BoundaryLogger>,
}

impl<RS, EB> ShowcaseService<RS, EB>
where
    RS: RepositorySource,
    EB: EventBus,
{
    pub fn new(
        content: Arc<SiteContent>,
        source: Arc<RS>,
        event_bus: EB,
        username: String,
        logger: Arc<BoundaryLogger>,
    ) -> Self {
        Self {
            content,
            source,
            event_bus,
            username,
            snapshot: RwLock::new(RepoSnapshot::default()),
            refresh_generation: AtomicU64::new(0),
            logger,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn featured_projects(&self) -> Vec<Project> {
        self.content.featured_projects()
    }

    pub async fn snapshot(&self) -> RepoSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Re-fetch repositories and replace the snapshot.
    ///
    /// Failures never propagate: the snapshot becomes empty with a notice.
    /// If a newer refresh started while this one was waiting on GitHub, this
    /// result is dropped. Returns the number of repositories now held.
    pub async fn refresh(&self, trace_id: &str) -> usize {
        let generation = self.refresh_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let hop = Hop::new("ShowcaseService", "GitHub", "list_user_repos");
        let timer = Timer::start();
        self.logger.enter(trace_id, hop, &self.username);

        let (repos, notice) = match self.source.list_user_repos(&self.username).await {
            Ok(repos) => {
                self.logger.leave(trace_id, hop, &timer);
                (repos, None)
            }
            Err(e) => {
                self.logger.degraded(trace_id, hop, &e);
                (Vec::new(), Some(RepoNotice::from(&e)))
            }
        };

        if self.refresh_generation.load(Ordering::SeqCst) != generation {
            info!("[{}] Discarding stale repository refresh #{}", trace_id, generation);
            return self.snapshot.read().await.repos.len();
        }

        let count = repos.len();
        {
            let mut snapshot = self.snapshot.write().await;
            *snapshot = RepoSnapshot {
                repos,
                notice,
                fetched_at: Some(Utc::now()),
            };
        }

        self.event_bus
            .emit(Event::repositories_refreshed(count, notice))
            .await;
        count
    }

    /// Every technology the curated projects use.
    pub fn technologies(&self) -> Vec<String> {
        technologies(&self.content.projects)
    }

    /// Every primary language in the current repository snapshot.
    pub async fn languages(&self) -> Vec<String> {
        languages(&self.snapshot.read().await.repos)
    }

    /// Snapshot with the repository list narrowed to one language.
    pub async fn repositories(&self, language: Option<&str>) -> RepoSnapshot {
        let mut snapshot = self.snapshot.read().await.clone();
        if let Some(language) = language {
            snapshot.repos.retain(|repo| {
                repo.language
                    .as_deref()
                    .is_some_and(|l| l.eq_ignore_ascii_case(language))
            });
        }
        snapshot
    }

    /// Projects page for the given filters.
    pub async fn showcase(&self, trace_id: &str, filter: &ShowcaseFilter) -> ShowcaseView {
        let hop = Hop::new("API", "ShowcaseService", "showcase");
        let timer = Timer::start();
        self.logger.enter(trace_id, hop, filter);

        let snapshot = self.snapshot.read().await.clone();
        let mut showcase = merge(&self.content.projects, &snapshot.repos, filter.category);
        if let Some(technology) = &filter.technology {
            showcase.retain_technology(technology);
        }
        if let Some(language) = &filter.language {
            showcase.retain_language(language);
        }
        let empty_state = filter.is_active().then(|| showcase.empty_state()).flatten();

        let github_profile = (!self.username.is_empty())
            .then(|| format!("https://github.com/{}", self.username));

        self.logger.leave(trace_id, hop, &timer);

        ShowcaseView {
            showcase,
            notice: snapshot.notice,
            notice_message: snapshot.notice.map(|n| n.message()),
            empty_state,
            technology: filter.technology.clone(),
            language: filter.language.clone(),
            technologies: technologies(&self.content.projects),
            languages: languages(&snapshot.repos),
            github_profile,
            fetched_at: snapshot.fetched_at,
        }
    }
}
