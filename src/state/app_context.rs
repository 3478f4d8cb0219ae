use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::events::{BroadcastEventBus, Event, EventBus};
use crate::application::services::{ContactService, SettingsService, ShowcaseService};
use crate::carousel::CarouselSettings;
use crate::config::AppConfig;
use crate::content::SiteContent;
use crate::github::{extract_github_username, GitHubClient};
use crate::infrastructure::logging::BoundaryLogger;

/// AppContext - 서비스 조립 및 핸들러 공유 상태
///
/// 콘텐츠는 시작 시 한 번 읽고, 저장소 목록만 ShowcaseService가 갱신한다.
#[derive(Clone)]
pub struct AppContext {
    // Services
    pub showcase_service: Arc<ShowcaseService<GitHubClient, BroadcastEventBus>>,
    pub contact_service: Arc<ContactService>,
    pub settings_service: Arc<SettingsService<BroadcastEventBus>>,

    // Infrastructure
    pub event_bus: BroadcastEventBus,
    pub logger: Arc<BoundaryLogger>,

    // Config
    pub content: Arc<SiteContent>,
    pub carousel_settings: CarouselSettings,
}

impl AppContext {
    pub fn new(config: &AppConfig, content: SiteContent) -> Self {
        let client = GitHubClient::with_base_url(config.github_api_base.clone(), config.github_token.clone());
        Self::with_client(config, content, client)
    }

    /// Same wiring with a caller-supplied GitHub client (tests point it at a mock server).
    pub fn with_client(config: &AppConfig, content: SiteContent, client: GitHubClient) -> Self {
        let content = Arc::new(content);
        let logger = Arc::new(BoundaryLogger::new());
        let event_bus = BroadcastEventBus::new_default(logger.clone());

        let username = config.github_username.clone().unwrap_or_else(|| {
            content
                .social
                .github
                .as_deref()
                .map(extract_github_username)
                .unwrap_or_default()
        });

        let showcase_service = Arc::new(ShowcaseService::new(
            content.clone(),
            Arc::new(client),
            event_bus.clone(),
            username,
            logger.clone(),
        ));
        let contact_service = Arc::new(ContactService::new(config.contact_delay, logger.clone()));
        let settings_service = Arc::new(SettingsService::new(config.theme, event_bus.clone()));

        Self {
            showcase_service,
            contact_service,
            settings_service,
            event_bus,
            logger,
            content,
            carousel_settings: config.carousel,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe()
    }
}
