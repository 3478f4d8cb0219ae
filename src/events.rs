use serde::{Deserialize, Serialize};

use crate::application::services::showcase_service::RepoNotice;
use crate::application::services::settings_service::Theme;

/// Broadcast to every connected WebSocket client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum Event {
    #[serde(rename = "repositories_refreshed")]
    RepositoriesRefreshed {
        count: usize,
        notice: Option<RepoNotice>,
        timestamp: String,
    },

    #[serde(rename = "theme_changed")]
    ThemeChanged { theme: Theme, timestamp: String },
}

impl Event {
    pub fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }

    pub fn repositories_refreshed(count: usize, notice: Option<RepoNotice>) -> Self {
        Event::RepositoriesRefreshed {
            count,
            notice,
            timestamp: Self::now(),
        }
    }

    pub fn theme_changed(theme: Theme) -> Self {
        Event::ThemeChanged {
            theme,
            timestamp: Self::now(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::RepositoriesRefreshed { .. } => "RepositoriesRefreshed",
            Event::ThemeChanged { .. } => "ThemeChanged",
        }
    }
}
