use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::application::events::{Event, EventBus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(format!("Invalid theme: {}", s)),
        }
    }
}

/// Site-wide presentation preferences, resolved once at startup.
pub struct SettingsService<EB: EventBus> {
    theme: RwLock<Theme>,
    event_bus: EB,
}

impl<EB: EventBus> SettingsService<EB> {
    pub fn new(initial_theme: Theme, event_bus: EB) -> Self {
        Self {
            theme: RwLock::new(initial_theme),
            event_bus,
        }
    }

    pub async fn theme(&self) -> Theme {
        *self.theme.read().await
    }

    /// Only emits `ThemeChanged` when the value actually changes.
    pub async fn update_theme(&self, theme: Theme) -> Theme {
        let changed = {
            let mut current = self.theme.write().await;
            let changed = *current != theme;
            *current = theme;
            changed
        };

        if changed {
            self.event_bus.emit(Event::theme_changed(theme)).await;
        }
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::BroadcastEventBus;
    use crate::infrastructure::logging::BoundaryLogger;
    use std::sync::Arc;

    fn service() -> SettingsService<BroadcastEventBus> {
        let bus = BroadcastEventBus::new_default(Arc::new(BoundaryLogger::new()));
        SettingsService::new(Theme::default(), bus)
    }

    #[test]
    fn test_theme_parsing() {
        assert_eq!("Light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(" dark ".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[tokio::test]
    async fn test_update_theme_emits_once() {
        let settings = service();
        let mut events = settings.event_bus.subscribe();
        assert_eq!(settings.theme().await, Theme::Dark);

        settings.update_theme(Theme::Light).await;
        settings.update_theme(Theme::Light).await;

        assert_eq!(settings.theme().await, Theme::Light);
        assert!(matches!(
            events.recv().await.unwrap(),
            Event::ThemeChanged { theme: Theme::Light, .. }
        ));
        assert!(events.try_recv().is_err());
    }
}
