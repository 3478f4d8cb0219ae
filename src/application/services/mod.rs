pub mod contact_service;
pub mod settings_service;
pub mod showcase_service;

pub use contact_service::{ContactError, ContactReceipt, ContactRequest, ContactService};
pub use settings_service::{SettingsService, Theme};
pub use showcase_service::{RepoNotice, RepoSnapshot, ShowcaseFilter, ShowcaseService, ShowcaseView};
