use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use super::models::SiteContent;

/// Content shipped with the binary, used when no content file is on disk.
const BUNDLED_CONTENT: &str = include_str!("../../content/site.yaml");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read content file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid site content: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub struct ContentLoader;

impl ContentLoader {
    pub fn parse(yaml: &str) -> Result<SiteContent, ContentError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn bundled() -> Result<SiteContent, ContentError> {
        Self::parse(BUNDLED_CONTENT)
    }

    /// Load content from `path`, falling back to the bundled copy if the
    /// file doesn't exist. A file that exists but fails to parse is an error.
    pub async fn load(path: &Path) -> Result<SiteContent, ContentError> {
        match tokio::fs::read_to_string(path).await {
            Ok(yaml) => {
                let content = Self::parse(&yaml)?;
                info!(
                    "Loaded site content from {} ({} projects, {} recommendations)",
                    path.display(),
                    content.projects.len(),
                    content.recommendations.len()
                );
                Ok(content)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Content file {} not found, using bundled content", path.display());
                Self::bundled()
            }
            Err(e) => Err(ContentError::Io {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }
}
