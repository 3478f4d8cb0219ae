use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::category::{classify, Category};

/// Public repository as returned by `GET /users/{username}/repos`.
///
/// Field names follow the GitHub payload on the way in and the portfolio
/// API on the way out. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub id: u64,
    pub name: String,
    #[serde(rename(deserialize = "html_url"))]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(rename(deserialize = "stargazers_count"), default)]
    pub stars: u64,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RepositoryRecord {
    /// Topics plus the primary language, the tag set used for categorising.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.topics.iter().map(String::as_str).collect();
        if let Some(language) = &self.language {
            tags.push(language);
        }
        tags
    }

    pub fn category(&self) -> Category {
        classify(&self.tags())
    }

    /// Homepage only when it is set to something non-blank.
    pub fn demo_url(&self) -> Option<&str> {
        self.homepage.as_deref().filter(|h| !h.trim().is_empty())
    }

    pub fn language_color(&self) -> &'static str {
        language_color(self.language.as_deref())
    }
}

/// Badge colour for a repository's primary language.
pub fn language_color(language: Option<&str>) -> &'static str {
    match language {
        Some("JavaScript") => "#f1e05a",
        Some("TypeScript") => "#3178c6",
        Some("HTML") => "#e34c26",
        Some("CSS") => "#563d7c",
        Some("Python") => "#3572A5",
        Some("Java") => "#b07219",
        Some("Go") => "#00ADD8",
        Some("Rust") => "#dea584",
        Some("PHP") => "#4F5D95",
        Some("Ruby") => "#701516",
        Some("C") => "#555555",
        Some("C++") => "#f34b7d",
        Some("C#") => "#178600",
        Some("Swift") => "#ffac45",
        Some("Kotlin") => "#A97BFF",
        Some("Dart") => "#00B4AB",
        Some("Shell") => "#89e051",
        Some("PowerShell") => "#012456",
        Some("Vue") => "#41b883",
        Some("React") => "#61dafb",
        Some("Angular") => "#dd1b16",
        _ => "#6e7781",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> serde_json::Value {
        serde_json::json!({
            "id": 42,
            "name": "Travel-AI",
            "full_name": "someone/Travel-AI",
            "html_url": "https://github.com/someone/Travel-AI",
            "description": null,
            "topics": ["machine-learning", "PyTorch"],
            "homepage": "",
            "stargazers_count": 7,
            "fork": false,
            "language": "Python",
            "updated_at": "2024-05-01T10:00:00Z",
            "watchers_count": 7
        })
    }

    #[test]
    fn test_deserialize_github_payload() {
        let repo: RepositoryRecord = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(repo.id, 42);
        assert_eq!(repo.url, "https://github.com/someone/Travel-AI");
        assert_eq!(repo.stars, 7);
        assert_eq!(repo.description, None);
        assert_eq!(repo.demo_url(), None);
    }

    #[test]
    fn test_tags_include_language() {
        let repo: RepositoryRecord = serde_json::from_value(sample_json()).unwrap();
        assert_eq!(repo.tags(), vec!["machine-learning", "PyTorch", "Python"]);
        // PyTorch and Python tie, PyTorch seen first
        assert_eq!(repo.category(), Category::AiMachineLearning);
    }

    #[test]
    fn test_missing_topics_default_to_empty() {
        let mut json = sample_json();
        json.as_object_mut().unwrap().remove("topics");
        let repo: RepositoryRecord = serde_json::from_value(json).unwrap();
        assert!(repo.topics.is_empty());
        assert_eq!(repo.category(), Category::DataScience);
    }

    #[test]
    fn test_serializes_with_portfolio_names() {
        let repo: RepositoryRecord = serde_json::from_value(sample_json()).unwrap();
        let out = serde_json::to_value(&repo).unwrap();
        assert_eq!(out["url"], "https://github.com/someone/Travel-AI");
        assert_eq!(out["stars"], 7);
        assert!(out.get("html_url").is_none());
    }

    #[test]
    fn test_language_color_fallback() {
        assert_eq!(language_color(Some("Rust")), "#dea584");
        assert_eq!(language_color(Some("COBOL")), "#6e7781");
        assert_eq!(language_color(None), "#6e7781");
    }
}
