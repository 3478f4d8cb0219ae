use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::category::{classify, Category};

/// Everything the site renders that isn't fetched at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteContent {
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub main_nav: Vec<NavItem>,
    pub social: Social,
    pub contact: ContactInfo,
    #[serde(default)]
    pub colors: Colors,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub tech_icons: Vec<TechIcon>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl SiteContent {
    pub fn featured_projects(&self) -> Vec<Project> {
        self.projects.iter().filter(|p| p.featured).cloned().collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Social {
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            primary: "#0ea5e9".to_string(),
            secondary: "#6366f1".to_string(),
            accent: "#f97316".to_string(),
            background: "#0f172a".to_string(),
            text: "#f8fafc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub duration: String,
    pub description: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// Curated project entry from site content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Source code link
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub demo_link: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl Project {
    pub fn category(&self) -> Category {
        classify(&self.technologies)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechIcon {
    pub name: String,
    pub icon_name: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    pub position: String,
    pub content: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub linkedin_profile: Option<String>,
}

impl Recommendation {
    /// e.g. "August 2024"
    pub fn display_date(&self) -> String {
        self.date.format("%B %Y").to_string()
    }
}
