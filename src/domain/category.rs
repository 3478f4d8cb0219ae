use serde::{Deserialize, Serialize};

/// Technology domain a project or repository is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "App Development")]
    AppDevelopment,
    #[serde(rename = "Data Science")]
    DataScience,
    #[serde(rename = "Game Development")]
    GameDevelopment,
    #[serde(rename = "AI/Machine Learning")]
    AiMachineLearning,
}

impl Category {
    /// Filter button order on the projects page.
    pub const ALL: [Category; 5] = [
        Category::WebDevelopment,
        Category::AppDevelopment,
        Category::DataScience,
        Category::GameDevelopment,
        Category::AiMachineLearning,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::WebDevelopment => "Web Development",
            Category::AppDevelopment => "App Development",
            Category::DataScience => "Data Science",
            Category::GameDevelopment => "Game Development",
            Category::AiMachineLearning => "AI/Machine Learning",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::WebDevelopment => "web-development",
            Category::AppDevelopment => "app-development",
            Category::DataScience => "data-science",
            Category::GameDevelopment => "game-development",
            Category::AiMachineLearning => "ai-machine-learning",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s) || c.slug() == s)
            .ok_or_else(|| format!("Invalid category: {}", s))
    }
}

/// Tag -> category lookup. Tags not listed here don't vote.
fn lookup(tag: &str) -> Option<Category> {
    let category = match tag {
        "React" | "Next.js" | "HTML/CSS" | "Node.js" | "Express" | "JavaScript" | "TypeScript"
        | "Spring Boot" => Category::WebDevelopment,

        "Java" | "Android" | "iOS" | "Swift" | "Flutter" | "React Native" => {
            Category::AppDevelopment
        }

        "Python" | "Pandas" | "Scikit-learn" | "Matplotlib" | "Data Analysis" => {
            Category::DataScience
        }

        "Unity" | "Unreal Engine" | "C#" | "C++" | "Game Development" => Category::GameDevelopment,

        "AI Integration" | "WebSockets" | "TensorFlow" | "PyTorch" | "Machine Learning" => {
            Category::AiMachineLearning
        }

        _ => return None,
    };
    Some(category)
}

/// Derive the category for a set of technology tags.
///
/// The explicit "Game Development" and "AI Integration" tags win outright.
/// Otherwise the most frequent mapped category wins, ties going to whichever
/// was seen first. Anything unrecognised lands in Web Development.
pub fn classify<S: AsRef<str>>(tags: &[S]) -> Category {
    if tags.iter().any(|t| t.as_ref() == "Game Development") {
        return Category::GameDevelopment;
    }
    if tags.iter().any(|t| t.as_ref() == "AI Integration") {
        return Category::AiMachineLearning;
    }

    // (category, votes) in first-seen order
    let mut tally: Vec<(Category, usize)> = Vec::with_capacity(Category::ALL.len());
    for category in tags.iter().filter_map(|t| lookup(t.as_ref())) {
        match tally.iter_mut().find(|(c, _)| *c == category) {
            Some((_, votes)) => *votes += 1,
            None => tally.push((category, 1)),
        }
    }

    let mut winner: Option<(Category, usize)> = None;
    for (category, votes) in tally {
        if winner.map_or(true, |(_, best)| votes > best) {
            winner = Some((category, votes));
        }
    }

    winner
        .map(|(category, _)| category)
        .unwrap_or(Category::WebDevelopment)
}
