// hacknect-service/src/services/vectorizer.rs
use regex::Regex;
use std::collections::HashSet;

pub const DEFAULT_VOCABULARY: [&str; 25] = [
    "Python",
    "React",
    "Node.js",
    "Machine Learning",
    "Data Science",
    "UI Design",
    "UX Research",
    "Solidity",
    "Blockchain",
    "TypeScript",
    "Go",
    "Kubernetes",
    "Docker",
    "TensorFlow",
    "FastAPI",
    "Next.js",
    "Tailwind CSS",
    "Firebase",
    "PostgreSQL",
    "MongoDB",
    "Cybersecurity",
    "Cloud Computing",
    "AWS",
    "Figma",
    "DevOps",
];

lazy_static::lazy_static! {
    // Commas, semicolons, newlines, or a slash with spaces around it ("UI / UX")
    static ref SKILL_SEPARATOR: Regex = Regex::new(r"\s*(?:[,;\n]|\s/\s)\s*").unwrap();
}

/// Fixed, ordered list of canonical skill terms.
///
/// Presence vectors built from the same vocabulary are comparable position by position.
/// Tokens that are not in the vocabulary are dropped when vectorizing.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillVocabulary {
    terms: Vec<String>,
    lowered: Vec<String>,
}

impl SkillVocabulary {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let terms: Vec<String> = terms
            .into_iter()
            .map(Into::into)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
            .collect();
        let lowered = terms.iter().map(|t| t.to_lowercase()).collect();

        Self { terms, lowered }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    // Binary presence vector: position i is 1.0 iff some token equals terms[i], ignoring case
    pub fn vectorize<I, S>(&self, skills: I) -> Vec<f64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: HashSet<String> = skills
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .collect();

        self.lowered
            .iter()
            .map(|term| if tokens.contains(term) { 1.0 } else { 0.0 })
            .collect()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_VOCABULARY.iter().copied())
    }
}

// Split an onboarding skills field into tokens, keeping the first spelling of duplicates
pub fn parse_skill_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    SKILL_SEPARATOR
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}
