//! Job profiles, skill synonyms and stopwords
//!
//! These tables are loaded once at startup and never mutated afterwards, so a
//! single `SkillCatalog` can be shared read-only by any number of analyses.
//! The default catalog is compiled into the binary; a TOML file with the same
//! layout can replace it without code changes:
//!
//! ```toml
//! [[profiles]]
//! id = "software_engineer"
//! title = "Software Engineer"
//! skills = ["python", "data structures", "git"]
//!
//! [synonyms]
//! py = "python"
//! ```

use crate::error::{Result, ResumeScannerError};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

const DEFAULT_CATALOG: &str = include_str!("../../assets/catalog.toml");
const ENGLISH_STOPWORDS: &str = include_str!("../../assets/stopwords_en.txt");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    profiles: Vec<ProfileEntry>,
    #[serde(default)]
    synonyms: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct ProfileEntry {
    id: String,
    title: String,
    skills: Vec<String>,
}

/// A named role template with the skills a resume is scored against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobProfile {
    pub id: String,
    pub title: String,
    /// Lowercased, trimmed and never empty.
    pub required_skills: BTreeSet<String>,
}

impl JobProfile {
    pub fn new<I, S>(id: impl Into<String>, title: impl Into<String>, skills: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ResumeScannerError::Catalog("Profile id must not be empty".to_string()));
        }

        let mut required_skills = BTreeSet::new();
        for skill in skills {
            let skill = skill.as_ref().trim().to_lowercase();
            if skill.is_empty() {
                return Err(ResumeScannerError::Catalog(format!(
                    "Profile '{}' contains a blank skill",
                    id
                )));
            }
            required_skills.insert(skill);
        }

        if required_skills.is_empty() {
            return Err(ResumeScannerError::Catalog(format!(
                "Profile '{}' has no required skills",
                id
            )));
        }

        Ok(Self {
            id,
            title: title.into(),
            required_skills,
        })
    }

    /// Skills made of several words, e.g. "machine learning".
    pub fn multi_word_skills(&self) -> impl Iterator<Item = &str> {
        self.required_skills
            .iter()
            .map(String::as_str)
            .filter(|skill| skill.contains(' '))
    }
}

/// Profiles in a fixed order. Order decides best-match ties.
#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    profiles: Vec<JobProfile>,
}

impl ProfileCatalog {
    pub fn new(profiles: Vec<JobProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(ResumeScannerError::Catalog("Catalog has no profiles".to_string()));
        }

        let mut seen = HashSet::new();
        for profile in &profiles {
            if !seen.insert(profile.id.as_str()) {
                return Err(ResumeScannerError::Catalog(format!(
                    "Duplicate profile id '{}'",
                    profile.id
                )));
            }
        }

        Ok(Self { profiles })
    }

    pub fn profiles(&self) -> &[JobProfile] {
        &self.profiles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobProfile> {
        self.profiles.iter()
    }

    pub fn get(&self, id: &str) -> Option<&JobProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Every multi-word skill across all profiles, deduplicated.
    pub fn multi_word_skills(&self) -> BTreeSet<String> {
        self.profiles
            .iter()
            .flat_map(JobProfile::multi_word_skills)
            .map(str::to_string)
            .collect()
    }
}

/// Maps raw tokens to canonical skill names.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    entries: HashMap<String, String>,
}

impl SynonymTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v.as_ref().trim().to_lowercase()))
            .collect();
        Self { entries }
    }

    /// Canonical form of `token`: its synonym if one exists, otherwise the trimmed token.
    pub fn normalize_skill(&self, token: &str) -> String {
        let token = token.trim();
        match self.entries.get(token) {
            Some(canonical) => canonical.clone(),
            None => token.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// The standard English stopword list.
    pub fn english() -> Self {
        Self::from_words(ENGLISH_STOPWORDS.lines())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// All static tables the analysis pipeline reads.
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    pub profiles: ProfileCatalog,
    pub synonyms: SynonymTable,
    pub stopwords: StopwordSet,
}

impl SkillCatalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CATALOG)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| ResumeScannerError::Catalog(format!("Failed to parse catalog: {}", e)))?;

        let profiles = file
            .profiles
            .into_iter()
            .map(|entry| JobProfile::new(entry.id, entry.title, entry.skills))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            profiles: ProfileCatalog::new(profiles)?,
            synonyms: SynonymTable::new(file.synonyms),
            stopwords: StopwordSet::english(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResumeScannerError::Catalog(format!("Failed to read catalog '{}': {}", path.display(), e))
        })?;
        let catalog = Self::from_toml_str(&content)?;
        info!(
            "Loaded {} profiles and {} synonyms from {}",
            catalog.profiles.len(),
            catalog.synonyms.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Load `path` when given, the embedded catalog otherwise.
    pub fn load_or_embedded(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::embedded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog() {
        let catalog = SkillCatalog::embedded().unwrap();
        let ids: Vec<&str> = catalog.profiles.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["software_engineer", "data_scientist", "frontend_engineer", "devops_engineer"]
        );

        let devops = catalog.profiles.get("devops_engineer").unwrap();
        assert_eq!(devops.title, "DevOps / SRE");
        assert_eq!(devops.required_skills.len(), 11);
        assert!(devops.required_skills.contains("ci/cd"));
    }

    #[test]
    fn test_multi_word_skills_collected_across_profiles() {
        let catalog = SkillCatalog::embedded().unwrap();
        let multi: Vec<String> = catalog.profiles.multi_word_skills().into_iter().collect();
        assert_eq!(multi, vec!["data structures", "deep learning", "machine learning"]);
    }

    #[test]
    fn test_synonym_normalization() {
        let catalog = SkillCatalog::embedded().unwrap();
        assert_eq!(catalog.synonyms.normalize_skill("ml"), "machine learning");
        assert_eq!(catalog.synonyms.normalize_skill(" js "), "javascript");
        assert_eq!(catalog.synonyms.normalize_skill("rust"), "rust");
        assert_eq!(catalog.synonyms.normalize_skill("  kafka\n"), "kafka");
    }

    #[test]
    fn test_english_stopwords() {
        let stopwords = StopwordSet::english();
        assert_eq!(stopwords.len(), 179);
        assert!(stopwords.contains("the"));
        assert!(stopwords.contains("wouldn't"));
        assert!(!stopwords.contains("python"));
    }

    #[test]
    fn test_profile_without_skills_rejected() {
        let toml = r#"
            [[profiles]]
            id = "empty"
            title = "Empty"
            skills = []
        "#;
        assert!(matches!(SkillCatalog::from_toml_str(toml), Err(ResumeScannerError::Catalog(_))));
    }

    #[test]
    fn test_duplicate_profile_ids_rejected() {
        let toml = r#"
            [[profiles]]
            id = "dev"
            title = "Developer"
            skills = ["rust"]

            [[profiles]]
            id = "dev"
            title = "Another Developer"
            skills = ["go"]
        "#;
        assert!(SkillCatalog::from_toml_str(toml).is_err());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(ProfileCatalog::new(Vec::new()).is_err());
    }

    #[test]
    fn test_skills_are_lowercased_and_deduplicated() {
        let profile = JobProfile::new("data", "Data", ["SQL", " sql ", "Machine Learning"]).unwrap();
        let skills: Vec<&str> = profile.required_skills.iter().map(String::as_str).collect();
        assert_eq!(skills, vec!["machine learning", "sql"]);
    }

    #[test]
    fn test_custom_catalog_without_synonyms() {
        let toml = r#"
            [[profiles]]
            id = "rustacean"
            title = "Rust Developer"
            skills = ["rust", "tokio", "async programming"]
        "#;
        let catalog = SkillCatalog::from_toml_str(toml).unwrap();
        assert!(catalog.synonyms.is_empty());
        assert_eq!(catalog.profiles.len(), 1);
        assert!(catalog.profiles.multi_word_skills().contains("async programming"));
    }
}
