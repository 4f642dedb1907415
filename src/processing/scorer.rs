//! Profile scoring and best-match selection

use crate::processing::catalog::{JobProfile, ProfileCatalog};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// How well one document covers one profile's required skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileScore {
    pub profile_id: String,
    pub profile_title: String,
    /// Percentage of required skills present, rounded down (0-100).
    pub score: u8,
    /// Sorted alphabetically.
    pub matched_skills: Vec<String>,
    /// Sorted alphabetically.
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileScorer;

impl ProfileScorer {
    /// Score `profile` against a detected-skill set, ignoring case.
    pub fn score(&self, detected: &BTreeSet<String>, profile: &JobProfile) -> ProfileScore {
        let detected: HashSet<String> = detected.iter().map(|s| s.to_lowercase()).collect();

        // required_skills is a sorted set, so both halves come out sorted
        let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = profile
            .required_skills
            .iter()
            .cloned()
            .partition(|skill| detected.contains(skill));

        let required = profile.required_skills.len().max(1);
        let score = (100 * matched_skills.len() / required) as u8;

        ProfileScore {
            profile_id: profile.id.clone(),
            profile_title: profile.title.clone(),
            score,
            matched_skills,
            missing_skills,
        }
    }

    /// Score every profile, in catalog order.
    pub fn score_all(&self, detected: &BTreeSet<String>, catalog: &ProfileCatalog) -> Vec<ProfileScore> {
        catalog.iter().map(|profile| self.score(detected, profile)).collect()
    }

    /// Highest score wins; on a tie the earliest profile is kept.
    pub fn best_match(scores: &[ProfileScore]) -> Option<&ProfileScore> {
        let mut best: Option<&ProfileScore> = None;
        for candidate in scores {
            if best.map_or(true, |current| candidate.score > current.score) {
                best = Some(candidate);
            }
        }
        best
    }
}
