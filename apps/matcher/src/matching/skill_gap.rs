//! Skill-Gap Advisor — required skills the candidate lacks, with a learning
//! resource for each one the catalog knows about.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{normalize_skill, SkillList};

/// Immutable map from a normalized skill to one learning-resource link.
/// Loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    links: HashMap<String, String>,
}

impl ResourceCatalog {
    pub fn builtin() -> Self {
        Self::from_pairs([
            ("python", "https://www.youtube.com/watch?v=rfscVS0vtbw"),
            ("flask", "https://www.youtube.com/watch?v=oQ5UfJqW5Jo"),
            ("pandas", "https://www.youtube.com/watch?v=EhYC02PD_gc"),
            ("numpy", "https://www.youtube.com/watch?v=YqUcT-BFUM0"),
            ("machine learning", "https://www.youtube.com/watch?v=SQkaBIP2JoA"),
            ("javascript", "https://www.youtube.com/watch?v=FtaQSdrl7YA"),
            ("react", "https://www.youtube.com/watch?v=lAFbKzO-fss"),
            ("html", "https://www.youtube.com/watch?v=kUMe1FH4CHE"),
            ("css", "https://www.youtube.com/watch?v=OEV8gHsKqL4"),
            ("sql", "https://www.youtube.com/watch?v=NTgejLheGeU"),
            ("c++", "https://www.youtube.com/watch?v=vLnPwxZdW4Y"),
            ("java", "https://www.youtube.com/watch?v=A74TOX803D0"),
        ])
    }

    /// Keys are normalized on the way in; later duplicates win.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let links = pairs
            .into_iter()
            .map(|(skill, link)| (normalize_skill(skill.as_ref()), link.into()))
            .filter(|(skill, _)| !skill.is_empty())
            .collect();
        Self { links }
    }

    /// Reads a JSON object of `skill -> link`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read resource catalog {}", path.display()))?;
        let pairs: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("Resource catalog {} is not a JSON object of strings", path.display()))?;
        Ok(Self::from_pairs(pairs))
    }

    pub fn lookup(&self, skill: &str) -> Option<&str> {
        self.links.get(&normalize_skill(skill)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapItem {
    pub skill: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    /// Normalized required skills the candidate does not have.
    pub missing: Vec<String>,
    /// The subset of `missing` with a known resource.
    pub roadmap: Vec<RoadmapItem>,
}

/// `required − possessed`, in the posting's order, each missing skill
/// annotated when the catalog has a resource for it.
pub fn skill_gap(possessed: &SkillList, required: &SkillList, resources: &ResourceCatalog) -> SkillGap {
    let possessed: HashSet<String> = possessed.normalized_set();

    let missing: Vec<String> = required
        .normalized()
        .into_iter()
        .filter(|skill| !possessed.contains(skill))
        .collect();

    let roadmap = missing
        .iter()
        .filter_map(|skill| {
            resources.lookup(skill).map(|link| RoadmapItem {
                skill: capitalize(skill),
                link: link.to_string(),
            })
        })
        .collect();

    SkillGap { missing, roadmap }
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(skill: &str) -> String {
    let mut chars = skill.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
