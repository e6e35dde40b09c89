//! Input contract: the vocabulary registry and documentation units handed
//! over by the front end.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::DocPriority;

/// A declared folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    pub desc: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub resolved_path: Option<String>,
    #[serde(default)]
    pub path_exists: bool,
}

/// A declared module or export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEntry {
    pub desc: String,
    #[serde(default)]
    pub type_signature: Option<String>,
    #[serde(default)]
    pub import_path: Option<String>,
    #[serde(default)]
    pub resolved_path: Option<String>,
    #[serde(default)]
    pub path_exists: bool,
}

/// Already-merged vocabulary, one map per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyRegistry {
    #[serde(default)]
    pub folders: BTreeMap<String, FolderEntry>,
    #[serde(default)]
    pub modules: BTreeMap<String, CodeEntry>,
    #[serde(default)]
    pub exports: BTreeMap<String, CodeEntry>,
    /// name → description
    #[serde(default)]
    pub terms: BTreeMap<String, String>,
}

/// Names a documentation unit refers to, per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct References {
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub terms: Vec<String>,
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub exports: Vec<String>,
}

impl References {
    /// Same lists with repeats removed, first occurrence kept.
    pub fn deduped(&self) -> References {
        References {
            modules: dedup(&self.modules),
            terms: dedup(&self.terms),
            folders: dedup(&self.folders),
            exports: dedup(&self.exports),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
            && self.terms.is_empty()
            && self.folders.is_empty()
            && self.exports.is_empty()
    }
}

fn dedup(names: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// One documentation file with its content and declared references.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationUnit {
    pub file_path: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub references: References,
    #[serde(default)]
    pub priority: DocPriority,
    #[serde(default)]
    pub explains: String,
}
