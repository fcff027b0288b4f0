//! starlist configuration.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use jsonc_parser::ParseOptions;
use serde::{Deserialize, Serialize};

use crate::prune::{NoPrune, Prune, PruneBeforeHeading};
use crate::{PublishTarget, StarlistError};

use jsonschema::Validator;
use std::sync::OnceLock;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration file names, in discovery order.
pub const CONFIG_FILE_NAMES: [&str; 2] = [".starlist.jsonc", ".starlist.json"];

const DEFAULT_BRANCH: &str = "main";
const DEFAULT_PATH: &str = "README.md";
const DEFAULT_REPO_SUFFIX: &str = "-with-stars";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarlistConfig {
    /// Cache directory.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    #[serde(default)]
    pub cache: CacheSettings,

    /// Values applied to every list that does not override them.
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub lists: Vec<ListConfig>,

    /// Base directory for resolving relative paths.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_cache_dir() -> String {
    ".starlist-cache".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Defaults {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committer: Option<Committer>,
}

/// Destination repository settings. Every field falls back to `defaults`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_suffix: Option<String>,
}

/// Author recorded on published commits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Committer {
    pub name: String,
    pub email: String,
}

/// One awesome list to process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Text prepended to the rendered document.
    #[serde(default)]
    pub about: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prune: Option<PruneConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PruneConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_heading: Option<String>,
}

/// A list with all defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedList {
    pub id: String,
    pub name: String,
    pub source_url: String,
    pub about: String,
    pub prune_before: Option<String>,
    pub target: PublishTarget,
}

impl ResolvedList {
    /// Returns the prune transform configured for this list.
    pub fn pruner(&self) -> Box<dyn Prune> {
        match &self.prune_before {
            Some(title) => Box::new(PruneBeforeHeading::new(title.as_str())),
            None => Box::new(NoPrune),
        }
    }
}

impl StarlistConfig {
    /// Creates a new empty configuration.
    pub fn new() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            cache: CacheSettings::default(),
            defaults: Defaults::default(),
            lists: Vec::new(),
            base_dir: None,
        }
    }

    /// Looks for a configuration file in `dir`.
    ///
    /// `.starlist.jsonc` takes precedence over `.starlist.json`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.as_ref().join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.starlist.jsonc`, `.starlist.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StarlistError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            StarlistError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSON or JSONC string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, StarlistError> {
        // Parse into Value first for validation
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| StarlistError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        // Initialize and check schema
        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(StarlistError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        let config: Self = serde_json::from_value(value)
            .map_err(|e| StarlistError::config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks constraints the schema cannot express.
    fn validate(&self) -> Result<(), StarlistError> {
        let mut seen = HashSet::new();
        for list in &self.lists {
            if !seen.insert(list.id.as_str()) {
                return Err(StarlistError::config(format!(
                    "Duplicate list id '{}'",
                    list.id
                )));
            }
        }
        Ok(())
    }

    /// Returns the cache freshness window, if configured.
    pub fn ttl(&self) -> Option<Duration> {
        self.cache.ttl_seconds.map(Duration::from_secs)
    }

    /// Returns the cache directory, relative to the config file if not absolute.
    pub fn cache_path(&self) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(&self.cache_dir),
            None => PathBuf::from(&self.cache_dir),
        }
    }

    /// Returns the committer to record on published commits.
    pub fn committer(&self) -> Option<&Committer> {
        self.defaults.committer.as_ref()
    }

    /// Applies the defaults to one list.
    pub fn resolve_list(&self, list: &ListConfig) -> Result<ResolvedList, StarlistError> {
        let defaults = &self.defaults.output;
        let owner = list
            .output
            .owner
            .as_ref()
            .or(defaults.owner.as_ref())
            .ok_or_else(|| {
                StarlistError::config(format!("List '{}' has no output owner", list.id))
            })?;
        let suffix = defaults
            .repo_suffix
            .as_deref()
            .unwrap_or(DEFAULT_REPO_SUFFIX);
        let repo = list
            .output
            .repo
            .clone()
            .unwrap_or_else(|| format!("{}{}", list.id, suffix));
        let branch = list
            .output
            .branch
            .as_deref()
            .or(defaults.branch.as_deref())
            .unwrap_or(DEFAULT_BRANCH);
        let path = list
            .output
            .path
            .as_deref()
            .or(defaults.path.as_deref())
            .unwrap_or(DEFAULT_PATH);

        Ok(ResolvedList {
            id: list.id.clone(),
            name: list.name.clone().unwrap_or_else(|| list.id.clone()),
            source_url: list.source.url.clone(),
            about: list.about.clone(),
            prune_before: list.prune.as_ref().and_then(|p| p.before_heading.clone()),
            target: PublishTarget {
                list_id: list.id.clone(),
                owner: owner.clone(),
                repo,
                branch: branch.to_string(),
                path: path.to_string(),
                message: format!("chore: update {} stars", list.id),
            },
        })
    }

    /// Resolves the lists named in `ids`, or every list when `ids` is empty.
    pub fn resolve_lists(&self, ids: &[String]) -> Result<Vec<ResolvedList>, StarlistError> {
        if ids.is_empty() {
            return self.lists.iter().map(|l| self.resolve_list(l)).collect();
        }

        ids.iter()
            .map(|id| {
                let list = self
                    .lists
                    .iter()
                    .find(|l| &l.id == id)
                    .ok_or_else(|| StarlistError::config(format!("Unknown list '{}'", id)))?;
                self.resolve_list(list)
            })
            .collect()
    }
}

impl Default for StarlistConfig {
    fn default() -> Self {
        Self::new()
    }
}
