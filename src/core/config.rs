//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::schema::SuitePolicy;

/// Name of the project-level config file
pub const PROJECT_CONFIG_FILE: &str = ".tplcheck.yaml";

/// tplcheck configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format (auto, json, yaml, csv, md)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// How generation suites handle failing templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suite_policy: Option<SuitePolicy>,

    /// Treat consistency warnings as errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    /// Log filter directive (e.g. "warn", "sender_contract=debug")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
}

impl Config {
    /// Keys accepted in config files, with descriptions
    pub const KEYS: &'static [(&'static str, &'static str)] = &[
        ("default_format", "Default output format (auto, json, yaml, csv, md)"),
        ("suite_policy", "Suite handling: report-all or fail-fast"),
        ("strict", "Treat consistency warnings as errors (true/false)"),
        ("log", "Log filter directive, e.g. warn or sender_contract=debug"),
    ];

    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let cwd = std::env::current_dir().ok();
        let project = cwd.as_deref().and_then(find_project_config);
        let mut config = Self::load_from(Self::global_config_path().as_deref(), project.as_deref());
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Load built-in defaults, then the global file, then the project file
    pub fn load_from(global: Option<&Path>, project: Option<&Path>) -> Self {
        let mut config = Config::default();

        for path in [global, project].into_iter().flatten() {
            if let Some(layer) = Self::read_file(path) {
                config.merge(layer);
            }
        }

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config file");
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config file");
                None
            }
        }
    }

    /// Apply `TPLCHECK_*` environment overrides
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(format) = lookup("TPLCHECK_FORMAT") {
            self.default_format = Some(format);
        }
        if let Some(policy) = lookup("TPLCHECK_SUITE_POLICY") {
            match policy.parse() {
                Ok(policy) => self.suite_policy = Some(policy),
                Err(e) => warn!(error = %e, "ignoring TPLCHECK_SUITE_POLICY"),
            }
        }
        if let Some(strict) = lookup("TPLCHECK_STRICT") {
            match strict.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.strict = Some(true),
                "0" | "false" | "no" => self.strict = Some(false),
                other => warn!(value = other, "ignoring TPLCHECK_STRICT"),
            }
        }
        if let Some(log) = lookup("TPLCHECK_LOG") {
            self.log = Some(log);
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "tplcheck")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.suite_policy.is_some() {
            self.suite_policy = other.suite_policy;
        }
        if other.strict.is_some() {
            self.strict = other.strict;
        }
        if other.log.is_some() {
            self.log = other.log;
        }
    }

    pub fn suite_policy(&self) -> SuitePolicy {
        self.suite_policy.unwrap_or_default()
    }

    pub fn strict(&self) -> bool {
        self.strict.unwrap_or(false)
    }

    pub fn log_filter(&self) -> &str {
        self.log.as_deref().unwrap_or("warn")
    }

    /// Look up a key as display text
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_format" => self.default_format.clone(),
            "suite_policy" => self.suite_policy.map(|p| p.to_string()),
            "strict" => self.strict.map(|s| s.to_string()),
            "log" => self.log.clone(),
            _ => None,
        }
    }
}

/// Find `.tplcheck.yaml` in `start` or its nearest ancestor
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.suite_policy(), SuitePolicy::ReportAll);
        assert!(!config.strict());
        assert_eq!(config.log_filter(), "warn");
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = tempdir().unwrap();
        let global = dir.path().join("global.yaml");
        let project = dir.path().join("project.yaml");
        fs::write(&global, "suite_policy: fail-fast\nstrict: true\nlog: info\n").unwrap();
        fs::write(&project, "strict: false\n").unwrap();

        let config = Config::load_from(Some(&global), Some(&project));
        assert_eq!(config.suite_policy(), SuitePolicy::FailFast);
        assert!(!config.strict());
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("project.yaml");
        fs::write(&project, "suite_policy: [not, a, policy]\n").unwrap();

        let config = Config::load_from(None, Some(&project));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_files_are_ignored() {
        let config = Config::load_from(Some(Path::new("/nonexistent/global.yaml")), None);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TPLCHECK_FORMAT", "json"),
            ("TPLCHECK_SUITE_POLICY", "fail-fast"),
            ("TPLCHECK_STRICT", "yes"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.default_format.as_deref(), Some("json"));
        assert_eq!(config.suite_policy(), SuitePolicy::FailFast);
        assert!(config.strict());
        assert_eq!(config.get("suite_policy").as_deref(), Some("fail-fast"));
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(|key| match key {
            "TPLCHECK_SUITE_POLICY" => Some("sometimes".to_string()),
            "TPLCHECK_STRICT" => Some("maybe".to_string()),
            _ => None,
        });
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_find_project_config_in_ancestor() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(PROJECT_CONFIG_FILE), "strict: true\n").unwrap();

        let found = find_project_config(&nested).unwrap();
        assert_eq!(found, dir.path().join(PROJECT_CONFIG_FILE));
    }
}
