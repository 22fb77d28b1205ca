use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GateError;

/// Environment variables required before any file or network work starts.
pub const REQUIRED_VARS: &[&str] = &[
    "AZURE_OPENAI_ENDPOINT",
    "AZURE_OPENAI_KEY",
    "AZURE_OPENAI_DEPLOYMENT",
    "GITHUB_TOKEN",
    "PR_NUMBER",
    "REPO_NAME",
];

/// Top-level gate configuration.
///
/// Credentials and PR coordinates come from the environment and are all
/// required; file-path knobs come from an optional `.vigil.toml` overlay.
/// Constructed once at process start and threaded explicitly through the
/// components — there is no ambient global state.
///
/// # Examples
///
/// ```
/// use vigil_core::GateConfig;
///
/// let config = GateConfig::from_lookup(|key| match key {
///     "AZURE_OPENAI_ENDPOINT" => Some("https://unit.openai.azure.com".into()),
///     "AZURE_OPENAI_KEY" => Some("secret".into()),
///     "AZURE_OPENAI_DEPLOYMENT" => Some("gpt-4o-mini".into()),
///     "GITHUB_TOKEN" => Some("ghp_test".into()),
///     "PR_NUMBER" => Some("42".into()),
///     "REPO_NAME" => Some("octocat/hello-world".into()),
///     _ => None,
/// })
/// .unwrap();
/// assert_eq!(config.github.pr_number, 42);
/// assert_eq!(config.files.max_content_chars, 10_000);
/// ```
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Inference endpoint settings.
    pub llm: LlmConfig,
    /// Code-hosting API settings.
    pub github: GithubConfig,
    /// File-based interface settings.
    pub files: FilesConfig,
}

impl GateConfig {
    /// Build the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] naming every missing required variable,
    /// or if `PR_NUMBER` is not a valid number.
    pub fn from_env() -> Result<Self, GateError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Exists so the required-variable contract is testable without mutating
    /// the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Config`] naming every missing required variable,
    /// or if `PR_NUMBER` is not a valid number.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|&var| lookup(var).as_deref().map_or(true, str::is_empty))
            .collect();
        if !missing.is_empty() {
            return Err(GateError::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let var = |key: &str| lookup(key).unwrap_or_default();

        let pr_raw = var("PR_NUMBER");
        let pr_number: u64 = pr_raw
            .trim()
            .parse()
            .map_err(|_| GateError::Config(format!("invalid PR_NUMBER: {pr_raw}")))?;

        Ok(Self {
            llm: LlmConfig {
                endpoint: var("AZURE_OPENAI_ENDPOINT"),
                api_key: var("AZURE_OPENAI_KEY"),
                deployment: var("AZURE_OPENAI_DEPLOYMENT"),
            },
            github: GithubConfig {
                token: var("GITHUB_TOKEN"),
                repo: var("REPO_NAME"),
                pr_number,
            },
            files: FilesConfig::default(),
        })
    }

    /// Replace the file-path knobs, keeping credentials as loaded.
    pub fn with_files(mut self, files: FilesConfig) -> Self {
        self.files = files;
        self
    }
}

/// Inference endpoint configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the hosted inference endpoint.
    pub endpoint: String,
    /// API key sent with each request.
    pub api_key: String,
    /// Model deployment identifier.
    pub deployment: String,
}

/// Code-hosting API configuration.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Authentication token for the GitHub REST API.
    pub token: String,
    /// Repository identifier in `owner/name` form.
    pub repo: String,
    /// Pull request number to comment on.
    pub pr_number: u64,
}

/// File-based interface configuration, loadable from `.vigil.toml`.
///
/// # Examples
///
/// ```
/// use vigil_core::FilesConfig;
///
/// let files = FilesConfig::from_toml(r#"
/// [files]
/// changed_list = "pr_files.txt"
/// "#).unwrap();
/// assert_eq!(files.changed_list.to_str(), Some("pr_files.txt"));
/// assert_eq!(files.max_content_chars, 10_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Newline-delimited list of changed file paths (default: `changed_files.txt`).
    #[serde(default = "default_changed_list")]
    pub changed_list: PathBuf,
    /// Single-word status file written at the end (default: `approval_status.txt`).
    #[serde(default = "default_status_file")]
    pub status_file: PathBuf,
    /// Character budget per file before truncation (default: 10000).
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_changed_list() -> PathBuf {
    PathBuf::from("changed_files.txt")
}

fn default_status_file() -> PathBuf {
    PathBuf::from("approval_status.txt")
}

fn default_max_content_chars() -> usize {
    10_000
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            changed_list: default_changed_list(),
            status_file: default_status_file(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

#[derive(Deserialize)]
struct Overlay {
    #[serde(default)]
    files: Option<FilesConfig>,
}

impl FilesConfig {
    /// Load the `[files]` table from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Io`] if the file cannot be read, or
    /// [`GateError::Toml`] if the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, GateError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse the `[files]` table from a TOML string.
    ///
    /// A missing `[files]` table yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::Toml`] if parsing fails.
    pub fn from_toml(content: &str) -> Result<Self, GateError> {
        let overlay: Overlay = toml::from_str(content)?;
        Ok(overlay.files.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_env(key: &str) -> Option<String> {
        match key {
            "AZURE_OPENAI_ENDPOINT" => Some("https://unit.openai.azure.com".into()),
            "AZURE_OPENAI_KEY" => Some("secret".into()),
            "AZURE_OPENAI_DEPLOYMENT" => Some("gpt-4o-mini".into()),
            "GITHUB_TOKEN" => Some("ghp_test".into()),
            "PR_NUMBER" => Some("42".into()),
            "REPO_NAME" => Some("octocat/hello-world".into()),
            _ => None,
        }
    }

    #[test]
    fn full_lookup_builds_config() {
        let config = GateConfig::from_lookup(full_env).unwrap();
        assert_eq!(config.llm.deployment, "gpt-4o-mini");
        assert_eq!(config.github.repo, "octocat/hello-world");
        assert_eq!(config.github.pr_number, 42);
        assert_eq!(
            config.files.changed_list,
            PathBuf::from("changed_files.txt")
        );
    }

    #[test]
    fn missing_variable_is_fatal_and_named() {
        let err = GateConfig::from_lookup(|key| match key {
            "GITHUB_TOKEN" => None,
            other => full_env(other),
        })
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("GITHUB_TOKEN"));
        assert!(!msg.contains("PR_NUMBER"));
    }

    #[test]
    fn all_missing_variables_are_listed() {
        let err = GateConfig::from_lookup(|_| None).unwrap_err();
        let msg = err.to_string();
        for var in REQUIRED_VARS {
            assert!(msg.contains(var), "{var} should be named in: {msg}");
        }
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let err = GateConfig::from_lookup(|key| match key {
            "AZURE_OPENAI_KEY" => Some(String::new()),
            other => full_env(other),
        })
        .unwrap_err();
        assert!(err.to_string().contains("AZURE_OPENAI_KEY"));
    }

    #[test]
    fn non_numeric_pr_number_is_config_error() {
        let err = GateConfig::from_lookup(|key| match key {
            "PR_NUMBER" => Some("abc".into()),
            other => full_env(other),
        })
        .unwrap_err();
        assert!(err.to_string().contains("invalid PR_NUMBER"));
    }

    #[test]
    fn files_defaults_match_original_paths() {
        let files = FilesConfig::default();
        assert_eq!(files.changed_list, PathBuf::from("changed_files.txt"));
        assert_eq!(files.status_file, PathBuf::from("approval_status.txt"));
        assert_eq!(files.max_content_chars, 10_000);
    }

    #[test]
    fn toml_overlay_overrides_paths() {
        let files = FilesConfig::from_toml(
            r#"
[files]
changed_list = "pr_files.txt"
status_file = "gate.txt"
max_content_chars = 5000
"#,
        )
        .unwrap();
        assert_eq!(files.changed_list, PathBuf::from("pr_files.txt"));
        assert_eq!(files.status_file, PathBuf::from("gate.txt"));
        assert_eq!(files.max_content_chars, 5000);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let files = FilesConfig::from_toml("").unwrap();
        assert_eq!(files.max_content_chars, 10_000);
    }

    #[test]
    fn invalid_toml_returns_error() {
        assert!(FilesConfig::from_toml("{{invalid}}").is_err());
    }

    #[test]
    fn with_files_replaces_knobs() {
        let config = GateConfig::from_lookup(full_env).unwrap().with_files(FilesConfig {
            changed_list: PathBuf::from("other.txt"),
            ..FilesConfig::default()
        });
        assert_eq!(config.files.changed_list, PathBuf::from("other.txt"));
        assert_eq!(config.github.pr_number, 42);
    }
}
