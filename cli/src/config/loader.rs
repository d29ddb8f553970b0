//! Simple CLI configuration loader for convpage
//!
//! Implements single-source priority loading with env and flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./convpage.json or ./.convpage/config.json
//! 3. Git repository root: <repo_root>/.convpage/config.json
//! 4. User config: $XDG_CONFIG_HOME/convpage/config.json (or platform default)
//! 5. Defaults only (no files)
//!
//! Environment variables override file values; flags override both.

use anyhow::{anyhow, Context, Result};
use convpage_core::config::DEFAULT_ERROR_HTML;
use convpage_core::{ElementIds, HtmlPolicy, LinkPatterns, PageMeta, RenderConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default output page path
pub const DEFAULT_OUTPUT: &str = "index.html";

/// Raw configuration file format; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// Preview location (can be "env:VAR_NAME" for environment variable)
    pub source: Option<String>,
    /// Base URL relative locations are joined onto
    pub base_url: Option<String>,
    /// Output page path
    pub output: Option<PathBuf>,
    /// HTTP timeout in seconds
    pub timeout_secs: Option<u64>,
    /// sanitize | trust | escape
    pub html_policy: Option<String>,
    /// Markup shown when rendering fails
    pub error_html: Option<String>,
    pub elements: ElementIds,
    pub links: LinkPatterns,
    pub page: PageMeta,
}

/// Fully resolved CLI configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub render: RenderConfig,
    pub output: PathBuf,
}

impl ResolvedConfig {
    /// Directory relative preview paths resolve against
    pub fn page_dir(&self) -> PathBuf {
        match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// File name of the output page
    pub fn page_name(&self) -> String {
        self.output
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_OUTPUT.to_string())
    }
}

/// CLI configuration loader
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Flag overrides
    source_override: Option<String>,
    base_url_override: Option<String>,
    output_override: Option<PathBuf>,
    html_policy_override: Option<String>,
    /// Directory discovery starts from
    working_dir: Option<PathBuf>,
    /// User config directory
    config_home: Option<PathBuf>,
    /// Environment snapshot
    env: HashMap<String, String>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            config_override: None,
            source_override: None,
            base_url_override: None,
            output_override: None,
            html_policy_override: None,
            working_dir: None,
            config_home: None,
            env: std::env::vars().collect(),
        }
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Set preview location override
    pub fn with_source_override(mut self, source: String) -> Self {
        self.source_override = Some(source);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set output path override
    pub fn with_output_override(mut self, output: PathBuf) -> Self {
        self.output_override = Some(output);
        self
    }

    /// Set HTML policy override
    pub fn with_html_policy_override(mut self, policy: String) -> Self {
        self.html_policy_override = Some(policy);
        self
    }

    /// Start discovery from `dir` instead of the process working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// Use `dir` as the user config directory
    pub fn with_config_home(mut self, dir: PathBuf) -> Self {
        self.config_home = Some(dir);
        self
    }

    /// Replace the environment snapshot
    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<ResolvedConfig> {
        // Step 1: Find and load base configuration
        let mut config = if let Some(override_path) = &self.config_override {
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        // Step 2: Apply environment overrides
        if let Some(source) = self.env.get("CONVPAGE_SOURCE") {
            config.source = Some(source.clone());
        }
        if let Some(base_url) = self.env.get("CONVPAGE_BASE_URL") {
            config.base_url = Some(base_url.clone());
        }
        if let Some(output) = self.env.get("CONVPAGE_OUTPUT") {
            config.output = Some(PathBuf::from(output));
        }
        if let Some(policy) = self.env.get("CONVPAGE_HTML_POLICY") {
            config.html_policy = Some(policy.clone());
        }

        // Step 3: Apply flag overrides
        if let Some(source) = &self.source_override {
            config.source = Some(source.clone());
        }
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(output) = &self.output_override {
            config.output = Some(output.clone());
        }
        if let Some(policy) = &self.html_policy_override {
            config.html_policy = Some(policy.clone());
        }

        // Step 4: Resolve to final config
        self.resolve_config(config)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        let cwd = match &self.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };

        // 1. Current working directory
        for candidate in [
            cwd.join("convpage.json"),
            cwd.join(".convpage").join("config.json"),
        ] {
            if candidate.exists() {
                return self.load_file(&candidate).await;
            }
        }

        // 2. Git repository root
        if let Some(git_root) = find_git_root(&cwd) {
            let config_path = git_root.join(".convpage").join("config.json");
            if config_path.exists() {
                return self.load_file(&config_path).await;
            }
        }

        // 3. User config directory
        if let Some(config_dir) = self.user_config_dir() {
            let config_path = config_dir.join("convpage").join("config.json");
            if config_path.exists() {
                return self.load_file(&config_path).await;
            }
        }

        // 4. Defaults
        debug!("no configuration file found, using defaults");
        Ok(RawConfig::default())
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            self.load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                self.load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }

    /// Load a single config file
    async fn load_file(&self, path: &Path) -> Result<RawConfig> {
        debug!(path = %path.display(), "loading configuration");
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn user_config_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.config_home {
            return Some(dir.clone());
        }
        match self.env.get("XDG_CONFIG_HOME") {
            Some(xdg) => Some(PathBuf::from(xdg)),
            None => dirs::config_dir(),
        }
    }

    /// Resolve raw config to the final configuration
    fn resolve_config(&self, config: RawConfig) -> Result<ResolvedConfig> {
        let html_policy = match &config.html_policy {
            Some(policy) => policy.parse::<HtmlPolicy>()?,
            None => HtmlPolicy::default(),
        };

        // Resolve source (handle env: prefix)
        let source = match config.source {
            Some(source) => match source.strip_prefix("env:") {
                Some(var_name) => self
                    .env
                    .get(var_name)
                    .cloned()
                    .with_context(|| format!("Environment variable not found: {}", var_name))?,
                None => source,
            },
            None => convpage_core::config::DEFAULT_SOURCE.to_string(),
        };

        let output = config
            .output
            .map(|path| PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

        let render = RenderConfig {
            source,
            base_url: config.base_url,
            timeout_secs: config.timeout_secs,
            html_policy,
            elements: config.elements,
            links: config.links,
            error_html: config
                .error_html
                .unwrap_or_else(|| DEFAULT_ERROR_HTML.to_string()),
            page: config.page,
        };

        render
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        Ok(ResolvedConfig { render, output })
    }
}

impl Default for CliConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Find git repository root
fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        if current.join(".git").exists() {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn loader(cwd: &Path, home: &Path) -> CliConfigLoader {
        CliConfigLoader::new()
            .with_working_dir(cwd.to_path_buf())
            .with_config_home(home.to_path_buf())
            .with_env(HashMap::new())
    }

    #[tokio::test]
    async fn test_defaults_without_files() {
        let cwd = tempdir().unwrap();
        let home = tempdir().unwrap();

        let config = loader(cwd.path(), home.path()).load().await.unwrap();

        assert_eq!(config.render, RenderConfig::default());
        assert_eq!(config.output, PathBuf::from("index.html"));
        assert_eq!(config.page_dir(), PathBuf::from("."));
    }

    #[tokio::test]
    async fn test_cwd_file_beats_user_config() {
        let cwd = tempdir().unwrap();
        let home = tempdir().unwrap();
        tokio::fs::write(cwd.path().join("convpage.json"), r#"{"source": "local.json"}"#)
            .await
            .unwrap();
        tokio::fs::create_dir_all(home.path().join("convpage"))
            .await
            .unwrap();
        tokio::fs::write(
            home.path().join("convpage").join("config.json"),
            r#"{"source": "home.json"}"#,
        )
        .await
        .unwrap();

        let config = loader(cwd.path(), home.path()).load().await.unwrap();
        assert_eq!(config.render.source, "local.json");
    }

    #[tokio::test]
    async fn test_user_config_is_fallback() {
        let cwd = tempdir().unwrap();
        let home = tempdir().unwrap();
        tokio::fs::create_dir_all(home.path().join("convpage"))
            .await
            .unwrap();
        tokio::fs::write(
            home.path().join("convpage").join("config.json"),
            r#"{"html_policy": "escape", "output": "site/index.html"}"#,
        )
        .await
        .unwrap();

        let config = loader(cwd.path(), home.path()).load().await.unwrap();
        assert_eq!(config.render.html_policy, HtmlPolicy::Escape);
        assert_eq!(config.page_dir(), PathBuf::from("site"));
        assert_eq!(config.page_name(), "index.html");
    }

    #[tokio::test]
    async fn test_env_then_flags_override_file() {
        let cwd = tempdir().unwrap();
        let home = tempdir().unwrap();
        tokio::fs::write(
            cwd.path().join("convpage.json"),
            r#"{"source": "file.json", "html_policy": "trust"}"#,
        )
        .await
        .unwrap();

        let env = HashMap::from([
            ("CONVPAGE_SOURCE".to_string(), "env.json".to_string()),
            ("CONVPAGE_HTML_POLICY".to_string(), "escape".to_string()),
        ]);
        let config = loader(cwd.path(), home.path())
            .with_env(env.clone())
            .load()
            .await
            .unwrap();
        assert_eq!(config.render.source, "env.json");
        assert_eq!(config.render.html_policy, HtmlPolicy::Escape);

        let config = loader(cwd.path(), home.path())
            .with_env(env)
            .with_source_override("flag.json".to_string())
            .load()
            .await
            .unwrap();
        assert_eq!(config.render.source, "flag.json");
    }

    #[tokio::test]
    async fn test_env_prefixed_source() {
        let cwd = tempdir().unwrap();
        let home = tempdir().unwrap();
        let env = HashMap::from([("PREVIEW_AT".to_string(), "/data/p.json".to_string())]);

        let config = loader(cwd.path(), home.path())
            .with_env(env)
            .with_source_override("env:PREVIEW_AT".to_string())
            .load()
            .await
            .unwrap();
        assert_eq!(config.render.source, "/data/p.json");

        let err = loader(cwd.path(), home.path())
            .with_source_override("env:MISSING".to_string())
            .load()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("MISSING"));
    }

    #[tokio::test]
    async fn test_config_override_directory() {
        let cwd = tempdir().unwrap();
        let home = tempdir().unwrap();
        let dir = tempdir().unwrap();
        tokio::fs::write(
            dir.path().join("config.json"),
            r#"{"elements": {"faq": "questions"}, "links": {"blog": "post-{n}.html"}}"#,
        )
        .await
        .unwrap();

        let config = loader(cwd.path(), home.path())
            .with_config_override(dir.path().to_path_buf())
            .load()
            .await
            .unwrap();
        assert_eq!(config.render.elements.faq, "questions");
        assert_eq!(config.render.links.blog_href(1), "post-2.html");

        let missing = loader(cwd.path(), home.path())
            .with_config_override(cwd.path().join("nope.json"))
            .load()
            .await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_invalid_values_are_rejected() {
        let cwd = tempdir().unwrap();
        let home = tempdir().unwrap();

        let bad_policy = loader(cwd.path(), home.path())
            .with_html_policy_override("loose".to_string())
            .load()
            .await;
        assert!(bad_policy.is_err());

        let bad_base = loader(cwd.path(), home.path())
            .with_base_url_override("example.com".to_string())
            .load()
            .await;
        assert!(bad_base.is_err());
    }
}
