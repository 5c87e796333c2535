//! Configuration module for VerveGallery.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Category names looked up by default, in display order.
pub const DEFAULT_CATEGORIES: &[&str] = &["Rajyotsava", "Verve Cup", "JSS Run", "Verve"];

/// OAuth scopes requested by default.
pub const DEFAULT_SCOPES: &[&str] = &[
    "openid",
    "email",
    "profile",
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/drive.metadata.readonly",
];

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for VerveGallery.
///
/// Every section falls back to its defaults when missing from the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub drive: DriveConfig,
    pub gallery: GalleryConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub face_search: FaceSearchConfig,
    pub logging: LoggingConfig,
}

/// Google Drive API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Scheme and host of the Drive API; paths are appended to it.
    pub api_base_url: String,
    /// Page size used by "all photos" and category listings.
    pub page_size: u32,
    /// Number of photos fetched for the recent-photos view.
    pub recent_limit: u32,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Size of each body chunk streamed during an upload (in KiB).
    /// Progress is reported once per chunk.
    pub upload_chunk_kib: u32,
}

/// Gallery layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Folder-name patterns that make up the category list.
    pub categories: Vec<String>,
}

/// Authentication / OAuth settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Google OAuth client ID. `None` until the user configures one.
    pub client_id: Option<String>,
    /// Client secret for "Desktop app" OAuth clients.
    pub client_secret: Option<String>,
    /// Loopback port for the OAuth redirect.
    pub redirect_port: u16,
    /// OAuth scopes to request.
    pub scopes: Vec<String>,
}

/// Persisted session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JSON file holding the session key-value records.
    pub storage_path: PathBuf,
}

/// Face search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceSearchConfig {
    /// Fewest matches returned when the pool is large enough.
    pub min_matches: usize,
    /// Most matches returned.
    pub max_matches: usize,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Write the configuration as YAML to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/vervegallery/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("vervegallery")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://www.googleapis.com".to_string(),
            page_size: 100,
            recent_limit: 20,
            request_timeout_secs: 30,
            upload_chunk_kib: 256,
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_port: 8400,
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("vervegallery")
                .join("session.json"),
        }
    }
}

impl Default for FaceSearchConfig {
    fn default() -> Self {
        Self {
            min_matches: 5,
            max_matches: 14,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"drive.page_size"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Drive caps `pageSize` for `files.list` at this value.
const MAX_PAGE_SIZE: u32 = 1000;

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ValidationError {
                field: field.into(),
                message,
            })
        };

        // --- drive ---
        if !self.drive.api_base_url.starts_with("http://")
            && !self.drive.api_base_url.starts_with("https://")
        {
            push(
                "drive.api_base_url",
                format!("must be an http(s) URL, got '{}'", self.drive.api_base_url),
            );
        }
        if self.drive.page_size == 0 || self.drive.page_size > MAX_PAGE_SIZE {
            push(
                "drive.page_size",
                format!("must be in range 1..={MAX_PAGE_SIZE}"),
            );
        }
        if self.drive.recent_limit == 0 || self.drive.recent_limit > MAX_PAGE_SIZE {
            push(
                "drive.recent_limit",
                format!("must be in range 1..={MAX_PAGE_SIZE}"),
            );
        }
        if self.drive.request_timeout_secs == 0 {
            push("drive.request_timeout_secs", "must be greater than 0".into());
        }
        if self.drive.upload_chunk_kib == 0 {
            push("drive.upload_chunk_kib", "must be greater than 0".into());
        }

        // --- gallery ---
        if self.gallery.categories.is_empty() {
            push("gallery.categories", "must list at least one category".into());
        }
        if self.gallery.categories.iter().any(|c| c.trim().is_empty()) {
            push("gallery.categories", "category names must not be blank".into());
        }

        // --- auth ---
        if self.auth.redirect_port == 0 {
            push("auth.redirect_port", "must be greater than 0".into());
        }
        if self.auth.scopes.is_empty() {
            push("auth.scopes", "must request at least one scope".into());
        }

        // --- face_search ---
        if self.face_search.min_matches == 0 {
            push("face_search.min_matches", "must be greater than 0".into());
        }
        if self.face_search.min_matches > self.face_search.max_matches {
            push(
                "face_search.min_matches",
                format!(
                    "min_matches ({}) must not exceed max_matches ({})",
                    self.face_search.min_matches, self.face_search.max_matches
                ),
            );
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            push(
                "logging.level",
                format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            );
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use vervegallery_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .drive_page_size(50)
///     .gallery_categories(vec!["Verve".to_string()])
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- drive ---

    pub fn drive_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.drive.api_base_url = url.into();
        self
    }

    pub fn drive_page_size(mut self, n: u32) -> Self {
        self.config.drive.page_size = n;
        self
    }

    pub fn drive_recent_limit(mut self, n: u32) -> Self {
        self.config.drive.recent_limit = n;
        self
    }

    pub fn drive_request_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.drive.request_timeout_secs = seconds;
        self
    }

    pub fn drive_upload_chunk_kib(mut self, kib: u32) -> Self {
        self.config.drive.upload_chunk_kib = kib;
        self
    }

    // --- gallery ---

    pub fn gallery_categories(mut self, categories: Vec<String>) -> Self {
        self.config.gallery.categories = categories;
        self
    }

    // --- auth ---

    pub fn auth_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.auth.client_id = Some(client_id.into());
        self
    }

    pub fn auth_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.auth.client_secret = Some(secret.into());
        self
    }

    pub fn auth_redirect_port(mut self, port: u16) -> Self {
        self.config.auth.redirect_port = port;
        self
    }

    // --- session ---

    pub fn session_storage_path(mut self, path: PathBuf) -> Self {
        self.config.session.storage_path = path;
        self
    }

    // --- face_search ---

    pub fn face_search_matches(mut self, min: usize, max: usize) -> Self {
        self.config.face_search.min_matches = min;
        self.config.face_search.max_matches = max;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    /// Build the configuration without validating it.
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
