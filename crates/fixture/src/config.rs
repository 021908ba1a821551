//! Fixture configuration via `mockmongo.toml`
//!
//! The config file is optional. When it is absent every setting takes its
//! default. The fixture directory can additionally be overridden at run
//! time through the `ASYNC_MONGODB_FIXTURE_DIR` environment variable, which
//! wins over the file.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{FixtureError, FixtureResult};

/// Config file name looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "mockmongo.toml";

/// Environment variable overriding the fixture directory.
pub const FIXTURE_DIR_ENV: &str = "ASYNC_MONGODB_FIXTURE_DIR";

static STARTUP_DIR: Lazy<PathBuf> =
    Lazy::new(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

/// Working directory of the process when first consulted
///
/// Default location of fixture files.
pub fn startup_dir() -> &'static Path {
    &STARTUP_DIR
}

/// Fixture configuration loaded from `mockmongo.toml`.
///
/// # Example
///
/// ```toml
/// # Fixture files live here (default: the working directory)
/// async_mongodb_fixture_dir = "tests/fixtures"
///
/// # Collections to load for tests
/// async_mongodb_fixtures = ["widgets", "gadgets"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureConfig {
    /// Collections to load for tests.
    ///
    /// Accepted for compatibility; the collections a test gets are chosen
    /// by its markers.
    #[serde(default)]
    pub async_mongodb_fixtures: Vec<String>,
    /// Directory holding fixture files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub async_mongodb_fixture_dir: Option<PathBuf>,
}

impl FixtureConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# mockmongo fixture configuration
#
# Directory holding <collection>.json and <collection>.yaml fixture files.
# Defaults to the working directory the tests start in.
# async_mongodb_fixture_dir = "tests/fixtures"

# Collections to load for tests (informational; tests select collections
# with markers).
async_mongodb_fixtures = []
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `FixtureError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> FixtureResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            FixtureError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            FixtureError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load `mockmongo.toml` from `dir`, or the defaults if there is none.
    pub fn load(dir: &Path) -> FixtureResult<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Configured fixture directory, or the startup directory.
    pub fn fixture_dir(&self) -> PathBuf {
        self.async_mongodb_fixture_dir
            .clone()
            .unwrap_or_else(|| startup_dir().to_path_buf())
    }

    /// Set the fixture directory.
    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.async_mongodb_fixture_dir = Some(dir.into());
        self
    }
}

/// Per-run options that override the config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Fixture directory override
    pub fixture_dir: Option<PathBuf>,
}

impl RuntimeOptions {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from the environment
    ///
    /// An empty `ASYNC_MONGODB_FIXTURE_DIR` counts as unset.
    pub fn from_env() -> Self {
        let fixture_dir = std::env::var_os(FIXTURE_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        Self { fixture_dir }
    }

    /// Override the fixture directory
    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = Some(dir.into());
        self
    }
}

/// Directory to load fixtures from: the runtime override, else the config
pub fn resolve_fixture_dir(config: &FixtureConfig, options: &RuntimeOptions) -> PathBuf {
    match &options.fixture_dir {
        Some(dir) => dir.clone(),
        None => config.fixture_dir(),
    }
}
