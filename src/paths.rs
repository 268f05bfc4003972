/// Platform-specific default locations for the index and the config file
///
/// Follows the XDG Base Directory specification on Unix-like systems.
use std::path::PathBuf;

const PROJECT_DIR_NAME: &str = "gymrat";

/// Platform-agnostic path utilities
pub struct PlatformPaths;

impl PlatformPaths {
    /// Base directory for persistent data
    ///
    /// `%LOCALAPPDATA%` on Windows, `~/Library/Application Support` on macOS,
    /// `$XDG_DATA_HOME` or `~/.local/share` elsewhere.
    pub fn data_dir() -> PathBuf {
        base_dir("LOCALAPPDATA", "XDG_DATA_HOME", ".local/share")
    }

    /// Base directory for configuration files
    ///
    /// `%APPDATA%` on Windows, `~/Library/Application Support` on macOS,
    /// `$XDG_CONFIG_HOME` or `~/.config` elsewhere.
    pub fn config_dir() -> PathBuf {
        base_dir("APPDATA", "XDG_CONFIG_HOME", ".config")
    }

    /// Returns: {data_dir}/gymrat
    pub fn project_data_dir() -> PathBuf {
        Self::data_dir().join(PROJECT_DIR_NAME)
    }

    /// Returns: {config_dir}/gymrat
    pub fn project_config_dir() -> PathBuf {
        Self::config_dir().join(PROJECT_DIR_NAME)
    }

    /// Get default LanceDB database path
    ///
    /// Returns: {data_dir}/gymrat/lancedb
    pub fn default_lancedb_path() -> PathBuf {
        Self::project_data_dir().join("lancedb")
    }

    /// Get default PDF source directory used by `ingest` when none is given
    ///
    /// Returns: {data_dir}/gymrat/pdfs
    pub fn default_pdf_dir() -> PathBuf {
        Self::project_data_dir().join("pdfs")
    }

    /// Get default config file path
    ///
    /// Returns: {config_dir}/gymrat/config.toml
    pub fn default_config_path() -> PathBuf {
        Self::project_config_dir().join("config.toml")
    }
}

/// Resolve a per-platform base directory, falling back to the working directory
fn base_dir(windows_var: &str, xdg_var: &str, home_relative: &str) -> PathBuf {
    let home = || std::env::var("HOME").map(PathBuf::from);
    let resolved = if cfg!(target_os = "windows") {
        std::env::var(windows_var).map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        home().map(|home| home.join("Library/Application Support"))
    } else {
        std::env::var(xdg_var)
            .map(PathBuf::from)
            .or_else(|_| home().map(|home| home.join(home_relative)))
    };
    resolved.unwrap_or_else(|_| PathBuf::from("."))
}
