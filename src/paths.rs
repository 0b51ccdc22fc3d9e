use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "canopy-tui.log";

/// Resolved paths for canopy-tui file locations.
/// Pure data structure with no I/O.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Directory holding the log file
    /// Example: ~/.local/state/canopy-tui/
    pub log_dir: PathBuf,

    /// Log file written by the tracing subscriber
    /// Example: ~/.local/state/canopy-tui/canopy-tui.log
    pub log_file: PathBuf,
}

impl Paths {
    /// Resolves paths from an optional override directory.
    ///
    /// Pure function: only performs path concatenation and environment variable reads.
    /// Does NOT create directories - that is the caller's responsibility.
    ///
    /// # Environment
    ///
    /// * `XDG_STATE_HOME` - If set, logs go to `$XDG_STATE_HOME/canopy-tui/`.
    /// * `HOME` - Otherwise logs go to `~/.local/state/canopy-tui/` (`/tmp` when unset).
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use canopy_tui::paths::Paths;
    ///
    /// let paths = Paths::resolve(Some(Path::new("/var/log/canopy")));
    /// assert_eq!(paths.log_file, Path::new("/var/log/canopy/canopy-tui.log"));
    /// ```
    pub fn resolve(log_dir_override: Option<&Path>) -> Self {
        let log_dir = match log_dir_override {
            Some(dir) => dir.to_path_buf(),
            None => default_log_dir(),
        };
        Self {
            log_file: log_dir.join(LOG_FILE_NAME),
            log_dir,
        }
    }
}

fn default_log_dir() -> PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(state).join("canopy-tui");
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home)
        .join(".local")
        .join("state")
        .join("canopy-tui")
}
