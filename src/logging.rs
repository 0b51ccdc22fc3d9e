use std::fs::OpenOptions;
use std::io;

use tracing_appender::non_blocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::paths::Paths;

pub fn default_filter(debug: bool) -> &'static str {
    if debug {
        "canopy_tui=debug"
    } else {
        "canopy_tui=info"
    }
}

/// Install a file-backed subscriber. stdout belongs to the terminal UI.
///
/// `RUST_LOG` overrides the default filter. Keep the returned guard alive
/// for the life of the process or buffered lines are lost.
pub fn init(paths: &Paths, debug: bool) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(&paths.log_dir)?;

    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let log_file = options.open(&paths.log_file)?;

    let (writer, guard) = non_blocking(log_file);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(file_layer).try_init();
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_follows_debug_flag() {
        assert_eq!(default_filter(true), "canopy_tui=debug");
        assert_eq!(default_filter(false), "canopy_tui=info");
    }

    #[test]
    fn init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::resolve(Some(dir.path().join("nested").as_path()));
        let guard = init(&paths, false).unwrap();
        drop(guard);
        assert!(paths.log_file.exists());
    }
}
