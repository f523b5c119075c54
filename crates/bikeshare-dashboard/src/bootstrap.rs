use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Name of the per-user application directory under `$HOME`.
const APP_DIR_NAME: &str = ".bikeshare-dashboard";

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Per-user application directory, `~/.bikeshare-dashboard/`.
///
/// Falls back to the current directory when no home directory is known.
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Ensure `~/.bikeshare-dashboard/logs/` exists and return the app directory.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let dir = app_dir();
    ensure_directories_in(&dir)?;
    Ok(dir)
}

/// Create `dir` and its `logs/` subdirectory (including missing parents).
pub fn ensure_directories_in(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir.join("logs"))?;
    Ok(())
}

/// Default log destination inside `app_dir`.
pub fn default_log_file(app_dir: &Path) -> PathBuf {
    app_dir.join("logs").join("dashboard.log")
}

/// Where logs go for this run.
///
/// An explicit `--log-file` always wins. Otherwise the interactive dashboard
/// logs to the default file (it owns the terminal) and the summary view logs
/// to stderr (`None`).
pub fn resolve_log_file(
    explicit: Option<&Path>,
    interactive: bool,
    app_dir: &Path,
) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None if interactive => Some(default_log_file(app_dir)),
        None => None,
    }
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name onto an [`EnvFilter`] directive.
///
/// Unknown names are passed through so `RUST_LOG`-style directives such as
/// `bikeshare_data=trace` also work.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// With `log_file` set, events are appended to that file without ANSI colour;
/// otherwise they go to stderr.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
        None => {
            let layer = fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init()?;
        }
    }

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories_in() {
        let tmp = TempDir::new().expect("tempdir");
        let dir = tmp.path().join(APP_DIR_NAME);

        ensure_directories_in(&dir).expect("ensure_directories_in should succeed");

        assert!(dir.is_dir());
        assert!(dir.join("logs").is_dir());
        // Idempotent.
        ensure_directories_in(&dir).expect("second call should succeed");
    }

    #[test]
    fn test_app_dir_name() {
        assert!(app_dir().ends_with(APP_DIR_NAME));
    }

    #[test]
    fn test_default_log_file() {
        let base = Path::new("/home/user/.bikeshare-dashboard");
        assert_eq!(
            default_log_file(base),
            PathBuf::from("/home/user/.bikeshare-dashboard/logs/dashboard.log")
        );
    }

    #[test]
    fn test_resolve_log_file() {
        let base = Path::new("/base");
        let explicit = Path::new("/tmp/custom.log");

        assert_eq!(
            resolve_log_file(Some(explicit), true, base),
            Some(explicit.to_path_buf())
        );
        assert_eq!(
            resolve_log_file(Some(explicit), false, base),
            Some(explicit.to_path_buf())
        );
        assert_eq!(
            resolve_log_file(None, true, base),
            Some(default_log_file(base))
        );
        assert_eq!(resolve_log_file(None, false, base), None);
    }

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("CRITICAL"), "error");
        assert_eq!(level_directive("bikeshare_data=trace"), "bikeshare_data=trace");
    }

    #[test]
    fn test_setup_logging_to_file() {
        let tmp = TempDir::new().expect("tempdir");
        let log = tmp.path().join("nested").join("dashboard.log");

        // Only one test in this binary installs a global subscriber.
        setup_logging("INFO", Some(&log)).expect("setup_logging should succeed");
        tracing::info!("hello from the test");

        let contents = std::fs::read_to_string(&log).expect("log file exists");
        assert!(contents.contains("hello from the test"));
    }
}
