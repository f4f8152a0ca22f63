//! Logging Infrastructure
//!
//! Console output always; with a log directory, daily rotating files:
//! - `app/`: everything except security events
//! - `security/`: `target: "security"` events (auth failures, denials)

use std::fs;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set
pub fn default_filter(level: &str) -> String {
    format!("admin_server={level},shared={level},tower_http={level},security=info")
}

/// Create `app/` and `security/` under `log_dir`
pub fn prepare_log_dirs(log_dir: &Path) -> std::io::Result<(PathBuf, PathBuf)> {
    let app_dir = log_dir.join("app");
    let security_dir = log_dir.join("security");
    fs::create_dir_all(&app_dir)?;
    fs::create_dir_all(&security_dir)?;
    Ok((app_dir, security_dir))
}

/// Initialize the logging system
///
/// `RUST_LOG` overrides `level` when set.
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    let file_layers = match log_dir {
        Some(dir) => {
            let (app_dir, security_dir) = prepare_log_dirs(Path::new(dir))?;

            let app_log = RollingFileAppender::new(Rotation::DAILY, app_dir, "app");
            let app_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() != "security"
                }));

            let security_log = RollingFileAppender::new(Rotation::DAILY, security_dir, "security");
            let security_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(security_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() == "security"
                }));

            Some(app_layer.and_then(security_layer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layers)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_log_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let (app, security) = prepare_log_dirs(tmp.path()).unwrap();
        assert!(app.is_dir());
        assert!(security.is_dir());
        assert!(app.ends_with("app"));
    }

    #[test]
    fn test_default_filter() {
        let filter = default_filter("debug");
        assert!(filter.contains("admin_server=debug"));
        assert!(filter.contains("security=info"));
    }
}
