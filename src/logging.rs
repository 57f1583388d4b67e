use std::fs::{self, File};
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing_subscriber::EnvFilter;

/// Installs a file-backed subscriber. The terminal belongs to the TUI, so
/// nothing is logged unless a file is given.
pub fn init(output_path: &Path, json: bool, level: &str) -> Result<()> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::create(output_path)
        .wrap_err_with(|| format!("creating log file {}", output_path.display()))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .wrap_err_with(|| format!("invalid log level {level:?}"))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file));

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_missing_log_directory() {
        let dir = std::env::temp_dir().join("radialtop_test_logging");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("radialtop.log");

        init(&path, true, "debug").unwrap();
        tracing::info!("logging initialized");
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
