use std::path::{Path, PathBuf};

const APP_DIR: &str = "basket";

/// Get the base storage directory.
/// Returns `$BASKET_DATA_DIR`, `$XDG_DATA_HOME/basket`, or the platform data dir.
pub fn get_storage_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BASKET_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data).join(APP_DIR);
    }

    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(format!(".{}", APP_DIR)))
}

/// Get the logs directory path.
/// Returns `{storage_dir}/logs`.
pub fn get_log_dir() -> PathBuf {
    get_storage_dir().join("logs")
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
