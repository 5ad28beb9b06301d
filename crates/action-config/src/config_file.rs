use std::path::PathBuf;

/// Name of the optional config file, looked up in CWD then in the home directory
pub const CONFIG_FILE: &str = ".asana-pr-sync.toml";

/// Load config file content from CWD first, then home directory
///
/// Searches for `.asana-pr-sync.toml` in:
/// 1. Current working directory (usually the checked out repository)
/// 2. Home directory
///
/// Returns the path and file content if found, None otherwise.
pub fn load_config_file() -> Option<(PathBuf, String)> {
    let local = PathBuf::from(CONFIG_FILE);
    if let Ok(content) = std::fs::read_to_string(&local) {
        log::debug!("Loaded config from {}", local.display());
        return Some((local, content));
    }

    if let Some(home_config) = home_config_path() {
        if let Ok(content) = std::fs::read_to_string(&home_config) {
            log::debug!("Loaded config from {}", home_config.display());
            return Some((home_config, content));
        }
    }

    None
}

fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE))
}
