//! Per-user locations and path expansion.
//!
//! The item file lives under the host's per-user configuration directory, in an
//! `instantAccess` folder. Paths typed by the user may use `~` and environment
//! variables; they are expanded only when an item is launched, so the stored
//! value stays portable between machines.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

/// Folder created under the configuration directory.
pub const APP_DIR_NAME: &str = "instantAccess";

/// Name of the item file.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default configuration directory: `<user config dir>/instantAccess`, or
/// `./instantAccess` when the platform reports none.
///
/// ```
/// use instant_access::infrastructure::default_config_dir;
///
/// assert!(default_config_dir().ends_with("instantAccess"));
/// ```
#[must_use]
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Location of the item file inside `config_dir`.
#[must_use]
pub fn config_file(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Directory for trace output: `<local data dir>/instant-access`.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("instant-access")
}

/// Expands a leading `~` and `$VAR` / `${VAR}` references.
///
/// Unset variables are left as written while the rest of the path is still
/// expanded, the way `os.path.expandvars` treats them.
///
/// ```
/// use instant_access::infrastructure::expand_path;
///
/// assert_eq!(expand_path("/absolute/path"), "/absolute/path");
/// assert_eq!(expand_path(""), "");
/// ```
#[must_use]
pub fn expand_path(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let home = || dirs::home_dir().map(|home| home.to_string_lossy().into_owned());
    let lookup = |name: &str| Ok::<_, Infallible>(std::env::var(name).ok());
    match shellexpand::full_with_context(raw, home, lookup) {
        Ok(expanded) => expanded.into_owned(),
        Err(e) => match e.cause {},
    }
}
