// SPDX-License-Identifier: MPL-2.0
//! Application directories.
//!
//! The config directory holds `settings.toml`; the data directory holds the
//! landmark model and diagnostics reports.
//!
//! # Path Resolution Order
//!
//! 1. **Explicit override** passed to the `_with_override()` functions
//! 2. **CLI arguments** (`--data-dir`, `--config-dir`) set via [`init_cli_overrides`]
//! 3. **Environment variables** (`IRIS_LENS_DATA_DIR`, `IRIS_LENS_CONFIG_DIR`)
//! 4. **Platform default** via `dirs`, with [`APP_NAME`] appended

use std::path::PathBuf;
use std::sync::OnceLock;

/// Directory name under the platform data and config roots.
pub const APP_NAME: &str = "IrisLens";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "IRIS_LENS_DATA_DIR";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "IRIS_LENS_CONFIG_DIR";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Records the `--data-dir` and `--config-dir` arguments.
///
/// Only the first call has an effect; later calls return `false` and leave
/// the recorded values untouched.
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) -> bool {
    let data_set = CLI_DATA_DIR.set(data_dir.map(PathBuf::from)).is_ok();
    let config_set = CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_ok();
    data_set && config_set
}

fn resolve(
    override_path: Option<PathBuf>,
    cli: &OnceLock<Option<PathBuf>>,
    env_var: &str,
    platform: fn() -> Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }
    if let Some(path) = cli.get().and_then(Clone::clone) {
        return Some(path);
    }
    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }
    platform().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Returns the application data directory (model file, diagnostics).
///
/// - Linux: `~/.local/share/IrisLens/`
/// - macOS: `~/Library/Application Support/IrisLens/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\IrisLens\`
///
/// Returns `None` if no platform data directory exists.
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_DATA_DIR, ENV_DATA_DIR, dirs::data_dir)
}

/// Returns the application config directory (`settings.toml`).
///
/// Returns `None` if no platform config directory exists.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(
        override_path,
        &CLI_CONFIG_DIR,
        ENV_CONFIG_DIR,
        dirs::config_dir,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests below mutate process-wide environment variables.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn platform_data_dir_ends_with_app_name() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::remove_var(ENV_DATA_DIR);

        if let Some(path) = get_app_data_dir_with_override(None) {
            if CLI_DATA_DIR.get().and_then(Clone::clone).is_none() {
                assert!(path.ends_with(APP_NAME));
                assert!(path.is_absolute());
            }
        }
    }

    #[test]
    fn override_path_takes_precedence() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "/env/config");

        let override_path = PathBuf::from("/custom/config");
        assert_eq!(
            get_app_config_dir_with_override(Some(override_path.clone())),
            Some(override_path)
        );

        std::env::remove_var(ENV_CONFIG_DIR);
    }

    #[test]
    fn env_var_overrides_platform_default() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_DATA_DIR, "/test/iris/data");

        assert_eq!(
            get_app_data_dir(),
            Some(PathBuf::from("/test/iris/data"))
        );

        std::env::remove_var(ENV_DATA_DIR);
    }

    #[test]
    fn empty_env_var_is_ignored() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var(ENV_CONFIG_DIR, "");

        if let Some(path) = get_app_config_dir() {
            assert_ne!(path, PathBuf::new());
        }

        std::env::remove_var(ENV_CONFIG_DIR);
    }
}
