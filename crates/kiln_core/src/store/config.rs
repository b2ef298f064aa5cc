use serde::Deserialize;
use std::{env, fs, sync::LazyLock};

pub const STORE_DIR: &str = "/kiln/store";
pub const STATE_DIR: &str = "/kiln/var";
pub const CONFIG_FILE: &str = "/etc/kiln/config.toml";

/// the resolved configuration of this process
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::load);

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub store_dir: String,
    pub state_dir: String,
    pub read_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: STORE_DIR.to_string(),
            state_dir: STATE_DIR.to_string(),
            read_only: false,
        }
    }
}

impl Config {
    /// defaults, overridden by the config file, overridden by environment
    /// variables
    pub fn load() -> Self {
        let file = env::var("KILN_CONFIG").unwrap_or(CONFIG_FILE.to_string());
        let mut config = fs::read_to_string(file)
            .ok()
            .and_then(|s| Config::from_toml(&s))
            .unwrap_or_default();
        if let Ok(dir) = env::var("KILN_STORE_DIR") {
            config.store_dir = dir;
        }
        if let Ok(dir) = env::var("KILN_STATE_DIR") {
            config.state_dir = dir;
        }
        if let Ok(flag) = env::var("KILN_READ_ONLY") {
            config.read_only = flag == "1" || flag.eq_ignore_ascii_case("true");
        }
        // store paths are printed as `<store_dir>/<path>`
        config.store_dir = trim_dir(&config.store_dir);
        config.state_dir = trim_dir(&config.state_dir);
        config
    }

    /// a file that does not parse counts as absent
    pub fn from_toml(s: &str) -> Option<Self> {
        toml::from_str(s).ok()
    }
}

fn trim_dir(dir: &str) -> String {
    let trimmed = dir.trim_end_matches('/');
    if trimmed.is_empty() {
        dir.to_string()
    } else {
        trimmed.to_string()
    }
}
