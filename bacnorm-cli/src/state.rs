use std::path::{Path, PathBuf};

/// `$HOME`, when set and non-empty.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

pub fn bacnorm_home(home: &Path) -> PathBuf {
    home.join(".bacnorm")
}

pub fn default_config_path(home: &Path) -> PathBuf {
    bacnorm_home(home).join("config.toml")
}
