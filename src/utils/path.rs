//! Path utilities: expand ~, locate the data directory next to the database.

use std::path::{Path, PathBuf};

pub const IN_MEMORY: &str = ":memory:";

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

pub fn is_in_memory(path: &Path) -> bool {
    path.as_os_str() == IN_MEMORY
}

/// Directory holding the database file (and any old JSON data files).
pub fn data_dir_of(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
