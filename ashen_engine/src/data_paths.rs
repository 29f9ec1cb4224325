use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Cached path to the directory containing the engine's runtime data files.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Construct a data path relative to the resolved data root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// Resolve relative paths against the data root; absolute paths pass through.
pub fn resolve_data_file(path: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { data_path(path) }
}

fn detect_data_root() -> PathBuf {
    let mut candidates = vec![PathBuf::from("ashen_engine/data"), PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.join("ashen_engine/data"));
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("ashen_engine/data"));
            candidates.push(parent.join("data"));
        }
    }

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("ashen_engine/data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_pass_through() {
        let absolute = env::temp_dir().join("descriptions.ron");
        assert_eq!(resolve_data_file(&absolute), absolute);
    }

    #[test]
    fn relative_paths_land_under_the_data_root() {
        let resolved = resolve_data_file(Path::new("descriptions.ron"));
        assert!(resolved.ends_with("descriptions.ron"));
        assert!(resolved.starts_with(&*DATA_ROOT));
    }
}
