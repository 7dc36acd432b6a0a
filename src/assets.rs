//! Paths into the public file area where uploaded images and PDFs live.
//!
//! Entities store paths relative to the storage root (`menus/nasi.jpg`).

use std::path::{Component, Path, PathBuf};

use validator::ValidationError;

/// Relative, non-empty and without `..`, root or prefix components.
pub fn is_safe_relative(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

pub fn validate_asset_path(value: &str) -> Result<(), ValidationError> {
    if is_safe_relative(value) {
        Ok(())
    } else {
        Err(ValidationError::new("asset_path"))
    }
}

pub fn resolve(root: &Path, relative: &str) -> Option<PathBuf> {
    is_safe_relative(relative).then(|| root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_relative_paths() {
        assert!(is_safe_relative("menus/nasi-goreng.jpg"));
        assert_eq!(
            resolve(Path::new("/srv/storage"), "pdf/menu.pdf"),
            Some(PathBuf::from("/srv/storage/pdf/menu.pdf"))
        );
    }

    #[test]
    fn rejects_escapes() {
        assert!(!is_safe_relative(""));
        assert!(!is_safe_relative("../secret.env"));
        assert!(!is_safe_relative("menus/../../etc/passwd"));
        assert!(!is_safe_relative("/etc/passwd"));
        assert!(resolve(Path::new("/srv/storage"), "../x").is_none());
    }
}
