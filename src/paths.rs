//! Path normalization and scan-root validation.
//!
//! Catalog rows store image paths relative to the image root, with `/` separators and no
//! leading slash. Everything on the filesystem side is resolved with `fs::canonicalize`
//! before it is compared, so trailing slashes, `..` segments and symlinked parents cannot
//! produce a mismatch.

use crate::config::RootPolicy;
use crate::error::Error;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// A validated directory to scan.
///
/// `dir` is where files are looked for and the boundary deletions must stay inside.
/// `base` is what relative paths are computed against. Under the contained policy
/// `base` is always the image root, whatever subdirectory was selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRoot {
    pub dir: PathBuf,
    pub base: PathBuf,
}

impl ScanRoot {
    pub fn contains(&self, resolved: &Path) -> bool {
        resolved.starts_with(&self.dir)
    }

    /// Relative key of an already resolved path, or `None` when it is outside `dir`.
    pub fn relative_key(&self, resolved: &Path) -> Option<String> {
        if !self.contains(resolved) {
            return None;
        }
        relative_key(resolved, &self.base)
    }
}

/// Strips `root` from `resolved` and joins the remaining components with `/`.
/// Both arguments must already be resolved.
pub fn relative_key(resolved: &Path, root: &Path) -> Option<String> {
    let rest = resolved.strip_prefix(root).ok()?;
    let mut parts: Vec<String> = Vec::new();
    for component in rest.components() {
        match component {
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

/// Resolves both paths and returns `absolute` relative to `root`.
pub fn normalize(absolute: &Path, root: &Path) -> Result<String, Error> {
    let resolved_root = fs::canonicalize(root)?;
    let resolved = fs::canonicalize(absolute)?;
    relative_key(&resolved, &resolved_root).ok_or_else(|| {
        Error::InvalidRoot(format!(
            "{} is not under {}",
            resolved.display(),
            resolved_root.display()
        ))
    })
}

/// Turns operator input into a [`ScanRoot`].
///
/// Relative input is taken relative to `authorized_root`; empty input selects the root
/// itself. Under the contained policy `/` also means the image root. Under the open
/// policy a slash-only input would name the filesystem root and is refused.
///
/// Keys stay relative to the image root whenever `dir` lies inside it, whatever the
/// policy, since that is how the catalog stores them. Only an open-policy directory
/// outside the image root becomes its own base.
pub fn validate_root(
    input: Option<&str>,
    authorized_root: &Path,
    policy: RootPolicy,
) -> Result<ScanRoot, Error> {
    let resolved_root = resolve_dir(authorized_root).map_err(|err| {
        Error::InvalidRoot(format!(
            "image root {} is not usable: {}",
            authorized_root.display(),
            err
        ))
    })?;

    if policy == RootPolicy::Open
        && input.is_some_and(|s| !s.is_empty() && s.trim_start_matches('/').is_empty())
    {
        return Err(Error::InvalidRoot(
            "refusing to scan the filesystem root".to_string(),
        ));
    }

    let input = input
        .map(|s| s.trim_end_matches('/'))
        .filter(|s| !s.is_empty());
    let Some(input) = input else {
        return Ok(ScanRoot {
            dir: resolved_root.clone(),
            base: resolved_root,
        });
    };

    let dir = resolve_dir(&authorized_root.join(input))
        .map_err(|err| Error::InvalidRoot(format!("{}: {}", input, err)))?;

    match policy {
        RootPolicy::Contained => {
            if !dir.starts_with(&resolved_root) {
                return Err(Error::InvalidRoot(format!(
                    "{} is outside {}",
                    input,
                    resolved_root.display()
                )));
            }
            Ok(ScanRoot {
                dir,
                base: resolved_root,
            })
        }
        RootPolicy::Open if dir.starts_with(&resolved_root) => Ok(ScanRoot {
            dir,
            base: resolved_root,
        }),
        RootPolicy::Open => Ok(ScanRoot {
            base: dir.clone(),
            dir,
        }),
    }
}

// Resolved, existing and listable.
fn resolve_dir(path: &Path) -> io::Result<PathBuf> {
    let resolved = fs::canonicalize(path)?;
    if !resolved.is_dir() {
        return Err(io::Error::new(io::ErrorKind::Other, "not a directory"));
    }
    fs::read_dir(&resolved)?;
    Ok(resolved)
}

/// Sorted names of the visible directories directly under `root`.
pub fn subdirectories(root: &Path) -> Result<Vec<String>, Error> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            dirs.push(name);
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_relative_key_strips_root() {
        let key = relative_key(Path::new("/srv/image/catalog/a.jpg"), Path::new("/srv/image"));
        assert_eq!(key.as_deref(), Some("catalog/a.jpg"));
    }

    #[test]
    fn test_relative_key_outside_root() {
        assert_eq!(
            relative_key(Path::new("/srv/other/a.jpg"), Path::new("/srv/image")),
            None
        );
        // A shared string prefix is not containment.
        assert_eq!(
            relative_key(Path::new("/srv/image2/a.jpg"), Path::new("/srv/image")),
            None
        );
    }

    #[test]
    fn test_normalize_resolves_dot_dot() {
        let tmp = tempdir().unwrap();
        let catalog = tmp.path().join("catalog");
        fs::create_dir_all(&catalog).unwrap();
        fs::write(catalog.join("a.jpg"), b"x").unwrap();

        let spelled = tmp.path().join("catalog/../catalog/./a.jpg");
        let root_with_slash = PathBuf::from(format!("{}/", tmp.path().display()));
        assert_eq!(normalize(&spelled, &root_with_slash).unwrap(), "catalog/a.jpg");
    }

    #[test]
    fn test_normalize_rejects_outside() {
        let root = tempdir().unwrap();
        let other = tempdir().unwrap();
        let file = other.path().join("a.jpg");
        fs::write(&file, b"x").unwrap();
        assert!(normalize(&file, root.path()).is_err());
    }

    #[test]
    fn test_validate_root_empty_input_is_root() {
        let tmp = tempdir().unwrap();
        let root = validate_root(None, tmp.path(), RootPolicy::Contained).unwrap();
        let resolved = fs::canonicalize(tmp.path()).unwrap();
        assert_eq!(root.dir, resolved);
        assert_eq!(root.base, resolved);

        let slash = validate_root(Some("/"), tmp.path(), RootPolicy::Contained).unwrap();
        assert_eq!(slash.dir, resolved);
    }

    #[test]
    fn test_validate_root_contained_keeps_image_root_as_base() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("catalog/demo")).unwrap();
        let root = validate_root(Some("catalog/demo/"), tmp.path(), RootPolicy::Contained).unwrap();
        let resolved = fs::canonicalize(tmp.path()).unwrap();
        assert_eq!(root.dir, resolved.join("catalog/demo"));
        assert_eq!(root.base, resolved);
    }

    #[test]
    fn test_validate_root_contained_rejects_escape() {
        let tmp = tempdir().unwrap();
        let image = tmp.path().join("image");
        fs::create_dir_all(&image).unwrap();
        fs::create_dir_all(tmp.path().join("private")).unwrap();

        let err = validate_root(Some("../private"), &image, RootPolicy::Contained).unwrap_err();
        assert!(matches!(err, Error::InvalidRoot(_)));

        let absolute = tmp.path().join("private");
        let err = validate_root(absolute.to_str(), &image, RootPolicy::Contained).unwrap_err();
        assert!(matches!(err, Error::InvalidRoot(_)));
    }

    #[test]
    fn test_validate_root_open_accepts_outside_dir() {
        let tmp = tempdir().unwrap();
        let image = tmp.path().join("image");
        let other = tmp.path().join("uploads");
        fs::create_dir_all(&image).unwrap();
        fs::create_dir_all(&other).unwrap();

        let root = validate_root(other.to_str(), &image, RootPolicy::Open).unwrap();
        let resolved = fs::canonicalize(&other).unwrap();
        assert_eq!(root.dir, resolved);
        assert_eq!(root.base, resolved);
    }

    #[test]
    fn test_validate_root_open_inside_image_root_keeps_image_root_as_base() {
        let tmp = tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("catalog")).unwrap();
        let resolved = fs::canonicalize(tmp.path()).unwrap();

        let root = validate_root(Some("catalog"), tmp.path(), RootPolicy::Open).unwrap();
        assert_eq!(root.dir, resolved.join("catalog"));
        assert_eq!(root.base, resolved);

        let absolute = resolved.join("catalog");
        let root = validate_root(absolute.to_str(), tmp.path(), RootPolicy::Open).unwrap();
        assert_eq!(root.base, resolved);
    }

    #[test]
    fn test_validate_root_open_refuses_filesystem_root() {
        let tmp = tempdir().unwrap();
        for input in ["/", "//"] {
            let err = validate_root(Some(input), tmp.path(), RootPolicy::Open).unwrap_err();
            assert!(matches!(err, Error::InvalidRoot(_)));
        }
        let root = validate_root(None, tmp.path(), RootPolicy::Open).unwrap();
        assert_eq!(root.dir, fs::canonicalize(tmp.path()).unwrap());
    }

    #[test]
    fn test_validate_root_rejects_missing_and_files() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("file.jpg"), b"x").unwrap();
        for policy in [RootPolicy::Contained, RootPolicy::Open] {
            assert!(validate_root(Some("missing"), tmp.path(), policy).is_err());
            assert!(validate_root(Some("file.jpg"), tmp.path(), policy).is_err());
        }
    }

    #[test]
    fn test_subdirectories_sorted_and_visible() {
        let tmp = tempdir().unwrap();
        for dir in ["catalog", "banners", ".git", "cache"] {
            fs::create_dir_all(tmp.path().join(dir)).unwrap();
        }
        fs::write(tmp.path().join("logo.png"), b"x").unwrap();
        assert_eq!(
            subdirectories(tmp.path()).unwrap(),
            vec!["banners", "cache", "catalog"]
        );
    }
}
