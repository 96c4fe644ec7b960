use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageRefError {
    #[error("image reference cannot be empty")]
    Empty,
}

//
// ─── IMAGE REFERENCE ───────────────────────────────────────────────────────────
//

/// Where a word's picture lives.
///
/// Datasets normally carry paths relative to the host's asset root
/// (`words/apple.png`); hosts that bundle assets behind a scheme
/// (`qrc:/data/words/apple.png`, `https://...`) keep the URL form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    FilePath(PathBuf),
    Url(Url),
}

impl ImageRef {
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ImageRefError> {
        let p = path.into();
        if p.as_os_str().is_empty() {
            return Err(ImageRefError::Empty);
        }
        Ok(ImageRef::FilePath(p))
    }

    /// Parse a raw dataset value, keeping scheme-qualified values as URLs and
    /// everything else as a path.
    ///
    /// Single-letter schemes are treated as drive letters, not URLs.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ImageRefError> {
        let s = raw.as_ref().trim();
        if s.is_empty() {
            return Err(ImageRefError::Empty);
        }
        match Url::parse(s) {
            Ok(url) if url.scheme().len() > 1 => Ok(ImageRef::Url(url)),
            _ => Self::from_file(s),
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ImageRef::FilePath(p) => Some(p.as_path()),
            ImageRef::Url(_) => None,
        }
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            ImageRef::Url(u) => Some(u),
            ImageRef::FilePath(_) => None,
        }
    }

    /// Resolve a relative path against an asset root; URLs and absolute
    /// paths are returned unchanged.
    #[must_use]
    pub fn resolved_against(&self, root: &Path) -> ImageRef {
        match self {
            ImageRef::FilePath(p) if p.is_relative() => ImageRef::FilePath(root.join(p)),
            other => other.clone(),
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::FilePath(p) => write!(f, "{}", p.display()),
            ImageRef::Url(u) => f.write_str(u.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_stay_paths() {
        let image = ImageRef::parse("words/apple.png").unwrap();
        assert_eq!(image.as_path(), Some(Path::new("words/apple.png")));
    }

    #[test]
    fn scheme_values_become_urls() {
        let image = ImageRef::parse("qrc:/data/words/apple.png").unwrap();
        assert_eq!(image.as_url().map(Url::scheme), Some("qrc"));
    }

    #[test]
    fn empty_values_are_rejected() {
        assert_eq!(ImageRef::parse("   "), Err(ImageRefError::Empty));
        assert_eq!(ImageRef::from_file(""), Err(ImageRefError::Empty));
    }

    #[test]
    fn resolves_relative_paths_against_root() {
        let image = ImageRef::parse("words/apple.png").unwrap();
        let resolved = image.resolved_against(Path::new("/assets"));
        assert_eq!(resolved.as_path(), Some(Path::new("/assets/words/apple.png")));

        let url = ImageRef::parse("https://example.org/apple.png").unwrap();
        assert_eq!(url.resolved_against(Path::new("/assets")), url);
    }
}
