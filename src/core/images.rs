//! Supplementary image pool.
//!
//! Images are picked from a local directory and delivered as base64 data
//! URLs. Selection avoids the most recently used files so successive image
//! drops feel varied.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::core::constants::RECENT_IMAGE_WINDOW;
use crate::core::random::RandomSource;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "svg", "webp"];
const MAX_PICK_ATTEMPTS: usize = 10;

/// Errors from the image pool.
#[derive(Debug)]
pub enum ImagePoolError {
    DirectoryNotFound(PathBuf),
    Empty(PathBuf),
    Read { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for ImagePoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImagePoolError::DirectoryNotFound(path) => {
                write!(f, "Images directory not found: {}", path.display())
            }
            ImagePoolError::Empty(path) => {
                write!(f, "No images found in folder: {}", path.display())
            }
            ImagePoolError::Read { path, source } => {
                write!(f, "Failed to read image {}: {source}", path.display())
            }
        }
    }
}

impl StdError for ImagePoolError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ImagePoolError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A picked image, ready to attach to a message.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    /// `data:{mime};base64,...` payload.
    pub data_url: String,
    pub file_name: String,
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

/// Read a single image file into a data-URL asset, for user attachments.
pub fn data_url_for_file(path: impl AsRef<Path>) -> Result<ImageAsset, ImagePoolError> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attachment")
        .to_string();
    let bytes = fs::read(path).map_err(|source| ImagePoolError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let data_url = format!(
        "data:{};base64,{}",
        mime_for(&file_name),
        BASE64.encode(bytes)
    );
    Ok(ImageAsset {
        data_url,
        file_name,
    })
}

/// A directory of images with recent-selection tracking.
pub struct ImagePool {
    dir: PathBuf,
    files: Vec<String>,
    recent: Vec<String>,
}

impl ImagePool {
    /// Scan a directory for image files.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self, ImagePoolError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(ImagePoolError::DirectoryNotFound(dir));
        }
        let entries = fs::read_dir(&dir).map_err(|source| ImagePoolError::Read {
            path: dir.clone(),
            source,
        })?;
        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| {
                Path::new(name)
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| {
                        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
                    })
            })
            .collect();
        files.sort();
        if files.is_empty() {
            return Err(ImagePoolError::Empty(dir));
        }
        Ok(Self {
            dir,
            files,
            recent: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// File names in the pool, for listing.
    pub fn file_names(&self) -> &[String] {
        &self.files
    }

    /// Pick a random image, steering away from recent picks when the pool
    /// has more than one file.
    pub fn pick(&mut self, rng: &mut dyn RandomSource) -> Result<ImageAsset, ImagePoolError> {
        let mut choice = self.files[rng.pick_index(self.files.len())].clone();
        let mut attempts = 1;
        while self.recent.contains(&choice) && attempts < MAX_PICK_ATTEMPTS && self.files.len() > 1
        {
            choice = self.files[rng.pick_index(self.files.len())].clone();
            attempts += 1;
        }

        self.recent.push(choice.clone());
        if self.recent.len() > RECENT_IMAGE_WINDOW {
            self.recent.remove(0);
        }

        let path = self.dir.join(&choice);
        let bytes = fs::read(&path).map_err(|source| ImagePoolError::Read {
            path: path.clone(),
            source,
        })?;
        let data_url = format!("data:{};base64,{}", mime_for(&choice), BASE64.encode(bytes));
        Ok(ImageAsset {
            data_url,
            file_name: choice,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::SequenceRandom;

    fn seed_dir(names: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"pixels").unwrap();
        }
        dir
    }

    #[test]
    fn scan_keeps_only_image_extensions() {
        let dir = seed_dir(&["a.png", "b.JPG", "notes.txt", "c.webp"]);
        let pool = ImagePool::from_dir(dir.path()).unwrap();
        assert_eq!(pool.len(), 3);
        assert!(!pool.file_names().iter().any(|f| f == "notes.txt"));
    }

    #[test]
    fn missing_and_empty_directories_error() {
        assert!(matches!(
            ImagePool::from_dir("/definitely/not/here"),
            Err(ImagePoolError::DirectoryNotFound(_))
        ));
        let dir = seed_dir(&["readme.md"]);
        assert!(matches!(
            ImagePool::from_dir(dir.path()),
            Err(ImagePoolError::Empty(_))
        ));
    }

    #[test]
    fn pick_builds_a_data_url() {
        let dir = seed_dir(&["solo.png"]);
        let mut pool = ImagePool::from_dir(dir.path()).unwrap();
        let mut rng = SequenceRandom::new([0]);
        let asset = pool.pick(&mut rng).unwrap();
        assert_eq!(asset.file_name, "solo.png");
        assert!(asset.data_url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn pick_avoids_recent_selections() {
        let dir = seed_dir(&["a.jpg", "b.jpg", "c.jpg"]);
        let mut pool = ImagePool::from_dir(dir.path()).unwrap();
        // First pick takes index 0; the second draw starts at index 0 again
        // and must re-roll to index 1 because "a.jpg" is recent.
        let mut rng = SequenceRandom::new([0, 0, 1]);
        let first = pool.pick(&mut rng).unwrap();
        assert_eq!(first.file_name, "a.jpg");
        let second = pool.pick(&mut rng).unwrap();
        assert_eq!(second.file_name, "b.jpg");
    }

    #[test]
    fn single_file_pools_repeat_without_spinning() {
        let dir = seed_dir(&["only.gif"]);
        let mut pool = ImagePool::from_dir(dir.path()).unwrap();
        let mut rng = SequenceRandom::new([0]);
        for _ in 0..3 {
            let asset = pool.pick(&mut rng).unwrap();
            assert_eq!(asset.file_name, "only.gif");
        }
    }

    #[test]
    fn single_file_reads_as_data_url() {
        let dir = seed_dir(&["selfie.jpg"]);
        let asset = data_url_for_file(dir.path().join("selfie.jpg")).unwrap();
        assert_eq!(asset.file_name, "selfie.jpg");
        assert!(asset.data_url.starts_with("data:image/jpeg;base64,"));
        assert!(matches!(
            data_url_for_file(dir.path().join("absent.jpg")),
            Err(ImagePoolError::Read { .. })
        ));
    }

    #[test]
    fn mime_fallback_is_jpeg() {
        assert_eq!(mime_for("photo.jpeg"), "image/jpeg");
        assert_eq!(mime_for("vector.SVG"), "image/svg+xml");
        assert_eq!(mime_for("weird.unknown"), "image/jpeg");
    }
}
