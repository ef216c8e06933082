//! # Dataset Layout
//!
//! Input side: `<input_root>/<class>/image/<filename>`.
//! Output side: `<output_root>/<filter>/<class>/<filename>`.
//!
//! Class directories and image files are returned in lexicographic order so
//! that the per-class full-filter limit always selects the same images.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, ImageReader};

use crate::errors::error_logging::log_filesystem_error;
use crate::errors::{AppError, AppResult};
use crate::preprocessing::FilterKind;

/// Subdirectory of each class directory that holds its raw images
pub const IMAGE_SUBDIR: &str = "image";

/// Tool-artifact directories that are never treated as classes
pub const EXCLUDED_DIR_NAMES: [&str; 2] = [".idea", "venv"];

/// One class folder of the input dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDir {
    /// Directory name, used verbatim as the class label in the output tree
    pub name: OsString,
    /// Full path of the class directory
    pub path: PathBuf,
}

impl ClassDir {
    /// Class label for logging.
    pub fn label(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }

    /// Path of the class's `image` subdirectory.
    pub fn image_dir(&self) -> PathBuf {
        self.path.join(IMAGE_SUBDIR)
    }
}

/// Lists the class directories directly under `input_root`, sorted by name.
///
/// Skips non-directories, the tool-artifact directories in
/// [`EXCLUDED_DIR_NAMES`], and `output_root` when it sits inside the input root.
pub fn list_class_dirs(input_root: &Path, output_root: &Path) -> AppResult<Vec<ClassDir>> {
    let entries = fs::read_dir(input_root).map_err(|e| {
        log_filesystem_error(&e, "list_class_dirs", input_root);
        AppError::FileSystem(format!(
            "Failed to read dataset root {}: {}",
            input_root.display(),
            e
        ))
    })?;

    let mut classes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            log_filesystem_error(&e, "list_class_dirs", input_root);
            AppError::FileSystem(format!(
                "Failed to read entry in {}: {}",
                input_root.display(),
                e
            ))
        })?;

        let name = entry.file_name();
        let path = entry.path();

        if is_excluded_name(&name) {
            tracing::debug!(path = %path.display(), "Skipping tool directory");
            continue;
        }

        if !path.is_dir() {
            continue;
        }

        if is_same_dir(&path, output_root) {
            tracing::debug!(path = %path.display(), "Skipping output directory inside dataset root");
            continue;
        }

        classes.push(ClassDir { name, path });
    }

    classes.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(classes)
}

/// Lists the files in a class's `image` directory, sorted by file name.
///
/// A missing directory is a fatal error. Nested directories are ignored.
pub fn list_image_files(image_dir: &Path) -> AppResult<Vec<PathBuf>> {
    let entries = fs::read_dir(image_dir).map_err(|e| {
        log_filesystem_error(&e, "list_image_files", image_dir);
        AppError::FileSystem(format!(
            "Failed to read image directory {}: {}",
            image_dir.display(),
            e
        ))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| {
                log_filesystem_error(&e, "list_image_files", image_dir);
                AppError::FileSystem(format!(
                    "Failed to read entry in {}: {}",
                    image_dir.display(),
                    e
                ))
            })?
            .path();

        if path.is_dir() {
            continue;
        }
        files.push(path);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Decodes an image file, detecting the format from its content.
///
/// The result is always 8-bit RGB, whatever the stored color type.
pub fn decode_image(path: &Path) -> Result<DynamicImage, ImageError> {
    let decoded = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(DynamicImage::ImageRgb8(decoded.to_rgb8()))
}

/// Encodes `image` to `path`, picking the format from the file extension.
pub fn save_image(image: &DynamicImage, path: &Path) -> AppResult<()> {
    image.save(path).map_err(|e| {
        log_filesystem_error(&e, "save_image", path);
        match e {
            ImageError::IoError(io) => AppError::FileSystem(format!(
                "Failed to write {}: {}",
                path.display(),
                io
            )),
            other => AppError::ImageEncode(format!(
                "Failed to encode {}: {}",
                path.display(),
                other
            )),
        }
    })
}

fn is_excluded_name(name: &OsStr) -> bool {
    EXCLUDED_DIR_NAMES.iter().any(|excluded| name == *excluded)
}

fn is_same_dir(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// The per-filter output tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<filter>/<class>`
    pub fn class_dir(&self, kind: FilterKind, class_name: &OsStr) -> PathBuf {
        self.root.join(kind.dir_name()).join(class_name)
    }

    /// `<root>/<filter>/<class>/<file_name>`
    pub fn output_path(&self, kind: FilterKind, class_name: &OsStr, file_name: &OsStr) -> PathBuf {
        self.class_dir(kind, class_name).join(file_name)
    }

    /// Creates the class directory under every filter directory. Existing
    /// directories are left alone.
    pub fn ensure_class_dirs(&self, class_name: &OsStr) -> AppResult<()> {
        for kind in FilterKind::ALL {
            let dir = self.class_dir(kind, class_name);
            fs::create_dir_all(&dir).map_err(|e| {
                log_filesystem_error(&e, "ensure_class_dirs", &dir);
                AppError::FileSystem(format!(
                    "Failed to create output directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }
}
