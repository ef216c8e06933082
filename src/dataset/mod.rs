//! # Dataset Module
//!
//! Walks a class-labeled image dataset and writes filtered copies of every
//! image into a mirrored per-filter output tree.
//!
//! - `layout`: class and file enumeration, image decode/encode, output paths
//! - `policy`: which filters an image gets based on its position in its class
//! - `processor`: the per-class fold and the run summary

pub mod layout;
pub mod policy;
pub mod processor;

pub use layout::{
    decode_image, list_class_dirs, list_image_files, ClassDir, OutputLayout, EXCLUDED_DIR_NAMES,
    IMAGE_SUBDIR,
};
pub use policy::{FilterPolicy, FULL_FILTER_LIMIT};
pub use processor::{process_images, ClassSummary, DatasetProcessor, RunSummary};
