//! Reading labeled images out of a zip archive.
//!
//! Images are expected under `<label>/<file>.{jpg,png,bmp}`. The label is
//! the entry's directory path, so nested folders give labels such as
//! `flowers/roses`.

use crate::errors::ArchiveError;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

pub const IMAGE_EXTENSIONS: [&str; 3] = [".jpg", ".png", ".bmp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledImage {
    pub label: String,
    /// File name without the directory part.
    pub name: String,
    pub path: String,
    pub data: Vec<u8>,
}

impl LabeledImage {
    fn new(path: String, data: Vec<u8>) -> Self {
        let (label, name) = split_entry_path(&path);
        Self {
            label: label.to_string(),
            name: name.to_string(),
            path,
            data,
        }
    }
}

pub fn is_image(entry_path: &str) -> bool {
    let lower = entry_path.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Splits an entry path into (directory, file name).
pub fn split_entry_path(entry_path: &str) -> (&str, &str) {
    match entry_path.rfind(['/', '\\']) {
        Some(i) => (&entry_path[..i], &entry_path[i + 1..]),
        None => ("", entry_path),
    }
}

/// Makes the archive path absolute.
pub fn resolve_archive_path(path: &Path) -> Result<PathBuf, ArchiveError> {
    if path.as_os_str().is_empty() {
        return Err(ArchiveError::InvalidPath(path.to_path_buf()));
    }
    std::path::absolute(path).map_err(|_| ArchiveError::InvalidPath(path.to_path_buf()))
}

/// The project is named after the archive file, without its extension.
pub fn project_name(path: &Path) -> Result<String, ArchiveError> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(|stem| stem.to_string())
        .ok_or_else(|| ArchiveError::InvalidPath(path.to_path_buf()))
}

/// Single-pass iterator over the images of an archive, in archive order.
pub struct DatasetReader<R> {
    archive: ZipArchive<R>,
    next_index: usize,
}

impl DatasetReader<File> {
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path).map_err(|source| ArchiveError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file)
    }
}

impl<R: Read + Seek> DatasetReader<R> {
    pub fn new(reader: R) -> Result<Self, ArchiveError> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
            next_index: 0,
        })
    }

    /// Number of entries in the archive, images or not.
    pub fn entry_count(&self) -> usize {
        self.archive.len()
    }
}

impl<R: Read + Seek> Iterator for DatasetReader<R> {
    type Item = Result<LabeledImage, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next_index < self.archive.len() {
            let index = self.next_index;
            self.next_index += 1;

            let mut entry = match self.archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            if entry.is_dir() || !is_image(entry.name()) {
                continue;
            }

            let path = entry.name().to_string();
            let mut data = Vec::with_capacity(entry.size() as usize);
            if let Err(source) = entry.read_to_end(&mut data) {
                return Some(Err(ArchiveError::Entry { name: path, source }));
            }
            return Some(Ok(LabeledImage::new(path, data)));
        }
        None
    }
}
