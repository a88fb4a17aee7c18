//! Zip bundles exchanged with the registry

use std::io::{Cursor, Read, Write};
use std::path::{Component, Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::domain::dataset::BundleFile;
use crate::domain::DomainError;

/// A decoded archive member with a path relative to the dataset directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

/// Decode every file of an archive.
///
/// The whole archive is read before anything is returned, so a corrupt bundle never
/// yields a partial entry list. Members that would land outside the target directory
/// are rejected.
pub fn read_archive(bytes: &[u8]) -> Result<Vec<ArchiveEntry>, DomainError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(archive_error)?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(archive_error)?;

        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        let path = file
            .enclosed_name()
            .map(|p| p.to_path_buf())
            .filter(|p| is_relative_inside(p))
            .ok_or_else(|| {
                DomainError::serialization(format!(
                    "Archive entry escapes dataset directory: {}",
                    name
                ))
            })?;

        let mut content = Vec::new();
        file.read_to_end(&mut content).map_err(|e| {
            DomainError::serialization(format!("Failed to read archive entry {}: {}", name, e))
        })?;

        entries.push(ArchiveEntry { path, content });
    }

    Ok(entries)
}

/// Encode files into a deflated zip archive
pub fn build_archive(files: &[BundleFile]) -> Result<Vec<u8>, DomainError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        zip.start_file(file.name.as_str(), options)
            .map_err(archive_error)?;
        zip.write_all(&file.content).map_err(|e| {
            DomainError::serialization(format!(
                "Failed to write archive entry {}: {}",
                file.name, e
            ))
        })?;
    }

    let cursor = zip.finish().map_err(archive_error)?;
    Ok(cursor.into_inner())
}

fn is_relative_inside(path: &Path) -> bool {
    path.components().all(|c| matches!(c, Component::Normal(_)))
}

fn archive_error(error: zip::result::ZipError) -> DomainError {
    DomainError::serialization(format!("Invalid dataset archive: {}", error))
}
