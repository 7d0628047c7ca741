//! Source archive extraction (tar.gz, zip)
//!
//! Every member path is validated before anything is written, so an archive
//! containing a single escaping entry leaves the destination untouched.

use std::fs::{self, File};
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use reqwest::Url;
use tar::{Archive, EntryType};
use tracing::debug;
use zip::ZipArchive;

use crate::inspect::error::InspectError;

/// Unix file type bits of a symbolic link
const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Supported source archive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl ArchiveFormat {
    /// Detect archive type from the extension of a download URL
    pub fn from_url(url: &str) -> Result<Self, InspectError> {
        let path = Url::parse(url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| url.to_string());

        let extension = Path::new(&path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("gz") => Ok(ArchiveFormat::TarGz),
            Some("zip") => Ok(ArchiveFormat::Zip),
            _ => Err(InspectError::UnsupportedFormat(path)),
        }
    }
}

/// Extract an in-memory archive into `dest_dir`
pub fn extract(bytes: &[u8], format: ArchiveFormat, dest_dir: &Path) -> Result<(), InspectError> {
    fs::create_dir_all(dest_dir)?;

    match format {
        ArchiveFormat::TarGz => extract_tar_gz(bytes, dest_dir),
        ArchiveFormat::Zip => extract_zip(bytes, dest_dir),
    }
}

/// Resolve an archive member path under `dest_dir`, rejecting anything that could escape it
fn safe_path(entry_path: &Path, dest_dir: &Path) -> Result<PathBuf, InspectError> {
    let mut target = dest_dir.to_path_buf();

    for component in entry_path.components() {
        match component {
            Component::Normal(name) => target.push(name),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(InspectError::PathTraversal(entry_path.to_path_buf()));
            }
        }
    }

    if !target.starts_with(dest_dir) {
        return Err(InspectError::PathTraversal(entry_path.to_path_buf()));
    }

    Ok(target)
}

fn extract_tar_gz(bytes: &[u8], dest_dir: &Path) -> Result<(), InspectError> {
    let mut archive = Archive::new(GzDecoder::new(bytes));
    for entry in archive.entries()? {
        safe_path(&entry?.path()?, dest_dir)?;
    }

    let mut archive = Archive::new(GzDecoder::new(bytes));
    for entry in archive.entries()? {
        let mut entry = entry?;
        let target = safe_path(&entry.path()?, dest_dir)?;

        match entry.header().entry_type() {
            EntryType::Directory => fs::create_dir_all(&target)?,
            EntryType::Regular | EntryType::Continuous => {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                entry.unpack(&target)?;
            }
            other => debug!("Skipping {:?} entry {}", other, target.display()),
        }
    }

    Ok(())
}

fn extract_zip(bytes: &[u8], dest_dir: &Path) -> Result<(), InspectError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut targets = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let file = archive.by_index(i)?;
        targets.push(safe_path(Path::new(file.name()), dest_dir)?);
    }

    for (i, target) in targets.into_iter().enumerate() {
        let mut file = archive.by_index(i)?;

        if file.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if file.unix_mode().is_some_and(|mode| mode & S_IFMT == S_IFLNK) {
            debug!("Skipping symlink entry {}", target.display());
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut file, &mut out)?;
    }

    Ok(())
}

/// Returns the first top-level directory (by name) of an extraction directory
pub fn locate_package_root(extract_dir: &Path) -> Result<PathBuf, InspectError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(extract_dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();

    dirs.into_iter()
        .next()
        .ok_or_else(|| InspectError::PackageLayout(extract_dir.to_path_buf()))
}
