//! Backup and restore operations for the entries directory.
//!
//! A backup is a gzip-compressed tar archive holding every entry record at
//! the archive root. Restoring extracts those records back into the storage
//! root; the store picks them up on its next reload.

use crate::entry_io::{ensure_entries_directory_exists, is_record_path};
use crate::errors::{AppResult, BackupError};
use blake3::Hasher;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Report of a completed backup operation.
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// Total number of entry records included in backup
    pub total_entries: usize,
    /// Size of the backup archive in bytes
    pub archive_size: u64,
    /// BLAKE3 checksum of the backup archive
    pub checksum: String,
    /// Duration taken to create the backup
    pub duration: Duration,
}

/// Report of a completed restore operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Records written into the entries directory
    pub entries_restored: usize,
    /// Archive members ignored because they are not entry records
    pub skipped: usize,
}

/// Creates a compressed archive of every entry record.
///
/// # Flow
///
/// 1. Collect all `*.json` records directly inside the entries directory
/// 2. Create tar.gz archive with bare file names
/// 3. Write archive to `output_path`
/// 4. Calculate BLAKE3 checksum of the written bytes
///
/// # Errors
///
/// Returns an error if:
/// - Entries directory doesn't exist
/// - Archive creation or writing fails
pub fn create_backup(entries_dir: &Path, output_path: &Path) -> AppResult<BackupReport> {
    let start_time = Instant::now();
    info!("Creating backup from {:?} to {:?}", entries_dir, output_path);

    if !entries_dir.is_dir() {
        return Err(BackupError::MissingStorageRoot(entries_dir.to_path_buf()).into());
    }

    let archive_error = |source| BackupError::Archive {
        path: output_path.to_path_buf(),
        source,
    };

    debug!("Collecting entry records");
    let mut record_paths: Vec<PathBuf> = Vec::new();
    for dir_entry in WalkDir::new(entries_dir).min_depth(1).max_depth(1) {
        let dir_entry = dir_entry.map_err(|e| archive_error(e.into()))?;
        if dir_entry.file_type().is_file() && is_record_path(dir_entry.path()) {
            record_paths.push(dir_entry.into_path());
        }
    }
    record_paths.sort();
    debug!("Found {} entry records", record_paths.len());

    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut tar = tar::Builder::new(encoder);

    for record_path in &record_paths {
        let name = record_path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_default();
        debug!("Adding to archive: {:?}", name);
        tar.append_path_with_name(record_path, &name)
            .map_err(archive_error)?;
    }

    let encoder = tar.into_inner().map_err(archive_error)?;
    let tar_gz_bytes = encoder.finish().map_err(archive_error)?;
    debug!("Archive size (compressed): {} bytes", tar_gz_bytes.len());

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent).map_err(archive_error)?;
    }
    fs::write(output_path, &tar_gz_bytes).map_err(archive_error)?;

    let mut hasher = Hasher::new();
    hasher.update(&tar_gz_bytes);
    let checksum = hasher.finalize().to_hex().to_string();
    debug!("Backup checksum: {}", checksum);

    let duration = start_time.elapsed();
    info!(
        "Backup completed: {} entries, {} bytes, {} ms",
        record_paths.len(),
        tar_gz_bytes.len(),
        duration.as_millis()
    );

    Ok(BackupReport {
        total_entries: record_paths.len(),
        archive_size: tar_gz_bytes.len() as u64,
        checksum,
        duration,
    })
}

/// Restores entry records from a backup archive.
///
/// Only regular files named `*.json` at the archive root are extracted;
/// anything else (directories, nested paths, other files) is skipped.
/// Existing records with the same name are overwritten. The caller should
/// reload the store afterwards.
///
/// # Errors
///
/// Returns an error if:
/// - The archive doesn't exist
/// - The entries directory cannot be created
/// - The archive is not a readable tar.gz
pub fn restore_backup(archive_path: &Path, entries_dir: &Path) -> AppResult<RestoreReport> {
    info!("Restoring backup {:?} into {:?}", archive_path, entries_dir);

    if !archive_path.is_file() {
        return Err(BackupError::MissingArchive(archive_path.to_path_buf()).into());
    }
    ensure_entries_directory_exists(entries_dir)?;

    let extract_error = |source| BackupError::Extract {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(extract_error)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    let mut report = RestoreReport::default();

    for member in archive.entries().map_err(extract_error)? {
        let mut member = member.map_err(extract_error)?;
        let member_path = member.path().map_err(extract_error)?.into_owned();

        let Some(name) = bare_record_name(&member_path) else {
            debug!("Skipping archive member {:?}", member_path);
            report.skipped += 1;
            continue;
        };
        if !member.header().entry_type().is_file() {
            debug!("Skipping non-file archive member {:?}", member_path);
            report.skipped += 1;
            continue;
        }

        let destination = entries_dir.join(name);
        member.unpack(&destination).map_err(extract_error)?;

        #[cfg(unix)]
        fs::set_permissions(
            &destination,
            fs::Permissions::from_mode(crate::constants::DEFAULT_FILE_PERMISSIONS),
        )
        .map_err(extract_error)?;

        report.entries_restored += 1;
    }

    info!(
        "Restore completed: {} entries, {} skipped",
        report.entries_restored, report.skipped
    );
    Ok(report)
}

/// Returns the file name when `path` is a single-component record name.
fn bare_record_name(path: &Path) -> Option<PathBuf> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => {
            let name = PathBuf::from(name);
            is_record_path(&name).then_some(name)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use tempfile::TempDir;

    fn write_records(dir: &Path, names: &[&str]) {
        fs::create_dir_all(dir).unwrap();
        for name in names {
            fs::write(dir.join(name), format!("{{\"name\":\"{}\"}}", name)).unwrap();
        }
    }

    #[test]
    fn test_backup_report_creation() {
        let report = BackupReport {
            total_entries: 10,
            archive_size: 1024,
            checksum: String::from("abc123"),
            duration: Duration::from_secs(5),
        };

        assert_eq!(report.total_entries, 10);
        assert_eq!(report.archive_size, 1024);
        assert_eq!(report.checksum, "abc123");
    }

    #[test]
    fn test_bare_record_name() {
        assert_eq!(
            bare_record_name(Path::new("abc.json")),
            Some(PathBuf::from("abc.json"))
        );
        assert_eq!(bare_record_name(Path::new("nested/abc.json")), None);
        assert_eq!(bare_record_name(Path::new("/abc.json")), None);
        assert_eq!(bare_record_name(Path::new("notes.txt")), None);
        assert_eq!(bare_record_name(Path::new(".moodiary-x.json")), None);
    }

    #[test]
    fn test_create_backup_only_includes_records() {
        let temp_dir = TempDir::new().unwrap();
        let entries_dir = temp_dir.path().join("entries");
        write_records(&entries_dir, &["a.json", "b.json", "notes.txt"]);
        let output_path = temp_dir.path().join("out").join("backup.tar.gz");

        let report = create_backup(&entries_dir, &output_path).unwrap();

        assert_eq!(report.total_entries, 2);
        assert_eq!(report.archive_size, fs::metadata(&output_path).unwrap().len());
        assert_eq!(report.checksum.len(), 64);

        let bytes = fs::read(&output_path).unwrap();
        assert!(bytes.starts_with(b"\x1f\x8b"), "archive should be gzip");
        assert_eq!(report.checksum, blake3::hash(&bytes).to_hex().to_string());
    }

    #[test]
    fn test_create_backup_missing_entries_dir() {
        let temp_dir = TempDir::new().unwrap();
        let result = create_backup(
            &temp_dir.path().join("nonexistent"),
            &temp_dir.path().join("backup.tar.gz"),
        );

        assert!(matches!(
            result,
            Err(AppError::Backup(BackupError::MissingStorageRoot(_)))
        ));
    }

    #[test]
    fn test_restore_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let source_dir = temp_dir.path().join("source");
        write_records(&source_dir, &["a.json", "b.json"]);
        let archive = temp_dir.path().join("backup.tar.gz");
        create_backup(&source_dir, &archive).unwrap();

        let target_dir = temp_dir.path().join("target");
        let report = restore_backup(&archive, &target_dir).unwrap();

        assert_eq!(
            report,
            RestoreReport {
                entries_restored: 2,
                skipped: 0
            }
        );
        for name in ["a.json", "b.json"] {
            assert_eq!(
                fs::read(source_dir.join(name)).unwrap(),
                fs::read(target_dir.join(name)).unwrap()
            );
        }
    }

    #[test]
    fn test_restore_skips_foreign_members() {
        let temp_dir = TempDir::new().unwrap();
        let archive_path = temp_dir.path().join("mixed.tar.gz");

        let encoder = GzEncoder::new(File::create(&archive_path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, data) in [
            ("keep.json", &b"{}"[..]),
            ("nested/inner.json", &b"{}"[..]),
            ("readme.txt", &b"hi"[..]),
        ] {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();

        let target_dir = temp_dir.path().join("target");
        let report = restore_backup(&archive_path, &target_dir).unwrap();

        assert_eq!(report.entries_restored, 1);
        assert_eq!(report.skipped, 2);
        assert!(target_dir.join("keep.json").exists());
        assert!(!target_dir.join("nested").exists());
        assert!(!target_dir.join("readme.txt").exists());
    }

    #[test]
    fn test_restore_missing_archive() {
        let temp_dir = TempDir::new().unwrap();
        let result = restore_backup(&temp_dir.path().join("nope.tar.gz"), temp_dir.path());

        assert!(matches!(
            result,
            Err(AppError::Backup(BackupError::MissingArchive(_)))
        ));
    }

    #[test]
    fn test_restore_corrupted_archive_fails() {
        let temp_dir = TempDir::new().unwrap();
        let archive_path = temp_dir.path().join("broken.tar.gz");
        fs::write(&archive_path, b"definitely not gzip").unwrap();

        let result = restore_backup(&archive_path, &temp_dir.path().join("target"));
        assert!(matches!(
            result,
            Err(AppError::Backup(BackupError::Extract { .. }))
        ));
    }
}
