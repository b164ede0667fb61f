use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use tar::Archive;
use xz2::read::XzDecoder;

/// Magic bytes at the start of every xz stream.
const XZ_MAGIC: [u8; 6] = [0xfd, b'7', b'z', b'X', b'Z', 0x00];

/// Result of materializing an archive onto disk.
///
/// `FatalOpenFailure` means the archive could not be opened or decoded at
/// all and nothing was written; `PartialFailure` means extraction started
/// and was aborted, leaving a partially written tree behind.
#[derive(Debug)]
pub enum ExtractionOutcome {
    /// Every entry was processed. `skipped` counts entries that failed with
    /// a recoverable error or were neutralized for escaping the
    /// destination; they are logged, not written.
    Success { written: usize, skipped: usize },
    /// A non-recoverable per-entry failure aborted the run mid-archive.
    PartialFailure { written: usize, reason: String },
    /// The archive could not be opened; the destination is untouched.
    FatalOpenFailure { reason: String },
}

/// Severity of a per-entry failure, ordered from benign to aborting.
///
/// The extraction policy is: abort when severity >= `Fatal`, otherwise log
/// and continue with the next entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntrySeverity {
    Ok,
    Recoverable,
    Fatal,
}

/// Map an I/O failure to a severity. Structural corruption (truncated or
/// malformed stream data) aborts; environmental failures around a single
/// entry (permissions, unsupported names) do not.
fn classify(err: &io::Error) -> EntrySeverity {
    match err.kind() {
        io::ErrorKind::InvalidData
        | io::ErrorKind::UnexpectedEof
        | io::ErrorKind::WriteZero
        | io::ErrorKind::Other => EntrySeverity::Fatal,
        _ => EntrySeverity::Recoverable,
    }
}

/// Extract a xz-compressed tar archive into `destination`.
///
/// Entries are processed strictly in archive order. Metadata (permissions,
/// modification times, extended attributes) is preserved, existing files
/// are overwritten, and entries whose paths would escape the destination
/// are skipped rather than written. The archive is validated before any
/// entry is touched, so an unreadable archive leaves the destination
/// unchanged.
pub fn extract(archive_path: &Path, destination: &Path) -> ExtractionOutcome {
    let mut file = match File::open(archive_path) {
        Ok(f) => f,
        Err(e) => {
            return ExtractionOutcome::FatalOpenFailure {
                reason: format!("{}: {e}", archive_path.display()),
            }
        }
    };

    // Check the stream signature up front: a missing or foreign file must
    // fail before anything lands in the destination.
    let mut magic = [0u8; 6];
    if let Err(e) = file.read_exact(&mut magic) {
        return ExtractionOutcome::FatalOpenFailure {
            reason: format!("{}: {e}", archive_path.display()),
        };
    }
    if magic != XZ_MAGIC {
        return ExtractionOutcome::FatalOpenFailure {
            reason: format!("{}: not an xz stream", archive_path.display()),
        };
    }
    if let Err(e) = file.seek(SeekFrom::Start(0)) {
        return ExtractionOutcome::FatalOpenFailure {
            reason: format!("{}: {e}", archive_path.display()),
        };
    }

    let mut archive = Archive::new(XzDecoder::new(io::BufReader::new(file)));
    archive.set_preserve_permissions(true);
    archive.set_preserve_mtime(true);
    archive.set_unpack_xattrs(true);

    let entries = match archive.entries() {
        Ok(entries) => entries,
        Err(e) => {
            return ExtractionOutcome::FatalOpenFailure {
                reason: format!("{}: {e}", archive_path.display()),
            }
        }
    };

    let mut written = 0usize;
    let mut skipped = 0usize;

    for entry in entries {
        // Header read. Running off the end of the entry iterator is the
        // normal termination; a failed header read goes through the
        // severity policy.
        let mut entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                if classify(&e) >= EntrySeverity::Fatal {
                    return ExtractionOutcome::PartialFailure {
                        written,
                        reason: format!("reading entry header: {e}"),
                    };
                }
                log::warn!("skipping unreadable archive entry: {e}");
                skipped += 1;
                continue;
            }
        };

        let entry_name = match entry.path() {
            Ok(path) => path.display().to_string(),
            Err(_) => String::from("<unreadable path>"),
        };
        log::debug!("writing file: {entry_name}");

        // unpack_in writes metadata and data and finalizes the entry; it
        // refuses entries that would resolve outside the destination.
        match entry.unpack_in(destination) {
            Ok(true) => written += 1,
            Ok(false) => {
                log::warn!("skipping entry outside destination: {entry_name}");
                skipped += 1;
            }
            Err(e) => {
                if classify(&e) >= EntrySeverity::Fatal {
                    return ExtractionOutcome::PartialFailure {
                        written,
                        reason: format!("writing {entry_name}: {e}"),
                    };
                }
                log::warn!("skipping entry {entry_name}: {e}");
                skipped += 1;
            }
        }
    }

    ExtractionOutcome::Success { written, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::PathBuf;

    use xz2::write::XzEncoder;

    /// Build a `project.tar.xz`-style archive holding the given
    /// path/content pairs.
    fn make_archive(dir: &Path, entries: &[(&str, &str)]) -> PathBuf {
        let archive_path = dir.join("project.tar.xz");
        let file = File::create(&archive_path).unwrap();
        let encoder = XzEncoder::new(file, 6);
        let mut builder = tar::Builder::new(encoder);

        for (path, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, content.as_bytes())
                .unwrap();
        }

        let encoder = builder.into_inner().unwrap();
        encoder.finish().unwrap();
        archive_path
    }

    #[test]
    fn round_trip_extracts_exact_contents() {
        let dir = tempfile::tempdir().unwrap();
        let archive = make_archive(dir.path(), &[("a.txt", "hello"), ("dir/b.txt", "world")]);
        let dest = tempfile::tempdir().unwrap();

        let outcome = extract(&archive, dest.path());
        match outcome {
            ExtractionOutcome::Success { written, skipped } => {
                assert_eq!(written, 2);
                assert_eq!(skipped, 0);
            }
            other => panic!("expected success, got {other:?}"),
        }

        assert_eq!(
            fs::read_to_string(dest.path().join("a.txt")).unwrap(),
            "hello"
        );
        assert_eq!(
            fs::read_to_string(dest.path().join("dir/b.txt")).unwrap(),
            "world"
        );
    }

    #[test]
    fn re_extraction_overwrites_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let archive = make_archive(dir.path(), &[("a.txt", "from-archive")]);
        let dest = tempfile::tempdir().unwrap();

        assert!(matches!(
            extract(&archive, dest.path()),
            ExtractionOutcome::Success { .. }
        ));

        // Scribble over the extracted file, then extract again without
        // cleaning the destination.
        fs::write(dest.path().join("a.txt"), "local edits").unwrap();
        assert!(matches!(
            extract(&archive, dest.path()),
            ExtractionOutcome::Success { .. }
        ));

        assert_eq!(
            fs::read_to_string(dest.path().join("a.txt")).unwrap(),
            "from-archive"
        );
    }

    #[test]
    fn missing_archive_is_a_fatal_open_failure() {
        let dest = tempfile::tempdir().unwrap();
        let outcome = extract(Path::new("/nonexistent/project.tar.xz"), dest.path());
        assert!(matches!(outcome, ExtractionOutcome::FatalOpenFailure { .. }));
        assert!(fs::read_dir(dest.path()).unwrap().next().is_none());
    }

    #[test]
    fn non_archive_file_is_a_fatal_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let not_archive = dir.path().join("project.tar.xz");
        fs::write(&not_archive, "definitely not an xz stream").unwrap();
        let dest = tempfile::tempdir().unwrap();

        let outcome = extract(&not_archive, dest.path());
        assert!(matches!(outcome, ExtractionOutcome::FatalOpenFailure { .. }));
        // Nothing may be written on a failed open.
        assert!(fs::read_dir(dest.path()).unwrap().next().is_none());
    }

    #[test]
    fn corrupt_tar_stream_is_a_partial_failure() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("project.tar.xz");

        // Valid xz stream wrapping garbage that is not a tar container.
        let file = File::create(&archive_path).unwrap();
        let mut encoder = XzEncoder::new(file, 6);
        io::Write::write_all(&mut encoder, &[0xffu8; 1024]).unwrap();
        encoder.finish().unwrap();

        let dest = tempfile::tempdir().unwrap();
        match extract(&archive_path, dest.path()) {
            ExtractionOutcome::PartialFailure { written, .. } => assert_eq!(written, 0),
            other => panic!("expected partial failure, got {other:?}"),
        }
    }

    #[test]
    fn traversal_entries_are_neutralized() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("project.tar.xz");

        // Builder::append_data refuses `..` components, so a hostile entry
        // has to be forged through the raw header bytes.
        let file = File::create(&archive_path).unwrap();
        let encoder = XzEncoder::new(file, 6);
        let mut builder = tar::Builder::new(encoder);

        let mut header = tar::Header::new_gnu();
        header.set_size(4);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, "ok.txt", &b"fine"[..]).unwrap();

        let mut header = tar::Header::new_gnu();
        {
            let name = b"../escape.txt";
            header.as_gnu_mut().unwrap().name[..name.len()].copy_from_slice(name);
        }
        header.set_size(7);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, &b"blocked"[..]).unwrap();

        builder.into_inner().unwrap().finish().unwrap();
        let archive = archive_path;

        let outer = tempfile::tempdir().unwrap();
        let dest = outer.path().join("dest");
        fs::create_dir_all(&dest).unwrap();

        let outcome = extract(&archive, &dest);
        match outcome {
            ExtractionOutcome::Success { written, skipped } => {
                assert_eq!(written, 1);
                assert_eq!(skipped, 1);
            }
            other => panic!("expected success with a skip, got {other:?}"),
        }

        assert!(dest.join("ok.txt").exists());
        assert!(!outer.path().join("escape.txt").exists());
    }

    #[test]
    fn preserves_file_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let archive_path = dir.path().join("project.tar.xz");

        let file = File::create(&archive_path).unwrap();
        let encoder = XzEncoder::new(file, 6);
        let mut builder = tar::Builder::new(encoder);
        let mut header = tar::Header::new_gnu();
        header.set_size(3);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, "run.sh", &b"ok\n"[..]).unwrap();
        builder.into_inner().unwrap().finish().unwrap();

        let dest = tempfile::tempdir().unwrap();
        assert!(matches!(
            extract(&archive_path, dest.path()),
            ExtractionOutcome::Success { .. }
        ));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(dest.path().join("run.sh"))
                .unwrap()
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }

    #[test]
    fn severity_ordering_drives_the_abort_rule() {
        assert!(EntrySeverity::Ok < EntrySeverity::Recoverable);
        assert!(EntrySeverity::Recoverable < EntrySeverity::Fatal);

        let structural = io::Error::new(io::ErrorKind::InvalidData, "corrupt header");
        assert_eq!(classify(&structural), EntrySeverity::Fatal);

        let environmental = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(classify(&environmental), EntrySeverity::Recoverable);
    }
}
