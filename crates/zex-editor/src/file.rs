//! Loading and saving documents.
//!
//! Files are read as raw bytes and split on `\n`; a trailing `\r` on each
//! row is dropped. Saving writes every row followed by `\n`, so a file that
//! came in with CRLF endings goes back out with LF.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::document::Document;
use crate::error::{FileError, FileResult};

/// Read `path` into a clean document.
///
/// A file that does not exist yields an empty document, so `zex newfile`
/// starts a new file under that name.
///
/// # Errors
///
/// Returns [`FileError::Read`] for any failure other than the file being
/// missing.
pub fn load(path: &Path) -> FileResult<Document> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "new file");
            return Ok(Document::new());
        }
        Err(source) => {
            return Err(FileError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let doc = parse(&bytes);
    info!(path = %path.display(), bytes = bytes.len(), lines = doc.line_count(), "loaded");
    Ok(doc)
}

/// Split raw file bytes into a document.
#[must_use]
pub fn parse(bytes: &[u8]) -> Document {
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    if bytes.is_empty() {
        return Document::new();
    }
    Document::from_lines(
        body.split(|&b| b == b'\n')
            .map(|row| row.strip_suffix(b"\r").unwrap_or(row)),
    )
}

/// Write `doc` to `path` atomically. Returns the number of bytes written.
///
/// The bytes go to a hidden sibling file first, which is synced and then
/// renamed over `path`. If anything fails before the rename, `path` keeps
/// its old content. An existing file's permissions carry over.
///
/// The document's dirty counter is left alone; the caller resets it once
/// it knows the save went through.
///
/// # Errors
///
/// Returns [`FileError::Write`] if the temp file cannot be written or the
/// rename fails.
pub fn save(path: &Path, doc: &Document) -> FileResult<usize> {
    let bytes = doc.to_bytes();
    let temp = temp_path_for(path);
    let write = || -> io::Result<()> {
        let mut file = File::create(&temp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        if let Ok(meta) = fs::metadata(path) {
            file.set_permissions(meta.permissions())?;
        }
        drop(file);
        fs::rename(&temp, path)
    };
    if let Err(source) = write() {
        let _ = fs::remove_file(&temp);
        return Err(FileError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    info!(path = %path.display(), bytes = bytes.len(), "saved");
    Ok(bytes.len())
}

/// `dir/.name.zex-save` next to `dir/name`.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "untitled".into(), |n| n.to_string_lossy());
    path.with_file_name(format!(".{name}.zex-save"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows(doc: &Document) -> Vec<Vec<u8>> {
        doc.lines().map(crate::line::Line::content).collect()
    }

    // -- Parsing ------------------------------------------------------------

    #[test]
    fn parse_splits_rows() {
        let doc = parse(b"hello\nworld\n");
        assert_eq!(rows(&doc), vec![b"hello".to_vec(), b"world".to_vec()]);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn parse_without_trailing_newline() {
        let doc = parse(b"one\ntwo");
        assert_eq!(rows(&doc), vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn parse_strips_carriage_returns() {
        let doc = parse(b"a\r\nb\r\n");
        assert_eq!(rows(&doc), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn parse_keeps_blank_rows() {
        let doc = parse(b"a\n\n\nb\n");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(rows(&doc)[1], b"");
    }

    #[test]
    fn parse_empty_is_one_empty_row() {
        let doc = parse(b"");
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.row_len(0), 0);
        let doc = parse(b"\n");
        assert_eq!(doc.line_count(), 1);
    }

    // -- File I/O -----------------------------------------------------------

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.txt");

        let doc = Document::from_lines(["hello", "\tworld"]);
        let written = save(&path, &doc).unwrap();
        assert_eq!(written, 13);
        assert_eq!(fs::read(&path).unwrap(), b"hello\n\tworld\n");

        let loaded = load(&path).unwrap();
        assert_eq!(rows(&loaded), rows(&doc));
        assert!(!loaded.is_dirty());
    }

    #[test]
    fn save_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.txt");
        fs::write(&path, "a much longer previous body\n").unwrap();

        save(&path, &Document::from_lines(["x"])).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"x\n");
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.txt");
        save(&path, &Document::from_lines(["x"])).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("clean.txt")]);
    }

    #[test]
    fn failed_save_keeps_original_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("precious.txt");
        fs::write(&path, "keep me\n").unwrap();
        // A directory squatting on the temp name makes the write fail.
        fs::create_dir(temp_path_for(&path)).unwrap();

        let err = save(&path, &Document::from_lines(["clobbered"])).unwrap_err();
        assert!(matches!(err, FileError::Write { .. }));
        assert_eq!(err.path(), path.as_path());
        assert_eq!(fs::read(&path).unwrap(), b"keep me\n");
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.sh");
        fs::write(&path, "echo hi\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

        save(&path, &Document::from_lines(["echo bye"])).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn temp_path_is_hidden_sibling() {
        assert_eq!(
            temp_path_for(Path::new("/tmp/notes.txt")),
            PathBuf::from("/tmp/.notes.txt.zex-save")
        );
        assert_eq!(
            temp_path_for(Path::new("notes.txt")),
            PathBuf::from(".notes.txt.zex-save")
        );
    }

    #[test]
    fn load_missing_file_is_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load(&dir.path().join("nope.txt")).unwrap();
        assert_eq!(doc.line_count(), 1);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn load_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path()).unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no/such/dir/file.txt");
        let err = save(&path, &Document::new()).unwrap_err();
        assert!(matches!(err, FileError::Write { .. }));
    }
}
