/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 *
 * This software may be used and distributed according to the terms of the
 * GNU General Public License version 2.
 */

use std::io;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::errors::IOContext;

/// Atomically create or replace `path` with `content`.
///
/// The content is written to a temporary file in the same directory,
/// then renamed over the destination. A failure at any point leaves the
/// destination as it was; readers never observe a partial write.
///
/// `fsync` requests `fdatasync` on the temporary file before the rename.
pub fn atomic_write(
    path: impl AsRef<Path>,
    content: impl AsRef<[u8]>,
    fsync: bool,
) -> io::Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(dir) => dir,
        None => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot write '{}': no parent directory", path.display()),
            ));
        }
    };
    let mut temp = NamedTempFile::new_in(dir).path_context("error creating temp file in", dir)?;
    temp.write_all(content.as_ref())
        .path_context("error writing temp file", temp.path())?;
    if fsync {
        temp.as_file()
            .sync_data()
            .path_context("error syncing temp file", temp.path())?;
    }
    temp.persist(path)
        .map_err(|err| err.error)
        .path_context("error replacing file", path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_create_and_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("target");

        atomic_write(&path, b"first", false).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"first");

        atomic_write(&path, b"second", true).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");

        // No temp files left behind.
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["target"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("dir").join("target");

        let err = atomic_write(&path, b"data", false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!path.exists());
    }
}
