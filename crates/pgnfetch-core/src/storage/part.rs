//! Sequential `.part` writer that is created on the first body chunk.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::temp_path;

/// Streams a download into `<final>.part`, then renames it into place.
///
/// The temp file is not created until the first write, so a transfer that
/// fails before any body arrives leaves nothing on disk.
pub struct PartFile {
    final_path: PathBuf,
    temp_path: PathBuf,
    file: Option<BufWriter<File>>,
    written: u64,
}

impl PartFile {
    pub fn new(final_path: &Path) -> Self {
        Self {
            final_path: final_path.to_path_buf(),
            temp_path: temp_path(final_path),
            file: None,
            written: 0,
        }
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    fn open(&mut self) -> io::Result<&mut BufWriter<File>> {
        if self.file.is_none() {
            let file = File::options()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.temp_path)?;
            self.file = Some(BufWriter::new(file));
        }
        match self.file.as_mut() {
            Some(f) => Ok(f),
            None => Err(io::Error::new(io::ErrorKind::Other, "part file not open")),
        }
    }

    /// Flushes, syncs and renames the temp file to the final path.
    /// Returns the size of the final file on disk. On error the temp file is removed.
    pub fn finalize(mut self) -> io::Result<u64> {
        let result = self.commit();
        if result.is_err() {
            self.file = None;
            remove_if_present(&self.temp_path);
        }
        result
    }

    fn commit(&mut self) -> io::Result<u64> {
        // Empty bodies still produce a (zero-length) file.
        let writer = self.open()?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        self.file = None;

        std::fs::rename(&self.temp_path, &self.final_path)?;
        Ok(std::fs::metadata(&self.final_path)?.len())
    }

    /// Drops the handle and removes the temp file, if one was created.
    pub fn discard(mut self) {
        if self.file.take().is_some() {
            remove_if_present(&self.temp_path);
        }
    }
}

fn remove_if_present(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("could not remove {}: {}", path.display(), e),
    }
}

impl Write for PartFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.open()?.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_on_disk_until_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("a.zip");
        let part = PartFile::new(&final_path);
        assert!(!part.temp_path().exists());
        part.discard();
        assert!(!final_path.exists());
    }

    #[test]
    fn write_then_finalize_renames() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("a.zip");
        let mut part = PartFile::new(&final_path);
        part.write_all(b"hello ").unwrap();
        part.write_all(b"world").unwrap();
        assert!(part.temp_path().exists());
        assert_eq!(part.written(), 11);
        let tp = part.temp_path().to_path_buf();

        let size = part.finalize().unwrap();
        assert_eq!(size, 11);
        assert!(!tp.exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"hello world");
    }

    #[test]
    fn discard_removes_partial_body() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("b.pgn");
        let mut part = PartFile::new(&final_path);
        part.write_all(b"partial").unwrap();
        let tp = part.temp_path().to_path_buf();
        part.discard();
        assert!(!tp.exists());
        assert!(!final_path.exists());
    }

    #[test]
    fn failed_rename_removes_part_file() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("c.zip");
        // A non-empty directory at the target makes the rename fail.
        std::fs::create_dir(&final_path).unwrap();
        std::fs::write(final_path.join("keep"), b"x").unwrap();

        let mut part = PartFile::new(&final_path);
        part.write_all(b"body").unwrap();
        let tp = part.temp_path().to_path_buf();
        assert!(part.finalize().is_err());
        assert!(!tp.exists());
        assert!(final_path.is_dir());
    }

    #[test]
    fn empty_body_finalizes_to_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("empty.zip");
        let size = PartFile::new(&final_path).finalize().unwrap();
        assert_eq!(size, 0);
        assert!(final_path.exists());
    }
}
