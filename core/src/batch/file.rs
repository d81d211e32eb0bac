//! Batch Files

use super::BatchItem;
use crate::ray::*;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Write compressed records to a new batch file. A partially written file is
/// deleted before the error is returned.
///
/// * `path`    - Output file path.
/// * `records` - The records.
pub fn write_batch(path: &Path, records: &[CompressedRay]) -> Result<(), String> {
    write_batch_with(path, records, BufWriter::new)
}

/// Write records through the writer `wrap` builds around the created file.
///
/// * `path`    - Output file path.
/// * `records` - The records.
/// * `wrap`    - Builds the writer.
fn write_batch_with<W, F>(path: &Path, records: &[CompressedRay], wrap: F) -> Result<(), String>
where
    W: Write,
    F: FnOnce(File) -> W,
{
    let file = File::create(path).map_err(|e| format!("write_batch(): error creating '{}': {e}", path.display()))?;

    let mut w = wrap(file);
    let written = records
        .iter()
        .try_for_each(|record| record.write(&mut w))
        .and_then(|_| w.flush());
    drop(w);

    written.map_err(|e| {
        if let Err(re) = fs::remove_file(path) {
            error!("write_batch(): error deleting partial '{}': {re}", path.display());
        }
        format!("write_batch(): error writing '{}': {e}", path.display())
    })
}

/// Read a batch file into `buffer`, replacing its contents. The file must hold
/// exactly `count` records.
///
/// * `item`   - The batch descriptor.
/// * `buffer` - Reusable byte buffer.
pub fn load_batch(item: &BatchItem, buffer: &mut Vec<u8>) -> Result<(), String> {
    buffer.clear();

    let mut file =
        File::open(&item.path).map_err(|e| format!("load_batch(): error opening '{}': {e}", item.path.display()))?;
    file.read_to_end(buffer)
        .map_err(|e| format!("load_batch(): error reading '{}': {e}", item.path.display()))?;

    let expected = item.count * CompressedRay::SIZE;
    if buffer.len() != expected {
        return Err(format!(
            "load_batch(): '{}' holds {} bytes, expected {expected} for {} rays",
            item.path.display(),
            buffer.len(),
            item.count
        ));
    }

    Ok(())
}

/// Delete a consumed batch file.
///
/// * `path` - The batch file.
pub fn remove_batch(path: &Path) -> Result<(), String> {
    fs::remove_file(path).map_err(|e| format!("remove_batch(): error deleting '{}': {e}", path.display()))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::*;

    #[test]
    fn load_rejects_truncated_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.rays");
        let ray = Ray::camera(Point3f::zero(), Vector3f::new(0.0, 0.0, 1.0), 0, 0, 0);
        write_batch(&path, &[encode(&ray)]).unwrap();

        let item = BatchItem {
            path: path.clone(),
            count: 2,
            class: DirectionClass::PosZ,
        };
        let mut buffer = vec![];
        assert!(load_batch(&item, &mut buffer).is_err());

        let item = BatchItem { count: 1, ..item };
        load_batch(&item, &mut buffer).unwrap();
        assert_eq!(decode(&CompressedRay::read(&buffer)), ray);

        remove_batch(&path).unwrap();
        assert!(!path.exists());
        assert!(remove_batch(&path).is_err());
    }

    /// Accepts `limit` bytes, then fails every write.
    struct FailAfter {
        inner: File,
        limit: usize,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.limit == 0 {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"));
            }
            let n = buf.len().min(self.limit);
            self.limit -= n;
            self.inner.write(&buf[..n])
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.inner.flush()
        }
    }

    #[test]
    fn failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.rays");
        let ray = Ray::camera(Point3f::zero(), Vector3f::new(1.0, 0.0, 0.0), 1, 2, 3);
        let records = vec![encode(&ray); 4];

        let result = write_batch_with(&path, &records, |inner| FailAfter {
            inner,
            limit: CompressedRay::SIZE + 7,
        });
        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        write_batch(&path, &records).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len() as usize, 4 * CompressedRay::SIZE);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let item = BatchItem {
            path: dir.path().join("missing.rays"),
            count: 1,
            class: DirectionClass::PosX,
        };
        let mut buffer = vec![];
        assert!(load_batch(&item, &mut buffer).is_err());
    }
}
