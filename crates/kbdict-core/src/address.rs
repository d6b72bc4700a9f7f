use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A region of storage holding one dictionary's bytes.
///
/// Physical addresses cover a whole standalone file and may be deleted.
/// Package regions point inside the application package and never are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFileAddress {
    path: PathBuf,
    offset: u64,
    length: u64,
    physical: bool,
}

impl AssetFileAddress {
    /// Address of an entire file, or `None` if it is missing, not a regular file, or empty
    pub fn from_file(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let meta = fs::metadata(&path).ok()?;
        if !meta.is_file() || meta.len() == 0 {
            return None;
        }

        Some(Self {
            path,
            offset: 0,
            length: meta.len(),
            physical: true,
        })
    }

    /// Address of a region inside a package file; the region must lie within the file
    pub fn from_region(path: impl Into<PathBuf>, offset: u64, length: u64) -> Option<Self> {
        let path = path.into();
        let meta = fs::metadata(&path).ok()?;
        let end = offset.checked_add(length)?;
        if !meta.is_file() || length == 0 || end > meta.len() {
            return None;
        }

        Some(Self {
            path,
            offset,
            length,
            physical: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn points_to_physical_file(&self) -> bool {
        self.physical
    }

    pub fn delete_underlying_file(&self) -> io::Result<()> {
        fs::remove_file(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_file_is_physical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.dict");
        fs::write(&path, b"0123456789").unwrap();

        let addr = AssetFileAddress::from_file(&path).unwrap();
        assert!(addr.points_to_physical_file());
        assert_eq!(addr.offset(), 0);
        assert_eq!(addr.length(), 10);
    }

    #[test]
    fn missing_or_empty_file_has_no_address() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AssetFileAddress::from_file(dir.path().join("nope.dict")).is_none());
        assert!(AssetFileAddress::from_file(dir.path()).is_none());

        let empty = dir.path().join("empty.dict");
        fs::write(&empty, b"").unwrap();
        assert!(AssetFileAddress::from_file(&empty).is_none());
    }

    #[test]
    fn region_must_fit_inside_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.pkg");
        fs::write(&path, [0u8; 64]).unwrap();

        let addr = AssetFileAddress::from_region(&path, 16, 48).unwrap();
        assert!(!addr.points_to_physical_file());
        assert!(AssetFileAddress::from_region(&path, 16, 49).is_none());
        assert!(AssetFileAddress::from_region(&path, 0, 0).is_none());
        assert!(AssetFileAddress::from_region(&path, u64::MAX, 2).is_none());
    }

    #[test]
    fn delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.dict");
        fs::write(&path, b"x").unwrap();

        let addr = AssetFileAddress::from_file(&path).unwrap();
        addr.delete_underlying_file().unwrap();
        assert!(!path.exists());
    }
}
