use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads inputs as given (relative to the working directory) and writes
/// outputs under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn output_location(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        Ok(fs::read(Path::new(path))?)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.output_location(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested/out"));

        storage.write_file("clients_rip.csv", b"name\n").unwrap();

        let written = storage.output_location("clients_rip.csv");
        assert_eq!(fs::read(&written).unwrap(), b"name\n");
        assert_eq!(
            storage.read_file(written.to_str().unwrap()).unwrap(),
            b"name\n"
        );
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let storage = LocalStorage::new(".");
        assert!(matches!(
            storage.read_file("/definitely/not/here.csv"),
            Err(crate::utils::error::CcpError::IoError(_))
        ));
    }
}
