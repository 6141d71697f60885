use crate::buffer::Buffer;
use crate::error::ReindentError;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid buffer contents: {0}")]
    Buffer(#[from] ReindentError),
}

/// Read a source file into a buffer
pub fn read_file(path: &Path) -> Result<Buffer, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    Ok(Buffer::from_bytes(&bytes)?)
}

/// Write a buffer back to disk, creating parent directories as needed
pub fn write_file(path: &Path, buffer: &Buffer) -> Result<(), IoError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, buffer.to_bytes())?;
    Ok(())
}
