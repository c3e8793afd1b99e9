use crate::error::{ChunkError, Result};

/// Checks that an input path exists and is a regular file.
///
/// # Errors
/// * `Configuration` if the path is missing or is not a file.
pub fn check_path<P: AsRef<std::path::Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ChunkError::Configuration(format!(
            "input path does not exist: {}",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(ChunkError::Configuration(format!(
            "input path is not a file: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Creates the parent directory of `path` if it does not exist yet.
///
/// # Errors
/// * `Io` if the directory cannot be created.
pub fn ensure_parent_dir_exist<P: AsRef<std::path::Path>>(path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| ChunkError::io(parent, e))?;
            log::debug!("Created output directory {}", parent.display());
        }
    }
    Ok(())
}
