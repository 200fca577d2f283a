// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use miette::{Context, IntoDiagnostic};
use tracing_appender::rolling::RollingFileAppender;

use crate::DEFAULT_LOG_FILE_NAME;

/// Split `path` into the folder to log into and the file name. A path that ends in a
/// separator, or names an existing folder, logs to [`DEFAULT_LOG_FILE_NAME`] inside it.
fn split_log_path(path: &Path) -> miette::Result<(PathBuf, PathBuf)> {
    let names_folder = path.is_dir() || path.as_os_str().to_string_lossy().ends_with('/');
    if names_folder {
        return Ok((path.to_path_buf(), PathBuf::from(DEFAULT_LOG_FILE_NAME)));
    }

    let file_name = path
        .file_name()
        .ok_or_else(|| miette::miette!("Log path {} has no file name", path.display()))?;
    let folder = match path.parent() {
        Some(it) if !it.as_os_str().is_empty() => it.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((folder, PathBuf::from(file_name)))
}

/// Non rotating file appender for navigator logs. Missing folders are created.
///
/// # Errors
///
/// Returns an error if the path has no usable file name, or its folder can't be
/// created.
pub fn try_create_file_appender(path: impl AsRef<Path>) -> miette::Result<RollingFileAppender> {
    let (folder, file_name) = split_log_path(path.as_ref())?;
    std::fs::create_dir_all(&folder)
        .into_diagnostic()
        .wrap_err_with(|| format!("Could not create log folder {}", folder.display()))?;
    Ok(tracing_appender::rolling::never(folder, file_name))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_file_path() {
        let (folder, file) = split_log_path(Path::new("/tmp/nav/debug.log")).unwrap();
        assert_eq!(folder, PathBuf::from("/tmp/nav"));
        assert_eq!(file, PathBuf::from("debug.log"));
    }

    #[test]
    fn test_bare_file_name_logs_to_current_folder() {
        let (folder, file) = split_log_path(Path::new("debug.log")).unwrap();
        assert_eq!(folder, PathBuf::from("."));
        assert_eq!(file, PathBuf::from("debug.log"));
    }

    #[test]
    fn test_folder_gets_default_file_name() {
        let (folder, file) = split_log_path(Path::new("/tmp/nav-logs/")).unwrap();
        assert_eq!(folder, PathBuf::from("/tmp/nav-logs/"));
        assert_eq!(file, PathBuf::from(DEFAULT_LOG_FILE_NAME));
    }

    #[test]
    fn test_missing_folder_is_created() {
        let folder = std::env::temp_dir().join(format!("r3bl_nav_{}", uuid::Uuid::new_v4()));
        let _appender = try_create_file_appender(folder.join("nested/navigator.log")).unwrap();
        assert!(folder.join("nested").is_dir());
    }
}
