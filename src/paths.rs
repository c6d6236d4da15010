use crate::constants::{FALLBACK_LOG_FILE, LOG_DIR_NAME};
use directories::BaseDirs;
use std::fs;
use std::path::{Path, PathBuf};
use sysinfo::System;

/// Cloud-synced Documents folders tried before the local data directory.
const CLOUD_DOCUMENT_DIRS: &[&str] = &["OneDrive/Documents", "OneDrive - Personal/Documents"];

/// Prefix of organisation-named sync folders, e.g. `OneDrive - Contoso`.
const CLOUD_ORG_PREFIX: &str = "OneDrive - ";

/// Resolve the log file for this machine using the current user's directories.
pub fn default_log_path() -> PathBuf {
    let host = System::host_name().unwrap_or_else(|| "unknown-host".to_string());
    let base_dirs = BaseDirs::new();
    resolve_log_path(
        base_dirs.as_ref().map(BaseDirs::home_dir),
        base_dirs.as_ref().map(BaseDirs::data_local_dir),
        &host,
    )
}

/// Pick the log location: a synced Documents folder, then the local data
/// directory, then a relative file in the working directory.
pub fn resolve_log_path(home: Option<&Path>, local_data: Option<&Path>, host: &str) -> PathBuf {
    let file_name = format!("{host}_ActivityLog.csv");

    if let Some(documents) = home.and_then(cloud_documents_dir) {
        return documents.join(LOG_DIR_NAME).join(file_name);
    }

    if let Some(local_data) = local_data {
        return local_data.join(LOG_DIR_NAME).join(file_name);
    }

    PathBuf::from(FALLBACK_LOG_FILE)
}

fn cloud_documents_dir(home: &Path) -> Option<PathBuf> {
    let known = CLOUD_DOCUMENT_DIRS
        .iter()
        .map(|dir| home.join(dir))
        .find(|dir| dir.is_dir());
    if known.is_some() {
        return known;
    }

    let mut org_dirs: Vec<PathBuf> = fs::read_dir(home)
        .ok()?
        .filter_map(Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(CLOUD_ORG_PREFIX))
        })
        .map(|entry| entry.path().join("Documents"))
        .filter(|dir| dir.is_dir())
        .collect();
    org_dirs.sort();
    org_dirs.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prefers_onedrive_documents() {
        let home = tempdir().unwrap();
        let local = tempdir().unwrap();
        fs::create_dir_all(home.path().join("OneDrive").join("Documents")).unwrap();

        let path = resolve_log_path(Some(home.path()), Some(local.path()), "PC1");
        assert_eq!(
            path,
            home.path()
                .join("OneDrive")
                .join("Documents")
                .join("ActivityLogger")
                .join("PC1_ActivityLog.csv")
        );
    }

    #[test]
    fn test_finds_organisation_onedrive() {
        let home = tempdir().unwrap();
        fs::create_dir_all(home.path().join("OneDrive - Contoso").join("Documents")).unwrap();

        let path = resolve_log_path(Some(home.path()), None, "PC1");
        assert_eq!(
            path,
            home.path()
                .join("OneDrive - Contoso")
                .join("Documents")
                .join("ActivityLogger")
                .join("PC1_ActivityLog.csv")
        );
    }

    #[test]
    fn test_falls_back_to_local_data() {
        let home = tempdir().unwrap();
        let local = tempdir().unwrap();

        let path = resolve_log_path(Some(home.path()), Some(local.path()), "PC1");
        assert_eq!(path, local.path().join("ActivityLogger").join("PC1_ActivityLog.csv"));
    }

    #[test]
    fn test_falls_back_to_relative_file() {
        assert_eq!(resolve_log_path(None, None, "PC1"), PathBuf::from("ActivityLog.csv"));
    }
}
