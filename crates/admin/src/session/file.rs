//! File-backed credential store.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{CredentialStore, SessionCredential, SessionError, non_empty};

/// Stores the credential as the sole content of a file.
///
/// A store without a path behaves as unavailable storage: reads report no
/// credential and writes fail with [`SessionError::Unavailable`].
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: Option<PathBuf>,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store with no backing file.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { path: None }
    }

    #[must_use]
    pub fn from_optional(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl CredentialStore for FileCredentialStore {
    fn set_credential(&self, credential: &SessionCredential) -> Result<(), SessionError> {
        let path = self.path.as_ref().ok_or(SessionError::Unavailable)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = open_private(path)?;
        // The open mode only applies on creation.
        restrict_permissions(path)?;
        file.write_all(credential.expose().as_bytes())?;
        debug!(path = %path.display(), "Session credential stored");
        Ok(())
    }

    fn get_credential(&self) -> Option<SessionCredential> {
        let path = self.path.as_ref()?;
        match fs::read_to_string(path) {
            Ok(contents) => non_empty(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Session file unreadable, treating as logged out");
                None
            }
        }
    }

    fn clear_credential(&self) {
        let Some(path) = self.path.as_ref() else {
            return;
        };
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Session credential cleared"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove session file"),
        }
    }
}

fn open_private(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear_round() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("session"));

        assert!(!store.is_authenticated());
        store.set_credential(&SessionCredential::new("token-1")).unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.get_credential().unwrap().expose(), "token-1");

        store.set_credential(&SessionCredential::new("token-2")).unwrap();
        assert_eq!(store.get_credential().unwrap().expose(), "token-2");

        store.clear_credential();
        assert!(!store.is_authenticated());
        store.clear_credential();
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_unavailable_storage_reads_as_absent() {
        let store = FileCredentialStore::unavailable();
        assert!(store.get_credential().is_none());
        assert!(!store.is_authenticated());
        assert!(matches!(
            store.set_credential(&SessionCredential::new("t")),
            Err(SessionError::Unavailable)
        ));
        store.clear_credential();
    }

    #[test]
    fn test_unreadable_path_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as a string.
        let store = FileCredentialStore::new(dir.path());
        assert!(store.get_credential().is_none());
    }

    #[test]
    fn test_empty_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        fs::write(&path, "\n").unwrap();
        let store = FileCredentialStore::new(&path);
        assert!(!store.is_authenticated());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        let store = FileCredentialStore::new(&path);
        store.set_credential(&SessionCredential::new("t")).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_readable_file_is_narrowed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        fs::write(&path, "old-token").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileCredentialStore::new(&path);
        store.set_credential(&SessionCredential::new("new")).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        // Truncated, not appended.
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
