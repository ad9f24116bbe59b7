use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Persisted session (written to session.json).
///
/// This is the only identity-bearing state that outlives a process: the CLI
/// needs the logged-in username across invocations. It must be removed on
/// logout so the next identity can never observe it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSession {
    pub username: String,
}

/// Read session.json from the config directory. Missing or malformed files
/// degrade to "not logged in".
pub fn read_session(dir: &Path) -> Option<SavedSession> {
    let path = dir.join("session.json");
    let content = fs::read_to_string(&path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write session.json after a successful login.
pub fn write_session(dir: &Path, session: &SavedSession) -> Result<(), std::io::Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join("session.json");
    let content = serde_json::to_string_pretty(session)?;
    fs::write(&path, content)
}

/// Remove session.json on logout. Missing file is fine — logging out twice
/// is not an error.
pub fn clear_session(dir: &Path) -> Result<(), std::io::Error> {
    let path = dir.join("session.json");
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let session = SavedSession {
            username: "Amy".into(),
        };
        write_session(dir.path(), &session).unwrap();
        let loaded = read_session(dir.path()).unwrap();
        assert_eq!(loaded.username, "Amy");
    }

    #[test]
    fn test_read_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_session(dir.path()).is_none());
    }

    #[test]
    fn test_read_malformed_json_returns_none() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("session.json"), "not json {{{").unwrap();
        assert!(read_session(dir.path()).is_none());
    }

    #[test]
    fn test_clear_removes_identity() {
        let dir = TempDir::new().unwrap();
        let session = SavedSession {
            username: "Amy".into(),
        };
        write_session(dir.path(), &session).unwrap();

        clear_session(dir.path()).unwrap();
        // After logout the next login must find nothing of the prior identity
        assert!(read_session(dir.path()).is_none());

        // Clearing again is a no-op, not an error
        clear_session(dir.path()).unwrap();
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deeper");
        let session = SavedSession {
            username: "Bob".into(),
        };
        write_session(&nested, &session).unwrap();
        assert_eq!(read_session(&nested).unwrap().username, "Bob");
    }
}
