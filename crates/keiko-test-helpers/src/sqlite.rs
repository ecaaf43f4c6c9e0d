use crate::TestDb;
use std::borrow::Cow;
use tempfile::TempDir;
use thiserror::Error;

/// File-backed SQLite database in a temp directory, for tests that want a
/// real pool with more than the single connection `sqlite::memory:` gives.
pub struct SqliteDb {
    // Held so the directory outlives every connection to the file
    #[allow(dead_code)]
    temp_dir: TempDir,
    uri: String,
}

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SqliteDb {
    pub fn new() -> Result<Self, SqliteError> {
        let temp_dir = TempDir::with_prefix("keiko-test-db")?;
        let path = temp_dir.path().join("keiko.sqlite");
        let path = path
            .to_str()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidData, "non-utf8 temp path"))?;
        let uri = format!("sqlite://{path}?mode=rwc");

        tracing::debug!(%uri, "created sqlite test database");
        Ok(Self { temp_dir, uri })
    }
}

impl TestDb for SqliteDb {
    fn db_uri(&self) -> Cow<'_, str> {
        self.uri.as_str().into()
    }
}
