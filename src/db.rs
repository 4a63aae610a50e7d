use camino::Utf8Path;
use rusqlite::Connection;

use crate::error::OsmprjError;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Utf8Path) -> Result<Self, OsmprjError> {
        let conn = Connection::open(path.as_std_path())
            .map_err(|err| OsmprjError::Database(err.to_string()))?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, OsmprjError> {
        let conn = Connection::open_in_memory()
            .map_err(|err| OsmprjError::Database(err.to_string()))?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
