use contracts::Location;

use crate::persistence::{PersistenceError, SqliteLogStore};

/// Last location the user picked, shared by every tool that asks for one.
pub trait UserLocationProvider {
    fn get(&self) -> Result<Option<Location>, PersistenceError>;
    fn set(&mut self, location: Location) -> Result<(), PersistenceError>;
}

impl UserLocationProvider for SqliteLogStore {
    fn get(&self) -> Result<Option<Location>, PersistenceError> {
        self.load_location()
    }

    fn set(&mut self, location: Location) -> Result<(), PersistenceError> {
        self.store_location(&location)
    }
}
