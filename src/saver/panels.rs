/*
panels.rs

Copyright 2025 Hervé Quatremain

This file is part of Tracepanel.

Tracepanel is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Tracepanel is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Tracepanel. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Panel store backed by a JSON file.
//!
//! The saved object is a serialization of the [`PanelDatabase`] object in JSON format by
//! using [`serde`].
//! Every change is applied to a copy of the database, which replaces the in-memory database
//! only once the file has been written. A failed write leaves both unchanged.

use log::debug;
use std::fs::{File, remove_file};
use std::io::{BufReader, ErrorKind};
use std::path::PathBuf;

use super::write_json;
use crate::generator::panel::Panel;
use crate::scores::Score;
use crate::store::{Attempt, PanelDatabase, PanelId, PanelStore, PanelSummary, StoreError};

/// Name of the store file in the data directory.
pub const PANELS_FILE: &str = "panels.json";

/// File-backed panel store.
pub struct SaverPanels {
    /// Absolute path to the save file.
    save_file: PathBuf,

    /// Content of the save file.
    db: PanelDatabase,
}

impl SaverPanels {
    /// Create a [`SaverPanels`] object and load the existing panels.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the panels are saved.
    /// A missing file is an empty store. The stored panels are verified, so that a damaged file
    /// is reported here instead of failing later.
    pub fn open(mut data_dir: PathBuf) -> Result<Self, StoreError> {
        data_dir.push(PANELS_FILE);
        debug!("Panels file: {data_dir:?}");

        let db: PanelDatabase = match File::open(&data_dir) {
            Ok(file) => serde_json::from_reader(BufReader::new(file))?,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => PanelDatabase::new(),
                _ => return Err(StoreError::Io(error)),
            },
        };
        db.check()?;
        Ok(Self {
            save_file: data_dir,
            db,
        })
    }

    /// Apply the change to a copy of the database and keep it only if it could be saved.
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut PanelDatabase) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut db: PanelDatabase = self.db.clone();
        let result: T = change(&mut db)?;
        write_json(&self.save_file, &db)?;
        self.db = db;
        Ok(result)
    }

    /// Delete the store file. The in-memory copy is cleared too.
    pub fn delete_save(&mut self) {
        let _ = remove_file(&self.save_file);
        self.db = PanelDatabase::new();
    }
}

impl PanelStore for SaverPanels {
    fn save(&mut self, panel: &Panel) -> Result<PanelId, StoreError> {
        self.commit(|db| db.save(panel))
    }

    fn load(&self, id: PanelId) -> Result<Panel, StoreError> {
        self.db.load(id)
    }

    fn list(&self, limit: usize) -> Result<Vec<PanelSummary>, StoreError> {
        self.db.list(limit)
    }

    fn record_attempt(&mut self, attempt: Attempt) -> Result<Option<usize>, StoreError> {
        self.commit(|db| db.record_attempt(attempt))
    }

    fn attempts(&self, id: PanelId) -> Result<Vec<Attempt>, StoreError> {
        self.db.attempts(id)
    }

    fn best_times(&self, id: PanelId) -> Result<Vec<Score>, StoreError> {
        self.db.best_times(id)
    }
}
