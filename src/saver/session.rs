/*
session.rs

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

//! Save and restore the session in progress.
//!
//! The saved object is a serialization of the [`Session`] object in JSON format by using
//! [`serde`]. The timer is saved as the elapsed time, so that it continues where it stopped.

use log::debug;
use std::error::Error;
use std::fs::{File, remove_file};
use std::io::{BufReader, ErrorKind};
use std::path::PathBuf;

use super::write_json;
use crate::session::Session;

/// Name of the save file in the data directory.
pub const SESSION_FILE: &str = "session.json";

/// Serialize and deserialize [`std::time::Instant`] objects with Serde.
pub mod instant {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
    use std::time::{Duration, Instant};

    /// Serialize an [`std::time::Instant`] object as the time elapsed since then.
    pub fn serialize<S>(instant: &Instant, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let duration: Duration = instant.elapsed();
        duration.serialize(serializer)
    }

    /// Deserialize an [`std::time::Instant`] object.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Instant, D::Error>
    where
        D: Deserializer<'de>,
    {
        let duration: Duration = Duration::deserialize(deserializer)?;
        Instant::now()
            .checked_sub(duration)
            .ok_or_else(|| Error::custom("Cannot compute the saved session duration"))
    }
}

/// Object to save and restore a session in progress.
pub struct SaverSession {
    /// Absolute path to the save file.
    save_file: PathBuf,
}

impl SaverSession {
    /// Create a [`SaverSession`] object.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the session must be saved.
    pub fn new(mut data_dir: PathBuf) -> Self {
        data_dir.push(SESSION_FILE);
        debug!("Session file: {data_dir:?}");
        SaverSession {
            save_file: data_dir,
        }
    }

    /// Retrieve the saved [`Session`] object.
    ///
    /// Return None if there is no saved session.
    pub fn get_session(&self) -> Result<Option<Session>, Box<dyn Error>> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => return Err(Box::new(error)),
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let session: Session = serde_json::from_reader(reader)?;
        session.panel.check()?;
        Ok(Some(session))
    }

    /// Save the provided [`Session`] object.
    pub fn save_session(&self, session: &Session) -> Result<(), Box<dyn Error>> {
        write_json(&self.save_file, session)?;
        Ok(())
    }

    /// Delete the saved session.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::grid::Point;
    use crate::generator::panel::fallback_panel;
    use crate::saver::test_dir;
    use crate::tracker::{Event, Phase};
    use std::fs;

    #[test]
    fn session_round_trip() {
        let dir = test_dir::new("session");
        let saver = SaverSession::new(dir.clone());
        assert!(saver.get_session().unwrap().is_none());

        let mut session = Session::new(fallback_panel(), Some(4));
        session.handle(Event::PointerDown(Point::new(0, 4)));
        session.handle(Event::PointerMove(Point::new(1, 4)));
        session.pause();
        saver.save_session(&session).unwrap();

        let restored = saver.get_session().unwrap().unwrap();
        assert_eq!(restored.panel_id, Some(4));
        assert!(restored.paused);
        assert_eq!(restored.phase(), Phase::Drawing);
        assert_eq!(restored.path(), &[Point::new(0, 4), Point::new(1, 4)]);

        saver.delete_save();
        assert!(saver.get_session().unwrap().is_none());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_panel_in_the_save_file() {
        let dir = test_dir::new("session-bad");
        let saver = SaverSession::new(dir.clone());
        let session = Session::new(fallback_panel(), None);
        let mut value = serde_json::to_value(&session).unwrap();
        value["panel"]["difficulty"] = serde_json::json!(42);
        fs::write(dir.join(SESSION_FILE), value.to_string()).unwrap();

        assert!(saver.get_session().is_err());
        let _ = fs::remove_dir_all(&dir);
    }
}
