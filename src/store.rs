/*
store.rs

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

//! Keep panels, solving attempts, and best times.
//!
//! [`PanelStore`] is the interface that the rest of the crate uses.
//! [`PanelDatabase`] is the in-memory implementation. The [`crate::saver::panels`] module wraps
//! it to keep a copy on disk.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use crate::generator::grid::Point;
use crate::generator::panel::{Panel, PanelError};
use crate::scores::{BestTimes, Score};

/// Identifier of a stored panel.
pub type PanelId = u64;

/// Errors raised by the panel stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no panel with ID {0}")]
    NotFound(PanelId),

    #[error("invalid panel: {0}")]
    Panel(#[from] PanelError),

    #[error("cannot access the panel store: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed panel store: {0}")]
    Json(#[from] serde_json::Error),

    #[error("panel ID {0} is stored twice")]
    DuplicateId(PanelId),

    #[error("the next panel ID {next} is not above the stored ID {stored}")]
    IdConflict { next: PanelId, stored: PanelId },
}

/// Short description of a stored panel, for listings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PanelSummary {
    pub id: PanelId,
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub difficulty: u8,
    pub created: DateTime<Utc>,

    /// Number of symbols.
    pub symbols: usize,
}

/// Solution submitted for a stored panel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Attempt {
    pub panel_id: PanelId,
    pub path: Vec<Point>,
    pub valid: bool,

    /// Solving time reported by the player.
    pub elapsed: Duration,
    pub when: DateTime<Utc>,
}

/// Persistence interface for the panels.
pub trait PanelStore {
    /// Store the panel and return its new identifier.
    ///
    /// Panels without a name are stored with a default `Panel {unix-millis}` name, so
    /// [`PanelStore::load`] returns them with that name. Everything else is kept as is.
    fn save(&mut self, panel: &Panel) -> Result<PanelId, StoreError>;

    /// Return a copy of the stored panel.
    fn load(&self, id: PanelId) -> Result<Panel, StoreError>;

    /// Return at most `limit` panel summaries, most recent first.
    fn list(&self, limit: usize) -> Result<Vec<PanelSummary>, StoreError>;

    /// Store a solving attempt. For a valid attempt, return its position in the panel
    /// scoreboard, or None if it does not make it to the board.
    fn record_attempt(&mut self, attempt: Attempt) -> Result<Option<usize>, StoreError>;

    /// Return the attempts for the panel, oldest first.
    fn attempts(&self, id: PanelId) -> Result<Vec<Attempt>, StoreError>;

    /// Return the best solving times for the panel, best first.
    fn best_times(&self, id: PanelId) -> Result<Vec<Score>, StoreError>;
}

/// Stored panel and its metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Record {
    id: PanelId,
    created: DateTime<Utc>,
    panel: Panel,
}

impl Record {
    fn summary(&self) -> PanelSummary {
        PanelSummary {
            id: self.id,
            name: self.panel.name.clone().unwrap_or_default(),
            width: self.panel.grid.width(),
            height: self.panel.grid.height(),
            difficulty: self.panel.difficulty,
            created: self.created,
            symbols: self.panel.symbols.len(),
        }
    }
}

/// In-memory panel store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PanelDatabase {
    /// Identifier for the next saved panel.
    next_id: PanelId,

    /// Stored panels, in insertion order.
    panels: Vec<Record>,

    /// Solving attempts, in submission order.
    attempts: Vec<Attempt>,

    /// Best times of the valid attempts.
    scores: BestTimes,
}

impl Default for PanelDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelDatabase {
    /// Create an empty [`PanelDatabase`] object.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            panels: Vec::new(),
            attempts: Vec::new(),
            scores: BestTimes::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Verify the stored panels and the identifiers, typically after a deserialization.
    pub fn check(&self) -> Result<(), StoreError> {
        let mut ids: HashSet<PanelId> = HashSet::with_capacity(self.panels.len());
        for record in &self.panels {
            record.panel.check()?;
            if !ids.insert(record.id) {
                return Err(StoreError::DuplicateId(record.id));
            }
            if record.id >= self.next_id {
                return Err(StoreError::IdConflict {
                    next: self.next_id,
                    stored: record.id,
                });
            }
        }
        Ok(())
    }

    fn record(&self, id: PanelId) -> Result<&Record, StoreError> {
        self.panels
            .iter()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

impl PanelStore for PanelDatabase {
    fn save(&mut self, panel: &Panel) -> Result<PanelId, StoreError> {
        panel.check()?;

        let created: DateTime<Utc> = Utc::now();
        let mut panel: Panel = panel.clone();
        if panel.name.is_none() {
            panel.name = Some(format!("Panel {}", created.timestamp_millis()));
        }

        let id: PanelId = self.next_id;
        self.next_id += 1;
        debug!("Storing panel {id} {:?}", panel.name);
        self.panels.push(Record { id, created, panel });
        Ok(id)
    }

    fn load(&self, id: PanelId) -> Result<Panel, StoreError> {
        Ok(self.record(id)?.panel.clone())
    }

    fn list(&self, limit: usize) -> Result<Vec<PanelSummary>, StoreError> {
        let mut records: Vec<&Record> = self.panels.iter().collect();
        records.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(records.iter().take(limit).map(|r| r.summary()).collect())
    }

    fn record_attempt(&mut self, attempt: Attempt) -> Result<Option<usize>, StoreError> {
        self.record(attempt.panel_id)?;

        let position: Option<usize> = if attempt.valid {
            self.scores
                .add_score(attempt.panel_id, attempt.elapsed, attempt.when)
        } else {
            None
        };
        debug!(
            "Attempt on panel {}: valid={} position={position:?}",
            attempt.panel_id, attempt.valid
        );
        self.attempts.push(attempt);
        Ok(position)
    }

    fn attempts(&self, id: PanelId) -> Result<Vec<Attempt>, StoreError> {
        self.record(id)?;
        Ok(self
            .attempts
            .iter()
            .filter(|a| a.panel_id == id)
            .cloned()
            .collect())
    }

    fn best_times(&self, id: PanelId) -> Result<Vec<Score>, StoreError> {
        self.record(id)?;
        Ok(self.scores.get_scores(id).to_vec())
    }
}
