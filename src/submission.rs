/*
submission.rs

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

//! Check a solution for a stored panel and record the attempt.

use chrono::Utc;
use log::info;
use std::time::Duration;

use crate::generator::grid::Point;
use crate::generator::panel::Panel;
use crate::store::{Attempt, PanelId, PanelStore, StoreError};
use crate::validator::{self, Violation};

/// Verdict for a submitted solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Whether the path solves the panel.
    pub valid: bool,

    /// Broken rule, for an invalid path.
    pub violation: Option<Violation>,

    /// Position in the best-time scoreboard, starting at 1, when the time makes it to the board.
    pub position: Option<usize>,
}

/// Validate the path against the stored panel and record the attempt.
///
/// # Errors
///
/// The function returns [`StoreError::NotFound`] for an unknown panel, and the storage errors
/// when the attempt cannot be recorded. Nothing is recorded in that case.
pub fn submit(
    store: &mut dyn PanelStore,
    panel_id: PanelId,
    path: &[Point],
    elapsed: Duration,
) -> Result<Submission, StoreError> {
    let panel: Panel = store.load(panel_id)?;
    let verdict: Result<(), Violation> = validator::check(&panel, path);
    let valid: bool = verdict.is_ok();

    let position: Option<usize> = store.record_attempt(Attempt {
        panel_id,
        path: path.to_vec(),
        valid,
        elapsed,
        when: Utc::now(),
    })?;
    info!("Panel {panel_id}: valid={valid} time={elapsed:?} position={position:?}");

    Ok(Submission {
        valid,
        violation: verdict.err(),
        position,
    })
}
