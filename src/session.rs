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

//! Manage the status of a panel being solved.
//!
//! A [`Session`] object owns the panel, the path tracker, and the timer.
//! The caller creates it and passes it around; nothing is shared between sessions.
//!
//! Panels generated in the background are tagged with a [`Ticket`].
//! Only the panel for the most recent request replaces the current one: older deliveries are
//! discarded.

use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::generator::grid::Point;
use crate::generator::panel::Panel;
use crate::saver::session::instant;
use crate::store::PanelId;
use crate::tracker::{Event, Phase, Tracker};
use crate::validator::{self, Violation};

/// Identifier of a panel request.
pub type Ticket = u64;

/// Result of a completed trace.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The path solves the panel.
    Solved,

    /// The path reached the end node but breaks a rule.
    Invalid(Violation),

    /// The pointer was released before reaching the end node.
    Rejected,
}

/// Manage the status of the panel being solved.
#[derive(Serialize, Deserialize, Debug)]
pub struct Session {
    /// Panel being solved.
    pub panel: Panel,

    /// Store identifier of the panel, if it has been saved.
    pub panel_id: Option<PanelId>,

    /// Path being traced.
    tracker: Tracker,

    /// Whether the panel is solved.
    pub solved: bool,

    /// Whether the player paused the session.
    pub paused: bool,

    /// Number of completed traces that were not solutions.
    pub failed_attempts: usize,

    /// Time when the session started. Used to compute the solving time.
    #[serde(with = "instant")]
    start_time: Instant,

    /// The elapsed time when the session was paused or solved.
    pause_duration: Option<Duration>,

    /// Most recent panel request. Not saved: pending requests do not survive a restart.
    #[serde(skip)]
    last_ticket: Ticket,
}

impl Session {
    /// Create a [`Session`] object for the given panel.
    pub fn new(panel: Panel, panel_id: Option<PanelId>) -> Self {
        Self {
            tracker: Tracker::new(&panel.grid),
            panel,
            panel_id,
            solved: false,
            paused: false,
            failed_attempts: 0,
            start_time: Instant::now(),
            pause_duration: None,
            last_ticket: 0,
        }
    }

    /// Replace the panel. The trace and the timer start over.
    pub fn replace_panel(&mut self, panel: Panel, panel_id: Option<PanelId>) {
        debug!(
            "New panel {}x{} with {} symbol(s)",
            panel.grid.width(),
            panel.grid.height(),
            panel.symbols.len()
        );
        let last_ticket: Ticket = self.last_ticket;
        *self = Session::new(panel, panel_id);
        self.last_ticket = last_ticket;
    }

    /// Register a new panel request and return its ticket.
    /// Deliveries for earlier tickets are ignored from now on.
    pub fn begin_request(&mut self) -> Ticket {
        self.last_ticket += 1;
        self.last_ticket
    }

    /// Replace the panel if the ticket is the most recent one.
    ///
    /// Return whether the panel has been applied.
    pub fn offer_panel(&mut self, ticket: Ticket, panel: Panel, panel_id: Option<PanelId>) -> bool {
        if ticket != self.last_ticket {
            debug!(
                "Discarding the panel for request {ticket}, request {} is more recent",
                self.last_ticket
            );
            return false;
        }
        self.replace_panel(panel, panel_id);
        true
    }

    pub fn phase(&self) -> Phase {
        self.tracker.phase()
    }

    /// Return the path being traced.
    pub fn path(&self) -> &[Point] {
        self.tracker.points()
    }

    /// Process a pointer event.
    ///
    /// Return the outcome when the event ends a trace. Events are ignored while the session is
    /// paused or once the panel is solved.
    pub fn handle(&mut self, event: Event) -> Option<Outcome> {
        if self.paused || self.solved {
            return None;
        }
        let phase: Phase = self.tracker.apply(&self.panel.grid, event);
        if event != Event::PointerUp {
            return None;
        }

        match phase {
            Phase::Completed => match validator::check(&self.panel, self.tracker.points()) {
                Ok(()) => {
                    self.solved = true;
                    self.pause_duration = Some(self.start_time.elapsed());
                    debug!("Panel solved in {:?}", self.get_duration());
                    Some(Outcome::Solved)
                }
                Err(v) => {
                    self.failed_attempts += 1;
                    Some(Outcome::Invalid(v))
                }
            },
            Phase::Rejected => Some(Outcome::Rejected),
            _ => None,
        }
    }

    /// Clear the trace, but keep the panel. A paused session resumes, and the timer restarts if
    /// the panel was solved.
    pub fn reset(&mut self) {
        self.tracker.apply(&self.panel.grid, Event::Reset);
        self.resume();
        if self.solved {
            self.start_time = Instant::now();
            self.pause_duration = None;
            self.solved = false;
        }
    }

    /// Pause the session.
    pub fn pause(&mut self) {
        if self.paused || self.solved {
            return;
        }
        // Store the solving time so far, so that the pause time can be deduced when the
        // player resumes.
        self.pause_duration = Some(self.start_time.elapsed());
        self.paused = true;
    }

    /// Resume the session.
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        // Refresh the elapsed time by removing the pause time.
        if let Some(d) = self.pause_duration {
            self.start_time += self.start_time.elapsed() - d;
            self.pause_duration = None;
        }
        self.paused = false;
    }

    /// Return the solving time. The timer is frozen while paused and once solved.
    pub fn get_duration(&self) -> Duration {
        self.pause_duration
            .unwrap_or_else(|| self.start_time.elapsed())
    }

    /// Return the solving time in hours, minutes, and seconds.
    pub fn get_duration_hms(&self) -> (u64, u64, u64) {
        let duration: u64 = self.get_duration().as_secs();
        (
            duration / 3600,
            (duration % 3600) / 60,
            (duration % 3600) % 60,
        )
    }
}
