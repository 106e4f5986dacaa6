/*
scores.rs

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

//! Best solving times for the stored panels.
//!
//! [`BestTimes`] keeps one scoreboard per panel. Only valid solutions are added.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::store::PanelId;

/// Number of entries per scoreboard (number of top times to keep).
pub const BOARD_SIZE: usize = 10;

/// Object that represents a score.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// How long it took to solve the panel.
    pub time: Duration,

    /// When the solution was submitted.
    pub when: DateTime<Utc>,
}

/// Sorted list of the top scores for a panel.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
struct Board {
    top: Vec<Score>,
}

impl Board {
    /// Add a score and return its position in the board, starting at 1, or None if the score
    /// does not make it to the board.
    ///
    /// A score equal to an existing one is ranked after it.
    fn add_score(&mut self, score: Score) -> Option<usize> {
        let index: usize = self.top.partition_point(|s| s.time <= score.time);
        if index >= BOARD_SIZE {
            return None;
        }
        self.top.insert(index, score);
        self.top.truncate(BOARD_SIZE);
        Some(index + 1)
    }
}

/// Scoreboards indexed by panel.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BestTimes {
    boards: BTreeMap<PanelId, Board>,
}

impl BestTimes {
    /// Create a [`BestTimes`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a solving time to the scoreboard of the panel and return the position in the
    /// scoreboard, or None if the time does not make it to the board.
    ///
    /// The returned position starts at 1 (best time).
    pub fn add_score(
        &mut self,
        panel_id: PanelId,
        time: Duration,
        when: DateTime<Utc>,
    ) -> Option<usize> {
        self.boards
            .entry(panel_id)
            .or_default()
            .add_score(Score { time, when })
    }

    /// Return the scores of the panel, best first. The list is empty when nobody solved it.
    pub fn get_scores(&self, panel_id: PanelId) -> &[Score] {
        match self.boards.get(&panel_id) {
            Some(b) => &b.top,
            None => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn positions_start_at_one() {
        let mut scores = BestTimes::new();
        let now = Utc::now();
        assert!(scores.is_empty());
        assert_eq!(scores.add_score(1, secs(30), now), Some(1));
        assert_eq!(scores.add_score(1, secs(10), now), Some(1));
        assert_eq!(scores.add_score(1, secs(20), now), Some(2));
        assert_eq!(scores.add_score(1, secs(20), now), Some(3));
        let times: Vec<u64> = scores
            .get_scores(1)
            .iter()
            .map(|s| s.time.as_secs())
            .collect();
        assert_eq!(times, vec![10, 20, 20, 30]);
        assert!(scores.get_scores(2).is_empty());
    }

    #[test]
    fn board_keeps_the_best_ten() {
        let mut scores = BestTimes::new();
        let now = Utc::now();
        for s in 1..=BOARD_SIZE as u64 {
            assert_eq!(scores.add_score(4, secs(s * 10), now), Some(s as usize));
        }
        assert_eq!(scores.add_score(4, secs(500), now), None);
        assert_eq!(scores.add_score(4, secs(5), now), Some(1));
        assert_eq!(scores.get_scores(4).len(), BOARD_SIZE);
        assert_eq!(scores.get_scores(4)[BOARD_SIZE - 1].time, secs(90));
    }

    #[test]
    fn serialization() {
        let mut scores = BestTimes::new();
        scores.add_score(12, secs(42), Utc::now());
        let json = serde_json::to_string(&scores).unwrap();
        let back: BestTimes = serde_json::from_str(&json).unwrap();
        assert_eq!(back, scores);
        assert!(!back.is_empty());
    }
}
