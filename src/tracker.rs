/*
tracker.rs

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

//! Follow the path that the player traces.
//!
//! The input layer snaps the pointer to the nearest grid node and sends [`Event`] objects.
//! [`Tracker::transition`] is a pure function that returns the next state:
//!
//! ```text
//!            down(start)                 up, last = end
//!   Idle ----------------> Drawing ----------------------> Completed
//!    ^                      |   ^ move: extend or retract       |
//!    |   feedback elapsed,  |   |                               | down(start)
//!    |   reset, or down     v   |                               v
//!    +----------------- Rejected                             Drawing
//!               up, last != end
//! ```
//!
//! A [`Event::Reset`] brings any state back to Idle.
//! In every state the path starts on the start node, its consecutive nodes are adjacent, and it
//! never goes through a node twice or onto a wall.

use log::debug;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::generator::grid::{Grid, Point};
use crate::generator::path::Path;

/// How long a rejected path stays visible before the tracker returns to Idle.
pub const FEEDBACK_DELAY: Duration = Duration::from_millis(500);

/// Tracing phases.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the player to press the start node.
    #[default]
    Idle,

    /// The pointer is down and the path follows it.
    Drawing,

    /// The pointer was released on the end node. The path is ready for validation.
    Completed,

    /// The pointer was released away from the end node.
    Rejected,
}

/// Pointer events, already snapped to grid nodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,

    /// The rejection feedback delay is over.
    FeedbackElapsed,

    /// New panel, or manual reset.
    Reset,
}

/// State of the trace.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Tracker {
    phase: Phase,

    /// Traced path. Holds at least the start node.
    path: Path,
}

impl Tracker {
    /// Create a [`Tracker`] object in the Idle phase.
    pub fn new(grid: &Grid) -> Self {
        Self {
            phase: Phase::Idle,
            path: Path::from_points(&[grid.start()]),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Return the path as a list of points.
    pub fn points(&self) -> &[Point] {
        self.path.get()
    }

    /// Return the state that follows the event.
    pub fn transition(&self, grid: &Grid, event: Event) -> Tracker {
        if event == Event::Reset {
            return Tracker::new(grid);
        }

        match (self.phase, event) {
            (Phase::Idle, Event::PointerDown(p)) | (Phase::Completed, Event::PointerDown(p)) => {
                if p == grid.start() {
                    Tracker {
                        phase: Phase::Drawing,
                        path: Path::from_points(&[p]),
                    }
                } else {
                    self.clone()
                }
            }
            (Phase::Drawing, Event::PointerMove(p)) => self.follow(grid, p),
            (Phase::Drawing, Event::PointerUp) => {
                let phase: Phase = if self.path.get_last() == Some(grid.end()) {
                    Phase::Completed
                } else {
                    Phase::Rejected
                };
                debug!("Pointer released: {phase:?} with {} node(s)", self.path.len());
                Tracker {
                    phase,
                    path: self.path.clone(),
                }
            }
            (Phase::Rejected, Event::FeedbackElapsed) => Tracker::new(grid),
            (Phase::Rejected, Event::PointerDown(_)) => Tracker::new(grid).transition(grid, event),
            _ => self.clone(),
        }
    }

    /// Apply the event and return the new phase.
    pub fn apply(&mut self, grid: &Grid, event: Event) -> Phase {
        *self = self.transition(grid, event);
        self.phase
    }

    /// Extend or retract the path toward the given node.
    fn follow(&self, grid: &Grid, point: Point) -> Tracker {
        let Some(last) = self.path.get_last() else {
            return self.clone();
        };
        let mut next: Tracker = self.clone();

        if self.path.get_previous() == Some(point) {
            next.path.pop();
            return next;
        }
        if point == last || last == grid.end() {
            return next;
        }
        if !grid.is_adjacent(last, point) || self.path.contains(point) || grid.is_wall(point) {
            debug!("Refusing to extend the path from {last} to {point}");
            return next;
        }
        next.path.push(point);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::generator::random_panel::RandomPanel;
    use proptest::prelude::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn grid4() -> Grid {
        Grid::new(4, 4, p(0, 3), p(3, 0)).unwrap()
    }

    fn run(grid: &Grid, events: &[Event]) -> Tracker {
        let mut tracker = Tracker::new(grid);
        for e in events {
            tracker.apply(grid, *e);
        }
        tracker
    }

    #[test]
    fn press_elsewhere_is_ignored() {
        let grid = grid4();
        let tracker = run(&grid, &[Event::PointerDown(p(1, 1)), Event::PointerMove(p(1, 2))]);
        assert_eq!(tracker.phase(), Phase::Idle);
        assert_eq!(tracker.points(), &[p(0, 3)]);
    }

    #[test]
    fn draw_retract_and_complete() {
        let grid = grid4();
        let mut tracker = run(
            &grid,
            &[
                Event::PointerDown(p(0, 3)),
                Event::PointerMove(p(0, 2)),
                Event::PointerMove(p(1, 2)),
            ],
        );
        assert_eq!(tracker.phase(), Phase::Drawing);
        assert_eq!(tracker.points(), &[p(0, 3), p(0, 2), p(1, 2)]);

        // Going back over the previous node removes the last one
        tracker.apply(&grid, Event::PointerMove(p(0, 2)));
        assert_eq!(tracker.points(), &[p(0, 3), p(0, 2)]);

        for point in [p(0, 1), p(0, 0), p(1, 0), p(2, 0), p(3, 0)] {
            tracker.apply(&grid, Event::PointerMove(point));
        }
        // Nothing goes past the end node
        tracker.apply(&grid, Event::PointerMove(p(3, 1)));
        assert_eq!(tracker.points().last(), Some(&p(3, 0)));

        assert_eq!(tracker.apply(&grid, Event::PointerUp), Phase::Completed);
        assert_eq!(tracker.points().len(), 7);
    }

    #[test]
    fn refused_extensions() {
        let mut grid = grid4();
        grid.set_wall(p(1, 3)).unwrap();
        let start = [
            Event::PointerDown(p(0, 3)),
            Event::PointerMove(p(0, 2)),
            Event::PointerMove(p(1, 2)),
            Event::PointerMove(p(1, 1)),
            Event::PointerMove(p(0, 1)),
        ];
        let tracker = run(&grid, &start);
        let before: Vec<Point> = tracker.points().to_vec();

        // Not adjacent
        let t = tracker.transition(&grid, Event::PointerMove(p(2, 2)));
        assert_eq!(t.points(), before.as_slice());
        // Already in the path, and not the previous node
        let t = tracker.transition(&grid, Event::PointerMove(p(0, 2)));
        assert_eq!(t.points(), before.as_slice());
        // Outside the grid
        let t = tracker.transition(&grid, Event::PointerMove(p(-1, 1)));
        assert_eq!(t.points(), before.as_slice());

        // Wall
        let t = run(
            &grid,
            &[
                Event::PointerDown(p(0, 3)),
                Event::PointerMove(p(0, 2)),
                Event::PointerMove(p(1, 2)),
                Event::PointerMove(p(1, 3)),
            ],
        );
        assert_eq!(t.points(), &[p(0, 3), p(0, 2), p(1, 2)]);
    }

    #[test]
    fn wall_blocks_the_trace_on_a_generated_panel() {
        let mut panel = RandomPanel::with_seed(&GeneratorConfig::default(), 11)
            .generate(8, 8, 1)
            .unwrap();
        panel.grid.set_wall(p(3, 3)).unwrap();
        // Clear the way from the start corner to (3,2)
        let route = [p(0, 0), p(1, 0), p(2, 0), p(3, 0), p(3, 1), p(3, 2)];
        let mut grid = Grid::new(8, 8, panel.start(), panel.end()).unwrap();
        for w in panel.grid.walls() {
            if !route.contains(&w) {
                grid.set_wall(w).unwrap();
            }
        }
        assert!(grid.is_wall(p(3, 3)));

        let mut tracker = Tracker::new(&grid);
        tracker.apply(&grid, Event::PointerDown(p(0, 0)));
        for point in &route[1..] {
            tracker.apply(&grid, Event::PointerMove(*point));
        }
        assert_eq!(tracker.points(), &route);
        tracker.apply(&grid, Event::PointerMove(p(3, 3)));
        assert_eq!(tracker.points(), &route);
        assert_eq!(tracker.phase(), Phase::Drawing);
    }

    #[test]
    fn rejected_trace_goes_back_to_idle() {
        let grid = grid4();
        let events = [
            Event::PointerDown(p(0, 3)),
            Event::PointerMove(p(1, 3)),
            Event::PointerUp,
        ];
        let tracker = run(&grid, &events);
        assert_eq!(tracker.phase(), Phase::Rejected);
        assert_eq!(tracker.points(), &[p(0, 3), p(1, 3)]);

        // Moves are ignored while the feedback is displayed
        let t = tracker.transition(&grid, Event::PointerMove(p(2, 3)));
        assert_eq!(t, tracker);

        let t = tracker.transition(&grid, Event::FeedbackElapsed);
        assert_eq!(t.phase(), Phase::Idle);
        assert_eq!(t.points(), &[p(0, 3)]);

        // A new press on the start node skips the rest of the feedback
        let t = tracker.transition(&grid, Event::PointerDown(p(0, 3)));
        assert_eq!(t.phase(), Phase::Drawing);
        assert_eq!(t.points(), &[p(0, 3)]);
    }

    #[test]
    fn reset_and_restart() {
        let grid = grid4();
        let events = [
            Event::PointerDown(p(0, 3)),
            Event::PointerMove(p(1, 3)),
            Event::PointerMove(p(2, 3)),
            Event::PointerMove(p(3, 3)),
            Event::PointerMove(p(3, 2)),
            Event::PointerMove(p(3, 1)),
            Event::PointerMove(p(3, 0)),
            Event::PointerUp,
        ];
        let tracker = run(&grid, &events);
        assert_eq!(tracker.phase(), Phase::Completed);

        let t = tracker.transition(&grid, Event::PointerDown(p(0, 3)));
        assert_eq!(t.phase(), Phase::Drawing);
        assert_eq!(t.points().len(), 1);

        let t = tracker.transition(&grid, Event::PointerDown(p(2, 2)));
        assert_eq!(t, tracker);

        let t = tracker.transition(&grid, Event::Reset);
        assert_eq!(t, Tracker::new(&grid));
    }

    fn event_strategy() -> impl Strategy<Value = Event> {
        let point = (-1i32..6, -1i32..6).prop_map(|(x, y)| Point::new(x, y));
        prop_oneof![
            1 => point.clone().prop_map(Event::PointerDown),
            8 => point.prop_map(Event::PointerMove),
            1 => Just(Event::PointerUp),
            1 => Just(Event::FeedbackElapsed),
            1 => Just(Event::Reset),
        ]
    }

    proptest! {
        #[test]
        fn path_invariants_hold(events in prop::collection::vec(event_strategy(), 0..200)) {
            let mut grid = Grid::new(5, 5, p(0, 0), p(4, 4)).unwrap();
            grid.set_wall(p(2, 2)).unwrap();
            grid.set_wall(p(1, 3)).unwrap();

            let mut tracker = Tracker::new(&grid);
            for e in events {
                tracker.apply(&grid, e);
                let points = tracker.points();
                prop_assert_eq!(points.first().copied(), Some(grid.start()));
                let distinct: std::collections::HashSet<&Point> = points.iter().collect();
                prop_assert_eq!(distinct.len(), points.len());
                prop_assert!(points.iter().all(|n| grid.contains(*n) && !grid.is_wall(*n)));
                for pair in points.windows(2) {
                    prop_assert_eq!(pair[0].distance(&pair[1]), 1);
                }
                if tracker.phase() == Phase::Completed {
                    prop_assert_eq!(points.last().copied(), Some(grid.end()));
                }
            }
        }
    }
}
