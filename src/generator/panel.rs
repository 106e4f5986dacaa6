/*
panel.rs

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

//! Panel definition: a grid, its symbols, and the parameters it was generated with.
//!
//! A [`Panel`] is created by the random generator or parsed from an external JSON document,
//! and is read-only afterwards.
//! When no panel can be obtained, [`fallback_panel`] provides a fixed panel that comes with a
//! solution.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::grid::{Grid, GridError, Point};
use super::symbols::{Color, Space, Symbol};

/// Lowest difficulty level.
pub const MIN_DIFFICULTY: u8 = 1;

/// Highest difficulty level.
pub const MAX_DIFFICULTY: u8 = 10;

/// Errors raised when checking a panel definition.
#[derive(Error, Debug)]
pub enum PanelError {
    #[error("invalid grid: {0}")]
    Grid(#[from] GridError),

    #[error("malformed panel document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("difficulty {0} is outside 1..=10")]
    Difficulty(u8),

    #[error("the {0} is outside the grid")]
    SymbolOutOfBounds(Symbol),

    #[error("the {0} sits on a wall or an endpoint")]
    SymbolOnMarker(Symbol),

    #[error("the {0} shares its position with another symbol")]
    DuplicateSymbol(Symbol),

    #[error("the {0} must have a value between 1 and 3")]
    TriangleValue(Symbol),
}

fn default_difficulty() -> u8 {
    MIN_DIFFICULTY
}

/// Complete puzzle instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Panel {
    /// Display name, assigned by the store when missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Grid, with the start and end nodes.
    pub grid: Grid,

    /// Symbols in placement order.
    pub symbols: Vec<Symbol>,

    /// Known solution, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Vec<Point>>,

    /// Difficulty level the panel was generated with.
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
}

impl Panel {
    /// Create a [`Panel`] object without a name or a solution.
    pub fn new(grid: Grid, symbols: Vec<Symbol>, difficulty: u8) -> Self {
        Self {
            name: None,
            grid,
            symbols,
            solution: None,
            difficulty,
        }
    }

    pub fn start(&self) -> Point {
        self.grid.start()
    }

    pub fn end(&self) -> Point {
        self.grid.end()
    }

    /// Symbols whose node the path must go through.
    pub fn must_visit(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.iter().filter(|s| s.is_must_visit())
    }

    /// Return a copy of the panel with black and white swapped on every symbol.
    pub fn with_inverted_colors(&self) -> Panel {
        Panel {
            symbols: self
                .symbols
                .iter()
                .map(|s| s.with_inverted_color())
                .collect(),
            ..self.clone()
        }
    }

    /// Verify that the panel is consistent.
    ///
    /// # Errors
    ///
    /// Grid invariants, difficulty range, and symbol positions are verified.
    pub fn check(&self) -> Result<(), PanelError> {
        self.grid.check()?;
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(PanelError::Difficulty(self.difficulty));
        }

        let mut taken: HashSet<(bool, Point)> = HashSet::with_capacity(self.symbols.len());
        for symbol in &self.symbols {
            let position: Point = symbol.position();
            let on_node: bool = symbol.space() == Space::Node;

            if on_node {
                if !self.grid.contains(position) {
                    return Err(PanelError::SymbolOutOfBounds(*symbol));
                }
                if self.grid.is_wall(position) || position == self.start() || position == self.end()
                {
                    return Err(PanelError::SymbolOnMarker(*symbol));
                }
            } else if !self.grid.contains_cell(position) {
                return Err(PanelError::SymbolOutOfBounds(*symbol));
            }

            if let Symbol::Triangle { value, .. } = symbol
                && !(1..=3).contains(value)
            {
                return Err(PanelError::TriangleValue(*symbol));
            }

            if !taken.insert((on_node, position)) {
                return Err(PanelError::DuplicateSymbol(*symbol));
            }
        }
        Ok(())
    }

    /// Parse and check a panel from its JSON representation.
    pub fn from_json(text: &str) -> Result<Panel, PanelError> {
        let panel: Panel = serde_json::from_str(text)?;
        panel.check()?;
        Ok(panel)
    }

    /// Return the JSON representation of the panel.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Return the fixed panel used when no other panel can be obtained.
///
/// ```text
///   S = start (0,4)   E = end (4,0)   B/W = black/white square   H = hexagon
///
///   o---o---o---o---E
///   | B |   |   |   |
///   o---o---o---o---o
///   |   |   | W |   |
///   o---o---H---o---o
///   |   | B |   |   |
///   o---o---o---o---o
///   |   |   |   | W |
///   S---o---o---o---o
/// ```
///
/// The bundled solution runs up the middle column, which separates the black squares on the
/// left from the white squares on the right and goes through the hexagon.
pub fn fallback_panel() -> Panel {
    let grid: Grid = Grid::new(5, 5, Point::new(0, 4), Point::new(4, 0))
        .expect("the fallback grid definition is valid");
    let symbols: Vec<Symbol> = vec![
        Symbol::Square {
            position: Point::new(0, 0),
            color: Color::Black,
        },
        Symbol::Square {
            position: Point::new(1, 2),
            color: Color::Black,
        },
        Symbol::Square {
            position: Point::new(2, 1),
            color: Color::White,
        },
        Symbol::Square {
            position: Point::new(3, 3),
            color: Color::White,
        },
        Symbol::Hexagon {
            position: Point::new(2, 2),
        },
    ];
    let solution: Vec<Point> = [
        (0, 4),
        (1, 4),
        (2, 4),
        (2, 3),
        (2, 2),
        (2, 1),
        (2, 0),
        (3, 0),
        (4, 0),
    ]
    .into_iter()
    .map(Point::from)
    .collect();

    Panel {
        name: Some(String::from("Fallback")),
        grid,
        symbols,
        solution: Some(solution),
        difficulty: 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_is_consistent_and_stable() {
        let panel = fallback_panel();
        assert!(panel.check().is_ok());
        assert_eq!(panel, fallback_panel());
        let nodes: Vec<Point> = panel.must_visit().map(|s| s.position()).collect();
        assert_eq!(nodes, vec![Point::new(2, 2)]);
    }

    #[test]
    fn json_round_trip_keeps_everything() {
        let panel = fallback_panel();
        let json = panel.to_json().unwrap();
        assert_eq!(Panel::from_json(&json).unwrap(), panel);
    }

    #[test]
    fn check_rejects_bad_symbols() {
        let mut panel = fallback_panel();
        panel.symbols.push(Symbol::Dot {
            position: Point::new(0, 4),
        });
        assert!(matches!(panel.check(), Err(PanelError::SymbolOnMarker(_))));

        let mut panel = fallback_panel();
        panel.symbols.push(Symbol::Square {
            position: Point::new(4, 4),
            color: Color::Red,
        });
        assert!(matches!(panel.check(), Err(PanelError::SymbolOutOfBounds(_))));

        let mut panel = fallback_panel();
        panel.symbols.push(Symbol::Star {
            position: Point::new(0, 0),
            color: Color::Red,
        });
        assert!(matches!(panel.check(), Err(PanelError::DuplicateSymbol(_))));

        let mut panel = fallback_panel();
        panel.symbols.push(Symbol::Triangle {
            position: Point::new(1, 1),
            value: 4,
        });
        assert!(matches!(panel.check(), Err(PanelError::TriangleValue(_))));

        let mut panel = fallback_panel();
        panel.difficulty = 11;
        assert!(matches!(panel.check(), Err(PanelError::Difficulty(11))));
    }

    #[test]
    fn missing_difficulty_defaults_to_one() {
        let mut value = serde_json::to_value(fallback_panel()).unwrap();
        value.as_object_mut().unwrap().remove("difficulty");
        let panel = Panel::from_json(&value.to_string()).unwrap();
        assert_eq!(panel.difficulty, MIN_DIFFICULTY);
    }

    #[test]
    fn inverted_colors() {
        let panel = fallback_panel().with_inverted_colors();
        assert_eq!(panel.symbols[0].color(), Some(Color::White));
        assert_eq!(panel.symbols[2].color(), Some(Color::Black));
        assert_eq!(panel.symbols[4], fallback_panel().symbols[4]);
    }
}
