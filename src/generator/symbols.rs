/*
symbols.rs

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

//! Constraint symbols placed on a panel.
//!
//! Dots and hexagons sit on nodes: the path must go through them.
//! Squares, stars, triangles, and eliminations sit on cells.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::FromRepr;

use super::grid::Point;

/// Symbol colors.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
    Red,
    Blue,
    Yellow,
    Green,
    Orange,
    Purple,
}

impl Color {
    /// Colors that the random generator draws from.
    pub const GENERATED: [Color; 5] = [
        Color::White,
        Color::Black,
        Color::Red,
        Color::Blue,
        Color::Yellow,
    ];

    /// Swap black and white. The other colors are unchanged.
    pub fn inverted(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
            c => c,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name: &str = match self {
            Color::White => "white",
            Color::Black => "black",
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Orange => "orange",
            Color::Purple => "purple",
        };
        write!(f, "{name}")
    }
}

/// Coordinate space of a symbol position.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Space {
    Node,
    Cell,
}

/// Kinds of symbols, without their attributes. Used by the generator to draw a kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum SymbolKind {
    Dot,
    Square,
    Hexagon,
    Star,
    Triangle,
}

impl SymbolKind {
    /// Coordinate space that symbols of this kind use.
    pub fn space(self) -> Space {
        match self {
            SymbolKind::Dot | SymbolKind::Hexagon => Space::Node,
            SymbolKind::Square | SymbolKind::Star | SymbolKind::Triangle => Space::Cell,
        }
    }
}

/// A constraint placed on the panel.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Symbol {
    /// The path must go through the node.
    Dot { position: Point },

    /// The path must go through the node.
    Hexagon { position: Point },

    /// Squares of different colors must end up in different regions.
    Square { position: Point, color: Color },

    /// The region of the star must hold exactly one other symbol of the same color.
    Star { position: Point, color: Color },

    /// The path must draw exactly `value` sides of the cell.
    Triangle { position: Point, value: u8 },

    /// Carried in panel definitions; no rule is attached to it.
    Elimination { position: Point },
}

impl Symbol {
    pub fn position(&self) -> Point {
        match *self {
            Symbol::Dot { position }
            | Symbol::Hexagon { position }
            | Symbol::Square { position, .. }
            | Symbol::Star { position, .. }
            | Symbol::Triangle { position, .. }
            | Symbol::Elimination { position } => position,
        }
    }

    pub fn space(&self) -> Space {
        match self {
            Symbol::Dot { .. } | Symbol::Hexagon { .. } => Space::Node,
            _ => Space::Cell,
        }
    }

    pub fn color(&self) -> Option<Color> {
        match *self {
            Symbol::Square { color, .. } | Symbol::Star { color, .. } => Some(color),
            _ => None,
        }
    }

    /// Whether the path has to go through the symbol's node.
    pub fn is_must_visit(&self) -> bool {
        matches!(self, Symbol::Dot { .. } | Symbol::Hexagon { .. })
    }

    /// Return the symbol with black and white swapped.
    pub fn with_inverted_color(&self) -> Symbol {
        match *self {
            Symbol::Square { position, color } => Symbol::Square {
                position,
                color: color.inverted(),
            },
            Symbol::Star { position, color } => Symbol::Star {
                position,
                color: color.inverted(),
            },
            s => s,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Symbol::Dot { position } => write!(f, "dot at {position}"),
            Symbol::Hexagon { position } => write!(f, "hexagon at {position}"),
            Symbol::Square { position, color } => write!(f, "{color} square at {position}"),
            Symbol::Star { position, color } => write!(f, "{color} star at {position}"),
            Symbol::Triangle { position, value } => write!(f, "triangle({value}) at {position}"),
            Symbol::Elimination { position } => write!(f, "elimination at {position}"),
        }
    }
}
