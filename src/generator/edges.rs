/*
edges.rs

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

//! Grid edges drawn by a path.
//!
//! An [`Edge`] joins two adjacent nodes. Inside the grid, every edge is the shared side of two
//! cells; on the border, it is the side of a single cell.
//! The edges of a traced path act as walls between cells when the regions are computed.

use log::{Level, debug, log_enabled};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::grid::Point;

/// Undirected unit edge between two adjacent nodes.
///
/// The two nodes are stored in ascending order so that `Edge::new(a, b) == Edge::new(b, a)`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    node1: Point,
    node2: Point,
}

impl Edge {
    /// Create an [`Edge`] object, or return None if the two nodes are not adjacent.
    pub fn new(node1: Point, node2: Point) -> Option<Self> {
        if !node1.is_adjacent(&node2) {
            return None;
        }
        if node1 <= node2 {
            Some(Self { node1, node2 })
        } else {
            Some(Self {
                node1: node2,
                node2: node1,
            })
        }
    }

    /// Return the side shared by two adjacent cells, or None if the cells are not adjacent.
    ///
    /// ```text
    ///  (x,y)---(x+1,y)            (x,y)------(x+1,y)
    ///    | cell1 | cell2            |  cell1   |
    ///  (x,y+1)-(x+1,y+1)          (x,y+1)====(x+1,y+1)
    ///         ^ shared                |  cell2   |
    /// ```
    pub fn between_cells(cell1: Point, cell2: Point) -> Option<Self> {
        if !cell1.is_adjacent(&cell2) {
            return None;
        }
        let (a, b): (Point, Point) = if cell1 <= cell2 {
            (cell1, cell2)
        } else {
            (cell2, cell1)
        };
        if a.y == b.y {
            // Side by side: the shared side is the left side of the cell on the right
            Edge::new(Point::new(b.x, b.y), Point::new(b.x, b.y + 1))
        } else {
            // Stacked: the shared side is the top side of the lower cell
            Edge::new(Point::new(b.x, b.y), Point::new(b.x + 1, b.y))
        }
    }

    /// The four sides of a cell: top, bottom, left, right.
    pub fn cell_sides(cell: Point) -> [Edge; 4] {
        let (x, y): (i32, i32) = (cell.x, cell.y);
        [
            Edge {
                node1: Point::new(x, y),
                node2: Point::new(x + 1, y),
            },
            Edge {
                node1: Point::new(x, y + 1),
                node2: Point::new(x + 1, y + 1),
            },
            Edge {
                node1: Point::new(x, y),
                node2: Point::new(x, y + 1),
            },
            Edge {
                node1: Point::new(x + 1, y),
                node2: Point::new(x + 1, y + 1),
            },
        ]
    }
}

/// Set of edges drawn by a path.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Edges {
    edges: HashSet<Edge>,
}

impl Edges {
    /// Create an empty [`Edges`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the edges between consecutive points of a path.
    /// Pairs of points that are not adjacent do not produce an edge.
    pub fn from_path(path: &[Point]) -> Self {
        Self {
            edges: path
                .windows(2)
                .filter_map(|pair| Edge::new(pair[0], pair[1]))
                .collect(),
        }
    }

    /// Whether the edge between the two nodes has been drawn.
    pub fn contains(&self, node1: Point, node2: Point) -> bool {
        match Edge::new(node1, node2) {
            Some(e) => self.edges.contains(&e),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Whether a drawn edge separates the two adjacent cells.
    pub fn separates(&self, cell1: Point, cell2: Point) -> bool {
        match Edge::between_cells(cell1, cell2) {
            Some(e) => self.edges.contains(&e),
            None => false,
        }
    }

    /// Number of drawn edges among the four sides of the cell.
    pub fn count_around(&self, cell: Point) -> usize {
        Edge::cell_sides(cell)
            .iter()
            .filter(|e| self.edges.contains(e))
            .count()
    }

    /// Print the edges.
    pub fn debug(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        let mut v: Vec<&Edge> = self.edges.iter().collect();
        v.sort_by_key(|e| (e.node1, e.node2));
        for e in v {
            debug!("{} -- {}", e.node1, e.node2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn edges_are_undirected() {
        assert_eq!(Edge::new(p(1, 1), p(1, 2)), Edge::new(p(1, 2), p(1, 1)));
        assert_eq!(Edge::new(p(1, 1), p(2, 2)), None);
    }

    #[test]
    fn shared_sides() {
        // Cells (0,0) and (1,0) share the vertical edge x = 1
        assert_eq!(
            Edge::between_cells(p(1, 0), p(0, 0)),
            Edge::new(p(1, 0), p(1, 1))
        );
        // Cells (2,1) and (2,2) share the horizontal edge y = 2
        assert_eq!(
            Edge::between_cells(p(2, 1), p(2, 2)),
            Edge::new(p(2, 2), p(3, 2))
        );
        assert_eq!(Edge::between_cells(p(0, 0), p(1, 1)), None);
    }

    #[test]
    fn path_edges() {
        let path = [p(0, 2), p(1, 2), p(1, 1), p(1, 0)];
        let edges = Edges::from_path(&path);
        assert_eq!(edges.len(), 3);
        assert!(edges.contains(p(1, 1), p(1, 2)));
        // The vertical run at x = 1 separates column 0 from column 1
        assert!(edges.separates(p(0, 0), p(1, 0)));
        assert!(edges.separates(p(0, 1), p(1, 1)));
        assert!(!edges.separates(p(0, 0), p(0, 1)));
        // Cell (0,1) has its bottom and right sides drawn
        assert_eq!(edges.count_around(p(0, 1)), 2);
        assert_eq!(edges.count_around(p(1, 1)), 1);
        assert_eq!(edges.count_around(p(1, 0)), 1);
    }
}
