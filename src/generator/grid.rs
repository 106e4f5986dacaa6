/*
grid.rs

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

//! Nodes and cells of the panel lattice.
//!
//! A grid of `width × height` nodes delimits `(width - 1) × (height - 1)` cells.
//! Path vertices live on nodes. A cell is referenced by the coordinates of its top-left node.
//!
//! Each node is classified as empty, wall, start, or end.
//! The path can never step onto a wall node.

use log::{Level, debug, log_enabled};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Smallest number of nodes along one axis. Below that there are no cells.
pub const MIN_NODES: usize = 2;

/// Integer coordinates of a node, or of a cell's top-left node.
#[derive(
    Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a [`Point`] object.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two points.
    pub fn distance(&self, other: &Point) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Whether the two points differ by one unit along exactly one axis.
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.distance(other) == 1
    }

    /// The four axis neighbors, in up, down, left, right order.
    pub fn neighbors(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y - 1),
            Point::new(self.x, self.y + 1),
            Point::new(self.x - 1, self.y),
            Point::new(self.x + 1, self.y),
        ]
    }
}

impl From<(i32, i32)> for Point {
    fn from(p: (i32, i32)) -> Self {
        Point::new(p.0, p.1)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Classification of a grid node.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Empty,
    Wall,
    Start,
    End,
}

/// Grid construction and lookup errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("point {0} is outside the grid")]
    OutOfBounds(Point),

    #[error("grid dimensions {width}x{height} are not supported")]
    InvalidSize { width: usize, height: usize },

    #[error("the {0} node {1} is not on the grid border")]
    NotOnBorder(&'static str, Point),

    #[error("the start and end nodes are both at {0}")]
    SameEndpoints(Point),

    #[error("cannot place a wall on the endpoint {0}")]
    WallOnEndpoint(Point),

    #[error("the node classification does not match the {width}x{height} grid")]
    MalformedCells { width: usize, height: usize },

    #[error("the node {0} is marked as {1:?} but is not that endpoint")]
    StrayMarker(Point, CellType),
}

/// Static lattice of a panel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Grid {
    /// Number of nodes on each row.
    width: usize,

    /// Number of nodes on each column.
    height: usize,

    /// Node where the path starts.
    start: Point,

    /// Node where the path ends.
    end: Point,

    /// Node classification, indexed by row (`cells[y][x]`).
    cells: Vec<Vec<CellType>>,
}

impl Grid {
    /// Create a [`Grid`] object without walls.
    ///
    /// # Errors
    ///
    /// The method returns an error when the dimensions are too small, or when the start and end
    /// nodes are not distinct border nodes.
    pub fn new(width: usize, height: usize, start: Point, end: Point) -> Result<Self, GridError> {
        if width < MIN_NODES || height < MIN_NODES || width > i32::MAX as usize {
            return Err(GridError::InvalidSize { width, height });
        }
        let mut cells: Vec<Vec<CellType>> = vec![vec![CellType::Empty; width]; height];
        let grid: Grid = Self {
            width,
            height,
            start,
            end,
            cells: Vec::new(),
        };
        grid.check_endpoints()?;

        cells[start.y as usize][start.x as usize] = CellType::Start;
        cells[end.y as usize][end.x as usize] = CellType::End;
        Ok(Self { cells, ..grid })
    }

    /// Turn the given node into a wall.
    ///
    /// # Errors
    ///
    /// The start and end nodes cannot become walls, and the node must be inside the grid.
    pub fn set_wall(&mut self, point: Point) -> Result<(), GridError> {
        match self.get_cell(point)? {
            CellType::Start | CellType::End => Err(GridError::WallOnEndpoint(point)),
            _ => {
                self.cells[point.y as usize][point.x as usize] = CellType::Wall;
                Ok(())
            }
        }
    }

    /// Verify the invariants of a grid, typically one that has been deserialized.
    pub fn check(&self) -> Result<(), GridError> {
        if self.width < MIN_NODES || self.height < MIN_NODES || self.width > i32::MAX as usize {
            return Err(GridError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.cells.len() != self.height || self.cells.iter().any(|r| r.len() != self.width) {
            return Err(GridError::MalformedCells {
                width: self.width,
                height: self.height,
            });
        }
        self.check_endpoints()?;

        for (point, cell_type) in self.iter() {
            let expected: bool = match cell_type {
                CellType::Start => point == self.start,
                CellType::End => point == self.end,
                CellType::Empty | CellType::Wall => point != self.start && point != self.end,
            };
            if !expected {
                return Err(GridError::StrayMarker(point, cell_type));
            }
        }
        Ok(())
    }

    fn check_endpoints(&self) -> Result<(), GridError> {
        if !self.is_on_border(self.start) {
            return Err(GridError::NotOnBorder("start", self.start));
        }
        if !self.is_on_border(self.end) {
            return Err(GridError::NotOnBorder("end", self.end));
        }
        if self.start == self.end {
            return Err(GridError::SameEndpoints(self.start));
        }
        Ok(())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Number of cells on each row.
    pub fn cell_width(&self) -> usize {
        self.width - 1
    }

    /// Number of cells on each column.
    pub fn cell_height(&self) -> usize {
        self.height - 1
    }

    /// Whether the node is inside the grid.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width
            && (point.y as usize) < self.height
    }

    /// Whether the cell (referenced by its top-left node) is inside the grid.
    pub fn contains_cell(&self, cell: Point) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.cell_width()
            && (cell.y as usize) < self.cell_height()
    }

    /// Return the classification of the node.
    pub fn get_cell(&self, point: Point) -> Result<CellType, GridError> {
        if self.contains(point) {
            Ok(self.cells[point.y as usize][point.x as usize])
        } else {
            Err(GridError::OutOfBounds(point))
        }
    }

    /// Whether the node is a wall. Nodes outside the grid are not walls.
    pub fn is_wall(&self, point: Point) -> bool {
        matches!(self.get_cell(point), Ok(CellType::Wall))
    }

    /// Whether the node lies on the outer border of the grid.
    pub fn is_on_border(&self, point: Point) -> bool {
        self.contains(point)
            && (point.x == 0
                || point.y == 0
                || point.x as usize == self.width - 1
                || point.y as usize == self.height - 1)
    }

    /// Whether two nodes of the grid are joined by a grid edge.
    pub fn is_adjacent(&self, p1: Point, p2: Point) -> bool {
        self.contains(p1) && self.contains(p2) && p1.is_adjacent(&p2)
    }

    /// All the nodes on the border, clockwise from the top-left corner.
    pub fn border_nodes(&self) -> Vec<Point> {
        border_nodes(self.width, self.height)
    }

    /// Iterate over the wall nodes.
    pub fn walls(&self) -> impl Iterator<Item = Point> + '_ {
        self.iter()
            .filter(|(_, t)| *t == CellType::Wall)
            .map(|(p, _)| p)
    }

    /// Iterate over the nodes and their classification, row by row.
    pub fn iter(&self) -> GridIterator<'_> {
        GridIterator {
            grid: self,
            x: 0,
            y: 0,
        }
    }

    /// Print the grid when debug logging is enabled.
    pub fn debug(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        debug!("Grid {}x{}", self.width, self.height);
        let mut s: String = String::new();
        for row in &self.cells {
            s.clear();
            for cell_type in row {
                s.push_str(match cell_type {
                    CellType::Empty => " . ",
                    CellType::Wall => " # ",
                    CellType::Start => " S ",
                    CellType::End => " E ",
                });
            }
            debug!("{s}");
        }
    }
}

/// Return the border nodes of a `width × height` grid, clockwise from the top-left corner.
pub fn border_nodes(width: usize, height: usize) -> Vec<Point> {
    let w: i32 = width as i32;
    let h: i32 = height as i32;
    let mut nodes: Vec<Point> = Vec::with_capacity(2 * (width + height));

    nodes.extend((0..w).map(|x| Point::new(x, 0)));
    nodes.extend((1..h).map(|y| Point::new(w - 1, y)));
    nodes.extend((0..w - 1).rev().map(|x| Point::new(x, h - 1)));
    nodes.extend((1..h - 1).rev().map(|y| Point::new(0, y)));
    nodes
}

/// Iterator over the nodes of a [`Grid`].
pub struct GridIterator<'a> {
    grid: &'a Grid,
    x: usize,
    y: usize,
}

impl Iterator for GridIterator<'_> {
    type Item = (Point, CellType);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.grid.width {
            self.x = 0;
            self.y += 1;
        }
        if self.y >= self.grid.height {
            return None;
        }

        let result: (Point, CellType) = (
            Point::new(self.x as i32, self.y as i32),
            self.grid.cells[self.y][self.x],
        );
        self.x += 1;
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid5() -> Grid {
        Grid::new(5, 5, Point::new(0, 4), Point::new(4, 0)).unwrap()
    }

    #[test]
    fn border_test() {
        let grid = grid5();
        assert!(grid.is_on_border(Point::new(0, 2)));
        assert!(grid.is_on_border(Point::new(4, 4)));
        assert!(grid.is_on_border(Point::new(2, 0)));
        assert!(!grid.is_on_border(Point::new(2, 2)));
        assert!(!grid.is_on_border(Point::new(5, 0)));
        assert!(!grid.is_on_border(Point::new(-1, 0)));
    }

    #[test]
    fn endpoints_must_be_distinct_border_nodes() {
        assert_eq!(
            Grid::new(5, 5, Point::new(2, 2), Point::new(4, 0)),
            Err(GridError::NotOnBorder("start", Point::new(2, 2)))
        );
        assert_eq!(
            Grid::new(5, 5, Point::new(0, 0), Point::new(0, 0)),
            Err(GridError::SameEndpoints(Point::new(0, 0)))
        );
        assert!(matches!(
            Grid::new(1, 5, Point::new(0, 0), Point::new(0, 4)),
            Err(GridError::InvalidSize { .. })
        ));
    }

    #[test]
    fn markers_and_walls() {
        let mut grid = grid5();
        assert_eq!(grid.get_cell(Point::new(0, 4)), Ok(CellType::Start));
        assert_eq!(grid.get_cell(Point::new(4, 0)), Ok(CellType::End));
        assert_eq!(
            grid.set_wall(Point::new(0, 4)),
            Err(GridError::WallOnEndpoint(Point::new(0, 4)))
        );
        grid.set_wall(Point::new(1, 1)).unwrap();
        assert!(grid.is_wall(Point::new(1, 1)));
        assert_eq!(grid.walls().collect::<Vec<_>>(), vec![Point::new(1, 1)]);
        assert_eq!(
            grid.get_cell(Point::new(7, 1)),
            Err(GridError::OutOfBounds(Point::new(7, 1)))
        );
        assert!(grid.check().is_ok());
    }

    #[test]
    fn adjacency() {
        let grid = grid5();
        assert!(grid.is_adjacent(Point::new(1, 1), Point::new(1, 2)));
        assert!(!grid.is_adjacent(Point::new(1, 1), Point::new(2, 2)));
        assert!(!grid.is_adjacent(Point::new(4, 1), Point::new(5, 1)));
    }

    #[test]
    fn border_nodes_are_unique_and_complete() {
        let grid = Grid::new(4, 3, Point::new(0, 0), Point::new(3, 2)).unwrap();
        let mut nodes = grid.border_nodes();
        assert_eq!(nodes.len(), 10);
        assert!(nodes.iter().all(|p| grid.is_on_border(*p)));
        nodes.sort();
        nodes.dedup();
        assert_eq!(nodes.len(), 10);
    }

    #[test]
    fn check_detects_stray_markers() {
        let grid = grid5();
        let mut json: serde_json::Value = serde_json::to_value(&grid).unwrap();
        json["cells"][2][2] = serde_json::Value::String("start".to_string());
        let broken: Grid = serde_json::from_value(json).unwrap();
        assert_eq!(
            broken.check(),
            Err(GridError::StrayMarker(Point::new(2, 2), CellType::Start))
        );
    }
}
