/*
path.rs

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

//! Path traced over the grid nodes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::grid::Point;

/// Path object.
///
/// Serialized as the plain list of its points.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
#[serde(from = "Vec<Point>", into = "Vec<Point>")]
pub struct Path {
    /// Path as an ordered list of nodes.
    path: Vec<Point>,

    /// Stores the visited status of the nodes.
    /// Instead of looking for the node in the [`Path::path`] vector, this
    /// [`std::collections::HashSet`] speeds up the lookup.
    visited: HashSet<Point>,
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl From<Vec<Point>> for Path {
    fn from(points: Vec<Point>) -> Self {
        Self::from_points(&points)
    }
}

impl From<Path> for Vec<Point> {
    fn from(path: Path) -> Self {
        path.path
    }
}

impl Path {
    /// Create an empty [`Path`] object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`Path`] object from a list of points.
    pub fn from_points(points: &[Point]) -> Self {
        Self {
            path: points.to_vec(),
            visited: points.iter().copied().collect(),
        }
    }

    /// Remove all the nodes from the path.
    pub fn clear(&mut self) {
        self.path.clear();
        self.visited.clear();
    }

    /// Add a node to the path.
    pub fn push(&mut self, point: Point) {
        self.path.push(point);
        self.visited.insert(point);
    }

    /// Remove the last node from the path.
    pub fn pop(&mut self) -> Option<Point> {
        let point: Point = self.path.pop()?;
        // Only a path built with from_points() can hold the same point twice
        if !self.path.contains(&point) {
            self.visited.remove(&point);
        }
        Some(point)
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether the node is in the path or not.
    pub fn contains(&self, point: Point) -> bool {
        self.visited.contains(&point)
    }

    /// Return the path as a slice of points.
    pub fn get(&self) -> &[Point] {
        &self.path
    }

    pub fn get_last(&self) -> Option<Point> {
        self.path.last().copied()
    }

    /// Return the node before the last one.
    pub fn get_previous(&self) -> Option<Point> {
        let l: usize = self.path.len();
        if l >= 2 { Some(self.path[l - 2]) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_and_lookup() {
        let mut path = Path::new();
        path.push(Point::new(0, 0));
        path.push(Point::new(1, 0));
        assert!(path.contains(Point::new(1, 0)));
        assert_eq!(path.get_previous(), Some(Point::new(0, 0)));
        assert_eq!(path.pop(), Some(Point::new(1, 0)));
        assert!(!path.contains(Point::new(1, 0)));
        assert_eq!(path.get_previous(), None);
        assert_eq!(path.get_last(), Some(Point::new(0, 0)));
    }

    #[test]
    fn popping_a_repeated_point_keeps_it_visited() {
        let points: Vec<Point> = [(0, 0), (1, 0), (0, 0)].into_iter().map(Point::from).collect();
        let mut path = Path::from_points(&points);
        path.pop();
        assert!(path.contains(Point::new(0, 0)));
        path.pop();
        assert!(!path.contains(Point::new(1, 0)));
    }

    #[test]
    fn serializes_as_point_list() {
        let path = Path::from_points(&[Point::new(0, 1), Point::new(0, 2)]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"[{"x":0,"y":1},{"x":0,"y":2}]"#);
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(back.contains(Point::new(0, 2)));
    }
}
