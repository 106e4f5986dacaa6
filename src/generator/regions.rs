/*
regions.rs

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

//! Split the grid cells into regions delimited by a path.
//!
//! The edges of the path are walls between the two cells they separate.
//! A breadth-first flood fill over the 4-connected cells gives each connected group of cells
//! its own region ID. The ID values have no meaning: only the partition they induce matters,
//! which is what [`Regions::partition`] returns.

use log::debug;
use std::collections::{BTreeSet, VecDeque};

use super::edges::Edges;
use super::grid::{Grid, Point};

/// Marker for cells that the flood fill has not reached yet.
const UNLABELED: usize = usize::MAX;

/// Region labeling of the grid cells.
#[derive(Debug, Clone)]
pub struct Regions {
    /// Number of cells on each row.
    width: usize,

    /// Number of cells on each column.
    height: usize,

    /// Region ID of each cell, row by row.
    labels: Vec<usize>,

    /// Number of regions.
    count: usize,
}

/// Compute the regions that the path draws on the grid.
pub fn decompose(grid: &Grid, path: &[Point]) -> Regions {
    decompose_with_edges(grid, &Edges::from_path(path))
}

/// Compute the regions delimited by the given edges.
pub fn decompose_with_edges(grid: &Grid, edges: &Edges) -> Regions {
    let width: usize = grid.cell_width();
    let height: usize = grid.cell_height();
    let mut labels: Vec<usize> = vec![UNLABELED; width * height];
    let mut queue: VecDeque<Point> = VecDeque::with_capacity(width * height);
    let mut count: usize = 0;

    for y in 0..height {
        for x in 0..width {
            if labels[y * width + x] != UNLABELED {
                continue;
            }

            labels[y * width + x] = count;
            queue.push_back(Point::new(x as i32, y as i32));

            while let Some(cell) = queue.pop_front() {
                for neighbor in cell.neighbors() {
                    if !grid.contains_cell(neighbor) {
                        continue;
                    }
                    let i: usize = neighbor.y as usize * width + neighbor.x as usize;
                    if labels[i] == UNLABELED && !edges.separates(cell, neighbor) {
                        labels[i] = count;
                        queue.push_back(neighbor);
                    }
                }
            }
            count += 1;
        }
    }
    debug!("{count} region(s) over {width}x{height} cells");

    Regions {
        width,
        height,
        labels,
        count,
    }
}

impl Regions {
    /// Return the region ID of the cell, or None if the cell is outside the grid.
    pub fn region_of(&self, cell: Point) -> Option<usize> {
        if cell.x < 0
            || cell.y < 0
            || cell.x as usize >= self.width
            || cell.y as usize >= self.height
        {
            return None;
        }
        Some(self.labels[cell.y as usize * self.width + cell.x as usize])
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Return the cells of the given region.
    pub fn cells(&self, region: usize) -> Vec<Point> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, r)| **r == region)
            .map(|(i, _)| Point::new((i % self.width) as i32, (i / self.width) as i32))
            .collect()
    }

    /// Return the partition of the cells, independent from the region IDs.
    pub fn partition(&self) -> BTreeSet<BTreeSet<Point>> {
        (0..self.count)
            .map(|r| self.cells(r).into_iter().collect())
            .collect()
    }

    /// Whether the two labelings describe the same partition.
    pub fn same_partition(&self, other: &Regions) -> bool {
        self.partition() == other.partition()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn points(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().copied().map(Point::from).collect()
    }

    fn grid5() -> Grid {
        Grid::new(5, 5, Point::new(0, 4), Point::new(4, 0)).unwrap()
    }

    #[test]
    fn border_path_leaves_a_single_region() {
        let grid = grid5();
        let path = points(&[
            (0, 4),
            (1, 4),
            (2, 4),
            (3, 4),
            (4, 4),
            (4, 3),
            (4, 2),
            (4, 1),
            (4, 0),
        ]);
        let regions = decompose(&grid, &path);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions.cells(0).len(), 16);
    }

    #[test]
    fn staircase_splits_the_corners() {
        let grid = grid5();
        let path = points(&[
            (0, 4),
            (0, 3),
            (1, 3),
            (1, 2),
            (2, 2),
            (2, 1),
            (3, 1),
            (3, 0),
            (4, 0),
        ]);
        let regions = decompose(&grid, &path);
        assert_eq!(regions.len(), 2);
        let top_left = regions.region_of(Point::new(0, 0)).unwrap();
        let bottom_right = regions.region_of(Point::new(3, 3)).unwrap();
        assert_ne!(top_left, bottom_right);

        let expected: BTreeSet<Point> = points(&[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (0, 2)])
            .into_iter()
            .collect();
        assert!(regions.partition().contains(&expected));
    }

    #[test]
    fn same_path_gives_the_same_partition() {
        let grid = grid5();
        let path = points(&[(0, 4), (1, 4), (1, 3), (1, 2), (1, 1), (1, 0), (2, 0), (3, 0), (4, 0)]);
        let first = decompose(&grid, &path);
        let reversed: Vec<Point> = path.iter().rev().copied().collect();
        let second = decompose(&grid, &reversed);
        assert!(first.same_partition(&second));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn outside_cells_have_no_region() {
        let regions = decompose(&grid5(), &[]);
        assert_eq!(regions.region_of(Point::new(4, 0)), None);
        assert_eq!(regions.region_of(Point::new(-1, 0)), None);
        assert_eq!(regions.region_of(Point::new(3, 3)), Some(0));
    }

    /// Self-avoiding walk from the bottom-left corner, one direction per step.
    fn walk(grid: &Grid, directions: &[u8]) -> Vec<Point> {
        let mut path = vec![grid.start()];
        for d in directions {
            let Some(last) = path.last().copied() else {
                break;
            };
            let next = last.neighbors()[usize::from(*d % 4)];
            if grid.contains(next) && !path.contains(&next) {
                path.push(next);
            }
        }
        path
    }

    proptest! {
        #[test]
        fn partition_depends_only_on_the_drawn_edges(
            width in 2usize..=9,
            height in 2usize..=9,
            directions in prop::collection::vec(0u8..4, 0..120),
        ) {
            let grid = Grid::new(
                width,
                height,
                Point::new(0, height as i32 - 1),
                Point::new(width as i32 - 1, 0),
            )
            .unwrap();
            let path = walk(&grid, &directions);
            let reversed: Vec<Point> = path.iter().rev().copied().collect();

            let first = decompose(&grid, &path);
            let again = decompose(&grid, &path);
            let backward = decompose(&grid, &reversed);
            prop_assert!(first.same_partition(&again));
            prop_assert!(first.same_partition(&backward));

            // Every cell belongs to exactly one region
            let total: usize = first.partition().iter().map(|r| r.len()).sum();
            prop_assert_eq!(total, grid.cell_width() * grid.cell_height());
            prop_assert!(!first.is_empty());
        }
    }
}
