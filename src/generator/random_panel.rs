/*
random_panel.rs

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

//! Generate a random panel.
//!
//! The generator places the endpoints, sprinkles wall nodes with a density that grows with the
//! difficulty, and then places `floor(2 × difficulty + U[0, 3))` symbols.
//! Each symbol gets a bounded number of placement attempts. When they all land on a taken
//! position, the symbol is skipped, so the generation always terminates.
//!
//! The generated panels are not guaranteed to be solvable.

use log::debug;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Instant;
use thiserror::Error;

use super::grid::{self, CellType, Grid, GridError, Point};
use super::panel::{MAX_DIFFICULTY, MIN_DIFFICULTY, Panel};
use super::symbols::{Color, Space, Symbol, SymbolKind};
use crate::config::{EndpointPolicy, GeneratorConfig};

/// Number of symbol kinds drawn when the extended symbols are disabled (dot, square, hexagon).
const BASIC_KINDS: u8 = 3;

/// Number of symbol kinds drawn when the extended symbols are enabled.
const EXTENDED_KINDS: u8 = 5;

/// Type of errors.
#[derive(Error, Debug, PartialEq)]
pub enum GenerateError {
    #[error("grid dimensions {width}x{height} are outside {min}..={max}")]
    InvalidSize {
        width: usize,
        height: usize,
        min: usize,
        max: usize,
    },

    #[error("difficulty {0} is outside 1..=10")]
    InvalidDifficulty(u8),

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Proportion of wall nodes for the given difficulty.
pub fn wall_density(difficulty: u8) -> f64 {
    (0.1 + 0.05 * (f64::from(difficulty) - 1.0)).min(0.3)
}

/// [`RandomPanel`] object.
pub struct RandomPanel {
    /// Generator settings.
    config: GeneratorConfig,

    /// Random number generator. Seeded for reproducible panels.
    rng: StdRng,

    /// Number of placement attempts it took to generate the last panel.
    pub attempts: usize,

    /// Number of symbols that could not be placed in the last panel.
    pub skipped: usize,

    /// Duration in seconds it took to generate the last panel.
    pub duration: f32,
}

impl RandomPanel {
    /// Create the object, seeded from the thread-local generator.
    pub fn new(config: &GeneratorConfig) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }

    /// Create the object with a fixed seed. The same seed and parameters produce the same panel.
    pub fn with_seed(config: &GeneratorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GeneratorConfig, rng: StdRng) -> Self {
        Self {
            config: config.clone(),
            rng,
            attempts: 0,
            skipped: 0,
            duration: 0.0,
        }
    }

    /// Generate and return a random panel.
    ///
    /// # Errors
    ///
    /// The method returns an error if the dimensions are outside the configured range, or if
    /// the difficulty is outside 1..=10. No partial panel is produced in that case.
    pub fn generate(
        &mut self,
        width: usize,
        height: usize,
        difficulty: u8,
    ) -> Result<Panel, GenerateError> {
        let (min, max): (usize, usize) = (self.config.min_size, self.config.max_size);
        if !(min..=max).contains(&width) || !(min..=max).contains(&height) {
            return Err(GenerateError::InvalidSize {
                width,
                height,
                min,
                max,
            });
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(GenerateError::InvalidDifficulty(difficulty));
        }

        let start: Instant = Instant::now();
        self.attempts = 0;
        self.skipped = 0;

        let (start_node, end_node): (Point, Point) = self.pick_endpoints(width, height);
        let mut grid: Grid = Grid::new(width, height, start_node, end_node)?;

        let density: f64 = wall_density(difficulty);
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let point: Point = Point::new(x, y);
                if point != start_node && point != end_node && self.rng.random_bool(density) {
                    grid.set_wall(point)?;
                }
            }
        }

        let count: usize =
            (2.0 * f64::from(difficulty) + self.rng.random_range(0.0..3.0)).floor() as usize;
        let symbols: Vec<Symbol> = self.place_symbols(&grid, count);

        self.duration = start.elapsed().as_secs_f32();
        debug!(
            "Panel {width}x{height} difficulty {difficulty}: {} symbol(s) placed, {} skipped, {} attempt(s), {} s",
            symbols.len(),
            self.skipped,
            self.attempts,
            self.duration
        );
        grid.debug();

        Ok(Panel::new(grid, symbols, difficulty))
    }

    /// Select the start and end nodes according to the configured policy.
    fn pick_endpoints(&mut self, width: usize, height: usize) -> (Point, Point) {
        match self.config.endpoints {
            EndpointPolicy::Corners => (
                Point::new(0, 0),
                Point::new(width as i32 - 1, height as i32 - 1),
            ),
            EndpointPolicy::Border => {
                let border: Vec<Point> = grid::border_nodes(width, height);
                let i: usize = self.rng.random_range(0..border.len());
                let mut j: usize = self.rng.random_range(0..border.len() - 1);
                if j >= i {
                    j += 1;
                }
                (border[i], border[j])
            }
        }
    }

    /// Place up to `count` symbols. Positions are never shared between two symbols.
    fn place_symbols(&mut self, grid: &Grid, count: usize) -> Vec<Symbol> {
        let num_kinds: u8 = if self.config.extended_symbols {
            EXTENDED_KINDS
        } else {
            BASIC_KINDS
        };
        let mut taken_nodes: HashSet<Point> = HashSet::new();
        let mut taken_cells: HashSet<Point> = HashSet::new();
        let mut symbols: Vec<Symbol> = Vec::with_capacity(count);

        for _ in 0..count {
            let kind: SymbolKind = SymbolKind::from_repr(self.rng.random_range(0..num_kinds))
                .unwrap_or(SymbolKind::Dot);
            let mut placed: bool = false;

            for _ in 0..self.config.max_placement_attempts {
                self.attempts += 1;
                let position: Point = match kind.space() {
                    Space::Node => Point::new(
                        self.rng.random_range(0..grid.width() as i32),
                        self.rng.random_range(0..grid.height() as i32),
                    ),
                    Space::Cell => Point::new(
                        self.rng.random_range(0..grid.cell_width() as i32),
                        self.rng.random_range(0..grid.cell_height() as i32),
                    ),
                };
                let free: bool = match kind.space() {
                    Space::Node => {
                        grid.get_cell(position) == Ok(CellType::Empty)
                            && !taken_nodes.contains(&position)
                    }
                    Space::Cell => !taken_cells.contains(&position),
                };
                if !free {
                    continue;
                }

                match kind.space() {
                    Space::Node => taken_nodes.insert(position),
                    Space::Cell => taken_cells.insert(position),
                };
                let symbol: Symbol = self.build_symbol(kind, position);
                debug!("Placed {symbol}");
                symbols.push(symbol);
                placed = true;
                break;
            }

            if !placed {
                debug!("No free position for a {kind:?} symbol, skipping it");
                self.skipped += 1;
            }
        }
        symbols
    }

    fn build_symbol(&mut self, kind: SymbolKind, position: Point) -> Symbol {
        match kind {
            SymbolKind::Dot => Symbol::Dot { position },
            SymbolKind::Hexagon => Symbol::Hexagon { position },
            SymbolKind::Square => Symbol::Square {
                position,
                color: self.random_color(),
            },
            SymbolKind::Star => Symbol::Star {
                position,
                color: self.random_color(),
            },
            SymbolKind::Triangle => Symbol::Triangle {
                position,
                value: self.rng.random_range(1..=3),
            },
        }
    }

    fn random_color(&mut self) -> Color {
        *Color::GENERATED
            .choose(&mut self.rng)
            .unwrap_or(&Color::Black)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn density_grows_then_caps() {
        assert!((wall_density(1) - 0.1).abs() < 1e-9);
        assert!((wall_density(3) - 0.2).abs() < 1e-9);
        assert!((wall_density(5) - 0.3).abs() < 1e-9);
        assert!((wall_density(10) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn corners_policy() {
        let mut generator = RandomPanel::with_seed(&GeneratorConfig::default(), 7);
        let panel = generator.generate(5, 5, 3).unwrap();
        assert_eq!(panel.start(), Point::new(0, 0));
        assert_eq!(panel.end(), Point::new(4, 4));
        assert_eq!(panel.difficulty, 3);
        assert!(panel.check().is_ok());
    }

    #[test]
    fn invalid_arguments() {
        let mut generator = RandomPanel::with_seed(&GeneratorConfig::default(), 1);
        assert!(matches!(
            generator.generate(2, 5, 1),
            Err(GenerateError::InvalidSize { width: 2, .. })
        ));
        assert!(matches!(
            generator.generate(5, 21, 1),
            Err(GenerateError::InvalidSize { height: 21, .. })
        ));
        assert_eq!(
            generator.generate(5, 5, 0),
            Err(GenerateError::InvalidDifficulty(0))
        );
        assert_eq!(
            generator.generate(5, 5, 11),
            Err(GenerateError::InvalidDifficulty(11))
        );
    }

    #[test]
    fn same_seed_same_panel() {
        let config = GeneratorConfig {
            endpoints: EndpointPolicy::Border,
            extended_symbols: true,
            ..GeneratorConfig::default()
        };
        let a = RandomPanel::with_seed(&config, 42).generate(7, 6, 6).unwrap();
        let b = RandomPanel::with_seed(&config, 42).generate(7, 6, 6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn tiny_grid_skips_what_does_not_fit() {
        // A 3x3 grid has 4 cells and at most 7 free nodes, far fewer than 20+ symbols
        let mut generator = RandomPanel::with_seed(&GeneratorConfig::default(), 3);
        let panel = generator.generate(3, 3, 10).unwrap();
        assert!(panel.symbols.len() <= 4 + 7);
        assert!(generator.skipped > 0);
        // 2 × 10 + U[0, 3) is in 20..=22
        assert!((20..=22).contains(&(panel.symbols.len() + generator.skipped)));
        assert!(panel.check().is_ok());
    }

    proptest! {
        #[test]
        fn generated_panels_are_consistent(
            seed in any::<u64>(),
            width in 3usize..=12,
            height in 3usize..=12,
            difficulty in 1u8..=10,
            border in any::<bool>(),
            extended in any::<bool>(),
        ) {
            let config = GeneratorConfig {
                endpoints: if border { EndpointPolicy::Border } else { EndpointPolicy::Corners },
                extended_symbols: extended,
                ..GeneratorConfig::default()
            };
            let mut generator = RandomPanel::with_seed(&config, seed);
            let panel = generator.generate(width, height, difficulty).unwrap();

            prop_assert!(panel.check().is_ok());
            prop_assert!(panel.grid.is_on_border(panel.start()));
            prop_assert!(panel.grid.is_on_border(panel.end()));
            prop_assert_ne!(panel.start(), panel.end());
            prop_assert!(panel.symbols.len() <= 2 * difficulty as usize + 2);
            if !extended {
                let basic: bool = panel.symbols.iter().all(|s| matches!(
                    s,
                    Symbol::Dot { .. } | Symbol::Square { .. } | Symbol::Hexagon { .. }
                ));
                prop_assert!(basic, "star or triangle generated without the extended symbols");
            }
            for s in &panel.symbols {
                if let Some(c) = s.color() {
                    prop_assert!(Color::GENERATED.contains(&c));
                }
            }
        }
    }
}
