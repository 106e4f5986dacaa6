/*
validator.rs

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

//! Decide whether a traced path solves a panel.
//!
//! The verdict is the conjunction of a list of [`Rule`] objects, applied in order:
//!
//! 1. [`EndpointRule`]: the path starts on the start node and ends on the end node.
//! 2. [`ConnectivityRule`]: the path stays inside the grid, moves one unit at a time along an
//!    axis, never steps onto a wall node, and never goes through the same node twice.
//! 3. [`MustVisitRule`]: the path goes through every dot and hexagon.
//! 4. [`SeparationRule`]: no region holds squares of two different colors.
//! 5. [`TriangleRule`]: the path draws as many sides of a triangle's cell as its value.
//! 6. [`StarRule`]: a star shares its region with exactly one other symbol of its color.
//!
//! The first failing rule stops the validation. An invalid solution is a normal outcome, not an
//! error: [`validate`] returns `false`, and [`check`] returns the [`Violation`] for logging.
//!
//! The regions are only computed when a rule asks for them.

use log::debug;
use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::generator::edges::Edges;
use crate::generator::grid::Point;
use crate::generator::panel::Panel;
use crate::generator::regions::{self, Regions};
use crate::generator::symbols::{Color, Symbol};

/// Reason why a path is not a solution.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("the path has fewer than two points")]
    TooShort,

    #[error("the path starts at {found} instead of {expected}")]
    WrongStart { expected: Point, found: Point },

    #[error("the path ends at {found} instead of {expected}")]
    WrongEnd { expected: Point, found: Point },

    #[error("the node {0} is outside the grid")]
    OutOfBounds(Point),

    #[error("the nodes {0} and {1} are not adjacent")]
    NotAdjacent(Point, Point),

    #[error("the path steps onto the wall node {0}")]
    Wall(Point),

    #[error("the path goes through {0} twice")]
    Revisit(Point),

    #[error("the path misses the {0}")]
    Missed(Symbol),

    #[error("the region of the cell {0} holds both {1} and {2} squares")]
    MixedColors(Point, Color, Color),

    #[error("the triangle at {0} expects {1} edge(s) but the path draws {2}")]
    Triangle(Point, u8, usize),

    #[error("the {1} star at {0} has {2} companion(s) in its region instead of one")]
    Star(Point, Color, usize),
}

/// Data shared by the rules during one validation.
pub struct RuleContext<'a> {
    pub panel: &'a Panel,
    pub path: &'a [Point],

    /// Edges drawn by the path.
    edges: Edges,

    /// Regions, computed on first use.
    regions: OnceCell<Regions>,
}

impl<'a> RuleContext<'a> {
    pub fn new(panel: &'a Panel, path: &'a [Point]) -> Self {
        Self {
            panel,
            path,
            edges: Edges::from_path(path),
            regions: OnceCell::new(),
        }
    }

    pub fn edges(&self) -> &Edges {
        &self.edges
    }

    /// Return the regions that the path draws on the panel grid.
    pub fn regions(&self) -> &Regions {
        self.regions
            .get_or_init(|| regions::decompose_with_edges(&self.panel.grid, &self.edges))
    }
}

/// Predicate over a path, the panel, and the regions.
pub trait Rule {
    /// Short name, for the logs.
    fn name(&self) -> &'static str;

    /// Return the first violation of the rule, if any.
    fn check(&self, ctx: &RuleContext) -> Result<(), Violation>;
}

pub struct EndpointRule;

impl Rule for EndpointRule {
    fn name(&self) -> &'static str {
        "endpoint"
    }

    fn check(&self, ctx: &RuleContext) -> Result<(), Violation> {
        let (first, last): (Point, Point) = match (ctx.path.first(), ctx.path.last()) {
            (Some(f), Some(l)) => (*f, *l),
            _ => return Err(Violation::TooShort),
        };
        if first != ctx.panel.start() {
            return Err(Violation::WrongStart {
                expected: ctx.panel.start(),
                found: first,
            });
        }
        if last != ctx.panel.end() {
            return Err(Violation::WrongEnd {
                expected: ctx.panel.end(),
                found: last,
            });
        }
        Ok(())
    }
}

pub struct ConnectivityRule;

impl Rule for ConnectivityRule {
    fn name(&self) -> &'static str {
        "connectivity"
    }

    fn check(&self, ctx: &RuleContext) -> Result<(), Violation> {
        let mut visited: HashSet<Point> = HashSet::with_capacity(ctx.path.len());
        let mut previous: Option<Point> = None;

        for &point in ctx.path {
            if !ctx.panel.grid.contains(point) {
                return Err(Violation::OutOfBounds(point));
            }
            if let Some(p) = previous
                && !p.is_adjacent(&point)
            {
                return Err(Violation::NotAdjacent(p, point));
            }
            if ctx.panel.grid.is_wall(point) {
                return Err(Violation::Wall(point));
            }
            if !visited.insert(point) {
                return Err(Violation::Revisit(point));
            }
            previous = Some(point);
        }
        Ok(())
    }
}

/// Dots and hexagons must be on the path.
pub struct MustVisitRule;

impl Rule for MustVisitRule {
    fn name(&self) -> &'static str {
        "must-visit"
    }

    fn check(&self, ctx: &RuleContext) -> Result<(), Violation> {
        let on_path: HashSet<Point> = ctx.path.iter().copied().collect();
        match ctx
            .panel
            .must_visit()
            .find(|s| !on_path.contains(&s.position()))
        {
            Some(s) => Err(Violation::Missed(*s)),
            None => Ok(()),
        }
    }
}

/// Squares of different colors must end up in different regions.
pub struct SeparationRule;

impl Rule for SeparationRule {
    fn name(&self) -> &'static str {
        "separation"
    }

    fn check(&self, ctx: &RuleContext) -> Result<(), Violation> {
        let squares: Vec<(Point, Color)> = ctx
            .panel
            .symbols
            .iter()
            .filter_map(|s| match s {
                Symbol::Square { position, color } => Some((*position, *color)),
                _ => None,
            })
            .collect();
        if squares.is_empty() {
            return Ok(());
        }

        let regions: &Regions = ctx.regions();
        let mut region_colors: HashMap<usize, Color> = HashMap::new();
        for (position, color) in squares {
            let Some(region) = regions.region_of(position) else {
                continue;
            };
            match region_colors.get(&region) {
                Some(c) if *c != color => {
                    return Err(Violation::MixedColors(position, *c, color));
                }
                Some(_) => (),
                None => {
                    region_colors.insert(region, color);
                }
            }
        }
        Ok(())
    }
}

/// The number of sides of a triangle's cell drawn by the path equals the triangle value.
pub struct TriangleRule;

impl Rule for TriangleRule {
    fn name(&self) -> &'static str {
        "triangle"
    }

    fn check(&self, ctx: &RuleContext) -> Result<(), Violation> {
        for symbol in &ctx.panel.symbols {
            if let Symbol::Triangle { position, value } = symbol {
                let drawn: usize = ctx.edges.count_around(*position);
                if drawn != usize::from(*value) {
                    return Err(Violation::Triangle(*position, *value, drawn));
                }
            }
        }
        Ok(())
    }
}

/// A star pairs with exactly one other square or star of the same color in its region.
pub struct StarRule;

impl Rule for StarRule {
    fn name(&self) -> &'static str {
        "star"
    }

    fn check(&self, ctx: &RuleContext) -> Result<(), Violation> {
        let symbols: &[Symbol] = &ctx.panel.symbols;
        if !symbols.iter().any(|s| matches!(s, Symbol::Star { .. })) {
            return Ok(());
        }

        let regions: &Regions = ctx.regions();
        for (i, symbol) in symbols.iter().enumerate() {
            let Symbol::Star { position, color } = symbol else {
                continue;
            };
            let region: Option<usize> = regions.region_of(*position);
            let companions: usize = symbols
                .iter()
                .enumerate()
                .filter(|(j, s)| {
                    *j != i
                        && matches!(s, Symbol::Square { .. } | Symbol::Star { .. })
                        && s.color() == Some(*color)
                        && regions.region_of(s.position()) == region
                })
                .count();
            if companions != 1 {
                return Err(Violation::Star(*position, *color, companions));
            }
        }
        Ok(())
    }
}

/// Return the rules applied by [`check`], in order.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(EndpointRule),
        Box::new(ConnectivityRule),
        Box::new(MustVisitRule),
        Box::new(SeparationRule),
        Box::new(TriangleRule),
        Box::new(StarRule),
    ]
}

/// Apply the given rules and return the first violation.
pub fn check_with_rules(
    panel: &Panel,
    path: &[Point],
    rules: &[Box<dyn Rule>],
) -> Result<(), Violation> {
    if path.len() < 2 {
        return Err(Violation::TooShort);
    }
    let ctx: RuleContext = RuleContext::new(panel, path);
    ctx.edges().debug();
    for rule in rules {
        if let Err(v) = rule.check(&ctx) {
            debug!("Rule {} failed: {v}", rule.name());
            return Err(v);
        }
    }
    Ok(())
}

/// Apply the default rules and return the first violation.
pub fn check(panel: &Panel, path: &[Point]) -> Result<(), Violation> {
    check_with_rules(panel, path, &default_rules())
}

/// Whether the path solves the panel.
pub fn validate(panel: &Panel, path: &[Point]) -> bool {
    check(panel, path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::generator::grid::Grid;
    use crate::generator::panel::fallback_panel;
    use crate::generator::random_panel::RandomPanel;
    use proptest::prelude::*;

    fn points(v: &[(i32, i32)]) -> Vec<Point> {
        v.iter().copied().map(Point::from).collect()
    }

    /// 5x5 nodes, start bottom-left, end top-right.
    fn panel5(symbols: Vec<Symbol>) -> Panel {
        let grid = Grid::new(5, 5, Point::new(0, 4), Point::new(4, 0)).unwrap();
        Panel::new(grid, symbols, 1)
    }

    /// Anti-diagonal staircase that isolates the top-left corner from the bottom-right one.
    fn staircase() -> Vec<Point> {
        points(&[
            (0, 4),
            (0, 3),
            (1, 3),
            (1, 2),
            (2, 2),
            (2, 1),
            (3, 1),
            (3, 0),
            (4, 0),
        ])
    }

    /// Along the bottom and right borders: a single region.
    fn border() -> Vec<Point> {
        points(&[
            (0, 4),
            (1, 4),
            (2, 4),
            (3, 4),
            (4, 4),
            (4, 3),
            (4, 2),
            (4, 1),
            (4, 0),
        ])
    }

    fn corner_squares() -> Vec<Symbol> {
        vec![
            Symbol::Square {
                position: Point::new(0, 0),
                color: Color::Black,
            },
            Symbol::Square {
                position: Point::new(3, 3),
                color: Color::White,
            },
        ]
    }

    #[test]
    fn fallback_solution_is_valid() {
        let panel = fallback_panel();
        let solution = panel.solution.clone().unwrap();
        assert_eq!(check(&panel, &solution), Ok(()));
        assert!(validate(&panel.with_inverted_colors(), &solution));
    }

    #[test]
    fn separated_squares() {
        let panel = panel5(corner_squares());
        assert!(validate(&panel, &staircase()));
        assert_eq!(
            check(&panel, &border()),
            Err(Violation::MixedColors(
                Point::new(3, 3),
                Color::Black,
                Color::White
            ))
        );
    }

    #[test]
    fn same_color_squares_can_share_a_region() {
        let mut symbols = corner_squares();
        symbols[1] = Symbol::Square {
            position: Point::new(3, 3),
            color: Color::Black,
        };
        assert!(validate(&panel5(symbols), &border()));
    }

    #[test]
    fn hexagon_must_be_visited() {
        let panel = panel5(vec![Symbol::Hexagon {
            position: Point::new(2, 2),
        }]);
        assert!(matches!(
            check(&panel, &border()),
            Err(Violation::Missed(Symbol::Hexagon { .. }))
        ));
        assert!(validate(&panel, &staircase()));
    }

    #[test]
    fn endpoints() {
        let panel = panel5(Vec::new());
        let mut path = border();
        path.pop();
        assert_eq!(
            check(&panel, &path),
            Err(Violation::WrongEnd {
                expected: Point::new(4, 0),
                found: Point::new(4, 1)
            })
        );
        path.reverse();
        assert!(matches!(
            check(&panel, &path),
            Err(Violation::WrongStart { .. })
        ));
        assert_eq!(check(&panel, &[]), Err(Violation::TooShort));
        assert_eq!(check(&panel, &[Point::new(0, 4)]), Err(Violation::TooShort));
    }

    #[test]
    fn connectivity() {
        let mut panel = panel5(Vec::new());

        let diagonal = points(&[(0, 4), (1, 3), (2, 2), (3, 1), (4, 0)]);
        assert_eq!(
            check(&panel, &diagonal),
            Err(Violation::NotAdjacent(Point::new(0, 4), Point::new(1, 3)))
        );

        let revisit = points(&[
            (0, 4),
            (1, 4),
            (0, 4),
            (0, 3),
            (1, 3),
            (2, 3),
            (3, 3),
            (4, 3),
            (4, 2),
            (4, 1),
            (4, 0),
        ]);
        assert_eq!(
            check(&panel, &revisit),
            Err(Violation::Revisit(Point::new(0, 4)))
        );

        let outside = points(&[
            (0, 4),
            (0, 5),
            (1, 5),
            (2, 5),
            (3, 5),
            (4, 5),
            (4, 4),
            (4, 3),
            (4, 2),
            (4, 1),
            (4, 0),
        ]);
        assert_eq!(
            check(&panel, &outside),
            Err(Violation::OutOfBounds(Point::new(0, 5)))
        );

        panel.grid.set_wall(Point::new(4, 2)).unwrap();
        assert_eq!(
            check(&panel, &border()),
            Err(Violation::Wall(Point::new(4, 2)))
        );
        assert!(validate(&panel, &staircase()));
    }

    #[test]
    fn triangles_count_drawn_sides() {
        // The staircase draws the left and top sides of the cell (0,3)
        let panel = panel5(vec![Symbol::Triangle {
            position: Point::new(0, 3),
            value: 2,
        }]);
        assert!(validate(&panel, &staircase()));
        assert_eq!(
            check(&panel, &border()),
            Err(Violation::Triangle(Point::new(0, 3), 2, 1))
        );
    }

    #[test]
    fn stars_need_exactly_one_companion() {
        let star = Symbol::Star {
            position: Point::new(0, 0),
            color: Color::Red,
        };
        let square = Symbol::Square {
            position: Point::new(1, 0),
            color: Color::Red,
        };
        let extra = Symbol::Square {
            position: Point::new(0, 1),
            color: Color::Red,
        };

        assert_eq!(
            check(&panel5(vec![star]), &staircase()),
            Err(Violation::Star(Point::new(0, 0), Color::Red, 0))
        );
        assert!(validate(&panel5(vec![star, square]), &staircase()));
        assert_eq!(
            check(&panel5(vec![star, square, extra]), &staircase()),
            Err(Violation::Star(Point::new(0, 0), Color::Red, 2))
        );
    }

    #[test]
    fn custom_rule_list() {
        let panel = panel5(corner_squares());
        let rules: Vec<Box<dyn Rule>> = vec![Box::new(EndpointRule), Box::new(ConnectivityRule)];
        assert_eq!(check_with_rules(&panel, &border(), &rules), Ok(()));
    }

    /// Self-avoiding walk from the start node, driven by a list of directions.
    fn walk(panel: &Panel, directions: &[u8]) -> Vec<Point> {
        let mut path = vec![panel.start()];
        for d in directions {
            let Some(last) = path.last().copied() else {
                break;
            };
            let next = last.neighbors()[usize::from(*d % 4)];
            if panel.grid.contains(next) && !panel.grid.is_wall(next) && !path.contains(&next) {
                path.push(next);
                if next == panel.end() {
                    break;
                }
            }
        }
        path
    }

    proptest! {
        #[test]
        fn black_and_white_swap_keeps_the_verdict(
            seed in any::<u64>(),
            size in 3usize..=8,
            difficulty in 1u8..=10,
            directions in prop::collection::vec(0u8..4, 0..80),
        ) {
            let config = GeneratorConfig {
                extended_symbols: true,
                ..GeneratorConfig::default()
            };
            let panel = RandomPanel::with_seed(&config, seed)
                .generate(size, size, difficulty)
                .unwrap();
            let path = walk(&panel, &directions);
            prop_assert_eq!(
                validate(&panel, &path),
                validate(&panel.with_inverted_colors(), &path)
            );
        }

        #[test]
        fn accepted_paths_hold_the_invariants(
            seed in any::<u64>(),
            size in 3usize..=6,
            directions in prop::collection::vec(0u8..4, 0..60),
        ) {
            let panel = RandomPanel::with_seed(&GeneratorConfig::default(), seed)
                .generate(size, size, 1)
                .unwrap();
            let path = walk(&panel, &directions);
            if validate(&panel, &path) {
                prop_assert_eq!(path.first().copied(), Some(panel.start()));
                prop_assert_eq!(path.last().copied(), Some(panel.end()));
                for pair in path.windows(2) {
                    prop_assert_eq!(pair[0].distance(&pair[1]), 1);
                }
            }
        }
    }
}
