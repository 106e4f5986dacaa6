/*
source.rs

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

//! Obtain panels from a generator or from an external service.
//!
//! A [`PanelSource`] returns a panel for a size and a difficulty, or fails.
//! [`request_or_fallback`] never fails: it substitutes [`fallback_panel`] for a failed request.
//!
//! [`JsonSource`] wraps a function that fetches a JSON document from a panel service.
//! It accepts two document formats:
//!
//! * The [`Panel`] serialization.
//! * A layout document with a square grid and a list of elements:
//!
//!   ```json
//!   {
//!     "gridSize": 5,
//!     "start": {"x": 0, "y": 4},
//!     "end": {"x": 4, "y": 0},
//!     "elements": [
//!       {"type": "black_square", "position": {"x": 0, "y": 0}},
//!       {"type": "hexagon", "position": {"x": 2, "y": 2}}
//!     ]
//!   }
//!   ```

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::generator::grid::{Grid, GridError, Point};
use crate::generator::panel::{Panel, PanelError, fallback_panel};
use crate::generator::random_panel::{GenerateError, RandomPanel};
use crate::generator::symbols::{Color, Symbol};

/// Errors raised by the panel sources.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error("the panel service failed: {0}")]
    Unavailable(String),

    #[error("the panel service returned an invalid panel: {0}")]
    Panel(#[from] PanelError),
}

/// Provider of panels.
pub trait PanelSource {
    /// Return a new panel.
    fn request_panel(
        &mut self,
        width: usize,
        height: usize,
        difficulty: u8,
    ) -> Result<Panel, SourceError>;
}

impl PanelSource for RandomPanel {
    fn request_panel(
        &mut self,
        width: usize,
        height: usize,
        difficulty: u8,
    ) -> Result<Panel, SourceError> {
        Ok(self.generate(width, height, difficulty)?)
    }
}

/// Request a panel and return the fallback panel if the request fails.
pub fn request_or_fallback(
    source: &mut dyn PanelSource,
    width: usize,
    height: usize,
    difficulty: u8,
) -> Panel {
    match source.request_panel(width, height, difficulty) {
        Ok(panel) => panel,
        Err(e) => {
            warn!("Cannot obtain a {width}x{height} panel ({e}), using the fallback panel");
            fallback_panel()
        }
    }
}

/// Largest grid accepted from a layout document.
const MAX_LAYOUT_SIZE: usize = 20;

/// Element types of a layout document.
#[derive(Deserialize, Debug, Copy, Clone)]
#[serde(rename_all = "snake_case")]
enum ElementType {
    BlackSquare,
    WhiteSquare,
    Hexagon,
}

#[derive(Deserialize, Debug)]
struct Element {
    #[serde(rename = "type")]
    element_type: ElementType,
    position: Point,
}

/// Layout document returned by the panel services.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Layout {
    grid_size: usize,
    start: Point,
    end: Point,
    elements: Vec<Element>,
}

impl Layout {
    fn into_panel(self, difficulty: u8) -> Result<Panel, PanelError> {
        if self.grid_size > MAX_LAYOUT_SIZE {
            return Err(PanelError::Grid(GridError::InvalidSize {
                width: self.grid_size,
                height: self.grid_size,
            }));
        }
        let grid: Grid = Grid::new(self.grid_size, self.grid_size, self.start, self.end)?;
        let symbols: Vec<Symbol> = self
            .elements
            .iter()
            .map(|e| match e.element_type {
                ElementType::BlackSquare => Symbol::Square {
                    position: e.position,
                    color: Color::Black,
                },
                ElementType::WhiteSquare => Symbol::Square {
                    position: e.position,
                    color: Color::White,
                },
                ElementType::Hexagon => Symbol::Hexagon {
                    position: e.position,
                },
            })
            .collect();
        Ok(Panel::new(grid, symbols, difficulty))
    }
}

/// Parse and check a panel document in either format.
///
/// The difficulty applies to layout documents, which do not carry one.
pub fn parse_document(text: &str, difficulty: u8) -> Result<Panel, PanelError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let panel: Panel = if value.get("gridSize").is_some() {
        let layout: Layout = serde_json::from_value(value)?;
        layout.into_panel(difficulty)?
    } else {
        serde_json::from_value(value)?
    };
    panel.check()?;
    Ok(panel)
}

/// Panel source backed by an external service.
///
/// The fetch function receives the width, height, and difficulty, and returns the JSON document
/// or an error message.
pub struct JsonSource<F>
where
    F: FnMut(usize, usize, u8) -> Result<String, String>,
{
    fetch: F,
}

impl<F> JsonSource<F>
where
    F: FnMut(usize, usize, u8) -> Result<String, String>,
{
    /// Create a [`JsonSource`] object.
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

impl<F> PanelSource for JsonSource<F>
where
    F: FnMut(usize, usize, u8) -> Result<String, String>,
{
    fn request_panel(
        &mut self,
        width: usize,
        height: usize,
        difficulty: u8,
    ) -> Result<Panel, SourceError> {
        let text: String =
            (self.fetch)(width, height, difficulty).map_err(SourceError::Unavailable)?;
        let panel: Panel = parse_document(&text, difficulty)?;
        info!(
            "Received a {}x{} panel with {} symbol(s)",
            panel.grid.width(),
            panel.grid.height(),
            panel.symbols.len()
        );
        Ok(panel)
    }
}
