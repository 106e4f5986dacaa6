/*
generator.rs

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

//! Panel model and random panel generation.
//!
//! A [`panel::Panel`] object represents a puzzle: a [`grid::Grid`] of nodes with its start and
//! end nodes and its wall nodes, and a list of [`symbols::Symbol`] constraints.
//!
//! Panels come from two places:
//!
//! * The [`random_panel::RandomPanel`] generator, which builds a panel from a width, a height,
//!   and a difficulty level.
//!   The generator always terminates: symbols that cannot be placed after a bounded number of
//!   attempts are skipped.
//!
//! * A JSON document, parsed and checked by [`panel::Panel::from_json`].
//!
//! When neither is available, [`panel::fallback_panel`] returns a fixed panel with a known
//! solution.
//!
//! A traced route is a [`path::Path`] object. Its [`edges::Edges`] split the cells into regions,
//! which [`regions::decompose`] computes for the region-based rules.

pub mod edges;
pub mod grid;
pub mod panel;
pub mod path;
pub mod random_panel;
pub mod regions;
pub mod symbols;
