/*
lib.rs

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

//! Line puzzle panels: generation, tracing, validation, and storage.
//!
//! A panel is a grid of nodes with a start node, an end node, and symbols. The player traces a
//! path from the start to the end, and the path must satisfy the rules of all the symbols.

pub mod cli_options;
pub mod config;
pub mod generator;
pub mod saver;
pub mod scores;
pub mod session;
pub mod source;
pub mod store;
pub mod submission;
pub mod tracker;
pub mod validator;
pub mod worker;
