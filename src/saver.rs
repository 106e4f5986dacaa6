/*
saver.rs

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

//! Save and restore data in the data directory.
//!
//! * [`panels::SaverPanels`] keeps the panel store, the attempts, and the best times in
//!   `panels.json`.
//! * [`session::SaverSession`] keeps the session in progress in `session.json`.
//!
//! Files are written to a temporary file first and then renamed, so that an interrupted write
//! never leaves a truncated file behind.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod panels;
pub mod session;

/// Serialize the value in JSON format and replace the file with the result.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }

    let mut tmp: PathBuf = path.to_path_buf();
    tmp.as_mut_os_string().push(".tmp");

    let file: File = File::create(&tmp)?;
    let mut writer: BufWriter<File> = BufWriter::new(file);
    let result: io::Result<()> = serde_json::to_writer(&mut writer, value)
        .map_err(io::Error::from)
        .and_then(|()| writer.flush())
        .and_then(|()| writer.get_ref().sync_all());
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    drop(writer);
    fs::rename(&tmp, path)
}
