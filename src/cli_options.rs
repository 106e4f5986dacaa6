/*
cli_options.rs

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

//! Process command-line options.
//!
//! # Examples
//!
//! Generate two 7x7 panels at difficulty 4 and save them:
//!
//! ```text
//! $ tracepanel generate -w 7 -H 7 -f 4 -c 2 --save
//! ```
//!
//! List the saved panels and submit a solution for one of them:
//!
//! ```text
//! $ tracepanel ls
//!     3  Panel 1760871000123  7x7  difficulty 4  9 symbol(s)  2025-10-19 10:50
//! $ tracepanel submit 3 -p "0,6;1,6;1,5;..." -e 42.5
//! ```
//!
//! Solve panels interactively. The commands are read from the standard input:
//!
//! ```text
//! $ tracepanel play -w 5 -H 5 -f 2
//! > down 0 0
//! > move 1 0
//! > up
//! ```

use clap::{Parser, Subcommand};
use log::debug;
use std::env;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::config::{COPYRIGHT_NOTICE, Config, EndpointPolicy};
use crate::generator::grid::Point;
use crate::generator::panel::{Panel, fallback_panel};
use crate::generator::random_panel::RandomPanel;
use crate::saver::panels::SaverPanels;
use crate::saver::session::SaverSession;
use crate::session::{Outcome, Session};
use crate::source::parse_document;
use crate::store::{PanelId, PanelStore};
use crate::submission::{self, Submission};
use crate::tracker::{Event, FEEDBACK_DELAY};
use crate::validator;
use crate::worker::GenerationWorker;

/// Generate, store, and solve line puzzle panels.
#[derive(Parser)]
#[command(about, long_about = None, version, long_version = COPYRIGHT_NOTICE)]
struct Args {
    /// Settings file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the saved panels and sessions
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug messages
    #[arg(short, long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate random panels and print them in JSON format
    Generate {
        /// Number of nodes on each row
        #[arg(short, long, default_value_t = 5)]
        width: usize,

        /// Number of nodes on each column
        #[arg(short = 'H', long, default_value_t = 5)]
        height: usize,

        /// Difficulty level, from 1 to 10
        #[arg(short = 'f', long, default_value_t = 3)]
        difficulty: u8,

        /// Number of panels to generate
        #[arg(short, long, default_value_t = 1)]
        count: usize,

        /// Placement of the start and end nodes
        #[arg(value_enum, short, long)]
        endpoints: Option<EndpointPolicy>,

        /// Also place stars and triangles
        #[arg(long, default_value_t = false)]
        extended: bool,

        /// Seed for reproducible panels
        #[arg(long)]
        seed: Option<u64>,

        /// Save the panels in the data directory
        #[arg(short, long, default_value_t = false)]
        save: bool,

        /// Print some statistics after generating the panels
        #[arg(long, default_value_t = false)]
        summary: bool,
    },

    /// Print the fallback panel in JSON format
    Fallback,

    /// List the saved panels, most recent first
    Ls {
        /// Maximum number of panels to list
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print a saved panel in JSON format, with its best times
    Show {
        /// Panel ID
        id: PanelId,
    },

    /// Submit a solution for a saved panel
    Submit {
        /// Panel ID
        id: PanelId,

        /// Path, as a list of `x,y` nodes separated by semicolons
        #[arg(short, long)]
        path: String,

        /// Solving time in seconds
        #[arg(short, long, default_value_t = 0.0)]
        elapsed: f64,
    },

    /// Validate a path against a panel file
    Validate {
        /// Panel file, in JSON format
        file: PathBuf,

        /// Path, as a list of `x,y` nodes separated by semicolons. Defaults to the panel solution
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Solve panels with commands read from the standard input
    Play {
        /// Number of nodes on each row
        #[arg(short, long, default_value_t = 5)]
        width: usize,

        /// Number of nodes on each column
        #[arg(short = 'H', long, default_value_t = 5)]
        height: usize,

        /// Difficulty level, from 1 to 10
        #[arg(short = 'f', long, default_value_t = 3)]
        difficulty: u8,
    },
}

/// Parse a path in the `x,y;x,y;...` format.
pub fn parse_path(text: &str) -> Result<Vec<Point>, String> {
    text.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|node| {
            let (x, y) = node
                .split_once(',')
                .ok_or_else(|| format!("`{node}` is not in the x,y format"))?;
            let x: i32 = x
                .trim()
                .parse()
                .map_err(|_| format!("`{x}` is not a coordinate"))?;
            let y: i32 = y
                .trim()
                .parse()
                .map_err(|_| format!("`{y}` is not a coordinate"))?;
            Ok(Point::new(x, y))
        })
        .collect()
}

/// Format a path in the `x,y;x,y;...` format.
pub fn format_path(path: &[Point]) -> String {
    path.iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<String>>()
        .join(";")
}

/// Parse and process command-line options, and return the exit code.
pub fn parse() -> u8 {
    let args: Args = Args::parse();

    if args.debug {
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    env_logger::init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn load_config(args: &Args) -> Result<Config, Box<dyn Error>> {
    let mut config: Config = Config::load_or_default(args.config.as_deref())?;
    if let Some(d) = &args.data_dir {
        config.data_dir = Some(d.clone());
    }
    debug!("Settings: {config:?}");
    Ok(config)
}

fn run(args: Args) -> Result<u8, Box<dyn Error>> {
    let mut config: Config = load_config(&args)?;
    let mut stdout = io::stdout().lock();

    match args.command {
        Command::Generate {
            width,
            height,
            difficulty,
            count,
            endpoints,
            extended,
            seed,
            save,
            summary,
        } => {
            if let Some(e) = endpoints {
                config.generator.endpoints = e;
            }
            config.generator.extended_symbols |= extended;
            let mut generator: RandomPanel = match seed {
                Some(s) => RandomPanel::with_seed(&config.generator, s),
                None => RandomPanel::new(&config.generator),
            };
            let mut store: Option<SaverPanels> = if save {
                Some(SaverPanels::open(config.data_dir())?)
            } else {
                None
            };

            let mut total: f32 = 0.0;
            let mut skipped: usize = 0;
            for i in 0..count {
                debug!("Panel {i}");
                let panel: Panel = generator.generate(width, height, difficulty)?;
                total += generator.duration;
                skipped += generator.skipped;
                writeln!(stdout, "{}", panel.to_json()?)?;
                if let Some(s) = store.as_mut() {
                    let id: PanelId = s.save(&panel)?;
                    eprintln!("Saved as panel {id}");
                }
            }
            if summary && count > 0 {
                eprintln!(
                    "{count} panel(s)  average duration: {} s  skipped symbols: {skipped}",
                    total / count as f32
                );
            }
            Ok(0)
        }

        Command::Fallback => {
            writeln!(stdout, "{}", fallback_panel().to_json()?)?;
            Ok(0)
        }

        Command::Ls { limit } => {
            let store: SaverPanels = SaverPanels::open(config.data_dir())?;
            for s in store.list(limit.unwrap_or(config.list_limit))? {
                writeln!(
                    stdout,
                    "{:5}  {}  {}x{}  difficulty {}  {} symbol(s)  {}",
                    s.id,
                    s.name,
                    s.width,
                    s.height,
                    s.difficulty,
                    s.symbols,
                    s.created.format("%Y-%m-%d %H:%M")
                )?;
            }
            Ok(0)
        }

        Command::Show { id } => {
            let store: SaverPanels = SaverPanels::open(config.data_dir())?;
            writeln!(stdout, "{}", store.load(id)?.to_json()?)?;
            for (i, score) in store.best_times(id)?.iter().enumerate() {
                writeln!(
                    stdout,
                    "{:2}. {:.1} s  {}",
                    i + 1,
                    score.time.as_secs_f64(),
                    score.when.format("%Y-%m-%d %H:%M")
                )?;
            }
            Ok(0)
        }

        Command::Submit { id, path, elapsed } => {
            let path: Vec<Point> = parse_path(&path)?;
            let elapsed: Duration = Duration::try_from_secs_f64(elapsed)?;
            let mut store: SaverPanels = SaverPanels::open(config.data_dir())?;
            let result: Submission = submission::submit(&mut store, id, &path, elapsed)?;
            print_submission(&mut stdout, &result)?;
            Ok(if result.valid { 0 } else { 2 })
        }

        Command::Validate { file, path } => {
            let text: String = std::fs::read_to_string(&file)?;
            let panel: Panel = parse_document(&text, 1)?;
            let path: Vec<Point> = match path {
                Some(p) => parse_path(&p)?,
                None => panel
                    .solution
                    .clone()
                    .ok_or("the panel has no solution, use --path")?,
            };
            match validator::check(&panel, &path) {
                Ok(()) => {
                    writeln!(stdout, "valid")?;
                    Ok(0)
                }
                Err(v) => {
                    writeln!(stdout, "invalid: {v}")?;
                    Ok(2)
                }
            }
        }

        Command::Play {
            width,
            height,
            difficulty,
        } => {
            let mut player: Player = Player::open(&config, width, height, difficulty)?;
            let stdin = io::stdin().lock();
            player.run(stdin, &mut stdout)?;
            Ok(0)
        }
    }
}

fn print_submission(out: &mut dyn Write, result: &Submission) -> io::Result<()> {
    match &result.violation {
        None => writeln!(out, "valid")?,
        Some(v) => writeln!(out, "invalid: {v}")?,
    }
    if let Some(position) = result.position {
        writeln!(out, "best time #{position}")?;
    }
    Ok(())
}

/// Interactive solving loop.
struct Player {
    session: Session,
    worker: GenerationWorker,
    store: Box<dyn PanelStore>,

    /// Keeps the session between two runs.
    saver: Option<SaverSession>,

    /// Parameters for new panels.
    size: (usize, usize, u8),
}

impl Player {
    /// Restore the saved session, or start a new one with a fresh panel.
    fn open(
        config: &Config,
        width: usize,
        height: usize,
        difficulty: u8,
    ) -> Result<Self, Box<dyn Error>> {
        let saver: SaverSession = SaverSession::new(config.data_dir());
        let store: SaverPanels = SaverPanels::open(config.data_dir())?;
        let worker: GenerationWorker = GenerationWorker::new(&config.generator);

        let (session, restored): (Session, bool) = match saver.get_session() {
            Ok(Some(mut s)) => {
                debug!("Restoring the saved session");
                s.resume();
                (s, true)
            }
            Ok(None) => (Session::new(fallback_panel(), None), false),
            Err(e) => {
                eprintln!("Cannot restore the saved session: {e}");
                (Session::new(fallback_panel(), None), false)
            }
        };

        let mut player: Player = Player {
            session,
            worker,
            store: Box::new(store),
            saver: Some(saver),
            size: (width, height, difficulty),
        };
        if !restored {
            player.new_panel();
        }
        Ok(player)
    }

    fn new_panel(&mut self) {
        let (w, h, d) = self.size;
        self.worker.request(&mut self.session, w, h, d);
        self.worker.wait_deliver(&mut self.session);
    }

    /// Process the commands until the end of the input or `quit`.
    fn run(&mut self, input: impl BufRead, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        self.print_panel(out)?;
        for line in input.lines() {
            if !self.execute(&line?, out)? {
                break;
            }
        }
        if let Some(saver) = &self.saver {
            if self.session.solved {
                saver.delete_save();
            } else {
                self.session.pause();
                saver.save_session(&self.session)?;
            }
        }
        Ok(())
    }

    fn print_panel(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{}", self.session.panel.to_json()?)
    }

    /// Execute a command. Return false to stop.
    fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<bool, Box<dyn Error>> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let point = |i: usize| -> Result<Point, Box<dyn Error>> {
            let x: i32 = words.get(i).ok_or("missing x coordinate")?.parse()?;
            let y: i32 = words.get(i + 1).ok_or("missing y coordinate")?.parse()?;
            Ok(Point::new(x, y))
        };

        let event: Event = match words.first().copied() {
            None => return Ok(true),
            Some("quit") => return Ok(false),
            Some("down") => Event::PointerDown(point(1)?),
            Some("move") => Event::PointerMove(point(1)?),
            Some("up") => Event::PointerUp,
            Some("reset") => {
                self.session.reset();
                writeln!(out, "{}", format_path(self.session.path()))?;
                return Ok(true);
            }
            Some("new") => {
                if words.len() == 4 {
                    self.size = (words[1].parse()?, words[2].parse()?, words[3].parse()?);
                }
                self.new_panel();
                self.print_panel(out)?;
                return Ok(true);
            }
            Some("pause") => {
                self.session.pause();
                return Ok(true);
            }
            Some("resume") => {
                self.session.resume();
                return Ok(true);
            }
            Some("time") => {
                let (h, m, s) = self.session.get_duration_hms();
                writeln!(out, "{h:02}:{m:02}:{s:02}")?;
                return Ok(true);
            }
            Some(other) => {
                writeln!(out, "unknown command `{other}`")?;
                return Ok(true);
            }
        };

        match self.session.handle(event) {
            None => writeln!(out, "{}", format_path(self.session.path()))?,
            Some(Outcome::Rejected) => {
                writeln!(out, "rejected")?;
                thread::sleep(FEEDBACK_DELAY);
                self.session.handle(Event::FeedbackElapsed);
            }
            Some(Outcome::Invalid(v)) => writeln!(out, "invalid: {v}")?,
            Some(Outcome::Solved) => {
                let id: PanelId = match self.session.panel_id {
                    Some(id) => id,
                    None => {
                        let id: PanelId = self.store.save(&self.session.panel)?;
                        self.session.panel_id = Some(id);
                        id
                    }
                };
                let result: Submission = submission::submit(
                    self.store.as_mut(),
                    id,
                    self.session.path(),
                    self.session.get_duration(),
                )?;
                writeln!(out, "solved")?;
                print_submission(out, &result)?;
            }
        }
        Ok(true)
    }
}
