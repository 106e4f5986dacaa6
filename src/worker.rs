/*
worker.rs

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

//! Obtain panels in the background.
//!
//! Each request runs on its own thread and sends the resulting panel, tagged with the request
//! ticket, through a bounded channel. A failed request delivers the fallback panel.
//! The session applies a delivery only if its ticket is the most recent one.

use async_channel::{Receiver, Sender};
use log::debug;
use std::thread::{self, JoinHandle};

use crate::config::GeneratorConfig;
use crate::generator::panel::Panel;
use crate::generator::random_panel::RandomPanel;
use crate::session::{Session, Ticket};
use crate::source::{PanelSource, request_or_fallback};

/// Number of deliveries that can wait in the channel.
const CHANNEL_CAPACITY: usize = 4;

/// Panel produced for a request.
#[derive(Debug)]
pub struct Delivery {
    pub ticket: Ticket,
    pub panel: Panel,
}

/// Background panel generation.
pub struct GenerationWorker {
    /// Settings for the random generator.
    config: GeneratorConfig,

    sender: Sender<Delivery>,
    receiver: Receiver<Delivery>,
}

impl GenerationWorker {
    /// Create a [`GenerationWorker`] object.
    pub fn new(config: &GeneratorConfig) -> Self {
        let (sender, receiver) = async_channel::bounded::<Delivery>(CHANNEL_CAPACITY);
        Self {
            config: config.clone(),
            sender,
            receiver,
        }
    }

    /// Start generating a random panel for the session and return the request ticket.
    /// Any earlier request of the session becomes stale.
    pub fn request(
        &self,
        session: &mut Session,
        width: usize,
        height: usize,
        difficulty: u8,
    ) -> Ticket {
        let ticket: Ticket = session.begin_request();
        let source: RandomPanel = RandomPanel::new(&self.config);
        self.spawn(ticket, source, width, height, difficulty);
        ticket
    }

    /// Start requesting a panel from the given source.
    pub fn spawn<S>(
        &self,
        ticket: Ticket,
        mut source: S,
        width: usize,
        height: usize,
        difficulty: u8,
    ) -> JoinHandle<()>
    where
        S: PanelSource + Send + 'static,
    {
        let sender: Sender<Delivery> = self.sender.clone();
        debug!("Request {ticket}: {width}x{height} difficulty {difficulty}");

        thread::spawn(move || {
            let panel: Panel = request_or_fallback(&mut source, width, height, difficulty);
            if sender.send_blocking(Delivery { ticket, panel }).is_err() {
                debug!("Request {ticket}: nobody is waiting for the panel anymore");
            }
        })
    }

    /// Apply the deliveries that are already available.
    ///
    /// Return whether one of them replaced the session panel.
    pub fn try_deliver(&self, session: &mut Session) -> bool {
        let mut applied: bool = false;
        while let Ok(delivery) = self.receiver.try_recv() {
            applied |= session.offer_panel(delivery.ticket, delivery.panel, None);
        }
        applied
    }

    /// Wait for the next delivery and apply it.
    ///
    /// Return whether it replaced the session panel. A stale delivery returns false.
    pub fn wait_deliver(&self, session: &mut Session) -> bool {
        match self.receiver.recv_blocking() {
            Ok(delivery) => session.offer_panel(delivery.ticket, delivery.panel, None),
            Err(_) => false,
        }
    }
}
