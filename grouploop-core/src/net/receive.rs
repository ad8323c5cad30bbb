//! Receive process
//!
//! On a fixed tick rate while connected, drains the latest buffered
//! inbound message, splits it into command and parameters, and enqueues it
//! for dispatch through the command registry at the end of the tick.

use grouploop_hal::SocketClient;
use grouploop_protocol::CommandLine;

use crate::command::OwnedCommand;
use crate::node::CommandQueue;
use crate::time::Timer;

use super::ConnectionManager;

/// Message poll interval in milliseconds
pub const CHECK_INTERVAL_MS: u32 = 10;

/// The receive process
pub struct ReceiveProcess {
    timer: Timer,
}

impl Default for ReceiveProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiveProcess {
    pub fn new() -> Self {
        Self {
            timer: Timer::new(CHECK_INTERVAL_MS),
        }
    }

    pub fn setup(&mut self, now: u32) {
        self.timer.reset(now);
    }

    pub fn update<S: SocketClient>(
        &mut self,
        conn: &mut ConnectionManager<S>,
        queue: &mut CommandQueue,
        now: u32,
    ) {
        if !conn.is_connected() || !self.timer.check_and_reset(now) {
            return;
        }

        let Some(message) = conn.take_frame() else {
            return;
        };
        log::debug!("received message: {:?}", message.as_str());

        let line = CommandLine::parse(message.trim_end_matches(['\r', '\n']));
        match OwnedCommand::from_line(&line) {
            Some(command) => {
                if queue.push_back(command).is_err() {
                    log::warn!("command queue full, dropping {}", line.name);
                }
            }
            None => log::warn!("oversized command dropped"),
        }
    }
}
