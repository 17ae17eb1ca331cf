//! Blocking SIM800 driver.
//!
//! Every operation runs to completion on the calling thread: waits are busy
//! polls against the [`Clock`], and there is exactly one transaction on the
//! link at any time. Workflows that need a live modem go through
//! [`Modem::ensure_ready`], which power-cycles an unresponsive modem instead of
//! relying on an outside supervisor.

use alloc::{boxed::Box, vec::Vec};
use atat::AtatCmd;
use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use log::{info, warn};

use crate::at::{self, general};
use crate::config::ModemConfig;
use crate::response::Response;
use crate::signal::SignalQuality;

mod bearer;
mod http;
pub mod interface;
pub mod power;
mod sms;

pub use http::{HttpActionResult, HttpMethod, HttpResponse, CONTENT_TYPE};
pub use interface::{Clock, DebugSink, ModemInterface};
pub use power::{GpioPower, ModemPower};
pub use sms::validate_sms;

/// Deadline for free-form commands when the caller has no better value.
pub const DEFAULT_TIMEOUT_MS: u32 = 5_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModemState {
    #[default]
    Off,
    Starting,
    Ready,
    /// A transaction is in flight.
    Busy,
    /// The last liveness probe went unanswered.
    Unresponsive,
}

pub struct Modem<S, P, C, D> {
    interface: ModemInterface<S, C, D>,
    power: P,
    state: ModemState,
    config: ModemConfig,
}

impl<S, P, C, D> Modem<S, P, C, D>
where
    S: Read + ReadReady + Write,
    P: ModemPower,
    C: Clock,
    D: DelayNs,
{
    /// Wrap an already opened serial link. The modem is assumed to be off.
    pub fn new(serial: S, power: P, clock: C, delay: D, config: ModemConfig) -> Self {
        let mut interface = ModemInterface::new(serial, clock, delay);
        interface.set_debug(config.debug);
        Self {
            interface,
            power,
            state: ModemState::Off,
            config,
        }
    }

    pub fn state(&self) -> ModemState {
        self.state
    }

    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.config.debug = debug;
        self.interface.set_debug(debug);
    }

    pub fn set_debug_sink(&mut self, sink: impl DebugSink + 'static) {
        self.interface.set_debug_sink(Box::new(sink));
    }

    pub fn clear_debug_sink(&mut self) {
        self.interface.clear_debug_sink();
    }

    /// Power the modem on and wait `boot_time_ms` for its firmware, then route
    /// caller ID and incoming messages to the serial link. Liveness is not
    /// checked.
    pub fn start(&mut self, boot_time_ms: u32) {
        self.state = ModemState::Starting;
        self.power.power_on();
        self.interface.delay_ms(boot_time_ms);

        self.command(&general::SetCallerId { enable: 1 });
        self.command(&general::SetNewMessageIndication::forward());

        self.state = ModemState::Ready;
        info!("Modem started");
    }

    pub fn start_default(&mut self) {
        self.start(self.config.boot_time_ms);
    }

    /// Ask the modem to power down and release the power line. The modem
    /// switches itself off; nothing is verified.
    pub fn shutdown(&mut self) {
        self.command(&general::PowerDown { mode: 1 });
        self.power.power_off();
        self.state = ModemState::Off;
        info!("Modem shut down");
    }

    /// Probe with a bare `AT`; the modem is active when the answer has `OK`.
    pub fn is_active(&mut self) -> bool {
        let response = self.command_with_timeout(&at::AT, self.config.probe_timeout_ms);
        let active = response.is_ok();
        self.interface
            .status(format_args!("Modem active: {}", active));

        match (active, self.state) {
            (true, ModemState::Off | ModemState::Unresponsive) => self.state = ModemState::Ready,
            (false, ModemState::Ready | ModemState::Busy) => self.state = ModemState::Unresponsive,
            _ => {}
        }
        active
    }

    /// Restart the modem when it does not answer the probe. Returns whether it
    /// was already active.
    pub fn ensure_ready(&mut self) -> bool {
        if self.is_active() {
            return true;
        }
        warn!("Modem not responding, restarting");
        self.start_default();
        false
    }

    /// Send a free-form command line and return whatever came back.
    pub fn send_command(&mut self, command: &str, timeout_ms: u32) -> Response {
        let mut payload = Vec::with_capacity(command.len() + 1);
        payload.extend_from_slice(command.as_bytes());
        payload.push(b'\r');
        self.transact(&payload, timeout_ms)
    }

    /// Send a typed command with its own deadline.
    pub fn command<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Response {
        self.command_with_timeout(cmd, Cmd::MAX_TIMEOUT_MS)
    }

    pub fn command_with_timeout<Cmd: AtatCmd>(&mut self, cmd: &Cmd, timeout_ms: u32) -> Response {
        match at::render(cmd) {
            Ok(payload) => self.transact(&payload, timeout_ms),
            Err(e) => {
                log::error!("Failed to render command: {}", e);
                Response::NoResponse
            }
        }
    }

    /// Query `AT+CSQ` and bucket the RSSI.
    ///
    /// An unresponsive modem is restarted first, but not probed again before
    /// the query.
    pub fn signal_quality(&mut self) -> SignalQuality {
        if !self.is_active() {
            self.interface
                .status(format_args!("Signal quality: modem is not active"));
            self.start_default();
        }
        let response = self.command(&general::GetSignalQuality);
        SignalQuality::parse(&response)
    }

    fn transact(&mut self, payload: &[u8], timeout_ms: u32) -> Response {
        self.busy(|int| int.transact(payload, timeout_ms))
    }

    fn poll(&mut self, timeout_ms: u32) -> Response {
        self.busy(|int| int.poll(timeout_ms))
    }

    fn busy<F>(&mut self, f: F) -> Response
    where
        F: FnOnce(&mut ModemInterface<S, C, D>) -> Response,
    {
        let previous = self.state;
        if previous == ModemState::Ready {
            self.state = ModemState::Busy;
        }
        let response = f(&mut self.interface);
        if self.state == ModemState::Busy {
            self.state = previous;
        }
        response
    }
}
