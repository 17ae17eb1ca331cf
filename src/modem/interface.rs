use alloc::{boxed::Box, format, string::String, vec::Vec};
use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};

use crate::response::Response;

const READ_CHUNK_SIZE: usize = 64;

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Where debug lines go when debugging is enabled.
pub trait DebugSink {
    fn write_line(&mut self, line: &str);
}

impl<W: Write> DebugSink for W {
    fn write_line(&mut self, line: &str) {
        self.write_all(line.as_bytes()).ok();
        self.write_all(b"\r\n").ok();
        self.flush().ok();
    }
}

/// Owns the serial link and performs single blocking transactions on it.
pub struct ModemInterface<S, C, D> {
    serial: S,
    clock: C,
    delay: D,
    debug: bool,
    sink: Option<Box<dyn DebugSink>>,
}

impl<S, C, D> ModemInterface<S, C, D>
where
    S: Read + ReadReady + Write,
    C: Clock,
    D: DelayNs,
{
    pub fn new(serial: S, clock: C, delay: D) -> Self {
        Self {
            serial,
            clock,
            delay,
            debug: false,
            sink: None,
        }
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn set_debug_sink(&mut self, sink: Box<dyn DebugSink>) {
        self.sink = Some(sink);
    }

    pub fn clear_debug_sink(&mut self) {
        self.sink = None;
    }

    /// Mirror a line to the debug sink, or to the log when none is attached.
    pub fn status(&mut self, args: fmt::Arguments<'_>) {
        if !self.debug {
            return;
        }
        match self.sink.as_mut() {
            Some(sink) => sink.write_line(&format!("{args}")),
            None => log::debug!("{}", args),
        }
    }

    /// Write `payload` and wait up to `timeout_ms` for an answer.
    ///
    /// Bytes left over from an earlier exchange are discarded first. The first
    /// burst of bytes that arrives is returned as the whole answer: there is no
    /// guarantee that the read boundary matches the end of the modem's reply on
    /// a slow or fragmented link.
    pub fn transact(&mut self, payload: &[u8], timeout_ms: u32) -> Response {
        self.drain();
        self.write_raw(payload);
        let response = self.poll(timeout_ms);

        let command = String::from_utf8_lossy(payload);
        let command = command.trim_end();
        log::trace!("MODEM -> {}", command);
        log::trace!("MODEM <- {}", response.as_str().trim());
        self.status(format_args!("AT command: {}", command));
        self.status(format_args!("Response: {}", response));
        response
    }

    /// Wait up to `timeout_ms` for bytes without sending anything.
    pub fn poll(&mut self, timeout_ms: u32) -> Response {
        let start = self.clock.now_ms();
        while self.clock.now_ms().saturating_sub(start) < u64::from(timeout_ms) {
            if !self.ready() {
                continue;
            }
            let bytes = self.read_available();
            if !bytes.is_empty() {
                return Response::from_bytes(&bytes);
            }
        }
        Response::NoResponse
    }

    /// Write bytes without waiting for an answer.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.serial
            .write_all(bytes)
            .map_err(|e| log::error!("UART write error: {:?}", e))
            .ok();
        self.serial
            .flush()
            .map_err(|e| log::error!("UART flush error: {:?}", e))
            .ok();
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    fn drain(&mut self) {
        let stale = self.read_available();
        if !stale.is_empty() {
            log::debug!("Discarded {} stale bytes from modem", stale.len());
        }
    }

    fn ready(&mut self) -> bool {
        self.serial
            .read_ready()
            .map_err(|e| log::error!("UART read error: {:?}", e))
            .unwrap_or(false)
    }

    fn read_available(&mut self) -> Vec<u8> {
        let mut bytes = Vec::new();
        while self.ready() {
            let mut buf = [0u8; READ_CHUNK_SIZE];
            match self.serial.read(&mut buf) {
                Ok(0) => break,
                Ok(len) => bytes.extend_from_slice(&buf[..len]),
                Err(e) => {
                    log::error!("UART read error: {:?}", e);
                    break;
                }
            }
        }
        bytes
    }
}
