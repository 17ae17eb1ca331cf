//! Blocking driver for SIM800 cellular modems.
//!
//! Turns a raw serial link into power control, command/response exchange, SMS
//! delivery, signal-quality reporting and HTTP requests over the modem's GPRS
//! bearer. The serial link, clock, delay and GPIO lines are supplied by the
//! board through `embedded-io` / `embedded-hal` traits.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod at;
pub mod config;
pub mod error;
pub mod modem;
pub mod response;
pub mod signal;

pub use config::{HttpConfig, ModemConfig, RetryDecision, RetryPolicy, SmsConfig};
pub use error::{HttpError, SmsError};
pub use modem::{
    validate_sms, Clock, DebugSink, GpioPower, HttpActionResult, HttpMethod, HttpResponse, Modem,
    ModemPower, ModemState, DEFAULT_TIMEOUT_MS,
};
pub use response::{Response, NO_RESPONSE};
pub use signal::SignalQuality;
