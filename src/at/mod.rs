//! SIM800 AT command set.
//!
//! Every command is a typed struct rendered through `atat`'s `AtatCmd` derive and
//! terminated by a bare carriage return, which is what the SIM800 firmware expects.
//!
//! [reference](https://microchip.ua/simcom/2G/SIM800%20Series_AT%20Command%20Manual_V1.12.pdf)

pub mod bearer;
pub mod general;
pub mod http;
pub mod sms;

use alloc::vec::Vec;
use atat::atat_derive::{AtatCmd, AtatResp};
use atat::AtatCmd;

/// Largest rendered command, in bytes.
pub const COMMAND_BUF_SIZE: usize = 512;

/// Universal success token.
pub const OK: &str = "OK";

/// Message commit byte (ASCII SUB, Ctrl+Z).
pub const CTRL_Z: u8 = 0x1A;

#[derive(Clone, Debug, AtatResp)]
pub struct EmptyResponse;

/// Liveness probe.
#[derive(Clone, AtatCmd)]
#[at_cmd("", EmptyResponse, timeout_ms = 1000, termination = "\r")]
pub struct AT;

/// A string argument did not fit the command's fixed-size field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentTooLong {
    pub capacity: usize,
}

impl core::fmt::Display for ArgumentTooLong {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "argument exceeds {} bytes", self.capacity)
    }
}

pub(crate) fn arg<const N: usize>(value: &str) -> Result<heapless::String<N>, ArgumentTooLong> {
    heapless::String::try_from(value).map_err(|_| ArgumentTooLong { capacity: N })
}

/// Render a command into the bytes written to the link.
pub fn render<Cmd: AtatCmd>(cmd: &Cmd) -> Result<Vec<u8>, ArgumentTooLong> {
    if Cmd::MAX_LEN > COMMAND_BUF_SIZE {
        return Err(ArgumentTooLong {
            capacity: COMMAND_BUF_SIZE,
        });
    }
    let mut buf = [0u8; COMMAND_BUF_SIZE];
    let len = cmd.write(&mut buf);
    Ok(buf[..len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_is_bare_at() {
        assert_eq!(render(&AT).unwrap(), b"AT\r");
    }

    #[test]
    fn probe_uses_short_deadline() {
        assert_eq!(AT::MAX_TIMEOUT_MS, 1000);
    }

    #[test]
    fn oversized_argument_is_rejected() {
        let long = "x".repeat(40);
        assert_eq!(
            arg::<32>(&long).unwrap_err(),
            ArgumentTooLong { capacity: 32 }
        );
        assert_eq!(arg::<32>("+49123").unwrap().as_str(), "+49123");
    }
}
