use super::EmptyResponse;
use atat::atat_derive::AtatCmd;

/// Software power-down.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPOWD", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct PowerDown {
    /// 0 - urgent power off, 1 - normal power off
    pub mode: u8,
}

/// Calling line identification presentation.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CLIP", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct SetCallerId {
    pub enable: u8,
}

/// New SMS message indication.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CNMI", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct SetNewMessageIndication {
    pub mode: u8,
    /// 2 - route the message straight to the TE as `+CMT`
    pub mt: u8,
    pub bm: u8,
    pub ds: u8,
    pub bfr: u8,
}

impl SetNewMessageIndication {
    /// Forward incoming messages directly to the serial link.
    pub const fn forward() -> Self {
        Self {
            mode: 2,
            mt: 2,
            bm: 0,
            ds: 0,
            bfr: 0,
        }
    }
}

#[derive(Clone, AtatCmd)]
#[at_cmd("+CSQ", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct GetSignalQuality;
