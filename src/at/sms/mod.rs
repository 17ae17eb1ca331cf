use super::{arg, ArgumentTooLong, EmptyResponse};
use atat::atat_derive::AtatCmd;

pub const NUMBER_LEN: usize = 32;

#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGF", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct SetMessageFormat {
    /// 0 - PDU mode, 1 - text mode
    pub mode: u8,
}

impl SetMessageFormat {
    pub const fn text() -> Self {
        Self { mode: 1 }
    }
}

/// Address a text message. The modem answers with a `>` prompt for the body.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGS", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct SendMessage {
    pub number: heapless::String<NUMBER_LEN>,
}

impl SendMessage {
    pub fn new(number: &str) -> Result<Self, ArgumentTooLong> {
        Ok(Self {
            number: arg(number)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::at::render;

    #[test]
    fn recipient_is_quoted() {
        let cmd = SendMessage::new("+491234567").unwrap();
        assert_eq!(render(&cmd).unwrap(), b"AT+CMGS=\"+491234567\"\r");
        assert_eq!(render(&SetMessageFormat::text()).unwrap(), b"AT+CMGF=1\r");
    }
}
