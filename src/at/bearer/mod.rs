use super::{arg, ArgumentTooLong, EmptyResponse};
use atat::atat_derive::AtatCmd;

/// Bearer profile used for every HTTP session.
pub const PROFILE: u8 = 1;

const CLOSE: u8 = 0;
const OPEN: u8 = 1;
const SET_PARAMETER: u8 = 3;

/// `AT+SAPBR=<cmd>,<cid>`: open or close the GPRS bearer.
#[derive(Clone, AtatCmd)]
#[at_cmd("+SAPBR", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct BearerControl {
    pub cmd: u8,
    pub cid: u8,
}

impl BearerControl {
    pub const fn open() -> Self {
        Self {
            cmd: OPEN,
            cid: PROFILE,
        }
    }

    pub const fn close() -> Self {
        Self {
            cmd: CLOSE,
            cid: PROFILE,
        }
    }
}

/// `AT+SAPBR=3,<cid>,"<tag>","<value>"`
#[derive(Clone, AtatCmd)]
#[at_cmd("+SAPBR", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct SetBearerParameter {
    pub cmd: u8,
    pub cid: u8,
    /// "Contype", "APN", "USER" or "PWD"
    pub tag: heapless::String<8>,
    pub value: heapless::String<64>,
}

impl SetBearerParameter {
    pub fn new(tag: &str, value: &str) -> Result<Self, ArgumentTooLong> {
        Ok(Self {
            cmd: SET_PARAMETER,
            cid: PROFILE,
            tag: arg(tag)?,
            value: arg(value)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::at::render;

    #[test]
    fn open_and_close_address_profile_one() {
        assert_eq!(render(&BearerControl::open()).unwrap(), b"AT+SAPBR=1,1\r");
        assert_eq!(render(&BearerControl::close()).unwrap(), b"AT+SAPBR=0,1\r");
    }

    #[test]
    fn parameters_are_quoted() {
        let cmd = SetBearerParameter::new("APN", "internet.telekom").unwrap();
        assert_eq!(
            render(&cmd).unwrap(),
            b"AT+SAPBR=3,1,\"APN\",\"internet.telekom\"\r"
        );
    }
}
