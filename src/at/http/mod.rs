use super::{arg, ArgumentTooLong, EmptyResponse};
use atat::atat_derive::AtatCmd;

pub const URL_LEN: usize = 256;

/// Answer to `AT+HTTPDATA` when the modem is ready for the body.
pub const DOWNLOAD: &str = "DOWNLOAD";
/// Unsolicited result of `AT+HTTPACTION`.
pub const ACTION_RESULT: &str = "+HTTPACTION: ";
/// Header of the `AT+HTTPREAD` answer.
pub const READ_HEADER: &str = "+HTTPREAD: ";

#[derive(Clone, AtatCmd)]
#[at_cmd("+HTTPINIT", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct InitHttp;

#[derive(Clone, AtatCmd)]
#[at_cmd("+HTTPTERM", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct TerminateHttp;

/// `AT+HTTPPARA="CID",<cid>`
#[derive(Clone, AtatCmd)]
#[at_cmd("+HTTPPARA", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct SetHttpBearer {
    pub tag: heapless::String<3>,
    pub cid: u8,
}

impl SetHttpBearer {
    pub fn new(cid: u8) -> Self {
        let mut tag = heapless::String::new();
        // "CID" always fits
        tag.push_str("CID").ok();
        Self { tag, cid }
    }
}

/// `AT+HTTPPARA="<tag>","<value>"`
#[derive(Clone, AtatCmd)]
#[at_cmd("+HTTPPARA", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct SetHttpParameter {
    /// "URL" or "CONTENT"
    pub tag: heapless::String<8>,
    pub value: heapless::String<URL_LEN>,
}

impl SetHttpParameter {
    pub fn url(url: &str) -> Result<Self, ArgumentTooLong> {
        Self::new("URL", url)
    }

    pub fn content_type(content_type: &str) -> Result<Self, ArgumentTooLong> {
        Self::new("CONTENT", content_type)
    }

    fn new(tag: &str, value: &str) -> Result<Self, ArgumentTooLong> {
        Ok(Self {
            tag: arg(tag)?,
            value: arg(value)?,
        })
    }
}

/// Announce an upload of `size` bytes that must complete within `time` ms.
#[derive(Clone, AtatCmd)]
#[at_cmd("+HTTPDATA", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct AnnounceHttpData {
    pub size: u32,
    pub time: u32,
}

#[derive(Clone, AtatCmd)]
#[at_cmd("+HTTPACTION", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct HttpAction {
    /// 0 - GET, 1 - POST, 2 - HEAD
    pub method: u8,
}

#[derive(Clone, AtatCmd)]
#[at_cmd("+HTTPREAD", EmptyResponse, timeout_ms = 5000, termination = "\r")]
pub struct ReadHttpResponse;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::at::render;

    #[test]
    fn bearer_binding_is_numeric() {
        assert_eq!(
            render(&SetHttpBearer::new(1)).unwrap(),
            b"AT+HTTPPARA=\"CID\",1\r"
        );
    }

    #[test]
    fn url_and_data_announcement() {
        let url = SetHttpParameter::url("http://example.com/api").unwrap();
        assert_eq!(
            render(&url).unwrap(),
            b"AT+HTTPPARA=\"URL\",\"http://example.com/api\"\r"
        );
        let data = AnnounceHttpData {
            size: 17,
            time: 10_000,
        };
        assert_eq!(render(&data).unwrap(), b"AT+HTTPDATA=17,10000\r");
    }

    #[test]
    fn url_longer_than_field_is_rejected() {
        let url = "h".repeat(URL_LEN + 1);
        assert!(SetHttpParameter::url(&url).is_err());
    }
}
