use alloc::string::String;
use core::str::FromStr;

use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use log::warn;

use super::{Clock, Modem, ModemPower};
use crate::at::bearer::{self, BearerControl};
use crate::at::OK;
use crate::at::http::{
    AnnounceHttpData, HttpAction, InitHttp, ReadHttpResponse, SetHttpBearer, SetHttpParameter,
    TerminateHttp, ACTION_RESULT, DOWNLOAD, READ_HEADER,
};
use crate::error::HttpError;
use crate::response::{int_or_zero, Response, Tokens};

/// Content type announced for every request.
pub const CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    fn code(self) -> u8 {
        match self {
            Self::Get => 0,
            Self::Post => 1,
        }
    }
}

impl FromStr for HttpMethod {
    type Err = HttpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(Self::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(Self::Post)
        } else {
            Err(HttpError::UnsupportedMethod)
        }
    }
}

/// `+HTTPACTION: <method>,<status>,<length>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpActionResult {
    pub method: u8,
    pub status: u16,
    pub length: usize,
}

impl HttpActionResult {
    pub fn parse(response: &Response) -> Option<Self> {
        let mut tokens = response.tokens().ok()?.after(ACTION_RESULT).ok()?;
        let method = int_or_zero(tokens.until(',').ok()?);
        let status = int_or_zero(tokens.until(',').ok()?);
        let length = int_or_zero(tokens.field(','));
        Some(Self {
            method: u8::try_from(method).ok()?,
            status: u16::try_from(status).ok()?,
            length: usize::try_from(length).unwrap_or(0),
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub action: HttpActionResult,
    /// Everything the modem sent back for `AT+HTTPREAD`.
    pub raw: String,
}

impl HttpResponse {
    /// The response body, cut out of the `+HTTPREAD: <n>` frame.
    pub fn payload(&self) -> &str {
        let Ok(mut tokens) = Tokens::new(&self.raw).after(READ_HEADER) else {
            return "";
        };
        let len = usize::try_from(int_or_zero(tokens.field('\n'))).unwrap_or(0);
        let rest = tokens.rest();
        match rest.get(..len) {
            Some(body) => body,
            // Length off a char boundary or past the end: take what precedes the final `OK`.
            None => {
                let rest = rest.trim_end();
                rest.strip_suffix(OK).unwrap_or(rest).trim_end()
            }
        }
    }
}

impl<S, P, C, D> Modem<S, P, C, D>
where
    S: Read + ReadReady + Write,
    P: ModemPower,
    C: Clock,
    D: DelayNs,
{
    /// Run one HTTP request over the GPRS bearer.
    ///
    /// The bearer must have been configured with [`Modem::set_apn`]; this is
    /// not checked and a modem without one fails somewhere along the way.
    /// Once the action has been issued the HTTP session and the bearer are
    /// always torn down; on the earlier abort paths that depends on
    /// [`crate::config::HttpConfig::teardown_on_abort`].
    pub fn send_http_request(
        &mut self,
        url: &str,
        method: HttpMethod,
        body: Option<&str>,
        timeout_ms: u32,
    ) -> Result<HttpResponse, HttpError> {
        let url = SetHttpParameter::url(url).map_err(HttpError::UrlTooLong)?;

        self.ensure_ready();

        self.command(&BearerControl::open());
        self.command(&InitHttp);
        self.command(&SetHttpBearer::new(bearer::PROFILE));
        self.command(&url);
        if let Ok(content_type) = SetHttpParameter::content_type(CONTENT_TYPE) {
            self.command(&content_type);
        }

        if let Some(body) = body {
            let announce = AnnounceHttpData {
                size: u32::try_from(body.len()).unwrap_or(u32::MAX),
                time: self.config.http.upload_timeout_ms,
            };
            let ready = self.command(&announce);
            if !ready.contains(DOWNLOAD) {
                return self.abort_http(HttpError::UploadRejected);
            }
            let upload_ms = self.config.http.upload_timeout_ms;
            self.transact(body.as_bytes(), upload_ms);
        }

        let action = self.command(&HttpAction {
            method: method.code(),
        });
        if !action.is_ok() {
            return self.abort_http(HttpError::ActionFailed);
        }

        let result = match HttpActionResult::parse(&action) {
            Some(result) => Some(result),
            None => HttpActionResult::parse(&self.poll(timeout_ms)),
        };

        let outcome = match result {
            Some(action) => {
                self.interface
                    .status(format_args!("HTTP status: {}", action.status));
                match self.command_with_timeout(&ReadHttpResponse, timeout_ms) {
                    Response::Text(raw) => Ok(HttpResponse { action, raw }),
                    Response::NoResponse => Err(HttpError::NoResponse),
                }
            }
            None => Err(HttpError::NoActionResult),
        };

        self.close_http();
        outcome
    }

    fn abort_http(&mut self, error: HttpError) -> Result<HttpResponse, HttpError> {
        if self.config.http.teardown_on_abort {
            self.close_http();
        } else {
            warn!("HTTP request aborted ({}), session left open", error);
        }
        Err(error)
    }

    fn close_http(&mut self) {
        self.command(&TerminateHttp);
        self.command(&BearerControl::close());
    }
}
