use core::fmt;

use crate::at::ArgumentTooLong;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmsError {
    EmptyRecipient,
    EmptyMessage,
    /// Recipients must use the international `+<country>` form.
    MissingInternationalPrefix,
    /// Only digits may follow the `+`.
    InvalidRecipient,
    RecipientTooLong(ArgumentTooLong),
    RetriesExhausted { attempts: u8 },
}

impl fmt::Display for SmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRecipient => write!(f, "recipient is empty"),
            Self::EmptyMessage => write!(f, "message text is empty"),
            Self::MissingInternationalPrefix => write!(f, "recipient must start with '+'"),
            Self::InvalidRecipient => write!(f, "recipient must be digits after '+'"),
            Self::RecipientTooLong(e) => write!(f, "recipient too long: {e}"),
            Self::RetriesExhausted { attempts } => {
                write!(f, "message not sent after {attempts} attempts")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpError {
    UnsupportedMethod,
    UrlTooLong(ArgumentTooLong),
    /// The modem did not answer `AT+HTTPDATA` with `DOWNLOAD`.
    UploadRejected,
    ActionFailed,
    /// No `+HTTPACTION:` notification arrived.
    NoActionResult,
    /// `AT+HTTPREAD` got no answer.
    NoResponse,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedMethod => write!(f, "only GET and POST are supported"),
            Self::UrlTooLong(e) => write!(f, "url too long: {e}"),
            Self::UploadRejected => write!(f, "modem refused the request body"),
            Self::ActionFailed => write!(f, "modem rejected the HTTP action"),
            Self::NoActionResult => write!(f, "no HTTP action result"),
            Self::NoResponse => write!(f, "no HTTP response"),
        }
    }
}
