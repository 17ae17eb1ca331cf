use core::fmt;

use crate::response::{int_or_zero, Response, NO_RESPONSE};

const CSQ_MARKER: &str = "+CSQ: ";

/// Received signal strength, bucketed from the `+CSQ` RSSI field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignalQuality {
    /// The modem did not answer, or the answer had no RSSI field.
    Unknown,
    NoSignal,
    Poor,
    Medium,
    Good,
    Excellent,
}

impl SignalQuality {
    /// Lower bounds, highest first. The first match wins.
    const THRESHOLDS: [(i32, SignalQuality); 4] = [
        (20, SignalQuality::Excellent),
        (15, SignalQuality::Good),
        (10, SignalQuality::Medium),
        (1, SignalQuality::Poor),
    ];

    pub fn from_rssi(rssi: i32) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| rssi >= *min)
            .map(|(_, quality)| *quality)
            .unwrap_or(SignalQuality::NoSignal)
    }

    /// Decode the answer to `AT+CSQ` (`+CSQ: <rssi>,<ber>`).
    pub fn parse(response: &Response) -> Self {
        let Ok(tokens) = response.tokens() else {
            return Self::Unknown;
        };
        let Ok(mut tokens) = tokens.after(CSQ_MARKER) else {
            return Self::Unknown;
        };
        match tokens.until(',') {
            Ok(rssi) => Self::from_rssi(int_or_zero(rssi)),
            Err(_) => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unknown => NO_RESPONSE,
            Self::NoSignal => "no signal",
            Self::Poor => "poor",
            Self::Medium => "medium",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
