use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use log::{info, warn};

use super::{Clock, Modem, ModemPower};
use crate::at::{sms::SendMessage, sms::SetMessageFormat, CTRL_Z};
use crate::config::{RetryDecision, RetryPolicy};
use crate::error::SmsError;

// Settle times between protocol steps. The SIM800 drops input that arrives
// before it has finished the previous step.
const BEFORE_FORMAT_MS: u32 = 100;
const AFTER_FORMAT_MS: u32 = 1_000;
const AFTER_ADDRESS_MS: u32 = 1_000;
const AFTER_BODY_MS: u32 = 100;
const AFTER_COMMIT_MS: u32 = 2_000;
const INDICATOR_HOLD_MS: u32 = 100;

/// Reject input the modem would fail on, before touching the link.
pub fn validate_sms(number: &str, text: &str) -> Result<(), SmsError> {
    if number.is_empty() {
        return Err(SmsError::EmptyRecipient);
    }
    if text.is_empty() {
        return Err(SmsError::EmptyMessage);
    }
    let Some(digits) = number.strip_prefix('+') else {
        return Err(SmsError::MissingInternationalPrefix);
    };
    // The number is sent inside a quoted command argument.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SmsError::InvalidRecipient);
    }
    Ok(())
}

impl<S, P, C, D> Modem<S, P, C, D>
where
    S: Read + ReadReady + Write,
    P: ModemPower,
    C: Clock,
    D: DelayNs,
{
    /// Send a text message to an international number (`+49...`), retrying
    /// with the configured policy.
    pub fn send_sms(&mut self, number: &str, text: &str, timeout_ms: u32) -> Result<(), SmsError> {
        let policy = self.config.sms.retry;
        self.send_sms_with_retry(number, text, timeout_ms, policy)
    }

    pub fn send_sms_with_retry(
        &mut self,
        number: &str,
        text: &str,
        timeout_ms: u32,
        policy: RetryPolicy,
    ) -> Result<(), SmsError> {
        if let Err(e) = validate_sms(number, text) {
            self.interface.status(format_args!("Invalid SMS: {}", e));
            return Err(e);
        }
        let address = SendMessage::new(number).map_err(SmsError::RecipientTooLong)?;

        let attempts = policy.attempts();
        for attempt in 1..=attempts {
            self.ensure_ready();
            if self.sms_attempt(&address, text, timeout_ms) {
                self.interface.status(format_args!("SMS sent: {}", text));
                info!("SMS sent to {}", number);
                return Ok(());
            }
            self.interface
                .status(format_args!("SMS attempt {}/{} failed", attempt, attempts));

            let alive = attempt < attempts && self.is_active();
            match policy.after_failure(attempt, alive) {
                RetryDecision::GiveUp => break,
                RetryDecision::Restart => self.start_default(),
                RetryDecision::Backoff(ms) => self.interface.delay_ms(ms),
            }
        }

        warn!("Giving up on SMS to {} after {} attempts", number, attempts);
        Err(SmsError::RetriesExhausted { attempts })
    }

    /// One pass through the text-mode send sequence. True when the delivery
    /// report carries `OK`.
    fn sms_attempt(&mut self, address: &SendMessage, text: &str, timeout_ms: u32) -> bool {
        self.power.set_indicator(true);
        self.interface.delay_ms(BEFORE_FORMAT_MS);

        self.command_with_timeout(&SetMessageFormat::text(), timeout_ms);
        self.interface.delay_ms(AFTER_FORMAT_MS);

        self.command_with_timeout(address, timeout_ms);
        self.interface.delay_ms(AFTER_ADDRESS_MS);

        self.transact(text.as_bytes(), timeout_ms);
        self.interface.delay_ms(AFTER_BODY_MS);

        self.interface.write_raw(&[CTRL_Z]);
        self.interface.delay_ms(AFTER_COMMIT_MS);

        let report = self.poll(timeout_ms);
        self.interface
            .status(format_args!("SMS report: {}", report));
        let sent = report.is_ok();

        self.interface.delay_ms(INDICATOR_HOLD_MS);
        self.power.set_indicator(false);
        sent
    }
}
