/// Upper bound on SMS send attempts per call.
pub const MAX_SMS_ATTEMPTS: u8 = 3;

/// Runtime knobs for [`crate::Modem`]. Defaults match the SIM800 timings the
/// workflows were tuned against.
#[derive(Debug, Clone, PartialEq)]
pub struct ModemConfig {
    /// How long [`crate::Modem::start_default`] waits for the firmware to boot.
    pub boot_time_ms: u32,
    /// Deadline for the `AT` liveness probe.
    pub probe_timeout_ms: u32,
    /// Mirror every transaction to the debug sink.
    pub debug: bool,
    pub sms: SmsConfig,
    pub http: HttpConfig,
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            boot_time_ms: 10_000,
            probe_timeout_ms: 1_000,
            debug: false,
            sms: SmsConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmsConfig {
    /// Deadline for each step and for the final delivery report.
    pub timeout_ms: u32,
    pub retry: RetryPolicy,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    /// Deadline for the action result and the body read.
    pub timeout_ms: u32,
    /// Upload window announced with `AT+HTTPDATA`.
    pub upload_timeout_ms: u32,
    /// Terminate HTTP and close the bearer when the upload or the action is
    /// rejected. With `false` those paths return without teardown.
    pub teardown_on_abort: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            upload_timeout_ms: 10_000,
            teardown_on_abort: true,
        }
    }
}

/// Bounded retry for one SMS send call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Clamped to `1..=MAX_SMS_ATTEMPTS`.
    pub max_attempts: u8,
    /// Wait before retrying against a modem that is still live.
    pub backoff_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_SMS_ATTEMPTS,
            backoff_ms: 10_000,
        }
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    GiveUp,
    /// The modem stopped answering: power-cycle it before the next attempt.
    Restart,
    Backoff(u32),
}

impl RetryPolicy {
    pub fn attempts(&self) -> u8 {
        self.max_attempts.clamp(1, MAX_SMS_ATTEMPTS)
    }

    /// `attempt` is the 1-based number of the attempt that just failed.
    pub fn after_failure(&self, attempt: u8, modem_alive: bool) -> RetryDecision {
        if attempt >= self.attempts() {
            RetryDecision::GiveUp
        } else if !modem_alive {
            RetryDecision::Restart
        } else {
            RetryDecision::Backoff(self.backoff_ms)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_capped_at_three() {
        let policy = RetryPolicy {
            max_attempts: 10,
            backoff_ms: 0,
        };
        assert_eq!(policy.attempts(), 3);
        assert_eq!(policy.after_failure(3, true), RetryDecision::GiveUp);

        let zero = RetryPolicy {
            max_attempts: 0,
            backoff_ms: 0,
        };
        assert_eq!(zero.attempts(), 1);
    }

    #[test]
    fn dead_modem_restarts_live_modem_backs_off() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.after_failure(1, false), RetryDecision::Restart);
        assert_eq!(
            policy.after_failure(2, true),
            RetryDecision::Backoff(10_000)
        );
        assert_eq!(policy.after_failure(3, false), RetryDecision::GiveUp);
    }
}
