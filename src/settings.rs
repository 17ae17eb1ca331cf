//! Board settings baked in by `build.rs` from `config.yml`.

static SETTINGS: Settings = Settings {
    apn: env!("APN"),
    apn_user: env!("APN_USER"),
    apn_password: env!("APN_PASSWORD"),
    report_url: env!("REPORT_URL"),
    sms_recipient: if env!("SMS_RECIPIENT").is_empty() {
        None
    } else {
        Some(env!("SMS_RECIPIENT"))
    },
    boot_time_ms: match u32::from_str_radix(env!("MODEM_BOOT_MS"), 10) {
        Ok(ms) => ms,
        Err(_) => panic!("Invalid MODEM_BOOT_MS"),
    },
};

#[derive(Debug)]
pub struct Settings {
    pub apn: &'static str,
    pub apn_user: &'static str,
    pub apn_password: &'static str,
    pub report_url: &'static str,
    /// Receives a message once the modem is up.
    pub sms_recipient: Option<&'static str>,
    pub boot_time_ms: u32,
}

impl Settings {
    pub fn get() -> &'static Self {
        &SETTINGS
    }
}
