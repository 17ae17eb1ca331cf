#[derive(serde::Deserialize)]
struct Config {
    apn: String,
    #[serde(default)]
    apn_user: String,
    #[serde(default)]
    apn_password: String,
    report_url: String,
    report_interval_seconds: u64,
    #[serde(default)]
    sms_recipient: String,
    modem_boot_ms: u32,
}

impl Config {
    fn check(&self) {
        assert!(!self.apn.is_empty(), "apn is empty");
        assert!(
            self.report_url.starts_with("http://"),
            "report_url must be a plain http:// url"
        );
        assert!(self.report_url.len() <= 256, "report_url is too long");
        assert!(
            self.report_interval_seconds > 0,
            "report_interval_seconds is invalid"
        );
        assert!(
            self.sms_recipient.is_empty()
                || self
                    .sms_recipient
                    .strip_prefix('+')
                    .is_some_and(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit())),
            "sms_recipient must be in international format"
        );
        assert!(self.modem_boot_ms > 0, "modem_boot_ms is invalid");
    }

    fn export_vars(&self) {
        println!("cargo:rustc-env=APN={}", self.apn);
        println!("cargo:rustc-env=APN_USER={}", self.apn_user);
        println!("cargo:rustc-env=APN_PASSWORD={}", self.apn_password);
        println!("cargo:rustc-env=REPORT_URL={}", self.report_url);
        println!(
            "cargo:rustc-env=REPORT_INTERVAL_SECONDS={}",
            self.report_interval_seconds
        );
        println!("cargo:rustc-env=SMS_RECIPIENT={}", self.sms_recipient);
        println!("cargo:rustc-env=MODEM_BOOT_MS={}", self.modem_boot_ms);
    }
}

fn main() {
    // The library builds for any target; only the firmware needs board config.
    if std::env::var_os("CARGO_FEATURE_FIRMWARE").is_none() {
        return;
    }

    println!("cargo:rustc-link-arg-bins=-Tlinkall.x");

    println!("cargo:rerun-if-changed=config.yml");
    let config = {
        let config_string = std::fs::read_to_string("config.yml").expect("config.yml not found");
        serde_yaml::from_str::<Config>(&config_string).expect("config.yml is not valid")
    };
    config.check();
    config.export_vars();
}
