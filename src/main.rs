#![no_std]
#![no_main]
#![feature(type_alias_impl_trait)]
#![feature(const_int_from_str)]

use alloc::string::ToString;
use anyhow::anyhow;
use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Instant, Timer};
use esp_backtrace as _;
use esp_hal::{
    gpio::{Io, Level, Output},
    uart::{self, Uart},
};
use esp_hal_embassy::main;
use log::info;
pub use simlink as lib;

use lib::{Clock, GpioPower, HttpMethod, Modem, ModemConfig};

extern crate alloc;

mod settings;

const MODEM_BAUD: u32 = 115_200;
const HEAP_SIZE: usize = 48 * 1024;

const REPORT_INTERVAL: Duration = Duration::from_secs(
    match u64::from_str_radix(env!("REPORT_INTERVAL_SECONDS"), 10) {
        Ok(d) => d,
        Err(_) => panic!("Invalid REPORT_INTERVAL_SECONDS"),
    },
);

/// Milliseconds since boot, from the embassy time driver.
struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

#[export_name = "custom_halt"]
pub fn custom_halt() -> ! {
    loop {
        esp_hal::reset::software_reset();
    }
}

#[main]
async fn main_task(_spawner: Spawner) {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = esp_hal::timer::timg::TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    esp_alloc::heap_allocator!(HEAP_SIZE);

    esp_println::logger::init_logger(log::LevelFilter::Info);

    let io = Io::new(peripherals.GPIO, peripherals.IO_MUX);

    // LilyGO T-Call SIM800L wiring
    let modem_pwrkey = Output::new(io.pins.gpio4, Level::Low);
    let modem_power_on = Output::new(io.pins.gpio23, Level::Low);
    let status_led = Output::new(io.pins.gpio13, Level::Low);

    let modem_uart = Uart::new_with_config(
        peripherals.UART2,
        uart::config::Config {
            baudrate: MODEM_BAUD,
            data_bits: uart::config::DataBits::DataBits8,
            parity: uart::config::Parity::ParityNone,
            stop_bits: uart::config::StopBits::STOP1,
            ..Default::default()
        },
        io.pins.gpio26,
        io.pins.gpio27,
    )
    .expect("Failed to initialize modem UART");

    let settings = settings::Settings::get();
    let power = GpioPower::new(modem_pwrkey, modem_power_on, status_led, Delay);
    let mut modem = Modem::new(
        modem_uart,
        power,
        SystemClock,
        Delay,
        ModemConfig {
            boot_time_ms: settings.boot_time_ms,
            debug: true,
            ..ModemConfig::default()
        },
    );

    modem.start_default();
    modem.set_apn(settings.apn, settings.apn_user, settings.apn_password);

    if let Some(recipient) = settings.sms_recipient {
        let timeout = modem.config().sms.timeout_ms;
        match modem.send_sms(recipient, "simlink online", timeout) {
            Ok(()) => info!("Boot notification sent"),
            Err(e) => log::error!("Boot notification failed: {}", e),
        }
    }

    loop {
        if let Err(e) = report(&mut modem, settings) {
            log::error!("Status report failed: {:?}", e);
        }
        Timer::after(REPORT_INTERVAL).await;
    }
}

fn report<S, P, C, D>(
    modem: &mut Modem<S, P, C, D>,
    settings: &settings::Settings,
) -> anyhow::Result<()>
where
    S: embedded_io::Read + embedded_io::ReadReady + embedded_io::Write,
    P: lib::ModemPower,
    C: Clock,
    D: embedded_hal::delay::DelayNs,
{
    let quality = modem.signal_quality();
    info!("Signal quality: {}", quality);

    let body = serde_json::json!({
        "signal": quality.label(),
        "uptime": Instant::now().as_secs(),
    })
    .to_string();

    let timeout = modem.config().http.timeout_ms;
    let response = modem
        .send_http_request(settings.report_url, HttpMethod::Post, Some(&body), timeout)
        .map_err(|e| anyhow!("Failed to post status: {}", e))?;

    if !response.action.is_success() {
        anyhow::bail!("Server answered {}", response.action.status);
    }
    info!("Status posted ({})", response.action.status);
    Ok(())
}
