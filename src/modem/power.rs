use embedded_hal::{delay::DelayNs, digital::OutputPin};
use log::info;

/// Physical control lines of the modem.
pub trait ModemPower {
    /// Run the power-on sequence. Returns once the key press is released; the
    /// firmware still needs time to boot afterwards.
    fn power_on(&mut self);
    fn power_off(&mut self);
    /// Status LED, lit while a message is being sent.
    fn set_indicator(&mut self, on: bool);
}

/// [`ModemPower`] over plain GPIO lines.
pub struct GpioPower<K, P, L, D> {
    pwrkey: K,
    power_on: P,
    indicator: L,
    delay: D,
}

impl<K, P, L, D> GpioPower<K, P, L, D>
where
    K: OutputPin,
    P: OutputPin,
    L: OutputPin,
    D: DelayNs,
{
    pub fn new(pwrkey: K, power_on: P, indicator: L, delay: D) -> Self {
        Self {
            pwrkey,
            power_on,
            indicator,
            delay,
        }
    }
}

fn drive<Pin: OutputPin>(pin: &mut Pin, high: bool, name: &str) {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result
        .map_err(|e| log::error!("Failed to drive {} pin: {:?}", name, e))
        .ok();
}

impl<K, P, L, D> ModemPower for GpioPower<K, P, L, D>
where
    K: OutputPin,
    P: OutputPin,
    L: OutputPin,
    D: DelayNs,
{
    fn power_on(&mut self) {
        info!("Powering on modem...");

        drive(&mut self.power_on, false, "POWER_ON");
        self.delay.delay_ms(100);

        drive(&mut self.power_on, true, "POWER_ON");
        drive(&mut self.pwrkey, true, "PWRKEY");
        self.delay.delay_ms(100);
        drive(&mut self.pwrkey, false, "PWRKEY");
        self.delay.delay_ms(1_000);
        drive(&mut self.pwrkey, true, "PWRKEY");

        info!("Modem powered on");
    }

    fn power_off(&mut self) {
        drive(&mut self.power_on, false, "POWER_ON");
    }

    fn set_indicator(&mut self, on: bool) {
        drive(&mut self.indicator, on, "LED");
    }
}
