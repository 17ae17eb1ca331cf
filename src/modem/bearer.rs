use embedded_hal::delay::DelayNs;
use embedded_io::{Read, ReadReady, Write};
use log::warn;

use super::{Clock, Modem, ModemPower};
use crate::at::bearer::SetBearerParameter;
use crate::response::Response;

impl<S, P, C, D> Modem<S, P, C, D>
where
    S: Read + ReadReady + Write,
    P: ModemPower,
    C: Clock,
    D: DelayNs,
{
    /// Configure the GPRS bearer used by [`Modem::send_http_request`].
    ///
    /// Credentials are only sent when at least one of them is non-empty. A
    /// rejected APN is logged, not reported: check the bearer yourself when it
    /// matters.
    pub fn set_apn(&mut self, apn: &str, user: &str, pass: &str) {
        self.ensure_ready();

        self.set_bearer_parameter("Contype", "GPRS");
        let response = self.set_bearer_parameter("APN", apn);
        if response.is_ok() {
            self.interface.status(format_args!("APN set: {}", apn));
        } else {
            warn!("Setting APN {} failed: {}", apn, response.as_str().trim());
        }

        if !user.is_empty() || !pass.is_empty() {
            self.set_bearer_parameter("USER", user);
            self.set_bearer_parameter("PWD", pass);
        }
    }

    fn set_bearer_parameter(&mut self, tag: &str, value: &str) -> Response {
        match SetBearerParameter::new(tag, value) {
            Ok(cmd) => self.command(&cmd),
            Err(e) => {
                log::error!("Bearer parameter {} not set: {}", tag, e);
                Response::NoResponse
            }
        }
    }
}
