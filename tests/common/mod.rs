//! Scripted stand-ins for the modem link, clock and power lines.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use simlink::{Clock, Modem, ModemConfig, ModemPower};

pub const SUB: &str = "\u{1a}";

struct Rule {
    pattern: String,
    replies: Vec<String>,
    remaining: Option<usize>,
}

impl Rule {
    fn matches(&self, line: &str) -> bool {
        self.remaining != Some(0)
            && (line == self.pattern || line.starts_with(&format!("{}=", self.pattern)))
    }
}

#[derive(Default)]
struct Link {
    rules: Vec<Rule>,
    rx: VecDeque<u8>,
    /// Replies released one at a time, each after the link has gone quiet.
    deferred: VecDeque<String>,
    sent: Vec<String>,
    written: Vec<u8>,
}

/// Serial link that answers written lines from a script.
///
/// A rule matches a line equal to its pattern, or starting with `pattern=`.
/// The first matching rule wins; rules added with [`MockSerial::on_times`]
/// stop matching once used up. Lines without a rule get no answer.
#[derive(Clone, Default)]
pub struct MockSerial(Rc<RefCell<Link>>);

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, pattern: &str, replies: &[&str]) -> &Self {
        self.push_rule(pattern, replies, None)
    }

    pub fn on_times(&self, pattern: &str, times: usize, replies: &[&str]) -> &Self {
        self.push_rule(pattern, replies, Some(times))
    }

    fn push_rule(&self, pattern: &str, replies: &[&str], remaining: Option<usize>) -> &Self {
        self.0.borrow_mut().rules.push(Rule {
            pattern: pattern.to_string(),
            replies: replies.iter().map(|r| r.to_string()).collect(),
            remaining,
        });
        self
    }

    /// Bytes that show up on the link without being asked for.
    pub fn inject(&self, bytes: &str) {
        self.0.borrow_mut().rx.extend(bytes.bytes());
    }

    /// Every write, with the trailing line terminator stripped.
    pub fn sent(&self) -> Vec<String> {
        self.0.borrow().sent.clone()
    }

    pub fn written(&self) -> Vec<u8> {
        self.0.borrow().written.clone()
    }

    pub fn count(&self, line: &str) -> usize {
        self.0.borrow().sent.iter().filter(|s| *s == line).count()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.0
            .borrow()
            .sent
            .iter()
            .filter(|s| s.starts_with(prefix))
            .count()
    }

    pub fn position(&self, line: &str) -> Option<usize> {
        self.0.borrow().sent.iter().position(|s| s == line)
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = Infallible;
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut link = self.0.borrow_mut();
        let len = buf.len().min(link.rx.len());
        for slot in buf.iter_mut().take(len) {
            *slot = link.rx.pop_front().unwrap();
        }
        Ok(len)
    }
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        let mut link = self.0.borrow_mut();
        if !link.rx.is_empty() {
            return Ok(true);
        }
        if let Some(next) = link.deferred.pop_front() {
            link.rx.extend(next.bytes());
        }
        Ok(false)
    }
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut link = self.0.borrow_mut();
        link.written.extend_from_slice(buf);
        let line = String::from_utf8_lossy(buf).trim_end().to_string();

        let replies = link
            .rules
            .iter_mut()
            .find(|rule| rule.matches(&line))
            .map(|rule| {
                if let Some(remaining) = rule.remaining.as_mut() {
                    *remaining -= 1;
                }
                rule.replies.clone()
            })
            .unwrap_or_default();

        let mut replies = replies.into_iter();
        if let Some(first) = replies.next() {
            link.rx.extend(first.bytes());
        }
        link.deferred.extend(replies);
        link.sent.push(line);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Simulated time: every clock read advances one millisecond, delays advance
/// by their length.
#[derive(Clone, Default)]
pub struct SimClock {
    now: Rc<Cell<u64>>,
    delays: Rc<RefCell<Vec<u32>>>,
}

impl SimClock {
    /// Current time without advancing it.
    pub fn peek(&self) -> u64 {
        self.now.get()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.delays.borrow().clone()
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        let now = self.now.get();
        self.now.set(now + 1);
        now
    }
}

impl DelayNs for SimClock {
    fn delay_ns(&mut self, ns: u32) {
        self.now.set(self.now.get() + u64::from(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.borrow_mut().push(ms);
        self.now.set(self.now.get() + u64::from(ms));
    }
}

#[derive(Default, Debug)]
pub struct PowerLog {
    pub power_ons: usize,
    pub power_offs: usize,
    pub indicator: Vec<bool>,
}

#[derive(Clone, Default)]
pub struct MockPower(Rc<RefCell<PowerLog>>);

impl MockPower {
    pub fn power_ons(&self) -> usize {
        self.0.borrow().power_ons
    }

    pub fn power_offs(&self) -> usize {
        self.0.borrow().power_offs
    }

    pub fn indicator(&self) -> Vec<bool> {
        self.0.borrow().indicator.clone()
    }
}

impl ModemPower for MockPower {
    fn power_on(&mut self) {
        self.0.borrow_mut().power_ons += 1;
    }

    fn power_off(&mut self) {
        self.0.borrow_mut().power_offs += 1;
    }

    fn set_indicator(&mut self, on: bool) {
        self.0.borrow_mut().indicator.push(on);
    }
}

pub type TestModem = Modem<MockSerial, MockPower, SimClock, SimClock>;

pub struct Bench {
    pub modem: TestModem,
    pub link: MockSerial,
    pub power: MockPower,
    pub clock: SimClock,
}

pub fn bench(config: ModemConfig) -> Bench {
    let link = MockSerial::new();
    let power = MockPower::default();
    let clock = SimClock::default();
    let modem = Modem::new(
        link.clone(),
        power.clone(),
        clock.clone(),
        clock.clone(),
        config,
    );
    Bench {
        modem,
        link,
        power,
        clock,
    }
}

/// A modem that answers the probe and acknowledges setup commands.
pub fn live_bench() -> Bench {
    let bench = bench(ModemConfig::default());
    bench.link.on("AT", &["\r\nOK\r\n"]);
    bench
}

/// Debug sink capturing lines for inspection.
#[derive(Clone, Default)]
pub struct SharedSink(Rc<RefCell<Vec<u8>>>);

impl SharedSink {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl embedded_io::ErrorType for SharedSink {
    type Error = Infallible;
}

impl embedded_io::Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
