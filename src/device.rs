//! The capabilities every supported device shares: opening by name, closing, resetting and
//! decoding input.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::discovery::nth_port;
use crate::{
    ButtonEvent, CancelToken, Direction, InputEvent, MidiBackend, MidiError, Model, RawMessage,
    RecvError, Transport,
};

/// Pause between two empty polls in [`Device::button_flush`]
const FLUSH_POLL_INTERVAL: Duration = Duration::from_millis(5);
/// Consecutive empty polls after which the input buffer counts as flushed
const FLUSH_EMPTY_POLLS: u32 = 3;

/// The model-specific half of a device: setup handshake, reset command and message decoding.
///
/// You as a user of this library will not need to implement this trait. Use the type aliases
/// that each device module provides, for example [`crate::classic::Launchpad`].
pub trait Codec {
    /// What [`Codec::decode`] produces
    type Event: Into<InputEvent>;

    fn model(&self) -> Model;

    /// Port name keyword used by [`Device::open_default`]
    fn default_keyword(&self) -> &'static str {
        self.model().default_keyword()
    }

    /// Runs right after both ports were bound. If this fails, the device is closed again.
    fn setup(&mut self, transport: &mut Transport) -> Result<(), MidiError> {
        let _ = transport;
        Ok(())
    }

    /// Runs when the device is closed.
    fn teardown(&mut self) {}

    /// Turns off all LEDs.
    fn reset(&self, transport: &mut Transport) -> Result<(), MidiError>;

    /// Decodes one raw message. Returns `None` for messages that carry no input (noise frames,
    /// replies, pressure updates).
    fn decode(&self, message: &RawMessage) -> Option<Self::Event>;
}

/// Codecs of devices whose buttons can also be reported as X/Y coordinates.
pub trait XyCodec: Codec {
    fn decode_xy(&self, message: &RawMessage) -> Option<ButtonEvent>;
}

/// Devices whose LEDs can be addressed by X/Y coordinates.
pub trait LedGrid {
    type Color: Copy;

    /// Lights the LED at (`x`, `y`). Coordinates outside the layout are ignored.
    fn light_xy(&mut self, x: u8, y: u8, color: Self::Color) -> Result<(), MidiError>;
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DeviceState {
    Closed,
    /// Both ports are bound and the setup handshake went through
    Open,
}

/// How often [`Device::open_with_retry`] tries to open a device, and how long it waits in between.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryPolicy {
    /// Total number of attempts; zero is treated as one
    pub attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    /// A single attempt
    pub const NONE: Self = Self {
        attempts: 1,
        interval: Duration::from_millis(0),
    };

    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::NONE
    }
}

/// An owned device handle: a [`Transport`] plus the codec of one hardware model.
///
/// Handles start out closed. Dropping a handle closes its ports. Like [`Transport`], a handle
/// must not be used from several threads at once without external serialization.
pub struct Device<C: Codec> {
    transport: Transport,
    codec: C,
    state: DeviceState,
}

impl<C: Codec> Device<C> {
    pub fn with_codec(backend: Arc<dyn MidiBackend>, codec: C) -> Self {
        Self {
            transport: Transport::new(backend),
            codec,
            state: DeviceState::Closed,
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub(crate) fn codec_mut(&mut self) -> &mut C {
        &mut self.codec
    }

    pub fn model(&self) -> Model {
        self.codec.model()
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DeviceState::Open
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    /// Opens the `number`-th (0-based) device whose input and output port names contain `name`,
    /// ignoring case, then runs the model's setup handshake.
    ///
    /// Calling this on an open device does nothing. If anything fails, every port that was opened
    /// on the way is closed again.
    pub fn open(&mut self, number: usize, name: &str) -> Result<(), MidiError> {
        if self.is_open() {
            return Ok(());
        }

        let (input, output) = self.resolve(number, name)?;
        if let Err(e) = self.bind(input, output) {
            self.close();
            return Err(e);
        }

        self.state = DeviceState::Open;
        log::debug!(
            "opened {} #{} matching {:?} (input {}, output {})",
            self.model(),
            number,
            name,
            input,
            output
        );
        Ok(())
    }

    /// Opens the first device matching the model's default port name.
    pub fn open_default(&mut self) -> Result<(), MidiError> {
        let keyword = self.codec.default_keyword();
        self.open(0, keyword)
    }

    /// Like [`Device::open`], but tries again according to `policy`. Useful for devices that
    /// take a moment to show up after being plugged in.
    pub fn open_with_retry(
        &mut self,
        number: usize,
        name: &str,
        policy: &RetryPolicy,
    ) -> Result<(), MidiError> {
        let attempts = policy.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.open(number, name) {
                Ok(()) => return Ok(()),
                Err(e) if attempt < attempts => {
                    log::debug!(
                        "opening {} failed (attempt {}/{}): {}",
                        self.model(),
                        attempt,
                        attempts,
                        e
                    );
                    attempt += 1;
                    std::thread::sleep(policy.interval);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Checks whether a matching device exists, without opening it. Does not check whether the
    /// device is in use.
    pub fn check(&self, number: usize, name: &str) -> bool {
        match self.resolve(number, name) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("{} check failed: {}", self.model(), e);
                false
            }
        }
    }

    fn resolve(&self, number: usize, name: &str) -> Result<(usize, usize), MidiError> {
        let backend = self.transport.backend();
        let output = nth_port(backend, Direction::Output, name, number)?;
        let input = nth_port(backend, Direction::Input, name, number)?;
        Ok((input, output))
    }

    fn bind(&mut self, input: usize, output: usize) -> Result<(), MidiError> {
        self.transport.open_output(output)?;
        self.transport.open_input(input)?;
        self.codec.setup(&mut self.transport)
    }

    /// Closes both ports. Closing a closed device does nothing.
    pub fn close(&mut self) {
        self.transport.close_input();
        self.transport.close_output();
        if self.state == DeviceState::Open {
            log::debug!("closed {}", self.model());
        }
        self.codec.teardown();
        self.state = DeviceState::Closed;
    }

    /// Turns off all LEDs.
    pub fn reset(&mut self) -> Result<(), MidiError> {
        self.codec.reset(&mut self.transport)
    }

    /// Clears the input buffer. The devices remember every button event that happened while
    /// nobody was listening and replay them on connect; call this after opening to get rid of
    /// them.
    ///
    /// Polls until three polls in a row came back empty, pausing 5ms between empty polls.
    /// Returns the number of discarded messages.
    pub fn button_flush(&mut self) -> usize {
        self.flush_with(|| std::thread::sleep(FLUSH_POLL_INTERVAL))
    }

    fn flush_with(&self, mut pause: impl FnMut()) -> usize {
        let mut discarded = 0;
        let mut empty_polls = 0;
        while empty_polls < FLUSH_EMPTY_POLLS {
            match self.transport.try_recv() {
                Some(_) => {
                    discarded += 1;
                    empty_polls = 0;
                }
                None => {
                    empty_polls += 1;
                    if empty_polls < FLUSH_EMPTY_POLLS {
                        pause();
                    }
                }
            }
        }
        discarded
    }

    /// Returns the next raw message, undecoded. Useful for debugging or checking new devices.
    pub fn event_raw(&self) -> Option<RawMessage> {
        self.transport.try_recv()
    }

    /// Returns the next decoded input event without blocking. Messages that carry no input are
    /// discarded on the way.
    pub fn button_state_raw(&self) -> Option<C::Event> {
        self.poll_with(|message| self.codec.decode(message))
    }

    /// Blocks until a decodable input event arrives, `timeout` passes or `cancel` is triggered.
    pub fn wait(
        &self,
        timeout: Option<Duration>,
        cancel: Option<&CancelToken>,
    ) -> Result<C::Event, RecvError> {
        self.wait_with(timeout, cancel, |message| self.codec.decode(message))
    }

    fn poll_with<T>(&self, decode: impl Fn(&RawMessage) -> Option<T>) -> Option<T> {
        while let Some(message) = self.transport.try_recv() {
            match decode(&message) {
                Some(event) => return Some(event),
                None => log::trace!("{}: dropped {:?}", self.model(), message),
            }
        }
        None
    }

    fn wait_with<T>(
        &self,
        timeout: Option<Duration>,
        cancel: Option<&CancelToken>,
        decode: impl Fn(&RawMessage) -> Option<T>,
    ) -> Result<T, RecvError> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        loop {
            let message = self.transport.recv_deadline(deadline, cancel)?;
            match decode(&message) {
                Some(event) => return Ok(event),
                None => log::trace!("{}: dropped {:?}", self.model(), message),
            }
        }
    }
}

impl<C: XyCodec> Device<C> {
    /// Like [`Device::button_state_raw`], but reports buttons by their X/Y coordinates.
    pub fn button_state_xy(&self) -> Option<ButtonEvent> {
        self.poll_with(|message| self.codec.decode_xy(message))
    }

    /// Like [`Device::wait`], but reports buttons by their X/Y coordinates.
    pub fn wait_xy(
        &self,
        timeout: Option<Duration>,
        cancel: Option<&CancelToken>,
    ) -> Result<ButtonEvent, RecvError> {
        self.wait_with(timeout, cancel, |message| self.codec.decode_xy(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classic::Launchpad;
    use crate::mock::MockBackend;
    use crate::pro::LaunchpadPro;
    use crate::Button;

    fn backend() -> MockBackend {
        MockBackend::new()
            .with_port("Midi Through")
            .with_port("Launchpad Mini")
            .with_port("Launchpad Pro")
    }

    #[test]
    fn open_binds_matching_ports() {
        let backend = backend();
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));
        assert_eq!(launchpad.state(), DeviceState::Closed);

        launchpad.open(1, "LAUNCHPAD").unwrap();
        assert!(launchpad.is_open());
        assert_eq!(launchpad.transport().input_id(), Some(2));
        assert_eq!(launchpad.transport().output_id(), Some(2));
        assert_eq!(backend.live_connections(), (1, 1));
    }

    #[test]
    fn open_twice_is_a_no_op() {
        let backend = backend();
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));
        launchpad.open(0, "launchpad").unwrap();
        launchpad.open(1, "launchpad").unwrap();
        assert_eq!(launchpad.transport().input_id(), Some(1));
        assert_eq!(backend.live_connections(), (1, 1));
    }

    #[test]
    fn close_twice_is_harmless() {
        let backend = backend();
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));
        launchpad.open(0, "launchpad").unwrap();
        launchpad.close();
        launchpad.close();
        assert_eq!(launchpad.state(), DeviceState::Closed);
        assert_eq!(backend.live_connections(), (0, 0));
    }

    #[test]
    fn missing_device_is_reported() {
        let backend = MockBackend::new()
            .with_port("Launchpad Mini")
            .with_output("Launchpad Mini 2");
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));

        // two outputs but only one input match
        assert!(matches!(
            launchpad.open(1, "launchpad"),
            Err(MidiError::DeviceNotFound {
                direction: Direction::Input,
                ..
            })
        ));
        assert_eq!(launchpad.state(), DeviceState::Closed);
        assert_eq!(backend.live_connections(), (0, 0));
    }

    #[test]
    fn partial_open_rolls_back() {
        let backend = backend();
        backend.refuse_inputs(true);
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));
        assert!(launchpad.open(0, "launchpad").is_err());
        assert_eq!(launchpad.state(), DeviceState::Closed);
        assert_eq!(launchpad.transport().output_id(), None);
        assert_eq!(backend.live_connections(), (0, 0));

        backend.refuse_inputs(false);
        launchpad.open(0, "launchpad").unwrap();
        assert!(launchpad.is_open());
    }

    #[test]
    fn failed_handshake_closes_the_ports() {
        let backend = backend();
        backend.fail_sends(true);
        let mut pro = LaunchpadPro::pro(Arc::new(backend.clone()));
        assert!(pro.open(0, "pro").is_err());
        assert_eq!(pro.state(), DeviceState::Closed);
        assert!(!pro.is_configured());
        assert_eq!(backend.live_connections(), (0, 0));
    }

    #[test]
    fn check_does_not_bind() {
        let backend = backend();
        let launchpad = Launchpad::new(Arc::new(backend.clone()));
        assert!(launchpad.check(0, "mini"));
        assert!(!launchpad.check(1, "mini"));
        assert_eq!(backend.live_connections(), (0, 0));
    }

    #[test]
    fn retries_until_the_device_shows_up() {
        let backend = MockBackend::new();
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));
        let policy = RetryPolicy::new(3, Duration::from_millis(1));
        assert!(launchpad.open_with_retry(0, "launchpad", &policy).is_err());

        let backend = backend.with_port("Launchpad");
        launchpad
            .open_with_retry(0, "launchpad", &policy)
            .unwrap();
        assert_eq!(backend.live_connections(), (1, 1));
    }

    #[test]
    fn flush_discards_replayed_presses() {
        let backend = backend();
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));
        launchpad.open(0, "launchpad").unwrap();
        for _ in 0..4 {
            backend.inject(&[144, 0, 127]);
        }
        assert_eq!(launchpad.button_flush(), 4);
        assert_eq!(launchpad.event_raw(), None);
    }

    #[test]
    fn flush_pauses_only_between_empty_polls() {
        let backend = backend();
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));
        launchpad.open(0, "launchpad").unwrap();

        let mut pauses = 0;
        assert_eq!(launchpad.flush_with(|| pauses += 1), 0);
        assert_eq!(pauses, 2);

        backend.inject(&[144, 0, 127]);
        let mut pauses = 0;
        assert_eq!(launchpad.flush_with(|| pauses += 1), 1);
        assert_eq!(pauses, 2);
    }

    #[test]
    fn polling_skips_noise() {
        let backend = backend();
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));
        launchpad.open(0, "launchpad").unwrap();
        backend.inject(&[240, 0, 32, 41]);
        backend.inject(&[144, 17, 127]);
        let event = launchpad.button_state_raw().unwrap();
        assert_eq!(event.button, Button::Raw(17));
        assert_eq!(launchpad.button_state_raw(), None);
    }

    #[test]
    fn waiting_times_out_on_noise_only() {
        let backend = backend();
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));
        launchpad.open(0, "launchpad").unwrap();
        backend.inject(&[247, 0, 0, 0]);
        assert_eq!(
            launchpad.wait(Some(Duration::from_millis(10)), None),
            Err(RecvError::Timeout)
        );
    }

    #[test]
    fn event_raw_is_undecoded() {
        let backend = backend();
        let mut launchpad = Launchpad::new(Arc::new(backend.clone()));
        assert_eq!(launchpad.event_raw(), None);
        launchpad.open(0, "launchpad").unwrap();
        backend.inject(&[2, 16, 45, 0]);
        assert_eq!(
            launchpad.event_raw(),
            Some(RawMessage::Fragment(vec![2, 16, 45, 0]))
        );
    }
}
