//! The LaunchKey Mini keyboard: 25 keys, 16 pads, 8 knobs and a few round buttons.
//!
//! The device has no LEDs this library can drive; it is input only.
//!
//! Raw numbers, as reported in input events (the octave buttons shift keys by 12):
//! ```text
//!                   +---+---+---+---+---+---+---+---+
//!    knobs          | 21| 22|...|   |   |   |   | 28|
//! +---+---+---+     +---+---+---+---+---+---+---+---+ +---+  +---+
//! |106|107|   |     | 40| 41| 42| 43| 48| 49| 50| 51| |108|  |104|
//! +---+---+---+     +---+---+---+---+---+---+---+---+ +---+  +---+
//! |   |   |         | 36| 37| 38| 39| 44| 45| 46| 47| |109|  |105|
//! +---+---+         +---+---+---+---+---+---+---+---+ +---+  +---+
//!
//!   keys 48 (C) ..= 72 (C3)
//! ```

mod input;

use std::sync::Arc;

use crate::{Codec, Device, InputEvent, MidiBackend, MidiError, Model, RawMessage, Transport};

/// Handle to a LaunchKey Mini.
pub type LaunchKeyMini = Device<LaunchKeyCodec>;

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LaunchKeyCodec;

impl Codec for LaunchKeyCodec {
    type Event = InputEvent;

    fn model(&self) -> Model {
        Model::LaunchKeyMini
    }

    /// There are no LEDs to turn off, so this sends nothing.
    fn reset(&self, _transport: &mut Transport) -> Result<(), MidiError> {
        Ok(())
    }

    fn decode(&self, message: &RawMessage) -> Option<InputEvent> {
        input::decode(message)
    }
}

impl LaunchKeyMini {
    pub fn new(backend: Arc<dyn MidiBackend>) -> Self {
        Device::with_codec(backend, LaunchKeyCodec)
    }

    /// Alias of [`Device::button_flush`].
    pub fn input_flush(&mut self) -> usize {
        self.button_flush()
    }

    /// Alias of [`Device::button_state_raw`].
    pub fn input_state_raw(&self) -> Option<InputEvent> {
        self.button_state_raw()
    }
}
