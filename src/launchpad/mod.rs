//! The original two-color Launchpad, and the Launchpad S and Mini which speak the same protocol.
//!
//! The grid is addressed by raw numbers `16 * row + column` for the 8x8 pads plus column 8 for the
//! round scene buttons on the right. The automap row on top is driven by control change messages;
//! [`Launchpad::led_ctrl_raw`] accepts it under the numbers 200..=207.
//!
//! In the X/Y layout, the automap row is `y = 0` and the 8x8 grid starts at `y = 1`:
//! ```text
//! +---+---+---+---+---+---+---+---+
//! |0/0|1/0|   |   |   |   |   |7/0|
//! +---+---+---+---+---+---+---+---+  +---+
//! |0/1|   |   |   |   |   |   |   |  |8/1|
//! +---+---+---+---+---+---+---+---+  +---+
//!  ...
//! +---+---+---+---+---+---+---+---+  +---+
//! |0/8|   |   |   |   |   |   |7/8|  |8/8|
//! +---+---+---+---+---+---+---+---+  +---+
//! ```

mod input;

mod output;
pub use output::*;

use std::sync::Arc;

use crate::{ButtonEvent, Codec, Device, LedGrid, MidiBackend, MidiError, Model, RawMessage, Transport, XyCodec};

/// Handle to a classic Launchpad.
pub type Launchpad = Device<Classic>;

/// Protocol of the classic Launchpad.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Classic;

impl Codec for Classic {
    type Event = ButtonEvent;

    fn model(&self) -> Model {
        Model::Classic
    }

    fn reset(&self, transport: &mut Transport) -> Result<(), MidiError> {
        output::reset(transport)
    }

    fn decode(&self, message: &RawMessage) -> Option<ButtonEvent> {
        input::decode_raw(message)
    }
}

impl XyCodec for Classic {
    fn decode_xy(&self, message: &RawMessage) -> Option<ButtonEvent> {
        input::decode_xy(message)
    }
}

impl Launchpad {
    pub fn new(backend: Arc<dyn MidiBackend>) -> Self {
        Device::with_codec(backend, Classic)
    }
}

impl LedGrid for Launchpad {
    type Color = Color;

    fn light_xy(&mut self, x: u8, y: u8, color: Color) -> Result<(), MidiError> {
        self.led_ctrl_xy(x, y, color)
    }
}
