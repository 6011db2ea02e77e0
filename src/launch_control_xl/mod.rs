//! The Launch Control XL: 24 knobs, 8 sliders, 16 two-color pad buttons and a handful of
//! single-color control buttons.
//!
//! Knobs and sliders come in as [`InputEvent::Potentiometer`](crate::InputEvent) carrying their
//! controller number, which depends on the selected template.
//!
//! Raw numbers of the pads and control buttons, as reported in input events:
//! ```text
//! +---+---+---+---+---+---+---+---+  +---+---+
//! | 41| 42| 43| 44| 57| 58| 59| 60|  |104|105|  up, down
//! +---+---+---+---+---+---+---+---+  +---+---+
//! | 73| 74| 75| 76| 89| 90| 91| 92|  |106|107|  left, right
//! +---+---+---+---+---+---+---+---+  +---+---+
//! ```
//!
//! LEDs are addressed by their index in the X/Y layout below. Row 3 is the sliders and has no
//! LEDs. Column 8 and 9 hold the control buttons: the cursor buttons in rows 1 and 2, and
//! device, mute, solo and record arm in rows 3 to 6 (these span both columns).
//! ```text
//!       0   1   2   3   4   5   6   7      8    9
//!     +---+---+---+---+---+---+---+---+  +---++---+
//!  0  |   |   |   |   |   |   |   |   |  |   ||   |  knob LEDs
//!  1  |   |   |   |   |   |   |   |   |  |up ||dn |
//!  2  |   |   |   |   |   |   |   |   |  |lt ||rt |
//!  3  |  (sliders, no LEDs)           |  | device |
//!  4  |   |   |   |   |   |   |   |   |  |  mute  |  pad buttons
//!  5  |   |   |   |   |   |   |   |   |  |  solo  |  pad buttons
//!  6                                     | record |
//!     +---+---+---+---+---+---+---+---+  +---++---+
//! ```

mod input;

mod output;

use std::sync::Arc;

use crate::{Codec, Device, InputEvent, LedGrid, MidiBackend, MidiError, Model, RawMessage, Transport};

pub use crate::launchpad::Color;

/// Handle to a Launch Control XL.
pub type LaunchControlXl = Device<ControlXlCodec>;

/// Template selected on open unless told otherwise: the first user template
pub const DEFAULT_TEMPLATE: u8 = 1;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ControlXlCodec {
    template: u8,
}

impl Codec for ControlXlCodec {
    type Event = InputEvent;

    fn model(&self) -> Model {
        Model::ControlXl
    }

    fn setup(&mut self, transport: &mut Transport) -> Result<(), MidiError> {
        output::send_template(transport, self.template)
    }

    fn reset(&self, transport: &mut Transport) -> Result<(), MidiError> {
        output::reset(transport)
    }

    fn decode(&self, message: &RawMessage) -> Option<InputEvent> {
        input::decode(message)
    }
}

impl LaunchControlXl {
    /// A handle that selects [`DEFAULT_TEMPLATE`] on open.
    pub fn new(backend: Arc<dyn MidiBackend>) -> Self {
        Self::with_template(backend, DEFAULT_TEMPLATE)
    }

    /// A handle that selects `template` (1..=16) on open. Out-of-range templates fall back to
    /// [`DEFAULT_TEMPLATE`].
    pub fn with_template(backend: Arc<dyn MidiBackend>, template: u8) -> Self {
        let template = if output::is_valid_template(template) {
            template
        } else {
            DEFAULT_TEMPLATE
        };
        Device::with_codec(backend, ControlXlCodec { template })
    }

    /// The template selected on open or by the last [`LaunchControlXl::template_set`].
    pub fn template(&self) -> u8 {
        self.codec().template
    }

    /// Alias of [`Device::button_flush`]; knobs and sliders queue up just like buttons.
    pub fn input_flush(&mut self) -> usize {
        self.button_flush()
    }

    /// Alias of [`Device::button_state_raw`].
    pub fn input_state_raw(&self) -> Option<InputEvent> {
        self.button_state_raw()
    }
}

impl LedGrid for LaunchControlXl {
    type Color = Color;

    fn light_xy(&mut self, x: u8, y: u8, color: Color) -> Result<(), MidiError> {
        self.led_ctrl_xy(x, y, color)
    }
}
