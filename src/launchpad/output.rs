use crate::message::{CONTROL_CHANGE, NOTE_ON};
use crate::util::limit;
use crate::{MidiError, Transport};

use super::Launchpad;

/// Status byte of the rapid LED update message
const RAPID_UPDATE: u8 = 146;
/// Controller number of the leftmost automap button
const AUTOMAP_BASE: u8 = 104;

/// A color of the two-color LEDs: a red and a green component, each with brightness 0..=3.
///
/// Components above 3 are clamped on construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    red: u8,
    green: u8,
}

impl Color {
    pub const BLACK: Color = Color { red: 0, green: 0 };
    pub const RED: Color = Color { red: 3, green: 0 };
    pub const GREEN: Color = Color { red: 0, green: 3 };
    pub const YELLOW: Color = Color { red: 3, green: 3 };
    pub const AMBER: Color = Color { red: 3, green: 2 };

    pub fn new(red: u8, green: u8) -> Self {
        Self {
            red: limit(red, 3),
            green: limit(green, 3),
        }
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    /// The color byte the device expects: red in bits 0-1, green in bits 4-5.
    pub fn code(&self) -> u8 {
        self.red | (self.green << 4)
    }
}

pub(crate) fn reset(transport: &mut Transport) -> Result<(), MidiError> {
    transport.send_short(CONTROL_CHANGE, 0, 0)
}

impl Launchpad {
    /// Lights a grid LED by its raw number (see the module documentation). The automap row can
    /// be addressed as 200..=207. Other numbers above 120 are ignored.
    pub fn led_ctrl_raw(&mut self, number: u8, color: Color) -> Result<(), MidiError> {
        match number {
            200..=207 => self.led_ctrl_automap(number - 200, color),
            0..=120 => self
                .transport_mut()
                .send_short(NOTE_ON, number, color.code()),
            _ => Ok(()),
        }
    }

    /// Lights an LED by its X/Y coordinates. Coordinates outside 0..=8 are ignored.
    pub fn led_ctrl_xy(&mut self, x: u8, y: u8, color: Color) -> Result<(), MidiError> {
        if x > 8 || y > 8 {
            return Ok(());
        }

        if y == 0 {
            self.led_ctrl_automap(x, color)
        } else {
            self.led_ctrl_raw(((y - 1) << 4) | x, color)
        }
    }

    /// Lights one of the automap buttons on top, numbered 0..=7 from left to right.
    pub fn led_ctrl_automap(&mut self, number: u8, color: Color) -> Result<(), MidiError> {
        if number > 7 {
            return Ok(());
        }

        self.transport_mut()
            .send_short(CONTROL_CHANGE, AUTOMAP_BASE + number, color.code())
    }

    /// Sends consecutive color codes (see [`Color::code`]) to the device, two per message.
    ///
    /// The device fills its LEDs in a fixed order: the 8x8 grid left to right and top to bottom,
    /// then the scene buttons on the right, then the automap row. This is a batching quirk of
    /// the hardware and there is no way to start anywhere else than at the first LED.
    ///
    /// The hardware always consumes colors in pairs, so when an odd number of codes is passed,
    /// the LED following the last one is turned off.
    pub fn led_ctrl_raw_rapid(&mut self, codes: &[u8]) -> Result<(), MidiError> {
        let messages = codes.chunks(2).map(|pair| {
            let second = pair.get(1).copied().unwrap_or(0);
            [RAPID_UPDATE, pair[0], second]
        });
        self.transport_mut().send_multi(messages)
    }

    /// Turns all LEDs on at full brightness. `Some(0)` turns them off instead; any other value is
    /// accepted for compatibility with the RGB models and otherwise ignored.
    pub fn led_all_on(&mut self, code: Option<u8>) -> Result<(), MidiError> {
        match code {
            Some(0) => self.reset(),
            _ => self.transport_mut().send_short(CONTROL_CHANGE, 0, 127),
        }
    }
}
