//! Logical input events, decoded from raw messages by the device codecs.

/// A position in a device's X/Y layout. What the ranges are, and which cells exist at all,
/// depends on the device.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub x: u8,
    pub y: u8,
}

impl Coordinate {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

impl From<(u8, u8)> for Coordinate {
    fn from((x, y): (u8, u8)) -> Self {
        Self { x, y }
    }
}

/// How a button is identified in an event.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Button {
    /// The device-specific button number
    Raw(u8),
    /// A position in the device's X/Y layout
    Xy(Coordinate),
}

impl Button {
    pub fn xy(x: u8, y: u8) -> Self {
        Self::Xy(Coordinate { x, y })
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        match *self {
            Self::Xy(coordinate) => Some(coordinate),
            Self::Raw(_) => None,
        }
    }

    pub fn raw(&self) -> Option<u8> {
        match *self {
            Self::Raw(number) => Some(number),
            Self::Xy(_) => None,
        }
    }
}

/// A button (or key) going down or up.
///
/// `velocity` is whatever the device reports: devices without pressure sensing only ever report
/// 0 and 127, others report the full range.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButtonEvent {
    pub button: Button,
    pub pressed: bool,
    pub velocity: u8,
}

impl ButtonEvent {
    pub fn press(button: Button, velocity: u8) -> Self {
        Self {
            button,
            pressed: true,
            velocity,
        }
    }

    pub fn release(button: Button) -> Self {
        Self {
            button,
            pressed: false,
            velocity: 0,
        }
    }
}

/// Every kind of input a supported device can report.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputEvent {
    /// A pad or a control button
    Button(ButtonEvent),
    /// A keyboard key. Key numbers overlap with button numbers on some devices, so they are kept
    /// apart here.
    Key(ButtonEvent),
    /// A knob or a slider moved to `value`
    Potentiometer { number: u8, value: u8 },
}

impl InputEvent {
    /// The button or key event, if this is one.
    pub fn button_event(&self) -> Option<&ButtonEvent> {
        match self {
            Self::Button(event) | Self::Key(event) => Some(event),
            Self::Potentiometer { .. } => None,
        }
    }
}

impl From<ButtonEvent> for InputEvent {
    fn from(event: ButtonEvent) -> Self {
        Self::Button(event)
    }
}
