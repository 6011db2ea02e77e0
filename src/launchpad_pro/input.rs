use crate::message::{CONTROL_CHANGE, NOTE_ON};
use crate::{Button, ButtonEvent, RawMessage};

use super::Orientation;

/// The pads report how hard they were hit, so `velocity` spans 0..=127 on the Pro. The Mk2 only
/// reports 0 and 127.
fn event(button: Button, velocity: u8) -> ButtonEvent {
    ButtonEvent {
        button,
        pressed: velocity > 0,
        velocity,
    }
}

/// Only note on and control change messages carry button changes. Pressure updates (status 208)
/// and the broken SysEx pieces the devices sometimes emit are dropped.
fn button_message(message: &RawMessage) -> Option<(u8, u8)> {
    match message.as_short()? {
        (NOTE_ON | CONTROL_CHANGE, data1, data2) => Some((data1, data2)),
        _ => None,
    }
}

pub(crate) fn decode_raw(message: &RawMessage) -> Option<ButtonEvent> {
    let (number, velocity) = button_message(message)?;
    Some(event(Button::Raw(number), velocity))
}

/// Grid numbers count down from 99 in the top right corner, ten per row.
fn grid_xy(number: u8, orientation: Orientation) -> Option<Button> {
    if number > 99 {
        return None;
    }
    let x = match orientation {
        Orientation::Classic => (number + 9) % 10,
        Orientation::Pro => number % 10,
    };
    Some(Button::xy(x, (99 - number) / 10))
}

pub(crate) fn decode_xy_pro(message: &RawMessage, orientation: Orientation) -> Option<ButtonEvent> {
    let (number, velocity) = button_message(message)?;
    Some(event(grid_xy(number, orientation)?, velocity))
}

pub(crate) fn decode_xy_mk2(message: &RawMessage) -> Option<ButtonEvent> {
    let (number, velocity) = button_message(message)?;
    let button = match number {
        104..=u8::MAX => Button::xy(number - 104, 0),
        _ => grid_xy(number, Orientation::Classic)?,
    };
    Some(event(button, velocity))
}
