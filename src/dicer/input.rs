use crate::{Button, ButtonEvent, RawMessage};

use super::output::{FIRST_BUTTON_NOTE, MASTER_BASE, SLAVE_BASE};

/// Maps the big buttons into the LED numbering. Only velocity 127 counts as a press; the Dicer
/// sends releases with varying velocities.
pub(crate) fn decode(message: &RawMessage) -> Option<ButtonEvent> {
    let (status, note, velocity) = message.as_short()?;
    let (base, offset) = match status {
        MASTER_BASE..=156 => (MASTER_BASE, 0),
        SLAVE_BASE..=159 => (SLAVE_BASE, 100),
        _ => return None,
    };
    if !(FIRST_BUTTON_NOTE..=69).contains(&note) {
        return None;
    }

    let number = note - FIRST_BUTTON_NOTE + 1 + offset + 10 * (status - base);
    let button = Button::Raw(number);
    Some(if velocity == 127 {
        ButtonEvent::press(button, 127)
    } else {
        ButtonEvent::release(button)
    })
}
