use crate::message::{CONTROL_CHANGE, NOTE_OFF, NOTE_ON};
use crate::{Button, ButtonEvent, InputEvent, RawMessage};

/// Note on, channel 10: the pads
const PAD_ON: u8 = 153;
/// Note off, channel 10: the pads
const PAD_OFF: u8 = 137;

/// Keys and pads both send notes, only on different channels. After an octave shift their
/// numbers overlap, as do knob numbers, so keys come out as [`InputEvent::Key`] and everything
/// else as [`InputEvent::Button`] or [`InputEvent::Potentiometer`].
///
/// Controllers 104..=109 are the round buttons; they report 127 as velocity when pressed.
pub(crate) fn decode(message: &RawMessage) -> Option<InputEvent> {
    let (status, data1, data2) = message.as_short()?;
    let button = Button::Raw(data1);
    let event = match (status, data1) {
        (NOTE_ON, _) => InputEvent::Key(ButtonEvent::press(button, data2)),
        (NOTE_OFF, _) => InputEvent::Key(ButtonEvent::release(button)),
        (PAD_ON, _) => InputEvent::Button(ButtonEvent::press(button, data2)),
        (PAD_OFF, _) => InputEvent::Button(ButtonEvent::release(button)),
        (CONTROL_CHANGE, 104..=109) if data2 > 0 => {
            InputEvent::Button(ButtonEvent::press(button, 127))
        }
        (CONTROL_CHANGE, 104..=109) => InputEvent::Button(ButtonEvent::release(button)),
        (CONTROL_CHANGE, _) => InputEvent::Potentiometer {
            number: data1,
            value: data2,
        },
        _ => return None,
    };
    Some(event)
}
