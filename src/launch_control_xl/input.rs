use crate::message::{CONTROL_CHANGE, NOTE_OFF, NOTE_ON};
use crate::{Button, ButtonEvent, InputEvent, RawMessage};

/// Pads report no velocity, presses always carry 127. The cursor buttons (controllers
/// 104..=107) are buttons; every other controller is a knob or a slider.
pub(crate) fn decode(message: &RawMessage) -> Option<InputEvent> {
    let (status, data1, data2) = message.as_short()?;
    let button = Button::Raw(data1);
    let event = match (status, data1) {
        (NOTE_ON, _) => InputEvent::Button(ButtonEvent::press(button, 127)),
        (NOTE_OFF, _) => InputEvent::Button(ButtonEvent::release(button)),
        (CONTROL_CHANGE, 104..=107) if data2 > 0 => {
            InputEvent::Button(ButtonEvent::press(button, data2))
        }
        (CONTROL_CHANGE, 104..=107) => InputEvent::Button(ButtonEvent::release(button)),
        (CONTROL_CHANGE, _) => InputEvent::Potentiometer {
            number: data1,
            value: data2,
        },
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_bytes(bytes: &[u8]) -> Option<InputEvent> {
        decode(&RawMessage::from_bytes(bytes))
    }

    #[test]
    fn pads() {
        assert_eq!(
            decode_bytes(&[144, 41, 12]),
            Some(InputEvent::Button(ButtonEvent::press(Button::Raw(41), 127)))
        );
        assert_eq!(
            decode_bytes(&[128, 41, 64]),
            Some(InputEvent::Button(ButtonEvent::release(Button::Raw(41))))
        );
    }

    #[test]
    fn cursor_buttons_and_pots() {
        assert_eq!(
            decode_bytes(&[176, 105, 127]),
            Some(InputEvent::Button(ButtonEvent::press(Button::Raw(105), 127)))
        );
        assert_eq!(
            decode_bytes(&[176, 107, 0]),
            Some(InputEvent::Button(ButtonEvent::release(Button::Raw(107))))
        );
        assert_eq!(
            decode_bytes(&[176, 77, 0]),
            Some(InputEvent::Potentiometer { number: 77, value: 0 })
        );
        assert_eq!(
            decode_bytes(&[176, 108, 99]),
            Some(InputEvent::Potentiometer { number: 108, value: 99 })
        );
    }

    #[test]
    fn every_other_controller_is_a_pot() {
        for number in (0..=127u8).filter(|n| !(104..=107).contains(n)) {
            assert_eq!(
                decode_bytes(&[176, number, 64]),
                Some(InputEvent::Potentiometer { number, value: 64 })
            );
        }
    }

    #[test]
    fn unknown_messages() {
        assert_eq!(decode_bytes(&[160, 1, 1]), None);
        assert_eq!(decode_bytes(&[240, 0, 32, 41, 2, 17, 119, 0, 247]), None);
    }
}
