use crate::message::{CONTROL_CHANGE, NOTE_ON};
use crate::{Button, ButtonEvent, RawMessage};

fn event(button: Button, velocity: u8) -> ButtonEvent {
    ButtonEvent {
        button,
        pressed: velocity > 0,
        velocity,
    }
}

/// Grid buttons keep their note number; automap buttons (controllers 104..=111) are shifted by 96
/// into 200..=207, matching the numbers [`super::Launchpad::led_ctrl_raw`] accepts.
pub(crate) fn decode_raw(message: &RawMessage) -> Option<ButtonEvent> {
    let (status, data1, data2) = message.as_short()?;
    let number = match status {
        NOTE_ON => data1,
        CONTROL_CHANGE => data1.saturating_add(96),
        _ => return None,
    };
    Some(event(Button::Raw(number), data2))
}

pub(crate) fn decode_xy(message: &RawMessage) -> Option<ButtonEvent> {
    let (status, data1, data2) = message.as_short()?;
    let button = match (status, data1) {
        (NOTE_ON, _) => Button::xy(data1 & 0x0F, (data1 >> 4) + 1),
        (CONTROL_CHANGE, 104..=111) => Button::xy(data1 - 104, 0),
        _ => return None,
    };
    Some(event(button, data2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_round_trip() {
        for x in 0..=7 {
            for y in 1..=8 {
                let number = ((y - 1) << 4) | x;
                let decoded = decode_xy(&RawMessage::short(144, number, 127)).unwrap();
                assert_eq!(decoded.button, Button::xy(x, y));
                assert!(decoded.pressed);
            }
        }
    }

    #[test]
    fn automap_buttons() {
        let press = decode_raw(&RawMessage::short(176, 104, 127)).unwrap();
        assert_eq!(press.button, Button::Raw(200));

        let release = decode_xy(&RawMessage::short(176, 111, 0)).unwrap();
        assert_eq!(release.button, Button::xy(7, 0));
        assert!(!release.pressed);

        assert_eq!(decode_xy(&RawMessage::short(176, 0, 0)), None);
    }

    #[test]
    fn other_messages_are_ignored() {
        assert_eq!(decode_raw(&RawMessage::short(128, 1, 0)), None);
        assert_eq!(decode_raw(&RawMessage::SysEx(vec![0, 32, 41])), None);
        assert_eq!(decode_xy(&RawMessage::Fragment(vec![144, 1])), None);
    }
}
