use crate::message::{CONTROL_CHANGE, NOTE_ON};
use crate::{MidiError, Transport};

use super::{Color, LaunchControlXl};

const TEMPLATE_COMMAND: [u8; 6] = [0, 32, 41, 2, 17, 119];
const LED_COMMAND: [u8; 6] = [0, 32, 41, 2, 17, 120];

pub(crate) fn is_valid_template(template: u8) -> bool {
    (1..=16).contains(&template)
}

/// 1..=8 are the user templates, 9..=16 the factory templates.
pub(crate) fn send_template(transport: &mut Transport, template: u8) -> Result<(), MidiError> {
    let mut payload = TEMPLATE_COMMAND.to_vec();
    payload.push(template - 1);
    transport.send_sysex(&payload)?;
    log::debug!("selected template {}", template);
    Ok(())
}

pub(crate) fn reset(transport: &mut Transport) -> Result<(), MidiError> {
    transport.send_short(CONTROL_CHANGE, 0, 0)
}

/// LED index of an X/Y position, or `None` where there is no LED
fn led_index(x: u8, y: u8) -> Option<u8> {
    match (x, y) {
        (0..=7, 0..=2) => Some(y * 8 + x),
        // row 3 is the sliders
        (0..=7, 4..=5) => Some((y - 1) * 8 + x),
        (8 | 9, 3..=6) => Some(37 + y),
        (8, 1) => Some(44),
        (9, 1) => Some(45),
        (8, 2) => Some(46),
        (9, 2) => Some(47),
        _ => None,
    }
}

impl LaunchControlXl {
    /// Switches to `template` (1..=16). Other numbers are ignored.
    ///
    /// LED writes only show up when the device is on the same template as this handle, so this
    /// runs on every open.
    pub fn template_set(&mut self, template: u8) -> Result<(), MidiError> {
        if !is_valid_template(template) {
            return Ok(());
        }
        send_template(self.transport_mut(), template)?;
        self.codec_mut().template = template;
        Ok(())
    }

    /// Lights an LED by its raw note number. Numbers above 127 are ignored.
    pub fn led_ctrl_raw(&mut self, number: u8, color: Color) -> Result<(), MidiError> {
        if number > 127 {
            return Ok(());
        }
        self.transport_mut().send_short(NOTE_ON, number, color.code())
    }

    /// Lights an LED by its X/Y position (see the module documentation). Positions without an
    /// LED are ignored. The control buttons in columns 8 and 9 only have one color and are always
    /// lit at full brightness.
    pub fn led_ctrl_xy(&mut self, x: u8, y: u8, color: Color) -> Result<(), MidiError> {
        let Some(index) = led_index(x, y) else {
            return Ok(());
        };
        let color = if x < 8 { color } else { Color::YELLOW };

        let mut payload = LED_COMMAND.to_vec();
        payload.extend_from_slice(&[0, index, color.code()]);
        self.transport_mut().send_sysex(&payload)
    }

    /// Turns all LEDs on. `None` and `Some(0)` turn them off instead.
    pub fn led_all_on(&mut self, code: Option<u8>) -> Result<(), MidiError> {
        match code {
            None | Some(0) => self.reset(),
            Some(_) => self.transport_mut().send_short(CONTROL_CHANGE, 0, 127),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::control_xl::DEFAULT_TEMPLATE;
    use crate::mock::MockBackend;

    fn open(template: u8) -> (MockBackend, LaunchControlXl) {
        let backend = MockBackend::new().with_port("Launch Control XL");
        let mut xl = LaunchControlXl::with_template(Arc::new(backend.clone()), template);
        xl.open(0, "control xl").unwrap();
        (backend, xl)
    }

    #[test]
    fn template_is_selected_on_open() {
        let (backend, xl) = open(9);
        assert_eq!(xl.template(), 9);
        assert_eq!(backend.sent(), vec![vec![240, 0, 32, 41, 2, 17, 119, 8, 247]]);

        let (backend, xl) = open(0);
        assert_eq!(xl.template(), DEFAULT_TEMPLATE);
        assert_eq!(backend.sent(), vec![vec![240, 0, 32, 41, 2, 17, 119, 0, 247]]);
    }

    #[test]
    fn template_range() {
        let (backend, mut xl) = open(1);
        backend.take_sent();
        xl.template_set(16).unwrap();
        xl.template_set(17).unwrap();
        xl.template_set(0).unwrap();
        assert_eq!(xl.template(), 16);
        assert_eq!(backend.sent(), vec![vec![240, 0, 32, 41, 2, 17, 119, 15, 247]]);
    }

    #[test]
    fn slider_row_has_no_leds() {
        let (backend, mut xl) = open(1);
        backend.take_sent();
        for x in 0..=7 {
            xl.led_ctrl_xy(x, 3, Color::GREEN).unwrap();
        }
        xl.led_ctrl_xy(10, 0, Color::GREEN).unwrap();
        xl.led_ctrl_xy(0, 7, Color::GREEN).unwrap();
        xl.led_ctrl_xy(8, 0, Color::GREEN).unwrap();
        xl.led_ctrl_xy(9, 0, Color::GREEN).unwrap();
        xl.led_ctrl_xy(7, 6, Color::GREEN).unwrap();
        assert!(backend.sent().is_empty());
    }

    #[test]
    fn xy_indices() {
        let cases = [
            ((0, 0), 0),
            ((7, 2), 23),
            ((0, 4), 24),
            ((7, 5), 39),
            ((8, 1), 44),
            ((9, 1), 45),
            ((8, 2), 46),
            ((9, 2), 47),
            ((8, 3), 40),
            ((9, 6), 43),
        ];
        for ((x, y), index) in cases {
            assert_eq!(led_index(x, y), Some(index), "({}, {})", x, y);
        }
    }

    #[test]
    fn control_buttons_are_always_full() {
        let (backend, mut xl) = open(1);
        backend.take_sent();
        xl.led_ctrl_xy(2, 1, Color::RED).unwrap();
        xl.led_ctrl_xy(8, 1, Color::RED).unwrap();
        assert_eq!(
            backend.sent(),
            vec![
                vec![240, 0, 32, 41, 2, 17, 120, 0, 10, 3, 247],
                vec![240, 0, 32, 41, 2, 17, 120, 0, 44, 51, 247],
            ]
        );
    }

    #[test]
    fn raw_and_all_on() {
        let (backend, mut xl) = open(1);
        backend.take_sent();
        xl.led_ctrl_raw(41, Color::AMBER).unwrap();
        xl.led_ctrl_raw(128, Color::AMBER).unwrap();
        xl.led_all_on(Some(1)).unwrap();
        xl.led_all_on(None).unwrap();
        assert_eq!(
            backend.sent(),
            vec![vec![144, 41, 35], vec![176, 0, 127], vec![176, 0, 0]]
        );
    }
}
