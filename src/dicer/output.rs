use crate::util::limit;
use crate::{MidiError, Transport};

use super::{Dicer, DicerMode, DicerUnit};

/// Status byte of the master's first page; pages 1 and 2 follow
pub(crate) const MASTER_BASE: u8 = 154;
/// Status byte of the slave's first page; pages 1 and 2 follow
pub(crate) const SLAVE_BASE: u8 = 157;
/// Note number of the first big button
pub(crate) const FIRST_BUTTON_NOTE: u8 = 60;

const MASTER_CONTROL: u8 = 186;
const SLAVE_CONTROL: u8 = 189;
const MODE_CONTROLLER: u8 = 17;

impl DicerUnit {
    fn control_status(self) -> u8 {
        match self {
            Self::Master => MASTER_CONTROL,
            Self::Slave => SLAVE_CONTROL,
        }
    }
}

/// Turns off all LEDs and restores the power-on state. A running light show keeps running.
pub(crate) fn reset(transport: &mut Transport) -> Result<(), MidiError> {
    transport.send_short(MASTER_CONTROL, 0, 0)
}

/// `(status, note)` of an LED number, or `None` if there is no such LED
fn address(number: u8) -> Option<(u8, u8)> {
    let (base, number) = match number {
        0..=100 => (MASTER_BASE, number),
        101..=130 => (SLAVE_BASE, number - 100),
        _ => return None,
    };
    let page = number / 10;
    if page > 2 {
        return None;
    }
    // pages are ten apart, so the slot never exceeds 9
    let slot = number - page * 10;
    Some((base + page, slot + FIRST_BUTTON_NOTE - 1))
}

impl Dicer {
    /// Turns off all LEDs without touching any other setting.
    pub fn led_all_off(&mut self) -> Result<(), MidiError> {
        self.transport_mut().send_short(MASTER_CONTROL, 0, 112)
    }

    /// Lights an LED by its number (see the module documentation). `hue` goes from red (0) to
    /// green (7), `intensity` from off (0) to full (15); larger values are clamped. Numbers
    /// without an LED are ignored.
    pub fn led_ctrl_raw(&mut self, number: u8, hue: u8, intensity: u8) -> Result<(), MidiError> {
        let Some((status, note)) = address(number) else {
            return Ok(());
        };
        let color = (limit(hue, 7) << 4) | limit(intensity, 15);
        self.transport_mut().send_short(status, note, color)
    }

    /// Starts or stops the built-in light show of one unit.
    pub fn led_set_lightshow(&mut self, unit: DicerUnit, enable: bool) -> Result<(), MidiError> {
        let value = if enable { 40 } else { 41 };
        self.transport_mut()
            .send_short(unit.control_status(), 0, value)
    }

    /// Puts one unit into `mode`.
    pub fn mode_set(&mut self, unit: DicerUnit, mode: DicerMode) -> Result<(), MidiError> {
        log::debug!("switching Dicer {:?} to {:?}", unit, mode);
        self.transport_mut()
            .send_short(unit.control_status(), MODE_CONTROLLER, mode as u8)
    }
}
