use std::time::Duration;

use crate::message::{CONTROL_CHANGE, NOTE_ON};
use crate::util::limit;
use crate::{MidiError, Transport};

use super::{LaunchpadPro, Orientation, ProMode};

/// Model byte of the Launchpad Pro
pub(crate) const PRO_MODEL_BYTE: u8 = 16;
/// Model byte of the Launchpad Mk2
pub(crate) const MK2_MODEL_BYTE: u8 = 24;
/// The Session layout, in which the buttons send the codes this library expects
pub const SESSION_LAYOUT: u8 = 0x00;
/// The highest layout number [`LaunchpadPro::set_layout`] accepts
pub const MAX_LAYOUT: u8 = 0x0D;

const SYSEX_HEADER: [u8; 4] = [0, 32, 41, 2];
const RGB_COMMAND: u8 = 11;
const ALL_ON_COMMAND: u8 = 14;
const MODE_COMMAND: u8 = 33;
const LAYOUT_COMMAND: u8 = 34;

/// How long the device needs after a mode or layout change before it accepts further commands
pub const SETTLE_DELAY: Duration = Duration::from_millis(10);

/// A color from the built-in palette. See the "Launchpad MK2 Programmers Reference Manual" for
/// the palette, or [see here](http://launchpaddr.com/mk2palette/).
///
/// Ids above 127 are clamped. Everywhere a `PaletteColor` is expected, you can also pass the
/// palette index with `.into()`.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaletteColor {
    id: u8,
}

impl PaletteColor {
    pub const BLACK: PaletteColor = Self { id: 0 };
    pub const WHITE: PaletteColor = Self { id: 3 };
    pub const RED: PaletteColor = Self { id: 5 };
    pub const GREEN: PaletteColor = Self { id: 17 };

    pub fn new(id: u8) -> Self {
        Self { id: limit(id, 127) }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    /// Looks up a palette color by name: `black` (or `off`), `white`, `red` or `green`. Unknown
    /// names give black.
    pub fn from_name(name: &str) -> Self {
        match name {
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            _ => Self::BLACK,
        }
    }
}

impl From<u8> for PaletteColor {
    fn from(id: u8) -> Self {
        Self::new(id)
    }
}

impl Default for PaletteColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// An RGB color. Components above 63 are clamped.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RgbColor {
    r: u8,
    g: u8,
    b: u8,
}

impl RgbColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: limit(r, 63),
            g: limit(g, 63),
            b: limit(b, 63),
        }
    }

    pub fn red(&self) -> u8 {
        self.r
    }
    pub fn green(&self) -> u8 {
        self.g
    }
    pub fn blue(&self) -> u8 {
        self.b
    }
}

/// The color argument of the RGB LED writes.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProColor {
    /// Red and green brightness in the classic Launchpad's 0..=3 range. Both are scaled by 21
    /// into the RGB range; blue stays off.
    Legacy { red: u8, green: u8 },
    Rgb(RgbColor),
}

impl ProColor {
    pub fn rgb(self) -> RgbColor {
        match self {
            Self::Legacy { red, green } => {
                RgbColor::new(red.saturating_mul(21), green.saturating_mul(21), 0)
            }
            Self::Rgb(color) => color,
        }
    }
}

impl From<RgbColor> for ProColor {
    fn from(color: RgbColor) -> Self {
        Self::Rgb(color)
    }
}

impl From<crate::classic::Color> for ProColor {
    fn from(color: crate::classic::Color) -> Self {
        Self::Legacy {
            red: color.red(),
            green: color.green(),
        }
    }
}

fn sysex(model_byte: u8, command: u8, arguments: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(SYSEX_HEADER.len() + 2 + arguments.len());
    payload.extend_from_slice(&SYSEX_HEADER);
    payload.push(model_byte);
    payload.push(command);
    payload.extend_from_slice(arguments);
    payload
}

pub(crate) fn send_all_on(
    transport: &mut Transport,
    model_byte: u8,
    color: PaletteColor,
) -> Result<(), MidiError> {
    transport.send_sysex(&sysex(model_byte, ALL_ON_COMMAND, &[color.id()]))
}

/// Both models take the layout command under the Pro's model byte.
pub(crate) fn send_layout(transport: &mut Transport, layout: u8) -> Result<(), MidiError> {
    transport.send_sysex(&sysex(PRO_MODEL_BYTE, LAYOUT_COMMAND, &[layout]))?;
    log::debug!("selected layout {}", layout);
    std::thread::sleep(SETTLE_DELAY);
    Ok(())
}

pub(crate) fn send_mode(transport: &mut Transport, mode: ProMode) -> Result<(), MidiError> {
    transport.send_sysex(&sysex(PRO_MODEL_BYTE, MODE_COMMAND, &[mode as u8]))?;
    log::debug!("selected mode {:?}", mode);
    std::thread::sleep(SETTLE_DELAY);
    Ok(())
}

impl LaunchpadPro {
    /// The raw number of an X/Y position, or `None` if the position is not on the device.
    fn xy_to_raw(&self, x: u8, y: u8) -> Option<u8> {
        if self.codec().is_mk2() {
            if x > 8 || y > 8 {
                return None;
            }
            Some(if y == 0 { 104 + x } else { 91 - 10 * y + x })
        } else {
            if x > 9 || y > 9 {
                return None;
            }
            let x = match self.orientation() {
                // rotate right, column 9 wraps around to the left
                Orientation::Classic => (x + 1) % 10,
                Orientation::Pro => x,
            };
            Some(90 - 10 * y + x)
        }
    }

    /// Applies the model's raw number range. The Mk2 clamps to 111 and has nothing at 90..=103.
    fn raw_in_range(&self, number: u8) -> Option<u8> {
        if self.codec().is_mk2() {
            match number.min(111) {
                90..=103 => None,
                number => Some(number),
            }
        } else if number > 99 {
            None
        } else {
            Some(number)
        }
    }

    /// Lights an LED by its raw number with an RGB color. Each write is a 10 byte SysEx message;
    /// see [`LaunchpadPro::led_ctrl_raw_by_code`] for a faster way.
    pub fn led_ctrl_raw(&mut self, number: u8, color: impl Into<ProColor>) -> Result<(), MidiError> {
        let Some(number) = self.raw_in_range(number) else {
            return Ok(());
        };

        let color = color.into().rgb();
        let arguments = [number, color.red(), color.green(), color.blue()];
        self.transport_mut()
            .send_sysex(&sysex(PRO_MODEL_BYTE, RGB_COMMAND, &arguments))
    }

    /// Lights an LED by its raw number with a palette color, white if `None`.
    pub fn led_ctrl_raw_by_code(
        &mut self,
        number: u8,
        color: Option<PaletteColor>,
    ) -> Result<(), MidiError> {
        let Some(number) = self.raw_in_range(number) else {
            return Ok(());
        };

        let color = color.unwrap_or_default();
        // the Mk2's round buttons on top listen to control changes
        let status = if number >= 104 { CONTROL_CHANGE } else { NOTE_ON };
        self.transport_mut().send_short(status, number, color.id())
    }

    /// Lights an LED by its X/Y coordinates with an RGB color. Positions outside the layout are
    /// ignored.
    pub fn led_ctrl_xy(&mut self, x: u8, y: u8, color: impl Into<ProColor>) -> Result<(), MidiError> {
        match self.xy_to_raw(x, y) {
            Some(number) => self.led_ctrl_raw(number, color),
            None => Ok(()),
        }
    }

    /// Lights an LED by its X/Y coordinates with a palette color, white if `None`.
    pub fn led_ctrl_xy_by_code(
        &mut self,
        x: u8,
        y: u8,
        color: Option<PaletteColor>,
    ) -> Result<(), MidiError> {
        match self.xy_to_raw(x, y) {
            Some(number) => self.led_ctrl_raw_by_code(number, color),
            None => Ok(()),
        }
    }

    /// Sets every LED to the same palette color, white if `None`.
    pub fn led_all_on(&mut self, color: Option<PaletteColor>) -> Result<(), MidiError> {
        let model_byte = self.codec().model_byte();
        send_all_on(self.transport_mut(), model_byte, color.unwrap_or_default())
    }

    /// Switches the button layout. Only [`SESSION_LAYOUT`] sends the codes this library decodes;
    /// the others are 0x01 Drum Rack, 0x02 Chromatic Note, 0x03 User (Drum), 0x04 Audio,
    /// 0x05 Fader, 0x06 Record Arm, 0x07 Track Select, 0x08 Mute, 0x09 Solo and 0x0A Volume.
    /// Numbers above [`MAX_LAYOUT`] are ignored.
    ///
    /// Blocks for [`SETTLE_DELAY`] after sending.
    pub fn set_layout(&mut self, layout: u8) -> Result<(), MidiError> {
        if layout > MAX_LAYOUT {
            return Ok(());
        }
        send_layout(self.transport_mut(), layout)
    }

    /// Switches the Launchpad Pro's operating mode. Blocks for [`SETTLE_DELAY`] after sending.
    pub fn set_mode(&mut self, mode: ProMode) -> Result<(), MidiError> {
        send_mode(self.transport_mut(), mode)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::mock::MockBackend;

    fn open_pro() -> (MockBackend, LaunchpadPro) {
        let backend = MockBackend::new().with_port("Launchpad Pro");
        let mut launchpad = LaunchpadPro::pro(Arc::new(backend.clone()));
        launchpad.open(0, "pro").unwrap();
        backend.take_sent();
        (backend, launchpad)
    }

    fn open_mk2() -> (MockBackend, LaunchpadPro) {
        let backend = MockBackend::new().with_port("Launchpad MK2");
        let mut launchpad = LaunchpadPro::mk2(Arc::new(backend.clone()));
        launchpad.open(0, "mk2").unwrap();
        backend.take_sent();
        (backend, launchpad)
    }

    #[test]
    fn handshakes() {
        let backend = MockBackend::new()
            .with_port("Launchpad Pro")
            .with_port("Launchpad MK2");

        let mut pro = LaunchpadPro::pro(Arc::new(backend.clone()));
        assert!(!pro.is_configured());
        pro.open(0, "pro").unwrap();
        assert!(pro.is_configured());
        assert_eq!(
            backend.take_sent(),
            vec![vec![240, 0, 32, 41, 2, 16, 33, 0, 247]]
        );

        let mut mk2 = LaunchpadPro::mk2(Arc::new(backend.clone()));
        mk2.open(0, "mk2").unwrap();
        assert_eq!(
            backend.take_sent(),
            vec![vec![240, 0, 32, 41, 2, 16, 34, 0, 247]]
        );
        mk2.set_layout(5).unwrap();
        mk2.led_all_on(Some(PaletteColor::BLACK)).unwrap();
        assert_eq!(
            backend.take_sent(),
            vec![
                vec![240, 0, 32, 41, 2, 16, 34, 5, 247],
                vec![240, 0, 32, 41, 2, 24, 14, 0, 247],
            ]
        );

        pro.close();
        assert!(!pro.is_configured());
    }

    #[test]
    fn pro_xy_in_classic_orientation() {
        let (backend, mut launchpad) = open_pro();
        launchpad.led_ctrl_xy_by_code(0, 1, None).unwrap();
        launchpad.led_ctrl_xy_by_code(9, 1, None).unwrap();
        launchpad.led_ctrl_xy_by_code(10, 1, None).unwrap();
        assert_eq!(backend.sent(), vec![vec![144, 81, 3], vec![144, 80, 3]]);
    }

    #[test]
    fn pro_xy_in_pro_orientation() {
        let (backend, mut launchpad) = open_pro();
        launchpad.set_orientation(Orientation::Pro);
        launchpad
            .led_ctrl_xy_by_code(0, 1, Some(PaletteColor::RED))
            .unwrap();
        launchpad.led_ctrl_xy_by_code(9, 9, Some(5.into())).unwrap();
        assert_eq!(backend.sent(), vec![vec![144, 80, 5], vec![144, 9, 5]]);
    }

    #[test]
    fn rgb_writes() {
        let (backend, mut launchpad) = open_pro();
        launchpad.led_ctrl_raw(11, RgbColor::new(63, 100, 1)).unwrap();
        launchpad
            .led_ctrl_raw(12, ProColor::Legacy { red: 3, green: 2 })
            .unwrap();
        launchpad.led_ctrl_raw(13, crate::classic::Color::new(9, 0)).unwrap();
        launchpad.led_ctrl_raw(100, RgbColor::new(1, 1, 1)).unwrap();
        assert_eq!(
            backend.sent(),
            vec![
                vec![240, 0, 32, 41, 2, 16, 11, 11, 63, 63, 1, 247],
                vec![240, 0, 32, 41, 2, 16, 11, 12, 63, 42, 0, 247],
                vec![240, 0, 32, 41, 2, 16, 11, 13, 63, 0, 0, 247],
            ]
        );
    }

    #[test]
    fn mk2_addressing() {
        let (backend, mut launchpad) = open_mk2();
        launchpad.led_ctrl_xy_by_code(3, 0, Some(PaletteColor::GREEN)).unwrap();
        launchpad.led_ctrl_xy_by_code(3, 1, Some(PaletteColor::GREEN)).unwrap();
        launchpad.led_ctrl_xy_by_code(9, 1, None).unwrap();
        launchpad.led_ctrl_raw_by_code(95, None).unwrap();
        launchpad.led_ctrl_raw_by_code(127, None).unwrap();
        assert_eq!(
            backend.sent(),
            vec![vec![176, 107, 17], vec![144, 84, 17], vec![176, 111, 3]]
        );

        // the scene column's top corner does not exist and ends up on the last round button
        launchpad.led_ctrl_xy(8, 0, RgbColor::new(0, 0, 63)).unwrap();
        assert_eq!(
            backend.sent()[3],
            vec![240, 0, 32, 41, 2, 16, 11, 111, 0, 0, 63, 247]
        );
    }

    #[test]
    fn all_on_and_reset() {
        let (backend, mut launchpad) = open_pro();
        launchpad.led_all_on(None).unwrap();
        launchpad.led_all_on(Some(200.into())).unwrap();
        launchpad.reset().unwrap();
        assert_eq!(
            backend.sent(),
            vec![
                vec![240, 0, 32, 41, 2, 16, 14, 3, 247],
                vec![240, 0, 32, 41, 2, 16, 14, 127, 247],
                vec![240, 0, 32, 41, 2, 16, 14, 0, 247],
            ]
        );

        let (backend, mut launchpad) = open_mk2();
        launchpad.reset().unwrap();
        assert_eq!(backend.sent(), vec![vec![240, 0, 32, 41, 2, 24, 14, 0, 247]]);
    }

    #[test]
    fn layout_and_mode() {
        let (backend, mut launchpad) = open_pro();
        launchpad.set_layout(0x05).unwrap();
        launchpad.set_layout(0x0E).unwrap();
        launchpad.set_mode(ProMode::Standalone).unwrap();
        assert_eq!(
            backend.sent(),
            vec![
                vec![240, 0, 32, 41, 2, 16, 34, 5, 247],
                vec![240, 0, 32, 41, 2, 16, 33, 1, 247],
            ]
        );
    }

    #[test]
    fn palette_names() {
        assert_eq!(PaletteColor::from_name("red").id(), 5);
        assert_eq!(PaletteColor::from_name("off"), PaletteColor::BLACK);
        assert_eq!(PaletteColor::from_name("mauve"), PaletteColor::BLACK);
        assert_eq!(PaletteColor::default(), PaletteColor::WHITE);
    }
}
