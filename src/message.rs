//! Raw MIDI messages as they come off the wire, before any device-specific decoding.

/// Start byte of a System Exclusive frame
pub const SYSEX_START: u8 = 0xF0;
/// End byte of a System Exclusive frame
pub const SYSEX_END: u8 = 0xF7;

/// Note on status byte, channel 1
pub const NOTE_ON: u8 = 144;
/// Note off status byte, channel 1
pub const NOTE_OFF: u8 = 128;
/// Control change status byte, channel 1
pub const CONTROL_CHANGE: u8 = 176;
/// Channel pressure status byte, channel 1
pub const CHANNEL_PRESSURE: u8 = 208;

/// One received MIDI message.
///
/// The Launchpads occasionally deliver broken SysEx pieces interleaved with regular note data, so
/// anything that is neither a channel message nor a complete SysEx frame ends up as a
/// [`RawMessage::Fragment`]. Device decoders treat fragments as noise.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RawMessage {
    /// A channel message. Two-byte messages (program change, channel pressure) carry `data2 = 0`.
    Short { status: u8, data1: u8, data2: u8 },
    /// A complete SysEx frame; the payload excludes the `0xF0`/`0xF7` framing bytes.
    SysEx(Vec<u8>),
    /// Truncated or otherwise unparseable bytes.
    Fragment(Vec<u8>),
}

impl RawMessage {
    pub fn short(status: u8, data1: u8, data2: u8) -> Self {
        Self::Short {
            status,
            data1,
            data2,
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        match *bytes {
            [status @ 0x80..=0xEF, data1 @ 0..=0x7F, data2 @ 0..=0x7F] => {
                Self::short(status, data1, data2)
            }
            [status @ 0xC0..=0xDF, data1 @ 0..=0x7F] => Self::short(status, data1, 0),
            [SYSEX_START, ref payload @ .., SYSEX_END]
                if payload.iter().all(|&byte| byte < 0x80) =>
            {
                Self::SysEx(payload.to_vec())
            }
            _ => Self::Fragment(bytes.to_vec()),
        }
    }

    /// The status byte for channel messages, `None` for SysEx frames and fragments.
    pub fn status(&self) -> Option<u8> {
        match *self {
            Self::Short { status, .. } => Some(status),
            _ => None,
        }
    }

    /// The `(status, data1, data2)` triple of a channel message.
    pub fn as_short(&self) -> Option<(u8, u8, u8)> {
        match *self {
            Self::Short {
                status,
                data1,
                data2,
            } => Some((status, data1, data2)),
            _ => None,
        }
    }

    /// Serializes the message back into wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Short {
                status,
                data1,
                data2,
            } => vec![*status, *data1, *data2],
            Self::SysEx(payload) => frame_sysex(payload),
            Self::Fragment(bytes) => bytes.clone(),
        }
    }
}

/// Wraps `payload` in the SysEx start and end bytes.
pub fn frame_sysex(payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + 2);
    bytes.push(SYSEX_START);
    bytes.extend_from_slice(payload);
    bytes.push(SYSEX_END);
    bytes
}
