//! The Novation Dicer, a pair of small cue controllers for DJ decks.
//!
//! A Dicer comes as two units, master and slave, each with five big buttons and three mode
//! buttons. The big buttons show one of three pages (hot cue, loop and auto loop) depending on
//! the selected mode, and each page has its own LEDs.
//!
//! Buttons and LEDs share one numbering: `10 * page + button` on the master, plus 100 on the
//! slave. So the master's buttons are 1..=5, 11..=15 and 21..=25, the slave's 101..=105,
//! 111..=115 and 121..=125. Holding a mode button shifts the buttons by 5.

mod input;

mod output;

use std::sync::Arc;

use crate::{ButtonEvent, Codec, Device, MidiBackend, MidiError, Model, RawMessage, Transport};

/// Handle to a Dicer pair.
pub type Dicer = Device<DicerCodec>;

/// One of the two units of a Dicer pair.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DicerUnit {
    Master,
    Slave,
}

/// Operating modes of a Dicer unit.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DicerMode {
    Cue = 0,
    CueShiftLock = 1,
    Loop = 2,
    LoopShiftLock = 3,
    AutoLoop = 4,
    AutoLoopShiftLock = 5,
    OnePage = 6,
}

impl DicerMode {
    pub fn from_index(index: u8) -> Option<Self> {
        Some(match index {
            0 => Self::Cue,
            1 => Self::CueShiftLock,
            2 => Self::Loop,
            3 => Self::LoopShiftLock,
            4 => Self::AutoLoop,
            5 => Self::AutoLoopShiftLock,
            6 => Self::OnePage,
            _ => return None,
        })
    }
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DicerCodec;

impl Codec for DicerCodec {
    type Event = ButtonEvent;

    fn model(&self) -> Model {
        Model::Dicer
    }

    fn reset(&self, transport: &mut Transport) -> Result<(), MidiError> {
        output::reset(transport)
    }

    fn decode(&self, message: &RawMessage) -> Option<ButtonEvent> {
        input::decode(message)
    }
}

impl Dicer {
    pub fn new(backend: Arc<dyn MidiBackend>) -> Self {
        Device::with_codec(backend, DicerCodec)
    }
}
