use crate::Direction;

#[derive(Debug, thiserror::Error)]
pub enum MidiError {
    #[error("connecting to MIDI input port failed")]
    InputConnectError(#[from] midir::ConnectError<midir::MidiInput>),
    #[error("connecting to MIDI output port failed")]
    OutputConnectError(#[from] midir::ConnectError<midir::MidiOutput>),
    #[error("MIDI context initialization failed")]
    InitError(#[from] midir::InitError),
    #[error("MIDI port retrieval failed")]
    PortInfoError(#[from] midir::PortInfoError),
    #[error("sending MIDI message failed")]
    SendError(#[from] midir::SendError),
    #[error("couldn't find {direction} port #{number} matching {keyword:?}")]
    DeviceNotFound {
        // The keyword that was searched for
        keyword: String,
        number: usize,
        direction: Direction,
    },
    #[error("there is no {direction} port with index {index}")]
    NoSuchPort { direction: Direction, index: usize },
    #[error("{0} port is not open")]
    NotOpen(Direction),
    #[error("MIDI backend failure: {0}")]
    Backend(String),
}

/// Why a blocking receive returned without a message.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, thiserror::Error)]
pub enum RecvError {
    #[error("no MIDI message arrived before the deadline")]
    Timeout,
    #[error("receive was cancelled")]
    Cancelled,
    #[error("the MIDI input connection hung up")]
    Disconnected,
    #[error("input port is not open")]
    NotOpen,
}
