//! Finding devices among the enumerated MIDI ports.

use crate::util::contains_ignore_case;
use crate::{MidiBackend, MidiError};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Input,
    Output,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// An enumerated MIDI port. `index` is the position in the operating system's enumeration and is
/// what the transport binds to.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Port {
    pub index: usize,
    pub name: String,
}

/// Indices of the ports whose name contains a keyword, in enumeration order.
///
/// The port list is snapshotted when the iterator is created; matching happens lazily. Clone the
/// iterator before consuming it to walk the matches again.
#[derive(Debug, Clone)]
pub struct PortMatches {
    ports: std::vec::IntoIter<Port>,
    keyword: String,
}

impl Iterator for PortMatches {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let keyword = &self.keyword;
        self.ports
            .by_ref()
            .find(|port| contains_ignore_case(&port.name, keyword))
            .map(|port| port.index)
    }
}

pub fn list_ports(backend: &dyn MidiBackend, direction: Direction) -> Result<Vec<Port>, MidiError> {
    backend.ports(direction)
}

/// Logs every input and output port name at info level.
pub fn log_ports(backend: &dyn MidiBackend) -> Result<(), MidiError> {
    for direction in [Direction::Input, Direction::Output] {
        for port in backend.ports(direction)? {
            log::info!("{} port {}: {}", direction, port.index, port.name);
        }
    }
    Ok(())
}

/// Searches the ports of `direction` for names containing `keyword`, ignoring case.
pub fn find_ports(
    backend: &dyn MidiBackend,
    direction: Direction,
    keyword: &str,
) -> Result<PortMatches, MidiError> {
    Ok(PortMatches {
        ports: backend.ports(direction)?.into_iter(),
        keyword: keyword.to_owned(),
    })
}

/// The index of the `number`-th (0-based) port matching `keyword`.
pub fn nth_port(
    backend: &dyn MidiBackend,
    direction: Direction,
    keyword: &str,
    number: usize,
) -> Result<usize, MidiError> {
    find_ports(backend, direction, keyword)?
        .nth(number)
        .ok_or_else(|| MidiError::DeviceNotFound {
            keyword: keyword.to_owned(),
            number,
            direction,
        })
}
