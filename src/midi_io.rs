use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use midir::{MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};

use crate::message::frame_sysex;
use crate::{Direction, MidiError, Port, RawMessage, RecvError};

/// Name of the midir connection used for reading from a device
const INPUT_CONNECTION_NAME: &str = "Padlink input";
/// Name of the midir connection used for writing to a device
const OUTPUT_CONNECTION_NAME: &str = "Padlink output";

/// Source of MIDI ports. [`MidirBackend`] talks to the operating system; [`crate::mock::MockBackend`]
/// is an in-memory stand-in for tests.
pub trait MidiBackend: Send + Sync {
    /// Enumerates the ports of one direction, in the order the operating system reports them.
    fn ports(&self, direction: Direction) -> Result<Vec<Port>, MidiError>;

    /// Connects to the input port with the given enumeration index. Every received message must
    /// be pushed into `sink`.
    fn connect_input(
        &self,
        index: usize,
        sink: Sender<RawMessage>,
    ) -> Result<Box<dyn InputConnection>, MidiError>;

    /// Connects to the output port with the given enumeration index.
    fn connect_output(&self, index: usize) -> Result<Box<dyn OutputConnection>, MidiError>;
}

/// A bound output port.
pub trait OutputConnection: Send {
    fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError>;
}

/// A bound input port. Messages flow into the sink handed to [`MidiBackend::connect_input`]
/// until the connection is closed.
pub trait InputConnection: Send {
    fn close(self: Box<Self>);
}

/// The operating system's MIDI ports, accessed through midir.
#[derive(Debug, Default, Copy, Clone)]
pub struct MidirBackend;

fn collect_ports<T: midir::MidiIO>(midi_io: &T) -> Vec<Port> {
    let mut ports = Vec::new();
    for (index, port) in midi_io.ports().iter().enumerate() {
        match midi_io.port_name(port) {
            Ok(name) => ports.push(Port { index, name }),
            Err(e) => log::warn!("skipping MIDI port {}, its name is unavailable: {}", index, e),
        }
    }
    ports
}

struct MidirInput(MidiInputConnection<()>);

impl InputConnection for MidirInput {
    fn close(self: Box<Self>) {
        let _ = self.0.close();
    }
}

struct MidirOutput(MidiOutputConnection);

impl OutputConnection for MidirOutput {
    fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
        self.0.send(bytes)?;
        Ok(())
    }
}

impl MidiBackend for MidirBackend {
    fn ports(&self, direction: Direction) -> Result<Vec<Port>, MidiError> {
        let ports = match direction {
            Direction::Input => collect_ports(&MidiInput::new(crate::APPLICATION_NAME)?),
            Direction::Output => collect_ports(&MidiOutput::new(crate::APPLICATION_NAME)?),
        };
        Ok(ports)
    }

    fn connect_input(
        &self,
        index: usize,
        sink: Sender<RawMessage>,
    ) -> Result<Box<dyn InputConnection>, MidiError> {
        let midi_input = MidiInput::new(crate::APPLICATION_NAME)?;
        let port = midi_input
            .ports()
            .get(index)
            .cloned()
            .ok_or(MidiError::NoSuchPort {
                direction: Direction::Input,
                index,
            })?;

        let midir_callback = move |_timestamp: u64, data: &[u8], _: &mut ()| {
            // the receiving half only goes away together with this connection
            let _ = sink.send(RawMessage::from_bytes(data));
        };

        let connection = midi_input.connect(&port, INPUT_CONNECTION_NAME, midir_callback, ())?;
        Ok(Box::new(MidirInput(connection)))
    }

    fn connect_output(&self, index: usize) -> Result<Box<dyn OutputConnection>, MidiError> {
        let midi_output = MidiOutput::new(crate::APPLICATION_NAME)?;
        let port = midi_output
            .ports()
            .get(index)
            .cloned()
            .ok_or(MidiError::NoSuchPort {
                direction: Direction::Output,
                index,
            })?;

        let connection = midi_output.connect(&port, OUTPUT_CONNECTION_NAME)?;
        Ok(Box::new(MidirOutput(connection)))
    }
}

/// Creates a linked [`Canceller`] and [`CancelToken`].
pub fn cancellation() -> (Canceller, CancelToken) {
    let (sender, receiver) = crossbeam_channel::bounded(0);
    (Canceller { _sender: sender }, CancelToken { receiver })
}

/// Cancels every blocking receive that waits on one of its tokens. Dropping the canceller has the
/// same effect as calling [`Canceller::cancel`].
#[derive(Debug)]
pub struct Canceller {
    // never sent on; the token side observes the disconnect
    _sender: Sender<()>,
}

impl Canceller {
    pub fn cancel(self) {}
}

/// The waiting side of a [`Canceller`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelToken {
    receiver: Receiver<()>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }
}

struct BoundInput {
    id: usize,
    connection: Box<dyn InputConnection>,
    receiver: Receiver<RawMessage>,
}

struct BoundOutput {
    id: usize,
    connection: Box<dyn OutputConnection>,
}

/// Owns at most one input and one output port of a device.
///
/// A transport has no internal synchronization. Calls into the same transport (or the device
/// handle owning it) from several threads must be serialized by the caller; a single writer plus
/// a single reader running the receive loop is the intended usage.
pub struct Transport {
    backend: Arc<dyn MidiBackend>,
    input: Option<BoundInput>,
    output: Option<BoundOutput>,
}

impl Transport {
    pub fn new(backend: Arc<dyn MidiBackend>) -> Self {
        Self {
            backend,
            input: None,
            output: None,
        }
    }

    pub fn backend(&self) -> &dyn MidiBackend {
        &*self.backend
    }

    /// Binds the output port with enumeration index `id`. If an output is already bound, this
    /// succeeds without reopening anything.
    pub fn open_output(&mut self, id: usize) -> Result<(), MidiError> {
        if self.output.is_some() {
            return Ok(());
        }

        let connection = self.backend.connect_output(id)?;
        self.output = Some(BoundOutput { id, connection });
        log::debug!("opened MIDI output port {}", id);
        Ok(())
    }

    /// Binds the input port with enumeration index `id`. If an input is already bound, this
    /// succeeds without reopening anything.
    pub fn open_input(&mut self, id: usize) -> Result<(), MidiError> {
        if self.input.is_some() {
            return Ok(());
        }

        let (sender, receiver) = crossbeam_channel::unbounded();
        let connection = self.backend.connect_input(id, sender)?;
        self.input = Some(BoundInput {
            id,
            connection,
            receiver,
        });
        log::debug!("opened MIDI input port {}", id);
        Ok(())
    }

    pub fn close_output(&mut self) {
        if let Some(output) = self.output.take() {
            log::debug!("closed MIDI output port {}", output.id);
        }
    }

    pub fn close_input(&mut self) {
        if let Some(input) = self.input.take() {
            input.connection.close();
            log::debug!("closed MIDI input port {}", input.id);
        }
    }

    pub fn input_id(&self) -> Option<usize> {
        self.input.as_ref().map(|input| input.id)
    }

    pub fn output_id(&self) -> Option<usize> {
        self.output.as_ref().map(|output| output.id)
    }

    /// Sends `bytes` verbatim as one message.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
        let output = self
            .output
            .as_mut()
            .ok_or(MidiError::NotOpen(Direction::Output))?;
        log::trace!("-> {:?}", bytes);
        output.connection.send(bytes)
    }

    /// Sends exactly one three-byte message.
    pub fn send_short(&mut self, status: u8, data1: u8, data2: u8) -> Result<(), MidiError> {
        self.send(&[status, data1, data2])
    }

    /// Sends every message of `messages` on its own, in order.
    pub fn send_multi<I, M>(&mut self, messages: I) -> Result<(), MidiError>
    where
        I: IntoIterator<Item = M>,
        M: AsRef<[u8]>,
    {
        for message in messages {
            self.send(message.as_ref())?;
        }
        Ok(())
    }

    /// Sends `payload` framed by `0xF0` and `0xF7`.
    pub fn send_sysex(&mut self, payload: &[u8]) -> Result<(), MidiError> {
        self.send(&frame_sysex(payload))
    }

    /// If there is a pending message, return that. Otherwise, return `None`.
    ///
    /// This function does not block.
    pub fn try_recv(&self) -> Option<RawMessage> {
        self.input.as_ref()?.receiver.try_recv().ok()
    }

    /// Wait for a message to arrive, or for `cancel` to be triggered.
    pub fn recv(&self, cancel: &CancelToken) -> Result<RawMessage, RecvError> {
        self.recv_deadline(None, Some(cancel))
    }

    /// Receives a single message, giving up after `timeout`.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
        cancel: Option<&CancelToken>,
    ) -> Result<RawMessage, RecvError> {
        self.recv_deadline(Some(Instant::now() + timeout), cancel)
    }

    /// Suspends the calling thread until a message arrives, the `deadline` passes or `cancel`
    /// is triggered. Without deadline and token this waits for as long as the input is bound.
    pub fn recv_deadline(
        &self,
        deadline: Option<Instant>,
        cancel: Option<&CancelToken>,
    ) -> Result<RawMessage, RecvError> {
        let input = self.input.as_ref().ok_or(RecvError::NotOpen)?;

        let cancelled = match cancel {
            Some(token) => token.receiver.clone(),
            None => crossbeam_channel::never(),
        };
        let timed_out = match deadline {
            Some(deadline) => crossbeam_channel::at(deadline),
            None => crossbeam_channel::never(),
        };

        crossbeam_channel::select! {
            recv(input.receiver) -> message => message.map_err(|_| RecvError::Disconnected),
            recv(cancelled) -> _ => Err(RecvError::Cancelled),
            recv(timed_out) -> _ => Err(RecvError::Timeout),
        }
    }

    /// Returns an iterator over the currently pending messages. As soon as all pending messages
    /// have been iterated over, the iterator will return.
    pub fn iter_pending(&self) -> impl Iterator<Item = RawMessage> + '_ {
        std::iter::from_fn(move || self.try_recv())
    }

    /// Discards all pending messages and returns how many there were.
    pub fn drain(&self) -> usize {
        self.iter_pending().count()
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.close_input();
        self.close_output();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBackend;

    fn transport() -> (MockBackend, Transport) {
        let backend = MockBackend::new().with_port("Launchpad");
        let transport = Transport::new(Arc::new(backend.clone()));
        (backend, transport)
    }

    #[test]
    fn sysex_is_framed() {
        let (backend, mut transport) = transport();
        transport.open_output(0).unwrap();
        transport.send_sysex(&[1, 2, 3]).unwrap();
        assert_eq!(backend.sent(), vec![vec![0xF0, 1, 2, 3, 0xF7]]);
    }

    #[test]
    fn multi_sends_each_message_separately() {
        let (backend, mut transport) = transport();
        transport.open_output(0).unwrap();
        transport
            .send_multi(vec![vec![144u8, 0, 3], vec![176u8, 104, 48, 0]])
            .unwrap();
        assert_eq!(backend.sent(), vec![vec![144, 0, 3], vec![176, 104, 48, 0]]);
    }

    #[test]
    fn opening_twice_keeps_the_first_binding() {
        let (backend, mut transport) = transport();
        transport.open_output(0).unwrap();
        transport.open_output(0).unwrap();
        transport.open_input(0).unwrap();
        transport.open_input(0).unwrap();
        assert_eq!(backend.live_connections(), (1, 1));
    }

    #[test]
    fn closing_a_closed_transport_is_harmless() {
        let (backend, mut transport) = transport();
        transport.close_input();
        transport.close_output();
        transport.open_input(0).unwrap();
        transport.close_input();
        transport.close_input();
        assert_eq!(backend.live_connections(), (0, 0));
    }

    #[test]
    fn sending_without_output_fails() {
        let (_backend, mut transport) = transport();
        assert!(matches!(
            transport.send_short(144, 0, 0),
            Err(MidiError::NotOpen(Direction::Output))
        ));
    }

    #[test]
    fn try_recv_never_blocks() {
        let (backend, mut transport) = transport();
        assert_eq!(transport.try_recv(), None);
        transport.open_input(0).unwrap();
        assert_eq!(transport.try_recv(), None);
        backend.inject(&[144, 1, 127]);
        assert_eq!(transport.try_recv(), Some(RawMessage::short(144, 1, 127)));
    }

    #[test]
    fn recv_times_out() {
        let (_backend, mut transport) = transport();
        transport.open_input(0).unwrap();
        let started = Instant::now();
        let result = transport.recv_timeout(Duration::from_millis(20), None);
        assert_eq!(result, Err(RecvError::Timeout));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn recv_wakes_up_on_message_from_other_thread() {
        let (backend, mut transport) = transport();
        transport.open_input(0).unwrap();
        let injector = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            backend.inject(&[176, 104, 127]);
        });
        let (_canceller, token) = cancellation();
        assert_eq!(transport.recv(&token), Ok(RawMessage::short(176, 104, 127)));
        injector.join().unwrap();
    }

    #[test]
    fn recv_can_be_cancelled() {
        let (_backend, mut transport) = transport();
        transport.open_input(0).unwrap();
        let (canceller, token) = cancellation();
        assert!(!token.is_cancelled());
        let cancelling = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            canceller.cancel();
        });
        assert_eq!(transport.recv(&token), Err(RecvError::Cancelled));
        assert!(token.is_cancelled());
        cancelling.join().unwrap();
    }

    #[test]
    fn recv_without_input_reports_not_open() {
        let (_backend, transport) = transport();
        assert_eq!(
            transport.recv_timeout(Duration::from_millis(1), None),
            Err(RecvError::NotOpen)
        );
    }

    #[test]
    fn drain_counts_pending_messages() {
        let (backend, mut transport) = transport();
        transport.open_input(0).unwrap();
        backend.inject(&[144, 0, 127]);
        backend.inject(&[144, 0, 0]);
        assert_eq!(transport.drain(), 2);
        assert_eq!(transport.drain(), 0);
    }
}
