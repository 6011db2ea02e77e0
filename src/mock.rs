//! An in-memory [`MidiBackend`] for exercising devices without hardware.
//!
//! ```
//! use std::sync::Arc;
//! use padlink::mock::MockBackend;
//!
//! let backend = MockBackend::new().with_port("Launchpad");
//! let mut launchpad = padlink::classic::Launchpad::new(Arc::new(backend.clone()));
//! launchpad.open(0, "launchpad")?;
//!
//! launchpad.led_ctrl_xy(0, 1, padlink::classic::Color::RED)?;
//! assert_eq!(backend.sent(), vec![vec![144, 0, 3]]);
//!
//! backend.inject(&[144, 0, 127]);
//! assert!(launchpad.button_state_raw().unwrap().pressed);
//! # Ok::<(), padlink::MidiError>(())
//! ```

use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::Mutex;

use crate::{Direction, InputConnection, MidiBackend, MidiError, OutputConnection, Port, RawMessage};

#[derive(Default)]
struct State {
    inputs: Vec<String>,
    outputs: Vec<String>,
    sent: Vec<Vec<u8>>,
    sinks: Vec<(u64, Sender<RawMessage>)>,
    next_connection: u64,
    live_outputs: usize,
    refuse_inputs: bool,
    refuse_outputs: bool,
    fail_sends: bool,
}

/// Records everything sent to it and delivers injected messages to every open input.
///
/// Clones share the same state, so a test can keep one clone while a device owns another.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<State>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a port with this name in both directions.
    pub fn with_port(self, name: &str) -> Self {
        self.with_input(name).with_output(name)
    }

    pub fn with_input(self, name: &str) -> Self {
        self.state.lock().inputs.push(name.to_owned());
        self
    }

    pub fn with_output(self, name: &str) -> Self {
        self.state.lock().outputs.push(name.to_owned());
        self
    }

    /// Delivers `bytes` to every open input connection, as if the hardware had sent them.
    pub fn inject(&self, bytes: &[u8]) {
        let message = RawMessage::from_bytes(bytes);
        for (_, sink) in &self.state.lock().sinks {
            let _ = sink.send(message.clone());
        }
    }

    /// Every message sent so far, oldest first.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.lock().sent.clone()
    }

    /// Returns and forgets every message sent so far.
    pub fn take_sent(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.state.lock().sent)
    }

    /// Number of currently open `(input, output)` connections.
    pub fn live_connections(&self) -> (usize, usize) {
        let state = self.state.lock();
        (state.sinks.len(), state.live_outputs)
    }

    /// Makes subsequent input connects fail.
    pub fn refuse_inputs(&self, refuse: bool) {
        self.state.lock().refuse_inputs = refuse;
    }

    /// Makes subsequent output connects fail.
    pub fn refuse_outputs(&self, refuse: bool) {
        self.state.lock().refuse_outputs = refuse;
    }

    /// Makes every send on any output fail.
    pub fn fail_sends(&self, fail: bool) {
        self.state.lock().fail_sends = fail;
    }
}

struct MockInput {
    id: u64,
    state: Arc<Mutex<State>>,
}

impl InputConnection for MockInput {
    fn close(self: Box<Self>) {}
}

impl Drop for MockInput {
    fn drop(&mut self) {
        let id = self.id;
        self.state.lock().sinks.retain(|(sink_id, _)| *sink_id != id);
    }
}

struct MockOutput {
    state: Arc<Mutex<State>>,
}

impl OutputConnection for MockOutput {
    fn send(&mut self, bytes: &[u8]) -> Result<(), MidiError> {
        let mut state = self.state.lock();
        if state.fail_sends {
            return Err(MidiError::Backend("mock send failure".to_owned()));
        }
        state.sent.push(bytes.to_vec());
        Ok(())
    }
}

impl Drop for MockOutput {
    fn drop(&mut self) {
        self.state.lock().live_outputs -= 1;
    }
}

impl MidiBackend for MockBackend {
    fn ports(&self, direction: Direction) -> Result<Vec<Port>, MidiError> {
        let state = self.state.lock();
        let names = match direction {
            Direction::Input => &state.inputs,
            Direction::Output => &state.outputs,
        };
        Ok(names
            .iter()
            .enumerate()
            .map(|(index, name)| Port {
                index,
                name: name.clone(),
            })
            .collect())
    }

    fn connect_input(
        &self,
        index: usize,
        sink: Sender<RawMessage>,
    ) -> Result<Box<dyn InputConnection>, MidiError> {
        let mut state = self.state.lock();
        if index >= state.inputs.len() {
            return Err(MidiError::NoSuchPort {
                direction: Direction::Input,
                index,
            });
        }
        if state.refuse_inputs {
            return Err(MidiError::Backend("mock input refused".to_owned()));
        }

        let id = state.next_connection;
        state.next_connection += 1;
        state.sinks.push((id, sink));
        Ok(Box::new(MockInput {
            id,
            state: Arc::clone(&self.state),
        }))
    }

    fn connect_output(&self, index: usize) -> Result<Box<dyn OutputConnection>, MidiError> {
        let mut state = self.state.lock();
        if index >= state.outputs.len() {
            return Err(MidiError::NoSuchPort {
                direction: Direction::Output,
                index,
            });
        }
        if state.refuse_outputs {
            return Err(MidiError::Backend("mock output refused".to_owned()));
        }

        state.live_outputs += 1;
        Ok(Box::new(MockOutput {
            state: Arc::clone(&self.state),
        }))
    }
}
