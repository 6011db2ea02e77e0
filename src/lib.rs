/*!
Protocol codecs for the Novation Launchpad family of MIDI grid controllers: the classic
Launchpad (and Launchpad S / Mini), Launchpad Pro, Launchpad Mk2, Launch Control XL, LaunchKey
Mini and Dicer.

Every device is driven through a [`Device`] handle. A handle finds its ports by name, binds
them, and translates between the device's MIDI dialect and plain Rust types: LED writes go out as
the exact bytes the hardware expects, and incoming messages come back as [`ButtonEvent`]s or
[`InputEvent`]s.

```no_run
use std::sync::Arc;
use padlink::classic::{Color, Launchpad};

let mut launchpad = Launchpad::new(Arc::new(padlink::MidirBackend));
launchpad.open(0, "Launchpad")?;
launchpad.button_flush();
launchpad.reset()?;

loop {
    let event = launchpad.wait_xy(None, None)?;
    if let Some(coordinate) = event.button.coordinate() {
        let color = if event.pressed { Color::GREEN } else { Color::BLACK };
        launchpad.led_ctrl_xy(coordinate.x, coordinate.y, color)?;
    }
}
# Ok::<(), Box<dyn std::error::Error>>(())
```

# Receiving

Incoming messages are queued as they arrive. [`Device::button_state_raw`] returns the next
decodable event without blocking, [`Device::wait`] blocks until one arrives, a timeout passes or
a [`CancelToken`] fires. Messages that carry no input (replies, pressure updates and the broken
SysEx pieces some devices emit) are dropped on the way.

A handle is `Send` but does no locking of its own. Move it to the thread that drives the device,
or wrap it in a mutex to share it between a writer and a reader.

# Testing without hardware

The [`mock`] module has an in-memory [`MidiBackend`] that records what was sent and lets you
inject incoming messages.
*/

mod util;

mod errors;
pub use errors::*;

pub mod message;
pub use message::RawMessage;

mod midi_io;
pub use midi_io::*;

mod discovery;
pub use discovery::*;

mod event;
pub use event::*;

mod device;
pub use device::*;

mod model;
pub use model::*;

pub mod bindings;
pub use bindings::{Binding, Bindings};

pub mod mock;

pub mod launchpad;
pub use launchpad as classic;

pub mod launchpad_pro;
pub use launchpad_pro as pro;

pub mod launch_control_xl;
pub use launch_control_xl as control_xl;

pub mod launchkey_mini;

pub mod dicer;

pub mod prelude {
    pub use crate::device::{Codec, LedGrid, XyCodec};
    pub use crate::midi_io::MidiBackend;
}

/// Identifier used for e.g. the midi port names etc.
const APPLICATION_NAME: &str = "Padlink";
