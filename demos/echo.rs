//! Lights up every pad of a classic Launchpad while it is held down. Press the rightmost button
//! of the top row to quit.
//!
//! Run with `RUST_LOG=debug` to see what goes over the wire.
use std::sync::Arc;
use std::time::Duration;

use padlink::classic::{Color, Launchpad};
use padlink::{log_ports, MidirBackend, RetryPolicy};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log_ports(&MidirBackend)?;

    let mut launchpad = Launchpad::new(Arc::new(MidirBackend));
    // give a freshly plugged in device a moment to show up
    let retry = RetryPolicy::new(10, Duration::from_millis(500));
    launchpad.open_with_retry(0, "Launchpad", &retry)?;
    let discarded = launchpad.button_flush();
    log::info!("discarded {} stale messages", discarded);
    launchpad.reset()?;

    loop {
        let event = launchpad.wait_xy(None, None)?;
        let Some(coordinate) = event.button.coordinate() else {
            continue;
        };
        if coordinate.x == 7 && coordinate.y == 0 {
            break;
        }

        let color = if event.pressed {
            Color::GREEN
        } else {
            Color::BLACK
        };
        launchpad.led_ctrl_xy(coordinate.x, coordinate.y, color)?;
    }

    launchpad.reset()?;
    Ok(())
}
