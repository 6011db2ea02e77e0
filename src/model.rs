//! Picking a device model at runtime.

use std::sync::Arc;

use crate::dicer::Dicer;
use crate::launch_control_xl::LaunchControlXl;
use crate::launchkey_mini::LaunchKeyMini;
use crate::launchpad::Launchpad;
use crate::launchpad_pro::LaunchpadPro;
use crate::{DeviceState, InputEvent, MidiBackend, MidiError, RawMessage, RetryPolicy};

/// Every supported hardware model.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Model {
    /// The two-color Launchpad, Launchpad S and Launchpad Mini
    Classic,
    Pro,
    Mk2,
    ControlXl,
    LaunchKeyMini,
    Dicer,
}

impl Model {
    pub const ALL: [Model; 6] = [
        Self::Classic,
        Self::Pro,
        Self::Mk2,
        Self::ControlXl,
        Self::LaunchKeyMini,
        Self::Dicer,
    ];

    /// The port name keyword this model is found by unless told otherwise.
    pub fn default_keyword(self) -> &'static str {
        match self {
            Self::Classic => "Launchpad",
            Self::Pro => "Pro",
            Self::Mk2 => "Mk2",
            Self::ControlXl => "Control XL",
            Self::LaunchKeyMini => "LaunchKey",
            Self::Dicer => "Dicer",
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Classic => "Launchpad",
            Self::Pro => "Launchpad Pro",
            Self::Mk2 => "Launchpad Mk2",
            Self::ControlXl => "Launch Control XL",
            Self::LaunchKeyMini => "LaunchKey Mini",
            Self::Dicer => "Dicer",
        })
    }
}

/// Which device to open: the `number`-th (0-based) device of `model` whose port names contain
/// `name`, or the model's default keyword if `name` is `None`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceSelector {
    pub model: Model,
    #[cfg_attr(feature = "serde", serde(default))]
    pub number: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub retry: RetryPolicy,
}

impl DeviceSelector {
    /// The first device of `model`, found by its default keyword, without retries.
    pub fn new(model: Model) -> Self {
        Self {
            model,
            number: 0,
            name: None,
            retry: RetryPolicy::NONE,
        }
    }

    pub fn keyword(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.model.default_keyword())
    }
}

/// A device handle of any model, for applications that pick the model at runtime.
pub enum AnyDevice {
    Classic(Launchpad),
    /// Launchpad Pro or Mk2
    Pro(LaunchpadPro),
    ControlXl(LaunchControlXl),
    LaunchKeyMini(LaunchKeyMini),
    Dicer(Dicer),
}

macro_rules! each_device {
    ($self:expr, $device:ident => $body:expr) => {
        match $self {
            AnyDevice::Classic($device) => $body,
            AnyDevice::Pro($device) => $body,
            AnyDevice::ControlXl($device) => $body,
            AnyDevice::LaunchKeyMini($device) => $body,
            AnyDevice::Dicer($device) => $body,
        }
    };
}

impl AnyDevice {
    /// A closed handle for `model`.
    pub fn new(model: Model, backend: Arc<dyn MidiBackend>) -> Self {
        match model {
            Model::Classic => Self::Classic(Launchpad::new(backend)),
            Model::Pro => Self::Pro(LaunchpadPro::pro(backend)),
            Model::Mk2 => Self::Pro(LaunchpadPro::mk2(backend)),
            Model::ControlXl => Self::ControlXl(LaunchControlXl::new(backend)),
            Model::LaunchKeyMini => Self::LaunchKeyMini(LaunchKeyMini::new(backend)),
            Model::Dicer => Self::Dicer(Dicer::new(backend)),
        }
    }

    /// Creates a handle for the selected model and opens it according to the selector's retry
    /// policy.
    pub fn open_selected(
        backend: Arc<dyn MidiBackend>,
        selector: &DeviceSelector,
    ) -> Result<Self, MidiError> {
        let mut device = Self::new(selector.model, backend);
        device.open_with_retry(selector.number, selector.keyword(), &selector.retry)?;
        Ok(device)
    }

    pub fn model(&self) -> Model {
        each_device!(self, device => device.model())
    }

    pub fn state(&self) -> DeviceState {
        each_device!(self, device => device.state())
    }

    pub fn is_open(&self) -> bool {
        each_device!(self, device => device.is_open())
    }

    pub fn open(&mut self, number: usize, name: &str) -> Result<(), MidiError> {
        each_device!(self, device => device.open(number, name))
    }

    pub fn open_with_retry(
        &mut self,
        number: usize,
        name: &str,
        policy: &RetryPolicy,
    ) -> Result<(), MidiError> {
        each_device!(self, device => device.open_with_retry(number, name, policy))
    }

    pub fn check(&self, number: usize, name: &str) -> bool {
        each_device!(self, device => device.check(number, name))
    }

    pub fn close(&mut self) {
        each_device!(self, device => device.close())
    }

    pub fn reset(&mut self) -> Result<(), MidiError> {
        each_device!(self, device => device.reset())
    }

    pub fn button_flush(&mut self) -> usize {
        each_device!(self, device => device.button_flush())
    }

    pub fn event_raw(&self) -> Option<RawMessage> {
        each_device!(self, device => device.event_raw())
    }

    /// The next decoded input event, without blocking.
    pub fn poll(&self) -> Option<InputEvent> {
        each_device!(self, device => device.button_state_raw().map(Into::into))
    }
}
