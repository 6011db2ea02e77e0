//! Mapping buttons to application actions.
//!
//! The library does not know what an action is. Applications put in whatever they dispatch on,
//! typically an enum with one variant per kind of action, and get it back when the button is
//! pressed.

use std::collections::BTreeMap;

use crate::{ButtonEvent, Coordinate, LedGrid, MidiError};

/// What a button is bound to: the color its LED shows, and the action it triggers.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binding<C, A> {
    pub color: C,
    pub action: A,
}

/// Buttons, by X/Y coordinate, bound to actions.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bindings<C, A> {
    bindings: BTreeMap<Coordinate, Binding<C, A>>,
}

impl<C, A> Default for Bindings<C, A> {
    fn default() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }
}

impl<C: Copy, A> Bindings<C, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the button at `coordinate`. A button can only be bound once: if it already is, the
    /// existing binding is kept and `false` is returned.
    pub fn bind(&mut self, coordinate: impl Into<Coordinate>, color: C, action: A) -> bool {
        let coordinate = coordinate.into();
        if self.bindings.contains_key(&coordinate) {
            log::warn!("button {:?} is already bound", coordinate);
            return false;
        }
        self.bindings.insert(coordinate, Binding { color, action });
        true
    }

    pub fn unbind(&mut self, coordinate: impl Into<Coordinate>) -> Option<Binding<C, A>> {
        self.bindings.remove(&coordinate.into())
    }

    pub fn get(&self, coordinate: impl Into<Coordinate>) -> Option<&Binding<C, A>> {
        self.bindings.get(&coordinate.into())
    }

    pub fn action(&self, coordinate: impl Into<Coordinate>) -> Option<&A> {
        self.get(coordinate).map(|binding| &binding.action)
    }

    /// The action a button event triggers. Only presses reported by coordinate trigger anything.
    pub fn action_for(&self, event: &ButtonEvent) -> Option<&A> {
        if !event.pressed {
            return None;
        }
        self.action(event.button.coordinate()?)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, &Binding<C, A>)> {
        self.bindings
            .iter()
            .map(|(&coordinate, binding)| (coordinate, binding))
    }

    /// Lights the LED of every bound button in its color.
    pub fn render<G>(&self, grid: &mut G) -> Result<(), MidiError>
    where
        G: LedGrid<Color = C>,
    {
        for (coordinate, binding) in self.iter() {
            grid.light_xy(coordinate.x, coordinate.y, binding.color)?;
        }
        Ok(())
    }
}
