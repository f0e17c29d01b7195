//! Control values supplied by the presentation layer.
//!
//! The three integers are slider readings the host periodically sends to the
//! device, which interprets them as the red/yellow/green phase intervals of
//! its traffic-light state machine. The core reads them, it never mutates
//! them; validation (the device ignores non-positive values) is the device's
//! business.

use std::sync::{Arc, RwLock};

use serde::Serialize;

/// One set of slider readings: `[red, yellow, green]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControlValues {
    pub red: u32,
    pub yellow: u32,
    pub green: u32,
}

impl ControlValues {
    pub fn new(red: u32, yellow: u32, green: u32) -> Self {
        Self { red, yellow, green }
    }
}

/// Cheaply cloneable handle to the current control values.
///
/// Written by the presentation layer, read by the command encoder at each
/// qualifying tick. There is no change notification in this direction: the
/// send cadence samples whatever is current.
#[derive(Clone, Default)]
pub struct SharedControls {
    inner: Arc<RwLock<ControlValues>>,
}

impl SharedControls {
    /// Create a handle with all-zero values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle with initial values.
    pub fn with_values(values: ControlValues) -> Self {
        Self {
            inner: Arc::new(RwLock::new(values)),
        }
    }

    /// Current values, by value.
    pub fn get(&self) -> ControlValues {
        *self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the current values.
    pub fn set(&self, values: ControlValues) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = values;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_zero() {
        let controls = SharedControls::new();
        assert_eq!(controls.get(), ControlValues::new(0, 0, 0));
    }

    #[test]
    fn test_set_get() {
        let controls = SharedControls::with_values(ControlValues::new(2000, 500, 2000));
        assert_eq!(controls.get(), ControlValues::new(2000, 500, 2000));

        controls.set(ControlValues::new(1, 2, 3));
        assert_eq!(controls.get(), ControlValues::new(1, 2, 3));
    }

    #[test]
    fn test_clone_shares_state() {
        let a = SharedControls::new();
        let b = a.clone();

        a.set(ControlValues::new(7, 8, 9));
        assert_eq!(b.get(), ControlValues::new(7, 8, 9));
    }
}
