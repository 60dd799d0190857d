//! Sources of the brightness pushed to powerd when a session starts.
//!
//! Setting the brightness is the only way to synchronize our view of it with
//! powerd, so every session pushes a value on start. Without a better source
//! (a stored user preference, a configured value) this is the default powerd
//! proposes.

use crate::external::brightness::BrightnessParams;

/// Decides which brightness a new session should start with.
pub trait InitialValueProvider: Send + Sync {
    /// The value to push, or None to fall back to the powerd default.
    ///
    /// The returned value doesn't have to be in range, the session clamps it.
    fn initial_value(&self, params: &BrightnessParams) -> Option<i32>;
}

/// Always starts with the default brightness reported by powerd
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceDefault;

impl InitialValueProvider for ServiceDefault {
    fn initial_value(&self, params: &BrightnessParams) -> Option<i32> {
        Some(params.default)
    }
}

/// Always starts with the same, configured brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedValue(pub i32);

impl InitialValueProvider for FixedValue {
    fn initial_value(&self, _: &BrightnessParams) -> Option<i32> {
        Some(self.0)
    }
}

impl<P: InitialValueProvider> InitialValueProvider for Option<P> {
    fn initial_value(&self, params: &BrightnessParams) -> Option<i32> {
        self.as_ref().and_then(|p| p.initial_value(params))
    }
}

/// Resolve the value a session starts with, falling back to `params.default`
pub fn resolve(provider: &dyn InitialValueProvider, params: &BrightnessParams) -> i32 {
    provider.initial_value(params).unwrap_or(params.default)
}
