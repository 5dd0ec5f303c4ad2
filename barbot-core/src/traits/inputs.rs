//! Safety input trait

/// Interlock inputs, already interpreted for polarity
pub trait SafetyInputs {
    /// Emergency stop line is asserted
    fn emergency_stop(&self) -> bool;

    /// Carriage travel limit switch is asserted
    fn limit_switch(&self) -> bool;

    /// A container is present under the dispensers
    fn container_present(&self) -> bool;
}

impl<T: SafetyInputs + ?Sized> SafetyInputs for &T {
    fn emergency_stop(&self) -> bool {
        (**self).emergency_stop()
    }

    fn limit_switch(&self) -> bool {
        (**self).limit_switch()
    }

    fn container_present(&self) -> bool {
        (**self).container_present()
    }
}
