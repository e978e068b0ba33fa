use crate::ComponentId;

/// Read access to component outputs.
///
/// State-event conditions and observers use a probe to look at the model
/// without being able to change it.
pub trait Probe {
    /// Returns the value of a component's named output.
    ///
    /// Returns `None` if the component is unknown, does not declare the
    /// output, or is busy handling a callback.
    fn output(&self, component: ComponentId, name: &str) -> Option<f64>;
}
