/// Receives events and optionally returns a control action.
///
/// Closures of the form `FnMut(&E) -> Option<A>` are observers, and `()` is
/// the observer that never intervenes.
pub trait Observer<E, A> {
    /// Observes an event and returns an action to take, if any.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
