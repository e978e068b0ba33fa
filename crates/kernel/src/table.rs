use indexmap::IndexMap;
use skein_core::{Component, ComponentId, Ports, Probe, StateContributor, UpdateSchedule};
use skein_solvers::StateSystem;

use crate::SimError;

/// The registered components, in registration order.
///
/// A component is checked out of its slot while it runs a callback so the
/// callback can receive mutable access to the rest of the simulation. A
/// checked-out component is invisible to probes and to the integrator.
#[derive(Default)]
pub(crate) struct ComponentTable {
    slots: IndexMap<ComponentId, Slot>,
}

struct Slot {
    name: String,
    component: Option<Box<dyn Component>>,
    pending_removal: bool,
}

impl ComponentTable {
    pub(crate) fn insert(&mut self, id: ComponentId, component: Box<dyn Component>) {
        let slot = Slot {
            name: component.name().to_owned(),
            component: Some(component),
            pending_removal: false,
        };
        self.slots.insert(id, slot);
    }

    pub(crate) fn contains(&self, id: ComponentId) -> bool {
        self.slots.get(&id).is_some_and(|slot| !slot.pending_removal)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.values().filter(|slot| !slot.pending_removal).count()
    }

    /// Returns the registered ids in registration order.
    pub(crate) fn ids(&self) -> Vec<ComponentId> {
        self.slots
            .iter()
            .filter(|(_, slot)| !slot.pending_removal)
            .map(|(id, _)| *id)
            .collect()
    }

    pub(crate) fn name(&self, id: ComponentId) -> Option<&str> {
        self.slots.get(&id).map(|slot| slot.name.as_str())
    }

    pub(crate) fn find(&self, name: &str) -> Option<ComponentId> {
        self.slots
            .iter()
            .find(|(_, slot)| !slot.pending_removal && slot.name == name)
            .map(|(id, _)| *id)
    }

    /// Returns the component if it is registered and not checked out.
    pub(crate) fn get(&self, id: ComponentId) -> Option<&dyn Component> {
        self.slots
            .get(&id)
            .and_then(|slot| slot.component.as_deref())
    }

    pub(crate) fn get_mut(&mut self, id: ComponentId) -> Option<&mut dyn Component> {
        match self.slots.get_mut(&id)?.component.as_mut() {
            Some(component) => Some(component.as_mut()),
            None => None,
        }
    }

    /// Returns the component or the reason it is unavailable.
    pub(crate) fn available(&mut self, id: ComponentId) -> Result<&mut dyn Component, SimError> {
        let slot = self
            .slots
            .get_mut(&id)
            .filter(|slot| !slot.pending_removal)
            .ok_or(SimError::UnknownComponent(id))?;
        match slot.component.as_mut() {
            Some(component) => Ok(component.as_mut()),
            None => Err(SimError::ComponentBusy(id)),
        }
    }

    pub(crate) fn ports(&self, id: ComponentId) -> Option<&Ports> {
        self.get(id).map(|component| component.ports())
    }

    pub(crate) fn update_schedule(&self, id: ComponentId) -> Option<UpdateSchedule> {
        self.get(id).and_then(|component| component.update_schedule())
    }

    /// Takes a component out of its slot for the duration of a callback.
    pub(crate) fn checkout(&mut self, id: ComponentId) -> Result<Box<dyn Component>, SimError> {
        let slot = self
            .slots
            .get_mut(&id)
            .filter(|slot| !slot.pending_removal)
            .ok_or(SimError::UnknownComponent(id))?;
        slot.component.take().ok_or(SimError::ComponentBusy(id))
    }

    /// Returns a checked-out component to its slot.
    ///
    /// If the component was removed while checked out, its slot is dropped
    /// and the component is handed back to the caller.
    pub(crate) fn checkin(&mut self, id: ComponentId, component: Box<dyn Component>) -> Option<Box<dyn Component>> {
        let Some(slot) = self.slots.get_mut(&id) else {
            return Some(component);
        };
        if slot.pending_removal {
            self.slots.shift_remove(&id);
            return Some(component);
        }
        slot.component = Some(component);
        None
    }

    /// Removes a component from the table.
    ///
    /// Returns `Ok(None)` if the component is checked out; it is handed back
    /// by [`checkin`](Self::checkin) instead.
    pub(crate) fn take(&mut self, id: ComponentId) -> Result<Option<Box<dyn Component>>, SimError> {
        let slot = self
            .slots
            .get_mut(&id)
            .filter(|slot| !slot.pending_removal)
            .ok_or(SimError::UnknownComponent(id))?;
        if slot.component.is_none() {
            slot.pending_removal = true;
            return Ok(None);
        }
        Ok(self.slots.shift_remove(&id).and_then(|slot| slot.component))
    }
}

impl Probe for ComponentTable {
    fn output(&self, component: ComponentId, name: &str) -> Option<f64> {
        let component = self.get(component)?;
        if !component.ports().is_readable(name) {
            return None;
        }
        component.output(name)
    }
}

impl StateSystem for ComponentTable {
    fn contributor(&mut self, id: ComponentId) -> Option<&mut dyn StateContributor> {
        self.get_mut(id)?.state_contributor()
    }
}
