use std::{cell::RefCell, rc::Rc};

use skein_core::{ComponentId, Probe};
use skein_kernel::Simulation;

/// A tracked output: one component port read on every sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub component: ComponentId,
    pub port: String,
    /// Display name, `component.port` when built from a simulation.
    pub label: String,
}

impl Column {
    pub fn new(component: ComponentId, port: impl Into<String>) -> Self {
        let port = port.into();
        Self {
            component,
            label: port.clone(),
            port,
        }
    }

    /// One column per readable port of every registered component.
    #[must_use]
    pub fn all_of(sim: &Simulation) -> Vec<Self> {
        let mut columns = Vec::new();
        for id in sim.ids() {
            let (Some(component), Some(ports)) = (sim.name(id), sim.ports(id)) else {
                continue;
            };
            columns.extend(ports.readable().map(|port| Self {
                component: id,
                port: port.to_owned(),
                label: format!("{component}.{port}"),
            }));
        }
        columns
    }
}

/// One row of a [`SampleLog`].
///
/// `values[i]` belongs to the log's `i`-th column and is `None` when the
/// port could not be read at that time.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub values: Vec<Option<f64>>,
}

/// A shared table of samples.
///
/// Clones share the same table, so a handle kept by the host still sees
/// the rows written by a collector that was moved into a simulation.
#[derive(Debug, Clone, Default)]
pub struct SampleLog {
    inner: Rc<RefCell<Table>>,
}

#[derive(Debug, Default)]
struct Table {
    columns: Vec<Column>,
    samples: Vec<Sample>,
}

impl SampleLog {
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Table {
                columns,
                samples: Vec::new(),
            })),
        }
    }

    /// Adds a column. Rows recorded earlier have no value for it.
    pub fn push_column(&self, column: Column) {
        self.inner.borrow_mut().columns.push(column);
    }

    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        self.inner.borrow().columns.clone()
    }

    #[must_use]
    pub fn samples(&self) -> Vec<Sample> {
        self.inner.borrow().samples.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the `(time, value)` pairs recorded for one port.
    ///
    /// Rows where the port was unreadable are skipped. Returns `None` if the
    /// port is not tracked.
    #[must_use]
    pub fn series(&self, component: ComponentId, port: &str) -> Option<Vec<(f64, f64)>> {
        let table = self.inner.borrow();
        let index = table
            .columns
            .iter()
            .position(|column| column.component == component && column.port == port)?;
        Some(table.column_points(index).collect())
    }

    /// Returns every column's label with its `(time, value)` pairs.
    #[must_use]
    pub fn traces(&self) -> Vec<(String, Vec<(f64, f64)>)> {
        let table = self.inner.borrow();
        table
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column.label.clone(), table.column_points(index).collect()))
            .collect()
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().samples.clear();
    }

    /// Reads every column through `probe` and appends a row.
    pub(crate) fn record<P: Probe + ?Sized>(&self, time: f64, probe: &P) {
        let mut table = self.inner.borrow_mut();
        let values = table
            .columns
            .iter()
            .map(|column| probe.output(column.component, &column.port))
            .collect();
        table.samples.push(Sample { time, values });
    }
}

impl Table {
    fn column_points(&self, index: usize) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.samples.iter().filter_map(move |sample| {
            let value = sample.values.get(index).copied().flatten()?;
            Some((sample.time, value))
        })
    }
}
