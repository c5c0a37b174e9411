/// Cycle Results - the tick × port table produced by one run
///
/// Immutable once built. Row `t` holds every output port's value at tick
/// `t`; column order is fixed at compile time (nodes in graph order, ports
/// in declared order) and listed in [`CycleResults::columns`].

use crate::graph::PortRef;
use crate::signal::Signal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResults {
    columns: Vec<PortRef>,
    ticks: usize,
    /// Row-major: `values[tick * columns.len() + column]`
    values: Vec<Signal>,
}

impl CycleResults {
    /// Empty table for `columns`, with room for `ticks` rows
    pub(crate) fn with_capacity(columns: Vec<PortRef>, ticks: usize) -> Self {
        let capacity = columns.len() * ticks;
        Self {
            columns,
            ticks: 0,
            values: Vec::with_capacity(capacity),
        }
    }

    /// Append one tick's row
    pub(crate) fn push_row(&mut self, row: &[Signal]) {
        debug_assert_eq!(row.len(), self.columns.len(), "Row width mismatch");
        self.values.extend_from_slice(row);
        self.ticks += 1;
    }

    /// Number of ticks recorded
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Output ports, in column order
    pub fn columns(&self) -> &[PortRef] {
        &self.columns
    }

    /// Column index of an output port
    pub fn column_of(&self, port: PortRef) -> Option<usize> {
        self.columns.iter().position(|&c| c == port)
    }

    /// Every port's value at one tick
    pub fn row(&self, tick: usize) -> Option<&[Signal]> {
        if tick >= self.ticks {
            return None;
        }
        let width = self.columns.len();
        Some(&self.values[tick * width..(tick + 1) * width])
    }

    /// Value at (tick, column)
    pub fn get(&self, tick: usize, column: usize) -> Option<Signal> {
        self.row(tick).and_then(|row| row.get(column).copied())
    }

    /// Value of an output port at a tick
    pub fn value(&self, tick: usize, port: PortRef) -> Option<Signal> {
        self.get(tick, self.column_of(port)?)
    }

    /// One port's values across the whole window
    pub fn waveform(&self, port: PortRef) -> Option<Vec<Signal>> {
        let column = self.column_of(port)?;
        let width = self.columns.len();
        Some(
            (0..self.ticks)
                .map(|tick| self.values[tick * width + column])
                .collect(),
        )
    }

    /// First tick where `port` differs from `expected`
    ///
    /// Compares over the shorter of the two lengths; returns
    /// `(tick, actual, expected)`.
    pub fn first_mismatch(
        &self,
        port: PortRef,
        expected: &[Signal],
    ) -> Option<(usize, Signal, Signal)> {
        let actual = self.waveform(port)?;
        actual
            .iter()
            .zip(expected)
            .enumerate()
            .find(|(_, (a, e))| a != e)
            .map(|(tick, (&a, &e))| (tick, a, e))
    }

    /// SHA-256 of the table (columns plus raw value bits), hex encoded
    ///
    /// Equal digests mean bit-for-bit equal runs.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.columns.len() as u64).to_le_bytes());
        hasher.update((self.ticks as u64).to_le_bytes());
        for column in &self.columns {
            hasher.update((column.node as u64).to_le_bytes());
            hasher.update((column.port as u64).to_le_bytes());
        }
        for value in &self.values {
            hasher.update(value.to_bits().to_le_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}
