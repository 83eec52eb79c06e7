//! Two-slot history buffers and the common-envelope snapshot.

use serde::{Deserialize, Serialize};

/// Current/previous pair with an explicit swap.
///
/// `push` swaps the slots and writes the new value into the current one, so
/// the value that was current becomes previous without any aliasing.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer<T> {
    slots: [Option<T>; 2],
    head: usize,
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self {
            slots: [None, None],
            head: 0,
        }
    }
}

impl<T> RingBuffer<T> {
    pub fn current(&self) -> Option<&T> {
        self.slots[self.head].as_ref()
    }

    pub fn previous(&self) -> Option<&T> {
        self.slots[1 - self.head].as_ref()
    }

    pub fn swap(&mut self) {
        self.head = 1 - self.head;
    }

    pub fn set_current(&mut self, value: T) {
        self.slots[self.head] = Some(value);
    }

    pub fn push(&mut self, value: T) {
        self.swap();
        self.set_current(value);
    }
}

/// Orbit and Roche lobes around a common-envelope event, lengths in R☉
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonEnvelopeSnapshot {
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub roche_lobe1: f64,
    pub roche_lobe2: f64,
}

impl CommonEnvelopeSnapshot {
    pub fn new(semi_major_axis: f64, eccentricity: f64, roche_lobe1: f64, roche_lobe2: f64) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            roche_lobe1,
            roche_lobe2,
        }
    }
}
