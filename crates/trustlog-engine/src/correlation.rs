//! Correlation state: the two pieces of mutable pairing state a session owns.
//!
//! Both structures only store and release entries; deciding whether a
//! missing or displaced entry is an error is left to the record handlers.

use std::collections::HashMap;
use trustlog_types::TaskDetails;

/// One pending-task slot per application module
#[derive(Debug, Clone, Default)]
pub struct PendingTasks {
    slots: HashMap<String, TaskDetails>,
}

impl PendingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the slot for `module`, returning the details it displaced
    pub fn insert(&mut self, module: &str, details: TaskDetails) -> Option<TaskDetails> {
        self.slots.insert(module.to_string(), details)
    }

    /// Empty the slot for `module`
    pub fn take(&mut self, module: &str) -> Option<TaskDetails> {
        self.slots.remove(module)
    }

    pub fn pending(&self, module: &str) -> Option<&TaskDetails> {
        self.slots.get(module)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// In-flight reputation requests keyed by CoAP message id
#[derive(Debug, Clone, Default)]
pub struct ReceiveCorrelation {
    in_flight: HashMap<u32, String>,
}

impl ReceiveCorrelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track `mid` as received from `address`, returning a displaced address
    pub fn track(&mut self, mid: u32, address: &str) -> Option<String> {
        self.in_flight.insert(mid, address.to_string())
    }

    pub fn tracked(&self, mid: u32) -> Option<&str> {
        self.in_flight.get(&mid).map(String::as_str)
    }

    /// Release `mid`; a mid can only be resolved once
    pub fn resolve(&mut self, mid: u32) -> Option<String> {
        self.in_flight.remove(&mid)
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }
}
