//! Aggregate counters. Counts only ever increase.

use serde::Serialize;
use std::collections::BTreeMap;
use trustlog_types::{KeystoreAdmissionOutcome, ReputationSendOutcome, Timestamp};

/// Occurrences per outcome kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutcomeCounts<K: Ord>(BTreeMap<K, u64>);

impl<K: Ord> Default for OutcomeCounts<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord + Copy> OutcomeCounts<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, outcome: K) {
        *self.0.entry(outcome).or_insert(0) += 1;
    }

    pub fn get(&self, outcome: K) -> u64 {
        self.0.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, u64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Outcome counts per entity (peer address or device identity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyedCounts<K: Ord>(BTreeMap<String, OutcomeCounts<K>>);

impl<K: Ord> Default for KeyedCounts<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord + Copy> KeyedCounts<K> {
    pub fn increment(&mut self, entity: &str, outcome: K) {
        self.0.entry(entity.to_string()).or_default().increment(outcome);
    }

    pub fn get(&self, entity: &str, outcome: K) -> u64 {
        self.0.get(entity).map_or(0, |c| c.get(outcome))
    }

    pub fn entity(&self, entity: &str) -> Option<&OutcomeCounts<K>> {
        self.0.get(entity)
    }

    pub fn total(&self) -> u64 {
        self.0.values().map(OutcomeCounts::total).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutcomeCounts<K>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Periodic broadcast counters; disabling is one-way
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "counts", rename_all = "snake_case")]
pub enum ReputationSendCounters {
    Active(OutcomeCounts<ReputationSendOutcome>),
    Disabled,
}

impl Default for ReputationSendCounters {
    fn default() -> Self {
        ReputationSendCounters::Active(OutcomeCounts::new())
    }
}

impl ReputationSendCounters {
    /// Count one attempt; returns false once broadcasting is disabled
    pub fn record(&mut self, outcome: ReputationSendOutcome) -> bool {
        match self {
            ReputationSendCounters::Active(counts) => {
                counts.increment(outcome);
                true
            }
            ReputationSendCounters::Disabled => false,
        }
    }

    pub fn disable(&mut self) {
        *self = ReputationSendCounters::Disabled;
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, ReputationSendCounters::Disabled)
    }

    pub fn get(&self, outcome: ReputationSendOutcome) -> Option<u64> {
        match self {
            ReputationSendCounters::Active(counts) => Some(counts.get(outcome)),
            ReputationSendCounters::Disabled => None,
        }
    }
}

/// Certificate admission counts plus the first time each (device, outcome) occurred
#[derive(Debug, Clone, Default)]
pub struct KeystoreCounters {
    counts: KeyedCounts<KeystoreAdmissionOutcome>,
    first_seen: BTreeMap<(String, KeystoreAdmissionOutcome), Timestamp>,
}

impl KeystoreCounters {
    /// Count one admission; returns true when the pair was seen for the first time
    pub fn record(&mut self, device: &str, outcome: KeystoreAdmissionOutcome, time: Timestamp) -> bool {
        self.counts.increment(device, outcome);

        let key = (device.to_string(), outcome);
        if self.first_seen.contains_key(&key) {
            return false;
        }
        self.first_seen.insert(key, time);
        true
    }

    pub fn counts(&self) -> &KeyedCounts<KeystoreAdmissionOutcome> {
        &self.counts
    }

    pub fn first_seen(&self, device: &str, outcome: KeystoreAdmissionOutcome) -> Option<Timestamp> {
        self.first_seen.get(&(device.to_string(), outcome)).copied()
    }

    pub fn first_seen_iter(
        &self,
    ) -> impl Iterator<Item = (&str, KeystoreAdmissionOutcome, Timestamp)> {
        self.first_seen
            .iter()
            .map(|((device, outcome), time)| (device.as_str(), *outcome, *time))
    }
}
