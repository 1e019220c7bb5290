use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::record::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// What an application generated before handing it to a peer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskDetails {
    /// Environment monitoring reading
    Monitoring { length: u32 },

    /// Route request between two coordinates
    Routing {
        length: u32,
        source: Coordinate,
        destination: Coordinate,
    },
}

impl TaskDetails {
    pub fn length(&self) -> u32 {
        match self {
            TaskDetails::Monitoring { length } | TaskDetails::Routing { length, .. } => *length,
        }
    }

    pub fn capability(&self) -> &'static str {
        match self {
            TaskDetails::Monitoring { .. } => "monitoring",
            TaskDetails::Routing { .. } => "routing",
        }
    }
}

/// A generated task that was actually dispatched to `target`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub target: IpAddr,
    /// Time of the "sent" record
    pub time: Timestamp,
    pub details: TaskDetails,
}
