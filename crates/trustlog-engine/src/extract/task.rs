use std::net::IpAddr;
use trustlog_types::{Coordinate, TaskDetails};

use super::{ExtractResult, Fields};
use crate::patterns;

pub fn routing_generated(text: &str) -> ExtractResult<TaskDetails> {
    let f = Fields::matched(&patterns::ROUTING_GENERATED, text, "routing generated")?;

    Ok(TaskDetails::Routing {
        length: f.parse(1, "length")?,
        source: Coordinate::new(f.parse(2, "latitude")?, f.parse(3, "longitude")?),
        destination: Coordinate::new(f.parse(4, "latitude")?, f.parse(5, "longitude")?),
    })
}

pub fn monitoring_generated(text: &str) -> ExtractResult<TaskDetails> {
    let f = Fields::matched(&patterns::MONITORING_GENERATED, text, "monitoring generated")?;

    Ok(TaskDetails::Monitoring {
        length: f.parse(1, "length")?,
    })
}

/// Destination of a "Message sent to coap://[addr]:port" line
pub fn task_target(text: &str) -> ExtractResult<IpAddr> {
    let f = Fields::matched(&patterns::TASK_SENT, text, "message sent")?;
    f.parse(1, "target address")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_generated() {
        let details =
            routing_generated("Generated message (len=64) for path from (51.5,-0.12) to (-33.8,151.2)")
                .unwrap();

        assert_eq!(
            details,
            TaskDetails::Routing {
                length: 64,
                source: Coordinate::new(51.5, -0.12),
                destination: Coordinate::new(-33.8, 151.2),
            }
        );
    }

    #[test]
    fn test_routing_requires_path() {
        assert!(routing_generated("Generated message (len=64)").is_err());
    }

    #[test]
    fn test_monitoring_generated() {
        assert_eq!(
            monitoring_generated("Generated message (len=10)").unwrap(),
            TaskDetails::Monitoring { length: 10 }
        );
    }

    #[test]
    fn test_task_target() {
        assert_eq!(
            task_target("Message sent to coap://[fd00::1]:5683").unwrap(),
            "fd00::1".parse::<IpAddr>().unwrap()
        );

        let err = task_target("Message sent to coap://[fd00::zz]:5683").unwrap_err();
        assert_eq!(err.0, "invalid target address: 'fd00::zz'");
    }
}
