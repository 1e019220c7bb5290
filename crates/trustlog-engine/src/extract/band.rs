use trustlog_types::{BandPosition, Timestamp, TrustValue};

use super::{ExtractResult, Fields};
use crate::patterns;

pub fn trust_value(time: Timestamp, text: &str) -> ExtractResult<TrustValue> {
    let f = Fields::matched(&patterns::BANDED_TRUST_VALUE, text, "banded trust value")?;

    Ok(TrustValue {
        peer: f.text(1).to_string(),
        capability: f.text(2).to_string(),
        time,
        value: f.parse(3, "trust value")?,
        band: BandPosition {
            index: f.parse(4, "band index")?,
            count: f.parse(5, "band count")?,
        },
    })
}
