//! Serde adapters for values JSON cannot carry natively.
//!
//! JSON has no infinity, and `serde_json` writes it as `null`. A hit time of
//! `f64::INFINITY` ("never") is written as the string `"never"` instead, so
//! solutions and snapshots survive a round trip. Use with `#[serde(with = ...)]`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum WireTime {
    Seconds(f64),
    Never(NeverTag),
}

#[derive(Serialize, Deserialize)]
enum NeverTag {
    #[serde(rename = "never")]
    Never,
}

impl From<f64> for WireTime {
    fn from(seconds: f64) -> Self {
        if seconds == f64::INFINITY {
            WireTime::Never(NeverTag::Never)
        } else {
            WireTime::Seconds(seconds)
        }
    }
}

impl From<WireTime> for f64 {
    fn from(time: WireTime) -> Self {
        match time {
            WireTime::Seconds(seconds) => seconds,
            WireTime::Never(_) => f64::INFINITY,
        }
    }
}

/// `f64` seconds where `+inf` means "never".
pub mod seconds_or_never {
    use super::*;

    pub fn serialize<S: Serializer>(seconds: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        WireTime::from(*seconds).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        WireTime::deserialize(deserializer).map(f64::from)
    }
}

/// As `seconds_or_never`, for `Option<f64>`. `None` stays `null`.
pub mod seconds_or_never_option {
    use super::*;

    pub fn serialize<S: Serializer>(
        seconds: &Option<f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        seconds.map(WireTime::from).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<f64>, D::Error> {
        Option::<WireTime>::deserialize(deserializer).map(|time| time.map(f64::from))
    }
}
