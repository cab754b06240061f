//! Serde helpers for `f64` fields that may hold non-finite values.
//!
//! JSON has no literal for infinity or NaN and `serde_json` writes them as
//! `null`, which then fails to parse back into `f64`. These helpers write
//! finite values as plain numbers and non-finite ones as the strings
//! `"Infinity"`, `"-Infinity"` and `"NaN"`. Both forms are accepted on read.

use serde::{Deserialize, Deserializer, Serializer};
use std::collections::BTreeMap;

const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";
const NAN: &str = "NaN";

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

impl Repr {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Repr::Number(v) => Ok(v),
            Repr::Text(s) => match s.as_str() {
                INFINITY => Ok(f64::INFINITY),
                NEG_INFINITY => Ok(f64::NEG_INFINITY),
                NAN => Ok(f64::NAN),
                other => Err(E::custom(format!("invalid float literal: {:?}", other))),
            },
        }
    }
}

fn serialize_value<S: Serializer>(value: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_nan() {
        serializer.serialize_str(NAN)
    } else if value == f64::INFINITY {
        serializer.serialize_str(INFINITY)
    } else if value == f64::NEG_INFINITY {
        serializer.serialize_str(NEG_INFINITY)
    } else {
        serializer.serialize_f64(value)
    }
}

/// `#[serde(with = "crate::float::value")]` for a single `f64`.
pub mod value {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_value(*value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Repr::deserialize(deserializer)?.into_f64()
    }
}

struct Entry(f64);

impl serde::Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_value(self.0, serializer)
    }
}

/// `#[serde(with = "crate::float::map")]` for a `BTreeMap<String, f64>`.
pub mod map {
    use super::*;
    use serde::ser::SerializeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<String, f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (label, value) in map {
            out.serialize_entry(label, &Entry(*value))?;
        }
        out.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, f64>, D::Error> {
        BTreeMap::<String, Repr>::deserialize(deserializer)?
            .into_iter()
            .map(|(label, repr)| repr.into_f64::<D::Error>().map(|v| (label, v)))
            .collect()
    }
}
