//! Identity keys
//!
//! A tower is identified by its carrier hierarchy `(mcc, mnc, lac, tower_id)`
//! when all four parts are known. Otherwise it falls back to its position on
//! a 1e-4 degree grid (about 11 m) together with its radio type.
//!
//! The derived ordering puts every carrier key before every quantized key,
//! then orders by the fields in declaration order. Snapshots, dedupe output
//! and diff buckets all use this order.

use serde::{Serialize, Serializer};

use super::record::{RadioType, Record};

/// Size of one quantization cell in 1e-7 degree units (1e-4 degree)
pub const QUANT_STEP_E7: i32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdentityKey {
    Carrier {
        mcc: u16,
        mnc: u16,
        lac: u32,
        tower_id: String,
    },
    Quantized {
        lat_q: i32,
        lon_q: i32,
        radio: RadioType,
    },
}

impl IdentityKey {
    /// Derive the key for a record
    pub fn for_record(record: &Record) -> Self {
        match (record.mcc, record.mnc, record.lac, record.tower_id.as_ref()) {
            (Some(mcc), Some(mnc), Some(lac), Some(tower_id)) => IdentityKey::Carrier {
                mcc,
                mnc,
                lac,
                tower_id: tower_id.clone(),
            },
            _ => IdentityKey::Quantized {
                lat_q: quantize(record.lat_e7),
                lon_q: quantize(record.lon_e7),
                radio: record.radio,
            },
        }
    }

    pub fn is_carrier(&self) -> bool {
        matches!(self, IdentityKey::Carrier { .. })
    }
}

/// Snap a 1e-7 degree coordinate onto the 1e-4 grid, half away from zero
pub fn quantize(value_e7: i32) -> i32 {
    let whole = value_e7 / QUANT_STEP_E7;
    let rem = value_e7 % QUANT_STEP_E7;
    if rem >= QUANT_STEP_E7 / 2 {
        whole + 1
    } else if rem <= -QUANT_STEP_E7 / 2 {
        whole - 1
    } else {
        whole
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityKey::Carrier {
                mcc,
                mnc,
                lac,
                tower_id,
            } => write!(f, "cell:{}:{}:{}:{}", mcc, mnc, lac, tower_id),
            IdentityKey::Quantized {
                lat_q,
                lon_q,
                radio,
            } => write!(f, "geo:{}:{}:{}", lat_q, lon_q, radio),
        }
    }
}

impl Serialize for IdentityKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
