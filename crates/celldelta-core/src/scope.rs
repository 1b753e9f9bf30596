//! Ingest scope
//!
//! Optional filter applied to valid records before deduplication. Records
//! outside the scope are counted as filtered, not rejected.

use serde::{Deserialize, Serialize};

use crate::errors::{CellDeltaError, Result};
use crate::model::Record;
use crate::model::record::COORD_SCALE;

/// Mobile country code of Germany, used by the operator presets
pub const MCC_GERMANY: u16 = 262;

/// Inclusive latitude/longitude box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// # Errors
    ///
    /// Returns `InvalidConfig` when a minimum exceeds its maximum or a bound
    /// lies outside the valid coordinate range.
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Result<Self> {
        let lat_ok = (-90.0..=90.0).contains(&lat_min) && (-90.0..=90.0).contains(&lat_max);
        let lon_ok = (-180.0..=180.0).contains(&lon_min) && (-180.0..=180.0).contains(&lon_max);
        if !lat_ok || !lon_ok || lat_min > lat_max || lon_min > lon_max {
            return Err(CellDeltaError::InvalidConfig {
                reason: format!(
                    "invalid bounding box lat [{}, {}] lon [{}, {}]",
                    lat_min, lat_max, lon_min, lon_max
                ),
            });
        }
        Ok(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }

    pub fn contains(&self, record: &Record) -> bool {
        let lat = f64::from(record.lat_e7) / COORD_SCALE;
        let lon = f64::from(record.lon_e7) / COORD_SCALE;
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lon_min..=self.lon_max).contains(&lon)
    }

    /// Named city region
    pub fn preset(name: &str) -> Option<Self> {
        let (lat_min, lat_max, lon_min, lon_max) = match name.trim().to_ascii_lowercase().as_str()
        {
            "muenchen" | "munich" => (48.061, 48.248, 11.360, 11.722),
            "berlin" => (52.338, 52.675, 13.088, 13.761),
            "hamburg" => (53.395, 53.703, 9.732, 10.271),
            _ => return None,
        };
        Some(Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        })
    }
}

/// Network codes of a named German operator
pub fn operator_mncs(name: &str) -> Option<Vec<u16>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "telekom" => Some(vec![1, 6]),
        "vodafone" => Some(vec![2, 4, 9]),
        "telefonica" | "o2" => Some(vec![3, 5, 7, 8, 11, 77]),
        _ => None,
    }
}

/// IngestScope - which valid records a run keeps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestScope {
    pub bounds: Option<BoundingBox>,
    pub mcc: Option<u16>,
    /// Allowed network codes; empty means any
    pub mncs: Vec<u16>,
}

impl IngestScope {
    /// Scope that keeps every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn with_mcc(mut self, mcc: u16) -> Self {
        self.mcc = Some(mcc);
        self
    }

    pub fn with_mncs(mut self, mncs: Vec<u16>) -> Self {
        self.mncs = mncs;
        self
    }

    /// Build a scope from preset names
    ///
    /// An operator preset implies MCC 262.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for an unknown region or operator name.
    pub fn from_presets(region: Option<&str>, operator: Option<&str>) -> Result<Self> {
        let mut scope = Self::all();
        if let Some(region) = region {
            let bounds = BoundingBox::preset(region).ok_or_else(|| CellDeltaError::InvalidConfig {
                reason: format!("unknown region '{}'", region),
            })?;
            scope = scope.with_bounds(bounds);
        }
        if let Some(operator) = operator {
            let mncs = operator_mncs(operator).ok_or_else(|| CellDeltaError::InvalidConfig {
                reason: format!("unknown operator '{}'", operator),
            })?;
            scope = scope.with_mcc(MCC_GERMANY).with_mncs(mncs);
        }
        Ok(scope)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.bounds.is_none() && self.mcc.is_none() && self.mncs.is_empty()
    }

    /// Whether a record falls inside the scope
    ///
    /// A record with an absent MCC or MNC fails any restriction on it.
    pub fn admits(&self, record: &Record) -> bool {
        if let Some(bounds) = &self.bounds {
            if !bounds.contains(record) {
                return false;
            }
        }
        if let Some(mcc) = self.mcc {
            if record.mcc != Some(mcc) {
                return false;
            }
        }
        if !self.mncs.is_empty() {
            match record.mnc {
                Some(mnc) if self.mncs.contains(&mnc) => {}
                _ => return false,
            }
        }
        true
    }

    /// Split records into (kept, filtered count), preserving order
    pub fn apply(&self, records: Vec<Record>) -> (Vec<Record>, usize) {
        if self.is_unrestricted() {
            return (records, 0);
        }
        let before = records.len();
        let kept: Vec<Record> = records.into_iter().filter(|r| self.admits(r)).collect();
        let filtered = before - kept.len();
        (kept, filtered)
    }
}
