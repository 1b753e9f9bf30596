use crate::errors::Result;

/// RawRow - one untyped input row in OpenCellID column layout
///
/// Every column is kept as the text it arrived as; `None` means the column
/// was missing from the line. Typing happens in the normalizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// Zero-based position of the row in the input
    pub index: usize,
    pub radio: Option<String>,
    pub mcc: Option<String>,
    pub net: Option<String>,
    pub area: Option<String>,
    pub cell: Option<String>,
    pub unit: Option<String>,
    pub lon: Option<String>,
    pub lat: Option<String>,
    pub range: Option<String>,
    pub samples: Option<String>,
    pub changeable: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    pub average_signal: Option<String>,
}

/// Column order of an OpenCellID export
pub const OPENCELLID_COLUMNS: [&str; 14] = [
    "radio",
    "mcc",
    "net",
    "area",
    "cell",
    "unit",
    "lon",
    "lat",
    "range",
    "samples",
    "changeable",
    "created",
    "updated",
    "averageSignal",
];

impl RawRow {
    /// Empty row at the given input position
    pub fn new(index: usize) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }

    /// Build a row from positional OpenCellID columns
    ///
    /// Missing trailing columns stay `None`; extra columns are ignored.
    pub fn from_fields(index: usize, fields: &[&str]) -> Self {
        let col = |i: usize| fields.get(i).map(|s| s.to_string());
        Self {
            index,
            radio: col(0),
            mcc: col(1),
            net: col(2),
            area: col(3),
            cell: col(4),
            unit: col(5),
            lon: col(6),
            lat: col(7),
            range: col(8),
            samples: col(9),
            changeable: col(10),
            created: col(11),
            updated: col(12),
            average_signal: col(13),
        }
    }

    /// True when no column carries any non-whitespace text
    pub fn is_blank(&self) -> bool {
        [
            &self.radio,
            &self.mcc,
            &self.net,
            &self.area,
            &self.cell,
            &self.unit,
            &self.lon,
            &self.lat,
            &self.range,
            &self.samples,
            &self.changeable,
            &self.created,
            &self.updated,
            &self.average_signal,
        ]
        .iter()
        .all(|v| v.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

/// Source of raw rows for one ingestion run
pub trait RawSource {
    /// Opaque provenance string recorded on the snapshot
    fn provenance(&self) -> String;

    /// Read every row of the source
    ///
    /// # Errors
    ///
    /// Returns `SourceUnreadable` when the source cannot be read at all.
    /// Individual bad rows are not errors here.
    fn read_rows(&self) -> Result<Vec<RawRow>>;
}

/// Rows held in memory, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    provenance: String,
    rows: Vec<RawRow>,
}

impl MemorySource {
    pub fn new(provenance: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            provenance: provenance.into(),
            rows,
        }
    }

    /// Build from positional column lists, numbering rows in order
    pub fn from_lines(provenance: impl Into<String>, lines: &[&[&str]]) -> Self {
        let rows = lines
            .iter()
            .enumerate()
            .map(|(i, fields)| RawRow::from_fields(i, fields))
            .collect();
        Self::new(provenance, rows)
    }
}

impl RawSource for MemorySource {
    fn provenance(&self) -> String {
        self.provenance.clone()
    }

    fn read_rows(&self) -> Result<Vec<RawRow>> {
        Ok(self.rows.clone())
    }
}
