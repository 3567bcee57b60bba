//! Instrument reference data: aperture corner tables and boresight offsets.
//!
//! The corner tables are immutable calibration data in the
//! 5-rows-per-aperture convention (4 corners plus the repeated first
//! corner). Default tables for the three instruments are embedded in the
//! crate; external files in the same format can be loaded in their place.

use crate::error::{FootprintError, FootprintResult};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Fixed boresight-to-V3 angle offsets, added to the requested position
/// angle before attitude composition. Calibration values; keep them named
/// so updates stay auditable.
pub const LONG_WAVE_PA_OFFSET_DEG: f64 = 0.0265;
pub const SHORT_WAVE_PA_OFFSET_DEG: f64 = 0.0265;
pub const MULTI_SHUTTER_PA_OFFSET_DEG: f64 = -137.4874;

const LONG_WAVE_TABLE: &str = include_str!("../data/table-long-wave.txt");
const SHORT_WAVE_TABLE: &str = include_str!("../data/table-short-wave.txt");
const MULTI_SHUTTER_TABLE: &str = include_str!("../data/table-multi-shutter.txt");

/// Diagonal corner-row pairs whose midpoints define the rotation center.
const LONG_WAVE_CENTER_PAIRS: &[(usize, usize)] = &[(0, 2), (5, 7)];
const SHORT_WAVE_CENTER_PAIRS: &[(usize, usize)] = &[(0, 2), (5, 7), (20, 22), (25, 27)];
const MULTI_SHUTTER_CENTER_PAIRS: &[(usize, usize)] = &[(0, 2), (5, 7), (10, 12), (15, 17)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    LongWavelength,
    ShortWavelength,
    MultiShutter,
}

impl Instrument {
    pub fn label(&self) -> &'static str {
        match self {
            Instrument::LongWavelength => "long",
            Instrument::ShortWavelength => "short",
            Instrument::MultiShutter => "msa",
        }
    }

    /// Additive position-angle offset for this instrument's boresight.
    pub fn pa_offset_deg(&self) -> f64 {
        match self {
            Instrument::LongWavelength => LONG_WAVE_PA_OFFSET_DEG,
            Instrument::ShortWavelength => SHORT_WAVE_PA_OFFSET_DEG,
            Instrument::MultiShutter => MULTI_SHUTTER_PA_OFFSET_DEG,
        }
    }

    pub fn center_pairs(&self) -> &'static [(usize, usize)] {
        match self {
            Instrument::LongWavelength => LONG_WAVE_CENTER_PAIRS,
            Instrument::ShortWavelength => SHORT_WAVE_CENTER_PAIRS,
            Instrument::MultiShutter => MULTI_SHUTTER_CENTER_PAIRS,
        }
    }

    fn builtin_text(&self) -> (&'static str, &'static str) {
        match self {
            Instrument::LongWavelength => ("table-long-wave", LONG_WAVE_TABLE),
            Instrument::ShortWavelength => ("table-short-wave", SHORT_WAVE_TABLE),
            Instrument::MultiShutter => ("table-multi-shutter", MULTI_SHUTTER_TABLE),
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Instrument {
    type Err = FootprintError;

    fn from_str(s: &str) -> FootprintResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "long" => Ok(Instrument::LongWavelength),
            "short" => Ok(Instrument::ShortWavelength),
            "msa" => Ok(Instrument::MultiShutter),
            other => Err(FootprintError::UnknownInstrument(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApertureRow {
    pub v2: f64,
    pub v3: f64,
    pub name: String,
    pub v2_ref: f64,
    pub v3_ref: f64,
}

/// An ordered aperture corner table.
///
/// Invariant after construction: row count is a non-zero multiple of 5.
#[derive(Debug, Clone)]
pub struct ApertureTable {
    name: String,
    rows: Vec<ApertureRow>,
}

impl ApertureTable {
    /// Parses the whitespace-delimited table format
    /// (`v2 v3 aperture v2_ref v3_ref`); `#` lines are comments.
    pub fn parse(name: &str, text: &str) -> FootprintResult<Self> {
        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 5 {
                return Err(FootprintError::MalformedRow {
                    name: name.to_string(),
                    line: line_no + 1,
                    message: format!("expected 5 columns, found {}", cols.len()),
                });
            }
            let field = |idx: usize| -> FootprintResult<f64> {
                cols[idx].parse().map_err(|_| FootprintError::MalformedRow {
                    name: name.to_string(),
                    line: line_no + 1,
                    message: format!("'{}' is not a number", cols[idx]),
                })
            };
            rows.push(ApertureRow {
                v2: field(0)?,
                v3: field(1)?,
                name: cols[2].to_string(),
                v2_ref: field(3)?,
                v3_ref: field(4)?,
            });
        }
        if rows.is_empty() || rows.len() % 5 != 0 {
            return Err(FootprintError::CorruptApertureTable {
                name: name.to_string(),
                rows: rows.len(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            rows,
        })
    }

    pub fn load(path: &Path) -> FootprintResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&path.display().to_string(), &text)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[ApertureRow] {
        &self.rows
    }

    pub fn aperture_count(&self) -> usize {
        self.rows.len() / 5
    }

    /// The (v2, v3) corner sequence, in table order.
    pub fn corners(&self) -> Vec<(f64, f64)> {
        self.rows.iter().map(|r| (r.v2, r.v3)).collect()
    }

    /// Rotation center as the mean of the diagonal corner-pair midpoints.
    pub fn rotation_center(&self, pairs: &[(usize, usize)]) -> FootprintResult<(f64, f64)> {
        let max_index = pairs.iter().flat_map(|&(a, b)| [a, b]).max().unwrap_or(0);
        if max_index >= self.rows.len() {
            return Err(FootprintError::MissingCenterCorners {
                name: self.name.clone(),
            });
        }
        let mut v2 = 0.0;
        let mut v3 = 0.0;
        for &(a, b) in pairs {
            v2 += (self.rows[a].v2 + self.rows[b].v2) / 2.0;
            v3 += (self.rows[a].v3 + self.rows[b].v3) / 2.0;
        }
        let n = pairs.len() as f64;
        Ok((v2 / n, v3 / n))
    }
}

/// The loaded aperture tables for all instruments.
///
/// [`ApertureCatalog::builtin`] uses the embedded calibration tables;
/// individual tables can be replaced from external files.
#[derive(Debug, Clone)]
pub struct ApertureCatalog {
    long: ApertureTable,
    short: ApertureTable,
    msa: ApertureTable,
}

impl ApertureCatalog {
    pub fn builtin() -> Self {
        // The embedded tables are compile-time data; a parse failure here is
        // a build defect, not a runtime condition.
        let parse = |instrument: Instrument| {
            let (name, text) = instrument.builtin_text();
            ApertureTable::parse(name, text)
                .unwrap_or_else(|e| panic!("embedded table {name} invalid: {e}"))
        };
        Self {
            long: parse(Instrument::LongWavelength),
            short: parse(Instrument::ShortWavelength),
            msa: parse(Instrument::MultiShutter),
        }
    }

    pub fn table(&self, instrument: Instrument) -> &ApertureTable {
        match instrument {
            Instrument::LongWavelength => &self.long,
            Instrument::ShortWavelength => &self.short,
            Instrument::MultiShutter => &self.msa,
        }
    }

    pub fn replace(&mut self, instrument: Instrument, table: ApertureTable) {
        match instrument {
            Instrument::LongWavelength => self.long = table,
            Instrument::ShortWavelength => self.short = table,
            Instrument::MultiShutter => self.msa = table,
        }
    }
}

impl Default for ApertureCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_have_expected_shape() {
        let catalog = ApertureCatalog::builtin();
        assert_eq!(catalog.table(Instrument::LongWavelength).aperture_count(), 2);
        assert_eq!(catalog.table(Instrument::ShortWavelength).aperture_count(), 8);
        assert_eq!(catalog.table(Instrument::MultiShutter).aperture_count(), 5);
    }

    #[test]
    fn long_wave_rotation_center_is_symmetric() {
        let catalog = ApertureCatalog::builtin();
        let table = catalog.table(Instrument::LongWavelength);
        let (v2, v3) = table
            .rotation_center(Instrument::LongWavelength.center_pairs())
            .unwrap();
        assert!(v2.abs() < 1e-9, "v2 center {}", v2);
        assert!((v3 + 493.4).abs() < 1e-9, "v3 center {}", v3);
    }

    #[test]
    fn short_wave_center_matches_long_wave_center() {
        let catalog = ApertureCatalog::builtin();
        let long = catalog
            .table(Instrument::LongWavelength)
            .rotation_center(Instrument::LongWavelength.center_pairs())
            .unwrap();
        let short = catalog
            .table(Instrument::ShortWavelength)
            .rotation_center(Instrument::ShortWavelength.center_pairs())
            .unwrap();
        assert!((long.0 - short.0).abs() < 1e-9);
        assert!((long.1 - short.1).abs() < 1e-9);
    }

    #[test]
    fn row_count_must_be_multiple_of_five() {
        let text = "\
0 0 A 0 0
1 0 A 0 0
1 1 A 0 0
0 1 A 0 0";
        let err = ApertureTable::parse("partial", text).unwrap_err();
        assert!(matches!(
            err,
            FootprintError::CorruptApertureTable { rows: 4, .. }
        ));
    }

    #[test]
    fn malformed_numeric_column_rejected() {
        let text = "0 zero A 0 0\n";
        let err = ApertureTable::parse("bad", text).unwrap_err();
        assert!(matches!(err, FootprintError::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn center_pairs_out_of_range_rejected() {
        let text = "\
0 0 A 0 0
1 0 A 0 0
1 1 A 0 0
0 1 A 0 0
0 0 A 0 0";
        let table = ApertureTable::parse("tiny", text).unwrap();
        let err = table
            .rotation_center(Instrument::ShortWavelength.center_pairs())
            .unwrap_err();
        assert!(matches!(err, FootprintError::MissingCenterCorners { .. }));
    }

    #[test]
    fn instrument_labels_parse_back() {
        for instrument in [
            Instrument::LongWavelength,
            Instrument::ShortWavelength,
            Instrument::MultiShutter,
        ] {
            let parsed: Instrument = instrument.label().parse().unwrap();
            assert_eq!(parsed, instrument);
        }
        assert!("imager".parse::<Instrument>().is_err());
    }
}
