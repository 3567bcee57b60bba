//! Persisted JSON configuration.
//!
//! Defaults are an M51-like pointing for both the camera and the
//! multi-shutter assembly, all plot toggles off, and a three-year timeline
//! search at ten samples per day. Coordinates are kept as strings so both
//! decimal-degree and sexagesimal forms survive a round-trip; they are
//! parsed when a command runs.

use crate::error::{Error, Result};
use crate::output;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Header-card text file describing the display image's WCS.
    pub wcs_header: PathBuf,
    /// Optional RA/Dec source catalog for the overlay regions.
    pub source_catalog: Option<PathBuf>,
    /// Sun ephemeris table for timeline scans.
    pub ephemeris: Option<PathBuf>,
    pub out_dir: PathBuf,

    pub plot_long: bool,
    pub plot_short: bool,
    pub plot_msa: bool,
    pub plot_sources: bool,

    pub color_long: String,
    pub color_short: String,
    pub color_msa: String,

    /// Camera pointing, shared by the long- and short-wavelength channels.
    pub ra_camera: String,
    pub dec_camera: String,
    pub theta_camera: f64,

    /// Multi-shutter assembly pointing.
    pub ra_msa: String,
    pub dec_msa: String,
    pub theta_msa: f64,

    /// Dither pattern name; validated when a command runs.
    pub dither: String,
    pub mosaic: bool,
    /// Mosaic secondary-pointing offset, arcsec.
    pub mosaic_v2: f64,
    pub mosaic_v3: f64,

    pub search_start_mjd: f64,
    pub span_days: f64,
    pub samples_per_day: u32,
    /// Judge observability at this fixed position angle instead of the free
    /// roll window.
    pub fixed_pa: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wcs_header: PathBuf::from("image-wcs.txt"),
            source_catalog: None,
            ephemeris: None,
            out_dir: PathBuf::from("."),
            plot_long: false,
            plot_short: false,
            plot_msa: false,
            plot_sources: false,
            color_long: "blue".to_string(),
            color_short: "green".to_string(),
            color_msa: "red".to_string(),
            ra_camera: "202.46959".to_string(),
            dec_camera: "47.195187".to_string(),
            theta_camera: 0.0,
            ra_msa: "202.46959".to_string(),
            dec_msa: "47.195187".to_string(),
            theta_msa: 0.0,
            dither: "NONE".to_string(),
            mosaic: false,
            mosaic_v2: 10.0,
            mosaic_v3: 0.0,
            search_start_mjd: 58392.0,
            span_days: 3.0 * 365.0,
            samples_per_day: 10,
            fixed_pa: None,
        }
    }
}

impl Config {
    /// `~/.aperture-planner/config.json`.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join(".aperture-planner")
            .join("config.json")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Loads the file if it exists, otherwise starts from the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        output::write_atomic(path, &text)?;
        Ok(())
    }

    pub fn ephemeris_path(&self) -> Result<&Path> {
        self.ephemeris
            .as_deref()
            .ok_or_else(|| Error::config("no ephemeris table configured (set `ephemeris`)"))
    }
}
