use crate::coordinate::{PixelCoord, SkyCoord};
use crate::error::{WcsError, WcsResult};
use crate::linear::LinearTransform;
use crate::projection::TanProjection;
use std::collections::HashMap;
use std::path::Path;

/// A flat `KEY = VALUE` keyword map parsed from a header-card text file.
///
/// This is the FITS-header subset the pipeline needs: one card per line,
/// `/` starts an inline comment, `#`/`COMMENT`/`HISTORY`/`END` lines are
/// ignored. Keys are case-insensitive and stored upper-case.
#[derive(Debug, Clone, Default)]
pub struct KeywordMap {
    values: HashMap<String, String>,
}

impl KeywordMap {
    pub fn parse(text: &str) -> Self {
        let mut values = HashMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let upper = line.to_ascii_uppercase();
            if upper == "END" || upper.starts_with("COMMENT") || upper.starts_with("HISTORY") {
                continue;
            }
            let Some((key, rest)) = line.split_once('=') else {
                continue;
            };
            let value = rest.split('/').next().unwrap_or("").trim();
            if value.is_empty() {
                continue;
            }
            values.insert(key.trim().to_ascii_uppercase(), value.to_string());
        }
        Self { values }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&key.to_ascii_uppercase())
    }

    pub fn require_f64(&self, key: &str) -> WcsResult<f64> {
        let raw = self
            .values
            .get(&key.to_ascii_uppercase())
            .ok_or_else(|| WcsError::missing_keyword(key))?;
        raw.trim_matches('\'')
            .trim()
            .parse()
            .map_err(|_| WcsError::invalid_keyword(key, format!("'{}' is not a number", raw)))
    }

    pub fn f64_or(&self, key: &str, default: f64) -> WcsResult<f64> {
        if self.contains(key) {
            self.require_f64(key)
        } else {
            Ok(default)
        }
    }
}

/// TAN projection plus linear pixel transform for one image.
///
/// Passed by reference into every sky-to-pixel conversion; owning it is the
/// caller's business, there is no shared current-image state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageWcs {
    linear: LinearTransform,
    projection: TanProjection,
}

impl ImageWcs {
    pub fn new(linear: LinearTransform, projection: TanProjection) -> Self {
        Self { linear, projection }
    }

    /// Builds the WCS from parsed header keywords.
    ///
    /// Requires CRPIX1/2 and CRVAL1/2 plus either an explicit CD matrix
    /// (missing off-diagonal elements default to zero) or CDELT1/2 with an
    /// optional CROTA2 rotation.
    pub fn from_keywords(keywords: &KeywordMap) -> WcsResult<Self> {
        let crpix = [
            keywords.require_f64("CRPIX1")?,
            keywords.require_f64("CRPIX2")?,
        ];
        let crval = SkyCoord::new(
            keywords.require_f64("CRVAL1")?,
            keywords.require_f64("CRVAL2")?,
        );

        let has_cd = ["CD1_1", "CD1_2", "CD2_1", "CD2_2"]
            .iter()
            .any(|k| keywords.contains(k));
        let linear = if has_cd {
            let cd = [
                [
                    keywords.f64_or("CD1_1", 0.0)?,
                    keywords.f64_or("CD1_2", 0.0)?,
                ],
                [
                    keywords.f64_or("CD2_1", 0.0)?,
                    keywords.f64_or("CD2_2", 0.0)?,
                ],
            ];
            LinearTransform::from_cd(crpix, cd)?
        } else if keywords.contains("CDELT1") {
            let cdelt = [
                keywords.require_f64("CDELT1")?,
                keywords.require_f64("CDELT2")?,
            ];
            let crota = keywords.f64_or("CROTA2", 0.0)?;
            LinearTransform::from_cdelt_crota(crpix, cdelt, crota)?
        } else {
            return Err(WcsError::missing_keyword("CD1_1 or CDELT1"));
        };

        Ok(Self::new(linear, TanProjection::new(crval)))
    }

    pub fn from_card_file(path: &Path) -> WcsResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_keywords(&KeywordMap::parse(&text))
    }

    pub fn world_to_pixel(&self, ra_deg: f64, dec_deg: f64) -> WcsResult<PixelCoord> {
        let inter = self.projection.sky_to_intermediate(ra_deg, dec_deg)?;
        Ok(self.linear.intermediate_to_pixel(inter))
    }

    pub fn pixel_to_world(&self, pixel: PixelCoord) -> (f64, f64) {
        let inter = self.linear.pixel_to_intermediate(pixel);
        self.projection.intermediate_to_sky(inter)
    }

    #[inline]
    pub fn reference_pixel(&self) -> PixelCoord {
        let crpix = self.linear.crpix();
        PixelCoord::new(crpix[0], crpix[1])
    }
}
