//! Footprint projection: aperture corners -> sky polygons -> pixel polygons.
//!
//! The projection walks the selected dither pattern; for each shift it moves
//! the instrument's rotation center, builds a fresh attitude matrix, and maps
//! every corner of the (possibly mosaic-doubled) aperture set onto the sky.
//! Repetitions are concatenated in shift order and corner order is preserved
//! within each repetition -- downstream polygon winding depends on it.

use crate::dither::{DitherPattern, MosaicOffset};
use crate::error::{FootprintError, FootprintResult};
use crate::instrument::{ApertureCatalog, ApertureTable, Instrument};
use aperture_core::matrix::{attitude_matrix, pointing, InPlaneTransform};
use aperture_wcs::ImageWcs;

/// One footprint projection request.
///
/// Coordinates in degrees; the position angle is the requested aperture PA,
/// before the instrument's fixed boresight offset is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootprintRequest {
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub pa_deg: f64,
    pub dither: DitherPattern,
    pub mosaic: Option<MosaicOffset>,
}

impl FootprintRequest {
    pub fn new(ra_deg: f64, dec_deg: f64) -> Self {
        Self {
            ra_deg,
            dec_deg,
            pa_deg: 0.0,
            dither: DitherPattern::None,
            mosaic: None,
        }
    }
}

/// Projected aperture corners on the sky, shift-major order.
#[derive(Debug, Clone)]
pub struct SkyFootprint {
    corners: Vec<(f64, f64)>,
    aperture_count: usize,
}

impl SkyFootprint {
    /// Flat `(ra_deg, dec_deg)` corner list; every 5 consecutive entries are
    /// one closed rectangular aperture.
    pub fn corners(&self) -> &[(f64, f64)] {
        &self.corners
    }

    pub fn aperture_count(&self) -> usize {
        self.aperture_count
    }

    /// Converts the footprint to pixel polygons through the supplied WCS.
    pub fn to_pixels(&self, wcs: &ImageWcs) -> FootprintResult<PixelFootprint> {
        let mut polygons = Vec::with_capacity(self.aperture_count);
        for aperture in self.corners.chunks_exact(5) {
            let mut polygon = [(0.0, 0.0); 5];
            for (slot, &(ra, dec)) in polygon.iter_mut().zip(aperture) {
                let pixel = wcs.world_to_pixel(ra, dec)?;
                *slot = (pixel.x(), pixel.y());
            }
            polygons.push(polygon);
        }
        Ok(PixelFootprint { polygons })
    }
}

/// Closed 5-point pixel polygons, one per aperture repetition.
#[derive(Debug, Clone)]
pub struct PixelFootprint {
    polygons: Vec<[(f64, f64); 5]>,
}

impl PixelFootprint {
    pub fn polygons(&self) -> &[[(f64, f64); 5]] {
        &self.polygons
    }
}

/// Projects an instrument footprint for a pointing request.
pub fn project(
    catalog: &ApertureCatalog,
    instrument: Instrument,
    request: &FootprintRequest,
) -> FootprintResult<SkyFootprint> {
    let table = catalog.table(instrument);
    let mut corners = table.corners();

    let mut center = if request.dither == DitherPattern::Full6 {
        // The six-point pattern rotates about a center derived from the
        // long-wavelength table with the end-of-pattern pre-shifts, whatever
        // instrument is being projected.
        full6_rotation_center(catalog.table(Instrument::LongWavelength))?
    } else {
        table.rotation_center(instrument.center_pairs())?
    };

    if let Some(offset) = request.mosaic {
        if !request.dither.supports_mosaic() {
            return Err(FootprintError::MosaicUnsupported(request.dither.name()));
        }
        let tiled: Vec<(f64, f64)> = corners
            .iter()
            .map(|&(v2, v3)| (v2 + offset.dv2, v3 + offset.dv3))
            .collect();
        corners.extend(tiled);
        center.0 += offset.dv2 / 2.0;
        center.1 += offset.dv3 / 2.0;
    }

    let pa = request.pa_deg + instrument.pa_offset_deg();
    let shifts = request.dither.shifts();

    let mut projected = Vec::with_capacity(corners.len() * shifts.len());
    for &(dv2, dv3) in shifts {
        let attitude = attitude_matrix(
            center.0 - dv2,
            center.1 + dv3,
            request.ra_deg,
            request.dec_deg,
            pa,
        );
        for &(v2, v3) in &corners {
            projected.push(pointing(&attitude, v2, v3)?);
        }
    }

    Ok(SkyFootprint {
        aperture_count: corners.len() / 5 * shifts.len(),
        corners: projected,
    })
}

fn full6_rotation_center(long: &ApertureTable) -> FootprintResult<(f64, f64)> {
    let rows = long.rows();
    if rows.len() < 8 {
        return Err(FootprintError::MissingCenterCorners {
            name: long.name().to_string(),
        });
    }
    let last = DitherPattern::Full6.shifts()[5];
    let first = DitherPattern::Full6.shifts()[0];
    let xa = (rows[0].v2 + rows[2].v2) / 2.0 + last.0;
    let ya = (rows[0].v3 + rows[2].v3) / 2.0 + last.1;
    let xb = (rows[5].v2 + rows[7].v2) / 2.0 + first.0;
    let yb = (rows[5].v3 + rows[7].v3) / 2.0 + first.1;
    Ok(((xa + xb) / 2.0, (ya + yb) / 2.0))
}

/// Rotates an aperture corner array in the focal plane about its rotation
/// center, without any pointing. Used for corner-array previews.
pub fn rotate_in_plane(
    table: &ApertureTable,
    center_pairs: &[(usize, usize)],
    theta_deg: f64,
) -> FootprintResult<Vec<(f64, f64)>> {
    let (xr, yr) = table.rotation_center(center_pairs)?;
    let transform = InPlaneTransform::rotation_about(theta_deg, xr, yr);
    Ok(table
        .corners()
        .iter()
        .map(|&(v2, v3)| transform.apply(v2, v3))
        .collect())
}
