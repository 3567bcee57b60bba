//! Region-file artifacts for the image-display collaborator.
//!
//! One polygon record per rectangular aperture (5 pixel pairs, closed), a
//! single-point cross marking the pointing center, and circles for source
//! overlays.

use crate::error::{Error, Result};
use aperture_footprints::PixelFootprint;
use aperture_wcs::{ImageWcs, PixelCoord};

fn region_header(color: &str) -> String {
    format!(
        "global color={} width=1 font=\"helvetica 15 normal roman\"   select=0 highlite=1 \nimage\n",
        color
    )
}

/// Renders a footprint as a polygon region file.
pub fn polygon_region(footprint: &PixelFootprint, color: &str) -> String {
    let mut out = region_header(color);
    for polygon in footprint.polygons() {
        out.push_str("polygon ");
        for (x, y) in polygon {
            out.push_str(&format!("{:.3}  {:.3}  ", x, y));
        }
        out.push_str("# text={}\n");
    }
    out
}

/// Renders the pointing-center cross marker.
pub fn center_region(pixel: PixelCoord, color: &str) -> String {
    let mut out = region_header(color);
    out.push_str(&format!(
        "point({:10.3},{:10.3}) # point=cross 20  \n",
        pixel.x(),
        pixel.y()
    ));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Primary,
    Filler,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub kind: Option<SourceKind>,
}

/// Parses a source catalog: `ra dec` or `ra dec type` per line, type `P`
/// (primary) or `F` (filler), `#` comments skipped.
pub fn parse_source_catalog(text: &str) -> Result<Vec<Source>> {
    let mut sources = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let cols: Vec<&str> = line.split_whitespace().collect();
        if cols.len() < 2 {
            return Err(Error::SourceCatalog {
                line: line_no + 1,
                message: "expected at least RA and Dec columns".to_string(),
            });
        }
        let number = |idx: usize| -> Result<f64> {
            cols[idx].parse().map_err(|_| Error::SourceCatalog {
                line: line_no + 1,
                message: format!("'{}' is not a number", cols[idx]),
            })
        };
        let kind = if cols.len() >= 3 {
            Some(match cols[2] {
                "P" => SourceKind::Primary,
                "F" => SourceKind::Filler,
                other => {
                    return Err(Error::SourceCatalog {
                        line: line_no + 1,
                        message: format!("unknown source type '{}' (expected P or F)", other),
                    })
                }
            })
        } else {
            None
        };
        sources.push(Source {
            ra_deg: number(0)?,
            dec_deg: number(1)?,
            kind,
        });
    }
    Ok(sources)
}

/// Renders circle regions for a set of sources.
pub fn source_region(sources: &[Source], wcs: &ImageWcs, color: &str) -> Result<String> {
    let mut out = region_header(color);
    for source in sources {
        let pixel = wcs.world_to_pixel(source.ra_deg, source.dec_deg)?;
        out.push_str(&format!(
            "circle({:10.3},{:10.3},5) # text={{}}\n",
            pixel.x(),
            pixel.y()
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aperture_wcs::KeywordMap;

    fn wcs() -> ImageWcs {
        let cards = "\
CRPIX1 = 512.0
CRPIX2 = 512.0
CRVAL1 = 202.46959
CRVAL2 = 47.195187
CD1_1 = -1.388888888888e-5
CD2_2 = 1.388888888888e-5";
        ImageWcs::from_keywords(&KeywordMap::parse(cards)).unwrap()
    }

    #[test]
    fn center_region_contains_cross_marker() {
        let text = center_region(PixelCoord::new(512.0, 512.0), "blue");
        assert!(text.starts_with("global color=blue"));
        assert!(text.contains("image\n"));
        assert!(text.contains("point=cross 20"));
    }

    #[test]
    fn parses_two_column_catalog() {
        let sources = parse_source_catalog("202.47 47.20\n202.45 47.18\n").unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].kind, None);
    }

    #[test]
    fn parses_typed_catalog() {
        let sources = parse_source_catalog("# catalog\n202.47 47.20 P\n202.45 47.18 F\n").unwrap();
        assert_eq!(sources[0].kind, Some(SourceKind::Primary));
        assert_eq!(sources[1].kind, Some(SourceKind::Filler));
    }

    #[test]
    fn rejects_unknown_source_type() {
        let err = parse_source_catalog("202.47 47.20 X\n").unwrap_err();
        assert!(matches!(err, Error::SourceCatalog { line: 1, .. }));
    }

    #[test]
    fn rejects_single_column_row() {
        let err = parse_source_catalog("202.47\n").unwrap_err();
        assert!(matches!(err, Error::SourceCatalog { .. }));
    }

    #[test]
    fn source_region_has_one_circle_per_source() {
        let sources = parse_source_catalog("202.47 47.20\n202.45 47.18\n").unwrap();
        let text = source_region(&sources, &wcs(), "yellow").unwrap();
        assert_eq!(text.matches("circle(").count(), 2);
    }
}
