//! Orchestration commands: footprint emission and timeline generation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{ensure_dir, write_atomic};
use crate::regions;
use crate::report;
use aperture_core::angle::parse_target;
use aperture_footprints::projector::project;
use aperture_footprints::{ApertureCatalog, DitherPattern, FootprintRequest, Instrument, MosaicOffset};
use aperture_visibility::timeline::{daily_rolls, scan, TIMELINE_INSTRUMENTS};
use aperture_visibility::{Ephemeris, ScanOutcome, ScanRequest};
use aperture_wcs::ImageWcs;
use std::path::PathBuf;
use tracing::{info, warn};

/// Output-file suffix for an instrument/pattern combination.
fn region_suffix(dither: DitherPattern, mosaic: bool) -> &'static str {
    if mosaic {
        return "mosaic";
    }
    match dither {
        DitherPattern::None => "no",
        DitherPattern::Full3 => "three",
        DitherPattern::Full3Tight => "threetight",
        DitherPattern::Full6 => "six",
        DitherPattern::EightSpec => "8nirspec",
    }
}

/// Projects the enabled instruments and writes their region artifacts.
///
/// Returns the paths written, footprint files before center markers.
pub fn run_footprints(config: &Config) -> Result<Vec<PathBuf>> {
    let wcs = ImageWcs::from_card_file(&config.wcs_header)?;
    let catalog = ApertureCatalog::builtin();
    ensure_dir(&config.out_dir)?;

    let dither: DitherPattern = config.dither.parse()?;
    let mosaic = config
        .mosaic
        .then(|| MosaicOffset::new(config.mosaic_v2, config.mosaic_v3));

    let mut written = Vec::new();

    let camera_channels = [
        (config.plot_long, Instrument::LongWavelength, &config.color_long),
        (config.plot_short, Instrument::ShortWavelength, &config.color_short),
    ];
    if camera_channels.iter().any(|(enabled, _, _)| *enabled) {
        let (ra, dec) = parse_target(&config.ra_camera, &config.dec_camera)?;
        let request = FootprintRequest {
            ra_deg: ra,
            dec_deg: dec,
            pa_deg: config.theta_camera,
            dither,
            mosaic,
        };
        for (enabled, instrument, color) in camera_channels {
            if !enabled {
                continue;
            }
            written.extend(emit_instrument(
                config, &catalog, &wcs, instrument, &request, color,
            )?);
        }
    }

    if config.plot_msa {
        let (ra, dec) = parse_target(&config.ra_msa, &config.dec_msa)?;
        // The multi-shutter assembly is placed directly; dither patterns and
        // mosaics apply to the camera channels only.
        let request = FootprintRequest {
            ra_deg: ra,
            dec_deg: dec,
            pa_deg: config.theta_msa,
            dither: DitherPattern::None,
            mosaic: None,
        };
        written.extend(emit_instrument(
            config,
            &catalog,
            &wcs,
            Instrument::MultiShutter,
            &request,
            &config.color_msa,
        )?);
    }

    if config.plot_sources {
        written.extend(emit_sources(config, &wcs)?);
    }

    Ok(written)
}

fn emit_instrument(
    config: &Config,
    catalog: &ApertureCatalog,
    wcs: &ImageWcs,
    instrument: Instrument,
    request: &FootprintRequest,
    color: &str,
) -> Result<Vec<PathBuf>> {
    let footprint = project(catalog, instrument, request)?;
    let pixels = footprint.to_pixels(wcs)?;
    info!(
        instrument = %instrument,
        apertures = footprint.aperture_count(),
        pattern = %request.dither,
        "projected footprint"
    );

    let label = instrument.label();
    let footprint_path = if instrument == Instrument::MultiShutter {
        config.out_dir.join("ds9-msa.reg")
    } else {
        config.out_dir.join(format!(
            "ds9-{}-{}.reg",
            label,
            region_suffix(request.dither, request.mosaic.is_some())
        ))
    };
    write_atomic(&footprint_path, &regions::polygon_region(&pixels, color))?;

    let center = wcs.world_to_pixel(request.ra_deg, request.dec_deg)?;
    let center_path = config.out_dir.join(format!("ds9-{}-centre.reg", label));
    write_atomic(&center_path, &regions::center_region(center, color))?;

    Ok(vec![footprint_path, center_path])
}

fn emit_sources(config: &Config, wcs: &ImageWcs) -> Result<Vec<PathBuf>> {
    let catalog_path = config
        .source_catalog
        .as_deref()
        .ok_or_else(|| Error::config("no source catalog configured (set `source_catalog`)"))?;
    let sources = regions::parse_source_catalog(&std::fs::read_to_string(catalog_path)?)?;

    let typed = sources.iter().any(|s| s.kind.is_some());
    let mut written = Vec::new();
    if typed {
        let primary: Vec<_> = sources
            .iter()
            .copied()
            .filter(|s| s.kind == Some(regions::SourceKind::Primary))
            .collect();
        let fillers: Vec<_> = sources
            .iter()
            .copied()
            .filter(|s| s.kind == Some(regions::SourceKind::Filler))
            .collect();
        for (subset, name, color) in [
            (primary, "ds9-sources-primary.reg", "red"),
            (fillers, "ds9-sources-fillers.reg", "yellow"),
        ] {
            let path = config.out_dir.join(name);
            write_atomic(&path, &regions::source_region(&subset, wcs, color)?)?;
            written.push(path);
        }
    } else {
        let path = config.out_dir.join("ds9-sources.reg");
        write_atomic(&path, &regions::source_region(&sources, wcs, "yellow")?)?;
        written.push(path);
    }
    Ok(written)
}

/// Outcome of a timeline run.
#[derive(Debug)]
pub struct TimelineReport {
    pub path: PathBuf,
    pub outcome: ScanOutcome,
    pub rows_written: usize,
}

/// Scans the configured span and writes the per-day roll table.
pub fn run_timeline(config: &Config) -> Result<TimelineReport> {
    let ephemeris = Ephemeris::load(config.ephemeris_path()?)?;
    let (ra, dec) = parse_target(&config.ra_camera, &config.dec_camera)?;

    let mut start = config.search_start_mjd;
    if start < ephemeris.min_mjd() {
        warn!(
            requested = start,
            ephemeris_start = ephemeris.min_mjd(),
            "search start is earlier than the ephemeris start, moving it"
        );
        start = ephemeris.min_mjd() + 1.0;
    }

    let mut request = ScanRequest::new(ra, dec, start, config.span_days);
    request.samples_per_day = config.samples_per_day;
    request.fixed_pa_deg = config.fixed_pa;

    let outcome = scan(&ephemeris, &request)?;
    let rows = daily_rolls(&ephemeris, &request, TIMELINE_INSTRUMENTS)?;

    ensure_dir(&config.out_dir)?;
    let path = config.out_dir.join("v3pa_camera_spectrograph.txt");
    write_atomic(&path, &report::timeline_table(&rows))?;
    info!(
        path = %path.display(),
        rows = rows.len(),
        windows = outcome.windows.len(),
        "wrote timeline table"
    );

    Ok(TimelineReport {
        path,
        outcome,
        rows_written: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_matches_historical_names() {
        assert_eq!(region_suffix(DitherPattern::None, false), "no");
        assert_eq!(region_suffix(DitherPattern::Full3, false), "three");
        assert_eq!(region_suffix(DitherPattern::Full3Tight, false), "threetight");
        assert_eq!(region_suffix(DitherPattern::Full6, false), "six");
        assert_eq!(region_suffix(DitherPattern::EightSpec, false), "8nirspec");
        assert_eq!(region_suffix(DitherPattern::Full3, true), "mosaic");
    }
}
