//! Field-of-regard timeline scan and per-day roll windows.
//!
//! The scan is a two-state machine (outside/inside the field of regard)
//! stepped at `samples_per_day` over the requested span. Each transition is
//! refined by bisection between the bracketing samples, locating the
//! crossing instant more precisely than the sampling grid. A target that
//! never flips state is classified distinctly: permanently visible
//! (continuous viewing zone) or never visible.

use crate::ephemeris::Ephemeris;
use crate::error::VisibilityResult;
use crate::solver::{
    in_field_of_regard, is_valid_at_pa, max_boresight_roll, normal_position_angle,
};
use aperture_core::wrap_360;

/// Bisection stops once the bracketing interval is this narrow (days).
const BISECT_TOLERANCE_DAYS: f64 = 0.02;

/// One timeline scan request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanRequest {
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub start_mjd: f64,
    pub span_days: f64,
    /// Samples per day for the transition search (default 10, every 2.4 h).
    pub samples_per_day: u32,
    /// When set, observability is judged at this fixed position angle
    /// instead of reporting the free roll window.
    pub fixed_pa_deg: Option<f64>,
}

impl ScanRequest {
    pub fn new(ra_deg: f64, dec_deg: f64, start_mjd: f64, span_days: f64) -> Self {
        Self {
            ra_deg,
            dec_deg,
            start_mjd,
            span_days,
            samples_per_day: 10,
            fixed_pa_deg: None,
        }
    }
}

/// One contiguous observability window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityWindow {
    pub start_mjd: f64,
    pub end_mjd: f64,
    pub pa_start_deg: f64,
    pub pa_end_deg: f64,
}

impl VisibilityWindow {
    pub fn duration_days(&self) -> f64 {
        self.end_mjd - self.start_mjd
    }
}

/// How the target's visibility covers the scanned span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Ordinary target: one or more windows bounded by transitions.
    Intermittent,
    /// Continuous viewing zone: inside the field of regard at every sample.
    AlwaysVisible,
    /// Outside the field of regard at every sample.
    NeverVisible,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub coverage: Coverage,
    pub windows: Vec<VisibilityWindow>,
}

fn observable(eph: &Ephemeris, req: &ScanRequest, mjd: f64) -> VisibilityResult<bool> {
    match req.fixed_pa_deg {
        Some(pa) => is_valid_at_pa(eph, mjd, req.ra_deg, req.dec_deg, pa),
        None => in_field_of_regard(eph, mjd, req.ra_deg, req.dec_deg),
    }
}

fn window_pa(eph: &Ephemeris, req: &ScanRequest, mjd: f64) -> VisibilityResult<f64> {
    match req.fixed_pa_deg {
        Some(pa) => Ok(wrap_360(pa)),
        None => normal_position_angle(eph, mjd, req.ra_deg, req.dec_deg),
    }
}

/// Refines a state transition between an outside and an inside sample.
///
/// Halves the bracketing interval until it is narrower than the tolerance,
/// then returns the midpoint. The two endpoints may come in either time
/// order.
fn bisect_transition(
    eph: &Ephemeris,
    req: &ScanRequest,
    mut outside_mjd: f64,
    mut inside_mjd: f64,
) -> VisibilityResult<f64> {
    while (inside_mjd - outside_mjd).abs() > BISECT_TOLERANCE_DAYS {
        let midpoint = 0.5 * (inside_mjd + outside_mjd);
        if observable(eph, req, midpoint)? {
            inside_mjd = midpoint;
        } else {
            outside_mjd = midpoint;
        }
    }
    Ok(0.5 * (inside_mjd + outside_mjd))
}

/// Scans the requested span for observability windows.
pub fn scan(eph: &Ephemeris, req: &ScanRequest) -> VisibilityResult<ScanOutcome> {
    let scale = f64::from(req.samples_per_day.max(1));
    let steps = (req.span_days * scale).round() as usize;
    let end_mjd = req.start_mjd + steps as f64 / scale;

    let mut inside = observable(eph, req, req.start_mjd)?;
    let started_inside = inside;
    let mut flipped = false;
    let mut windows = Vec::new();
    let mut open_start = if inside { Some(req.start_mjd) } else { None };
    let mut previous = req.start_mjd;

    for step in 1..=steps {
        let current = req.start_mjd + step as f64 / scale;
        let now_inside = observable(eph, req, current)?;
        if now_inside != inside {
            flipped = true;
            if now_inside {
                let crossing = bisect_transition(eph, req, previous, current)?;
                open_start = Some(crossing);
            } else {
                let crossing = bisect_transition(eph, req, current, previous)?;
                if let Some(start) = open_start.take() {
                    windows.push(VisibilityWindow {
                        start_mjd: start,
                        end_mjd: crossing,
                        pa_start_deg: window_pa(eph, req, start)?,
                        pa_end_deg: window_pa(eph, req, crossing)?,
                    });
                }
            }
            inside = now_inside;
        }
        previous = current;
    }

    if !flipped {
        return Ok(if started_inside {
            // Continuous viewing zone: report the full span with the full
            // position-angle swing rather than dropping the target.
            ScanOutcome {
                coverage: Coverage::AlwaysVisible,
                windows: vec![VisibilityWindow {
                    start_mjd: req.start_mjd,
                    end_mjd,
                    pa_start_deg: req.fixed_pa_deg.map_or(0.0, wrap_360),
                    pa_end_deg: req.fixed_pa_deg.map_or(360.0, wrap_360),
                }],
            }
        } else {
            ScanOutcome {
                coverage: Coverage::NeverVisible,
                windows: Vec::new(),
            }
        });
    }

    if inside {
        if let Some(start) = open_start.take() {
            windows.push(VisibilityWindow {
                start_mjd: start,
                end_mjd,
                pa_start_deg: window_pa(eph, req, start)?,
                pa_end_deg: window_pa(eph, req, end_mjd)?,
            });
        }
    }

    Ok(ScanOutcome {
        coverage: Coverage::Intermittent,
        windows,
    })
}

/// A named instrument and its fixed V3-to-aperture position-angle offset.
#[derive(Debug, Clone, Copy)]
pub struct InstrumentPa {
    pub name: &'static str,
    pub offset_deg: f64,
}

/// The instruments reported in the per-day roll table. Calibration data;
/// keep the offsets named so updates stay auditable.
pub const TIMELINE_INSTRUMENTS: &[InstrumentPa] = &[
    InstrumentPa {
        name: "camera",
        offset_deg: -0.0265,
    },
    InstrumentPa {
        name: "spectrograph",
        offset_deg: 137.4874,
    },
];

/// One per-day report row: the V3 roll window plus per-instrument windows.
#[derive(Debug, Clone)]
pub struct DailyRoll {
    pub mjd: f64,
    pub min_v3pa_deg: f64,
    pub max_v3pa_deg: f64,
    /// `(min, max)` aperture position angle per configured instrument,
    /// in `instruments` order.
    pub instruments: Vec<(f64, f64)>,
}

/// Computes one row per whole day the target is observable.
///
/// Each row carries the allowed V3 position-angle swing about the nominal
/// anti-sun orientation, and the same window shifted by each instrument's
/// boresight offset, all wrapped into [0, 360).
pub fn daily_rolls(
    eph: &Ephemeris,
    req: &ScanRequest,
    instruments: &[InstrumentPa],
) -> VisibilityResult<Vec<DailyRoll>> {
    let first_day = req.start_mjd.floor() as i64;
    let last_day = (req.start_mjd + req.span_days).floor() as i64;

    let mut rows = Vec::new();
    for day in first_day..last_day {
        let mjd = day as f64;
        if mjd < req.start_mjd {
            continue;
        }
        if !observable(eph, req, mjd)? {
            continue;
        }

        let (center, half_swing) = match req.fixed_pa_deg {
            Some(pa) => (wrap_360(pa), 0.0),
            None => (
                normal_position_angle(eph, mjd, req.ra_deg, req.dec_deg)?,
                max_boresight_roll(eph, mjd, req.ra_deg, req.dec_deg)?,
            ),
        };

        rows.push(DailyRoll {
            mjd,
            min_v3pa_deg: wrap_360(center - half_swing),
            max_v3pa_deg: wrap_360(center + half_swing),
            instruments: instruments
                .iter()
                .map(|inst| {
                    (
                        wrap_360(center - half_swing + inst.offset_deg),
                        wrap_360(center + half_swing + inst.offset_deg),
                    )
                })
                .collect(),
        });
    }
    Ok(rows)
}
