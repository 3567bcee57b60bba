//! Timeline table rendering.

use aperture_visibility::{Coverage, DailyRoll, ScanOutcome};

/// Renders the per-day roll table: one whitespace row per observable day,
/// `MJD minV3PA maxV3PA` then min/max per configured instrument, degrees.
pub fn timeline_table(rows: &[DailyRoll]) -> String {
    let mut out = String::from("#     MJD  minV3PA  maxV3PA  per-instrument min/max pairs\n");
    for row in rows {
        out.push_str(&format!(
            "{:9.1}  {:7.2}  {:7.2}",
            row.mjd, row.min_v3pa_deg, row.max_v3pa_deg
        ));
        for &(min_pa, max_pa) in &row.instruments {
            out.push_str(&format!("  {:7.2}  {:7.2}", min_pa, max_pa));
        }
        out.push('\n');
    }
    out
}

/// One-line-per-window human summary of a scan.
pub fn window_summary(outcome: &ScanOutcome) -> String {
    match outcome.coverage {
        Coverage::AlwaysVisible => {
            "target is in the continuous viewing zone: visible across the whole span\n".to_string()
        }
        Coverage::NeverVisible => "target is never observable in the scanned span\n".to_string(),
        Coverage::Intermittent => {
            let mut out = String::new();
            for window in &outcome.windows {
                out.push_str(&format!(
                    "window {:9.2} .. {:9.2} MJD ({:6.1} days)  PA {:6.2} -> {:6.2}\n",
                    window.start_mjd,
                    window.end_mjd,
                    window.duration_days(),
                    window.pa_start_deg,
                    window.pa_end_deg
                ));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aperture_visibility::VisibilityWindow;

    #[test]
    fn table_has_one_row_per_day() {
        let rows = vec![
            DailyRoll {
                mjd: 58400.0,
                min_v3pa_deg: 260.0,
                max_v3pa_deg: 270.0,
                instruments: vec![(259.97, 269.97), (37.49, 47.49)],
            },
            DailyRoll {
                mjd: 58401.0,
                min_v3pa_deg: 261.0,
                max_v3pa_deg: 271.0,
                instruments: vec![(260.97, 270.97), (38.49, 48.49)],
            },
        ];
        let table = timeline_table(&rows);
        let data_lines: Vec<&str> = table.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(data_lines.len(), 2);
        assert_eq!(data_lines[0].split_whitespace().count(), 7);
        assert!(data_lines[0].starts_with("  58400.0"));
    }

    #[test]
    fn summary_marks_continuous_viewing_zone() {
        let outcome = ScanOutcome {
            coverage: Coverage::AlwaysVisible,
            windows: vec![VisibilityWindow {
                start_mjd: 58000.0,
                end_mjd: 58365.0,
                pa_start_deg: 0.0,
                pa_end_deg: 360.0,
            }],
        };
        assert!(window_summary(&outcome).contains("continuous viewing zone"));
    }

    #[test]
    fn summary_lists_windows() {
        let outcome = ScanOutcome {
            coverage: Coverage::Intermittent,
            windows: vec![VisibilityWindow {
                start_mjd: 58400.5,
                end_mjd: 58460.25,
                pa_start_deg: 260.0,
                pa_end_deg: 300.0,
            }],
        };
        let summary = window_summary(&outcome);
        assert!(summary.contains("58400.50"));
        assert!(summary.contains("days"));
    }
}
