//! Console reporting for command results

use std::fmt::Display;
use std::path::Path;

use chromatch_core::{ColorCorrectionMatrix, Estimate, PixelBuffer};

/// Prints user-facing progress unless `--silent` was given
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    silent: bool,
}

impl Reporter {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn line(&self, text: impl Display) {
        if !self.silent {
            println!("{}", text);
        }
    }
}

/// `Start: a.png (640x480, 3 channels)`
pub fn format_image_info(label: &str, path: &Path, image: &PixelBuffer) -> String {
    format!(
        "{}: {} ({}x{}, {} channel{})",
        label,
        path.display(),
        image.width(),
        image.height(),
        image.channels(),
        if image.channels() == 1 { "" } else { "s" }
    )
}

/// Matrix heading plus one indented row per line
pub fn format_matrix(matrix: &ColorCorrectionMatrix, precision: usize) -> String {
    let body = format!("{:.*}", precision, matrix);
    let mut out = String::from("Color correction matrix:");
    for row in body.lines() {
        out.push_str("\n  ");
        out.push_str(row);
    }
    out
}

/// Sample count, residuals (in 8-bit levels) and solver diagnostics
pub fn format_fit_summary(estimate: &Estimate) -> String {
    let report = &estimate.report;
    let rms_levels = report.rms_error.map(|e| e * 255.0);
    format!(
        "Fit summary:\n  Samples: {}\n  RMS error (R, G, B): [{:.3}, {:.3}, {:.3}] levels\n  \
         Overall RMS: {:.3} levels\n  Cost: {:.6e}\n  Condition number: {:.3e}",
        report.samples,
        rms_levels[0],
        rms_levels[1],
        rms_levels[2],
        report.overall_rms() * 255.0,
        report.cost,
        estimate.condition_number
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chromatch_core::FitReport;
    use std::path::PathBuf;

    #[test]
    fn test_image_info_line() {
        let image = PixelBuffer::new(4, 2, 3, vec![0; 24]);
        let line = format_image_info("Start", &PathBuf::from("in/start.png"), &image);
        assert_eq!(line, "Start: in/start.png (4x2, 3 channels)");
    }

    #[test]
    fn test_image_info_single_channel() {
        let image = PixelBuffer::new(1, 1, 1, vec![0]);
        let line = format_image_info("Target", Path::new("gray.tif"), &image);
        assert!(line.ends_with("(1x1, 1 channel)"));
    }

    #[test]
    fn test_matrix_uses_precision() {
        let text = format_matrix(&ColorCorrectionMatrix::IDENTITY, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Color correction matrix:");
        assert_eq!(lines[1], "  [  1.00,   0.00,   0.00]");
        assert_eq!(lines[3], "  [  0.00,   0.00,   1.00]");
    }

    #[test]
    fn test_fit_summary_reports_levels() {
        let estimate = Estimate {
            matrix: ColorCorrectionMatrix::IDENTITY,
            condition_number: 12.5,
            report: FitReport {
                samples: 4,
                residual_sum_squares: [0.0; 3],
                rms_error: [1.0 / 255.0, 0.0, 2.0 / 255.0],
                cost: 0.0,
            },
        };

        let summary = format_fit_summary(&estimate);

        assert!(summary.contains("Samples: 4"));
        assert!(summary.contains("[1.000, 0.000, 2.000] levels"));
        assert!(summary.contains("Condition number: 1.250e1"));
    }
}
