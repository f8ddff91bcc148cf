//! Pose report output formatting and serialization
//!
//! A [`PoseReport`] is a snapshot of every published world pose. It can be
//! rendered as human-readable text, JSON or CSV rows for logging.

use crate::api::types::{ApiError, ApiResult};
use crate::core::types::{ControllerIndex, Pose, ReferenceFrame, TrackingState};
use crate::tracking::{GlassesCore, WandRuntime};
use serde::Serialize;

/// Position and rotation of one pose, flattened for output
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoseData {
    pub frame: &'static str,
    pub position: [f64; 3],
    /// Quaternion as (x, y, z, w)
    pub rotation: [f64; 4],
}

impl<F: ReferenceFrame> From<&Pose<F>> for PoseData {
    fn from(pose: &Pose<F>) -> Self {
        let q = pose.rotation.quaternion();
        Self {
            frame: F::NAME,
            position: [pose.position.x, pose.position.y, pose.position.z],
            rotation: [q.i, q.j, q.k, q.w],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GlassesReport {
    pub state: TrackingState,
    pub pose: PoseData,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WandReport {
    pub index: ControllerIndex,
    pub state: TrackingState,
    pub grip: PoseData,
    pub fingertips: PoseData,
    pub aim: PoseData,
}

/// Snapshot of the glasses and both wands
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoseReport {
    pub frame: u64,
    pub glasses: GlassesReport,
    pub wands: Vec<WandReport>,
}

impl PoseReport {
    pub fn capture(frame: u64, glasses: &GlassesCore, wands: &WandRuntime) -> Self {
        let wands = ControllerIndex::ALL
            .iter()
            .map(|&index| {
                let poses = wands.core(index).world_poses();
                WandReport {
                    index,
                    state: wands.state(index),
                    grip: PoseData::from(&poses.grip),
                    fingertips: PoseData::from(&poses.fingertips),
                    aim: PoseData::from(&poses.aim),
                }
            })
            .collect();

        Self {
            frame,
            glasses: GlassesReport {
                state: glasses.state(),
                pose: PoseData::from(glasses.world_poses()),
            },
            wands,
        }
    }

    pub fn format_text(&self) -> String {
        TextFormatter::new().format_text(self)
    }
}

/// Human-readable text formatter
#[derive(Debug, Clone, Copy)]
pub struct TextFormatter {
    /// One line per report instead of a block
    pub compact: bool,
    /// Decimal places for positions
    pub precision: usize,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self {
            compact: false,
            precision: 3,
        }
    }

    pub fn compact() -> Self {
        Self {
            compact: true,
            ..Self::new()
        }
    }

    pub fn format_text(&self, report: &PoseReport) -> String {
        if self.compact {
            let mut output = format!(
                "#{} glasses[{:?}] {}",
                report.frame,
                report.glasses.state,
                self.position(&report.glasses.pose)
            );
            for wand in &report.wands {
                output.push_str(&format!(
                    " | {}[{:?}] {}",
                    wand.index,
                    wand.state,
                    self.position(&wand.grip)
                ));
            }
            return output;
        }

        let mut output = format!("Frame #{}\n", report.frame);
        output.push_str(&format!("Glasses ({:?}):\n", report.glasses.state));
        output.push_str(&self.pose_line("Head", &report.glasses.pose));
        for wand in &report.wands {
            output.push_str(&format!("Wand {} ({:?}):\n", wand.index, wand.state));
            output.push_str(&self.pose_line("Grip", &wand.grip));
            output.push_str(&self.pose_line("Fingertips", &wand.fingertips));
            output.push_str(&self.pose_line("Aim", &wand.aim));
        }
        output
    }

    fn position(&self, pose: &PoseData) -> String {
        let [x, y, z] = pose.position;
        let p = self.precision;
        format!("({:.p$}, {:.p$}, {:.p$})", x, y, z, p = p)
    }

    fn pose_line(&self, label: &str, pose: &PoseData) -> String {
        let [qx, qy, qz, qw] = pose.rotation;
        format!(
            "  {:<11}{} rot ({:.4}, {:.4}, {:.4}, {:.4}) [{}]\n",
            label,
            self.position(pose),
            qx,
            qy,
            qz,
            qw,
            pose.frame
        )
    }
}

/// JSON formatter for structured output
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn format_json(&self, report: &PoseReport) -> ApiResult<String> {
        let result = if self.pretty {
            serde_json::to_string_pretty(report)
        } else {
            serde_json::to_string(report)
        };
        result.map_err(|e| ApiError::Serialization { message: e.to_string() })
    }
}

/// CSV formatter for data logging; one row per wand reference point
#[derive(Debug, Clone, Copy)]
pub struct CsvFormatter {
    pub include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self { include_header: true }
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> String {
        "frame,trackable,point,state,x,y,z,qx,qy,qz,qw".to_string()
    }

    pub fn format_csv(&self, report: &PoseReport) -> String {
        let mut rows = Vec::new();
        if self.include_header {
            rows.push(self.header());
        }
        rows.push(Self::row(report.frame, "glasses", "head", report.glasses.state, &report.glasses.pose));
        for wand in &report.wands {
            let name = format!("wand_{}", wand.index);
            rows.push(Self::row(report.frame, &name, "grip", wand.state, &wand.grip));
            rows.push(Self::row(report.frame, &name, "fingertips", wand.state, &wand.fingertips));
            rows.push(Self::row(report.frame, &name, "aim", wand.state, &wand.aim));
        }
        rows.join("\n")
    }

    fn row(frame: u64, trackable: &str, point: &str, state: TrackingState, pose: &PoseData) -> String {
        let [x, y, z] = pose.position;
        let [qx, qy, qz, qw] = pose.rotation;
        format!(
            "{},{},{},{:?},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6},{:.6}",
            frame, trackable, point, state, x, y, z, qx, qy, qz, qw
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::{GameboardSettings, ScaleSettings, WandSettings};
    use crate::hardware::MockDeviceSource;
    use crate::tracking::{GlassesKind, WandRig};

    fn fallback_report() -> PoseReport {
        let mut wands = WandRuntime::new();
        let glasses = GlassesCore::new(GlassesKind);
        let mut device = MockDeviceSource::unavailable();
        let mut rig = WandRig::new();
        wands.update(
            Some(&WandSettings::new(ControllerIndex::Primary)),
            &ScaleSettings::meters(),
            &GameboardSettings::default(),
            &mut device,
            &mut rig,
        );
        PoseReport::capture(7, &glasses, &wands)
    }

    #[test]
    fn test_capture_reads_world_poses() {
        let report = fallback_report();
        assert_eq!(report.frame, 7);
        assert_eq!(report.wands.len(), 2);

        let primary = &report.wands[0];
        assert_eq!(primary.index, ControllerIndex::Primary);
        assert_eq!(primary.state, TrackingState::Fallback);
        assert_eq!(primary.grip.frame, "UWRLD");
        assert!((primary.grip.position[0] - 0.125).abs() < 1e-9);
        assert!((primary.grip.position[1] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_text_format() {
        let report = fallback_report();
        let text = report.format_text();
        assert!(text.starts_with("Frame #7\n"));
        assert!(text.contains("Wand primary (Fallback):"));
        assert!(text.contains("Grip       (0.125, 0.250, -0.250)"));

        let compact = TextFormatter::compact().format_text(&report);
        assert!(!compact.contains('\n'));
        assert!(compact.contains("primary[Fallback] (0.125, 0.250, -0.250)"));
    }

    #[test]
    fn test_json_format() {
        let report = fallback_report();
        let json = JsonFormatter::new().format_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["frame"], 7);
        assert_eq!(value["wands"][0]["index"], "Primary");
        assert_eq!(value["wands"][1]["state"], "Fallback");
        assert_eq!(value["glasses"]["pose"]["frame"], "UWRLD");

        let pretty = JsonFormatter::pretty().format_json(&report).unwrap();
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_csv_format() {
        let report = fallback_report();
        let csv = CsvFormatter::new().format_csv(&report);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], CsvFormatter::new().header());
        assert!(lines[2].starts_with("7,wand_primary,grip,Fallback,0.125000,0.250000,-0.250000"));

        let no_header = CsvFormatter { include_header: false }.format_csv(&report);
        assert_eq!(no_header.lines().count(), 7);
    }
}
