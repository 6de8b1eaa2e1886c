//! Canned controller configurations.

use strider_core::config::{ControllerConfig, DriveConfig, JointConfig, LegFrameConfig, StepCycleConfig};
use strider_core::types::PerLeg;

/// `pelvis`, `hip_l`, `hip_r`, all passive.
pub fn biped_joints() -> Vec<JointConfig> {
    ["pelvis", "hip_l", "hip_r"]
        .into_iter()
        .map(|name| JointConfig::new(name, DriveConfig::Passive))
        .collect()
}

fn cycles(left: (f64, f64), right: (f64, f64)) -> PerLeg<StepCycleConfig> {
    PerLeg::new(
        StepCycleConfig {
            trigger_offset: left.0,
            duty_factor: left.1,
        },
        StepCycleConfig {
            trigger_offset: right.0,
            duty_factor: right.1,
        },
    )
}

/// One leg frame `hips` on `pelvis` with passive joints and the given
/// `(trigger_offset, duty_factor)` per leg.
///
/// Joint order is `pelvis`, `hip_l`, `hip_r`, then `chest` when `spine` is
/// set.
pub fn single_frame_config(left: (f64, f64), right: (f64, f64), spine: bool) -> ControllerConfig {
    let mut joints = biped_joints();
    let mut frame = LegFrameConfig::new("hips", "pelvis");
    frame.left_hip = Some("hip_l".into());
    frame.right_hip = Some("hip_r".into());
    frame.step_cycles = cycles(left, right);
    if spine {
        joints.push(JointConfig::new("chest", DriveConfig::Passive));
        frame.spine = Some("chest".into());
    }
    ControllerConfig {
        joints,
        leg_frames: vec![frame],
        ..ControllerConfig::default()
    }
}

/// Front frame `shoulders` on `chest`, rear frame `hips` on `pelvis` with
/// `chest` as its spine. The front frame is processed first.
///
/// Joint order: `chest`, `shoulder_l`, `shoulder_r`, `pelvis`, `hip_l`,
/// `hip_r`.
pub fn two_frame_config() -> ControllerConfig {
    let joints = ["chest", "shoulder_l", "shoulder_r", "pelvis", "hip_l", "hip_r"]
        .into_iter()
        .map(|name| JointConfig::new(name, DriveConfig::Passive))
        .collect();

    let mut front = LegFrameConfig::new("shoulders", "chest");
    front.left_hip = Some("shoulder_l".into());
    front.right_hip = Some("shoulder_r".into());
    front.step_cycles = cycles((0.25, 0.5), (0.75, 0.5));

    let mut rear = LegFrameConfig::new("hips", "pelvis");
    rear.left_hip = Some("hip_l".into());
    rear.right_hip = Some("hip_r".into());
    rear.spine = Some("chest".into());
    rear.step_cycles = cycles((0.0, 0.5), (0.5, 0.5));

    ControllerConfig {
        joints,
        leg_frames: vec![front, rear],
        ..ControllerConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_configs_validate() {
        assert!(single_frame_config((0.0, 0.5), (0.5, 0.5), false).validate().is_ok());
        assert!(single_frame_config((0.0, 1.0), (0.0, 1.0), true).validate().is_ok());
        assert!(two_frame_config().validate().is_ok());
    }

    #[test]
    fn spine_appends_chest() {
        let cfg = single_frame_config((0.0, 0.5), (0.5, 0.5), true);
        assert_eq!(cfg.joint_index("chest"), Some(3));
        assert_eq!(cfg.leg_frames[0].spine.as_deref(), Some("chest"));
    }

    #[test]
    fn two_frame_order() {
        let cfg = two_frame_config();
        assert_eq!(cfg.leg_frames[0].name, "shoulders");
        assert_eq!(cfg.leg_frames[1].spine.as_deref(), Some("chest"));
    }
}
