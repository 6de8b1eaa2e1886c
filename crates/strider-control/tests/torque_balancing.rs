//! Leg-frame torque balancing through the full controller step.
//!
//! Joints are passive and raw torques come from a fixed virtual-force model,
//! so every hip torque going into balancing is known. With an identity body
//! rotation and flat orientation curves the orientation PD asks for zero net
//! torque, which makes the redistributed shares exact.

use approx::assert_relative_eq;
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use strider_control::prelude::*;
use strider_core::config::{DriveConfig, JointConfig};
use strider_core::types::JointId;
use strider_test_utils::{FixedVirtualForces, RecordingPhysics, single_frame_config, two_frame_config};

const PELVIS: JointId = JointId(0);
const HIP_L: JointId = JointId(1);
const HIP_R: JointId = JointId(2);
const CHEST: JointId = JointId(3);

fn controller_at(
    config: &strider_core::config::ControllerConfig,
    forces: Vec<Vector3<f64>>,
    physics: &RecordingPhysics,
) -> Controller {
    let mut controller = Controller::from_config(config)
        .unwrap()
        .with_virtual_forces(Box::new(FixedVirtualForces::new(forces)));
    controller.reset(physics);
    // one step of 0.125 lands on phase 0.375
    controller.gait_mut().set_phase(0.25);
    controller
}

#[test]
fn one_stance_leg_takes_the_whole_correction() {
    let config = single_frame_config((0.0, 0.5), (0.5, 0.5), false);
    let physics = RecordingPhysics::new(3).with_height(1.0);
    let forces = vec![
        Vector3::new(7.0, 7.0, 7.0),
        Vector3::new(1.0, 2.0, 3.0),
        Vector3::new(4.0, 5.0, 6.0),
    ];
    let mut controller = controller_at(&config, forces, &physics);

    let report = controller.step(0.125, &physics).unwrap();
    assert!(report.is_ok(), "{:?}", report.diagnostics);
    assert_relative_eq!(report.phase, 0.375);
    assert_eq!(report.stance_counts, vec![1]);

    let t = controller.torques();
    // frame joint carries the aggregate of the hips
    assert_relative_eq!(t[PELVIS], Vector3::new(5.0, 7.0, 9.0));
    // stance hip absorbs td - t_swing with td = 0
    assert_relative_eq!(t[HIP_L], Vector3::new(-4.0, -5.0, -6.0));
    // swing hip untouched
    assert_relative_eq!(t[HIP_R], Vector3::new(4.0, 5.0, 6.0));
    assert_relative_eq!(t[HIP_L] + t[HIP_R], Vector3::zeros());
}

#[test]
fn anti_phase_legs_keep_one_stance_hip_over_a_stride() {
    let config = single_frame_config((0.0, 0.5), (0.5, 0.5), false);
    let mut physics = RecordingPhysics::new(3).with_height(1.0);
    physics.set_rotation(PELVIS, UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.1));
    let raw_l = Vector3::new(1.0, 2.0, 3.0);
    let raw_r = Vector3::new(4.0, 5.0, 6.0);
    let forces = vec![Vector3::zeros(), raw_l, raw_r];
    let mut controller = controller_at(&config, forces, &physics);
    // constant tilt: td = kp * error on every step, no derivative term
    let td = Vector3::new(-4.0, 0.0, 0.0);

    let dt = 1.0 / 64.0;
    let mut seen = [false, false];
    for _ in 0..64 {
        let report = controller.step(dt, &physics).unwrap();
        assert!(report.is_ok(), "{:?}", report.diagnostics);
        assert_eq!(report.stance_counts, vec![1], "phase {}", report.phase);

        let t = controller.torques();
        assert_relative_eq!(t[PELVIS], raw_l + raw_r);
        if report.phase < 0.5 {
            seen[0] = true;
            assert_relative_eq!(t[HIP_L], td - raw_r, epsilon = 1e-9);
            assert_relative_eq!(t[HIP_R], raw_r);
        } else {
            seen[1] = true;
            assert_relative_eq!(t[HIP_R], td - raw_l, epsilon = 1e-9);
            assert_relative_eq!(t[HIP_L], raw_l);
        }
    }
    assert_eq!(seen, [true, true]);
}

#[test]
fn spine_torque_is_cancelled_by_stance_hips() {
    let config = single_frame_config((0.0, 1.0), (0.0, 1.0), true);
    let physics = RecordingPhysics::new(4).with_height(1.0);
    let forces = vec![
        Vector3::zeros(),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Vector3::new(2.0, 2.0, -2.0),
    ];
    let mut controller = controller_at(&config, forces, &physics);

    let report = controller.step(0.125, &physics).unwrap();
    assert_eq!(report.stance_counts, vec![2]);

    let t = controller.torques();
    assert_relative_eq!(t[PELVIS], Vector3::new(3.0, 3.0, -2.0));
    let share = Vector3::new(-1.0, -1.0, 1.0);
    assert_relative_eq!(t[HIP_L], share);
    assert_relative_eq!(t[HIP_R], share);
    // spine keeps its raw torque
    assert_relative_eq!(t[CHEST], Vector3::new(2.0, 2.0, -2.0));
}

#[test]
fn stance_hips_sum_to_desired_torque() {
    let config = single_frame_config((0.0, 1.0), (0.0, 1.0), false);
    let mut physics = RecordingPhysics::new(3).with_height(1.0);
    physics.set_rotation(PELVIS, UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.1));
    let mut controller = controller_at(&config, vec![], &physics);

    controller.step(0.125, &physics).unwrap();
    let t = controller.torques();
    // first PD call has no derivative term: td = kp * error with kp = 40
    let td = Vector3::new(-4.0, 0.0, 0.0);
    assert_relative_eq!(t[HIP_L] + t[HIP_R], td, epsilon = 1e-9);
    assert_relative_eq!(t[HIP_L], t[HIP_R]);
}

#[test]
fn rear_frame_balances_against_front_frame() {
    let config = two_frame_config();
    let physics = RecordingPhysics::new(6).with_height(1.0);
    let a = Vector3::new(1.0, 0.0, 0.0);
    let b = Vector3::new(0.0, 2.0, 0.0);
    let c = Vector3::new(0.0, 0.0, 3.0);
    let d = Vector3::new(4.0, 4.0, 0.0);
    // chest, shoulder_l, shoulder_r, pelvis, hip_l, hip_r
    let forces = vec![Vector3::zeros(), a, b, Vector3::zeros(), c, d];
    let mut controller = controller_at(&config, forces, &physics);

    let report = controller.step(0.125, &physics).unwrap();
    assert!(report.is_ok());
    // at phase 0.375 the left legs of both frames are planted
    assert_eq!(report.stance_counts, vec![1, 1]);

    let t = controller.torques();
    assert_relative_eq!(t[JointId(0)], a + b);
    assert_relative_eq!(t[JointId(1)], -b);
    assert_relative_eq!(t[JointId(2)], b);
    assert_relative_eq!(t[JointId(3)], a + b + c + d);
    assert_relative_eq!(t[JointId(4)], -(a + b) - d);
    assert_relative_eq!(t[JointId(5)], d);
}

#[test]
fn no_stance_legs_skips_redistribution() {
    let config = single_frame_config((0.0, 0.25), (0.0, 0.25), false);
    let physics = RecordingPhysics::new(3).with_height(1.0);
    let forces = vec![Vector3::zeros(), Vector3::x(), Vector3::y()];
    let mut controller = controller_at(&config, forces, &physics);

    let report = controller.step(0.125, &physics).unwrap();
    assert_eq!(report.stance_counts, vec![0]);
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::DegenerateStanceCount { frame: 0 }]
    );
    let t = controller.torques();
    assert_relative_eq!(t[PELVIS], Vector3::new(1.0, 1.0, 0.0));
    assert_relative_eq!(t[HIP_L], Vector3::x());
    assert_relative_eq!(t[HIP_R], Vector3::y());
}

#[test]
fn nan_rotation_is_reported_not_propagated() {
    let config = single_frame_config((0.0, 0.5), (0.5, 0.5), false);
    let mut physics = RecordingPhysics::new(3).with_height(1.0);
    let forces = vec![Vector3::zeros(), Vector3::x(), Vector3::y()];
    let mut controller = controller_at(&config, forces, &physics);
    physics.set_rotation(
        PELVIS,
        UnitQuaternion::new_unchecked(Quaternion::new(f64::NAN, 0.0, 0.0, 0.0)),
    );

    let report = controller.step(0.125, &physics).unwrap();
    assert!(
        report
            .diagnostics
            .contains(&Diagnostic::DegenerateOrientation { frame: 0 })
    );
    let t = controller.torques();
    assert!(t.all_finite());
    assert_relative_eq!(t[HIP_L], Vector3::x());
}

#[test]
fn non_finite_torque_is_zeroed_before_submission() {
    let mut config = single_frame_config((0.0, 0.5), (0.5, 0.5), false);
    config.joints.push(JointConfig::new("tail", DriveConfig::Passive));
    let mut physics = RecordingPhysics::new(4).with_height(1.0);
    let forces = vec![
        Vector3::zeros(),
        Vector3::zeros(),
        Vector3::zeros(),
        Vector3::new(f64::NAN, 0.0, 0.0),
    ];
    let mut controller = controller_at(&config, forces, &physics);

    let report = controller.step(0.125, &physics).unwrap();
    assert_eq!(
        report.diagnostics,
        vec![Diagnostic::NonFiniteTorque { joint: JointId(3) }]
    );
    controller.integrate(&mut physics);
    assert_eq!(physics.applied_for(JointId(3)), vec![Vector3::zeros()]);
}

#[test]
fn feedback_drive_carries_previous_final_torque() {
    let mut config = single_frame_config((0.0, 0.5), (0.5, 0.5), false);
    for joint in &mut config.joints {
        joint.drive = DriveConfig::Feedback;
    }
    let physics = RecordingPhysics::new(3).with_height(1.0);
    let forces = vec![Vector3::zeros(), Vector3::zeros(), Vector3::new(0.0, 0.0, 1.0)];
    let mut controller = controller_at(&config, forces, &physics);

    // right leg stays in swing from phase 0.375 through 0.4375
    controller.step(0.125, &physics).unwrap();
    assert_relative_eq!(controller.torques()[HIP_R], Vector3::new(0.0, 0.0, 1.0));
    controller.step(0.0625, &physics).unwrap();
    assert_relative_eq!(controller.torques()[HIP_R], Vector3::new(0.0, 0.0, 2.0));
}

#[test]
fn integrate_submits_computed_torques() {
    let config = single_frame_config((0.0, 0.5), (0.5, 0.5), false);
    let mut physics = RecordingPhysics::new(3).with_height(1.0);
    let forces = vec![Vector3::zeros(), Vector3::x(), Vector3::y()];
    let mut controller = controller_at(&config, forces, &physics);

    controller.step(0.125, &physics).unwrap();
    controller.integrate(&mut physics);
    let submitted: Vec<_> = physics.applied().iter().map(|(_, t)| *t).collect();
    assert_eq!(submitted, controller.torques().as_slice());
}
