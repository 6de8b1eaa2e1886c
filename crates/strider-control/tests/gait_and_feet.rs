//! Gait phase, velocity ramp and foot planning driven through the controller.
//!
//! A single biped frame with anti-phase legs (duty 0.5, triggers 0 and 0.5)
//! stepped at 1/64 s on a one-second stride, so every phase visited is an
//! exact multiple of 1/64.

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use strider_control::prelude::*;
use strider_core::types::Leg;
use strider_test_utils::{RecordingPhysics, single_frame_config};

const DT: f64 = 1.0 / 64.0;

fn walking_controller(goal: [f64; 3]) -> (Controller, RecordingPhysics) {
    let mut config = single_frame_config((0.0, 0.5), (0.5, 0.5), false);
    config.velocity.goal = goal;
    let physics = RecordingPhysics::new(3).with_height(1.0);
    let mut controller = Controller::from_config(&config).unwrap();
    controller.reset(&physics);
    (controller, physics)
}

#[test]
fn reset_plants_feet_under_nominal_positions() {
    let (controller, _physics) = walking_controller([0.0; 3]);
    let frame = &controller.leg_frames()[0];
    assert_relative_eq!(frame.foot(Leg::Left).target(), Point3::new(-0.1, 0.0, 0.0));
    assert_relative_eq!(frame.foot(Leg::Right).target(), Point3::new(0.1, 0.0, 0.0));
    assert_eq!(controller.planted_feet(), 2);
}

#[test]
fn ramp_converges_in_exact_step_count() {
    let (mut controller, physics) = walking_controller([0.0, 1.0, 0.0]);
    let mut steps = 0;
    while controller.current_velocity() != controller.goal_velocity() {
        let report = controller.step(DT, &physics).unwrap();
        assert_eq!(report.ramp, RampDirection::Accelerating);
        steps += 1;
        assert!(steps <= 128);
    }
    assert_eq!(steps, 128);
    let report = controller.step(DT, &physics).unwrap();
    assert_eq!(report.ramp, RampDirection::Holding);
}

#[test]
fn stride_restart_reported_once_per_cycle() {
    let (mut controller, physics) = walking_controller([0.0; 3]);
    let restarts: Vec<_> = (1..=192)
        .filter_map(|i| {
            controller
                .step(DT, &physics)
                .unwrap()
                .stride_restarted
                .then_some(i)
        })
        .collect();
    assert_eq!(restarts, vec![64, 128, 192]);
    assert_eq!(controller.gait().strides(), 3);
}

#[test]
fn lift_latch_fires_once_per_stance_entry() {
    let (mut controller, physics) = walking_controller([0.0, 1.0, 0.0]);
    let mut fired = Vec::new();
    let mut last_stance_strike = None;
    for i in 1..=64 {
        controller.step(DT, &physics).unwrap();
        let foot = controller.leg_frames()[0].foot(Leg::Left);
        if foot.latch_count() as usize > fired.len() {
            fired.push(i);
        }
        if i == 31 {
            assert_eq!(foot.state(), FootState::Stance);
            last_stance_strike = Some(foot.strike());
        }
    }
    // stance at steps 1..=31, swing 32..=63, stance again at 64
    assert_eq!(fired, vec![1, 64]);

    let foot = controller.leg_frames()[0].foot(Leg::Left);
    assert_eq!(Some(foot.lift()), last_stance_strike);
    assert_eq!(foot.target(), foot.lift());
    assert_eq!(controller.leg_frames()[0].foot(Leg::Right).latch_count(), 1);
}

#[test]
fn swing_foot_peaks_midway_between_lift_and_strike() {
    let (mut controller, physics) = walking_controller([0.0, 0.5, 0.0]);
    for _ in 0..48 {
        controller.step(DT, &physics).unwrap();
    }
    // phase 0.75: left leg halfway through its swing
    assert_relative_eq!(controller.phase(), 0.75);
    let foot = controller.leg_frames()[0].foot(Leg::Left);
    assert_eq!(foot.state(), FootState::Swing);
    let mid = foot.lift() + (foot.strike() - foot.lift()) * 0.5;
    assert_relative_eq!(foot.target().x, mid.x, epsilon = 1e-12);
    assert_relative_eq!(foot.target().y, mid.y, epsilon = 1e-12);
    assert_relative_eq!(foot.target().z, 0.1, epsilon = 1e-12);
}

#[test]
fn strike_target_trails_while_slower_than_goal() {
    let (mut controller, physics) = walking_controller([0.0, 1.0, 0.0]);
    for _ in 0..16 {
        controller.step(DT, &physics).unwrap();
    }
    let current = controller.current_velocity();
    let goal = controller.goal_velocity();
    let frame = &controller.leg_frames()[0];
    let strike = frame.strike_target(Leg::Left, &current, &goal, &physics);
    // left foot is in stance, so its strike was refreshed this step
    assert_relative_eq!(frame.foot(Leg::Left).strike(), strike);
    // still accelerating: current - goal points backwards
    assert!(strike.y < 0.0);
    assert_relative_eq!(strike.y, current.y - goal.y, epsilon = 1e-12);
    assert_relative_eq!(strike.z, 0.0);
}

#[test]
fn snapshot_tracks_feet_and_velocity() {
    let (mut controller, physics) = walking_controller([0.0, 1.0, 0.0]);
    controller.step(DT, &physics).unwrap();
    let snap = controller.snapshot();
    assert_relative_eq!(snap.current_velocity, Vector3::new(0.0, 0.5 * DT, 0.0));
    assert_relative_eq!(snap.goal_velocity, Vector3::new(0.0, 1.0, 0.0));
    let frame = &snap.frames[0];
    assert_eq!(frame.feet.left.state, FootState::Stance);
    assert_eq!(frame.feet.right.state, FootState::Swing);
    assert_eq!(frame.stance_count, 1);
}
