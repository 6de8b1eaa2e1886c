//! Multi-second headless walks of the preset scenes.

use strider_sim::prelude::*;

fn walk(scene: &Scene, seconds: f64) -> Simulation {
    let mut sim = Simulation::new(scene).unwrap();
    sim.run_for(seconds).unwrap();
    sim
}

#[test]
fn biped_walks_five_seconds() {
    let scene = biped();
    let sim = walk(&scene, 5.0);

    assert!(sim.world().is_finite());
    assert_eq!(sim.stats().non_finite_torques, 0);
    // 0.8 s stride
    assert_eq!(sim.stats().strides, 6);
    assert!(sim.stats().max_torque.is_finite());

    let objective = sim.objective();
    assert!(objective.total.is_finite());
    assert!(objective.fp > 0.0);
    assert!(sim.world().root().y > 0.0);
}

#[test]
fn quadruped_walks_four_and_a_half_seconds() {
    let sim = walk(&quadruped(), 4.5);

    assert!(sim.world().is_finite());
    assert_eq!(sim.stats().non_finite_torques, 0);
    // 1 s stride
    assert_eq!(sim.stats().strides, 4);
    assert_eq!(sim.render().controller.frames.len(), 2);
    assert!(sim.objective().total.is_finite());
}

#[test]
fn pushed_biped_stays_finite() {
    let mut scene = biped();
    scene.config.sim.push.enabled = true;
    scene.config.sim.push.interval = 0.75;
    scene.config.sim.seed = 7;
    let sim = walk(&scene, 4.0);

    assert!(sim.stats().pushes >= 5);
    assert!(sim.world().is_finite());
    assert!(sim.objective().total.is_finite());
}

#[test]
fn same_seed_same_run() {
    let mut scene = biped();
    scene.config.sim.push.enabled = true;
    scene.config.sim.push.interval = 0.5;
    scene.config.sim.seed = 42;

    let a = walk(&scene, 2.0);
    let b = walk(&scene, 2.0);
    assert_eq!(a.render(), b.render());
    assert_eq!(a.objective(), b.objective());
}

#[test]
fn recorded_walk_finishes_cleanly() {
    let path = std::env::temp_dir().join(format!("strider_sim_{}.mcap", std::process::id()));
    let recorder = strider_record::prelude::Recorder::create(&path).unwrap();
    let mut sim = Simulation::new(&biped()).unwrap().with_recorder(recorder);
    sim.run_for(1.0).unwrap();
    assert!(sim.is_recording());
    sim.finish().unwrap();
    assert!(!sim.is_recording());

    let len = std::fs::metadata(&path).unwrap().len();
    std::fs::remove_file(&path).ok();
    assert!(len > 0);
}
