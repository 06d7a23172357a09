use rand::{rngs::SmallRng, Rng, SeedableRng};
use sprinkler_sim::{Particle, ParticleSimulation, SimulationConfig};
use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

const EPS: f64 = 1e-9;

/// Same geometry, but the emitter will not fire again for a long while.
fn silenced(config: &SimulationConfig) -> SimulationConfig {
  SimulationConfig {
    emission_rate: 1.0e12,
    ..*config
  }
}

fn azimuth(p: &Particle) -> f64 {
  p.position().z.atan2(p.position().x)
}

#[test]
fn burst_particles_are_evenly_spaced() {
  for count in [1u32, 2, 3, 7, 12] {
    let config = SimulationConfig {
      particles_per_burst: count,
      ..Default::default()
    };
    let mut sim = ParticleSimulation::new();
    let live = sim.advance(&config, 0.1);
    assert_eq!(live.len(), count as usize);

    let step = 2.0 * PI / count as f64;
    for pair in live.windows(2) {
      let gap = (azimuth(&pair[1]) - azimuth(&pair[0])).rem_euclid(2.0 * PI);
      assert!((gap - step).abs() < EPS, "count {count}: gap {gap}");
    }
  }
}

#[test]
fn fresh_particles_sit_on_the_launch_ring() {
  let config = SimulationConfig {
    emitter_arm_length: 3.0,
    emitter_height: 2.0,
    particles_per_burst: 4,
    ..Default::default()
  };
  let mut sim = ParticleSimulation::new();
  sim.advance(&config, 0.1);
  sim.advance(&config, 0.1);

  let angle = sim.emitter().rotation_angle;
  let newest = &sim.particles()[sim.len() - 4..];
  for (i, p) in newest.iter().enumerate() {
    let phi = angle + i as f64 * PI / 2.0;
    assert!((p.position().x - 1.5 * phi.cos()).abs() < EPS);
    assert_eq!(p.position().y, 2.0);
    assert!((p.position().z - 1.5 * phi.sin()).abs() < EPS);
  }
}

#[test]
fn vertical_launch_follows_the_ballistic_curve() {
  let config = SimulationConfig {
    launch_angle_deg: 90.0,
    launch_speed: 2.0,
    emitter_height: 1.0,
    emitter_arm_length: 0.0,
    gravity: 9.8,
    particles_per_burst: 1,
    deletion_height: -1.0e9,
    ..Default::default()
  };
  let dt = 0.05;
  let mut sim = ParticleSimulation::new();
  sim.advance(&config, dt);

  let quiet = silenced(&config);
  let mut last_vy = sim.particles()[0].velocity().y;
  for step in 1..=200 {
    let p = &sim.advance(&quiet, dt)[0];
    let t = step as f64 * dt;
    let expected = 1.0 + 2.0 * t - 0.5 * 9.8 * t * t;
    assert!((p.position().y - expected).abs() < 1e-6, "step {step}");
    assert!(p.velocity().y < last_vy);
    assert!(p.position().x.abs() < EPS && p.position().z.abs() < EPS);
    last_vy = p.velocity().y;
  }
}

#[test]
fn grounded_particles_are_removed_without_bounce() {
  let config = SimulationConfig {
    launch_speed: 1.0,
    gravity: 5.0,
    deletion_height: 0.2,
    ..Default::default()
  };
  let mut sim = ParticleSimulation::new();
  let mut removed = 0;
  for _ in 0..300 {
    let live = sim.advance(&config, 0.05);
    assert!(live.iter().all(|p| p.position().y > config.deletion_height));
    removed += sim.last_step().removed;
  }
  assert!(removed > 0);
}

#[test]
fn bounce_flips_vertical_speed_on_crossing() {
  let config = SimulationConfig {
    launch_angle_deg: 90.0,
    launch_speed: 0.0,
    emitter_height: 1.0,
    emitter_arm_length: 0.0,
    gravity: 2.0,
    particles_per_burst: 1,
    bounce_enabled: true,
    deletion_distance: 100.0,
    ..Default::default()
  };
  let dt = 0.1;
  let mut sim = ParticleSimulation::new();
  sim.advance(&config, dt);

  let quiet = silenced(&config);
  let mut crossings = 0;
  for _ in 0..100 {
    let before = sim.particles()[0].clone();
    let after = &sim.advance(&quiet, dt)[0];
    let falling_speed = before.velocity().y - 2.0 * dt;
    if after.position().y <= 0.0 {
      crossings += 1;
      assert_eq!(after.velocity().y, -falling_speed);
    } else {
      assert_eq!(after.velocity().y, falling_speed);
    }
  }
  assert!(crossings > 0);
  assert_eq!(sim.len(), 1);
}

#[test]
fn bouncing_particles_die_past_the_deletion_distance() {
  let config = SimulationConfig {
    launch_angle_deg: 0.0,
    launch_speed: 5.0,
    gravity: 0.0,
    particles_per_burst: 1,
    emitter_height: 0.0,
    bounce_enabled: true,
    deletion_distance: 1.8,
    deletion_height: -1.0e9,
    ..Default::default()
  };
  let mut sim = ParticleSimulation::new();
  sim.advance(&config, 0.1);

  let quiet = silenced(&config);
  let mut steps = 0;
  while !sim.is_empty() {
    for p in sim.particles() {
      assert!(p.distance_from_origin() <= 1.8);
    }
    sim.advance(&quiet, 0.1);
    steps += 1;
    assert!(steps < 100, "particle never left");
  }
  // launched 0.5 out, 0.5 further per step: 1.0, 1.5, then 2.0 is past the limit
  assert_eq!(steps, 3);
}

#[test]
fn uncapped_bounce_grows_without_bound() {
  let config = SimulationConfig {
    bounce_enabled: true,
    deletion_distance: 1.0e9,
    max_particles: None,
    ..Default::default()
  };
  let per_burst = config.particles_per_burst as usize;
  let mut sim = ParticleSimulation::new();
  let mut previous = 0;
  for frame in 1..=2000 {
    let live = sim.advance(&config, config.time_step).len();
    assert!(live >= previous, "frame {frame}: shrank from {previous} to {live}");
    assert_eq!(live, frame * per_burst);
    previous = live;
  }
  assert_eq!(sim.len(), 4000);
}

#[test]
fn burst_cadence_tracks_dt_times_rate() {
  let every_call = SimulationConfig {
    emission_rate: 1.0,
    ..Default::default()
  };
  let mut sim = ParticleSimulation::new();
  for _ in 0..100 {
    sim.advance(&every_call, 0.1);
    assert_eq!(sim.last_step().emitted, 2);
  }

  let every_tenth = SimulationConfig {
    emission_rate: 10.0,
    ..Default::default()
  };
  let mut sim = ParticleSimulation::new();
  let fired: Vec<usize> = (1..=100)
    .filter(|_| {
      sim.advance(&every_tenth, 0.1);
      sim.last_step().emitted > 0
    })
    .collect();
  assert_eq!(fired, (1..=10).map(|k| k * 10).collect::<Vec<_>>());
}

#[test]
fn destroyed_particles_never_return() {
  // each frame's burst is tagged by its radius
  let base = SimulationConfig {
    launch_speed: 0.5,
    gravity: 2.0,
    ..Default::default()
  };
  let mut sim = ParticleSimulation::new();
  let mut previous: HashMap<u64, usize> = HashMap::new();
  let mut extinct: HashSet<u64> = HashSet::new();
  for frame in 1..=200u64 {
    let config = SimulationConfig {
      particle_radius: frame as f64,
      ..base
    };
    let mut counts: HashMap<u64, usize> = HashMap::new();
    for p in sim.advance(&config, 0.1) {
      *counts.entry(p.appearance().radius as u64).or_default() += 1;
    }
    for (tag, count) in &counts {
      assert!(!extinct.contains(tag), "frame {frame}: tag {tag} came back");
      match previous.get(tag) {
        Some(before) => assert!(count <= before),
        None => assert_eq!(*tag, frame),
      }
    }
    extinct.extend(previous.keys().filter(|tag| !counts.contains_key(tag)));
    previous = counts;
  }
  assert!(!extinct.is_empty());
}

#[test]
fn drag_slows_particles_down() {
  let config = SimulationConfig {
    launch_angle_deg: 0.0,
    launch_speed: 1.0,
    gravity: 0.0,
    drag_coefficient: 0.5,
    particles_per_burst: 1,
    deletion_height: -1.0e9,
    ..Default::default()
  };
  let mut sim = ParticleSimulation::new();
  sim.advance(&config, 0.1);
  let quiet = silenced(&config);
  let mut speed = 1.0;
  for _ in 0..10 {
    let p = &sim.advance(&quiet, 0.1)[0];
    speed *= 0.95;
    let horizontal = p.velocity().x.hypot(p.velocity().z);
    assert!((horizontal - speed).abs() < EPS);
  }
}

#[test]
fn randomized_configs_keep_invariants() {
  let mut rng = SmallRng::seed_from_u64(42);
  for _ in 0..50 {
    let config = SimulationConfig {
      launch_angle_deg: rng.gen_range(0.0..=90.0),
      launch_speed: rng.gen_range(0.05..3.0),
      emitter_height: rng.gen_range(0.1..2.0),
      emitter_arm_length: rng.gen_range(0.0..2.0),
      gravity: rng.gen_range(0.1..10.0),
      drag_coefficient: rng.gen_range(0.0..1.0),
      particles_per_burst: rng.gen_range(1..8),
      emission_rate: rng.gen_range(0.5..5.0),
      bounce_enabled: rng.gen(),
      deletion_distance: rng.gen_range(2.0..20.0),
      max_particles: if rng.gen() { Some(rng.gen_range(1..200)) } else { None },
      ..Default::default()
    };
    let dt = rng.gen_range(0.01..0.2);

    let mut sim = ParticleSimulation::new();
    let (mut emitted, mut gone) = (0, 0);
    for _ in 0..300 {
      let live = sim.advance(&config, dt);
      if config.bounce_enabled {
        assert!(live.iter().all(|p| p.distance_from_origin() <= config.deletion_distance
          || p.position().y == config.emitter_height));
      } else {
        assert!(live.iter().all(|p| p.position().y > config.deletion_height));
      }
      if let Some(cap) = config.max_particles {
        assert!(sim.len() <= cap);
      }
      let step = sim.last_step();
      emitted += step.emitted;
      gone += step.removed + step.evicted;
      assert_eq!(emitted - gone, sim.len());
    }
  }
}
