use crate::emission;
use crate::{Particle, ParticleInstance, SimulationConfig};
use std::collections::VecDeque;

/// Rotation of the sprinkler head.
///
/// The angle grows by the step size on every call and is never wrapped; it is
/// only ever fed to trig functions.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EmitterState {
  pub rotation_angle: f64,
  pub angle_at_last_emission: f64,
}

/// What the most recent [`ParticleSimulation::advance`] did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
  pub integrated: usize,
  pub removed: usize,
  pub emitted: usize,
  pub evicted: usize,
}

/// Owns the live particles and the emitter, and moves both forward one frame at a time.
#[derive(Clone, Debug, Default)]
pub struct ParticleSimulation {
  /// Oldest first. Kept contiguous between calls so it can be lent out as a slice.
  particles: VecDeque<Particle>,
  emitter: EmitterState,
  last_step: StepStats,
}

impl ParticleSimulation {
  pub fn new() -> Self {
    Self::default()
  }

  /// Runs one frame: integrate and cull, emit, then apply the particle cap.
  ///
  /// Particles emitted here are not integrated until the next call, so their
  /// first visible position is exactly their launch point. The emitter turns
  /// before it fires, so the first burst leaves at angle `dt`, not 0.
  pub fn advance(&mut self, config: &SimulationConfig, dt: f64) -> &[Particle] {
    let integrated = self.particles.len();
    self.integrate_and_cull(config, dt);
    let removed = integrated - self.particles.len();

    let emitted = self.emit(config, dt);
    let evicted = self.enforce_capacity(config.max_particles);

    self.last_step = StepStats {
      integrated,
      removed,
      emitted,
      evicted,
    };
    log::trace!("step {:?}, {} live", self.last_step, self.particles.len());

    self.particles.make_contiguous()
  }

  fn integrate_and_cull(&mut self, config: &SimulationConfig, dt: f64) {
    let SimulationConfig {
      gravity,
      drag_coefficient,
      bounce_enabled,
      deletion_height,
      deletion_distance,
      ..
    } = *config;

    self.particles.retain_mut(|p| {
      p.integrate(gravity, drag_coefficient, dt);
      if !bounce_enabled {
        return p.position().y > deletion_height;
      }
      if p.position().y <= deletion_height {
        p.reflect_vertical();
      }
      p.distance_from_origin() <= deletion_distance
    });
  }

  fn emit(&mut self, config: &SimulationConfig, dt: f64) -> usize {
    self.emitter.rotation_angle += dt;
    let elapsed = self.emitter.rotation_angle - self.emitter.angle_at_last_emission;
    if !emission::burst_due(elapsed, self.emitter.rotation_angle, dt, config.emission_rate) {
      return 0;
    }

    self.emitter.angle_at_last_emission = self.emitter.rotation_angle;
    let burst = emission::burst(config, self.emitter.rotation_angle);
    let emitted = burst.len();
    log::debug!(
      "burst of {emitted} at angle {:.4}",
      self.emitter.rotation_angle
    );
    self.particles.extend(burst);
    emitted
  }

  /// Drops the oldest particles from the front until at most `max` remain.
  fn enforce_capacity(&mut self, max: Option<usize>) -> usize {
    match max {
      Some(max) if self.particles.len() > max => {
        let excess = self.particles.len() - max;
        self.particles.drain(..excess);
        excess
      }
      _ => 0,
    }
  }

  /// Clears every particle and rewinds the emitter.
  pub fn reset(&mut self) {
    *self = Self::default();
  }

  pub fn particles(&self) -> &[Particle] {
    let (live, wrapped) = self.particles.as_slices();
    debug_assert!(wrapped.is_empty());
    live
  }

  pub fn len(&self) -> usize {
    self.particles.len()
  }

  pub fn is_empty(&self) -> bool {
    self.particles.is_empty()
  }

  pub fn emitter(&self) -> EmitterState {
    self.emitter
  }

  pub fn last_step(&self) -> StepStats {
    self.last_step
  }

  pub fn instances(&self) -> Vec<ParticleInstance> {
    self.particles.iter().map(Particle::instance).collect()
  }
}
