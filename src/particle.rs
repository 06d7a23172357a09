use crate::Color;
use cgmath::{InnerSpace, Vector3};

/// How a particle is drawn. Fixed when the particle is emitted.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Appearance {
  pub color: Color,
  pub radius: f64,
}

/// A single projectile shot out of the sprinkler.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
  position: Vector3<f64>,
  velocity: Vector3<f64>,
  appearance: Appearance,
}

impl Particle {
  pub fn new(position: Vector3<f64>, velocity: Vector3<f64>, appearance: Appearance) -> Self {
    Self {
      position,
      velocity,
      appearance,
    }
  }

  pub fn position(&self) -> Vector3<f64> {
    self.position
  }

  pub fn velocity(&self) -> Vector3<f64> {
    self.velocity
  }

  pub fn appearance(&self) -> Appearance {
    self.appearance
  }

  /// Distance from the world origin.
  pub fn distance_from_origin(&self) -> f64 {
    self.position.magnitude()
  }

  /// Advances the particle by one step of `dt`.
  ///
  /// Drag scales the whole velocity first. The height then moves with the
  /// pre-gravity vertical speed plus the `-g dt^2 / 2` term, and only after
  /// that is gravity taken off the vertical speed, which keeps the height on
  /// the exact ballistic curve for any fixed `dt`.
  pub fn integrate(&mut self, gravity: f64, drag_coefficient: f64, dt: f64) {
    if drag_coefficient != 0.0 {
      self.velocity *= (1.0 - drag_coefficient * dt).max(0.0);
    }

    self.position.x += self.velocity.x * dt;
    self.position.z += self.velocity.z * dt;

    self.position.y += self.velocity.y * dt - 0.5 * gravity * dt * dt;
    self.velocity.y -= gravity * dt;
  }

  /// Flips the vertical speed, keeping its magnitude.
  pub fn reflect_vertical(&mut self) {
    self.velocity.y = -self.velocity.y;
  }

  pub fn instance(&self) -> ParticleInstance {
    ParticleInstance {
      position: [
        self.position.x as f32,
        self.position.y as f32,
        self.position.z as f32,
      ],
      radius: self.appearance.radius as f32,
      color: self.appearance.color.to_array(),
      _pad: 0.0,
    }
  }
}

/// Per-instance record a renderer can copy straight into a vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
  pub position: [f32; 3],
  pub radius: f32,
  pub color: [f32; 3],
  _pad: f32,
}
