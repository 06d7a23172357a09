pub mod emission;
pub mod error;
pub mod particle;
pub mod simulation;
pub mod state;

pub use error::Error;
pub use particle::{Appearance, Particle, ParticleInstance};
pub use simulation::{EmitterState, ParticleSimulation, StepStats};

use std::fmt;
use std::str::FromStr;

/// Per-frame snapshot of everything that shapes emission and motion.
///
/// The simulation only reads it; the host may change any field between calls.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SimulationConfig {
  /// Elevation of the launch direction in degrees: 90 is straight up, 0 is horizontal.
  pub launch_angle_deg: f64,
  pub launch_speed: f64,
  pub emitter_height: f64,
  /// Distance between two opposite emission points; each sits half of it from the axis.
  pub emitter_arm_length: f64,
  /// Magnitude of the downward acceleration.
  pub gravity: f64,
  pub drag_coefficient: f64,
  pub time_step: f64,
  pub particles_per_burst: u32,
  /// Bursts per unit of rotation angle.
  pub emission_rate: f64,
  pub bounce_enabled: bool,
  pub deletion_height: f64,
  /// Only consulted when bouncing.
  pub deletion_distance: f64,
  pub color: Color,
  pub particle_radius: f64,
  /// Oldest particles are evicted past this count. `None` never caps.
  pub max_particles: Option<usize>,
}

impl Default for SimulationConfig {
  fn default() -> Self {
    Self {
      launch_angle_deg: 45.0,
      launch_speed: 0.1,
      emitter_height: 0.5,
      emitter_arm_length: 1.0,
      gravity: 1.0,
      drag_coefficient: 0.0,
      time_step: 0.1,
      particles_per_burst: 2, // the two opposite sprinkler arms
      emission_rate: 1.0,
      bounce_enabled: false,
      deletion_height: 0.0,
      deletion_distance: 10.0,
      color: Color::WHITE,
      particle_radius: 0.1,
      max_particles: None,
    }
  }
}

/// Linear RGB color with channels in `0.0..=1.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
  pub r: f32,
  pub g: f32,
  pub b: f32,
}

impl Color {
  pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

  pub const fn new(r: f32, g: f32, b: f32) -> Self {
    Self { r, g, b }
  }

  pub fn to_array(self) -> [f32; 3] {
    [self.r, self.g, self.b]
  }
}

impl FromStr for Color {
  type Err = Error;

  /// Parses `#rrggbb`, `rrggbb`, `#rgb` or `rgb`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || Error::InvalidColor(s.to_string());
    let hex = s.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
      return Err(invalid());
    }

    let channel = |digits: &str| -> Result<f32, Error> {
      let value = u8::from_str_radix(digits, 16).map_err(|_| invalid())?;
      Ok(value as f32 / 255.0)
    };

    match hex.len() {
      6 => Ok(Color::new(
        channel(&hex[0..2])?,
        channel(&hex[2..4])?,
        channel(&hex[4..6])?,
      )),
      3 => {
        // #abc is shorthand for #aabbcc
        let expand = |i: usize| hex[i..i + 1].repeat(2);
        Ok(Color::new(
          channel(&expand(0))?,
          channel(&expand(1))?,
          channel(&expand(2))?,
        ))
      }
      _ => Err(invalid()),
    }
  }
}

impl fmt::Display for Color {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    write!(f, "#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
  }
}
