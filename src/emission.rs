use crate::{Appearance, Particle, SimulationConfig};
use cgmath::Vector3;
use std::f64::consts::PI;

/// Slack on the burst threshold, in ulps of the larger of the rotation angle
/// and the threshold. Rounding in the accumulated angle grows with the angle
/// itself, so a due burst must not be skipped late in a long run.
const BURST_TOLERANCE_ULPS: f64 = 16.0;

/// Whether a burst is due after the emitter has turned `elapsed` since the
/// last one and now stands at `rotation_angle`.
///
/// A stationary or backwards-turning emitter never fires.
pub fn burst_due(elapsed: f64, rotation_angle: f64, dt: f64, emission_rate: f64) -> bool {
  let threshold = dt * emission_rate;
  let scale = rotation_angle.abs().max(threshold.abs());
  let slack = scale * f64::EPSILON * BURST_TOLERANCE_ULPS;
  elapsed > 0.0 && elapsed + slack >= threshold
}

/// Azimuth of the `index`-th particle of an `count`-particle burst.
pub fn burst_azimuth(rotation_angle: f64, index: u32, count: u32) -> f64 {
  rotation_angle + (2.0 * PI) / count as f64 * index as f64
}

/// Launch point on the emitter ring, in cylindrical coordinates around the y axis.
pub fn launch_position(config: &SimulationConfig, azimuth: f64) -> Vector3<f64> {
  let arm = config.emitter_arm_length / 2.0;
  Vector3::new(
    arm * azimuth.cos(),
    config.emitter_height,
    arm * azimuth.sin(),
  )
}

/// Launch velocity in spherical coordinates. The polar angle is measured from
/// the vertical, so a 90 degree launch angle fires straight up.
pub fn launch_velocity(config: &SimulationConfig, azimuth: f64) -> Vector3<f64> {
  let polar = (90.0 - config.launch_angle_deg).to_radians();
  let horizontal = config.launch_speed * polar.sin();
  Vector3::new(
    horizontal * azimuth.cos(),
    config.launch_speed * polar.cos(),
    horizontal * azimuth.sin(),
  )
}

/// Builds the particles of one burst, spaced evenly around a full turn and
/// rotated by the current emitter angle.
#[must_use]
pub fn burst(config: &SimulationConfig, rotation_angle: f64) -> Vec<Particle> {
  let count = config.particles_per_burst;
  let appearance = Appearance {
    color: config.color,
    radius: config.particle_radius,
  };
  (0..count)
    .map(|i| {
      let azimuth = burst_azimuth(rotation_angle, i, count);
      Particle::new(
        launch_position(config, azimuth),
        launch_velocity(config, azimuth),
        appearance,
      )
    })
    .collect()
}
