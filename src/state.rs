use crate::{Error, ParticleSimulation, SimulationConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// How long the headless frame loop runs and how chatty it is.
#[derive(Copy, Clone, Debug)]
pub struct RunOptions {
  /// Number of frames to simulate; 0 runs until interrupted.
  pub frames: u64,
  /// Log a progress line every this many frames; 0 disables progress lines.
  pub report_every: u64,
}

impl Default for RunOptions {
  fn default() -> Self {
    Self {
      frames: 600,
      report_every: 60,
    }
  }
}

/// Totals gathered over a run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
  pub frames: u64,
  pub emitted: u64,
  pub removed: u64,
  pub evicted: u64,
  pub peak_live: usize,
  pub final_live: usize,
}

/// Drives `sim` one frame per iteration with `config.time_step`, the way an
/// animation loop would, until the frame budget runs out or `stop` is set.
pub fn drive(
  sim: &mut ParticleSimulation,
  config: &SimulationConfig,
  options: RunOptions,
  stop: &AtomicBool,
) -> RunSummary {
  let mut summary = RunSummary::default();

  while (options.frames == 0 || summary.frames < options.frames) && !stop.load(Ordering::Relaxed) {
    let live = sim.advance(config, config.time_step).len();
    let step = sim.last_step();

    summary.frames += 1;
    summary.emitted += step.emitted as u64;
    summary.removed += step.removed as u64;
    summary.evicted += step.evicted as u64;
    summary.peak_live = summary.peak_live.max(live);

    if options.report_every != 0 && summary.frames % options.report_every == 0 {
      log::info!(
        "frame {}: {} live, {} emitted, {} removed",
        summary.frames,
        live,
        summary.emitted,
        summary.removed
      );
    }
  }

  summary.final_live = sim.len();
  summary
}

/// Runs a fresh simulation headless, stopping early on Ctrl-C.
pub fn run(config: SimulationConfig, options: RunOptions) -> Result<RunSummary, Error> {
  let stop = Arc::new(AtomicBool::new(false));
  let handler_stop = Arc::clone(&stop);
  ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed))?;

  log::info!("starting sprinkler with {config:?}");
  if config.max_particles.is_none() && config.bounce_enabled {
    log::warn!("bouncing without --max-particles: live particle count can grow without bound");
  }

  let mut sim = ParticleSimulation::new();
  let started = Instant::now();
  let summary = drive(&mut sim, &config, options, &stop);
  let elapsed = started.elapsed();

  let fps = summary.frames as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
  log::info!(
    "finished {} frames in {:.2?} ({fps:.0} frames/s), peak {} live, {} live at exit",
    summary.frames,
    elapsed,
    summary.peak_live,
    summary.final_live
  );
  Ok(summary)
}
