use thiserror::Error;

/// Failures outside the simulation core. Stepping the simulation itself never fails.
#[derive(Error, Debug)]
pub enum Error {
  #[error("invalid color {0:?}, expected #rrggbb or #rgb")]
  InvalidColor(String),

  #[error("failed to install Ctrl-C handler: {0}")]
  SignalHandler(#[from] ctrlc::Error),
}
