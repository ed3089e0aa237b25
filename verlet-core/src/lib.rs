pub mod accel;
pub mod diagnostics;
pub mod ensemble;
pub mod error;
pub mod integrator;
pub mod laws;
pub mod runtime;
pub mod snapshot;

pub use accel::Acceleration;
pub use ensemble::ParticleEnsemble;
pub use error::{Error, Result};
pub use runtime::{run, RunConfig, RunSummary};
pub use snapshot::Snapshot;
