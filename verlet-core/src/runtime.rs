use crate::accel::Acceleration;
use crate::diagnostics::{first_non_finite, kinetic_energy};
use crate::ensemble::ParticleEnsemble;
use crate::error::{Error, Result};
use log::{info, warn};
use std::path::PathBuf;

/// Fixed-cadence run settings
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub dt: f64,
    pub steps: u64,
    /// Write a snapshot every this many steps; `None` disables output
    pub snapshot_every: Option<u64>,
    pub output_dir: PathBuf,
    pub prefix: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            steps: 1000,
            snapshot_every: None,
            output_dir: PathBuf::from("."),
            prefix: "snapshot".to_string(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.snapshot_every == Some(0) {
            return Err(Error::InvalidConfig(
                "snapshot interval must be at least 1".to_string(),
            ));
        }
        if self.snapshot_every.is_some() && self.prefix.is_empty() {
            return Err(Error::InvalidConfig(
                "snapshot prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Snapshot file for a given step, e.g. `out/snapshot_000120.bin`
    pub fn snapshot_path(&self, step: u64) -> PathBuf {
        self.output_dir.join(format!("{}_{:06}.bin", self.prefix, step))
    }
}

/// What a run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub steps: u64,
    pub snapshots: Vec<PathBuf>,
    pub kinetic_energy: f64,
}

/// Advance `ensemble` by `config.steps` steps, writing snapshots on the
/// configured cadence. Step numbers in file names are the ensemble's own
/// step count, so consecutive runs on one ensemble continue the sequence.
pub fn run<A: Acceleration + ?Sized>(
    ensemble: &mut ParticleEnsemble,
    accel: &A,
    config: &RunConfig,
) -> Result<RunSummary> {
    config.validate()?;

    let mut snapshots = Vec::new();
    let mut warned = false;
    let start = ensemble.step_count();

    write_if_due(ensemble, config, &mut snapshots)?;
    for _ in 0..config.steps {
        ensemble.update(accel, config.dt)?;

        if !warned {
            if let Some(i) = first_non_finite(ensemble) {
                warn!(
                    "particle {} has non-finite state at step {}",
                    i,
                    ensemble.step_count()
                );
                warned = true;
            }
        }

        write_if_due(ensemble, config, &mut snapshots)?;
    }

    let summary = RunSummary {
        steps: ensemble.step_count() - start,
        snapshots,
        kinetic_energy: kinetic_energy(ensemble.masses(), ensemble.velocities()),
    };
    info!(
        "ran {} steps, wrote {} snapshots, kinetic energy {:.6e}",
        summary.steps,
        summary.snapshots.len(),
        summary.kinetic_energy
    );
    Ok(summary)
}

fn write_if_due(
    ensemble: &ParticleEnsemble,
    config: &RunConfig,
    snapshots: &mut Vec<PathBuf>,
) -> Result<()> {
    if let Some(every) = config.snapshot_every {
        let step = ensemble.step_count();
        if step % every == 0 {
            let path = config.snapshot_path(step);
            ensemble.snapshot(&path)?;
            snapshots.push(path);
        }
    }
    Ok(())
}
