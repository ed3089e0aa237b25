use crate::accel::{evaluate, Acceleration};
use crate::error::{Error, Result};
use crate::integrator::{drift_and_kick, kick};
use crate::snapshot;
use glam::DVec3;
use log::{debug, trace};
use std::path::Path;

/// A fixed set of point particles advanced with Velocity Verlet.
///
/// Positions, velocities and accelerations always have the same length and
/// share indices. Accelerations are always those of the current positions:
/// they are filled at construction and replaced only by [`update`](Self::update).
#[derive(Debug, Clone)]
pub struct ParticleEnsemble {
    positions: Vec<DVec3>,
    velocities: Vec<DVec3>,
    accelerations: Vec<DVec3>,
    masses: Vec<f64>,
    steps: u64,
}

impl ParticleEnsemble {
    /// Take ownership of the initial state and evaluate `accel` once.
    ///
    /// The length of `positions` is the particle count; `velocities` and
    /// `masses` must match it.
    pub fn new<A: Acceleration + ?Sized>(
        positions: Vec<DVec3>,
        velocities: Vec<DVec3>,
        masses: Vec<f64>,
        accel: &A,
    ) -> Result<Self> {
        let n = positions.len();
        check_len("velocities", n, velocities.len())?;
        check_len("masses", n, masses.len())?;

        let accelerations = evaluate(accel, &positions)?;
        debug!("ensemble created with {} particles", n);

        Ok(Self {
            positions,
            velocities,
            accelerations,
            masses,
            steps: 0,
        })
    }

    /// Advance one Velocity Verlet step of size `dt`.
    ///
    /// The position drift and first half-kick use the accelerations of the
    /// old positions, the second half-kick uses `accel` evaluated at the new
    /// ones. If `accel` returns the wrong number of vectors the ensemble is
    /// left exactly as it was.
    pub fn update<A: Acceleration + ?Sized>(&mut self, accel: &A, dt: f64) -> Result<()> {
        let mut positions = self.positions.clone();
        let mut velocities = self.velocities.clone();

        drift_and_kick(&mut positions, &mut velocities, &self.accelerations, dt);
        let accelerations = evaluate(accel, &positions)?;
        kick(&mut velocities, &accelerations, dt);

        self.positions = positions;
        self.velocities = velocities;
        self.accelerations = accelerations;
        self.steps += 1;
        trace!("step {} done (dt = {})", self.steps, dt);
        Ok(())
    }

    /// Write particle count, positions and velocities to `path`, replacing
    /// any existing file. See [`crate::snapshot`] for the layout.
    pub fn snapshot(&self, path: impl AsRef<Path>) -> Result<()> {
        snapshot::write_parts(path, &self.positions, &self.velocities)
    }

    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    pub fn velocities(&self) -> &[DVec3] {
        &self.velocities
    }

    pub fn accelerations(&self) -> &[DVec3] {
        &self.accelerations
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Number of successful `update` calls so far
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<()> {
    if actual != expected {
        return Err(Error::LengthMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
