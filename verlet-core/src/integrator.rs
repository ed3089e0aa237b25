//! Per-particle stages of the Velocity Verlet step
//!
//! The acceleration recompute sits between [`drift_and_kick`] and
//! [`kick`]; it is driven by [`crate::ensemble::ParticleEnsemble::update`].
//! Each stage is a parallel map over particle indices and returns only
//! after every particle is done.

use glam::DVec3;
use rayon::prelude::*;

/// First stage: advance positions a full step with the old accelerations,
/// then apply the first half-kick from the same accelerations.
pub fn drift_and_kick(
    positions: &mut [DVec3],
    velocities: &mut [DVec3],
    accelerations: &[DVec3],
    dt: f64,
) {
    let half_dt_sq = 0.5 * dt * dt;
    let half_dt = 0.5 * dt;

    positions
        .par_iter_mut()
        .zip(velocities.par_iter_mut())
        .zip(accelerations.par_iter())
        .for_each(|((pos, vel), acc)| {
            *pos += *vel * dt + *acc * half_dt_sq;
            *vel += *acc * half_dt;
        });
}

/// Second half-kick, using accelerations evaluated at the new positions
pub fn kick(velocities: &mut [DVec3], accelerations: &[DVec3], dt: f64) {
    let half_dt = 0.5 * dt;

    velocities
        .par_iter_mut()
        .zip(accelerations.par_iter())
        .for_each(|(vel, acc)| {
            *vel += *acc * half_dt;
        });
}
