//! Read-only checks on ensemble state
//!
//! Non-finite values coming out of an acceleration law are not scrubbed by
//! the integrator; these helpers are how a driver notices them.

use crate::ensemble::ParticleEnsemble;
use glam::DVec3;

/// Total kinetic energy, sum of 1/2 m |v|^2
pub fn kinetic_energy(masses: &[f64], velocities: &[DVec3]) -> f64 {
    masses
        .iter()
        .zip(velocities)
        .map(|(m, v)| 0.5 * m * v.length_squared())
        .sum()
}

/// Mass-weighted mean position, or `None` when the total mass is zero
pub fn centre_of_mass(masses: &[f64], positions: &[DVec3]) -> Option<DVec3> {
    let total: f64 = masses.iter().sum();
    if total == 0.0 {
        return None;
    }
    let weighted = masses
        .iter()
        .zip(positions)
        .fold(DVec3::ZERO, |acc, (m, p)| acc + *p * *m);
    Some(weighted / total)
}

/// Index of the first particle with a NaN or infinite position, velocity or acceleration
pub fn first_non_finite(ensemble: &ParticleEnsemble) -> Option<usize> {
    (0..ensemble.len()).find(|&i| {
        !(ensemble.positions()[i].is_finite()
            && ensemble.velocities()[i].is_finite()
            && ensemble.accelerations()[i].is_finite())
    })
}
