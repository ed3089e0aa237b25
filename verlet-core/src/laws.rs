//! Stock acceleration laws
//!
//! These are ordinary implementors of [`Acceleration`]; the ensemble does not
//! depend on any of them. Mass effects are folded in here, so each law that
//! needs masses carries its own copy. A law built for a different particle
//! count returns one vector per particle it knows about, which the ensemble
//! rejects as a length mismatch.

use crate::accel::Acceleration;
use crate::error::{Error, Result};
use glam::DVec3;
use rayon::prelude::*;

/// No forces: every particle coasts
#[derive(Debug, Clone, Copy, Default)]
pub struct Free;

impl Acceleration for Free {
    fn accelerations(&self, positions: &[DVec3]) -> Vec<DVec3> {
        vec![DVec3::ZERO; positions.len()]
    }
}

/// The same acceleration for every particle, e.g. surface gravity
#[derive(Debug, Clone, Copy)]
pub struct Uniform(pub DVec3);

impl Acceleration for Uniform {
    fn accelerations(&self, positions: &[DVec3]) -> Vec<DVec3> {
        vec![self.0; positions.len()]
    }
}

/// Isotropic harmonic well: `a = -omega_sq * (x - centre)`
#[derive(Debug, Clone, Copy)]
pub struct Harmonic {
    /// k / m
    pub omega_sq: f64,
    pub centre: DVec3,
}

impl Harmonic {
    pub fn new(omega_sq: f64) -> Self {
        Self {
            omega_sq,
            centre: DVec3::ZERO,
        }
    }
}

impl Acceleration for Harmonic {
    fn accelerations(&self, positions: &[DVec3]) -> Vec<DVec3> {
        positions
            .iter()
            .map(|p| -self.omega_sq * (*p - self.centre))
            .collect()
    }
}

/// A spring between two particles
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    pub a: usize, // particle index
    pub b: usize, // particle index
    pub k: f64,
    pub rest: f64,
}

/// Hookean springs between particle pairs
#[derive(Debug, Clone)]
pub struct Springs {
    springs: Vec<Spring>,
    masses: Vec<f64>,
}

impl Springs {
    /// The length of `masses` is the particle count; every spring must
    /// join two particles below it.
    pub fn new(springs: Vec<Spring>, masses: Vec<f64>) -> Result<Self> {
        let n = masses.len();
        if let Some(s) = springs.iter().find(|s| s.a >= n || s.b >= n) {
            return Err(Error::InvalidLaw(format!(
                "spring ({}, {}) out of range for {} particles",
                s.a, s.b, n
            )));
        }
        Ok(Self { springs, masses })
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }
}

impl Acceleration for Springs {
    fn accelerations(&self, positions: &[DVec3]) -> Vec<DVec3> {
        // Built for a different particle count; the wrong length is reported by the caller
        if positions.len() != self.masses.len() {
            return vec![DVec3::ZERO; self.masses.len()];
        }

        let mut out = vec![DVec3::ZERO; positions.len()];

        for s in &self.springs {
            let r = positions[s.b] - positions[s.a];
            let dist = r.length();
            if dist > 0.0 {
                // Positive when stretched: pulls a toward b
                let force = r / dist * (s.k * (dist - s.rest));
                out[s.a] += force / self.masses[s.a];
                out[s.b] -= force / self.masses[s.b];
            }
        }

        out
    }
}

/// Pairwise Newtonian gravity with Plummer softening
#[derive(Debug, Clone)]
pub struct Gravity {
    g: f64,
    masses: Vec<f64>,
    softening: f64,
}

impl Gravity {
    /// `softening` is a length; it keeps close encounters finite
    pub fn new(g: f64, masses: Vec<f64>, softening: f64) -> Self {
        Self {
            g,
            masses,
            softening,
        }
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }
}

impl Acceleration for Gravity {
    fn accelerations(&self, positions: &[DVec3]) -> Vec<DVec3> {
        if positions.len() != self.masses.len() {
            return vec![DVec3::ZERO; self.masses.len()];
        }

        let eps_sq = self.softening * self.softening;

        (0..positions.len())
            .into_par_iter()
            .map(|i| {
                let mut acc = DVec3::ZERO;
                for (j, other) in positions.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let r = *other - positions[i];
                    let dist_sq = r.length_squared() + eps_sq;
                    if dist_sq > 0.0 {
                        acc += r * (self.g * self.masses[j] / (dist_sq * dist_sq.sqrt()));
                    }
                }
                acc
            })
            .collect()
    }
}
