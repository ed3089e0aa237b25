//! The acceleration contract consumed by the ensemble
//!
//! An acceleration law maps the full set of current positions to one
//! acceleration per particle. Any `Fn(&[DVec3]) -> Vec<DVec3>` qualifies,
//! so callers can pass closures directly; the stock laws in
//! [`crate::laws`] implement the trait by hand.

use crate::error::{Error, Result};
use glam::DVec3;

/// Positions in, accelerations out. Must be deterministic and return
/// exactly one vector per input position.
pub trait Acceleration {
    fn accelerations(&self, positions: &[DVec3]) -> Vec<DVec3>;
}

impl<F> Acceleration for F
where
    F: Fn(&[DVec3]) -> Vec<DVec3>,
{
    fn accelerations(&self, positions: &[DVec3]) -> Vec<DVec3> {
        self(positions)
    }
}

/// Evaluate `accel` and reject results whose length differs from the input
pub fn evaluate<A: Acceleration + ?Sized>(accel: &A, positions: &[DVec3]) -> Result<Vec<DVec3>> {
    let out = accel.accelerations(positions);
    if out.len() != positions.len() {
        return Err(Error::AccelLength {
            expected: positions.len(),
            actual: out.len(),
        });
    }
    Ok(out)
}
