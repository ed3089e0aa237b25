//! Seeded initial conditions and acceleration laws selected from the command line

use clap::{Args, ValueEnum};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use verlet_core::laws::{Free, Gravity, Harmonic, Uniform};
use verlet_core::{Acceleration, ParticleEnsemble};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LawKind {
    /// No forces
    Free,
    /// Constant field along -z
    Uniform,
    /// Harmonic well centred at the origin
    Harmonic,
    /// Softened pairwise gravity
    Gravity,
}

#[derive(Debug, Args)]
pub struct ScenarioArgs {
    /// Acceleration law
    #[arg(long, value_enum, default_value_t = LawKind::Harmonic)]
    pub law: LawKind,

    /// Number of particles
    #[arg(short = 'n', long, default_value_t = 64)]
    pub particles: usize,

    /// Field strength, omega^2 or G depending on the law
    #[arg(long, default_value_t = 1.0)]
    pub strength: f64,

    /// Gravity softening length
    #[arg(long, default_value_t = 0.05)]
    pub softening: f64,

    /// Half-width of the cube initial positions are drawn from
    #[arg(long, default_value_t = 1.0)]
    pub extent: f64,

    /// Largest initial speed component
    #[arg(long, default_value_t = 0.1)]
    pub max_speed: f64,

    /// RNG seed for initial conditions
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Build the ensemble and the law that drives it
pub fn build(args: &ScenarioArgs) -> verlet_core::Result<(ParticleEnsemble, Box<dyn Acceleration>)> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let n = args.particles;

    let positions: Vec<DVec3> = (0..n).map(|_| random_vec(&mut rng, args.extent)).collect();
    let velocities: Vec<DVec3> = (0..n).map(|_| random_vec(&mut rng, args.max_speed)).collect();
    // Equal masses summing to one
    let masses = vec![if n > 0 { 1.0 / n as f64 } else { 0.0 }; n];

    let law: Box<dyn Acceleration> = match args.law {
        LawKind::Free => Box::new(Free),
        LawKind::Uniform => Box::new(Uniform(DVec3::new(0.0, 0.0, -args.strength))),
        LawKind::Harmonic => Box::new(Harmonic::new(args.strength)),
        LawKind::Gravity => Box::new(Gravity::new(args.strength, masses.clone(), args.softening)),
    };

    let ensemble = ParticleEnsemble::new(positions, velocities, masses, law.as_ref())?;
    Ok((ensemble, law))
}

fn random_vec(rng: &mut StdRng, half_width: f64) -> DVec3 {
    if half_width <= 0.0 {
        return DVec3::ZERO;
    }
    DVec3::new(
        rng.gen_range(-half_width..half_width),
        rng.gen_range(-half_width..half_width),
        rng.gen_range(-half_width..half_width),
    )
}
