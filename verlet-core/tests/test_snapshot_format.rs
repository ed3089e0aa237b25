//! Snapshot layout, round trips and failure handling

use glam::DVec3;
use std::fs;
use verlet_core::laws::Harmonic;
use verlet_core::snapshot::encoded_len;
use verlet_core::tests::test_helpers::scratch_dir;
use verlet_core::{Error, ParticleEnsemble, Snapshot};

fn sample_ensemble(n: usize) -> ParticleEnsemble {
    let positions: Vec<DVec3> = (0..n)
        .map(|i| DVec3::new(i as f64 + 0.1, -(i as f64) / 3.0, 1e-300 * i as f64))
        .collect();
    let velocities: Vec<DVec3> = (0..n)
        .map(|i| DVec3::new(f64::MAX / (i as f64 + 1.0), 0.7, -(i as f64).sqrt()))
        .collect();
    ParticleEnsemble::new(positions, velocities, vec![1.0; n], &Harmonic::new(0.5)).unwrap()
}

fn f64_at(bytes: &[u8], offset: usize) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[offset..offset + 8]);
    f64::from_le_bytes(buf)
}

#[test]
fn test_layout_matches_format() {
    let dir = scratch_dir("layout").unwrap();
    let path = dir.join("state.bin");
    let ensemble = sample_ensemble(4);

    ensemble.snapshot(&path).unwrap();
    let bytes = fs::read(&path).unwrap();

    assert_eq!(bytes.len(), 4 + 48 * 4);
    assert_eq!(bytes.len(), encoded_len(4));
    assert_eq!(&bytes[0..4], &4i32.to_le_bytes());

    for (i, p) in ensemble.positions().iter().enumerate() {
        let base = 4 + 24 * i;
        assert_eq!(f64_at(&bytes, base).to_bits(), p.x.to_bits());
        assert_eq!(f64_at(&bytes, base + 8).to_bits(), p.y.to_bits());
        assert_eq!(f64_at(&bytes, base + 16).to_bits(), p.z.to_bits());
    }
    for (i, v) in ensemble.velocities().iter().enumerate() {
        let base = 4 + 24 * 4 + 24 * i;
        assert_eq!(f64_at(&bytes, base).to_bits(), v.x.to_bits());
        assert_eq!(f64_at(&bytes, base + 8).to_bits(), v.y.to_bits());
        assert_eq!(f64_at(&bytes, base + 16).to_bits(), v.z.to_bits());
    }
}

#[test]
fn test_round_trip_is_bit_exact() {
    let dir = scratch_dir("round_trip").unwrap();
    let path = dir.join("state.bin");
    let mut ensemble = sample_ensemble(7);
    let law = Harmonic::new(0.5);
    for _ in 0..3 {
        ensemble.update(&law, 0.013).unwrap();
    }

    ensemble.snapshot(&path).unwrap();
    let snapshot = Snapshot::read_from(&path).unwrap();

    assert_eq!(snapshot.len(), 7);
    for (a, b) in snapshot.positions.iter().zip(ensemble.positions()) {
        assert_eq!(a.to_array().map(f64::to_bits), b.to_array().map(f64::to_bits));
    }
    for (a, b) in snapshot.velocities.iter().zip(ensemble.velocities()) {
        assert_eq!(a.to_array().map(f64::to_bits), b.to_array().map(f64::to_bits));
    }
}

#[test]
fn test_repeated_snapshots_are_identical() {
    let dir = scratch_dir("repeat").unwrap();
    let first = dir.join("a.bin");
    let second = dir.join("b.bin");
    let ensemble = sample_ensemble(5);

    ensemble.snapshot(&first).unwrap();
    ensemble.snapshot(&second).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_snapshot_overwrites_existing_file() {
    let dir = scratch_dir("overwrite").unwrap();
    let path = dir.join("state.bin");
    fs::write(&path, vec![0xAB; 1000]).unwrap();

    sample_ensemble(2).snapshot(&path).unwrap();

    assert_eq!(fs::metadata(&path).unwrap().len(), encoded_len(2) as u64);
    // No temp files left behind
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
}

#[test]
fn test_snapshot_leaves_neighbouring_tmp_file_alone() {
    let dir = scratch_dir("neighbour_tmp").unwrap();
    let path = dir.join("state.bin");
    let neighbour = dir.join("state.bin.tmp");
    fs::write(&neighbour, b"user data").unwrap();

    let ensemble = sample_ensemble(3);
    ensemble.snapshot(&path).unwrap();
    ensemble.snapshot(&path).unwrap();

    assert_eq!(fs::read(&neighbour).unwrap(), b"user data");
    assert_eq!(fs::metadata(&path).unwrap().len(), encoded_len(3) as u64);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 2);
}

#[test]
fn test_concurrent_writers_to_one_destination() {
    let dir = scratch_dir("concurrent").unwrap();
    let path = dir.join("state.bin");
    let ensemble = sample_ensemble(64);
    let expected = Snapshot {
        positions: ensemble.positions().to_vec(),
        velocities: ensemble.velocities().to_vec(),
    };

    std::thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| ensemble.snapshot(&path).unwrap());
        }
    });

    assert_eq!(Snapshot::read_from(&path).unwrap(), expected);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
}

#[test]
fn test_empty_ensemble_snapshot() {
    let dir = scratch_dir("empty").unwrap();
    let path = dir.join("empty.bin");
    let ensemble = sample_ensemble(0);

    ensemble.snapshot(&path).unwrap();

    assert_eq!(fs::read(&path).unwrap(), vec![0, 0, 0, 0]);
    assert!(Snapshot::read_from(&path).unwrap().is_empty());
}

#[test]
fn test_unwritable_destination_is_io_error() {
    let dir = scratch_dir("unwritable").unwrap();
    let path = dir.join("missing").join("state.bin");

    let err = sample_ensemble(3).snapshot(&path).unwrap_err();

    match err {
        Error::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("Expected Io, got {:?}", other),
    }
    assert!(!path.exists());
}

#[test]
fn test_decode_rejects_truncated_input() {
    let snapshot = Snapshot {
        positions: vec![DVec3::ONE; 3],
        velocities: vec![DVec3::NEG_ONE; 3],
    };
    let mut encoded = snapshot.encode().unwrap();
    encoded.pop();

    assert!(matches!(Snapshot::decode(&encoded), Err(Error::InvalidSnapshot(_))));
    assert!(matches!(Snapshot::decode(&[1, 0]), Err(Error::InvalidSnapshot(_))));
}

#[test]
fn test_decode_rejects_trailing_bytes() {
    let snapshot = Snapshot {
        positions: vec![DVec3::ONE],
        velocities: vec![DVec3::ZERO],
    };
    let mut encoded = snapshot.encode().unwrap();
    encoded.push(0);

    assert!(matches!(Snapshot::decode(&encoded), Err(Error::InvalidSnapshot(_))));
}

#[test]
fn test_decode_rejects_negative_count() {
    let encoded = (-1i32).to_le_bytes();

    let err = Snapshot::decode(&encoded).unwrap_err();

    assert!(err.to_string().contains("negative"));
}

#[test]
fn test_encode_rejects_mismatched_lengths() {
    let snapshot = Snapshot {
        positions: vec![DVec3::ONE; 2],
        velocities: vec![DVec3::ONE; 1],
    };

    assert!(matches!(snapshot.encode(), Err(Error::LengthMismatch { .. })));
}

#[test]
fn test_decode_of_encode_preserves_snapshot() {
    let snapshot = Snapshot {
        positions: vec![DVec3::new(1.5, f64::MIN_POSITIVE, -0.0), DVec3::new(1e10, -1e-10, 3.0)],
        velocities: vec![DVec3::new(f64::INFINITY, 2.0, -2.0), DVec3::ZERO],
    };

    let decoded = Snapshot::decode(&snapshot.encode().unwrap()).unwrap();

    assert_eq!(decoded, snapshot);
    assert!(decoded.positions[0].z.is_sign_negative());
}
