//! Binary snapshot codec
//!
//! Layout, little-endian, no header:
//!
//! ```text
//! offset 0        i32          particle count N
//! offset 4        N x 3 x f64  positions, particle-major
//! offset 4 + 24N  N x 3 x f64  velocities, particle-major
//! ```
//!
//! Files are written to a fresh, uniquely named sibling `.tmp` file and
//! renamed into place, so a destination either holds a complete artifact or
//! is left untouched, and existing files next to it are never reused.

use crate::error::{Error, Result};
use glam::DVec3;
use log::debug;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

const COUNT_BYTES: usize = 4;
const VEC3_BYTES: usize = 3 * 8;

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Size in bytes of a snapshot holding `n` particles
pub fn encoded_len(n: usize) -> usize {
    COUNT_BYTES + 2 * VEC3_BYTES * n
}

/// Positions and velocities as read back from a snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub positions: Vec<DVec3>,
    pub velocities: Vec<DVec3>,
}

impl Snapshot {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_parts(&self.positions, &self.velocities)
    }

    /// Parse a complete artifact. Truncated input and trailing bytes are both rejected.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < COUNT_BYTES {
            return Err(Error::InvalidSnapshot(format!(
                "{} bytes is too short for the particle count",
                bytes.len()
            )));
        }

        let mut count = [0u8; COUNT_BYTES];
        count.copy_from_slice(&bytes[..COUNT_BYTES]);
        let n = i32::from_le_bytes(count);
        if n < 0 {
            return Err(Error::InvalidSnapshot(format!("negative particle count {}", n)));
        }
        let n = n as usize;

        let expected = encoded_len(n);
        if bytes.len() != expected {
            return Err(Error::InvalidSnapshot(format!(
                "{} particles need {} bytes, found {}",
                n,
                expected,
                bytes.len()
            )));
        }

        let split = COUNT_BYTES + VEC3_BYTES * n;
        Ok(Self {
            positions: read_vec3s(&bytes[COUNT_BYTES..split]),
            velocities: read_vec3s(&bytes[split..]),
        })
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_parts(path, &self.positions, &self.velocities)
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        Self::decode(&bytes)
    }
}

/// Encode borrowed position and velocity slices without building a [`Snapshot`]
pub fn encode_parts(positions: &[DVec3], velocities: &[DVec3]) -> Result<Vec<u8>> {
    let n = positions.len();
    if velocities.len() != n {
        return Err(Error::LengthMismatch {
            field: "velocities",
            expected: n,
            actual: velocities.len(),
        });
    }
    let count = i32::try_from(n).map_err(|_| Error::TooManyParticles(n))?;

    let mut out = Vec::with_capacity(encoded_len(n));
    out.extend_from_slice(&count.to_le_bytes());
    for v in positions.iter().chain(velocities) {
        out.extend_from_slice(&v.x.to_le_bytes());
        out.extend_from_slice(&v.y.to_le_bytes());
        out.extend_from_slice(&v.z.to_le_bytes());
    }
    Ok(out)
}

/// Encode and atomically write a snapshot, replacing any existing file
pub fn write_parts(path: impl AsRef<Path>, positions: &[DVec3], velocities: &[DVec3]) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_parts(positions, velocities)?;
    write_atomic(path, &bytes)?;
    debug!(
        "wrote snapshot {} ({} particles, {} bytes)",
        path.display(),
        positions.len(),
        bytes.len()
    );
    Ok(())
}

/// Unique sibling of `path`: `<name>.<pid>.<seq>.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(format!(".{}.{}.tmp", process::id(), seq));
    PathBuf::from(name)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path(path);

    // create_new: a file already sitting at the temp name is left alone
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp)
        .map_err(|e| Error::io(path, e))?;
    let written = file.write_all(bytes).and_then(|()| file.sync_all());
    drop(file);

    if let Err(e) = written.and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(path, e));
    }
    Ok(())
}

fn read_f64(bytes: &[u8]) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    f64::from_le_bytes(buf)
}

fn read_vec3s(bytes: &[u8]) -> Vec<DVec3> {
    bytes
        .chunks_exact(VEC3_BYTES)
        .map(|c| DVec3::new(read_f64(&c[0..8]), read_f64(&c[8..16]), read_f64(&c[16..24])))
        .collect()
}
