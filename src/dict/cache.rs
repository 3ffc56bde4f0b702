//! Binary sidecar cache for dictionary sources.
//!
//! Layout: magic + version + crc32 of the JSON source + body length +
//! bincode-encoded entries. The stored hash ties a cache to the exact source
//! bytes it was built from; any mismatch forces a rebuild.

use std::fs::{self, File};
use std::path::Path;

use memmap2::Mmap;

use super::store::DictEntry;
use crate::error::DictError;

const MAGIC: &[u8; 4] = b"MIDX";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 4 + 1 + 4 + 4;

pub fn source_hash(source: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(source);
    hasher.finalize()
}

pub fn encode(hash: u32, entries: &[DictEntry]) -> Result<Vec<u8>, DictError> {
    let body = bincode::serialize(entries).map_err(|e| DictError::Encode(e.to_string()))?;
    let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&hash.to_le_bytes());
    buf.extend_from_slice(&(body.len() as u32).to_le_bytes());
    buf.extend_from_slice(&body);
    Ok(buf)
}

pub fn decode(data: &[u8], expected_hash: u32) -> Result<Vec<DictEntry>, DictError> {
    if data.len() < 5 {
        return Err(DictError::InvalidHeader);
    }
    if &data[..4] != MAGIC {
        return Err(DictError::InvalidMagic);
    }
    if data[4] != VERSION {
        return Err(DictError::UnsupportedVersion(data[4]));
    }
    if data.len() < HEADER_SIZE {
        return Err(DictError::InvalidHeader);
    }
    let hash = u32::from_le_bytes(data[5..9].try_into().unwrap());
    if hash != expected_hash {
        return Err(DictError::HashMismatch);
    }
    let body_len = u32::from_le_bytes(data[9..13].try_into().unwrap()) as usize;
    if data.len() < HEADER_SIZE + body_len {
        return Err(DictError::InvalidHeader);
    }
    bincode::deserialize(&data[HEADER_SIZE..HEADER_SIZE + body_len])
        .map_err(|e| DictError::Decode(e.to_string()))
}

/// Read a cache file, validating it against the source hash.
///
/// The file is mapped rather than read so a warm load does not double peak
/// memory; the mapping is dropped once entries are decoded.
pub fn read(path: &Path, expected_hash: u32) -> Result<Vec<DictEntry>, DictError> {
    let file = File::open(path)?;
    // SAFETY: read-only mapping, dropped after decode returns.
    let mmap = unsafe { Mmap::map(&file)? };
    decode(&mmap, expected_hash)
}

/// Write a cache file atomically: `.tmp` sibling, then rename.
pub fn write(path: &Path, hash: u32, entries: &[DictEntry]) -> Result<(), DictError> {
    let bytes = encode(hash, entries)?;
    let tmp = path.with_extension("mdx.tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
