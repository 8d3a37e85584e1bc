//! Chunk framing for the LZF "ZV" stream format.
//!
//! Every chunk starts with the magic bytes `Z` and `V`, a block type, and
//! one or two big-endian `u16` length fields:
//!
//! - uncompressed: `5A 56 00 <len>` followed by `len` verbatim bytes
//! - compressed:   `5A 56 01 <clen> <ulen>` followed by `clen` code bytes
//!
//! `ulen` is the number of bytes the compressed payload expands to.

use alloc::vec::Vec;

use crate::error::{LzfError, Result};

/// Marker introducing every chunk: `Z` then `V`.
pub const MAGIC: [u8; 2] = [0x5A, 0x56];

/// Block type of a verbatim payload.
pub const BLOCK_TYPE_UNCOMPRESSED: u8 = 0;

/// Block type of an LZF-coded payload.
pub const BLOCK_TYPE_COMPRESSED: u8 = 1;

/// Maximum payload carried by a single chunk.
pub const MAX_CHUNK_LENGTH: usize = 0xFFFF;

/// Header length of an uncompressed chunk.
pub const HEADER_LEN_UNCOMPRESSED: usize = 5;

/// Header length of a compressed chunk.
pub const HEADER_LEN_COMPRESSED: usize = 7;

/// Largest header the format can produce.
pub const MAX_HEADER_LENGTH: usize = HEADER_LEN_COMPRESSED;

/// One framed LZF block: header plus payload, ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    data: Vec<u8>,
}

impl Chunk {
    /// Frames `payload` verbatim.
    pub fn uncompressed(payload: &[u8]) -> Result<Self> {
        if payload.len() > MAX_CHUNK_LENGTH {
            return Err(LzfError::InvalidArgument(
                "chunk payload exceeds 65535 bytes",
            ));
        }
        let mut data = Vec::with_capacity(HEADER_LEN_UNCOMPRESSED + payload.len());
        data.extend_from_slice(&MAGIC);
        data.push(BLOCK_TYPE_UNCOMPRESSED);
        data.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        data.extend_from_slice(payload);
        Ok(Self { data })
    }

    /// Frames an LZF-coded `payload` that expands to `uncompressed_length` bytes.
    pub fn compressed(payload: &[u8], uncompressed_length: usize) -> Result<Self> {
        if payload.len() > MAX_CHUNK_LENGTH {
            return Err(LzfError::InvalidArgument(
                "chunk payload exceeds 65535 bytes",
            ));
        }
        if uncompressed_length > MAX_CHUNK_LENGTH {
            return Err(LzfError::InvalidArgument(
                "uncompressed length exceeds 65535 bytes",
            ));
        }
        let mut data = Vec::with_capacity(HEADER_LEN_COMPRESSED + payload.len());
        data.extend_from_slice(&MAGIC);
        data.push(BLOCK_TYPE_COMPRESSED);
        data.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        data.extend_from_slice(&(uncompressed_length as u16).to_be_bytes());
        data.extend_from_slice(payload);
        Ok(Self { data })
    }

    /// Returns true if `bytes` begins with a plausible chunk header.
    ///
    /// Only the magic bytes and the block type are inspected; consistency of
    /// the length fields is left to the decoder.
    pub fn is_valid(bytes: &[u8]) -> bool {
        bytes.len() >= HEADER_LEN_UNCOMPRESSED
            && bytes[0] == MAGIC[0]
            && bytes[1] == MAGIC[1]
            && (bytes[2] == BLOCK_TYPE_UNCOMPRESSED || bytes[2] == BLOCK_TYPE_COMPRESSED)
    }

    /// Copies the framed bytes into `dst` starting at `offset` and returns
    /// the offset one past the written bytes.
    pub fn copy_to(&self, dst: &mut [u8], offset: usize) -> Result<usize> {
        let end = offset
            .checked_add(self.data.len())
            .filter(|end| *end <= dst.len())
            .ok_or(LzfError::InvalidArgument("destination buffer too small"))?;
        dst[offset..end].copy_from_slice(&self.data);
        Ok(end)
    }

    /// The framed bytes, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the chunk, returning the framed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Whether the payload is LZF-coded rather than verbatim.
    pub fn is_compressed(&self) -> bool {
        self.data[2] == BLOCK_TYPE_COMPRESSED
    }
}
