use alloc::vec::Vec;

use crate::chunk::{Chunk, MAX_CHUNK_LENGTH, MAX_HEADER_LENGTH};
use crate::error::{LzfError, Result};

/// Inputs shorter than this are stored verbatim without a compression attempt.
pub const MIN_BLOCK_TO_COMPRESS: usize = 16;

/// Maximum length of a literal run.
pub const MAX_LITERAL: usize = 1 << 5;

/// Maximum back-reference distance.
pub const MAX_OFF: usize = 1 << 13;

/// Maximum back-reference match length.
pub const MAX_REF: usize = (1 << 8) + (1 << 3);

/// Trailing bytes excluded from the match loop; always emitted as literals.
const TAIL_LENGTH: usize = 4;

/// Hash table size bounds. The table holds one position per slot, sized to
/// the smallest power of two covering twice the chunk length.
const MIN_HASH_SIZE: usize = 256;
const MAX_HASH_SIZE: usize = 16384;

/// Multiplier folding a 3-byte window into a table slot.
const HASH_MULTIPLIER: u32 = 57321;

/// Reusable LZF encoder for chunks up to a fixed length.
///
/// Owns the hash table and the scratch payload buffer, so one instance can
/// encode many chunks without reallocating. Hash entries left behind by a
/// previous call are harmless: the match check rejects any candidate that
/// does not actually repeat the current bytes. Not safe to share across
/// threads; independent instances may run in parallel.
pub struct ChunkEncoder {
    hash_table: Vec<u32>,
    hash_modulo: usize,
    scratch: Vec<u8>,
}

impl ChunkEncoder {
    /// Creates an encoder sized for inputs of `expected_length` bytes.
    pub fn new(expected_length: usize) -> Self {
        let chunk_len = expected_length.min(MAX_CHUNK_LENGTH);
        let hash_size = hash_table_size(chunk_len);
        Self {
            hash_table: alloc::vec![0u32; hash_size],
            hash_modulo: hash_size - 1,
            scratch: Vec::with_capacity(chunk_len + ((chunk_len + 31) >> 5) + MAX_HEADER_LENGTH),
        }
    }

    /// Encodes `length` bytes of `input` starting at `offset` into one
    /// framed chunk.
    ///
    /// The result is compressed only when that saves at least two bytes over
    /// verbatim storage; a valid range therefore never fails to encode.
    pub fn encode(&mut self, input: &[u8], offset: usize, length: usize) -> Result<Chunk> {
        if length > MAX_CHUNK_LENGTH {
            return Err(LzfError::InvalidArgument("encode length exceeds 65535 bytes"));
        }
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= input.len())
            .ok_or(LzfError::InvalidArgument("encode range out of bounds"))?;
        let data = &input[offset..end];
        if length >= MIN_BLOCK_TO_COMPRESS {
            self.try_compress(data);
            if self.scratch.len() < length - 2 {
                return Chunk::compressed(&self.scratch, length);
            }
        }
        Chunk::uncompressed(data)
    }

    /// Runs the LZF match loop over `data`, leaving the coded payload in
    /// `self.scratch`. The caller decides whether the result is short enough
    /// to keep.
    fn try_compress(&mut self, data: &[u8]) {
        let hash_modulo = self.hash_modulo;
        let table = &mut self.hash_table;
        let out = &mut self.scratch;
        out.clear();

        let in_end = data.len() - TAIL_LENGTH;
        let mut in_pos = 0;
        let mut literals = 0;
        // Slot for the pending literal-run control byte.
        out.push(0);
        let mut seen = (u32::from(data[0]) << 8) | u32::from(data[1]);

        while in_pos < in_end {
            seen = ((seen << 8) | u32::from(data[in_pos + 2])) & 0x00FF_FFFF;
            let slot = hash_slot(seen, hash_modulo);
            let candidate = table[slot] as usize;
            table[slot] = in_pos as u32;

            let found = candidate < in_pos
                && in_pos - candidate <= MAX_OFF
                && data[candidate] == data[in_pos]
                && data[candidate + 1] == data[in_pos + 1]
                && data[candidate + 2] == data[in_pos + 2];
            if !found {
                out.push(data[in_pos]);
                in_pos += 1;
                literals += 1;
                if literals == MAX_LITERAL {
                    commit_literal_run(out, &mut literals);
                    out.push(0);
                }
                continue;
            }

            let off = in_pos - candidate - 1;
            let max_len = (in_end - in_pos + 2).min(MAX_REF);
            let mut matched = 3;
            while matched < max_len && data[candidate + matched] == data[in_pos + matched] {
                matched += 1;
            }

            if literals == 0 {
                // Nothing accumulated; retract the unused control-byte slot.
                out.pop();
            } else {
                commit_literal_run(out, &mut literals);
            }

            let len = matched - 2;
            if len < 7 {
                out.push(((off >> 8) as u8) | ((len as u8) << 5));
            } else {
                out.push(((off >> 8) as u8) | (7 << 5));
                out.push((len - 7) as u8);
            }
            out.push((off & 0xFF) as u8);
            out.push(0);

            // Skip past the match, seeding the table at the last two
            // positions it covers so later matches can chain off them.
            in_pos += len;
            seen = (u32::from(data[in_pos]) << 8) | u32::from(data[in_pos + 1]);
            seen = ((seen << 8) | u32::from(data[in_pos + 2])) & 0x00FF_FFFF;
            table[hash_slot(seen, hash_modulo)] = in_pos as u32;
            in_pos += 1;
            seen = ((seen << 8) | u32::from(data[in_pos + 2])) & 0x00FF_FFFF;
            table[hash_slot(seen, hash_modulo)] = in_pos as u32;
            in_pos += 1;
        }

        // The final TAIL_LENGTH bytes never start a match.
        while in_pos < data.len() {
            out.push(data[in_pos]);
            in_pos += 1;
            literals += 1;
            if literals == MAX_LITERAL {
                commit_literal_run(out, &mut literals);
                out.push(0);
            }
        }
        if literals == 0 {
            out.pop();
        } else {
            commit_literal_run(out, &mut literals);
        }
    }
}

/// Encodes `data` into a stream of back-to-back framed chunks.
///
/// Inputs longer than [`MAX_CHUNK_LENGTH`] are cut into consecutive windows
/// that are encoded independently, so no back-reference ever crosses a chunk
/// boundary.
pub fn encode(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ChunkEncoder::new(data.len());
    if data.len() <= MAX_CHUNK_LENGTH {
        return Ok(encoder.encode(data, 0, data.len())?.into_bytes());
    }
    let chunks = data.len().div_ceil(MAX_CHUNK_LENGTH);
    let mut out = Vec::with_capacity(data.len() + chunks * MAX_HEADER_LENGTH);
    let mut pos = 0;
    while pos < data.len() {
        let len = (data.len() - pos).min(MAX_CHUNK_LENGTH);
        out.extend_from_slice(encoder.encode(data, pos, len)?.as_bytes());
        pos += len;
    }
    Ok(out)
}

/// Writes the finished run length into its reserved control-byte slot.
#[inline]
fn commit_literal_run(out: &mut Vec<u8>, literals: &mut usize) {
    let slot = out.len() - *literals - 1;
    out[slot] = (*literals - 1) as u8;
    *literals = 0;
}

#[inline]
fn hash_slot(seen: u32, modulo: usize) -> usize {
    ((seen.wrapping_mul(HASH_MULTIPLIER) >> 9) as usize) & modulo
}

fn hash_table_size(chunk_len: usize) -> usize {
    let target = chunk_len * 2;
    if target >= MAX_HASH_SIZE {
        return MAX_HASH_SIZE;
    }
    let mut size = MIN_HASH_SIZE;
    while size < target {
        size *= 2;
    }
    size
}
