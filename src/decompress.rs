use alloc::vec;
use alloc::vec::Vec;

use crate::chunk::{
    BLOCK_TYPE_COMPRESSED, BLOCK_TYPE_UNCOMPRESSED, HEADER_LEN_COMPRESSED,
    HEADER_LEN_UNCOMPRESSED, MAGIC,
};
use crate::compress::MAX_LITERAL;
use crate::error::{LzfError, Result};

/// Parsed view of one chunk header.
struct ChunkHeader {
    compressed: bool,
    /// Payload bytes on the wire.
    wire_length: usize,
    /// Bytes the chunk decodes to.
    data_length: usize,
    header_length: usize,
}

/// Stateless LZF chunk decoder.
///
/// All working state lives in the output buffers, so one decoder may be
/// shared freely between threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChunkDecoder;

impl ChunkDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes a stream of concatenated framed chunks.
    ///
    /// The stream is walked twice: once to validate headers and size the
    /// output exactly, once to expand payloads into it. A single trailing
    /// zero byte after the last chunk (legacy end marker) is skipped.
    pub fn decode(&self, framed: &[u8]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; decoded_length(framed)?];
        let mut out_pos = 0;
        let mut pos = 0;
        let mut block = 0;
        while pos < framed.len() {
            if framed.len() - pos == 1 && framed[pos] == 0 {
                break;
            }
            let header = read_header(framed, pos, block)?;
            let payload_start = pos + header.header_length;
            let payload = &framed[payload_start..payload_start + header.wire_length];
            if header.compressed {
                expand_chunk(
                    payload,
                    &mut out,
                    out_pos,
                    out_pos + header.data_length,
                    block,
                    pos,
                )?;
            } else {
                out[out_pos..out_pos + header.wire_length].copy_from_slice(payload);
            }
            out_pos += header.data_length;
            pos = payload_start + header.wire_length;
            block += 1;
        }
        Ok(out)
    }

    /// Decodes exactly one framed chunk into `scratch` and returns the
    /// populated prefix.
    ///
    /// The input must contain the chunk and nothing else. Fails with
    /// `InvalidArgument` if `scratch` cannot hold the declared length.
    pub fn decode_chunk<'a>(&self, framed: &[u8], scratch: &'a mut [u8]) -> Result<&'a [u8]> {
        let header = read_header(framed, 0, 0)?;
        let chunk_end = header.header_length + header.wire_length;
        if chunk_end != framed.len() {
            return Err(LzfError::CorruptInput {
                block: 0,
                offset: chunk_end,
                reason: "trailing bytes after chunk",
            });
        }
        if header.data_length > scratch.len() {
            return Err(LzfError::InvalidArgument(
                "scratch buffer too small for decoded chunk",
            ));
        }
        let payload = &framed[header.header_length..];
        if header.compressed {
            expand_chunk(payload, scratch, 0, header.data_length, 0, 0)?;
        } else {
            scratch[..header.wire_length].copy_from_slice(payload);
        }
        Ok(&scratch[..header.data_length])
    }
}

/// Decodes a stream of concatenated framed chunks.
pub fn decode(framed: &[u8]) -> Result<Vec<u8>> {
    ChunkDecoder::new().decode(framed)
}

/// Walks the chunk headers and sums the decoded lengths.
fn decoded_length(framed: &[u8]) -> Result<usize> {
    let mut total = 0;
    let mut pos = 0;
    let mut block = 0;
    while pos < framed.len() {
        if framed.len() - pos == 1 && framed[pos] == 0 {
            break;
        }
        let header = read_header(framed, pos, block)?;
        total += header.data_length;
        pos += header.header_length + header.wire_length;
        block += 1;
    }
    Ok(total)
}

fn read_header(framed: &[u8], pos: usize, block: usize) -> Result<ChunkHeader> {
    let corrupt = |offset: usize, reason: &'static str| LzfError::CorruptInput {
        block,
        offset,
        reason,
    };
    if framed.len() - pos < HEADER_LEN_UNCOMPRESSED {
        return Err(corrupt(pos, "truncated chunk header"));
    }
    if framed[pos] != MAGIC[0] || framed[pos + 1] != MAGIC[1] {
        return Err(corrupt(pos, "bad magic bytes"));
    }
    let wire_length = read_u16(framed, pos + 3);
    let header = match framed[pos + 2] {
        BLOCK_TYPE_UNCOMPRESSED => ChunkHeader {
            compressed: false,
            wire_length,
            data_length: wire_length,
            header_length: HEADER_LEN_UNCOMPRESSED,
        },
        BLOCK_TYPE_COMPRESSED => {
            if framed.len() - pos < HEADER_LEN_COMPRESSED {
                return Err(corrupt(pos, "truncated chunk header"));
            }
            ChunkHeader {
                compressed: true,
                wire_length,
                data_length: read_u16(framed, pos + 5),
                header_length: HEADER_LEN_COMPRESSED,
            }
        }
        _ => return Err(corrupt(pos + 2, "unknown block type")),
    };
    if framed.len() - pos - header.header_length < header.wire_length {
        return Err(corrupt(pos, "truncated chunk payload"));
    }
    Ok(header)
}

/// Expands one compressed payload into `out[start..end]`.
///
/// Back-reference copies run strictly left to right, so a distance shorter
/// than the match length replicates the preceding pattern. Non-overlapping
/// copies take a block-copy fast path.
fn expand_chunk(
    payload: &[u8],
    out: &mut [u8],
    start: usize,
    end: usize,
    block: usize,
    chunk_offset: usize,
) -> Result<()> {
    let corrupt = |reason: &'static str| LzfError::CorruptInput {
        block,
        offset: chunk_offset,
        reason,
    };
    let mut in_pos = 0;
    let mut out_pos = start;
    while out_pos < end {
        let ctrl = usize::from(
            *payload
                .get(in_pos)
                .ok_or_else(|| corrupt("compressed payload shorter than declared length"))?,
        );
        in_pos += 1;

        if ctrl < MAX_LITERAL {
            let run = ctrl + 1;
            if in_pos + run > payload.len() {
                return Err(corrupt("truncated literal run"));
            }
            if out_pos + run > end {
                return Err(corrupt("literal run overruns declared length"));
            }
            out[out_pos..out_pos + run].copy_from_slice(&payload[in_pos..in_pos + run]);
            in_pos += run;
            out_pos += run;
            continue;
        }

        let len_code = ctrl >> 5;
        let length = if len_code == 7 {
            let ext = *payload
                .get(in_pos)
                .ok_or_else(|| corrupt("truncated back-reference"))?;
            in_pos += 1;
            usize::from(ext) + 9
        } else {
            len_code + 2
        };
        let low = *payload
            .get(in_pos)
            .ok_or_else(|| corrupt("truncated back-reference"))?;
        in_pos += 1;
        let distance = ((ctrl & 0x1F) << 8) + usize::from(low) + 1;

        if distance > out_pos - start {
            return Err(corrupt("back-reference reaches before chunk start"));
        }
        if out_pos + length > end {
            return Err(corrupt("back-reference overruns declared length"));
        }
        let src = out_pos - distance;
        if distance >= length {
            out.copy_within(src..src + length, out_pos);
        } else {
            // Overlapping copy; byte order matters.
            for k in 0..length {
                out[out_pos + k] = out[src + k];
            }
        }
        out_pos += length;
    }
    if in_pos != payload.len() {
        return Err(corrupt("compressed payload not fully consumed"));
    }
    Ok(())
}

#[inline]
fn read_u16(bytes: &[u8], pos: usize) -> usize {
    usize::from(u16::from_be_bytes([bytes[pos], bytes[pos + 1]]))
}
