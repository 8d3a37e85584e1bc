//! # Chunked LZF Compression
//!
//! `lzf` is a safe, pure-Rust implementation of the LZF compression format.
//! Data is framed into "ZV" chunks of at most 64 KiB, each stored either
//! LZF-compressed or verbatim, whichever is smaller. The wire format is
//! byte-compatible with the chunked streams produced by liblzf and
//! compress-lzf.
//!
//! ## Example
//!
//! ```rust
//! use lzf::{decode, encode};
//!
//! let original = b"to be or not to be, to be or not to be";
//! let framed = encode(original).expect("encoding failed");
//! let restored = decode(&framed).expect("decoding failed");
//! assert_eq!(restored, original);
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod chunk;
pub mod compress;
pub mod decompress;
pub mod error;

pub use chunk::{Chunk, MAX_CHUNK_LENGTH};
pub use compress::{ChunkEncoder, MAX_LITERAL, MAX_OFF, MAX_REF, MIN_BLOCK_TO_COMPRESS, encode};
pub use decompress::{ChunkDecoder, decode};
pub use error::{LzfError, Result};

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{decode, encode};

    #[test]
    fn test_round_trip() {
        let original = b"a stream of words, a stream of words, a stream of words";
        let framed = encode(original).unwrap();
        let restored = decode(&framed).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_compress_rle() {
        let original = alloc::vec![b'A'; 100];
        let framed = encode(&original).unwrap();

        // A single repeated byte collapses to a handful of back-references.
        assert!(framed.len() < original.len());

        assert_eq!(decode(&framed).unwrap(), original);
    }

    #[test]
    fn test_incompressible() {
        // High-entropy data falls back to verbatim storage: 5 header bytes
        // of overhead and nothing else.
        let original: Vec<u8> = (0..200).map(|i| (i * 7) as u8).collect();
        let framed = encode(&original).unwrap();

        assert_eq!(framed.len(), 205);
        assert_eq!(decode(&framed).unwrap(), original);
    }
}
