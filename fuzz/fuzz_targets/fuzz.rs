#![no_main]

use libfuzzer_sys::fuzz_target;
use lzf::{decode, encode};

/// Verifies that the decoder safely handles arbitrary, potentially malformed
/// framed input.
///
/// Whether decoding succeeds (coincidentally valid) or fails (corrupt) is
/// irrelevant; it must return instead of panicking, whatever the bytes.
fn verify_decode_robustness(data: &[u8]) {
    let _ = decode(data);
}

/// Verifies the lossless round-trip invariant: `decode(encode(data)) == data`.
///
/// A failure here means the encoder discarded information, the decoder
/// corrupted the restored data, or the encoder produced a frame its own
/// decoder rejects. All three are bugs worth a crash.
fn verify_round_trip(data: &[u8]) {
    let framed = encode(data).expect("encoding a plain buffer cannot fail");

    match decode(&framed) {
        Ok(restored) => {
            if restored != data {
                panic!(
                    "Round-trip mismatch!\nInput len: {}\nFramed len: {}\nRestored len: {}",
                    data.len(),
                    framed.len(),
                    restored.len()
                );
            }
        }
        Err(e) => {
            panic!(
                "Round-trip failed! Decoder rejected freshly encoded data.\nError: {:?}\nInput len: {}",
                e,
                data.len()
            );
        }
    }
}

fuzz_target!(|data: &[u8]| {
    // 1. Robustness: random noise must not crash the decoder.
    verify_decode_robustness(data);

    // 2. Correctness: valid data survives an encode-decode cycle.
    verify_round_trip(data);
});
