//! Fuzz target: `ByteDecoder::decode`
//!
//! Drives arbitrary bytes through the streaming UTF-8 decoder and checks
//! that every code it yields is a valid scalar value, and that on valid
//! UTF-8 it agrees with the standard library.
//!
//! cargo fuzz run fuzz_byte_decoder

#![no_main]

use cncmux::channel::codec::{ByteDecoder, Token};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = ByteDecoder::new();
    let mut codes = Vec::new();
    for &b in data {
        if let Ok(Some(code)) = decoder.decode(b) {
            assert!(char::from_u32(code).is_some(), "decoder yielded non-scalar {code:#x}");
            assert!(Token::classify(code).is_some());
            codes.push(code);
        }
    }

    if let Ok(text) = core::str::from_utf8(data) {
        let want: Vec<u32> = text.chars().map(u32::from).collect();
        assert_eq!(codes, want);
    }
});
