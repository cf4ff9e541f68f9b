//! Fuzz target: `LineFramer::feed`
//!
//! Feeds arbitrary characters into the line framer and asserts that no
//! completed line contains a terminator or exceeds the line capacity.
//!
//! cargo fuzz run fuzz_line_framer

#![no_main]

use cncmux::channel::line::{Feed, LineFramer, MAX_LINE_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut framer = LineFramer::new();
    for ch in String::from_utf8_lossy(data).chars() {
        if let Feed::Complete(line) = framer.feed(ch) {
            assert!(line.len() <= MAX_LINE_LEN);
            assert!(!line.contains(['\r', '\n']));
        }
        assert!(framer.len() <= MAX_LINE_LEN);
    }

    framer.reset();
    assert!(framer.is_empty());
    assert!(!framer.last_was_cr());
});
