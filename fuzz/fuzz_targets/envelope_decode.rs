//! Fuzz target for envelope decoding
//!
//! Feeds arbitrary text through the inbound path a server frame takes:
//! envelope decode, then typed classification.
//!
//! # Invariants
//!
//! - Decoding NEVER panics
//! - A failure keeps the raw text verbatim
//! - Every decoded envelope classifies to some `Inbound` and re-encodes

#![no_main]

use cubeduel_proto::{Inbound, decode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    match decode(text) {
        Ok(envelope) => {
            let kind = envelope.kind.clone();
            let inbound = Inbound::from_envelope(envelope.clone());
            let _ = inbound.kind();
            let wire = envelope.to_text().expect("envelope must serialize");
            let again = decode(&wire).expect("encoded envelope must decode");
            assert_eq!(again.kind, kind);
        }
        Err(failure) => assert_eq!(failure.raw, text),
    }
});
