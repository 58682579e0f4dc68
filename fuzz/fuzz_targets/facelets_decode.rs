//! Fuzz target for facelet decoding
//!
//! # Invariants
//!
//! - Any string decodes to six 3x3 faces
//! - The first 54 characters land in wire order, the rest is unknown

#![no_main]

use cubeduel_core::facelets::{self, FaceName};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: String| {
    let faces = facelets::decode(&input);

    let decoded: Vec<char> = FaceName::ALL.into_iter().flat_map(|name| *faces.get(name).chars()).collect();
    assert_eq!(decoded.len(), 54);

    for (i, c) in decoded.iter().enumerate() {
        match input.chars().nth(i) {
            Some(expected) => assert_eq!(*c, expected),
            None => assert_eq!(*c, '.'),
        }
    }

    for (_, face) in faces.iter() {
        assert_eq!(face.rows().count(), 3);
    }
});
