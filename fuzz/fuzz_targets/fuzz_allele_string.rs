//! Fuzz target for the allele string decoder
//!
//! Decoding must never panic, and re-encoding a decoded list must decode to
//! the same list.

#![no_main]

use ferro_alleles::AlleleString;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if input.len() > 1000 {
            return;
        }

        let decoded = AlleleString::decode(input);
        assert!(!decoded.is_empty());
        assert!(decoded.iter().all(|a| !a.is_empty()));

        let reencoded = decoded.to_string();
        assert_eq!(AlleleString::decode(&reencoded), decoded);

        let _ = decoded.disambiguated();
    }
});
