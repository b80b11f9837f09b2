#![no_main]

use fee_oracle::HeatmapPayload;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a cache blob: decode must reject, never panic
    if let Ok(blob) = std::str::from_utf8(data) {
        let _ = HeatmapPayload::decode(blob);
    }

    // Well-formed payloads built from fuzzed values must round-trip
    if data.len() >= 12 {
        let x = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let y = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        let weight = u32::from_le_bytes([data[8], data[9], data[10], data[11]]);

        let payload = HeatmapPayload {
            x: vec![x],
            y: vec![y],
            z: vec![vec![(weight as f64).ln_1p()]],
        };

        if let Ok(blob) = payload.encode() {
            let decoded = HeatmapPayload::decode(&blob).expect("encoded payload must decode");
            assert_eq!(decoded, payload);
        }
    }
});
