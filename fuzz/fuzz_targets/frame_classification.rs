#![no_main]

use fee_oracle_server::service::InboundFrame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Classification must never panic, whatever the upstream sends
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = InboundFrame::parse(text);
    }

    // Also test with a valid envelope but fuzzed block fields
    if data.len() >= 8 {
        let vsize = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let fee = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);

        let json = format!(
            r#"{{"mempool-blocks": [{{"blockVSize": {}, "feeRange": [{}.0]}}]}}"#,
            vsize, fee
        );

        let _ = InboundFrame::parse(&json);
    }
});
