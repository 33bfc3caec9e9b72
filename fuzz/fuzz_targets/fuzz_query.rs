#![no_main]

use libfuzzer_sys::fuzz_target;
use openapi_examples::path::query_located;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Use the first byte to determine the split point between expression and JSON value.
    let split = data[0] as usize % data.len().max(1);
    let (expr_bytes, value_bytes) = data.split_at(split.min(data.len()));

    let expression = String::from_utf8_lossy(expr_bytes);

    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(value_bytes) {
        let _ = query_located(&value, &expression);
    }
});
