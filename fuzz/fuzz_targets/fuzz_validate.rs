#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(document) = serde_json::from_slice::<serde_json::Value>(data) {
        let response = openapi_examples::validate(&document);
        assert_eq!(response.valid, response.errors.is_empty());
    }
});
