#![no_main]

use libfuzzer_sys::fuzz_target;
use openapi_examples::path::LocationPath;

fuzz_target!(|data: &[u8]| {
    let pointer = String::from_utf8_lossy(data);
    if let Some(path) = LocationPath::parse_pointer(&pointer) {
        let _ = path.to_path_expression();
        let again = LocationPath::parse_pointer(&path.to_pointer());
        assert_eq!(again.as_ref(), Some(&path));
    }
});
