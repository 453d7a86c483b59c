#![no_main]

//! Map loading fuzzer.
//!
//! Arbitrary JSON must either fail to parse, fail validation or produce a
//! consistent world. Nothing may panic.

use libfuzzer_sys::fuzz_target;
use paintfront::World;
use paintfront::game::MapSpec;
use paintfront::game::invariants::check_invariants;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(spec) = MapSpec::from_json_str(text) else {
        return;
    };
    let validated = spec.validate().is_ok();
    match World::new(&spec) {
        Ok(world) => {
            assert!(validated, "world built from an invalid map");
            let violations = check_invariants(&world);
            assert!(violations.is_empty(), "{violations:?}");
        }
        Err(_) => assert!(!validated, "valid map rejected"),
    }
});
