#![no_main]

use elpris::comparison::Comparison;
use elpris::input::ComparisonInput;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: ComparisonInput| {
    if let Ok(comparison) = Comparison::from_input(input, None) {
        let _ = comparison.run();
    }
});
