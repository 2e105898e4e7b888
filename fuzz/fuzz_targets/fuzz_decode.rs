#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must either succeed or return an error, never panic
    if let Ok(file) = daqfile::format::decode(data) {
        let derived = daqfile::derive::derive(file.channels());

        // Exercise the query path on whatever decoded
        for channel in file.channels().iter().chain(derived.channels().values()) {
            let _ = daqfile::resample::statistics(channel);
            let _ = daqfile::resample::resample(channel, 0.0, f32::INFINITY, 64);
        }
    }
});
