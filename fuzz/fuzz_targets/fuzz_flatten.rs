#![no_main]
use libfuzzer_sys::fuzz_target;
use mypv::api::Category;
use mypv::projector::project;
use mypv::snapshot::Snapshot;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };

    // Every category flattens; forecast additionally walks the raw payload
    for category in Category::ALL {
        let snapshot = Snapshot::new(category, value.clone());
        let _ = project(&snapshot, "fuzz");
    }
});
