use std::env;
use std::io::Write;

use compacthtml::{compact_stream, Compactor, Tokenizer};
use pretty_assertions::assert_eq;

/// Run one fuzz input. `FUZZ_STREAM=1` additionally compares streaming against synchronous
/// compaction, which is slow because it spawns a thread per input.
pub fn run(s: &[u8]) {
    // none of this may panic, whatever the input. we rely on running in debug mode such that this
    // is not optimized away
    for _ in Tokenizer::new(s).infallible() {}
    let expected = Compactor::new().compact_bytes(s);

    if env::var("FUZZ_STREAM").is_ok_and(|v| v == "1") {
        let (done, mut input) = compact_stream(Vec::new());
        for chunk in s.chunks(3) {
            input.write_all(chunk).unwrap();
        }
        input.close();
        assert_eq!(
            String::from_utf8_lossy(&done.wait().unwrap()),
            String::from_utf8_lossy(&expected)
        );
    }
}
