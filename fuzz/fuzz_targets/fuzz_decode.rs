#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Slice and stream decoding must never panic, and must agree.
    let from_slice = zennegative::BmpDocument::from_bytes(data);
    let from_stream = zennegative::DecodeRequest::new().read_from(data, enough::Unstoppable);
    match (from_slice, from_stream) {
        (Ok(a), Ok(b)) => {
            assert_eq!(a.pixels(), b.pixels());
            assert_eq!(a.copy_bytes(), data);
            assert_eq!(b.copy_bytes(), data);
        }
        (Err(_), Err(_)) => {}
        (a, b) => panic!("slice/stream disagree: {:?} vs {:?}", a.err(), b.err()),
    }
    let _ = zennegative::probe(data);
});
