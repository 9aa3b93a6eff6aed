#![no_main]
use libfuzzer_sys::fuzz_target;
use zennegative::*;

fuzz_target!(|data: &[u8]| {
    let Ok(doc) = BmpDocument::from_bytes(data) else {
        return;
    };
    let neg = doc.negate(enough::Unstoppable).unwrap();
    let out = doc.edited_bytes(&neg).unwrap();
    assert_eq!(out.len(), doc.pixel_array_offset() + neg.len());

    // Negating the edited file restores every color byte of the source.
    let Ok(edited) = BmpDocument::from_bytes(&out) else {
        panic!("edited output failed to decode");
    };
    let back = edited.negate(enough::Unstoppable).unwrap();
    let g = doc.geometry();
    for (a, b) in back.rows().zip(doc.pixels().rows()) {
        assert_eq!(a[..g.pixel_bytes_per_row()], b[..g.pixel_bytes_per_row()]);
    }
});
