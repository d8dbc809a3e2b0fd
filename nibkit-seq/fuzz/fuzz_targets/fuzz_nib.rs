#![no_main]
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let mut stream = Cursor::new(data);
    let Ok(source) = nibkit_seq::SequenceSource::open(&mut stream) else {
        return;
    };
    let total = source.total_length();
    let start = data.len() % (total + 1);
    let length = (total - start).min(4096);
    if let Ok(bases) = source.fetch(&mut stream, start, length) {
        assert_eq!(bases.len(), length);
    }
});
