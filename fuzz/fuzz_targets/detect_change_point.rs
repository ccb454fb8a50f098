#![no_main]

use breakout::edm::try_detect_change_point;
use libfuzzer_sys::fuzz_target;

fn read_f64(chunk: &[u8]) -> f64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(chunk);
    f64::from_le_bytes(buf)
}

fuzz_target!(|data: &[u8]| {
    // First 8 bytes are a little-endian u64 delta, the rest f64 samples
    if data.len() < 8 {
        return;
    }
    let (head, rest) = data.split_at(8);

    let mut buf = [0u8; 8];
    buf.copy_from_slice(head);
    let delta = usize::try_from(u64::from_le_bytes(buf)).unwrap_or(usize::MAX);

    let series: Vec<f64> = rest.chunks_exact(8).map(read_f64).collect();

    if let Ok(cp) = try_detect_change_point(&series, delta) {
        assert!(cp.index >= delta && cp.index < series.len() - delta);
        assert!(cp.statistic.is_finite());
    }
});
