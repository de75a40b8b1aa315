#![no_main]

use libfuzzer_sys::fuzz_target;
use qvis_core::EndPoints;
use qvis_layout::{Pulse, SegmentKind, stitch_line};

fuzz_target!(|data: &[u8]| {
    // First byte picks the cycle count (0..64); the rest are (start, len,
    // amplitude) triples.
    let Some((&total, rest)) = data.split_first() else {
        return;
    };
    let total_cycles = usize::from(total % 64);

    let pulses: Vec<(EndPoints, Pulse)> = rest
        .chunks_exact(3)
        .filter_map(|chunk| {
            let range = EndPoints::with_len(usize::from(chunk[0] % 64), usize::from(chunk[1] % 8))?;
            let amplitude = f64::from(chunk[2] as i8) / 64.0;
            Some((
                range,
                Pulse {
                    waveform: vec![amplitude],
                    sample_rate: 1,
                },
            ))
        })
        .collect();
    let peak = pulses
        .iter()
        .filter(|(range, _)| range.start < total_cycles)
        .fold(0.0f64, |acc, (_, p)| acc.max(p.peak()));

    let line = stitch_line(pulses, total_cycles);

    // Post-conditions that must always hold:
    assert!(line.tiles(total_cycles), "segments do not tile the range");
    assert!(line.max_amplitude <= peak, "max amplitude exceeds input");
    for pair in line.segments.windows(2) {
        assert!(
            !(pair[0].kind() == SegmentKind::Flat && pair[1].kind() == SegmentKind::Flat),
            "adjacent flat segments were not merged"
        );
    }
});
