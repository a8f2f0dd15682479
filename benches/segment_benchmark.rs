//! Segmenter benchmark: Measure per-keystroke word reconstruction.
//!
//! Target: < 5µs per keystroke for words up to 32 characters

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use typeahead::{Key, KeyEvent, Segmenter};

fn segment_word(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_word");
    for len in [4usize, 16, 32] {
        let word: String = (0..len).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(len), &word, |b, word| {
            b.iter(|| {
                let mut segmenter = Segmenter::new();
                let mut last = None;
                for c in word.chars() {
                    last = segmenter.consume(KeyEvent::press(Key::Char(c)));
                }
                black_box(last)
            });
        });
    }
    group.finish();
}

fn segment_with_backspace(c: &mut Criterion) {
    c.bench_function("segment_backspace", |b| {
        b.iter(|| {
            let mut segmenter = Segmenter::new();
            for c in "helicopter".chars() {
                segmenter.consume(KeyEvent::press(Key::Char(c)));
            }
            for _ in 0..5 {
                segmenter.consume(KeyEvent::press(Key::Backspace));
            }
            black_box(segmenter.consume(KeyEvent::press(Key::Char('x'))))
        });
    });
}

criterion_group!(benches, segment_word, segment_with_backspace);
criterion_main!(benches);
