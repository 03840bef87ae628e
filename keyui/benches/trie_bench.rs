use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use keyui::keyseq::{KeySeq, LogicalKey};
use keyui::mapset::Mapping;
use keyui::trie::Trie;

fn byte_seq(bytes: &[u8]) -> KeySeq {
    bytes.iter().map(|&b| LogicalKey::Byte(b)).collect()
}

/// A set of escape sequences of increasing length, all sharing the `\x1b[`
/// prefix, the way a real terminfo-derived terminal map-set does.
fn sequences(count: usize, tail_len: usize) -> Vec<KeySeq> {
    (0..count)
        .map(|i| {
            let mut bytes = vec![0x1b, b'['];
            bytes.extend((0..tail_len).map(|j| b'0' + ((i + j) % 10) as u8));
            byte_seq(&bytes)
        })
        .collect()
}

fn build_trie(seqs: &[KeySeq]) -> Trie {
    let mut t = Trie::new();
    for (i, seq) in seqs.iter().enumerate() {
        t.insert(seq, Rc::new(Mapping::new(format!("seq{i}"), format!("val{i}"))));
    }
    t
}

/// Feed `seq` through `trie` one key at a time, mirroring how
/// `InputContext` drives a live match, and return whether a mapping was
/// found.
fn trie_lookup(trie: &mut Trie, seq: &KeySeq) -> bool {
    trie.reset();
    for &k in seq {
        trie.push(k);
    }
    trie.finalize();
    trie.state() == keyui::trie::TrieState::Found
}

/// The naive alternative a terminal-key matcher might reach for without a
/// trie: a linear scan comparing the live buffer against every registered
/// sequence in turn.
fn linear_lookup(table: &[KeySeq], seq: &KeySeq) -> bool {
    table.iter().any(|candidate| candidate == seq)
}

fn bench_trie(c: &mut Criterion) {
    let mut g = c.benchmark_group("trie_vs_linear_scan");

    for &(count, tail_len) in &[(16usize, 4usize), (256, 8), (4096, 12)] {
        let seqs = sequences(count, tail_len);
        let mut trie = build_trie(&seqs);
        let probe = seqs[seqs.len() / 2].clone();

        g.bench_function(format!("trie_push_{count}x{tail_len}"), |b| {
            b.iter(|| black_box(trie_lookup(&mut trie, black_box(&probe))))
        });

        g.bench_function(format!("linear_scan_{count}x{tail_len}"), |b| {
            b.iter(|| black_box(linear_lookup(black_box(&seqs), black_box(&probe))))
        });
    }

    g.finish();
}

criterion_group!(benches, bench_trie);
criterion_main!(benches);
