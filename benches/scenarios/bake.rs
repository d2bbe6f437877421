//! Benchmark for baking into a small synthetic module.

use std::hint::black_box;

use criterion::Criterion;
use tonegraph::{
    io::tracker::{BakePipeline, ManifestEntry},
    voices,
};

/// One pattern, two 2000-byte samples.
fn module() -> Vec<u8> {
    let mut module = vec![0u8; 1084 + 1024];
    for slot in 0..2 {
        let words = 1000u16.to_be_bytes();
        module[42 + 30 * slot..44 + 30 * slot].copy_from_slice(&words);
    }
    module.extend(std::iter::repeat(0).take(4000));
    module
}

pub fn bench_bake(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/bake");
    group.sample_size(10);

    let (Some(click), Some(cowbell)) = (voices::find("click"), voices::find("cowbell")) else {
        return;
    };
    let pipeline = BakePipeline::new(vec![ManifestEntry::new(1, click), ManifestEntry::new(2, cowbell)]);
    let module = module();

    group.bench_function("two_slots", |b| b.iter(|| black_box(pipeline.bake(&module))));

    group.finish();
}
