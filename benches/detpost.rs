use criterion::{criterion_group, criterion_main, Criterion};
use detpost::{LabelTable, OwnedTensor, Pipeline, PipelineConfig, TensorLayout};
use std::hint::black_box;

const NUM_CLASSES: usize = 80;
// YOLOv8 at 640x640 emits 8400 proposals.
const NUM_CANDIDATES: usize = 8400;

fn make_tensor(layout: TensorLayout) -> OwnedTensor {
    let attrs = 4 + NUM_CLASSES;
    let mut rows = vec![0.0f32; NUM_CANDIDATES * attrs];
    for c in 0..NUM_CANDIDATES {
        let row = &mut rows[c * attrs..(c + 1) * attrs];
        row[0] = ((c * 37) % 640) as f32;
        row[1] = ((c * 91) % 640) as f32;
        row[2] = 20.0 + (c % 13) as f32 * 5.0;
        row[3] = 20.0 + (c % 7) as f32 * 8.0;
        // Roughly one candidate in sixteen clears a 0.5 threshold.
        row[4 + c % NUM_CLASSES] = if c % 16 == 0 { 0.9 } else { 0.1 };
    }
    let data = match layout {
        TensorLayout::CandidateMajor => rows,
        TensorLayout::AttributeMajor => {
            let mut planes = vec![0.0f32; rows.len()];
            for c in 0..NUM_CANDIDATES {
                for a in 0..attrs {
                    planes[a * NUM_CANDIDATES + c] = rows[c * attrs + a];
                }
            }
            planes
        }
    };
    OwnedTensor::new(data, NUM_CANDIDATES, attrs, layout).unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let labels = LabelTable::synthetic(NUM_CLASSES);
    let pipeline = Pipeline::new(labels.clone());
    let letterboxed = Pipeline::new(labels).with_config(PipelineConfig {
        aspect_ratio_correction: true,
        ..PipelineConfig::default()
    });

    let rows = make_tensor(TensorLayout::CandidateMajor);
    let planes = make_tensor(TensorLayout::AttributeMajor);

    c.bench_function("pipeline_candidate_major", |b| {
        b.iter(|| black_box(pipeline.run(rows.view(), 1280, 720).unwrap()));
    });

    c.bench_function("pipeline_attribute_major", |b| {
        b.iter(|| black_box(pipeline.run(planes.view(), 1280, 720).unwrap()));
    });

    c.bench_function("pipeline_letterboxed", |b| {
        b.iter(|| black_box(letterboxed.run(rows.view(), 1280, 720).unwrap()));
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
