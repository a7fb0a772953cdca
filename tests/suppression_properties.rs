use detpost::{
    compute_params, decode, iou, suppress, BoundingBox, DecodeConfig, Detection, LabelTable,
    OwnedTensor,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NUM_CLASSES: usize = 4;

fn random_tensor(rng: &mut StdRng, rows: usize) -> OwnedTensor {
    let mut data = Vec::with_capacity(rows * (4 + NUM_CLASSES));
    for _ in 0..rows {
        // Cluster centers so that plenty of boxes overlap.
        let cx = rng.random_range(100.0..200.0f32);
        let cy = rng.random_range(100.0..200.0f32);
        data.push(cx);
        data.push(cy);
        data.push(rng.random_range(5.0..80.0f32));
        data.push(rng.random_range(5.0..80.0f32));
        for _ in 0..NUM_CLASSES {
            data.push(rng.random::<f32>());
        }
    }
    OwnedTensor::new(data, rows, 4 + NUM_CLASSES, Default::default()).unwrap()
}

fn decode_random(seed: u64, threshold: f32) -> Vec<Detection> {
    let mut rng = StdRng::seed_from_u64(seed);
    let tensor = random_tensor(&mut rng, 300);
    let params = compute_params(640, 480, 320, true).unwrap();
    let cfg = DecodeConfig {
        confidence_threshold: threshold,
        ..DecodeConfig::default()
    };
    decode(tensor.view(), &params, &LabelTable::synthetic(NUM_CLASSES), &cfg).unwrap()
}

#[test]
fn decode_and_suppress_are_deterministic() {
    for seed in 0..5 {
        let first = suppress(decode_random(seed, 0.3), 0.45, 100);
        let second = suppress(decode_random(seed, 0.3), 0.45, 100);
        assert_eq!(first, second);
    }
}

#[test]
fn raising_the_threshold_never_adds_candidates() {
    for seed in 0..5 {
        let mut previous = usize::MAX;
        for step in 0..=10 {
            let threshold = step as f32 / 10.0;
            let count = decode_random(seed, threshold).len();
            assert!(count <= previous, "threshold {threshold} grew to {count}");
            previous = count;
        }
    }
}

#[test]
fn suppression_is_idempotent() {
    for seed in 0..5 {
        let once = suppress(decode_random(seed, 0.2), 0.45, 1000);
        let twice = suppress(once.clone(), 0.45, 1000);
        assert_eq!(once, twice);
    }
}

#[test]
fn cap_is_respected_and_survivors_do_not_overlap() {
    for seed in 0..5 {
        let decoded = decode_random(seed, 0.1);
        for cap in [0usize, 1, 5, 50] {
            let kept = suppress(decoded.clone(), 0.45, cap);
            assert!(kept.len() <= cap);
        }

        let kept = suppress(decoded, 0.45, usize::MAX);
        for (i, a) in kept.iter().enumerate() {
            for b in &kept[i + 1..] {
                assert!(a.confidence() >= b.confidence());
                if a.class_id() == b.class_id() {
                    assert!(iou(a.bounding_box(), b.bounding_box()) <= 0.45);
                }
            }
        }
    }
}

#[test]
fn iou_reference_values() {
    let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
    let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
    let far = BoundingBox::new(100.0, 100.0, 110.0, 110.0);
    assert_eq!(iou(&a, &far), 0.0);
    assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    assert!((iou(&a, &b) - 25.0 / 175.0).abs() < 1e-6);
}

#[test]
fn different_classes_never_suppress_each_other() {
    let bbox = BoundingBox::new(10.0, 10.0, 50.0, 50.0);
    let dets = vec![
        Detection::new(bbox, "a", 0.9, 0),
        Detection::new(bbox, "b", 0.8, 1),
        Detection::new(bbox, "a", 0.7, 0),
    ];
    let kept = suppress(dets, 0.45, 10);
    let ids: Vec<i32> = kept.iter().map(Detection::class_id).collect();
    assert_eq!(ids, vec![0, 1]);
}
