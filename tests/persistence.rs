use binary_snake::{
    Activation, BinaryNetwork, FileStore, MemoryStore, NetworkShape, Policy, PolicyError, WeightStore,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn shape() -> NetworkShape {
    NetworkShape::new(10, &[32, 32], 3)
}

fn trained_like(seed: u64) -> BinaryNetwork {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut net = BinaryNetwork::random(&shape(), Activation::Tanh, &mut rng).unwrap();
    // biases are whatever the training loop left behind
    for layer in 0..net.layers().len() {
        for (i, b) in net.bias_mut(layer).iter_mut().enumerate() {
            *b = (i as f32 * 0.37 + layer as f32).sin() / 3.0;
        }
    }
    net.flip_weight(0, 3, 4);
    net
}

#[test]
fn file_round_trip_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::new(dir.path());
    let original = trained_like(1);
    original.save(&mut store, "test").unwrap();

    let restored = BinaryNetwork::restore(&shape(), Activation::Tanh, &store, "test").unwrap();
    assert_eq!(restored, original);
    for (a, b) in original.layers().iter().zip(restored.layers()) {
        assert_eq!(a.kernel(), b.kernel());
        let bits = |v: &[f32]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(a.bias()), bits(b.bias()));
    }
}

#[test]
fn restored_network_decides_identically() {
    let mut store = MemoryStore::default();
    let original = trained_like(2);
    original.save(&mut store, "gen-7").unwrap();
    let restored = BinaryNetwork::restore(&shape(), Activation::Tanh, &store, "gen-7").unwrap();

    for k in 0..20 {
        let input: Vec<f32> = (0..10).map(|i| ((i * k) as f32).cos()).collect();
        assert_eq!(original.decide(&input).unwrap(), restored.decide(&input).unwrap());
        assert_eq!(original.forward(&input).unwrap(), restored.forward(&input).unwrap());
    }
}

#[test]
fn restored_kernels_are_binary() {
    let mut store = MemoryStore::default();
    BinaryNetwork::random(&shape(), Activation::Tanh, &mut StdRng::seed_from_u64(3))
        .unwrap()
        .save(&mut store, "fresh")
        .unwrap();
    let restored = BinaryNetwork::restore(&shape(), Activation::Tanh, &store, "fresh").unwrap();
    for layer in restored.layers() {
        assert!(layer.kernel().iter().all(|&w| w == 1.0 || w == -1.0));
    }
}

#[test]
fn saving_under_a_name_overwrites() {
    let mut store = MemoryStore::default();
    trained_like(4).save(&mut store, "best").unwrap();
    let newer = trained_like(5);
    newer.save(&mut store, "best").unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.load("best").unwrap(), newer.weights());
}

#[test]
fn unknown_name_fails_at_restore() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let err = BinaryNetwork::restore(&shape(), Activation::Tanh, &store, "ghost").unwrap_err();
    assert!(matches!(err, PolicyError::MissingWeights(name) if name == "ghost"));
}
