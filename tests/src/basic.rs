use afli_nfl::afli::AfliConfig;
use afli_nfl::nfl::config::NflConfig;
use afli_nfl::{Afli, Nfl, OpCode, Request};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn bulk_load_then_point_ops_round_trip() {
    let mut index: Afli<f64, u64> = Afli::new(AfliConfig::new(8, 0));
    let data: Vec<(f64, u64)> = (0..1000).map(|i| (i as f64, i as u64)).collect();
    index.bulk_load(&data, None).unwrap();

    for i in (0..1000).step_by(37) {
        assert_eq!(index.find(i as f64).value(), Some(&(i as u64)));
    }
    assert!(index.find(-1.0).is_end());
    assert!(index.find(1000.5).is_end());

    assert!(index.update(500.0, 9999));
    assert_eq!(index.find(500.0).value(), Some(&9999));

    assert_eq!(index.remove(500.0), 1);
    assert!(index.find(500.0).is_end());
    assert_eq!(index.remove(500.0), 0);
}

#[test]
fn afli_config_loads_from_a_flat_pairs_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("afli.conf");
    std::fs::write(&path, b"bucket_size=4 aggregate_size=256").unwrap();

    let cfg = AfliConfig::from_path(&path).unwrap();
    assert_eq!(cfg.bucket_size(), 4);
    assert_eq!(cfg.aggregate_size(), Some(256));
}

/// Writes a single-layer identity transform (`y = x`) in the on-disk weights
/// format (native-endian `u32`/`f32`, see the weights blob layout) and
/// confirms NFL loads it and still answers lookups correctly end to end.
#[test]
fn nfl_loads_weights_from_disk_and_serves_lookups() {
    let dir = tempdir().unwrap();
    let weights_path = dir.path().join("weights.bin");
    let mut file = std::fs::File::create(&weights_path).unwrap();
    file.write_all(&1u32.to_ne_bytes()).unwrap(); // layer_count
    file.write_all(&1u32.to_ne_bytes()).unwrap(); // rows
    file.write_all(&1u32.to_ne_bytes()).unwrap(); // cols
    file.write_all(&1.0f32.to_ne_bytes()).unwrap(); // W
    file.write_all(&0.0f32.to_ne_bytes()).unwrap(); // b
    drop(file);

    let config_path = dir.path().join("nfl.conf");
    std::fs::write(
        &config_path,
        format!(
            "bucket_size=8 aggregate_size=0 weights_path={}",
            weights_path.display()
        ),
    )
    .unwrap();

    let cfg = NflConfig::from_path(&config_path).unwrap();
    let mut nfl = Nfl::new(cfg, 4).unwrap();

    let data: Vec<(f64, u64)> = (0..2000).map(|i| (i as f64, i as u64)).collect();
    nfl.bulk_load(&data).unwrap();

    let keys = [10.0, 999.0, 1999.0, -5.0];
    nfl.begin_batch(&keys);
    assert_eq!(nfl.find(0).value(), Some(&10));
    assert_eq!(nfl.find(1).value(), Some(&999));
    assert_eq!(nfl.find(2).value(), Some(&1999));
    assert!(nfl.find(3).is_end());
}

#[test]
fn request_carries_a_tagged_operation() {
    let req = Request::new(OpCode::Insert, 42.0_f64, 7u64);
    assert_eq!(req.op, OpCode::Insert);
    assert_eq!(req.key, 42.0);
    assert_eq!(req.value, 7);
}
