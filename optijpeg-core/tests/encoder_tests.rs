// optijpeg-core/tests/encoder_tests.rs

use optijpeg_core::config::{OptimizationOptions, Strip, StripMode, STRIP_FLAG_PREFIX};
use optijpeg_core::encode;
use std::path::PathBuf;

fn strip_flag_count(args: &[String]) -> usize {
    args.iter().filter(|a| a.starts_with(STRIP_FLAG_PREFIX)).count()
}

#[test]
fn test_strip_absent_or_true_yields_single_strip_all() {
    let absent = OptimizationOptions::default();
    let explicit = OptimizationOptions {
        strip: Strip::from(true),
        ..Default::default()
    };
    let from_json = OptimizationOptions::from_json_str(r#"{"preserve": true}"#).unwrap();

    for options in [absent, explicit, from_json] {
        let invocation = encode("photo.jpg", &options);
        assert_eq!(strip_flag_count(invocation.args()), 1);
        assert!(invocation.args().iter().any(|a| a == "--strip-all"));
    }
}

#[test]
fn test_strip_false_yields_no_strip_flag() {
    let options = OptimizationOptions::from_json_str(r#"{"strip": false, "max": 70}"#).unwrap();
    let invocation = encode(vec!["a.jpg", "b.jpg"], &options);
    assert_eq!(strip_flag_count(invocation.args()), 0);
    assert_eq!(invocation.args(), ["--max=70", "a.jpg", "b.jpg"]);
}

#[test]
fn test_each_named_mode_yields_its_flag() {
    let cases = [
        (StripMode::All, "--strip-all"),
        (StripMode::Com, "--strip-com"),
        (StripMode::Exif, "--strip-exif"),
        (StripMode::Iptc, "--strip-iptc"),
        (StripMode::Icc, "--strip-icc"),
        (StripMode::Xmp, "--strip-xmp"),
    ];
    for (mode, flag) in cases {
        let options = OptimizationOptions::builder().strip_mode(mode).build();
        let invocation = encode("x.jpg", &options);
        assert_eq!(invocation.args(), [flag, "x.jpg"]);
    }
}

#[test]
fn test_max_quality_round_trips() {
    for quality in (0..=100).step_by(7) {
        let options = OptimizationOptions::builder().max_quality(quality).build();
        let invocation = encode("x.jpg", &options);
        let max_flags: Vec<_> = invocation
            .args()
            .iter()
            .filter_map(|a| a.strip_prefix("--max="))
            .collect();
        assert_eq!(max_flags.len(), 1);
        assert_eq!(max_flags[0].parse::<u64>().unwrap(), quality);
    }
}

#[test]
fn test_single_path_is_one_trailing_token() {
    let path = "/srv/images/with space.jpeg";
    let options = OptimizationOptions::builder()
        .preserve_timestamps(true)
        .max_quality(80)
        .build();

    let from_str = encode(path, &options);
    let from_pathbuf = encode(PathBuf::from(path), &options);

    assert_eq!(from_str, from_pathbuf);
    assert_eq!(from_str.args().last().map(String::as_str), Some(path));
    assert_eq!(from_str.args().len(), 4);
}

#[test]
fn test_sequence_paths_trail_in_order() {
    let paths = vec![
        PathBuf::from("c.jpg"),
        PathBuf::from("a.jpg"),
        PathBuf::from("b.jpg"),
    ];
    let invocation = encode(paths.as_slice(), &OptimizationOptions::default());
    let trailing = &invocation.args()[invocation.args().len() - paths.len()..];
    assert_eq!(trailing, ["c.jpg", "a.jpg", "b.jpg"]);
}

#[test]
fn test_no_validation_of_inputs() {
    // Paths that do not exist and are not JPEGs are passed through untouched.
    let invocation = encode(
        vec!["/definitely/missing.png", "-not-a-flag.jpg"],
        &OptimizationOptions::default(),
    );
    assert_eq!(
        invocation.args(),
        ["--strip-all", "/definitely/missing.png", "-not-a-flag.jpg"]
    );
}

#[test]
fn test_max_quality_beyond_u32_is_emitted() {
    let options = OptimizationOptions::from_json_str(r#"{"max": 4294967296}"#).unwrap();
    assert_eq!(options.max_quality, Some(4_294_967_296));

    let invocation = encode("a.jpg", &options);
    assert_eq!(invocation.args(), ["--strip-all", "--max=4294967296", "a.jpg"]);
}
