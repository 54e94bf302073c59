//! End-to-end merge tests on synthetic FLV files.

mod common;

use std::fs;

use common::*;
use flvjoin::{MergeError, MergeOptions};

#[test]
fn test_second_file_continues_from_first() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.flv", &av_file(&[0, 0, 500, 1000]));
    let b = write(dir.path(), "b.flv", &av_file(&[0, 0, 1000, 2000]));
    let out = dir.path().join("out.flv");

    let summary = flvjoin::merge(&[&a, &b], &out).unwrap();

    let tags = read_tags(&fs::read(&out).unwrap());
    let timestamps: Vec<u32> = tags.iter().map(|t| t.1).collect();
    assert_eq!(timestamps, vec![0, 0, 500, 1000, 1000, 1000, 2000, 3000]);
    assert_eq!(summary.final_timestamp, 3000);
    assert_eq!(summary.sources[1].first_timestamp, Some(1000));
    assert_eq!(summary.sources[1].last_timestamp, 3000);
}

#[test]
fn test_three_files_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = [
        av_file(&[0, 0, 40]),
        av_file(&[0, 0, 20, 60, 80]),
        av_file(&[0, 10]),
    ];
    let paths: Vec<_> = inputs
        .iter()
        .enumerate()
        .map(|(i, data)| write(dir.path(), &format!("{}.flv", i), data))
        .collect();
    let out = dir.path().join("joined.flv");

    let summary = flvjoin::merge(paths.as_slice(), &out).unwrap();
    let merged = fs::read(&out).unwrap();

    // header and leading footer come from the first input
    assert_eq!(&merged[..13], &inputs[0][..13]);

    let tags = read_tags(&merged);
    assert_eq!(tags.len(), 3 + 5 + 2);
    assert_eq!(summary.tags, 10);
    assert_eq!(summary.bytes_written, merged.len() as u64);

    // payloads keep their original relative order
    let expected: Vec<Vec<u8>> = inputs.iter().flat_map(|data| read_tags(data)).map(|t| t.2).collect();
    let actual: Vec<Vec<u8>> = tags.iter().map(|t| t.2.clone()).collect();
    assert_eq!(actual, expected);

    let timestamps: Vec<u32> = tags.iter().map(|t| t.1).collect();
    assert_eq!(timestamps, vec![0, 0, 40, 40, 40, 60, 100, 120, 120, 130]);
}

#[test]
fn test_output_bytes_differ_only_in_timestamps() {
    let dir = tempfile::tempdir().unwrap();
    let first = av_file(&[0, 0, 100]);
    let second = av_file(&[0, 0, 100]);
    let a = write(dir.path(), "a.flv", &first);
    let b = write(dir.path(), "b.flv", &second);
    let out = dir.path().join("out.flv");

    flvjoin::merge(&[&a, &b], &out).unwrap();
    let merged = fs::read(&out).unwrap();

    assert_eq!(&merged[..first.len()], &first[..]);
    let tail = &merged[first.len()..];
    assert_eq!(tail.len(), second.len() - 13);
    for (i, (got, want)) in tail.iter().zip(&second[13..]).enumerate() {
        let in_timestamp = read_tags(&second)
            .iter()
            .scan(0usize, |pos, t| {
                let start = *pos;
                *pos += 11 + t.2.len() + 4;
                Some(start + 4..start + 8)
            })
            .any(|range| range.contains(&i));
        if !in_timestamp {
            assert_eq!(got, want, "byte {} of second input changed", i);
        }
    }
}

#[test]
fn test_video_codec_mismatch_rejected_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.flv", &av_file_with(0x20, 0x12, &[0, 0]));
    let b = write(dir.path(), "b.flv", &av_file_with(0x20, 0x17, &[0, 0]));
    let out = dir.path().join("out.flv");

    let result = flvjoin::merge(&[&a, &b], &out);

    assert!(matches!(result, Err(MergeError::IncompatibleStreams { .. })));
    assert!(!out.exists());
}

#[test]
fn test_audio_rate_mismatch_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.flv", &av_file_with(0x2C, 0x12, &[0, 0]));
    let b = write(dir.path(), "b.flv", &av_file_with(0x28, 0x12, &[0, 0]));

    let result = flvjoin::check(&[a, b], MergeOptions::default());
    match result {
        Err(MergeError::IncompatibleStreams { detail, .. }) => assert_eq!(detail, "sound rate 3 != 2"),
        other => panic!("expected IncompatibleStreams, got {:?}", other),
    }
}

#[test]
fn test_invalid_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.flv", &av_file(&[0, 0]));
    let b = write(dir.path(), "b.flv", b"FLV\x01\x05\x00\x00");
    let out = dir.path().join("out.flv");

    let result = flvjoin::merge(&[&a, &b], &out);

    assert!(matches!(result, Err(MergeError::InvalidContainer(_))));
    assert!(!out.exists());
}

#[test]
fn test_missing_input_is_resource_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.flv", &av_file(&[0, 0]));
    let missing = dir.path().join("nope.flv");

    let result = flvjoin::merge(&[a, missing.clone()], dir.path().join("out.flv"));

    match result {
        Err(MergeError::ResourceUnavailable { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected ResourceUnavailable, got {:?}", other),
    }
}

#[test]
fn test_audio_only_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.flv", &av_file(&[0, 0]));
    let audio_only = flv(0x04, &[tag(AUDIO, &[0x20], 0), tag(AUDIO, &[0x20], 20)]);
    let b = write(dir.path(), "b.flv", &audio_only);

    let result = flvjoin::merge(&[a, b], dir.path().join("out.flv"));
    assert!(matches!(result, Err(MergeError::ProbeIncomplete { tags_scanned: 2 })));
}

#[test]
fn test_single_input_is_not_enough() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.flv", &av_file(&[0, 0]));
    let out = dir.path().join("out.flv");

    let result = flvjoin::merge(&[a], &out);
    assert!(matches!(result, Err(MergeError::NotEnoughInputs(1))));
    assert!(!out.exists());
}

#[test]
fn test_script_tags_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let with_meta = flv(
        0x05,
        &[
            tag(SCRIPT, b"\x02\x00\x0aonMetaData", 0),
            tag(VIDEO, &[0x12, 1], 0),
            tag(AUDIO, &[0x20, 2], 0),
            tag(VIDEO, &[0x22, 3], 33),
        ],
    );
    let a = write(dir.path(), "a.flv", &with_meta);
    let b = write(dir.path(), "b.flv", &with_meta);
    let out = dir.path().join("out.flv");

    flvjoin::merge(&[a, b], &out).unwrap();

    let tags = read_tags(&fs::read(&out).unwrap());
    let kinds: Vec<u8> = tags.iter().map(|t| t.0).collect();
    assert_eq!(kinds, vec![SCRIPT, VIDEO, AUDIO, VIDEO, SCRIPT, VIDEO, AUDIO, VIDEO]);
    assert_eq!(tags[4].1, 33);
}

/// Second input probes fine but its last payload is cut short.
fn truncated_second_input(dir: &std::path::Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let a = write(dir, "a.flv", &av_file(&[0, 0, 100]));
    let mut broken = av_file(&[0, 0, 100, 200]);
    broken.truncate(broken.len() - 6);
    let b = write(dir, "b.flv", &broken);
    (a, b)
}

#[test]
fn test_copy_failure_leaves_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let (a, b) = truncated_second_input(dir.path());
    let out = dir.path().join("out.flv");

    let result = flvjoin::merge(&[a, b], &out);

    assert!(matches!(result, Err(MergeError::CopyFailed(_))));
    let partial = fs::read(&out).unwrap();
    assert!(partial.starts_with(b"FLV"));
}

#[test]
fn test_atomic_failure_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let (a, b) = truncated_second_input(dir.path());
    let out = dir.path().join("out.flv");
    fs::write(&out, b"previous").unwrap();

    let options = MergeOptions::new().with_atomic(true);
    let result = flvjoin::merge_with_options(&[a, b], &out, options);

    assert!(matches!(result, Err(MergeError::CopyFailed(_))));
    assert_eq!(fs::read(&out).unwrap(), b"previous");
    // staging file cleaned up
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
}

#[test]
fn test_atomic_success_replaces_output() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.flv", &av_file(&[0, 0, 100]));
    let b = write(dir.path(), "b.flv", &av_file(&[0, 0, 100]));
    let out = dir.path().join("out.flv");
    fs::write(&out, b"previous").unwrap();

    let options = MergeOptions::new().with_atomic(true);
    let summary = flvjoin::merge_with_options(&[a, b], &out, options).unwrap();

    let merged = fs::read(&out).unwrap();
    assert_eq!(merged.len() as u64, summary.bytes_written);
    assert_eq!(read_tags(&merged).len(), 6);
}

#[test]
fn test_probe_file_reports_config() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.flv", &av_file_with(0xAF, 0x17, &[0, 0]));

    let source = flvjoin::probe_file(&a, 16).unwrap();
    let config = source.config();

    assert_eq!(config.audio.format, 10);
    assert_eq!(config.audio.rate, 3);
    assert_eq!(config.audio.size, 1);
    assert_eq!(config.audio.channel, 1);
    assert_eq!(config.video_codec, 7);
    assert!(source.header().has_audio());
}
