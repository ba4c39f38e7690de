#![cfg(feature = "snapshots")]

use anyhow::Result;
use ironprofile::io::snapshot::{
    decode_partials, decode_summary, encode_partials, encode_summary, read_partials,
    write_partials,
};
use ironprofile::testing::{assert_ranked_eq, sample_rows, sample_schema, summary_from_pairs};
use ironprofile::{ProfileError, Profiler, ProfilerConfig, TopKSummary};
use serde::Serialize;
use tempfile::tempdir;

#[test]
fn summary_survives_a_round_trip() -> Result<()> {
    let s = summary_from_pairs(3, [("cat".to_string(), 5), ("dog".to_string(), 5), ("fox".to_string(), 9)])?;
    let back: TopKSummary<String> = decode_summary(&encode_summary(&s)?)?;
    assert_eq!(back, s);

    // tie order is kept, and the sequence counter still hands out fresh numbers
    let mut back = back;
    back.add("owl".to_string(), 6);
    assert_ranked_eq(
        &back,
        &[("fox".to_string(), 9), ("owl".to_string(), 6), ("cat".to_string(), 5)],
    );
    Ok(())
}

#[derive(Serialize)]
struct RawItem {
    value: String,
    count: i64,
    sequence: u64,
}

#[derive(Serialize)]
struct RawSummary {
    capacity: usize,
    next_sequence: u64,
    items: Vec<RawItem>,
}

fn raw(capacity: usize, items: &[(&str, i64, u64)]) -> Result<Vec<u8>> {
    let state = RawSummary {
        capacity,
        next_sequence: 0,
        items: items
            .iter()
            .map(|&(v, count, sequence)| RawItem {
                value: v.to_string(),
                count,
                sequence,
            })
            .collect(),
    };
    Ok(postcard::to_allocvec(&state)?)
}

#[test]
fn invalid_snapshots_are_rejected() -> Result<()> {
    let too_many = raw(1, &[("a", 1, 0), ("b", 2, 1)])?;
    let duplicate = raw(3, &[("a", 1, 0), ("a", 2, 1)])?;
    let zero = raw(0, &[])?;
    for bytes in [too_many, duplicate, zero] {
        assert!(matches!(
            decode_summary::<String>(&bytes),
            Err(ProfileError::CorruptSnapshot(_))
        ));
    }

    let good = encode_summary(&summary_from_pairs(2, [("a".to_string(), 1)])?)?;
    assert!(matches!(
        decode_summary::<String>(&good[..good.len() - 1]),
        Err(ProfileError::CorruptSnapshot(_))
    ));
    Ok(())
}

#[test]
fn decoded_snapshot_fixes_up_its_sequence_counter() -> Result<()> {
    let bytes = raw(3, &[("a", 4, 7), ("b", 4, 2)])?;
    let mut s = decode_summary::<String>(&bytes)?;
    // "b" has the smaller sequence, so it wins the tie
    assert_ranked_eq(&s, &[("b".to_string(), 4), ("a".to_string(), 4)]);
    s.add("c".to_string(), 4);
    assert_ranked_eq(
        &s,
        &[("b".to_string(), 4), ("a".to_string(), 4), ("c".to_string(), 4)],
    );
    Ok(())
}

#[test]
fn partials_round_trip_to_the_same_report() -> Result<()> {
    let profiler = Profiler::new(ProfilerConfig::default().sequential())?;
    let schema = sample_schema();
    let rows = sample_rows();

    let direct = profiler.profile(&schema, rows.clone())?;
    let partial = profiler.scan_partition(&schema, &rows)?;
    let decoded = decode_partials(&encode_partials(&partial)?)?;
    let combined = profiler.combine_partials(&schema, vec![decoded])?;
    assert_eq!(combined, direct);
    Ok(())
}

#[test]
fn partials_round_trip_through_files() -> Result<()> {
    let dir = tempdir()?;
    let profiler = Profiler::new(ProfilerConfig::default())?;
    let schema = sample_schema();
    let rows = sample_rows();

    let mut paths = Vec::new();
    for (i, chunk) in rows.chunks(4).enumerate() {
        let path = dir.path().join(format!("parts/part-{i}.bin"));
        write_partials(&path, &profiler.scan_partition(&schema, chunk)?)?;
        paths.push(path);
    }
    let partials = paths
        .iter()
        .map(read_partials)
        .collect::<Result<Vec<_>>>()?;
    let report = profiler.combine_partials(&schema, partials)?;
    assert_eq!(report.row_count, 10);
    assert_eq!(report.column("tame").expect("tame").null_count, 1);
    Ok(())
}
