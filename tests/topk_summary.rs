use anyhow::Result;
use ironprofile::testing::{assert_ranked_eq, summary_from_pairs};
use ironprofile::topk::parse_rendered;
use ironprofile::{ProfileError, RankedEntry, ReportFormat, TopKSummary};

#[test]
fn size_never_exceeds_capacity() -> Result<()> {
    let mut s = TopKSummary::new(3)?;
    for i in 0..100i64 {
        s.add(format!("v{i}"), i);
        assert!(s.len() <= 3);
    }
    assert_eq!(s.len(), 3);
    assert_ranked_eq(
        &s,
        &[("v99".to_string(), 99), ("v98".to_string(), 98), ("v97".to_string(), 97)],
    );
    Ok(())
}

#[test]
fn first_seen_wins_count_ties() -> Result<()> {
    let s = summary_from_pairs(2, [("A", 5), ("B", 5), ("C", 6)])?;
    assert_ranked_eq(&s, &[("C", 6), ("A", 5)]);
    Ok(())
}

#[test]
fn equal_count_does_not_evict() -> Result<()> {
    let s = summary_from_pairs(2, [("A", 5), ("B", 5), ("C", 5)])?;
    assert_ranked_eq(&s, &[("A", 5), ("B", 5)]);
    assert!(!s.contains(&"C"));
    Ok(())
}

#[test]
fn retained_value_updates_in_place() -> Result<()> {
    let s = summary_from_pairs(2, [("A", 1), ("B", 2), ("A", 10)])?;
    assert_ranked_eq(&s, &[("A", 10), ("B", 2)]);

    // a lower count moves the value down but keeps it
    let s = summary_from_pairs(2, [("A", 5), ("B", 3), ("A", 1)])?;
    assert_ranked_eq(&s, &[("B", 3), ("A", 1)]);
    Ok(())
}

#[test]
fn negative_counts_rank_like_any_other() -> Result<()> {
    let s = summary_from_pairs(2, [("A", -1), ("B", -5), ("C", -3)])?;
    assert_ranked_eq(&s, &[("A", -1), ("C", -3)]);
    assert_eq!(s.floor(), -3);
    Ok(())
}

#[test]
fn zero_capacity_is_rejected() {
    let err = TopKSummary::<&str>::new(0).unwrap_err();
    assert_eq!(err, ProfileError::InvalidCapacity(0));
}

#[test]
fn empty_summary() -> Result<()> {
    let s = TopKSummary::<String>::new(4)?;
    assert!(s.is_empty());
    assert_eq!(s.floor(), i64::MAX);
    assert_eq!(s.ranked().len(), 0);
    assert_eq!(s.render(&ReportFormat::default()), "");
    Ok(())
}

#[test]
fn ranked_view_can_be_walked_twice() -> Result<()> {
    let s = summary_from_pairs(3, [("x", 2), ("y", 7), ("z", 4)])?;
    let first: Vec<_> = s.ranked().collect();
    let second: Vec<_> = s.ranked().collect();
    assert_eq!(first, second);
    assert_eq!(
        s.to_ranked_vec(),
        vec![
            RankedEntry::new(1, "y", 7),
            RankedEntry::new(2, "z", 4),
            RankedEntry::new(3, "x", 2),
        ]
    );
    Ok(())
}

#[test]
fn render_uses_default_delimiters() -> Result<()> {
    let s = summary_from_pairs(3, [("cat", 7), ("dog", 13), ("fox", 9)])?;
    let text = s.render(&ReportFormat::default());
    assert_eq!(text, "1^Adog^A13^B2^Afox^A9^B3^Acat^A7^B");
    assert_eq!(s.to_string(), text);
    Ok(())
}

#[test]
fn rendered_text_parses_back() -> Result<()> {
    let format = ReportFormat::new("\u{1}", "\u{2}");
    let s = summary_from_pairs(3, [("cat", 7), ("dog", 13), ("fox", 9)])?;
    let parsed = parse_rendered(&s.render(&format), &format).expect("well-formed");
    let expected: Vec<RankedEntry<String>> = s
        .ranked()
        .map(|e| RankedEntry::new(e.rank, e.value.to_string(), e.count))
        .collect();
    assert_eq!(parsed, expected);

    assert!(parse_rendered("1\u{1}dog\u{2}", &format).is_none());
    Ok(())
}

#[test]
fn field_delimiter_inside_a_value_parses_back() -> Result<()> {
    let format = ReportFormat::new(",", "\n");
    let s = summary_from_pairs(2, [("a,b", 4), ("c", 2)])?;
    let text = s.render(&format);
    assert_eq!(text, "1,a,b,4\n2,c,2\n");
    let parsed = parse_rendered(&text, &format).expect("well-formed");
    assert_eq!(
        parsed,
        vec![RankedEntry::new(1, "a,b".to_string(), 4), RankedEntry::new(2, "c".to_string(), 2)]
    );
    Ok(())
}

#[test]
fn record_delimiter_inside_a_value_does_not_parse() -> Result<()> {
    let format = ReportFormat::new(",", ";");
    let s = summary_from_pairs(1, [("x;y", 3)])?;
    assert_eq!(s.render(&format), "1,x;y,3;");
    assert!(parse_rendered(&s.render(&format), &format).is_none());
    Ok(())
}
