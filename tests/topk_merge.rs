use anyhow::Result;
use ironprofile::combiners::TopValues;
use ironprofile::reduce::{fold_linear, fold_tree};
use ironprofile::testing::{assert_ranked_eq, summary_from_pairs};
use ironprofile::{CombineFn, ProfileError, TopKSummary};

#[test]
fn merge_two_partitions() -> Result<()> {
    let a = summary_from_pairs(3, [("cat", 5), ("dog", 3), ("bird", 1), ("fox", 9)])?;
    let b = summary_from_pairs(3, [("cat", 2), ("dog", 10), ("owl", 4)])?;
    let merged = a.merge(&b)?;
    assert_ranked_eq(&merged, &[("dog", 13), ("fox", 9), ("cat", 7)]);
    Ok(())
}

#[test]
fn shared_values_sum_their_counts() -> Result<()> {
    let a = summary_from_pairs(3, [("x", 4)])?;
    let b = summary_from_pairs(3, [("x", 6)])?;
    assert_eq!(a.merge(&b)?.count_of(&"x"), Some(10));
    Ok(())
}

#[test]
fn capacity_mismatch_is_an_error() -> Result<()> {
    let a = TopKSummary::<&str>::new(3)?;
    let b = TopKSummary::<&str>::new(5)?;
    assert_eq!(
        a.merge(&b).unwrap_err(),
        ProfileError::CapacityMismatch { left: 3, right: 5 }
    );
    Ok(())
}

#[test]
fn merge_is_commutative() -> Result<()> {
    let a = summary_from_pairs(2, [("p", 3), ("q", 3)])?;
    let b = summary_from_pairs(2, [("r", 3), ("s", 3)])?;
    let ab = a.merge(&b)?;
    let ba = b.merge(&a)?;
    assert_eq!(ab, ba);
    assert_ranked_eq(&ab, &[("p", 3), ("r", 3)]);
    Ok(())
}

#[test]
fn merge_is_associative_without_truncation() -> Result<()> {
    let a = summary_from_pairs(10, [("a", 1), ("b", 4), ("c", 2)])?;
    let b = summary_from_pairs(10, [("b", 3), ("d", 8)])?;
    let c = summary_from_pairs(10, [("a", 9), ("e", 1), ("c", 1)])?;
    let left = a.merge(&b)?.merge(&c)?;
    let right = a.merge(&b.merge(&c)?)?;
    assert_eq!(left, right);
    assert_ranked_eq(
        &left,
        &[("a", 10), ("d", 8), ("b", 7), ("c", 3), ("e", 1)],
    );
    Ok(())
}

#[test]
fn inputs_are_left_untouched() -> Result<()> {
    let a = summary_from_pairs(2, [("x", 1), ("y", 2)])?;
    let b = summary_from_pairs(2, [("y", 5), ("z", 9)])?;
    let (a0, b0) = (a.clone(), b.clone());
    let _ = a.merge(&b)?;
    assert_eq!(a, a0);
    assert_eq!(b, b0);
    Ok(())
}

#[test]
fn merging_an_empty_summary_changes_nothing() -> Result<()> {
    let a = summary_from_pairs(3, [("x", 1), ("y", 2)])?;
    let empty = TopKSummary::new(3)?;
    assert_eq!(a.merge(&empty)?, a);
    assert_eq!(empty.merge(&a)?, a);
    Ok(())
}

#[test]
fn merge_keeps_at_most_capacity() -> Result<()> {
    let a = summary_from_pairs(2, [("a", 1), ("b", 2)])?;
    let b = summary_from_pairs(2, [("c", 3), ("d", 4)])?;
    let m = a.merge(&b)?;
    assert_eq!(m.len(), 2);
    assert_ranked_eq(&m, &[("d", 4), ("c", 3)]);
    Ok(())
}

#[test]
fn tree_and_linear_folds_agree() -> Result<()> {
    let comb = TopValues::<String>::new(64)?;
    let parts: Vec<TopKSummary<String>> = (0..20)
        .map(|p| {
            let mut s = CombineFn::<(String, i64), _, _>::create(&comb);
            for v in 0..10i64 {
                s.add(format!("v{}", (p + v) % 30), v + 1);
            }
            s
        })
        .collect();

    let linear = fold_linear::<(String, i64), _, _, _>(&comb, parts.clone())?;
    for fanout in [2, 3, 7] {
        let tree = fold_tree::<(String, i64), _, _, _>(&comb, parts.clone(), fanout)?;
        assert_eq!(tree.to_ranked_vec(), linear.to_ranked_vec(), "fanout {fanout}");
    }
    Ok(())
}
