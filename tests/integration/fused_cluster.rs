//! Integration tests: primary lists backed by fused backups.

use fusion_erasure::{CodeConfig, ErasureError, Fusion, Symbol, boundary};
use fusion_integration_tests::{FusedCluster, test_symbols_seeded};

/// Three primaries of different lengths, two backups.
fn populated_cluster() -> FusedCluster {
    let mut cluster = FusedCluster::new(3, 2, 16);
    for (primary, len) in [(0, 5), (1, 3), (2, 7)] {
        for value in test_symbols_seeded(len, primary as u64) {
            cluster.push(primary, value);
        }
    }
    cluster
}

#[test]
fn test_backups_hold_row_encodings() {
    let cluster = populated_cluster();
    let fusion = Fusion::new(CodeConfig::new(3, 2, 16)).unwrap();

    // Append-only lists: node `row` holds list index `row` of each primary.
    for row in 0..7 {
        let data: Vec<Symbol> = (0..3)
            .map(|i| cluster.primary(i).get(row).copied().unwrap_or(Symbol::ZERO))
            .collect();
        let code = fusion.encode(&data).unwrap();
        for (j, expected) in code.iter().enumerate() {
            assert_eq!(cluster.backup(j).fused_data()[row], *expected, "row {row} backup {j}");
        }
    }
}

#[test]
fn test_backups_agree_on_index_data() {
    let mut cluster = populated_cluster();
    cluster.remove(2, 1);
    cluster.insert(0, 2, Symbol(9));
    assert_eq!(cluster.backup(0).index_data(), cluster.backup(1).index_data());
    assert_eq!(cluster.backup(0).len(), 6);
}

#[test]
fn test_recover_lost_primaries() {
    let mut cluster = populated_cluster();
    let expected = cluster.snapshot();

    for lost in [vec![0], vec![2], vec![0, 1], vec![1, 2]] {
        let restored = cluster.recover(&lost, &[]).unwrap();
        assert_eq!(restored, expected, "lost primaries {lost:?}");
    }
}

#[test]
fn test_recover_mixed_losses() {
    let mut cluster = populated_cluster();
    let expected = cluster.snapshot();

    assert_eq!(cluster.recover(&[1], &[0]).unwrap(), expected);
    assert_eq!(cluster.recover(&[2], &[1]).unwrap(), expected);
    assert_eq!(cluster.recover(&[], &[0, 1]).unwrap(), expected);
}

#[test]
fn test_remove_from_middle_then_recover() {
    let mut cluster = populated_cluster();
    let before = cluster.primary(2);

    let removed = cluster.remove(2, 2);
    assert_eq!(removed, before[2]);
    let mut expected_list = before.clone();
    expected_list.remove(2);
    assert_eq!(cluster.primary(2), expected_list);

    cluster.remove(0, 0);
    cluster.remove(0, 1);

    let expected = cluster.snapshot();
    assert_eq!(expected[2], expected_list);
    assert_eq!(cluster.recover(&[0, 2], &[]).unwrap(), expected);
    assert_eq!(cluster.recover(&[2], &[1]).unwrap(), expected);
}

#[test]
fn test_insert_in_middle_then_recover() {
    let mut cluster = populated_cluster();
    cluster.insert(1, 0, Symbol(0xAAAA));
    cluster.insert(1, 2, Symbol(0xBBBB));
    cluster.set(1, 3, Symbol(0xCCCC));

    let expected = cluster.snapshot();
    assert_eq!(expected[1][0], Symbol(0xAAAA));
    assert_eq!(expected[1][2], Symbol(0xBBBB));
    assert_eq!(expected[1][3], Symbol(0xCCCC));
    assert_eq!(cluster.recover(&[1], &[0]).unwrap(), expected);
}

#[test]
fn test_index_data_host_form_marks_absent_primaries() {
    let mut cluster = FusedCluster::new(2, 1, 16);
    cluster.push(0, Symbol(1));
    cluster.push(0, Symbol(2));
    cluster.push(1, Symbol(3));

    let host = boundary::index_data_to_host(&cluster.backup(0).index_data());
    assert_eq!(host, vec![vec![0, 0], vec![1, -1]]);
}

#[test]
fn test_removing_everything_empties_backups() {
    let mut cluster = populated_cluster();
    for primary in 0..3 {
        while !cluster.primary(primary).is_empty() {
            cluster.remove(primary, 0);
        }
    }
    assert!(cluster.backup(0).is_empty());
    assert!(cluster.backup(1).is_empty());
}

#[test]
fn test_too_many_losses() {
    let mut cluster = populated_cluster();
    let err = cluster.recover(&[0, 1], &[0]).unwrap_err();
    assert!(matches!(err, ErasureError::UnrecoverableErasure { erased: 3, .. }));
}
