use multibit_trie::error::InsertError;
use multibit_trie::Trie;

mod common {
    use std::io::Write;

    pub fn init() {
        let _ = env_logger::builder()
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .is_test(true)
            .try_init();
    }
}

#[test]
fn sparse_insert_find_delete_across_full_range() {
    crate::common::init();
    let mut t: Trie<u64> = Trie::new(6, 6, 6).unwrap();
    let max = t.max_index();

    let indices: Vec<u32> = (0..50).map(|i| (i as u32 * 97) % (max + 1)).collect();
    for &idx in &indices {
        let _ = t.insert(idx, idx as u64);
    }

    for &idx in &indices {
        assert_eq!(t.find(idx), Some(&(idx as u64)));
    }

    for &idx in &indices {
        t.delete(idx);
    }
    assert_eq!(t.num_entries(), 0);
    assert_eq!(t.num_l1(), 0);
    assert_eq!(t.num_l2(), 0);
    t.free().unwrap();
}

#[test]
fn insert_failure_hands_leaf_back() {
    let mut t: Trie<String> = Trie::new(2, 2, 2).unwrap();
    let max = t.max_index();
    let err = t.insert(max + 1, "unreachable".to_string()).unwrap_err();
    assert_eq!(err.into_leaf(), "unreachable");

    t.insert(0, "first".to_string()).unwrap();
    match t.insert(0, "second".to_string()) {
        Err(InsertError::Occupied { leaf }) => assert_eq!(leaf, "second"),
        _ => panic!("expected Occupied error"),
    }
    assert_eq!(t.find(0), Some(&"first".to_string()));
}

#[test]
fn traversal_matches_sorted_insertion_order() {
    let mut t: Trie<u32> = Trie::new(5, 5, 5).unwrap();
    let mut indices: Vec<u32> = vec![500, 1, 99999, 2, 0, 32767];
    indices.retain(|&i| i <= t.max_index());
    for &idx in &indices {
        t.insert(idx, idx).unwrap();
    }

    let mut forward = Vec::new();
    let mut cursor = 0u32;
    loop {
        match t.find_next(cursor) {
            Some((idx, leaf)) => {
                forward.push((idx, *leaf));
                if idx == t.max_index() {
                    break;
                }
                cursor = idx + 1;
            }
            None => break,
        }
    }

    let mut expected = indices.clone();
    expected.sort_unstable();
    assert_eq!(forward, expected.iter().map(|&i| (i, i)).collect::<Vec<_>>());

    let mut backward = Vec::new();
    let mut cursor = t.max_index();
    loop {
        match t.find_prev(cursor) {
            Some((idx, leaf)) => {
                backward.push((idx, *leaf));
                if idx == 0 {
                    break;
                }
                cursor = idx - 1;
            }
            None => break,
        }
    }
    let mut expected_rev = expected.clone();
    expected_rev.reverse();
    assert_eq!(
        backward,
        expected_rev.iter().map(|&i| (i, i)).collect::<Vec<_>>()
    );
}
