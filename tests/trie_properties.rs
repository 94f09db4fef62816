use std::collections::BTreeMap;

use multibit_trie::Trie;
use quickcheck_macros::quickcheck;

#[derive(Clone, Debug)]
enum Op {
    Insert(u32, u32),
    Delete(u32),
}

impl quickcheck::Arbitrary for Op {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let idx = u32::arbitrary(g) % 4096;
        if bool::arbitrary(g) {
            Op::Insert(idx, u32::arbitrary(g))
        } else {
            Op::Delete(idx)
        }
    }
}

// Invariant 4/6: round-trip and idempotent-occupied behavior against a
// BTreeMap reference model, strides fixed small enough to exercise
// real collisions.
#[quickcheck]
fn matches_btreemap_reference(ops: Vec<Op>) -> bool {
    let mut trie: Trie<u32> = Trie::new(4, 4, 4).unwrap();
    let mut model: BTreeMap<u32, u32> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Insert(idx, val) => {
                let already_present = model.contains_key(&idx);
                let result = trie.insert(idx, val);
                if already_present {
                    if result.is_ok() {
                        return false;
                    }
                } else {
                    if result.is_err() {
                        return false;
                    }
                    model.insert(idx, val);
                }
            }
            Op::Delete(idx) => {
                let expected = model.remove(&idx);
                let got = trie.delete(idx);
                if got != expected {
                    return false;
                }
            }
        }
        if trie.num_entries() as usize != model.len() {
            return false;
        }
        for (&idx, &val) in &model {
            if trie.find(idx) != Some(&val) {
                return false;
            }
        }
    }
    true
}

// Invariant 8: ascending findNext traversal visits exactly the
// populated indices, in order.
#[quickcheck]
fn find_next_traversal_matches_sorted_keys(keys: Vec<u32>) -> bool {
    let mut trie: Trie<u32> = Trie::new(4, 4, 4).unwrap();
    let mut expected = std::collections::BTreeSet::new();
    for k in keys {
        let k = k % 4096;
        if trie.insert(k, k).is_ok() {
            expected.insert(k);
        }
    }

    let mut seen = Vec::new();
    let mut cursor = 0u32;
    loop {
        match trie.find_next(cursor) {
            Some((idx, _)) => {
                seen.push(idx);
                if idx == trie.max_index() {
                    break;
                }
                cursor = idx + 1;
            }
            None => break,
        }
    }
    seen == expected.into_iter().collect::<Vec<_>>()
}
