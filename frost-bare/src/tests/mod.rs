use super::{
    hash::{DefaultEq, DefaultHasher},
    make_set,
    planner::Planner,
    Map, Set,
};
use alloc::{format, string::String, vec, vec::Vec};
use rapidhash::RapidRng;
use std::collections::{HashMap, HashSet};

/// Integers with many shared digits, a classic stress input for weak integer hashes.
const INIT_SEQ: [i32; 129] = [
    19, 1, 2, 4, 5, 6, 7, 8, 9, 10, 11, 111, 1112, 1115, 1118, 1110, 1977, 177, 277, 477, 577, 677,
    777, 877, 977, 1077, 1177, 11177, 111_277, 111_577, 111_877, 111_077, 1999, 199, 299, 499, 599,
    699, 799, 899, 999, 1099, 1199, 11199, 111_299, 111_599, 111_899, 111_099, 197_799, 17799,
    27799, 47799, 57799, 67799, 77799, 87799, 97799, 107_799, 117_799, 1_117_799, 11_127_799,
    11_157_799, 11_187_799, 11_107_799, 1988, 188, 288, 488, 588, 688, 788, 888, 988, 1088, 1188,
    11188, 111_288, 111_588, 111_888, 111_088, 197_788, 17788, 27788, 47788, 57788, 67788, 77788,
    87788, 97788, 107_788, 117_788, 1_117_788, 11_127_788, 11_157_788, 11_187_788, 11_107_788,
    199_988, 19988, 29988, 49988, 59988, 69988, 79988, 89988, 99988, 109_988, 119_988, 1_119_988,
    11_129_988, 11_159_988, 11_189_988, 11_109_988, 19_779_988, 1_779_988, 2_779_988, 4_779_988,
    5_779_988, 6_779_988, 7_779_988, 8_779_988, 9_779_988, 10_779_988, 11_779_988, 111_779_988,
    1_112_779_988, 1_115_779_988, 1_118_779_988, 1_110_779_988, 456,
];

#[test]
fn three_keys() {
    let set = Set::try_with_capacity(vec![1, 2, 3], 3).unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(set.capacity(), 3);
    assert!(!set.is_empty());
    assert_eq!(set.count(&4), 0);
    assert_eq!(set.count(&1), 1);
    assert_eq!(set.find(&1), Some(0));
    assert_eq!(set.iter().next(), Some(&1));

    let strict = Set::try_build(
        vec![1, 2, 3],
        Some(3),
        &Planner::strict(),
        DefaultHasher::new(),
        DefaultEq::new(),
    )
    .unwrap();
    assert_eq!(strict.find(&1), Some(0));
    assert_eq!(strict.as_slice(), [1, 2, 3]);
}

#[test]
fn singleton() {
    let set = Set::try_with_capacity(vec![1], 1).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(set.capacity(), 1);
    assert_eq!(set.count(&1), 1);
    assert_eq!(set.count(&0), 0);
    assert_eq!(set.find(&1), Some(0));
}

#[test]
fn empty() {
    let set: Set<u64> = Set::from_elements(Vec::new());
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);
    assert_eq!(set.count(&0), 0);
    assert_eq!(set.find(&0), None);
    assert!(set.equal_range(&0).is_empty());
    assert_eq!(set.iter().next(), None);

    let wide: Set<u64> = Set::try_with_capacity(Vec::new(), 10).unwrap();
    assert_eq!(wide.capacity(), 10);
    assert_eq!(wide.count(&12_345), 0);
}

#[test]
fn near_colliding_integers() {
    let sized = Set::try_with_capacity(INIT_SEQ.to_vec(), 129).unwrap();
    let deduced = make_set(INIT_SEQ);
    let reference: HashSet<i32> = INIT_SEQ.iter().copied().collect();
    assert_eq!(sized.len(), 129);
    assert_eq!(deduced.len(), 129);

    for probe in 0..20_000 {
        let expected = usize::from(reference.contains(&probe));
        assert_eq!(sized.count(&probe), expected, "probe {probe}");
        assert_eq!(deduced.count(&probe), expected, "probe {probe}");
    }
    for key in INIT_SEQ {
        assert_eq!(sized.count(&key), 1);
        assert_eq!(deduced.count(&key), 1);
    }
}

#[test]
fn strict_near_colliding_integers() {
    let planner = Planner::strict();
    let set = Set::try_build(
        INIT_SEQ.to_vec(),
        None,
        &planner,
        DefaultHasher::new(),
        DefaultEq::new(),
    )
    .unwrap();
    assert_eq!(set.capacity(), planner.min_capacity(129));
    for key in INIT_SEQ {
        assert_eq!(set.equal_range(&key), [key]);
    }
}

#[test]
fn parity_with_std() {
    let mut rng = RapidRng::new(0x243f_6a88_85a3_08d3);
    for round in 0..20 {
        let len = round * 50;
        let mut reference = HashSet::new();
        while reference.len() < len {
            reference.insert(rng.next() % 1_000_000);
        }
        let set = Set::from_elements(reference.iter().copied().collect());
        assert_eq!(set.len(), len);
        assert_eq!(set.is_empty(), len == 0);
        assert!(set.capacity() >= len);

        for _ in 0..2000 {
            let probe = rng.next() % 1_000_000;
            assert_eq!(set.count(&probe), usize::from(reference.contains(&probe)));
        }
        for key in &reference {
            assert_eq!(set.count(key), 1);
        }
    }
}

#[test]
fn size_invariants() {
    let planner = Planner::new();
    for len in 0..60_u32 {
        for extra in 0..3 {
            let capacity = planner.min_capacity(len as usize) + extra;
            let keys: Vec<u32> = (0..len).map(|i| i.wrapping_mul(2_654_435_761)).collect();
            let set = Set::try_with_capacity(keys, capacity).unwrap();
            assert_eq!(set.len(), len as usize);
            assert_eq!(set.capacity(), capacity);
            assert_eq!(set.is_empty(), len == 0);
        }
    }
}

#[test]
fn iteration_and_positions() {
    let set = make_set(INIT_SEQ);
    let visited: Vec<i32> = set.iter().copied().collect();
    assert_eq!(visited.len(), set.len());
    let distinct: HashSet<i32> = visited.iter().copied().collect();
    assert_eq!(distinct.len(), set.len());

    // Storage order: every element is found exactly at the position it is iterated at.
    for (position, element) in (&set).into_iter().enumerate() {
        assert_eq!(set.find(element), Some(position));
        let range = set.equal_range(element);
        assert_eq!(range.len(), 1);
        assert!(core::ptr::eq(&range[0], &set.as_slice()[position]));
    }

    for probe in [0, 3, 12, 20_000, -1] {
        assert_eq!(set.find(&probe).is_some(), set.count(&probe) == 1);
        assert!(set.equal_range(&probe).len() <= 1);
    }
}

#[test]
fn deterministic() {
    let a = Set::try_with_capacity(INIT_SEQ.to_vec(), 200).unwrap();
    let b = Set::try_with_capacity(INIT_SEQ.to_vec(), 200).unwrap();
    assert_eq!(a.seed(), b.seed());
    assert_eq!(a.as_slice(), b.as_slice());

    // Input order only affects ties within a bucket.
    let mut reversed = INIT_SEQ.to_vec();
    reversed.reverse();
    let c = Set::try_with_capacity(reversed, 200).unwrap();
    assert_eq!(a.seed(), c.seed());
}

#[test]
fn string_keys() {
    let words: Vec<String> = (0..1000).map(|i| format!("word{i}")).collect();
    let map: Map<String, usize> = Map::from_entries(
        words
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, word)| (word, i))
            .collect(),
    );
    let reference: HashMap<&str, usize> = words
        .iter()
        .enumerate()
        .map(|(i, word)| (word.as_str(), i))
        .collect();

    for (word, index) in &reference {
        assert_eq!(map.get(*word), Some(index));
    }
    assert_eq!(map.get("word1000"), None);
    assert_eq!(map.get(""), None);
}

#[test]
fn shared_between_threads() {
    let set = make_set(INIT_SEQ);
    std::thread::scope(|scope| {
        for offset in 0..4 {
            let set = &set;
            scope.spawn(move || {
                for key in INIT_SEQ.iter().skip(offset) {
                    assert!(set.contains(key));
                }
            });
        }
    });
}

#[cfg(feature = "serde")]
#[test]
fn serde_roundtrip() {
    let set = make_set(INIT_SEQ);
    let json = serde_json::to_string(&set).unwrap();
    let restored: Set<i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.seed(), set.seed());
    assert_eq!(restored.as_slice(), set.as_slice());
    for probe in 0..2000 {
        assert_eq!(restored.count(&probe), set.count(&probe));
    }

    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["table"]["seed"]["low"] = serde_json::Value::from(12_345u64);
    assert!(serde_json::from_value::<Set<i32>>(value).is_err());

    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    if let Some(offsets) = value["table"]["offsets"].as_array_mut() {
        offsets.pop();
    }
    assert!(serde_json::from_value::<Set<i32>>(value).is_err());

    let map = super::make_map([("a", 1), ("b", 2)]);
    let json = serde_json::to_string(&map).unwrap();
    let restored: Map<String, i32> = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.get("b"), Some(&2));
}

#[cfg(feature = "serde")]
#[test]
fn serde_rejects_repeated_keys() {
    // One bucket, so every entry is in the right place.
    let set = r#"{"table":{"seed":{"low":1,"high":1},"capacity":1,"offsets":[0,2]},"data":[7,7],"hasher":null,"eq":null}"#;
    assert!(serde_json::from_str::<Set<i32>>(set).is_err());
    let set = set.replace("[7,7]", "[7,8]");
    assert_eq!(serde_json::from_str::<Set<i32>>(&set).unwrap().len(), 2);

    let map = r#"{"table":{"seed":{"low":1,"high":1},"capacity":1,"offsets":[0,2]},"data":[["k",1],["k",2]],"hasher":null,"eq":null}"#;
    assert!(serde_json::from_str::<Map<String, i32>>(map).is_err());
    let map = map.replace(r#"["k",2]"#, r#"["l",2]"#);
    let restored = serde_json::from_str::<Map<String, i32>>(&map).unwrap();
    assert_eq!(restored.get("l"), Some(&2));
}

#[test]
#[ignore = "timing-dependent, meaningful in release builds only"]
fn lookups_beat_std() {
    use core::hint::black_box;
    use std::time::Instant;

    let frozen = make_set(INIT_SEQ);
    let reference: HashSet<i32> = INIT_SEQ.iter().copied().collect();

    let start = Instant::now();
    let mut frozen_hits: usize = 0;
    for _ in 0..50 {
        for probe in 0..20_000 {
            frozen_hits += frozen.count(black_box(&probe));
        }
    }
    let frozen_duration = start.elapsed();

    let start = Instant::now();
    let mut std_hits: usize = 0;
    for _ in 0..50 {
        for probe in 0..20_000 {
            std_hits += usize::from(reference.contains(black_box(&probe)));
        }
    }
    let std_duration = start.elapsed();

    assert_eq!(frozen_hits, std_hits);
    assert!(
        std_duration > frozen_duration,
        "frozen {frozen_duration:?}, std {std_duration:?}",
    );
}
