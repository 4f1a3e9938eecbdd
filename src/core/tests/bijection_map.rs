use std::collections::HashSet;

use crate::core::bijection_map::BijectionMap;

#[test]
fn map_both_ways() {
    let mut map = BijectionMap::new();
    map.map(1u32, "one".to_string());
    map.map(2u32, "two".to_string());
    assert_eq!(map.len(), 2);
    assert_eq!(map.get_right(&1), Some(&"one".to_string()));
    assert_eq!(map.get_left(&"two".to_string()), Some(&2));
    assert!(map.contains_left(&1));
    assert!(map.contains_right(&"one".to_string()));
    assert!(map.contains(&1, &"one".to_string()));
    assert!(!map.contains(&1, &"two".to_string()));
    assert_eq!(map.get_right(&3), None);
}

#[test]
fn remap_replaces_both_bindings() {
    let mut map = BijectionMap::new();
    map.map(1, 'a');
    map.map(2, 'b');
    // 1 takes b, so both 1 -> a and 2 -> b go
    map.map(1, 'b');
    assert_eq!(map.len(), 1);
    assert_eq!(map.get_right(&1), Some(&'b'));
    assert_eq!(map.get_left(&'b'), Some(&1));
    assert!(!map.contains_left(&2));
    assert!(!map.contains_right(&'a'));

    // Mapping the same pair again is harmless
    map.map(1, 'b');
    assert_eq!(map.len(), 1);
}

#[test]
fn remove() {
    let mut map: BijectionMap<i32, char> = vec![(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
    assert_eq!(map.remove_with_left(&1), Some('a'));
    assert_eq!(map.remove_with_left(&1), None);
    assert!(!map.contains_right(&'a'));
    assert_eq!(map.remove_with_right(&'b'), Some(2));
    assert_eq!(map.remove_with_right(&'b'), None);
    assert!(!map.contains_left(&2));
    assert_eq!(map.len(), 1);
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.get_left(&'c'), None);
}

#[test]
fn retain() {
    let mut map: BijectionMap<i32, char> = vec![(1, 'a'), (2, 'b'), (3, 'c')].into_iter().collect();
    let keep: HashSet<i32> = [1, 3].iter().cloned().collect();
    assert!(map.retain_left(&keep));
    assert_eq!(map.left_set(), keep);
    assert!(!map.contains_right(&'b'));
    // Nothing more to remove
    assert!(!map.retain_left(&keep));

    let keep: HashSet<char> = ['c'].iter().cloned().collect();
    assert!(map.retain_right(&keep));
    assert_eq!(map.right_set(), keep);
    assert_eq!(map.get_left(&'c'), Some(&3));
    assert!(!map.contains_left(&1));
}

#[test]
fn extend_and_display() {
    let mut map = BijectionMap::new();
    map.extend(vec![(1, 'a'), (2, 'b')]);
    // Extending applies the same replacement rule as map
    map.extend(vec![(3, 'a')]);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get_left(&'a'), Some(&3));

    let mut single = BijectionMap::new();
    single.map("k", 5);
    assert_eq!(single.to_string(), "[k=5]");
    assert_eq!(single.iter().count(), 1);

    let other: BijectionMap<&str, i32> = vec![("k", 5)].into_iter().collect();
    assert_eq!(single, other);
}
