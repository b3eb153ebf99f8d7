use fortunecookie::fortune::{
    fnv1a32, new_selection, pick_deterministic, pick_random_no_repeat, FortuneList, Selector,
};
use fortunecookie::invocation::Identifier;
use fortunecookie::storage::{MemoryStore, SeenSet, SeenSetStore};
use std::collections::HashSet;
mod common;

#[test]
fn deterministic_pick_is_stable_and_in_bounds() {
    let list = common::numbered_list(7);
    for id in ["TAG123", "NTAG-215-04A2B3C4D5", "x", "é", "😀"] {
        let first = pick_deterministic(id, &list).expect("selection");
        assert!(first.index < list.len());
        assert_eq!(first.index, fnv1a32(id) as usize % 7);
        assert_eq!(first.value, format!("F{}", first.index));
        for _ in 0..5 {
            assert_eq!(pick_deterministic(id, &list).as_ref(), Some(&first));
        }
    }
}

#[test]
fn deterministic_scenario_abc() {
    let list = FortuneList::from_entries(["A", "B", "C"]);
    let expected = (fnv1a32("X") % 3) as usize;
    assert_eq!(expected, 2);
    let sel = pick_deterministic("X", &list).unwrap();
    assert_eq!(sel.index, expected);
    assert_eq!(sel.value, "C");
}

#[test]
fn changing_length_changes_mapping_not_hash() {
    let h = fnv1a32("TAG123");
    for n in 1..12 {
        let sel = pick_deterministic("TAG123", &common::numbered_list(n)).unwrap();
        assert_eq!(sel.index, h as usize % n);
    }
}

#[test]
fn full_cycle_visits_every_index_once() {
    let n = 25;
    let list = common::numbered_list(n);
    let mut store = MemoryStore::new();
    let mut rng = common::seeded(42);

    let mut visited = HashSet::new();
    for step in 1..=n {
        let sel = pick_random_no_repeat(&list, &mut store, &mut rng).unwrap();
        assert!(visited.insert(sel.index), "index {} repeated within a cycle", sel.index);
        assert_eq!(sel.seen_count, Some(step));
    }
    assert_eq!(visited, (0..n).collect::<HashSet<_>>());
    assert_eq!(store.get().map(|s| s.len()), Some(n));
}

#[test]
fn pick_after_full_cycle_restarts_at_one() {
    let n = 4;
    let list = common::numbered_list(n);
    let mut store = MemoryStore::new();
    let mut rng = common::seeded(9);
    for _ in 0..n {
        pick_random_no_repeat(&list, &mut store, &mut rng).unwrap();
    }
    let next = pick_random_no_repeat(&list, &mut store, &mut rng).unwrap();
    assert_eq!(next.seen_count, Some(1));
    assert_eq!(store.get(), Some(SeenSet::from([next.index])));
}

#[test]
fn two_item_scenario() {
    let list = FortuneList::from_entries(["A", "B"]);
    let mut store = MemoryStore::new();
    let mut rng = common::seeded(2024);

    let a = pick_random_no_repeat(&list, &mut store, &mut rng).unwrap();
    let b = pick_random_no_repeat(&list, &mut store, &mut rng).unwrap();
    assert_ne!(a.index, b.index);
    assert_eq!(store.get(), Some(SeenSet::from([0, 1])));

    let c = pick_random_no_repeat(&list, &mut store, &mut rng).unwrap();
    assert_eq!(c.seen_count, Some(1));
    assert_eq!(store.get(), Some(SeenSet::from([c.index])));
}

#[test]
fn single_item_list_always_picks_it() {
    let list = FortuneList::from_entries(["only"]);
    let mut store = MemoryStore::new();
    let mut rng = common::seeded(1);
    for _ in 0..3 {
        let sel = pick_random_no_repeat(&list, &mut store, &mut rng).unwrap();
        assert_eq!(sel.index, 0);
        assert_eq!(sel.seen_count, Some(1));
    }
}

#[test]
fn empty_list_is_none_everywhere() {
    let empty = FortuneList::default();
    let mut store = MemoryStore::new();
    let mut rng = common::seeded(5);
    let tag = Identifier::parse(Some("TAG123"));
    assert!(new_selection(tag.as_ref(), &empty, &mut store, &mut rng).is_none());
    assert!(new_selection(None, &empty, &mut store, &mut rng).is_none());
    assert_eq!(store.raw(), None);
}

#[test]
fn corrupt_state_still_yields_a_pick() {
    let list = common::numbered_list(5);
    for raw in ["{{{", "\"hello\"", "[1,2,\"three\"]", "[-4]", "null", ""] {
        let mut store = MemoryStore::with_raw(raw);
        let mut rng = common::seeded(11);
        let sel = pick_random_no_repeat(&list, &mut store, &mut rng)
            .unwrap_or_else(|| panic!("no selection for raw {:?}", raw));
        assert!(sel.index < 5);
        assert_eq!(sel.seen_count, Some(1));
        // The corrupt value is replaced by a clean one.
        assert_eq!(store.get(), Some(SeenSet::from([sel.index])));
    }
}

#[test]
fn failed_writes_do_not_fail_the_pick() {
    let list = common::numbered_list(3);
    let mut store = MemoryStore::read_only(None);
    let mut rng = common::seeded(3);
    let sel = pick_random_no_repeat(&list, &mut store, &mut rng).unwrap();
    assert!(sel.index < 3);
    assert_eq!(sel.seen_count, Some(1));
    assert_eq!(store.get(), None);
}

#[test]
fn identifier_presence_is_rechecked_every_request() {
    let list = common::numbered_list(6);
    let mut selector = Selector::with_rng(list, MemoryStore::new(), common::seeded(77));
    let tag = Identifier::parse(Some("  TAG123  "));
    let blank = Identifier::parse(Some("   "));
    assert!(blank.is_none());

    let det_before = selector.new_selection(tag.as_ref()).unwrap();
    assert_eq!(det_before.seen_count, None);

    let r1 = selector.new_selection(blank.as_ref()).unwrap();
    let r2 = selector.new_selection(None).unwrap();
    assert_eq!(r2.seen_count, Some(2));
    assert_ne!(r1.index, r2.index);

    // Random progress does not shift the deterministic mapping.
    let det_after = selector.new_selection(tag.as_ref()).unwrap();
    assert_eq!(det_before, det_after);
    assert_eq!(det_after.index, fnv1a32("TAG123") as usize % 6);
    assert_eq!(selector.seen_count(), 2);
}

#[test]
fn builtin_list_with_os_rng() {
    let list = FortuneList::builtin();
    let n = list.len();
    let mut selector = Selector::new(list, MemoryStore::new());
    let mut seen = HashSet::new();
    for _ in 0..n {
        let sel = selector.pick_random_no_repeat().unwrap();
        assert!(seen.insert(sel.index));
    }
    assert_eq!(seen.len(), n);
    assert_eq!(selector.seen_count(), n);
}
