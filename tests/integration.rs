//! Cross-module scenarios: arena growth/rewind, scope cascade, in-place
//! realloc, hash map collision descent, and string growth.

use polyarena::{Allocator, Arena, GpcHashMap, GpcString, Heap, Scope};

#[test]
fn arena_bump_allocations_stay_sequential_across_many_requests() {
    let arena = Arena::new(4096);
    let mut previous: Option<*mut u8> = None;
    for _ in 0..256 {
        let ptr = arena.alloc_bytes(16);
        if let Some(prev) = previous {
            assert_eq!(ptr.as_ptr() as usize - prev as usize, 16);
        }
        previous = Some(ptr.as_ptr());
    }
}

#[test]
fn arena_growth_creates_additional_nodes_under_sustained_load() {
    let arena = Arena::with_config(16, 2.0, 8192, 8);
    for _ in 0..200 {
        let _ = arena.alloc_bytes(32);
    }
    assert!(arena.node_count() > 1);
    assert!(arena.used() >= 200 * 32);
}

#[test]
fn arena_rewind_to_a_mid_point_replays_allocations() {
    let arena = Arena::new(1024);
    let _ = arena.alloc_bytes(8);
    let mark = arena.peek();
    let first_after_mark = arena.alloc_bytes(24);
    let _ = arena.alloc_bytes(24);

    unsafe { arena.rewind(mark) };

    let replayed = arena.alloc_bytes(24);
    assert_eq!(first_after_mark, replayed);
}

#[test]
fn in_place_realloc_at_the_frontier_preserves_the_address() {
    let arena = Arena::new(1024);
    let block = arena.alloc_bytes(16);
    unsafe {
        block.as_ptr().write_bytes(0x7a, 16);
        let grown = arena.realloc_bytes(block, 16, 48);
        assert_eq!(block, grown);
        for i in 0..16 {
            assert_eq!(*grown.as_ptr().add(i), 0x7a);
        }
    }
}

#[test]
fn scope_cascade_ends_every_descendant_and_runs_their_defers_once() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

    let outer = Scope::begin(0);
    {
        let log = log.clone();
        outer.defer(move || log.borrow_mut().push("outer"));
    }

    let middle = Scope::begin(0);
    {
        let log = log.clone();
        middle.defer(move || log.borrow_mut().push("middle"));
    }

    let inner = Scope::begin(0);
    {
        let log = log.clone();
        inner.defer(move || log.borrow_mut().push("inner"));
    }

    // Ending the outermost scope must cascade through middle and inner,
    // even though neither was ended explicitly, and every defer must fire
    // in LIFO order exactly once.
    outer.end();

    assert_eq!(*log.borrow(), vec!["inner", "middle", "outer"]);
    drop(middle);
    drop(inner);
}

#[test]
fn hash_map_collision_forces_a_full_depth_descent() {
    let heap = Heap::new();
    let mut map: GpcHashMap<u32> = GpcHashMap::with_capacity(&heap, 4);

    // All sixteen keys share the low 2 bits (capacity 4 selects 2 bits), so
    // every insert after the first collides and must descend further.
    let keys: Vec<u128> = (0..16).map(|i: u128| i << 2).collect();
    for (i, &key) in keys.iter().enumerate() {
        map.put(key, i as u32);
    }

    for (i, &key) in keys.iter().enumerate() {
        assert_eq!(map.get(key), Some(&(i as u32)));
    }
    assert_eq!(map.len(), keys.len());
}

#[test]
fn string_grow_from_small_heap_backed_capacity() {
    let heap = Heap::new();
    let mut s = GpcString::new(&heap, 8, b"");
    let payload = vec![b'z'; 32];
    s.append(&payload);

    assert_eq!(s.len(), 32);
    assert!(s.capacity() >= 32);
    assert_eq!(s.as_bytes(), &payload[..]);
}

#[test]
fn zero_length_allocations_are_permitted_and_distinct() {
    let arena = Arena::new(64);
    let a = arena.alloc_bytes(0);
    let b = arena.alloc_bytes(0);
    assert!(!a.as_ptr().is_null());
    assert!(!b.as_ptr().is_null());
    assert_ne!(a, b);
}
