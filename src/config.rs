//! Numeric defaults for the allocators and containers, collected here so a
//! caller tuning one subsystem has a single place to look.

/// Minimum size of a freshly created arena node, in bytes.
pub const ARENA_MIN_CAPACITY: usize = 256;

/// Default growth coefficient applied when an arena's head node runs out of
/// space: `new_capacity = round_up(growth_coefficient * head.capacity, align)`.
pub const ARENA_GROWTH_COEFFICIENT: f64 = 2.0;

/// Default upper cap on any single arena node's capacity.
pub const ARENA_DEFAULT_MAX_SIZE: usize = 32 * 1024;

/// Initial capacity of a lazily-created scratch arena.
pub const SCRATCH_INITIAL_CAPACITY: usize = 256;

/// Initial capacity of a freshly begun scope's embedded arena, when the
/// caller does not request a specific size.
pub const SCOPE_DEFAULT_CAPACITY: usize = 256;

/// Initial capacity (in entries) of a scope's defer stack.
pub const DEFER_STACK_INITIAL_CAPACITY: usize = 4;

/// Default capacity of a freshly created hash map, in slots. Must be a power
/// of two.
pub const HASHMAP_DEFAULT_CAPACITY: usize = 256;

/// Minimum size of a hash map subtree allocated on collision.
pub const HASHMAP_MIN_SUBTREE: usize = 4;

/// Minimum capacity a caller-requested dynamic string/array reservation is
/// rounded up from, expressed as the smallest allocation this crate will
/// make on a growable container's behalf.
pub const CONTAINER_MIN_CAPACITY: usize = 8;
