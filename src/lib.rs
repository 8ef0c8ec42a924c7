//! polyarena: polymorphic allocators — heap, arena, scope, scratch — and
//! the dynamic string, dynamic array, and hash map built on top of them.
//!
//! # Allocators
//!
//! Every allocator in this crate implements [`Allocator`]: a small trait
//! with `alloc`/`dealloc`/`realloc`, standing in for void-pointer-plus-
//! function-pointer polymorphism. Four implementations are provided:
//!
//! - [`Heap`] — a zero-sized wrapper over the process's global allocator
//!   that aborts on out-of-memory.
//! - [`Arena`] / [`SharedArena`] — bump allocators that grow by appending
//!   nodes rather than resizing in place, with an in-place realloc fast
//!   path at the bump frontier.
//! - [`Scratch`] (in [`mod@scratch`]) — a per-thread, lazily created arena
//!   for ephemeral allocations, rewound via a mark/release guard.
//! - [`scope::Scope`] — nestable regions whose allocations and deferred
//!   actions all release together, including any descendant scope begun
//!   but never individually ended.
//!
//! # Containers
//!
//! [`string::GpcString`], [`array::GpcArray`], and [`hashmap::GpcHashMap`]
//! are all generic over which [`Allocator`] backs them, so the same
//! container type works whether it lives in the heap, an arena, or a
//! scope.
//!
//! # Usage
//!
//! ```rust
//! use polyarena::{Allocator, Arena};
//!
//! let arena = Arena::new(256);
//! let ptr = arena.alloc_bytes(64);
//! assert!(!ptr.as_ptr().is_null());
//! ```

pub mod allocator;
pub mod array;
pub mod config;
pub mod error;
pub mod file;
pub mod hash;
pub mod hashmap;
pub mod heap;
pub mod platform;
pub mod scope;
pub mod scratch;
pub mod string;
pub mod unicode;
pub mod utils;

mod arena;

pub use allocator::Allocator;
pub use arena::{Arena, SharedArena};
pub use array::GpcArray;
pub use error::PolyError;
pub use hashmap::GpcHashMap;
pub use heap::Heap;
pub use scope::{Scope, ScopeId};
pub use scratch::Scratch;
pub use string::GpcString;
