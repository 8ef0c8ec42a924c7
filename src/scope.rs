//! The scope allocator: nestable regions whose allocations and deferred
//! actions are all released together when the scope ends, including any
//! descendant scope that was begun but never individually ended.
//!
//! The parent-chain-walked-on-drop shape, the "only the innermost scope may
//! allocate" runtime check, and the dtor-chain-run-in-LIFO-order logic follow
//! a scoped-scratch design whose `Drop` impl cascades through unended child
//! scopes and whose `locked` assertion rejects allocation through anything
//! but the innermost scope. Two deliberate departures from a more literal
//! translation:
//!
//! - The current scope is the top of an explicit stack (a `Vec` of scope
//!   records) rather than recovered by pointer arithmetic against a
//!   per-thread factory arena's bump position. The thread-local
//!   `Vec<ScopeInner>` below *is* that stack; popping an entry off it plays
//!   the role that rewinding the factory arena to just before the scope's
//!   record would in a pointer-arithmetic design.
//! - Deferred actions are boxed closures (`Box<dyn FnOnce()>`), not a C-style
//!   function pointer plus `void*` pair.

use std::cell::{Cell, RefCell};
use std::ptr::NonNull;

use crate::allocator::Allocator;
use crate::arena::Arena;
use crate::config::{DEFER_STACK_INITIAL_CAPACITY, SCOPE_DEFAULT_CAPACITY};

/// Identifies a scope begun on the current thread. Opaque; compare with
/// `==` only to check whether two handles name the same scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeId(u64);

struct ScopeInner {
    id: u64,
    arena: Arena,
    defers: RefCell<Vec<Box<dyn FnOnce()>>>,
}

thread_local! {
    static STACK: RefCell<Vec<ScopeInner>> = const { RefCell::new(Vec::new()) };
    static NEXT_ID: Cell<u64> = const { Cell::new(0) };
}

/// Begins a new scope on the calling thread, nested inside whatever scope
/// (if any) is currently innermost. `initial_capacity` of `0` uses the
/// default (256 bytes).
pub fn begin(initial_capacity: usize) -> ScopeId {
    let id = NEXT_ID.with(|c| {
        let v = c.get();
        c.set(v + 1);
        v
    });
    let capacity = if initial_capacity == 0 {
        SCOPE_DEFAULT_CAPACITY
    } else {
        initial_capacity
    };
    STACK.with(|s| {
        s.borrow_mut().push(ScopeInner {
            id,
            arena: Arena::new(capacity),
            defers: RefCell::new(Vec::with_capacity(DEFER_STACK_INITIAL_CAPACITY)),
        })
    });
    ScopeId(id)
}

fn finalize(inner: ScopeInner) {
    let mut defers = inner.defers.into_inner();
    while let Some(f) = defers.pop() {
        f();
    }
    // `inner.arena` drops here, releasing every allocation made in it.
}

/// Ends `scope`. If `scope` has already been ended — directly, or because
/// an outer scope's `end` already cascaded through it — this is a no-op.
///
/// Otherwise, walks the calling thread's scope stack from the innermost
/// scope outward, ending every scope it passes (running its defers in LIFO
/// order, then releasing its arena) until `scope` itself has been ended.
/// This is the "ending an outer scope ends all unended inner scopes"
/// invariant: any scope nested inside `scope` that the caller never
/// individually ended is finalized as part of this call.
pub fn end(scope: ScopeId) {
    STACK.with(|s| {
        let present = s.borrow().iter().any(|inner| inner.id == scope.0);
        if !present {
            return;
        }
        loop {
            let Some(inner) = s.borrow_mut().pop() else {
                break;
            };
            let id = inner.id;
            finalize(inner);
            if id == scope.0 {
                break;
            }
        }
    });
}

/// Appends `(f)` to `scope`'s defer stack. Deferred actions run in reverse
/// registration order when the scope they were registered on ends (directly
/// or via cascade).
///
/// # Panics
/// Panics if `scope` has already ended.
pub fn defer(scope: ScopeId, f: impl FnOnce() + 'static) {
    STACK.with(|s| {
        let stack = s.borrow();
        let inner = stack
            .iter()
            .find(|inner| inner.id == scope.0)
            .expect("deferred onto a scope that has already ended");
        inner.defers.borrow_mut().push(Box::new(f));
    });
}

/// Allocates `size` bytes from `scope`'s own embedded arena.
///
/// # Panics
/// Panics if `scope` has already ended, or if `scope` is not the calling
/// thread's innermost active scope — mirroring `ScopedScratch`'s rule that
/// only the current, unnested scope may allocate. A scope with an active
/// child must route allocation through that child (or defer it) instead.
pub fn alloc_bytes(scope: ScopeId, size: usize) -> NonNull<u8> {
    STACK.with(|s| {
        let stack = s.borrow();
        let top = stack.last().expect("allocated with no active scope");
        assert!(
            top.id == scope.0,
            "tried to allocate from a scope that has an active child scope"
        );
        top.arena.alloc_bytes(size)
    })
}

/// Runs `f` with the calling thread's current (innermost, not yet ended)
/// scope's arena if one exists, otherwise with `fallback`. Intended for
/// callbacks that need an allocator but were not handed one as an argument.
pub fn with_last_scope<R>(fallback: &dyn Allocator, f: impl FnOnce(&dyn Allocator) -> R) -> R {
    STACK.with(|s| {
        let stack = s.borrow();
        match stack.last() {
            Some(inner) => f(&inner.arena),
            None => f(fallback),
        }
    })
}

/// Returns `true` if any scope is currently active on the calling thread.
pub fn has_current_scope() -> bool {
    STACK.with(|s| !s.borrow().is_empty())
}

/// An RAII handle around [`begin`]/[`end`], for callers who want the scope
/// ended automatically at the end of a block rather than via an explicit
/// `end` call.
pub struct Scope {
    id: ScopeId,
    ended: bool,
}

impl Scope {
    /// Begins a new scope, nested inside the calling thread's current one.
    pub fn begin(initial_capacity: usize) -> Self {
        Scope {
            id: begin(initial_capacity),
            ended: false,
        }
    }

    /// This scope's opaque identity, usable with the free functions above.
    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Allocates `size` bytes from this scope's arena.
    pub fn alloc_bytes(&self, size: usize) -> NonNull<u8> {
        alloc_bytes(self.id, size)
    }

    /// Defers `f` to run (in LIFO order with any other deferred action on
    /// this scope) when the scope ends.
    pub fn defer(&self, f: impl FnOnce() + 'static) {
        defer(self.id, f);
    }

    /// Ends the scope now rather than waiting for `Drop`.
    pub fn end(mut self) {
        self.end_mut();
    }

    fn end_mut(&mut self) {
        if !self.ended {
            end(self.id);
            self.ended = true;
        }
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.end_mut();
    }
}

unsafe impl Allocator for Scope {
    fn alloc(&self, layout: std::alloc::Layout) -> NonNull<u8> {
        // Bypass this scope's fixed alignment only when the caller needs
        // something stricter than max-align; the common case goes through
        // the scope's own arena.
        if layout.align() > self.alignment() {
            return crate::heap::Heap::new().alloc(layout);
        }
        self.alloc_bytes(layout.size())
    }

    unsafe fn dealloc(&self, _ptr: NonNull<u8>, _layout: std::alloc::Layout) {}
}

impl Scope {
    /// This scope's embedded arena's alignment, without handing out a
    /// reference into thread-local storage.
    fn alignment(&self) -> usize {
        STACK.with(|s| {
            s.borrow()
                .iter()
                .find(|inner| inner.id == self.id.0)
                .map(|inner| inner.arena.alignment())
                .unwrap_or(crate::utils::MAX_ALIGN)
        })
    }
}
