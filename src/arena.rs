//! The bump arena: a linked list of growable nodes, the non-shared and
//! mutex-shared variants, and the in-place realloc fast path.
//!
//! The bump-cursor-and-capacity bookkeeping (`used`/`capacity`/`remaining`)
//! follows a classic fixed-slab bump allocator; the `rewind`/`peek` contract
//! and its debug-only pointer-ownership assertion follow a linear allocator
//! that rewinds to a saved mark rather than freeing block by block. Growing
//! across multiple nodes instead of one fixed slab, and the in-place-realloc-
//! at-the-frontier fast path, are this module's own extension of that shape.

use std::alloc::Layout;
use std::cell::RefCell;
use std::ptr::NonNull;
use std::sync::Mutex;

use crate::allocator::Allocator;
use crate::config::{ARENA_DEFAULT_MAX_SIZE, ARENA_GROWTH_COEFFICIENT, ARENA_MIN_CAPACITY};
use crate::heap::Heap;
use crate::utils::{align_up, in_bounds, MAX_ALIGN};

/// Rounds `size` up to a bump step of at least one alignment unit, so that
/// zero-size allocations still advance the cursor and remain distinct from
/// one another.
#[inline]
fn bump_step(size: usize, alignment: usize) -> usize {
    if size == 0 {
        alignment
    } else {
        align_up(size, alignment)
    }
}

struct Node {
    ptr: NonNull<u8>,
    layout: Layout,
    bump: usize,
}

impl Node {
    fn capacity(&self) -> usize {
        self.layout.size()
    }

    fn remaining(&self) -> usize {
        self.capacity() - self.bump
    }

    /// Whether `position` lies within this node's backing block, *inclusive*
    /// of the one-past-the-end address (the bump pointer's resting position
    /// when the node is exactly full). Delegates to [`in_bounds`] with a
    /// zero-length probe, which gives exactly that inclusive check.
    fn contains(&self, position: *mut u8) -> bool {
        in_bounds(position, self.ptr.as_ptr(), self.capacity(), 0)
    }
}

/// Node list plus the bump logic shared by [`Arena`] and [`SharedArena`].
/// Not `pub`: exposed to callers only through those two wrappers, which
/// differ in how they synchronize access to it.
struct ArenaCore {
    nodes: Vec<Node>,
}

impl ArenaCore {
    /// `initial_capacity` is used as given, only rounded up to `alignment`
    /// — the 256-byte floor is applied by [`Arena::new`] itself, not here,
    /// so that [`Arena::with_config`] can still build small arenas for
    /// exercising growth.
    fn new(initial_capacity: usize, alignment: usize) -> Self {
        let capacity = align_up(initial_capacity.max(1), alignment);
        let layout = Layout::from_size_align(capacity, alignment).expect("invalid arena layout");
        let ptr = Heap::new().alloc(layout);
        ArenaCore {
            nodes: vec![Node {
                ptr,
                layout,
                bump: 0,
            }],
        }
    }

    fn head(&self) -> &Node {
        self.nodes.last().expect("arena always has at least one node")
    }

    fn alloc(&mut self, size: usize, alignment: usize, growth: f64, max_size: usize) -> NonNull<u8> {
        let step = bump_step(size, alignment);
        if self.head().remaining() >= step {
            let head = self.nodes.last_mut().unwrap();
            let ptr = unsafe { head.ptr.as_ptr().add(head.bump) };
            head.bump += step;
            return unsafe { NonNull::new_unchecked(ptr) };
        }

        let head_capacity = self.head().capacity();
        let grown = align_up(((head_capacity as f64) * growth) as usize, alignment);
        let new_capacity = grown.min(max_size).max(step);
        let layout = Layout::from_size_align(new_capacity, alignment).expect("invalid arena layout");
        let ptr = Heap::new().alloc(layout);
        let out = ptr.as_ptr();
        self.nodes.push(Node {
            ptr,
            layout,
            bump: step,
        });
        unsafe { NonNull::new_unchecked(out) }
    }

    /// # Safety
    /// `ptr` must have been returned by a previous `alloc`/`realloc` call on
    /// this same core with `old_size`.
    unsafe fn realloc(
        &mut self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
        alignment: usize,
        growth: f64,
        max_size: usize,
    ) -> NonNull<u8> {
        let old_step = bump_step(old_size, alignment);
        let new_step = bump_step(new_size, alignment);

        let at_frontier = {
            let head = self.head();
            let bump_ptr = head.ptr.as_ptr().add(head.bump);
            ptr.as_ptr().add(old_step) == bump_ptr
        };

        if at_frontier {
            let head = self.nodes.last_mut().unwrap();
            let offset = ptr.as_ptr().offset_from(head.ptr.as_ptr()) as usize;
            if offset + new_step <= head.capacity() {
                head.bump = offset + new_step;
                return ptr;
            }
        }

        let new_ptr = self.alloc(new_size, alignment, growth, max_size);
        std::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), old_size.min(new_size));
        new_ptr
    }

    /// # Safety
    /// `position` must be a pointer previously returned by this core's
    /// `alloc`/`realloc`, or the result of an earlier `peek`.
    unsafe fn rewind(&mut self, position: *mut u8) {
        while self.nodes.len() > 1 && !self.head().contains(position) {
            let node = self.nodes.pop().unwrap();
            Heap::new().dealloc(node.ptr, node.layout);
        }
        let head = self.nodes.last_mut().unwrap();
        debug_assert!(
            head.contains(position),
            "rewind position does not belong to this arena"
        );
        let offset = position as usize - head.ptr.as_ptr() as usize;
        head.bump = offset;
    }

    fn peek(&self) -> *mut u8 {
        let head = self.head();
        unsafe { head.ptr.as_ptr().add(head.bump) }
    }

    fn used(&self) -> usize {
        self.nodes.iter().map(|n| n.bump).sum()
    }

    fn capacity(&self) -> usize {
        self.nodes.iter().map(|n| n.capacity()).sum()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl Drop for ArenaCore {
    fn drop(&mut self) {
        for node in self.nodes.drain(..) {
            unsafe { Heap::new().dealloc(node.ptr, node.layout) };
        }
    }
}

/// A bump arena: growable, single-threaded, with an in-place realloc fast
/// path at the bump frontier.
pub struct Arena {
    core: RefCell<ArenaCore>,
    growth_coefficient: f64,
    max_size: usize,
    alignment: usize,
}

impl Arena {
    /// Creates an arena with the default growth coefficient (2.0), default
    /// max node size (32 KiB), and max-align alignment. `initial_capacity`
    /// is rounded up to a minimum of 256 bytes.
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_config(
            initial_capacity.max(ARENA_MIN_CAPACITY),
            ARENA_GROWTH_COEFFICIENT,
            ARENA_DEFAULT_MAX_SIZE,
            MAX_ALIGN,
        )
    }

    /// Creates an arena with explicit growth coefficient, max node size, and
    /// alignment. `alignment` must be a power of two; `growth_coefficient`
    /// must be positive.
    pub fn with_config(
        initial_capacity: usize,
        growth_coefficient: f64,
        max_size: usize,
        alignment: usize,
    ) -> Self {
        assert!(growth_coefficient > 0.0, "growth coefficient must be positive");
        assert!(alignment.is_power_of_two(), "alignment must be a power of two");
        Self {
            core: RefCell::new(ArenaCore::new(initial_capacity, alignment)),
            growth_coefficient,
            max_size,
            alignment,
        }
    }

    /// Allocates `size` bytes, rounded up to this arena's alignment.
    pub fn alloc_bytes(&self, size: usize) -> NonNull<u8> {
        self.core
            .borrow_mut()
            .alloc(size, self.alignment, self.growth_coefficient, self.max_size)
    }

    /// No-op: arenas free memory en masse, never per block.
    pub fn dealloc_bytes(&self, _ptr: NonNull<u8>) {}

    /// Grows or shrinks a block in place when it sits at the bump frontier;
    /// otherwise allocates fresh and copies.
    ///
    /// # Safety
    /// `ptr` must have been returned by a previous `alloc_bytes`/
    /// `realloc_bytes` call on this arena with `old_size`.
    pub unsafe fn realloc_bytes(&self, ptr: NonNull<u8>, old_size: usize, new_size: usize) -> NonNull<u8> {
        self.core.borrow_mut().realloc(
            ptr,
            old_size,
            new_size,
            self.alignment,
            self.growth_coefficient,
            self.max_size,
        )
    }

    /// Frees every node that does not contain `position`, walking from the
    /// head backward until the owning node is found, then rewinds that
    /// node's bump pointer to `position`. Passing the arena's very first
    /// allocation resets it entirely.
    ///
    /// # Safety
    /// `position` must be a pointer this arena itself produced (via
    /// `alloc_bytes`, `realloc_bytes`, or `peek`).
    pub unsafe fn rewind(&self, position: *mut u8) {
        self.core.borrow_mut().rewind(position);
    }

    /// Returns the pointer the next `alloc_bytes` call would return, absent
    /// any growth.
    pub fn peek(&self) -> *mut u8 {
        self.core.borrow().peek()
    }

    /// Total bytes allocated from this arena so far.
    pub fn used(&self) -> usize {
        self.core.borrow().used()
    }

    /// Total bytes this arena currently holds across all its nodes.
    pub fn capacity(&self) -> usize {
        self.core.borrow().capacity()
    }

    /// Number of nodes currently backing this arena. Exposed for tests that
    /// assert growth actually happened.
    pub fn node_count(&self) -> usize {
        self.core.borrow().node_count()
    }

    pub fn alignment(&self) -> usize {
        self.alignment
    }
}

unsafe impl Allocator for Arena {
    fn alloc(&self, layout: Layout) -> NonNull<u8> {
        if layout.align() > self.alignment {
            // Rare: a caller needs stricter alignment than this arena
            // provides. Bypass the bump path with a dedicated heap block
            // rather than silently under-aligning.
            return Heap::new().alloc(layout);
        }
        self.alloc_bytes(layout.size())
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, _layout: Layout) {
        self.dealloc_bytes(ptr);
    }

    unsafe fn realloc(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> NonNull<u8> {
        if old_layout.align() > self.alignment {
            return Heap::new().realloc(ptr, old_layout, new_size);
        }
        self.realloc_bytes(ptr, old_layout.size(), new_size)
    }
}

/// A mutex-protected arena for cross-thread allocation.
///
/// The mutex guards `alloc` only: `dealloc` is a no-op (trivially
/// thread-safe), and `rewind`/deletion require exclusive (`&mut`) access —
/// the borrow checker itself enforces that rewinding is externally
/// serialized, which is a cleaner fit here than adding a second lock.
pub struct SharedArena {
    core: Mutex<ArenaCore>,
    growth_coefficient: f64,
    max_size: usize,
    alignment: usize,
}

impl SharedArena {
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_config(
            initial_capacity.max(ARENA_MIN_CAPACITY),
            ARENA_GROWTH_COEFFICIENT,
            ARENA_DEFAULT_MAX_SIZE,
            MAX_ALIGN,
        )
    }

    pub fn with_config(
        initial_capacity: usize,
        growth_coefficient: f64,
        max_size: usize,
        alignment: usize,
    ) -> Self {
        assert!(growth_coefficient > 0.0, "growth coefficient must be positive");
        assert!(alignment.is_power_of_two(), "alignment must be a power of two");
        Self {
            core: Mutex::new(ArenaCore::new(initial_capacity, alignment)),
            growth_coefficient,
            max_size,
            alignment,
        }
    }

    /// Allocates `size` bytes under the arena's mutex.
    pub fn alloc_bytes(&self, size: usize) -> NonNull<u8> {
        let mut core = self.core.lock().unwrap_or_else(|e| e.into_inner());
        core.alloc(size, self.alignment, self.growth_coefficient, self.max_size)
    }

    /// No-op, trivially thread-safe.
    pub fn dealloc_bytes(&self, _ptr: NonNull<u8>) {}

    /// Requires exclusive access: rewinding concurrently with another
    /// thread's `alloc_bytes` is a race the library does not protect
    /// against.
    ///
    /// # Safety
    /// `position` must be a pointer this arena itself produced.
    pub unsafe fn rewind(&mut self, position: *mut u8) {
        let core = self.core.get_mut().unwrap_or_else(|e| e.into_inner());
        core.rewind(position);
    }

    pub fn used(&self) -> usize {
        self.core.lock().unwrap_or_else(|e| e.into_inner()).used()
    }

    pub fn capacity(&self) -> usize {
        self.core.lock().unwrap_or_else(|e| e.into_inner()).capacity()
    }
}

unsafe impl Allocator for SharedArena {
    fn alloc(&self, layout: Layout) -> NonNull<u8> {
        if layout.align() > self.alignment {
            return Heap::new().alloc(layout);
        }
        self.alloc_bytes(layout.size())
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, _layout: Layout) {
        self.dealloc_bytes(ptr);
    }
}
