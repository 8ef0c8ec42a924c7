//! The polymorphic allocator interface every container in this crate is
//! written against.
//!
//! This is a trait rather than a struct of function pointers: containers
//! hold `&dyn Allocator` (or a concrete type behind a generic parameter) as
//! a non-owning back-reference and call into it for growth; nothing here
//! owns the allocator itself.

use std::alloc::Layout;
use std::ptr::NonNull;

/// A polymorphic allocator: something that can hand out aligned memory
/// blocks and, optionally, take them back.
///
/// # Safety
///
/// Implementations must return a pointer to at least `layout.size()` bytes,
/// aligned to at least `layout.align()`, or fail the process (the allocator
/// taxonomy treats out-of-memory as fatal, not as a `Result`). `dealloc`
/// must accept exactly the blocks this allocator itself returned, with the
/// same layout they were requested with.
pub unsafe trait Allocator {
    /// Allocates a new block. Implementations that cannot satisfy the
    /// request must abort the process rather than return a sentinel value —
    /// every pointer returned by this trait is guaranteed non-null.
    fn alloc(&self, layout: Layout) -> NonNull<u8>;

    /// Returns a block previously obtained from [`Allocator::alloc`] (or
    /// [`Allocator::realloc`]) on this same allocator. A no-op is a valid
    /// implementation (arenas free en masse); callers must not rely on the
    /// memory being reused immediately.
    ///
    /// # Safety
    /// `ptr` must have been returned by this allocator with this `layout`,
    /// and must not be used again afterward.
    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout);

    /// Grows or shrinks a previously allocated block, preserving the first
    /// `min(old_layout.size(), new_size)` bytes of its contents.
    ///
    /// The default implementation is allocate-copy-free; allocators with an
    /// in-place fast path (the bump arena, when `ptr` sits at the bump
    /// frontier) override this to avoid the copy.
    ///
    /// # Safety
    /// `ptr` must have been returned by this allocator with `old_layout`.
    unsafe fn realloc(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> NonNull<u8> {
        let new_layout =
            Layout::from_size_align(new_size, old_layout.align()).expect("invalid layout");
        let new_ptr = self.alloc(new_layout);
        let copy_len = old_layout.size().min(new_size);
        std::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), copy_len);
        self.dealloc(ptr, old_layout);
        new_ptr
    }
}

/// Blanket impl so `&A` is itself a valid allocator wherever `A: Allocator`
/// is — lets containers store either an owned allocator or a borrowed
/// reference to one under the same bound.
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn alloc(&self, layout: Layout) -> NonNull<u8> {
        (**self).alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).dealloc(ptr, layout)
    }

    unsafe fn realloc(&self, ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> NonNull<u8> {
        (**self).realloc(ptr, old_layout, new_size)
    }
}
