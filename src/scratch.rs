//! The scratch arena: a lazily-created, per-thread [`Arena`] for ephemeral
//! allocations. Callers rewind back to a remembered mark rather than
//! deleting; the arena itself is torn down automatically on thread exit.
//!
//! A `thread_local!` static holding the arena is itself the destructor — no
//! explicit TLS-key-with-callback plumbing needed. The mark/rewind-on-drop
//! guard mirrors a scratch arena that captures its mark at construction and
//! resets to it on `Drop`, generalized here to a lazily-initialized,
//! fully-owned arena instead of a pre-initialized shared one.

use std::cell::RefCell;
use std::ptr::NonNull;

use crate::arena::Arena;
use crate::config::SCRATCH_INITIAL_CAPACITY;

thread_local! {
    static SCRATCH: RefCell<Option<Arena>> = const { RefCell::new(None) };
}

fn with_scratch<R>(f: impl FnOnce(&Arena) -> R) -> R {
    SCRATCH.with(|cell| {
        {
            let mut slot = cell.borrow_mut();
            if slot.is_none() {
                *slot = Some(Arena::new(SCRATCH_INITIAL_CAPACITY));
            }
        }
        let slot = cell.borrow();
        f(slot.as_ref().unwrap())
    })
}

/// A remembered position in the calling thread's scratch arena.
///
/// Allocate through [`Scratch::alloc_bytes`], then either let the guard
/// drop (rewinding automatically) or call [`Scratch::release`] explicitly.
/// Never call `delete` on the scratch arena itself — it is shared by every
/// caller on the thread for the rest of the thread's life.
pub struct Scratch {
    mark: *mut u8,
    released: bool,
}

impl Scratch {
    /// Marks the current position of the calling thread's scratch arena,
    /// creating it on first use.
    pub fn mark() -> Self {
        let mark = with_scratch(|arena| arena.peek());
        Scratch {
            mark,
            released: false,
        }
    }

    /// Allocates `size` bytes from the calling thread's scratch arena.
    pub fn alloc_bytes(&self, size: usize) -> NonNull<u8> {
        with_scratch(|arena| arena.alloc_bytes(size))
    }

    /// Rewinds the scratch arena back to this mark. Idempotent: calling it
    /// twice, or letting `Drop` run afterward, does nothing the second time.
    pub fn release(mut self) {
        self.release_mut();
    }

    fn release_mut(&mut self) {
        if !self.released {
            // Safety: `self.mark` was produced by this same thread's
            // scratch arena in `mark`, and nothing but `Scratch` handles
            // ever rewinds it.
            with_scratch(|arena| unsafe { arena.rewind(self.mark) });
            self.released = true;
        }
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        self.release_mut();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_marks_rewind_in_order() {
        let outer = Scratch::mark();
        let _a = outer.alloc_bytes(32);
        {
            let inner = Scratch::mark();
            let _b = inner.alloc_bytes(32);
        } // inner rewinds here
        let after_inner = with_scratch(|arena| arena.peek());
        let _c = outer.alloc_bytes(16);
        let after_c = with_scratch(|arena| arena.peek());
        assert_ne!(after_inner, after_c);
    }

    #[test]
    fn release_is_idempotent() {
        let mark = Scratch::mark();
        let before = with_scratch(|arena| arena.peek());
        mark.release();
        let after = with_scratch(|arena| arena.peek());
        assert_eq!(before, after);
    }

    #[test]
    fn thread_local_arenas_are_independent() {
        let this_thread_ptr = with_scratch(|arena| arena.peek() as usize);
        let other_thread_ptr = std::thread::spawn(|| with_scratch(|arena| arena.peek() as usize))
            .join()
            .unwrap();
        assert_ne!(this_thread_ptr, other_thread_ptr);
    }
}
