//! The dynamic array: [`string`](crate::string)'s sibling, generic over
//! element type instead of threading an element-size argument through every
//! call.
//!
//! `GpcArray<T>` is a typed growable buffer using Rust's native generics
//! rather than hand-rolled element-size arithmetic; the size-and-alignment
//! bookkeeping is exactly what `std::alloc::Layout::array::<T>` computes.
//! Growth policy (next power of two) and the allocator back-reference are
//! carried over from [`crate::string::GpcString`] unchanged.

use std::ptr::NonNull;

use crate::allocator::Allocator;
use crate::config::CONTAINER_MIN_CAPACITY;
use crate::utils::next_power_of_two;

/// A growable, typed array backed by an [`Allocator`].
pub struct GpcArray<'a, T> {
    data: NonNull<T>,
    length: usize,
    capacity: usize,
    allocator: &'a dyn Allocator,
}

impl<'a, T> GpcArray<'a, T> {
    /// Creates an empty array with room for at least `minimum_capacity`
    /// elements.
    pub fn new(allocator: &'a dyn Allocator, minimum_capacity: usize) -> Self {
        let capacity = minimum_capacity.max(CONTAINER_MIN_CAPACITY);
        let layout = std::alloc::Layout::array::<T>(capacity).expect("capacity overflow");
        let data = allocator.alloc(layout).cast();
        GpcArray {
            data,
            length: 0,
            capacity,
            allocator,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.length) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.data.as_ptr(), self.length) }
    }

    /// Ensures room for at least `capacity` elements, rounding up to the
    /// next power of two and reallocating through this array's allocator.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity <= self.capacity {
            return;
        }
        let new_capacity = next_power_of_two(capacity);
        let old_layout = std::alloc::Layout::array::<T>(self.capacity).expect("capacity overflow");
        let new_layout = std::alloc::Layout::array::<T>(new_capacity).expect("capacity overflow");
        let new_data = unsafe {
            self.allocator
                .realloc(self.data.cast(), old_layout, new_layout.size())
        };
        self.data = new_data.cast();
        self.capacity = new_capacity;
    }

    /// Appends `value` to the end, growing first if needed.
    pub fn push(&mut self, value: T) {
        self.reserve(self.length + 1);
        unsafe { self.data.as_ptr().add(self.length).write(value) };
        self.length += 1;
    }

    /// Removes and returns the last element.
    ///
    /// # Panics
    /// Panics if the array is empty — `pop` on empty is a precondition
    /// violation, not a `None` result.
    pub fn pop(&mut self) -> T {
        assert!(self.length > 0, "pop on an empty array");
        self.length -= 1;
        unsafe { self.data.as_ptr().add(self.length).read() }
    }

    /// Applies `f` to every element, producing a new array of the same
    /// length backed by the same allocator.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> GpcArray<'a, U> {
        let mut out = GpcArray::new(self.allocator, self.length.max(1));
        for item in self.as_slice() {
            out.push(f(item));
        }
        out
    }

    /// Retains only the elements for which `predicate` returns `true`,
    /// compacting in place with a two-pointer walk so no extra buffer is
    /// needed.
    pub fn filter(&mut self, predicate: impl Fn(&T) -> bool) {
        let mut write = 0;
        for read in 0..self.length {
            let keep = unsafe { predicate(&*self.data.as_ptr().add(read)) };
            if keep {
                if write != read {
                    unsafe {
                        let value = self.data.as_ptr().add(read).read();
                        self.data.as_ptr().add(write).write(value);
                    }
                }
                write += 1;
            } else {
                unsafe { std::ptr::drop_in_place(self.data.as_ptr().add(read)) };
            }
        }
        self.length = write;
    }

    /// Left fold: `f(f(f(init, a[0]), a[1]), ...)`.
    pub fn fold<Acc>(&self, init: Acc, f: impl Fn(Acc, &T) -> Acc) -> Acc {
        let mut acc = init;
        for item in self.as_slice() {
            acc = f(acc, item);
        }
        acc
    }

    /// Right fold: `f(a[0], f(a[1], ... f(a[n-1], init)))`.
    pub fn foldr<Acc>(&self, init: Acc, f: impl Fn(&T, Acc) -> Acc) -> Acc {
        let mut acc = init;
        for item in self.as_slice().iter().rev() {
            acc = f(item, acc);
        }
        acc
    }

    fn delete_mut(&mut self) {
        unsafe {
            for i in 0..self.length {
                std::ptr::drop_in_place(self.data.as_ptr().add(i));
            }
            let layout = std::alloc::Layout::array::<T>(self.capacity).expect("capacity overflow");
            self.allocator.dealloc(self.data.cast(), layout);
        }
    }

    /// Drops every element and frees the backing buffer. Consumes `self`.
    pub fn delete(mut self) {
        self.delete_mut();
    }
}

impl<T> Drop for GpcArray<'_, T> {
    fn drop(&mut self) {
        self.delete_mut();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Heap;

    #[test]
    fn push_and_pop_are_lifo() {
        let heap = Heap::new();
        let mut a: GpcArray<i32> = GpcArray::new(&heap, 2);
        a.push(1);
        a.push(2);
        a.push(3);
        assert_eq!(a.pop(), 3);
        assert_eq!(a.pop(), 2);
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn push_grows_past_initial_capacity() {
        let heap = Heap::new();
        let mut a: GpcArray<u64> = GpcArray::new(&heap, 1);
        for i in 0..100u64 {
            a.push(i);
        }
        assert_eq!(a.len(), 100);
        assert!(a.capacity() >= 100);
        assert_eq!(a.as_slice()[99], 99);
    }

    #[test]
    fn map_produces_transformed_copy() {
        let heap = Heap::new();
        let mut a: GpcArray<i32> = GpcArray::new(&heap, 4);
        for i in 1..=3 {
            a.push(i);
        }
        let doubled = a.map(|x| x * 2);
        assert_eq!(doubled.as_slice(), &[2, 4, 6]);
    }

    #[test]
    fn filter_compacts_in_place() {
        let heap = Heap::new();
        let mut a: GpcArray<i32> = GpcArray::new(&heap, 8);
        for i in 0..10 {
            a.push(i);
        }
        a.filter(|x| x % 2 == 0);
        assert_eq!(a.as_slice(), &[0, 2, 4, 6, 8]);
    }

    #[test]
    fn fold_sums_left_to_right() {
        let heap = Heap::new();
        let mut a: GpcArray<i32> = GpcArray::new(&heap, 4);
        for i in 1..=4 {
            a.push(i);
        }
        let sum = a.fold(0, |acc, x| acc + x);
        assert_eq!(sum, 10);
    }

    #[test]
    fn foldr_builds_in_reverse() {
        let heap = Heap::new();
        let mut a: GpcArray<i32> = GpcArray::new(&heap, 4);
        for i in 1..=3 {
            a.push(i);
        }
        let list = a.foldr(Vec::new(), |x, mut acc| {
            acc.push(*x);
            acc
        });
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn drop_runs_element_destructors() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Counted(Rc<RefCell<usize>>);
        impl Drop for Counted {
            fn drop(&mut self) {
                *self.0.borrow_mut() += 1;
            }
        }

        let count = Rc::new(RefCell::new(0));
        let heap = Heap::new();
        {
            let mut a: GpcArray<Counted> = GpcArray::new(&heap, 4);
            a.push(Counted(count.clone()));
            a.push(Counted(count.clone()));
        }
        assert_eq!(*count.borrow(), 2);
    }
}
