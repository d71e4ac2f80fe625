//! Recency Order Module
//!
//! Arena-backed doubly linked list that keeps entries ordered by recency.
//!
//! Nodes live in a `Vec` and link to each other by slot index, so there are
//! no pointer cycles and no `unsafe`. Vacated slots are recycled through a
//! free list. Layout:
//! - Front (head) = Least recently used
//! - Back (tail) = Most recently used

/// Null link.
const NIL: usize = usize::MAX;

// == Handle ==
/// Position of an item in a [`RecencyList`].
///
/// Stays valid until the item it points at is popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct Handle(usize);

#[derive(Debug)]
struct Node<T> {
    item: Option<T>,
    prev: usize,
    next: usize,
}

// == Recency List ==
#[derive(Debug)]
pub(crate) struct RecencyList<T> {
    /// Slot arena
    nodes: Vec<Node<T>>,
    /// Least recently used slot
    head: usize,
    /// Most recently used slot
    tail: usize,
    /// Vacated slots ready for reuse
    free: Vec<usize>,
    /// Number of live items
    len: usize,
}

impl<T> RecencyList<T> {
    // == Constructor ==
    /// Creates an empty list with room for `capacity` items before the
    /// arena has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: NIL,
            tail: NIL,
            free: Vec::new(),
            len: 0,
        }
    }

    // == Push Back ==
    /// Appends an item at the most recently used end.
    pub fn push_back(&mut self, item: T) -> Handle {
        let node = Node {
            item: Some(item),
            prev: NIL,
            next: NIL,
        };

        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };

        self.link_back(idx);
        self.len += 1;
        Handle(idx)
    }

    // == Move To Back ==
    /// Marks the item as most recently used.
    pub fn move_to_back(&mut self, handle: Handle) {
        let idx = handle.0;
        debug_assert!(self.is_live(idx), "move_to_back on a vacated slot");
        if idx == self.tail {
            return;
        }
        self.unlink(idx);
        self.link_back(idx);
    }

    // == Pop Front ==
    /// Removes and returns the least recently used item.
    ///
    /// Returns None if the list is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.head == NIL {
            return None;
        }

        let idx = self.head;
        self.unlink(idx);
        let item = self.nodes[idx].item.take();
        self.free.push(idx);
        self.len -= 1;
        item
    }

    // == Accessors ==
    /// Returns the least recently used item without moving it.
    pub fn front(&self) -> Option<&T> {
        self.nodes.get(self.head).and_then(|node| node.item.as_ref())
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.nodes.get(handle.0).and_then(|node| node.item.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.nodes
            .get_mut(handle.0)
            .and_then(|node| node.item.as_mut())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates from least to most recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
            remaining: self.len,
        }
    }

    // == Link Maintenance ==
    fn is_live(&self, idx: usize) -> bool {
        self.nodes
            .get(idx)
            .map(|node| node.item.is_some())
            .unwrap_or(false)
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = &self.nodes[idx];
            (node.prev, node.next)
        };

        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }

        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }

        let node = &mut self.nodes[idx];
        node.prev = NIL;
        node.next = NIL;
    }

    fn link_back(&mut self, idx: usize) {
        self.nodes[idx].prev = self.tail;
        self.nodes[idx].next = NIL;

        if self.tail != NIL {
            self.nodes[self.tail].next = idx;
        } else {
            self.head = idx;
        }
        self.tail = idx;
    }
}

// == Iterator ==
/// Borrowing iterator over a [`RecencyList`], oldest first.
#[derive(Debug)]
pub(crate) struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    cursor: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == NIL {
            return None;
        }
        let node = &self.list.nodes[self.cursor];
        self.cursor = node.next;
        self.remaining -= 1;
        node.item.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn collect(list: &RecencyList<&'static str>) -> Vec<&'static str> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_list_new() {
        let list: RecencyList<u32> = RecencyList::with_capacity(4);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.front().is_none());
    }

    #[test]
    fn test_push_back_keeps_insertion_order() {
        let mut list = RecencyList::with_capacity(0);

        list.push_back("a");
        list.push_back("b");
        list.push_back("c");

        assert_eq!(list.len(), 3);
        // a is oldest (added first)
        assert_eq!(list.front(), Some(&"a"));
        assert_eq!(collect(&list), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_to_back_reorders() {
        let mut list = RecencyList::with_capacity(0);

        let a = list.push_back("a");
        let b = list.push_back("b");
        list.push_back("c");

        list.move_to_back(a);
        assert_eq!(collect(&list), vec!["b", "c", "a"]);

        list.move_to_back(b);
        assert_eq!(collect(&list), vec!["c", "a", "b"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_move_to_back_on_tail_is_noop() {
        let mut list = RecencyList::with_capacity(0);

        list.push_back("a");
        let b = list.push_back("b");

        list.move_to_back(b);
        list.move_to_back(b);

        assert_eq!(collect(&list), vec!["a", "b"]);
    }

    #[test]
    fn test_move_to_back_single_item() {
        let mut list = RecencyList::with_capacity(0);

        let a = list.push_back("a");
        list.move_to_back(a);

        assert_eq!(list.front(), Some(&"a"));
        assert_eq!(list.pop_front(), Some("a"));
        assert!(list.is_empty());
    }

    #[test]
    fn test_pop_front_oldest_first() {
        let mut list = RecencyList::with_capacity(0);

        list.push_back("a");
        list.push_back("b");
        list.push_back("c");

        assert_eq!(list.pop_front(), Some("a"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.pop_front(), Some("b"));
        assert_eq!(list.pop_front(), Some("c"));
        assert_eq!(list.pop_front(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn test_pop_front_empty() {
        let mut list: RecencyList<u8> = RecencyList::with_capacity(0);
        assert_eq!(list.pop_front(), None);
    }

    #[test]
    fn test_vacated_slots_are_reused() {
        let mut list = RecencyList::with_capacity(0);

        list.push_back("a");
        list.push_back("b");
        list.pop_front();

        let c = list.push_back("c");

        // Slot 0 held "a" and is recycled for "c"
        assert_eq!(c, Handle(0));
        assert_eq!(list.nodes.len(), 2);
        assert_eq!(collect(&list), vec!["b", "c"]);
    }

    #[test]
    fn test_handles_survive_reordering() {
        let mut list = RecencyList::with_capacity(0);

        let a = list.push_back(1);
        let b = list.push_back(2);
        list.push_back(3);

        list.move_to_back(a);
        list.pop_front(); // evicts 2

        assert_eq!(list.get(a), Some(&1));
        assert_eq!(list.get(b), None);

        if let Some(item) = list.get_mut(a) {
            *item = 10;
        }
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![3, 10]);
    }

    #[test]
    fn test_iter_reports_exact_len() {
        let mut list = RecencyList::with_capacity(0);
        list.push_back("a");
        list.push_back("b");

        let mut iter = list.iter();
        assert_eq!(iter.len(), 2);
        iter.next();
        assert_eq!(iter.len(), 1);
    }
}
