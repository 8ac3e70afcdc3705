//! LRU List Module
//!
//! Arena-backed doubly linked list that orders cache entries by recency.
//!
//! Nodes live in a slot vector and link to each other by slot index, so
//! splicing never needs aliased references. Freed slots are recycled.
//!
//! - Front = Most recently used
//! - Back = Least recently used

// == Handle ==
/// Stable address of a node inside an [`LruList`].
///
/// A handle stays valid until its node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(Node<T>),
    Vacant,
}

// == LRU List ==
/// Recency-ordered list with O(1) push, move-to-front and removal.
#[derive(Debug)]
pub struct LruList<T> {
    slots: Vec<Slot<T>>,
    /// Vacant slot indices available for reuse
    free: Vec<usize>,
    front: Option<usize>,
    back: Option<usize>,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            front: None,
            back: None,
            len: 0,
        }
    }

    // == Length ==
    /// Number of live nodes.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the most recently used node.
    #[cfg(test)]
    pub fn front(&self) -> Option<Handle> {
        self.front.map(Handle)
    }

    // == Back ==
    /// Handle of the least recently used node.
    pub fn back(&self) -> Option<Handle> {
        self.back.map(Handle)
    }

    // == Get ==
    /// Borrows the item behind `handle`, or `None` for a stale handle.
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.node(handle.0).map(|node| &node.item)
    }

    /// Mutable form of [`get`](Self::get).
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.node_mut(handle.0).map(|node| &mut node.item)
    }

    // == Push Front ==
    /// Inserts `item` as the most recently used node.
    pub fn push_front(&mut self, item: T) -> Handle {
        let node = Node {
            item,
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Slot::Occupied(node);
                idx
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        };
        self.link_front(idx);
        self.len += 1;
        Handle(idx)
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    ///
    /// Returns false if the handle does not address a live node.
    pub fn move_to_front(&mut self, handle: Handle) -> bool {
        if self.node(handle.0).is_none() {
            return false;
        }
        if self.front != Some(handle.0) {
            self.unlink(handle.0);
            self.link_front(handle.0);
        }
        true
    }

    // == Remove ==
    /// Unlinks a node and returns its item, freeing the slot.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        self.node(handle.0)?;
        self.unlink(handle.0);
        let slot = std::mem::replace(&mut self.slots[handle.0], Slot::Vacant);
        self.free.push(handle.0);
        self.len -= 1;
        match slot {
            Slot::Occupied(node) => Some(node.item),
            Slot::Vacant => None,
        }
    }

    // == Pop Back ==
    /// Removes and returns the least recently used item.
    pub fn pop_back(&mut self) -> Option<T> {
        let back = self.back()?;
        self.remove(back)
    }

    /// Drops every node and releases the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.front = None;
        self.back = None;
        self.len = 0;
    }

    /// Iterates items from most to least recently used.
    #[cfg(test)]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.front,
            remaining: self.len,
        }
    }

    /// Iterates handles and items from least to most recently used.
    pub fn iter_rev(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        let mut cursor = self.back;
        std::iter::from_fn(move || {
            let idx = cursor?;
            let node = self.node(idx)?;
            cursor = node.prev;
            Some((Handle(idx), &node.item))
        })
        .take(self.len)
    }

    // == Internal Links ==
    fn node(&self, idx: usize) -> Option<&Node<T>> {
        match self.slots.get(idx) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<T>> {
        match self.slots.get_mut(idx) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Detaches a live node, patching neighbors and the list ends.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.node_mut(idx) {
            Some(node) => (node.prev.take(), node.next.take()),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.front = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.back = prev,
        }
    }

    /// Attaches a detached live node at the front.
    fn link_front(&mut self, idx: usize) {
        let old_front = self.front;
        if let Some(node) = self.node_mut(idx) {
            node.prev = None;
            node.next = old_front;
        }
        match old_front {
            Some(f) => {
                if let Some(node) = self.node_mut(f) {
                    node.prev = Some(idx);
                }
            }
            None => self.back = Some(idx),
        }
        self.front = Some(idx);
    }
}

// == Iterator ==
/// Front-to-back iterator over an [`LruList`].
#[cfg(test)]
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    cursor: Option<usize>,
    remaining: usize,
}

#[cfg(test)]
impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
