//! Access-order index for the LRU decorator.
//!
//! # Complexity
//! - `touch`, `insert`, `pop_eldest`: `O(1)` amortized.
//! - `clear`: `O(n)` for the drops.
//!
//! The index stores keys only; values stay in the delegate cache. Nodes live
//! in a `Vec` arena and link to each other by slot index, with a hash map from
//! key to slot. Freed slots are recycled through a free list.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

type NodeSlot<K> = Option<Node<K>>;

/// Upper bound on storage reserved before the first insert.
const MAX_PRESIZE: usize = 1024;

#[derive(Debug)]
struct Node<K> {
    key: Arc<K>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<K> Node<K> {
    fn new(key: Arc<K>) -> Self {
        Self { key, prev: None, next: None }
    }
}

/// Keys ordered from most to least recently touched
///
/// `head` is the MRU end, `tail` the LRU end. Every `insert` or successful
/// `touch` moves the key to `head`.
pub(crate) struct RecencyIndex<K>
where
    K: Eq + Hash,
{
    map: HashMap<Arc<K>, usize>,
    nodes: Vec<NodeSlot<K>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K> RecencyIndex<K>
where
    K: Eq + Hash,
{
    /// Create an index expecting up to `capacity` keys.
    ///
    /// Reserves room for at most `MAX_PRESIZE` keys; larger indexes grow on
    /// demand.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let reserved = capacity.saturating_add(1).min(MAX_PRESIZE);
        Self {
            map: HashMap::with_capacity(reserved),
            nodes: Vec::with_capacity(reserved),
            free_list: Vec::new(),
            head: None,
            tail: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
    }

    /// Move an already indexed key to the MRU end.
    ///
    /// Returns `false` (and changes nothing) for keys the index never saw.
    pub(crate) fn touch(&mut self, key: &K) -> bool {
        match self.map.get(key) {
            Some(&index) => {
                self.promote(index);
                true
            }
            None => false,
        }
    }

    /// Register `key` at the MRU end, or move it there if already present.
    pub(crate) fn insert(&mut self, key: K) {
        if self.touch(&key) {
            return;
        }

        let key = Arc::new(key);
        let index = self.allocate_slot(Arc::clone(&key));
        self.attach_front(index);
        self.map.insert(key, index);
        debug_assert_eq!(self.map.len() + self.free_list.len(), self.nodes.len());
    }

    /// Remove and return the least recently touched key.
    pub(crate) fn pop_eldest(&mut self) -> Option<Arc<K>> {
        let index = self.tail?;
        self.detach(index);
        let node = self.nodes.get_mut(index).and_then(Option::take)?;
        self.map.remove(&node.key);
        self.free_list.push(index);
        Some(node.key)
    }

    /// The least recently touched key, without removing it.
    pub(crate) fn eldest(&self) -> Option<&K> {
        let index = self.tail?;
        self.nodes.get(index).and_then(Option::as_ref).map(|node| node.key.as_ref())
    }

    /// Keys from MRU to LRU.
    pub(crate) fn iter(&self) -> Iter<'_, K> {
        Iter { index: self, current: self.head, remaining: self.len() }
    }

    fn allocate_slot(&mut self, key: Arc<K>) -> usize {
        if let Some(index) = self.free_list.pop() {
            self.nodes[index] = Some(Node::new(key));
            index
        } else {
            self.nodes.push(Some(Node::new(key)));
            self.nodes.len() - 1
        }
    }

    fn promote(&mut self, index: usize) {
        if self.head == Some(index) {
            return;
        }
        self.detach(index);
        self.attach_front(index);
    }

    fn detach(&mut self, index: usize) {
        let (prev, next) = match self.nodes.get(index).and_then(Option::as_ref) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(prev_index) => {
                if let Some(prev_node) = self.nodes.get_mut(prev_index).and_then(Option::as_mut) {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_index) => {
                if let Some(next_node) = self.nodes.get_mut(next_index).and_then(Option::as_mut) {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }

        if let Some(node) = self.nodes.get_mut(index).and_then(Option::as_mut) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index).and_then(Option::as_mut) {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_index) = self.head {
            if let Some(head_node) = self.nodes.get_mut(head_index).and_then(Option::as_mut) {
                head_node.prev = Some(index);
            }
        } else {
            self.tail = Some(index);
        }

        self.head = Some(index);
    }
}

impl<K> fmt::Debug for RecencyIndex<K>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyIndex").field("len", &self.len()).finish()
    }
}

/// Iterator over indexed keys from MRU to LRU.
pub struct Iter<'a, K>
where
    K: Eq + Hash,
{
    index: &'a RecencyIndex<K>,
    current: Option<usize>,
    remaining: usize,
}

impl<'a, K> Iterator for Iter<'a, K>
where
    K: Eq + Hash,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = self.current?;
        let node = self.index.nodes.get(slot).and_then(Option::as_ref)?;
        self.current = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(node.key.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
