use std::{
    cmp::{self, Ordering},
    mem,
    ops::{Bound, Deref, RangeBounds},
};

use log::{debug, trace};
use rand::Rng;

use crate::depth::Depth;
use crate::error::OstError;

/// Key type indexed by [`Ost`], a single totally ordered domain.
pub type Key = i64;

/// Ost manage a single instance of in-memory order-statistic index
/// using [AVL][avl] tree, where every node is augmented with the size
/// of its subtree. Apart from search, insert and delete, the index
/// answers rank-of-key and select-by-rank in O(log n).
///
/// [avl]: https://en.wikipedia.org/wiki/AVL_tree
#[derive(Clone)]
pub struct Ost {
    name: String,
    root: Option<Box<Node>>,
}

/// Different ways to construct a new Ost instance.
impl Ost {
    /// Create an empty instance of Ost, identified by `name`.
    /// Applications can choose unique names.
    pub fn new<S>(name: S) -> Ost
    where
        S: AsRef<str>,
    {
        Ost {
            name: name.as_ref().to_string(),
            root: Default::default(),
        }
    }

    /// Create a new instance of Ost tree and load it with keys from
    /// `iter`. Duplicate keys are skipped.
    pub fn load_from<S, I>(name: S, iter: I) -> Ost
    where
        S: AsRef<str>,
        I: IntoIterator<Item = Key>,
    {
        let mut ost = Ost::new(name);
        for key in iter {
            ost.insert(key);
        }
        ost
    }
}

/// Maintenance API.
impl Ost {
    /// Identify this instance. Applications can choose unique names while
    /// creating Ost instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    /// Return number of entries in this instance, read off the root's
    /// subtree size.
    #[inline]
    pub fn len(&self) -> usize {
        size_of(self.root_deref())
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Return the height of the tree, zero for an empty tree.
    #[inline]
    pub fn height(&self) -> usize {
        height_of(self.root_deref())
    }

    /// Return the root node, if any, for structural inspection.
    #[inline]
    pub fn root(&self) -> Option<&Node> {
        self.root_deref()
    }

    /// Return quickly with basic statisics, only entries(), node_size()
    /// and height() are valid with this statisics.
    pub fn stats(&self) -> Stats {
        let mut stats = Stats::new(self.len(), mem::size_of::<Node>());
        stats.set_height(self.height());
        stats
    }

    /// Validate AVL tree with following rules:
    ///
    /// * Keys are in sort order, checked against every ancestor bound.
    /// * Cached height and subtree size match the actual subtree.
    /// * Heights of left and right child differ by at most one.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, OstError> {
        let mut stats = Stats::new(self.len(), mem::size_of::<Node>());
        let mut depths = Depth::new();
        let (height, _) = Ost::validate_tree(self.root_deref(), None, None, 0, &mut depths)?;
        stats.set_height(height);
        stats.set_depths(depths);
        Ok(stats)
    }

    #[inline]
    fn root_deref(&self) -> Option<&Node> {
        self.root.as_ref().map(Deref::deref)
    }
}

type Insert = (Box<Node>, bool);

type Delete = (Option<Box<Node>>, bool);

/// Write operations on Ost instance.
impl Ost {
    /// Insert `key` into the index. Return false, leaving the tree
    /// untouched, if key is already present.
    pub fn insert(&mut self, key: Key) -> bool {
        let (root, inserted) = Ost::do_insert(self.root.take(), key);
        self.root = Some(root);
        if !inserted {
            debug!("{}: insert {}, key already present", self.name, key);
        }
        inserted
    }

    /// Delete key from this instance. If key is not present, then
    /// delete is effectively a no-op and returns false.
    pub fn delete(&mut self, key: &Key) -> bool {
        let (root, deleted) = Ost::do_delete(self.root.take(), key);
        self.root = root;
        if !deleted {
            debug!("{}: delete {}, key not present", self.name, key);
        }
        deleted
    }
}

/// Read operations on Ost instance.
impl Ost {
    /// Return the node holding key.
    pub fn search(&self, key: &Key) -> Option<&Node> {
        let mut node = self.root_deref();
        while let Some(nref) = node {
            node = match nref.key.cmp(key) {
                Ordering::Less => nref.right_deref(),
                Ordering::Greater => nref.left_deref(),
                Ordering::Equal => return Some(nref),
            };
        }
        None
    }

    /// Check whether key is present in this instance.
    #[inline]
    pub fn contains(&self, key: &Key) -> bool {
        self.search(key).is_some()
    }

    /// Return the 1-based position of key in sorted order, or None if
    /// key is not present.
    pub fn rank_of_key(&self, key: &Key) -> Option<usize> {
        let (mut node, mut rank) = (self.root_deref(), 0);
        while let Some(nref) = node {
            let left = nref.left_deref();
            node = match key.cmp(&nref.key) {
                Ordering::Less => left,
                Ordering::Equal => return Some(rank + size_of(left) + 1),
                Ordering::Greater => {
                    rank += size_of(left) + 1;
                    nref.right_deref()
                }
            };
        }
        None
    }

    /// Return the key at 1-based position `rank` in sorted order. Rank
    /// zero, or rank beyond len(), returns None.
    pub fn find_by_rank(&self, rank: usize) -> Option<Key> {
        let (mut node, mut rank) = (self.root_deref(), rank);
        while let Some(nref) = node {
            let left_size = size_of(nref.left_deref()) + 1;
            node = match rank.cmp(&left_size) {
                Ordering::Equal => return Some(nref.key),
                Ordering::Less => nref.left_deref(),
                Ordering::Greater => {
                    rank -= left_size;
                    nref.right_deref()
                }
            };
        }
        None
    }

    /// Return the smallest key.
    pub fn min(&self) -> Option<Key> {
        let mut nref = self.root_deref()?;
        while let Some(left) = nref.left_deref() {
            nref = left;
        }
        Some(nref.key)
    }

    /// Return the largest key.
    pub fn max(&self) -> Option<Key> {
        let mut nref = self.root_deref()?;
        while let Some(right) = nref.right_deref() {
            nref = right;
        }
        Some(nref.key)
    }

    /// Return a random key from this index, every key is equally likely.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<Key> {
        match self.len() {
            0 => None,
            n => self.find_by_rank(rng.gen_range(1, n + 1)),
        }
    }

    /// Return all keys in ascending order. The returned vector is a
    /// snapshot, later mutations don't affect it.
    pub fn inorder(&self) -> Vec<Key> {
        let mut acc = Vec::with_capacity(self.len());
        inorder_walk(self.root_deref(), &mut acc);
        acc
    }

    /// Return all keys in root-left-right order, useful to inspect the
    /// shape of the tree.
    pub fn preorder(&self) -> Vec<Key> {
        let mut acc = Vec::with_capacity(self.len());
        preorder_walk(self.root_deref(), &mut acc);
        acc
    }

    /// Return an iterator over all keys in this instance.
    pub fn iter(&self) -> Iter {
        let mut iter = Iter { stack: vec![] };
        iter.push_left(self.root_deref());
        iter
    }

    /// Range over all keys from low to high.
    pub fn range<R>(&self, range: R) -> Range
    where
        R: RangeBounds<Key>,
    {
        let root = self.root_deref();
        let mut range = Range {
            root,
            stack: vec![],
            low: range.start_bound().cloned(),
            high: range.end_bound().cloned(),
        };
        range.seek(root);
        range
    }
}

impl<'a> IntoIterator for &'a Ost {
    type Item = Key;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl Ost {
    fn do_insert(node: Option<Box<Node>>, key: Key) -> Insert {
        let mut node = match node {
            None => return (Node::new(key), true),
            Some(node) => node,
        };

        match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, inserted) = Ost::do_insert(node.left.take(), key);
                node.left = Some(left);
                if !inserted {
                    return (node, false);
                }
            }
            Ordering::Greater => {
                let (right, inserted) = Ost::do_insert(node.right.take(), key);
                node.right = Some(right);
                if !inserted {
                    return (node, false);
                }
            }
            Ordering::Equal => return (node, false),
        }

        node.update();
        (Ost::insert_fixup(node, key), true)
    }

    // Case selection compares the inserted key against the heavy child's
    // key. Exactly one key went down this path, so its direction picks
    // the heavy grandchild.
    fn insert_fixup(mut node: Box<Node>, key: Key) -> Box<Node> {
        let balance = node.balance();
        if balance > 1 {
            let left_left = node.left_deref().map_or(false, |left| key < left.key);
            if !left_left {
                node.left = node.left.take().map(Ost::rotate_left);
            }
            Ost::rotate_right(node)
        } else if balance < -1 {
            let right_right = node.right_deref().map_or(false, |right| key > right.key);
            if !right_right {
                node.right = node.right.take().map(Ost::rotate_right);
            }
            Ost::rotate_left(node)
        } else {
            node
        }
    }

    fn do_delete(node: Option<Box<Node>>, key: &Key) -> Delete {
        let mut node = match node {
            None => return (None, false),
            Some(node) => node,
        };

        match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, deleted) = Ost::do_delete(node.left.take(), key);
                node.left = left;
                if !deleted {
                    return (Some(node), false);
                }
            }
            Ordering::Greater => {
                let (right, deleted) = Ost::do_delete(node.right.take(), key);
                node.right = right;
                if !deleted {
                    return (Some(node), false);
                }
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, right) => return (right, true),
                (left, None) => return (left, true),
                (left, Some(right)) => {
                    // two children, pull up the inorder successor's key and
                    // remove the successor from the right subtree instead.
                    let successor = right.min_key();
                    let (right, _) = Ost::do_delete(Some(right), &successor);
                    node.key = successor;
                    node.left = left;
                    node.right = right;
                }
            },
        }

        node.update();
        (Some(Ost::delete_fixup(node)), true)
    }

    // Case selection looks at the heavy child's own balance, any key
    // could have left the lighter side.
    fn delete_fixup(mut node: Box<Node>) -> Box<Node> {
        let balance = node.balance();
        if balance > 1 {
            if balance_of(node.left_deref()) < 0 {
                node.left = node.left.take().map(Ost::rotate_left);
            }
            Ost::rotate_right(node)
        } else if balance < -1 {
            if balance_of(node.right_deref()) > 0 {
                node.right = node.right.take().map(Ost::rotate_right);
            }
            Ost::rotate_left(node)
        } else {
            node
        }
    }

    fn validate_tree(
        node: Option<&Node>,
        low: Option<Key>,
        high: Option<Key>,
        depth: usize,
        depths: &mut Depth,
    ) -> Result<(usize, usize), OstError> {
        let node = match node {
            None => {
                depths.sample(depth);
                return Ok((0, 0));
            }
            Some(node) => node,
        };

        match (low, high) {
            (Some(low), _) if node.key <= low => {
                return Err(OstError::SortError(node.key, low));
            }
            (_, Some(high)) if node.key >= high => {
                return Err(OstError::SortError(node.key, high));
            }
            _ => (),
        }

        let (left, right) = (node.left_deref(), node.right_deref());
        let (lh, ls) = Ost::validate_tree(left, low, Some(node.key), depth + 1, depths)?;
        let (rh, rs) = Ost::validate_tree(right, Some(node.key), high, depth + 1, depths)?;

        let (height, size) = (1 + cmp::max(lh, rh), 1 + ls + rs);
        if node.height != height {
            let (key, cached, actual) = (node.key, node.height, height);
            return Err(OstError::HeightMismatch { key, cached, actual });
        }
        if node.size != size {
            let (key, cached, actual) = (node.key, node.size, size);
            return Err(OstError::SizeMismatch { key, cached, actual });
        }
        let balance = (lh as isize) - (rh as isize);
        if balance.abs() > 1 {
            return Err(OstError::Unbalanced {
                key: node.key,
                balance,
            });
        }
        Ok((height, size))
    }

    //--------- rotation routines ----------------

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //          left      x              node      xr
    //                   / \             /  \
    //                 xl   xr        left   xl
    //
    fn rotate_left(mut node: Box<Node>) -> Box<Node> {
        let mut x = match node.right.take() {
            Some(x) => x,
            None => return node,
        };
        trace!("rotate_left at {}", node.key);
        node.right = x.left.take();
        if let Some(xl) = node.right.as_mut() {
            xl.update();
        }
        node.update();
        x.left = Some(node);
        x.update();
        x
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    \                    /   \
    //            /      \                  /     \
    //           x      right              xl     node
    //          / \                               / \
    //        xl   xr                           xr  right
    //
    fn rotate_right(mut node: Box<Node>) -> Box<Node> {
        let mut x = match node.left.take() {
            Some(x) => x,
            None => return node,
        };
        trace!("rotate_right at {}", node.key);
        node.left = x.right.take();
        if let Some(xr) = node.left.as_mut() {
            xr.update();
        }
        node.update();
        x.right = Some(node);
        x.update();
        x
    }
}

fn height_of(node: Option<&Node>) -> usize {
    node.map_or(0, |node| node.height)
}

fn size_of(node: Option<&Node>) -> usize {
    node.map_or(0, |node| node.size)
}

fn balance_of(node: Option<&Node>) -> isize {
    node.map_or(0, Node::balance)
}

fn inorder_walk(node: Option<&Node>, acc: &mut Vec<Key>) {
    if let Some(node) = node {
        inorder_walk(node.left_deref(), acc);
        acc.push(node.key);
        inorder_walk(node.right_deref(), acc);
    }
}

fn preorder_walk(node: Option<&Node>, acc: &mut Vec<Key>) {
    if let Some(node) = node {
        acc.push(node.key);
        preorder_walk(node.left_deref(), acc);
        preorder_walk(node.right_deref(), acc);
    }
}

fn after_low(low: &Bound<Key>, key: Key) -> bool {
    match low {
        Bound::Included(low) => key >= *low,
        Bound::Excluded(low) => key > *low,
        Bound::Unbounded => true,
    }
}

fn before_high(high: &Bound<Key>, key: Key) -> bool {
    match high {
        Bound::Included(high) => key <= *high,
        Bound::Excluded(high) => key < *high,
        Bound::Unbounded => true,
    }
}

/// Ascending iterator over keys, borrowing the tree.
pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn push_left(&mut self, mut node: Option<&'a Node>) {
        while let Some(nref) = node {
            self.stack.push(nref);
            node = nref.left_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Key;

    fn next(&mut self) -> Option<Self::Item> {
        let nref = self.stack.pop()?;
        self.push_left(nref.right_deref());
        Some(nref.key)
    }
}

/// Ascending iterator over keys within a range.
pub struct Range<'a> {
    root: Option<&'a Node>,
    stack: Vec<&'a Node>,
    low: Bound<Key>,
    high: Bound<Key>,
}

impl<'a> Range<'a> {
    /// Turn this range into a descending iterator, from high to low.
    pub fn rev(self) -> Reverse<'a> {
        let mut reverse = Reverse {
            stack: vec![],
            low: self.low,
            high: self.high,
        };
        reverse.seek(self.root);
        reverse
    }

    // push the path of nodes at or after the low bound.
    fn seek(&mut self, mut node: Option<&'a Node>) {
        while let Some(nref) = node {
            if after_low(&self.low, nref.key) {
                self.stack.push(nref);
                node = nref.left_deref();
            } else {
                node = nref.right_deref();
            }
        }
    }
}

impl<'a> Iterator for Range<'a> {
    type Item = Key;

    fn next(&mut self) -> Option<Self::Item> {
        let nref = self.stack.pop()?;
        if !before_high(&self.high, nref.key) {
            self.stack.clear();
            return None;
        }
        self.seek(nref.right_deref());
        Some(nref.key)
    }
}

/// Descending iterator over keys within a range.
pub struct Reverse<'a> {
    stack: Vec<&'a Node>,
    low: Bound<Key>,
    high: Bound<Key>,
}

impl<'a> Reverse<'a> {
    fn seek(&mut self, mut node: Option<&'a Node>) {
        while let Some(nref) = node {
            if before_high(&self.high, nref.key) {
                self.stack.push(nref);
                node = nref.right_deref();
            } else {
                node = nref.left_deref();
            }
        }
    }
}

impl<'a> Iterator for Reverse<'a> {
    type Item = Key;

    fn next(&mut self) -> Option<Self::Item> {
        let nref = self.stack.pop()?;
        if !after_low(&self.low, nref.key) {
            self.stack.clear();
            return None;
        }
        self.seek(nref.left_deref());
        Some(nref.key)
    }
}

/// Node corresponds to a single key in Ost instance.
#[derive(Clone, Debug)]
pub struct Node {
    key: Key,
    height: usize,             // height of subtree, leaf is 1
    size: usize,               // number of nodes in subtree, including self
    left: Option<Box<Node>>,   // store: left child
    right: Option<Box<Node>>,  // store: right child
}

// Primary operations on a single node.
impl Node {
    // CREATE operation
    fn new(key: Key) -> Box<Node> {
        Box::new(Node {
            key,
            height: 1,
            size: 1,
            left: None,
            right: None,
        })
    }

    /// Return the key held by this node.
    #[inline]
    pub fn key(&self) -> Key {
        self.key
    }

    /// Return the height of subtree rooted at this node.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Return the number of nodes in subtree rooted at this node.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Return the left child.
    #[inline]
    pub fn left(&self) -> Option<&Node> {
        self.left_deref()
    }

    /// Return the right child.
    #[inline]
    pub fn right(&self) -> Option<&Node> {
        self.right_deref()
    }

    #[inline]
    fn left_deref(&self) -> Option<&Node> {
        self.left.as_ref().map(Deref::deref)
    }

    #[inline]
    fn right_deref(&self) -> Option<&Node> {
        self.right.as_ref().map(Deref::deref)
    }

    // recompute cached height and size from the children.
    #[inline]
    fn update(&mut self) {
        let (left, right) = (self.left_deref(), self.right_deref());
        let height = 1 + cmp::max(height_of(left), height_of(right));
        let size = 1 + size_of(left) + size_of(right);
        self.height = height;
        self.size = size;
    }

    #[inline]
    fn balance(&self) -> isize {
        (height_of(self.left_deref()) as isize) - (height_of(self.right_deref()) as isize)
    }

    fn min_key(&self) -> Key {
        let mut nref = self;
        while let Some(left) = nref.left_deref() {
            nref = left;
        }
        nref.key
    }
}

/// Statistics on [`Ost`] tree. Serves two purpose:
///
/// * To get partial but quick statistics via [`Ost::stats`] method.
/// * To get full statisics via [`Ost::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    height: usize,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            height: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    fn set_height(&mut self, height: usize) {
        self.height = height
    }

    #[inline]
    fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`Ost`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Ost`. EG:
    ///
    /// ```
    /// use ost_index::Ost;
    /// let ost = Ost::new("myinstance");
    ///
    /// // key, height and size: 24 bytes
    /// // two child links: 16 bytes
    /// assert_eq!(ost.stats().node_size(), 40);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return the height of the tree.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Return [`Depth`] statistics, available only from
    /// [`Ost::validate`].
    pub fn depths(&self) -> Option<Depth> {
        self.depths.clone()
    }
}
