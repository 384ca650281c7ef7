/*!
Rust implementation of the lock-free parallel disjoint set described
in the paper "Wait-free Parallel Algorithms for the Union-Find
Problem" by Richard J. Anderson and Heather Woll.

Based on the C++ implementation from
`https://github.com/vgteam/odgi/blob/master/src/dset64-gccAtomic.hpp`

The snarl finder uses it to merge node sides into adjacency
components, with the unions performed from a rayon parallel iterator.
*/

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// Each element is stored as a (rank, parent) pair of atomics.
pub struct DisjointSets {
    data: Vec<AtomicU64>,
    len: usize,
}

impl DisjointSets {
    pub fn new(size: usize) -> Self {
        let mut data = Vec::with_capacity(size * 2);
        for i in 0..size {
            data.push(AtomicU64::new(0));
            data.push(AtomicU64::new(i as u64));
        }
        Self { data, len: size }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn rank_ix(id: u64) -> usize {
        (id * 2) as usize
    }

    #[inline]
    fn parent_ix(id: u64) -> usize {
        (id * 2 + 1) as usize
    }

    #[inline]
    pub fn rank(&self, id: u64) -> u64 {
        self.data[Self::rank_ix(id)].load(Ordering::SeqCst)
    }

    #[inline]
    pub fn parent(&self, id: u64) -> u64 {
        self.data[Self::parent_ix(id)].load(Ordering::SeqCst)
    }

    /// Find the representative of `id`, halving the path on the way.
    #[inline]
    pub fn find(&self, mut id: u64) -> u64 {
        while id != self.parent(id) {
            let parent = self.parent(id);
            let grandparent = self.parent(parent);

            // losing this race only means the path isn't shortened
            let _ = self.data[Self::parent_ix(id)].compare_exchange(
                parent,
                grandparent,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );

            id = grandparent;
        }
        id
    }

    #[inline]
    pub fn same(&self, mut id_1: u64, mut id_2: u64) -> bool {
        loop {
            id_1 = self.find(id_1);
            id_2 = self.find(id_2);

            if id_1 == id_2 {
                return true;
            }
            if self.parent(id_1) == id_1 {
                return false;
            }
        }
    }

    /// Merge the sets containing `id_1` and `id_2`, returning the new
    /// representative.
    #[inline]
    pub fn unite(&self, mut id_1: u64, mut id_2: u64) -> u64 {
        loop {
            id_1 = self.find(id_1);
            id_2 = self.find(id_2);

            if id_1 == id_2 {
                return id_1;
            }

            let mut r_1 = self.rank(id_1);
            let mut r_2 = self.rank(id_2);

            if r_1 > r_2 || (r_1 == r_2 && id_1 < id_2) {
                std::mem::swap(&mut r_1, &mut r_2);
                std::mem::swap(&mut id_1, &mut id_2);
            }

            let linked = self.data[Self::parent_ix(id_1)].compare_exchange(
                id_1,
                id_2,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );

            if linked.is_err() {
                continue;
            }

            if r_1 == r_2 {
                let _ = self.data[Self::rank_ix(id_2)].compare_exchange(
                    r_2,
                    r_2 + 1,
                    Ordering::SeqCst,
                    Ordering::SeqCst,
                );
            }

            return id_2;
        }
    }

    /// Assign every element a dense class index in `0..n`, numbering
    /// classes in the order their first element appears. Returns the
    /// per-element classes and the number of classes.
    pub fn dense_classes(&self) -> (Vec<usize>, usize) {
        let mut class_of_root: fnv::FnvHashMap<u64, usize> =
            fnv::FnvHashMap::default();
        let mut classes = Vec::with_capacity(self.len);

        for id in 0..self.len as u64 {
            let root = self.find(id);
            let next = class_of_root.len();
            let class = *class_of_root.entry(root).or_insert(next);
            classes.push(class);
        }

        let count = class_of_root.len();
        (classes, count)
    }
}
