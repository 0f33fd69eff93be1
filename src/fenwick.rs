use alloc::vec::Vec;

/// Binary indexed tree over item sizes.
///
/// `tree[i]` (1-based) holds the sum of the sizes in `(i - low_bit(i), i]`. Offsets, point
/// updates, appends and the offset → index search are all `O(log n)`.
#[derive(Clone, Debug)]
pub(crate) struct Fenwick {
    tree: Vec<u64>,
    total: u64,
}

impl Fenwick {
    pub(crate) fn from_sizes(sizes: &[u32]) -> Self {
        let mut prefix = Vec::with_capacity(sizes.len() + 1);
        prefix.push(0u64);
        for &size in sizes {
            let last = prefix[prefix.len() - 1];
            prefix.push(last.saturating_add(size as u64));
        }
        let tree = (0..prefix.len())
            .map(|i| {
                if i == 0 {
                    0
                } else {
                    prefix[i] - prefix[i - low_bit(i)]
                }
            })
            .collect();
        Self {
            tree,
            total: prefix[prefix.len() - 1],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tree.len() - 1
    }

    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Drops every size at `len` and beyond. Nodes up to `len` only cover earlier sizes.
    pub(crate) fn truncate(&mut self, len: usize) {
        if len >= self.len() {
            return;
        }
        self.total = self.prefix_sum(len);
        self.tree.truncate(len + 1);
    }

    /// Appends one size. The new node is the size plus its children `n - 1, n - 2, n - 4, ...`.
    pub(crate) fn push(&mut self, size: u32) {
        let n = self.len() + 1;
        let mut node = size as u64;
        let mut step = 1;
        while step < low_bit(n) {
            node = node.saturating_add(self.tree[n - step]);
            step <<= 1;
        }
        self.tree.push(node);
        self.total = self.total.saturating_add(size as u64);
    }

    /// Adds `delta` to the size at `index`. The caller keeps every size non-negative.
    pub(crate) fn add(&mut self, index: usize, delta: i64) {
        let n = self.len();
        if index >= n || delta == 0 {
            return;
        }
        self.total = apply_delta(self.total, delta);
        let mut i = index + 1;
        while i <= n {
            self.tree[i] = apply_delta(self.tree[i], delta);
            i += low_bit(i);
        }
    }

    /// Sum of the first `count` sizes, i.e. the start offset of item `count`.
    pub(crate) fn prefix_sum(&self, count: usize) -> u64 {
        let mut i = count.min(self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.tree[i]);
            i -= low_bit(i);
        }
        sum
    }

    /// Index of the item whose interval `[start, start + size)` contains `offset`.
    ///
    /// Offsets at or past the total map to the last item. Returns 0 for an empty tree.
    pub(crate) fn index_at(&self, offset: u64) -> usize {
        let n = self.len();
        if n == 0 {
            return 0;
        }
        // Largest `pos` with prefix_sum(pos) <= offset, found by descending from the top node.
        let mut pos = 0usize;
        let mut rest = offset;
        let mut step = 1usize << (usize::BITS - 1 - n.leading_zeros());
        while step > 0 {
            let next = pos + step;
            if next <= n && self.tree[next] <= rest {
                rest -= self.tree[next];
                pos = next;
            }
            step >>= 1;
        }
        pos.min(n - 1)
    }
}

fn low_bit(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        debug_assert!(value >= delta.unsigned_abs(), "size sum underflow");
        value.saturating_sub(delta.unsigned_abs())
    }
}
