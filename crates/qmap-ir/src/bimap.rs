//! Bidirectional index map between two qubit identity spaces.

use rustc_hash::FxHashMap;
use std::hash::Hash;

use crate::qubit::{PhysicalQubit, VirtualQubit};

/// A partial injection between two index spaces with O(1) lookup both ways.
///
/// The forward and reverse tables always agree: `forward(a) == Some(b)` if
/// and only if `reverse(b) == Some(a)`. Mapping a key or value that is
/// already paired removes the stale pairing first.
#[derive(Debug, Clone)]
pub struct BiMap<L, R> {
    forward: FxHashMap<L, R>,
    reverse: FxHashMap<R, L>,
}

impl<L, R> Default for BiMap<L, R> {
    fn default() -> Self {
        Self {
            forward: FxHashMap::default(),
            reverse: FxHashMap::default(),
        }
    }
}

impl<L, R> BiMap<L, R>
where
    L: Copy + Eq + Hash,
    R: Copy + Eq + Hash,
{
    /// Create a new empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair `left` with `right`.
    ///
    /// Any existing pairing containing `left` on the forward side or `right`
    /// on the reverse side is removed first. Idempotent if the pair already
    /// holds.
    pub fn map(&mut self, left: L, right: R) {
        if let Some(old_right) = self.forward.remove(&left) {
            self.reverse.remove(&old_right);
        }
        if let Some(old_left) = self.reverse.remove(&right) {
            self.forward.remove(&old_left);
        }
        self.forward.insert(left, right);
        self.reverse.insert(right, left);
    }

    /// Look up the value paired with `left`.
    #[inline]
    pub fn forward(&self, left: &L) -> Option<R> {
        self.forward.get(left).copied()
    }

    /// Look up the key paired with `right`.
    #[inline]
    pub fn reverse(&self, right: &R) -> Option<L> {
        self.reverse.get(right).copied()
    }

    /// Remove the pairing containing `left`, if any.
    pub fn unmap_forward(&mut self, left: &L) -> Option<R> {
        let right = self.forward.remove(left)?;
        self.reverse.remove(&right);
        Some(right)
    }

    /// Remove the pairing containing `right`, if any.
    pub fn unmap_reverse(&mut self, right: &R) -> Option<L> {
        let left = self.reverse.remove(right)?;
        self.forward.remove(&left);
        Some(left)
    }

    /// Check whether `left` is currently mapped.
    pub fn contains_forward(&self, left: &L) -> bool {
        self.forward.contains_key(left)
    }

    /// Check whether `right` is currently mapped.
    pub fn contains_reverse(&self, right: &R) -> bool {
        self.reverse.contains_key(right)
    }

    /// Get the number of pairings.
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterate over `(left, right)` pairs.
    ///
    /// Order is unspecified but stable for an unmodified map.
    pub fn iter(&self) -> impl Iterator<Item = (L, R)> + '_ {
        self.forward.iter().map(|(&l, &r)| (l, r))
    }

    /// Collect the pairs sorted by key.
    pub fn to_sorted_vec(&self) -> Vec<(L, R)>
    where
        L: Ord,
    {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable_by_key(|&(l, _)| l);
        pairs
    }
}

impl BiMap<VirtualQubit, PhysicalQubit> {
    /// Create the identity placement over `[0, num_qubits)`.
    pub fn identity(num_qubits: u32) -> Self {
        let mut map = Self::new();
        for i in 0..num_qubits {
            map.map(VirtualQubit(i), PhysicalQubit(i));
        }
        map
    }
}

impl<L, R> PartialEq for BiMap<L, R>
where
    L: Copy + Eq + Hash,
    R: Copy + Eq + Hash,
{
    fn eq(&self, other: &Self) -> bool {
        self.forward == other.forward
    }
}

impl<L, R> Eq for BiMap<L, R>
where
    L: Copy + Eq + Hash,
    R: Copy + Eq + Hash,
{
}

impl<L, R> FromIterator<(L, R)> for BiMap<L, R>
where
    L: Copy + Eq + Hash,
    R: Copy + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (L, R)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (l, r) in iter {
            map.map(l, r);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::UpstreamQubit;

    #[test]
    fn test_map_and_lookup() {
        let mut map = BiMap::new();
        map.map(UpstreamQubit(4), VirtualQubit(0));

        assert_eq!(map.forward(&UpstreamQubit(4)), Some(VirtualQubit(0)));
        assert_eq!(map.reverse(&VirtualQubit(0)), Some(UpstreamQubit(4)));
        assert_eq!(map.forward(&UpstreamQubit(5)), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remap_key_drops_old_value() {
        let mut map = BiMap::new();
        map.map(UpstreamQubit(1), VirtualQubit(0));
        map.map(UpstreamQubit(1), VirtualQubit(3));

        assert_eq!(map.forward(&UpstreamQubit(1)), Some(VirtualQubit(3)));
        assert_eq!(map.reverse(&VirtualQubit(0)), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remap_value_drops_old_key() {
        let mut map = BiMap::new();
        map.map(UpstreamQubit(1), VirtualQubit(0));
        map.map(UpstreamQubit(2), VirtualQubit(0));

        assert_eq!(map.forward(&UpstreamQubit(1)), None);
        assert_eq!(map.reverse(&VirtualQubit(0)), Some(UpstreamQubit(2)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_map_is_idempotent() {
        let mut map = BiMap::new();
        map.map(UpstreamQubit(1), VirtualQubit(1));
        map.map(UpstreamQubit(1), VirtualQubit(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.reverse(&VirtualQubit(1)), Some(UpstreamQubit(1)));
    }

    #[test]
    fn test_unmap_both_directions() {
        let mut map: BiMap<UpstreamQubit, VirtualQubit> =
            [(UpstreamQubit(1), VirtualQubit(0)), (UpstreamQubit(2), VirtualQubit(1))]
                .into_iter()
                .collect();

        assert_eq!(map.unmap_forward(&UpstreamQubit(1)), Some(VirtualQubit(0)));
        assert!(!map.contains_reverse(&VirtualQubit(0)));

        assert_eq!(map.unmap_reverse(&VirtualQubit(1)), Some(UpstreamQubit(2)));
        assert!(!map.contains_forward(&UpstreamQubit(2)));

        // Unmapping again is a no-op.
        assert_eq!(map.unmap_forward(&UpstreamQubit(1)), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_identity() {
        let map = BiMap::identity(4);
        assert_eq!(map.len(), 4);
        for i in 0..4 {
            assert_eq!(map.forward(&VirtualQubit(i)), Some(PhysicalQubit(i)));
        }
    }

    #[test]
    fn test_sorted_vec() {
        let map: BiMap<UpstreamQubit, VirtualQubit> = [
            (UpstreamQubit(9), VirtualQubit(0)),
            (UpstreamQubit(2), VirtualQubit(1)),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            map.to_sorted_vec(),
            vec![
                (UpstreamQubit(2), VirtualQubit(1)),
                (UpstreamQubit(9), VirtualQubit(0))
            ]
        );
    }
}
