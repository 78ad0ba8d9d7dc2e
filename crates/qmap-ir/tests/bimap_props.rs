//! Property-based tests for the bidirectional index map.
//!
//! Any sequence of map/unmap operations must leave the forward and reverse
//! tables consistent with each other.

use proptest::prelude::*;
use qmap_ir::{BiMap, UpstreamQubit, VirtualQubit};

#[derive(Debug, Clone)]
enum Op {
    Map(u32, u32),
    UnmapForward(u32),
    UnmapReverse(u32),
}

fn arb_op() -> impl Strategy<Value = Op> {
    // Small index ranges so collisions are frequent.
    prop_oneof![
        3 => (0_u32..8, 0_u32..8).prop_map(|(a, b)| Op::Map(a, b)),
        1 => (0_u32..8).prop_map(Op::UnmapForward),
        1 => (0_u32..8).prop_map(Op::UnmapReverse),
    ]
}

fn assert_consistent(map: &BiMap<UpstreamQubit, VirtualQubit>) {
    for (up, virt) in map.iter() {
        assert_eq!(map.reverse(&virt), Some(up));
        assert_eq!(map.forward(&up), Some(virt));
    }
    for index in 0..8 {
        if let Some(up) = map.reverse(&VirtualQubit(index)) {
            assert_eq!(map.forward(&up), Some(VirtualQubit(index)));
        }
        if let Some(virt) = map.forward(&UpstreamQubit(index)) {
            assert_eq!(map.reverse(&virt), Some(UpstreamQubit(index)));
        }
    }
}

proptest! {
    #[test]
    fn prop_injective_after_every_op(ops in prop::collection::vec(arb_op(), 0..64)) {
        let mut map = BiMap::new();
        for op in ops {
            match op {
                Op::Map(a, b) => {
                    map.map(UpstreamQubit(a), VirtualQubit(b));
                    prop_assert_eq!(map.forward(&UpstreamQubit(a)), Some(VirtualQubit(b)));
                }
                Op::UnmapForward(a) => {
                    map.unmap_forward(&UpstreamQubit(a));
                    prop_assert!(!map.contains_forward(&UpstreamQubit(a)));
                }
                Op::UnmapReverse(b) => {
                    map.unmap_reverse(&VirtualQubit(b));
                    prop_assert!(!map.contains_reverse(&VirtualQubit(b)));
                }
            }
            assert_consistent(&map);
            prop_assert_eq!(map.iter().count(), map.len());
        }
    }
}
