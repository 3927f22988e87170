// A max-heap stored in a slice, children of `i` are at `2i + 1` and `2i + 2`:
//
//           0
//     1            2
//  3     4      5     6
//
// parent_index = (child_index - 1) / 2

pub fn heap_sort<T: Ord>(slice: &mut [T]) {
    // Every index past `len / 2` is a leaf and already a heap on its own,
    // sift the parents down from the bottom up.
    for parent in (0..slice.len() / 2).rev() {
        sift_down(slice, parent);
    }

    for end in (1..slice.len()).rev() {
        // slice[..=end] is a max-heap, slice[end + 1..] is sorted
        slice.swap(0, end);
        sift_down(&mut slice[..end], 0);
    }
}

/// Move `heap[parent]` down until it is not smaller than its children.
///
/// Both subtrees of `parent` must already be max-heaps.
fn sift_down<T: Ord>(heap: &mut [T], mut parent: usize) {
    loop {
        let left = 2 * parent + 1;
        if left >= heap.len() {
            return;
        }

        let right = left + 1;
        let largest = if right < heap.len() && heap[right] > heap[left] {
            right
        } else {
            left
        };

        if heap[largest] <= heap[parent] {
            return;
        }
        heap.swap(parent, largest);
        parent = largest;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::assert_sorts;

    #[test]
    #[cfg_attr(miri, ignore = "no unsafe code, nothing for miri to check")]
    fn test() {
        assert_sorts(heap_sort, vec![1, 4, 2, 24, 65, 3, 3, 45]);
    }

    #[test]
    #[cfg_attr(miri, ignore = "no unsafe code, nothing for miri to check")]
    fn edge_cases() {
        assert_sorts(heap_sort, vec![]);
        assert_sorts(heap_sort, vec![1]);
        assert_sorts(heap_sort, vec![0, 0, 1]);
        assert_sorts(heap_sort, vec![5, 5, 5, 5]);
        assert_sorts(heap_sort, (0..50).rev().collect());
    }

    #[test]
    fn sift_down_restores_heap() {
        let mut heap = [1, 9, 8, 4, 5, 6];
        sift_down(&mut heap, 0);
        assert_eq!(heap, [9, 5, 8, 4, 1, 6]);
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;
        use crate::tests::{PROPTEST_CASES, VEC_SIZE};

        proptest!(
            #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

            #[test]
            #[cfg_attr(miri, ignore = "no unsafe code, nothing for miri to check")]
            fn test(
                vec in proptest::collection::vec(-10000..10000i32, 0..VEC_SIZE),
            ) {
               assert_sorts(heap_sort, vec);
            }
        );
    }
}
