/// Quicksort with Lomuto partitioning around the last item.
///
/// Already sorted input hits the O(n²) worst case, but recursion only goes
/// into the smaller half so the stack stays O(log n).
pub fn quicksort<T: Ord>(mut slice: &mut [T]) {
    while slice.len() > 1 {
        let current = slice;
        let (smaller, larger) = partition(current);
        if smaller.len() < larger.len() {
            quicksort(smaller);
            slice = larger;
        } else {
            quicksort(larger);
            slice = smaller;
        }
    }
}

/// Partition `slice` around its last item.
///
/// Returns the items `<=` the pivot and the items `>` the pivot. The pivot
/// ends up in its sorted position between the two and is in neither.
///
/// # Panics
///
/// * if `slice` is empty
fn partition<T: Ord>(slice: &mut [T]) -> (&mut [T], &mut [T]) {
    let pivot_index = slice.len() - 1;

    // slice[..store] is `<= pivot`, slice[store..i] is `> pivot`
    let mut store = 0;
    for i in 0..pivot_index {
        if slice[i] <= slice[pivot_index] {
            slice.swap(store, i);
            store += 1;
        }
    }
    slice.swap(store, pivot_index);

    let (smaller, rest) = slice.split_at_mut(store);
    (smaller, &mut rest[1..])
}
