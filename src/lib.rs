//! Stable sorting in O(N log N) worst-case time and O(1) extra memory,
//! after Andrey Astrelin's GrailSort.
//!
//! The sort is a merge sort that operates in place: it extracts a set of
//! distinct-valued elements to the front of the slice, uses them both as a
//! swap buffer and as movable tags that witness which run a block came
//! from, permutes fixed-size blocks under those tags, and merges by
//! swapping through the buffer. An optional external buffer (fixed 512
//! elements, or a power-of-two near sqrt N) replaces swap-based merging
//! with plain moves where it fits, cutting the constant factor without
//! changing the result.
//!
//! | Entry point                  | Scratch memory                         |
//! |------------------------------|----------------------------------------|
//! | [`sort`]                     | none                                   |
//! | [`sort_with_static_buffer`]  | 512 elements on the stack              |
//! | [`sort_with_dynamic_buffer`] | ~sqrt N on the heap, freed on return,  |
//! |                              | demotes to static if allocation fails  |
//! | [`rec_stable_sort`]          | O(log N) stack; classical in-place     |
//! |                              | merge sort, O(N log^2 N)               |
//!
//! Every variant is stable and produces identical output for identical
//! input. Elements are moved by copy throughout, hence the `Copy` bound.

use std::cmp::Ordering;

mod blocks;
mod keys;
mod merge;
mod ops;
mod recsort;

use blocks::{build_blocks, combine_blocks};
use keys::collect_keys;
use merge::{lazy_stable_sort, merge_without_buffer};
use ops::insert_sort;

/// Length of the stack scratch used by [`sort_with_static_buffer`].
pub const STATIC_BUFFER_LEN: usize = 512;

/// Sorts the slice stably, in place, without allocating.
///
/// Worst case O(*n* log *n*) comparisons and moves, O(1) auxiliary memory.
/// Equal elements keep their input order.
///
/// # Examples
///
/// ```
/// let mut v = [5, 4, 1, 3, 2];
/// grailsort::sort(&mut v);
/// assert_eq!(v, [1, 2, 3, 4, 5]);
/// ```
pub fn sort<T: Ord + Copy>(v: &mut [T]) {
    common_sort(v, None, &mut |a: &T, b: &T| a.cmp(b));
}

/// Sorts the slice stably with a comparator function, in place, without
/// allocating.
///
/// `compare` must define a total order; under a comparator that does not,
/// the result is some unspecified permutation of the input.
pub fn sort_by<T, F>(v: &mut [T], mut compare: F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    common_sort(v, None, &mut compare);
}

/// [`sort`] with a fixed 512-element stack buffer backing the merges.
///
/// Same output as [`sort`], usually faster: wherever the buffer covers the
/// current block length the engine merges by moves instead of swaps.
pub fn sort_with_static_buffer<T: Ord + Copy + Default>(v: &mut [T]) {
    sort_by_with_static_buffer(v, |a, b| a.cmp(b));
}

/// [`sort_by`] with a fixed 512-element stack buffer backing the merges.
pub fn sort_by_with_static_buffer<T, F>(v: &mut [T], mut compare: F)
where
    T: Copy + Default,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut buffer = [T::default(); STATIC_BUFFER_LEN];
    common_sort(v, Some(&mut buffer), &mut compare);
}

/// [`sort`] with a heap buffer of the smallest power of two whose square
/// covers the slice length.
///
/// The buffer is released before returning. If the allocation fails the
/// call silently demotes to [`sort_with_static_buffer`].
pub fn sort_with_dynamic_buffer<T: Ord + Copy + Default>(v: &mut [T]) {
    sort_by_with_dynamic_buffer(v, |a, b| a.cmp(b));
}

/// [`sort_by`] with a heap buffer of ~sqrt(len) elements.
pub fn sort_by_with_dynamic_buffer<T, F>(v: &mut [T], mut compare: F)
where
    T: Copy + Default,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut buf_len = 1;
    while buf_len * buf_len < v.len() {
        buf_len *= 2;
    }

    let mut buffer: Vec<T> = Vec::new();
    if buffer.try_reserve_exact(buf_len).is_err() {
        sort_by_with_static_buffer(v, compare);
        return;
    }
    buffer.resize(buf_len, T::default());

    common_sort(v, Some(&mut buffer), &mut compare);
}

/// Sorts the slice stably with the classical in-place recursive merge
/// sort: O(*n* log^2 *n*) time, O(log *n*) stack, no buffer machinery.
pub fn rec_stable_sort<T: Ord + Copy>(v: &mut [T]) {
    rec_stable_sort_by(v, |a, b| a.cmp(b));
}

/// [`rec_stable_sort`] with a comparator function.
pub fn rec_stable_sort_by<T, F>(v: &mut [T], mut compare: F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    recsort::rec_stable_sort_impl(v, &mut compare);
}

/// Driver shared by all block-sort variants: picks the block length and
/// key budget, collects keys, builds runs and doubles them until one run
/// spans the work region, then folds the key prefix back in.
fn common_sort<T, F>(v: &mut [T], mut ext_buf: Option<&mut [T]>, cmp: &mut F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = v.len();
    if len <= 16 {
        insert_sort(v, 0, len, cmp);
        return;
    }

    let mut block_len = 1;
    while block_len * block_len < len {
        block_len *= 2;
    }

    // One tag per block plus a block-sized swap buffer.
    let mut key_count = (len - 1) / block_len + 1;
    let ideal_keys = key_count + block_len;
    let keys_found = collect_keys(v, ideal_keys, cmp);

    let have_buffer = keys_found >= ideal_keys;
    if !have_buffer {
        if keys_found < 4 {
            // Too few distinct values for block tagging to work at all.
            lazy_stable_sort(v, cmp);
            return;
        }
        // Tagged but bufferless: fall back to the largest power-of-two key
        // budget that actually exists.
        key_count = block_len;
        block_len = 0;
        while key_count > keys_found {
            key_count /= 2;
        }
    }

    let dist = block_len + key_count;
    let mut build_len = if have_buffer { block_len } else { key_count };

    {
        let build_ext = if have_buffer { ext_buf.as_deref_mut() } else { None };
        build_blocks(v, dist, len - dist, build_len, build_ext, cmp);
    }

    loop {
        build_len *= 2;
        if len - dist <= build_len {
            break;
        }

        let mut reg_block_len = block_len;
        let mut scrolling = have_buffer;

        if !have_buffer {
            if key_count > 4 && key_count / 8 * key_count >= build_len {
                // Enough keys this round to split them into tags plus a
                // half-size scrolling buffer.
                reg_block_len = key_count / 2;
                scrolling = true;
            } else {
                let mut calc_keys = 1;
                let mut quota = build_len as u64 * keys_found as u64 / 2;
                while calc_keys < key_count && quota != 0 {
                    calc_keys *= 2;
                    quota /= 8;
                }
                reg_block_len = 2 * build_len / calc_keys;
            }
        }

        let fits_ext = scrolling
            && ext_buf
                .as_deref()
                .map_or(false, |buf| reg_block_len <= buf.len());
        let round_ext = if fits_ext { ext_buf.as_deref_mut() } else { None };

        combine_blocks(
            v,
            0,
            dist,
            len - dist,
            build_len,
            reg_block_len,
            scrolling,
            round_ext,
            cmp,
        );
    }

    // The key prefix is small (O(sqrt N)) and scrambled; sort it and merge
    // it into the finished tail.
    insert_sort(v, 0, dist, cmp);
    merge_without_buffer(v, 0, dist, len - dist, cmp);
}
