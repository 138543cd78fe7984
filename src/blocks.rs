//! Run construction and block combination. `build_blocks` turns the work
//! region into sorted runs of twice the buffer length; `combine_blocks`
//! doubles run length by permuting fixed-size blocks under their tag keys
//! and merging them with a scrolling buffer.

use std::cmp::Ordering::{self, Equal, Greater, Less};

use crate::merge::{
    merge_left, merge_left_with_extra_buffer, merge_right, merge_without_buffer,
    smart_merge_with_buffer, smart_merge_with_extra_buffer, smart_merge_without_buffer, Leftover,
    Subarray,
};
use crate::ops::{block_swap, insert_sort, rotate};

/// Sorts the work region `v[start .. start + len)` into runs of length
/// `2 * build_len` (plus a shorter tail). On entry the `build_len` elements
/// before `start` are scratch; on exit the scratch precedes the runs again.
pub(crate) fn build_blocks<T, F>(
    v: &mut [T],
    start: usize,
    len: usize,
    build_len: usize,
    ext_buf: Option<&mut [T]>,
    cmp: &mut F,
) where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    // Origin of the work region; walks left as merge output displaces the
    // scratch area.
    let mut org = start;
    let mut part = 2;

    match ext_buf {
        Some(buf) if !buf.is_empty() => {
            // Largest power of two that fits both the buffer budget and the
            // external allocation.
            let mut build_buf = build_len.min(buf.len());
            while build_buf & (build_buf - 1) != 0 {
                build_buf &= build_buf - 1;
            }

            buf[..build_buf].copy_from_slice(&v[start - build_buf..start]);

            // Pair pass, writing each ordered pair two slots early. The
            // vacated slots become part of the drifting scratch area.
            let mut at = 1;
            while at < len {
                let flip = usize::from(cmp(&v[org + at - 1], &v[org + at]) == Greater);
                v[org + at - 3] = v[org + at - 1 + flip];
                v[org + at - 2] = v[org + at - flip];
                at += 2;
            }
            if len % 2 == 1 {
                v[org + len - 3] = v[org + len - 1];
            }
            org -= 2;

            // Doubling by pure moves while the external buffer covers the
            // run length.
            while part < build_buf {
                let mut left = 0;
                while left + 2 * part <= len {
                    merge_left_with_extra_buffer(v, org + left, part, part, org + left - part, cmp);
                    left += 2 * part;
                }

                let rest = len - left;
                if rest > part {
                    merge_left_with_extra_buffer(
                        v,
                        org + left,
                        part,
                        rest - part,
                        org + left - part,
                        cmp,
                    );
                } else {
                    v.copy_within(org + left..org + len, org + left - part);
                }
                org -= part;
                part *= 2;
            }

            v[org + len..org + len + build_buf].copy_from_slice(&buf[..build_buf]);
        }
        _ => {
            let mut at = 1;
            while at < len {
                let flip = usize::from(cmp(&v[org + at - 1], &v[org + at]) == Greater);
                v.swap(org + at - 3, org + at - 1 + flip);
                v.swap(org + at - 2, org + at - flip);
                at += 2;
            }
            if len % 2 == 1 {
                v.swap(org + len - 1, org + len - 3);
            }
            org -= 2;
        }
    }

    // Swap-based doubling up to the full buffer length.
    while part < build_len {
        let mut left = 0;
        while left + 2 * part <= len {
            merge_left(v, org + left, part, part, org + left - part, cmp);
            left += 2 * part;
        }

        let rest = len - left;
        if rest > part {
            merge_left(v, org + left, part, rest - part, org + left - part, cmp);
        } else {
            rotate(v, org + left - part, part, rest);
        }
        org -= part;
        part *= 2;
    }

    // Final pass right to left, leaving the scratch on the left of the
    // freshly built runs.
    let tail = len % (2 * build_len);
    let mut pos = len - tail;

    if tail <= build_len {
        rotate(v, org + pos, tail, build_len);
    } else {
        merge_right(v, org + pos, build_len, tail - build_len, build_len, cmp);
    }

    while pos > 0 {
        pos -= 2 * build_len;
        merge_right(v, org + pos, build_len, build_len, build_len, cmp);
    }
}

fn origin_of<T, F>(v: &[T], key: usize, midkey: usize, cmp: &mut F) -> Subarray
where
    F: FnMut(&T, &T) -> Ordering,
{
    if cmp(&v[key], &v[midkey]) == Less {
        Subarray::Left
    } else {
        Subarray::Right
    }
}

/// Scan merge over a row of tagged blocks whose first elements are already
/// in order. `block_count` regular blocks start at `start`; their tags start
/// at `keys_pos` in block order, tags before `midkey` marking left-run
/// blocks. `a_block_count` further left-run blocks and a `last_len`-element
/// irregular right-run tail follow the regular blocks; `last_len == 0`
/// requires `a_block_count == 0`.
pub(crate) fn merge_block_series<T, F>(
    v: &mut [T],
    keys_pos: usize,
    midkey: usize,
    start: usize,
    block_count: usize,
    block_len: usize,
    have_buffer: bool,
    a_block_count: usize,
    last_len: usize,
    cmp: &mut F,
) where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    if block_count == 0 {
        let a_len = a_block_count * block_len;
        if have_buffer {
            merge_left(v, start, a_len, last_len, start - block_len, cmp);
        } else {
            merge_without_buffer(v, start, a_len, last_len, cmp);
        }
        return;
    }

    let mut leftover = Leftover {
        len: block_len,
        from: origin_of(v, keys_pos, midkey, cmp),
    };
    let mut scanned = block_len;

    for key in 1..block_count {
        let rest = scanned - leftover.len;
        let next = origin_of(v, keys_pos + key, midkey, cmp);

        if next == leftover.from {
            // Same stream: no merge needed, slide the leftover into the
            // scratch slot and take the new block whole.
            if have_buffer {
                block_swap(v, start + rest - block_len, start + rest, leftover.len);
            }
            leftover.len = block_len;
        } else if have_buffer {
            leftover = smart_merge_with_buffer(v, start + rest, leftover, block_len, cmp);
        } else {
            leftover = smart_merge_without_buffer(v, start + rest, leftover, block_len, cmp);
        }

        scanned += block_len;
    }

    let mut rest = scanned - leftover.len;

    if last_len != 0 {
        if leftover.from == Subarray::Right {
            if have_buffer {
                block_swap(v, start + rest - block_len, start + rest, leftover.len);
            }
            rest = scanned;
            leftover = Leftover { len: block_len * a_block_count, from: Subarray::Left };
        } else {
            // The trailing left-run blocks are known to precede the whole
            // tail, so the fragment absorbs them without a polarity check.
            leftover.len += block_len * a_block_count;
        }

        if have_buffer {
            merge_left(v, start + rest, leftover.len, last_len, start + rest - block_len, cmp);
        } else {
            merge_without_buffer(v, start + rest, leftover.len, last_len, cmp);
        }
    } else if have_buffer {
        block_swap(v, start + rest, start + rest - block_len, leftover.len);
    }
}

/// `merge_block_series` for the externally buffered mode: slides are copies
/// and the scratch contents are never preserved.
pub(crate) fn merge_block_series_with_extra_buffer<T, F>(
    v: &mut [T],
    keys_pos: usize,
    midkey: usize,
    start: usize,
    block_count: usize,
    block_len: usize,
    a_block_count: usize,
    last_len: usize,
    cmp: &mut F,
) where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    if block_count == 0 {
        let a_len = a_block_count * block_len;
        merge_left_with_extra_buffer(v, start, a_len, last_len, start - block_len, cmp);
        return;
    }

    let mut leftover = Leftover {
        len: block_len,
        from: origin_of(v, keys_pos, midkey, cmp),
    };
    let mut scanned = block_len;

    for key in 1..block_count {
        let rest = scanned - leftover.len;
        let next = origin_of(v, keys_pos + key, midkey, cmp);

        if next == leftover.from {
            v.copy_within(
                start + rest..start + rest + leftover.len,
                start + rest - block_len,
            );
            leftover.len = block_len;
        } else {
            leftover = smart_merge_with_extra_buffer(v, start + rest, leftover, block_len, cmp);
        }

        scanned += block_len;
    }

    let mut rest = scanned - leftover.len;

    if last_len != 0 {
        if leftover.from == Subarray::Right {
            v.copy_within(
                start + rest..start + rest + leftover.len,
                start + rest - block_len,
            );
            rest = scanned;
            leftover = Leftover { len: block_len * a_block_count, from: Subarray::Left };
        } else {
            leftover.len += block_len * a_block_count;
        }

        merge_left_with_extra_buffer(
            v,
            start + rest,
            leftover.len,
            last_len,
            start + rest - block_len,
            cmp,
        );
    } else {
        v.copy_within(
            start + rest..start + rest + leftover.len,
            start + rest - block_len,
        );
    }
}

/// Merges every pair of adjacent `build_len` runs in
/// `v[start .. start + len)` into `2 * build_len` runs. Tag keys live at
/// `keys_pos`; `block_len`-sized blocks are selection-sorted by first
/// element (tags breaking ties) before the scan merge. With `have_buffer`
/// the `block_len` elements before `start` scroll through the region as
/// scratch and are restored afterwards; `ext_buf` additionally switches the
/// data movement from swaps to plain copies.
pub(crate) fn combine_blocks<T, F>(
    v: &mut [T],
    keys_pos: usize,
    start: usize,
    len: usize,
    build_len: usize,
    block_len: usize,
    have_buffer: bool,
    mut ext_buf: Option<&mut [T]>,
    cmp: &mut F,
) where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut len = len;
    let group_count = len / (2 * build_len);
    let mut tail_run = len - group_count * 2 * build_len;

    // A tail no longer than one run is already in place from the previous
    // round; exclude it from this one.
    if tail_run <= build_len {
        len -= tail_run;
        tail_run = 0;
    }

    if let Some(buf) = ext_buf.as_deref_mut() {
        buf[..block_len].copy_from_slice(&v[start - block_len..start]);
    }

    for group in 0..=group_count {
        if group == group_count && tail_run == 0 {
            break;
        }

        let block_pos = start + group * 2 * build_len;
        let group_len = if group == group_count { tail_run } else { 2 * build_len };
        let block_count = group_len / block_len;

        // Tags must be sorted again each round; block permutation of the
        // previous group scrambled them.
        let extra = usize::from(group == group_count);
        insert_sort(v, keys_pos, block_count + extra, cmp);

        let mut midkey = build_len / block_len;

        // Selection sort of whole blocks by first element, tags in
        // lockstep. Distinct tags break ties, which keeps equal-valued
        // blocks in stream order.
        for index in 1..block_count {
            let mut lowest = index - 1;

            for right in index..block_count {
                let order = cmp(
                    &v[block_pos + lowest * block_len],
                    &v[block_pos + right * block_len],
                );
                if order == Greater
                    || (order == Equal
                        && cmp(&v[keys_pos + lowest], &v[keys_pos + right]) == Greater)
                {
                    lowest = right;
                }
            }

            if lowest != index - 1 {
                block_swap(
                    v,
                    block_pos + (index - 1) * block_len,
                    block_pos + lowest * block_len,
                    block_len,
                );
                v.swap(keys_pos + index - 1, keys_pos + lowest);

                if midkey == index - 1 || midkey == lowest {
                    midkey ^= (index - 1) ^ lowest;
                }
            }
        }

        // The irregular tail must slot in before any trailing left-run
        // blocks whose first element exceeds its first element.
        let last_len = if group == group_count { tail_run % block_len } else { 0 };
        let mut a_block_count = 0;
        if last_len != 0 {
            while a_block_count < block_count
                && cmp(
                    &v[block_pos + block_count * block_len],
                    &v[block_pos + (block_count - a_block_count - 1) * block_len],
                ) == Less
            {
                a_block_count += 1;
            }
        }

        if ext_buf.is_some() {
            merge_block_series_with_extra_buffer(
                v,
                keys_pos,
                keys_pos + midkey,
                block_pos,
                block_count - a_block_count,
                block_len,
                a_block_count,
                last_len,
                cmp,
            );
        } else {
            merge_block_series(
                v,
                keys_pos,
                keys_pos + midkey,
                block_pos,
                block_count - a_block_count,
                block_len,
                have_buffer,
                a_block_count,
                last_len,
                cmp,
            );
        }
    }

    // Bring the merged data back to `start` and the scratch back in front
    // of it.
    if let Some(buf) = ext_buf.as_deref_mut() {
        for i in (0..len).rev() {
            v[start + i] = v[start + i - block_len];
        }
        v[start - block_len..start].copy_from_slice(&buf[..block_len]);
    } else if have_buffer {
        for i in (0..len).rev() {
            v.swap(start + i, start + i - block_len);
        }
    }
}
