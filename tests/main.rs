//! Properties specific to the grailsort crate rather than to a single
//! variant: all variants agree on every input, boundary lengths behave, and
//! the keyed end-to-end scenarios hold.

use std::cmp::Ordering;

use rand::prelude::*;
use rand_xorshift::XorShiftRng;

use sort_test_tools::patterns;

type SortFn = fn(&mut [i32]);

const VARIANTS: [(&str, SortFn); 4] = [
    ("no_buffer", grailsort::sort::<i32>),
    ("static_buffer", grailsort::sort_with_static_buffer::<i32>),
    ("dynamic_buffer", grailsort::sort_with_dynamic_buffer::<i32>),
    ("rec_stable", grailsort::rec_stable_sort::<i32>),
];

/// Generates `len` elements for a keyed stability check: `key` drawn
/// uniformly below `key_count`, `val` counting the occurrences of that key,
/// so per key the `val`s appear in ascending order.
fn keyed_input(len: usize, key_count: usize, seed: u64) -> Vec<(i32, i32)> {
    let mut rng = XorShiftRng::seed_from_u64(seed);
    let mut counts = vec![0i32; key_count];

    (0..len)
        .map(|_| {
            let key = rng.gen_range(0..key_count);
            let val = counts[key];
            counts[key] += 1;
            (key as i32, val)
        })
        .collect()
}

fn key_only(a: &(i32, i32), b: &(i32, i32)) -> Ordering {
    a.0.cmp(&b.0)
}

fn assert_keyed_sorted(v: &[(i32, i32)]) {
    for w in v.windows(2) {
        assert!(
            w[0].0 < w[1].0 || (w[0].0 == w[1].0 && w[0].1 < w[1].1),
            "out of order: {:?} before {:?}",
            w[0],
            w[1]
        );
    }
}

#[test]
fn variants_produce_identical_output() {
    let sizes = [0, 1, 2, 15, 16, 17, 100, 511, 512, 513, 2_048, 10_000];

    for size in sizes {
        let inputs = [
            patterns::random(size),
            patterns::random_uniform(size, 0..16),
            patterns::descending(size),
            patterns::random_zipf(size, 1.0),
        ];

        for input in inputs {
            let mut expected = input.clone();
            expected.sort();

            for (name, sort_fn) in VARIANTS {
                let mut v = input.clone();
                sort_fn(&mut v);
                assert_eq!(v, expected, "variant {name} diverged at len {size}");
            }
        }
    }
}

#[test]
fn boundary_sizes() {
    for size in [0, 1, 2, 15, 16, 17, 511, 512, 513, 10_000] {
        let input = patterns::random(size);

        let mut expected = input.clone();
        expected.sort();

        for (name, sort_fn) in VARIANTS {
            let mut v = input.clone();
            sort_fn(&mut v);
            assert_eq!(v, expected, "variant {name} failed at len {size}");
        }
    }
}

#[test]
fn empty_slice_is_untouched() {
    let mut v: [i32; 0] = [];
    grailsort::sort(&mut v);
    assert_eq!(v, []);
}

#[test]
fn single_element() {
    let mut v = [(3, 0)];
    grailsort::sort_by(&mut v, key_only);
    assert_eq!(v, [(3, 0)]);
}

#[test]
fn small_input_stability() {
    let mut v = [(2, 0), (1, 0), (2, 1), (1, 1)];
    grailsort::sort_by(&mut v, key_only);
    assert_eq!(v, [(1, 0), (1, 1), (2, 0), (2, 1)]);
}

#[test]
fn reversed_keys() {
    let mut v = [5, 4, 3, 2, 1];
    grailsort::sort(&mut v);
    assert_eq!(v, [1, 2, 3, 4, 5]);
}

#[test]
fn seventeen_equal_elements() {
    // One past the insertion-sort cutoff, all ties: the lazy path must
    // leave the occurrence order alone.
    let mut v: Vec<(i32, i32)> = (0..17).map(|i| (7, i)).collect();
    let original = v.clone();

    grailsort::sort_by(&mut v, key_only);
    assert_eq!(v, original);

    grailsort::rec_stable_sort_by(&mut v, key_only);
    assert_eq!(v, original);
}

#[test]
fn keyed_stability_one_million() {
    // 1024 key classes over a million elements forces deep combine rounds;
    // per class the occurrence counters must come out 0, 1, 2, ...
    let input = keyed_input(1_000_000, 1024, 0x00D1_5EA5E);

    let mut v = input.clone();
    grailsort::sort_by(&mut v, key_only);
    assert_keyed_sorted(&v);

    let mut v = input;
    grailsort::sort_by_with_dynamic_buffer(&mut v, key_only);
    assert_keyed_sorted(&v);
}

#[test]
fn keyed_stability_across_variants() {
    for key_count in [2, 7, 64, 1023] {
        let input = keyed_input(20_000, key_count, key_count as u64);

        let mut expected = input.clone();
        expected.sort();

        let checks: [(&str, fn(&mut [(i32, i32)])); 4] = [
            ("no_buffer", |v| grailsort::sort_by(v, key_only)),
            ("static_buffer", |v| {
                grailsort::sort_by_with_static_buffer(v, key_only)
            }),
            ("dynamic_buffer", |v| {
                grailsort::sort_by_with_dynamic_buffer(v, key_only)
            }),
            ("rec_stable", |v| grailsort::rec_stable_sort_by(v, key_only)),
        ];

        for (name, sort_fn) in checks {
            let mut v = input.clone();
            sort_fn(&mut v);
            assert_keyed_sorted(&v);
            assert_eq!(v, expected, "variant {name} at {key_count} keys");
        }
    }
}

#[test]
#[ignore = "minutes in debug builds; run with --ignored"]
fn ten_million_elements() {
    let mut rng = XorShiftRng::seed_from_u64(0x7E9_000_000);
    let input: Vec<i32> = (0..10_000_000).map(|_| rng.gen()).collect();

    let mut expected = input.clone();
    expected.sort();

    let mut v = input.clone();
    grailsort::sort_with_dynamic_buffer(&mut v);
    assert_eq!(v, expected);

    let mut v = input;
    grailsort::sort(&mut v);
    assert_eq!(v, expected);
}
