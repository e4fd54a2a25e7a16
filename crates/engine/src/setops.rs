//! Sort-based multiset algorithms.
//!
//! Every algorithm here reduces to the stable LSD radix sort as its sole
//! ordering primitive; output order is therefore always ascending. The
//! `assume_unique` flag skips the internal de-duplication passes when the
//! caller guarantees inputs already have unique elements. That is an
//! optimization only: if the guarantee is violated the results are
//! implementation-defined (duplicates may survive or multiplicity may be
//! misclassified), never checked at runtime.

use shoal_array::{radix_sort, DistVec, RadixKey};

/// Sorted distinct elements of `a`.
pub fn unique<T: RadixKey + PartialEq>(a: &DistVec<T>) -> DistVec<T> {
    let (sorted, _) = radix_sort(a);
    let flat = sorted.to_vec();
    let mut out = Vec::with_capacity(flat.len());
    for (i, &x) in flat.iter().enumerate() {
        if i == 0 || flat[i - 1] != x {
            out.push(x);
        }
    }
    DistVec::from_vec(a.fabric(), out)
}

/// Elements present in both `a` and `b`; ascending, duplicates collapsed.
pub fn intersect1d<T: RadixKey + PartialEq>(
    a: &DistVec<T>,
    b: &DistVec<T>,
    assume_unique: bool,
) -> DistVec<T> {
    let (ua, ub) = dedup_pair(a, b, assume_unique);
    // In the sorted concatenation of two unique arrays, an element of the
    // intersection appears exactly twice.
    let sorted = sorted_concat(&ua, &ub);
    let mut out = Vec::new();
    for i in 1..sorted.len() {
        if sorted[i] == sorted[i - 1] {
            out.push(sorted[i]);
        }
    }
    DistVec::from_vec(a.fabric(), out)
}

/// Elements present in `a` or `b`; ascending, duplicates collapsed.
pub fn union1d<T: RadixKey + PartialEq>(a: &DistVec<T>, b: &DistVec<T>) -> DistVec<T> {
    let mut both = a.to_vec();
    both.extend(b.iter());
    unique(&DistVec::from_vec(a.fabric(), both))
}

/// Elements present in exactly one of `a`, `b`; ascending.
pub fn setxor1d<T: RadixKey + PartialEq>(
    a: &DistVec<T>,
    b: &DistVec<T>,
    assume_unique: bool,
) -> DistVec<T> {
    let (ua, ub) = dedup_pair(a, b, assume_unique);
    // Singletons of the sorted concatenation are the symmetric difference.
    let sorted = sorted_concat(&ua, &ub);
    let mut out = Vec::new();
    for i in 0..sorted.len() {
        let eq_prev = i > 0 && sorted[i] == sorted[i - 1];
        let eq_next = i + 1 < sorted.len() && sorted[i] == sorted[i + 1];
        if !eq_prev && !eq_next {
            out.push(sorted[i]);
        }
    }
    DistVec::from_vec(a.fabric(), out)
}

/// Elements of `a` not present in `b`; ascending.
pub fn setdiff1d<T: RadixKey + PartialEq>(
    a: &DistVec<T>,
    b: &DistVec<T>,
    assume_unique: bool,
) -> DistVec<T> {
    // assume_unique skips de-duplication only; the output is still sorted.
    let ua = if assume_unique {
        radix_sort(a).0
    } else {
        unique(a)
    };
    let member = in1d(&ua, b, true);
    let kept: Vec<T> = ua
        .iter()
        .zip(member.iter())
        .filter(|(_, &keep)| keep)
        .map(|(&x, _)| x)
        .collect();
    DistVec::from_vec(a.fabric(), kept)
}

/// Membership test: element `i` of the result is true iff `a[i]` occurs
/// in `b` (negated when `invert`). Result length equals `|a|`.
pub fn in1d<T: RadixKey + PartialEq>(
    a: &DistVec<T>,
    b: &DistVec<T>,
    invert: bool,
) -> DistVec<bool> {
    let n = a.len();
    let ub = unique(b);

    // Sort a's elements together with b's distinct values; within a run of
    // equal keys, any index >= n marks a b-value, making every a-element
    // of the run a member. The sort permutation scatters the verdict back
    // to a's original positions.
    let mut keys = a.to_vec();
    keys.extend(ub.iter());
    let (sorted, perm) = radix_sort(&DistVec::from_vec(a.fabric(), keys));
    let sorted = sorted.to_vec();
    let perm = perm.to_vec();

    let mut truth = vec![invert; n];
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        if perm[i..j].iter().any(|&p| p as usize >= n) {
            for &p in &perm[i..j] {
                if (p as usize) < n {
                    truth[p as usize] = !invert;
                }
            }
        }
        i = j;
    }
    DistVec::from_vec(a.fabric(), truth)
}

fn dedup_pair<T: RadixKey + PartialEq>(
    a: &DistVec<T>,
    b: &DistVec<T>,
    assume_unique: bool,
) -> (DistVec<T>, DistVec<T>) {
    if assume_unique {
        (a.clone(), b.clone())
    } else {
        (unique(a), unique(b))
    }
}

fn sorted_concat<T: RadixKey + PartialEq>(ua: &DistVec<T>, ub: &DistVec<T>) -> Vec<T> {
    let mut both = ua.to_vec();
    both.extend(ub.iter());
    let (sorted, _) = radix_sort(&DistVec::from_vec(ua.fabric(), both));
    sorted.to_vec()
}
