//! Property tests for the multiset algorithms.
//!
//! These verify the algebraic laws the algorithms must satisfy for
//! arbitrary integer inputs: sortedness and de-duplication of outputs,
//! the inclusion-exclusion cardinality law, the symmetric-difference
//! decomposition, and the membership round-trip.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;

use shoal_array::{DistVec, Fabric};
use shoal_engine::setops::{in1d, intersect1d, setdiff1d, setxor1d, union1d, unique};

fn fabric() -> Arc<Fabric> {
    Arc::new(Fabric::with_physical_memory(4, 1 << 30))
}

fn dv(f: &Arc<Fabric>, data: &[i64]) -> DistVec<i64> {
    DistVec::from_vec(f, data.to_vec())
}

fn is_sorted_strict(v: &[i64]) -> bool {
    v.windows(2).all(|w| w[0] < w[1])
}

fn small_arrays() -> impl Strategy<Value = (Vec<i64>, Vec<i64>)> {
    let elem = -20i64..20;
    (
        prop::collection::vec(elem.clone(), 0..60),
        prop::collection::vec(elem, 0..60),
    )
}

proptest! {
    #[test]
    fn intersect_and_union_are_sorted_and_deduplicated((a, b) in small_arrays()) {
        let f = fabric();
        let inter = intersect1d(&dv(&f, &a), &dv(&f, &b), false).to_vec();
        let uni = union1d(&dv(&f, &a), &dv(&f, &b)).to_vec();
        prop_assert!(is_sorted_strict(&inter));
        prop_assert!(is_sorted_strict(&uni));
    }

    #[test]
    fn intersect_and_union_match_reference_sets((a, b) in small_arrays()) {
        let f = fabric();
        let sa: HashSet<i64> = a.iter().copied().collect();
        let sb: HashSet<i64> = b.iter().copied().collect();

        let inter: HashSet<i64> =
            intersect1d(&dv(&f, &a), &dv(&f, &b), false).to_vec().into_iter().collect();
        prop_assert_eq!(&inter, &sa.intersection(&sb).copied().collect::<HashSet<_>>());

        let uni: HashSet<i64> =
            union1d(&dv(&f, &a), &dv(&f, &b)).to_vec().into_iter().collect();
        prop_assert_eq!(&uni, &sa.union(&sb).copied().collect::<HashSet<_>>());
    }

    #[test]
    fn inclusion_exclusion_on_deduplicated_inputs((a, b) in small_arrays()) {
        let f = fabric();
        let ua = unique(&dv(&f, &a));
        let ub = unique(&dv(&f, &b));
        let inter = intersect1d(&ua, &ub, true);
        let uni = union1d(&ua, &ub);
        prop_assert_eq!(uni.len(), ua.len() + ub.len() - inter.len());
    }

    #[test]
    fn xor_decomposes_into_differences((a, b) in small_arrays()) {
        let f = fabric();
        let a = dv(&f, &a);
        let b = dv(&f, &b);
        let xor = setxor1d(&a, &b, false).to_vec();
        let recomposed = union1d(&setdiff1d(&a, &b, false), &setdiff1d(&b, &a, false)).to_vec();
        prop_assert_eq!(xor, recomposed);
    }

    #[test]
    fn membership_round_trip((a, b) in small_arrays()) {
        let f = fabric();
        let sb: HashSet<i64> = b.iter().copied().collect();
        let member = in1d(&dv(&f, &a), &dv(&f, &b), false).to_vec();
        prop_assert_eq!(member.len(), a.len());
        for (i, &x) in a.iter().enumerate() {
            prop_assert_eq!(member[i], sb.contains(&x));
        }
    }

    #[test]
    fn inverted_membership_is_elementwise_complement((a, b) in small_arrays()) {
        let f = fabric();
        let member = in1d(&dv(&f, &a), &dv(&f, &b), false).to_vec();
        let inverted = in1d(&dv(&f, &a), &dv(&f, &b), true).to_vec();
        for (m, inv) in member.iter().zip(inverted.iter()) {
            prop_assert_eq!(*m, !*inv);
        }
    }

    #[test]
    fn difference_never_contains_b_elements((a, b) in small_arrays()) {
        let f = fabric();
        let sb: HashSet<i64> = b.iter().copied().collect();
        let diff = setdiff1d(&dv(&f, &a), &dv(&f, &b), false).to_vec();
        prop_assert!(is_sorted_strict(&diff));
        prop_assert!(diff.iter().all(|x| !sb.contains(x)));
    }
}
