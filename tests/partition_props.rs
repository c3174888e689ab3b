// SPDX-License-Identifier: MIT

use proptest::prelude::*;
use sumbench::strategies::{CopiedChunks, PooledSharedArray, SharedArray, SharedList};
use sumbench::{Dataset, Partitioner, SumStrategy};
use test_utils::partitions::{assert_exact_cover, partition_sizes};

#[test]
fn test_five_items_two_workers() {
    let partitions: Vec<_> = Partitioner::new(5, 2).unwrap().collect();

    assert_exact_cover(&partitions, 5);
    assert_eq!(partition_sizes(&partitions), vec![2, 3]);
}

proptest! {
    #[test]
    fn partitions_cover_range_exactly(
        total_items in 0usize..100_000,
        workers in 1usize..64,
    ) {
        let partitions: Vec<_> =
            Partitioner::new(total_items, workers).unwrap().collect();

        prop_assert_eq!(partitions.len(), workers);
        assert_exact_cover(&partitions, total_items);
    }

    #[test]
    fn remainder_routes_to_last_partition(
        total_items in 0usize..100_000,
        workers in 1usize..64,
    ) {
        let sizes = partition_sizes(
            &Partitioner::new(total_items, workers).unwrap().collect::<Vec<_>>(),
        );
        let base = total_items / workers;

        prop_assert!(sizes[..workers - 1].iter().all(|&size| size == base));
        prop_assert_eq!(sizes[workers - 1], base + total_items % workers);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn concurrent_strategies_match_reference(
        values in prop::collection::vec(0u32..10, 0..5_000),
        workers in 1usize..12,
    ) {
        let dataset = Dataset::from_values(values).unwrap();
        let pooled = PooledSharedArray::new(3);
        let strategies: [&dyn SumStrategy; 4] =
            [&CopiedChunks, &SharedList, &SharedArray, &pooled];

        for strategy in strategies {
            prop_assert_eq!(
                strategy.total(&dataset, workers).unwrap(),
                dataset.reference_total()
            );
        }
    }
}
