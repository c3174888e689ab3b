// SPDX-License-Identifier: MIT

use sumbench::Partition;

/// Asserts that `partitions` are contiguous, non-overlapping, ordered by
/// worker index and together cover exactly `[0, total_items)`.
pub fn assert_exact_cover(partitions: &[Partition], total_items: usize) {
    // The first partition starts at zero.
    let mut expected_start = 0;

    for (index, partition) in partitions.iter().enumerate() {
        assert_eq!(partition.index, index, "partition index out of order");
        assert_eq!(
            partition.start, expected_start,
            "gap or overlap before partition {}",
            index
        );
        assert!(partition.start <= partition.end);

        // Each partition must begin where the previous one ended.
        expected_start = partition.end;
    }

    assert_eq!(expected_start, total_items, "partitions do not reach the end");
}

/// Number of items each partition holds.
pub fn partition_sizes(partitions: &[Partition]) -> Vec<usize> {
    partitions.iter().map(Partition::len).collect()
}
