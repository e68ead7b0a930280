//! Small numeric helpers.

/// Adds up any number of integers. An empty slice sums to 0.
pub fn sum(nums: &[i64]) -> i64 {
    nums.iter().sum()
}
