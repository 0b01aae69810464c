use crate::error::ImportError;

/// Block sizes for splitting `items` across `workers`: the first
/// `items % workers` workers get one extra item.
pub fn block_sizes(items: usize, workers: usize) -> Vec<usize> {
    if workers == 0 {
        return Vec::new();
    }
    let base = items / workers;
    let remainder = items % workers;
    (0..workers)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Assigns `rows` to `advisors` in contiguous, near-equal blocks, in the
/// advisors' given order. Every row ends up with exactly one advisor.
pub fn distribute<'a, A, T>(
    advisors: &'a [A],
    rows: Vec<T>,
) -> Result<Vec<(&'a A, Vec<T>)>, ImportError> {
    if advisors.is_empty() {
        return Err(ImportError::NoActiveAdvisors);
    }

    let sizes = block_sizes(rows.len(), advisors.len());
    let mut remaining = rows.into_iter();

    Ok(advisors
        .iter()
        .zip(sizes)
        .map(|(advisor, size)| (advisor, remaining.by_ref().take(size).collect()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_rows_over_three_advisors() {
        assert_eq!(block_sizes(10, 3), vec![4, 3, 3]);
    }

    #[test]
    fn fewer_rows_than_advisors_leaves_some_empty() {
        assert_eq!(block_sizes(2, 5), vec![1, 1, 0, 0, 0]);
        assert_eq!(block_sizes(0, 2), vec![0, 0]);
    }

    #[test]
    fn blocks_are_contiguous_and_in_advisor_order() {
        let advisors = ["a@x.com", "b@x.com", "c@x.com"];
        let rows: Vec<usize> = (0..10).collect();
        let plan = distribute(&advisors, rows).unwrap();

        assert_eq!(plan[0], (&"a@x.com", vec![0, 1, 2, 3]));
        assert_eq!(plan[1], (&"b@x.com", vec![4, 5, 6]));
        assert_eq!(plan[2], (&"c@x.com", vec![7, 8, 9]));
    }

    #[test]
    fn no_advisors_is_an_error() {
        let advisors: [&str; 0] = [];
        let result = distribute(&advisors, vec![1, 2, 3]);
        assert!(matches!(result, Err(ImportError::NoActiveAdvisors)));
    }

    #[test]
    fn every_split_is_complete_and_balanced() {
        for items in 0..60 {
            for workers in 1..9 {
                let advisors: Vec<usize> = (0..workers).collect();
                let rows: Vec<usize> = (0..items).collect();
                let plan = distribute(&advisors, rows).unwrap();

                let counts: Vec<usize> = plan.iter().map(|(_, r)| r.len()).collect();
                let max = *counts.iter().max().unwrap();
                let min = *counts.iter().min().unwrap();
                assert_eq!(counts.iter().sum::<usize>(), items);
                assert!(max - min <= 1, "items={items} workers={workers}");

                let flattened: Vec<usize> = plan.into_iter().flat_map(|(_, r)| r).collect();
                assert_eq!(flattened, (0..items).collect::<Vec<_>>());
            }
        }
    }
}
