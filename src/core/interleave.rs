/// Preference positions after which a discovery item is inserted: 2, 6, 10, ...
const DISCOVERY_STRIDE: usize = 4;
const DISCOVERY_OFFSET: usize = 2;

/// Blend preference and discovery results into one ranking
///
/// Keeps the preference order intact and slots the next discovery item in
/// right after every preference index `i` with `i % 4 == 2`. Discovery items
/// left over once the preference list runs out are appended.
pub fn interleave<T>(preference: Vec<T>, discovery: Vec<T>) -> Vec<T> {
    let mut result = Vec::with_capacity(preference.len() + discovery.len());
    let mut discovery = discovery.into_iter();

    for (i, item) in preference.into_iter().enumerate() {
        result.push(item);
        if i % DISCOVERY_STRIDE == DISCOVERY_OFFSET {
            if let Some(next) = discovery.next() {
                result.push(next);
            }
        }
    }

    result.extend(discovery);
    result
}

/// Preference and discovery slots for a requested limit (80/20 split)
///
/// Preference gets `ceil(limit * 0.8)`, discovery gets `floor(limit * 0.2)`.
pub fn split_quota(limit: usize) -> (usize, usize) {
    ((limit * 4).div_ceil(5), limit / 5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(prefix: &str, n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect()
    }

    #[test]
    fn test_eight_plus_two() {
        let result = interleave(labels("P", 8), labels("D", 2));
        assert_eq!(
            result,
            vec!["P0", "P1", "P2", "D0", "P3", "P4", "P5", "D1", "P6", "P7"]
        );
    }

    #[test]
    fn test_leftover_discovery_appended() {
        let result = interleave(labels("P", 2), labels("D", 2));
        assert_eq!(result, vec!["P0", "P1", "D0", "D1"]);
    }

    #[test]
    fn test_no_discovery() {
        let result = interleave(labels("P", 5), Vec::new());
        assert_eq!(result, labels("P", 5));
    }

    #[test]
    fn test_only_discovery() {
        let result = interleave(Vec::new(), labels("D", 3));
        assert_eq!(result, labels("D", 3));
    }

    #[test]
    fn test_split_quota() {
        assert_eq!(split_quota(10), (8, 2));
        assert_eq!(split_quota(15), (12, 3));
        assert_eq!(split_quota(4), (4, 0));
        assert_eq!(split_quota(1), (1, 0));
    }
}
