use std::collections::HashMap;

/// Similarity ratio between two strings in [0, 1].
///
/// Computed as `2 * M / T` over characters, where `M` is the combined
/// length of the matching blocks (the longest common block, then
/// recursively the pieces to its left and right) and `T` is the total
/// length of both inputs. Two empty strings count as identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_len(&a, &b);
    2.0 * matched as f64 / total as f64
}

fn matching_len(a: &[char], b: &[char]) -> usize {
    let (ai, bi, len) = longest_match(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_len(&a[..ai], &b[..bi]) + matching_len(&a[ai + len..], &b[bi + len..])
}

/// Longest common contiguous block between `a` and `b`.
///
/// Returns (start in a, start in b, length); earliest in `a` wins ties.
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        b_positions.entry(c).or_default().push(j);
    }

    let mut best = (0usize, 0usize, 0usize);
    // run_lengths[j] = length of the common block ending at a[i-1], b[j]
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();
    for (i, c) in a.iter().enumerate() {
        let mut next_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b_positions.get(c) {
            for &j in positions {
                let len = if j == 0 {
                    1
                } else {
                    run_lengths.get(&(j - 1)).copied().unwrap_or(0) + 1
                };
                next_runs.insert(j, len);
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        run_lengths = next_runs;
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings() {
        assert_eq!(similarity_ratio("hello", "hello"), 1.0);
        assert_eq!(
            similarity_ratio(
                "คุณรู้สึกว่าโรงพยาบาลทำงานโปร่งใสพอหรือไม่",
                "คุณรู้สึกว่าโรงพยาบาลทำงานโปร่งใสพอหรือไม่"
            ),
            1.0
        );
    }

    #[test]
    fn test_both_empty() {
        assert_eq!(similarity_ratio("", ""), 1.0);
    }

    #[test]
    fn test_one_empty() {
        assert_eq!(similarity_ratio("abc", ""), 0.0);
    }

    #[test]
    fn test_disjoint_strings() {
        assert_eq!(similarity_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // matching block "bcd" of length 3, total length 8
        let ratio = similarity_ratio("abcd", "bcde");
        assert!((ratio - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_recursive_blocks() {
        // "ab" and "ef" both match around the mismatch in the middle
        let ratio = similarity_ratio("abxef", "abyef");
        assert!((ratio - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_symmetric_range() {
        let pairs = [("วันนี้", "วันนี้ท่าน"), ("abc", "abd"), ("ไหม", "หรือไม่")];
        for (a, b) in pairs {
            let forward = similarity_ratio(a, b);
            let backward = similarity_ratio(b, a);
            assert!((0.0..=1.0).contains(&forward));
            assert!((forward - backward).abs() < 1e-9);
        }
    }
}
