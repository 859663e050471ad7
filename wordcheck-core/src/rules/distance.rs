//! Bounded Damerau–Levenshtein distance (optimal string alignment).
//!
//! Distances above the cap are never computed exactly: the result is then
//! `max_dist + 1`, and callers must only compare it against the cap.

/// Edit distance between `a` and `b` if it is at most `max_dist`, otherwise a
/// value greater than `max_dist`.
pub fn distance(a: &str, b: &str, max_dist: usize) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    distance_chars(&a, &b, max_dist)
}

/// Same as [`distance`] over pre-split characters, so callers scanning many
/// tokens against one target can split the target once.
pub fn distance_chars(a: &[char], b: &[char], max_dist: usize) -> usize {
    let over = max_dist.saturating_add(1);
    let (la, lb) = (a.len(), b.len());

    if la.abs_diff(lb) > max_dist {
        return over;
    }
    if la == 0 || lb == 0 {
        return la.max(lb);
    }

    // Three rolling rows: i-2, i-1 and i.
    let mut two_ago = vec![0usize; lb + 1];
    let mut prev: Vec<usize> = (0..=lb).collect();
    let mut curr = vec![0usize; lb + 1];

    for i in 1..=la {
        curr[0] = i;
        let mut row_min = curr[0];

        for j in 1..=lb {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut value = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);

            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                value = value.min(two_ago[j - 2] + 1);
            }

            curr[j] = value;
            row_min = row_min.min(value);
        }

        // Row minima never decrease, so nothing below can come back under the cap.
        if row_min > max_dist {
            return over;
        }

        std::mem::swap(&mut two_ago, &mut prev);
        std::mem::swap(&mut prev, &mut curr);
    }

    let result = prev[lb];
    if result > max_dist {
        over
    } else {
        result
    }
}
