//! Approximate matching of noisy title candidates against the catalog.
//!
//! Stateless, pure functions: every call scans the given corpus with
//! no retained state between calls.

/// A candidate/corpus pair that cleared the cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPair {
    /// The noisy candidate that matched.
    pub candidate: String,
    /// The corpus entry it matched.
    pub matched: String,
    /// Similarity ratio of the pair, in `[0, 1]`.
    pub ratio: f64,
}

/// Normalized similarity ratio of two strings: twice the total
/// matching-subsequence length over the combined character length.
/// `1.0` only for equal strings; two empty strings are equal.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total matched characters: the longest common run, plus the matches
/// found by repeating the search on the pieces to its left and right.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (a_start, b_start, len) = longest_common_run(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..a_start], &b[..b_start])
        + matching_chars(&a[a_start + len..], &b[b_start + len..])
}

/// Longest common contiguous run of `a` and `b` as
/// `(start_in_a, start_in_b, length)`. Ties resolve to the earliest
/// start in `a`, then in `b`.
fn longest_common_run(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                current[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        prev = current;
    }

    best
}

/// For each candidate, find its single closest corpus entry (ties go
/// to the earlier corpus entry) and keep it when the ratio reaches
/// `cutoff`; then pick, across all passing pairs, the pair whose
/// longer string is the longest overall.
///
/// Returns `None` when nothing clears the cutoff — a normal outcome,
/// not an error. A cutoff of `1.0` admits exact equality only.
///
/// The longest-pair rule favors a long, specific multi-word fragment
/// over a short coincidentally-matching token. The flip side: the
/// single longest candidate can drag in a short corpus entry it only
/// barely matches, even when another candidate matched better. Kept
/// as documented behavior.
pub fn best_match(candidates: &[String], corpus: &[String], cutoff: f64) -> Option<MatchPair> {
    let mut best: Option<MatchPair> = None;

    for candidate in candidates {
        let Some(pair) = closest_in_corpus(candidate, corpus, cutoff) else {
            continue;
        };
        let length = longer_side(&pair);
        let replaces = match &best {
            Some(current) => length > longer_side(current),
            None => true,
        };
        if replaces {
            best = Some(pair);
        }
    }

    best
}

/// Character length of the longer string in a pair.
fn longer_side(pair: &MatchPair) -> usize {
    pair.candidate.chars().count().max(pair.matched.chars().count())
}

/// The closest corpus entry for one candidate, if it reaches `cutoff`.
fn closest_in_corpus(candidate: &str, corpus: &[String], cutoff: f64) -> Option<MatchPair> {
    let mut best_ratio = 0.0f64;
    let mut best_entry: Option<&String> = None;

    for entry in corpus {
        let ratio = similarity_ratio(candidate, entry);
        if best_entry.is_none() || ratio > best_ratio {
            best_ratio = ratio;
            best_entry = Some(entry);
        }
    }

    let entry = best_entry?;
    if best_ratio >= cutoff {
        Some(MatchPair {
            candidate: candidate.to_string(),
            matched: entry.clone(),
            ratio: best_ratio,
        })
    } else {
        None
    }
}
