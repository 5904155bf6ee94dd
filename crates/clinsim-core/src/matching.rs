//! Text normalization and fuzzy phrase matching.
//!
//! These are the pure heuristics the turn evaluator uses to detect
//! diagnosis and treatment mentions in operator messages. All functions
//! are deterministic and stateless.

/// Minimum character-level similarity ratio for two tokens to be
/// considered the same word (tolerates small typos).
const TOKEN_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Splits text into lowercase alphanumeric tokens.
///
/// Every non-alphanumeric character acts as a separator; empty input
/// yields an empty vector.
pub fn normalize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Length of the longest common subsequence of two char slices.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
        cur.fill(0);
    }
    prev[b.len()]
}

/// Returns true if two tokens are identical or their LCS-based
/// similarity ratio `2*lcs / (|a| + |b|)` is at least 0.8.
pub fn token_similar(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    if a.is_empty() || b.is_empty() {
        return false;
    }
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let ratio =
        2.0 * lcs_len(&a_chars, &b_chars) as f64 / (a_chars.len() + b_chars.len()) as f64;
    ratio >= TOKEN_SIMILARITY_THRESHOLD
}

/// Checks whether enough tokens of `phrase` appear (exactly or fuzzily)
/// in `text`.
///
/// A phrase token counts as a hit if some text token equals it or is
/// `token_similar` to it. Returns true iff the number of distinct phrase
/// tokens hit is at least `max(1, min(min_tokens, phrase_token_count))`.
pub fn phrase_hit(text: &str, phrase: &str, min_tokens: usize) -> bool {
    let text_tokens = normalize(text);
    let phrase_tokens = normalize(phrase);
    if phrase_tokens.is_empty() || text_tokens.is_empty() {
        return false;
    }
    let needed = 1.max(min_tokens.min(phrase_tokens.len()));

    let mut hits = 0;
    for pt in &phrase_tokens {
        if text_tokens.iter().any(|tt| tt == pt || token_similar(tt, pt)) {
            hits += 1;
            if hits >= needed {
                return true;
            }
        }
    }
    false
}

/// Returns true if any candidate phrase satisfies `phrase_hit` with
/// `min_tokens = min_overlap`.
pub fn token_overlap_match<S: AsRef<str>>(
    text: &str,
    candidates: &[S],
    min_overlap: usize,
) -> bool {
    candidates
        .iter()
        .any(|c| phrase_hit(text, c.as_ref(), min_overlap))
}

/// Counts how many of `keywords` are mentioned in `text` (single-token
/// overlap per keyword). Never exceeds the number of keywords supplied.
pub fn count_keyword_hits<S: AsRef<str>>(text: &str, keywords: &[S]) -> usize {
    keywords
        .iter()
        .filter(|kw| phrase_hit(text, kw.as_ref(), 1))
        .count()
}
