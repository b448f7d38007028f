use crate::engine::frequency::FrequencyModel;

pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DEFAULT_STARTERS: [char; 6] = ['t', 'a', 's', 'i', 'o', 'h'];
pub const DEFAULT_UNIGRAM_ORDER: &str = "etaoinshrdlcumwfgypbvkjxqz";
pub const DEFAULT_CANDIDATE_COUNT: usize = 6;
pub const DEFAULT_UNIGRAM_WEIGHT: f64 = 0.1;

const SPACE_TRIGGERS: [char; 6] = ['.', ',', '!', '?', ';', ':'];

fn is_letter(ch: char) -> bool {
    ch.is_ascii_lowercase()
}

/// Letters and sentence punctuation make a word break a plausible next entry.
fn allows_space(prev: char) -> bool {
    is_letter(prev) || SPACE_TRIGGERS.contains(&prev)
}

/// Ranks candidate next characters from digram/unigram statistics.
///
/// Ranking decides which letters are offered; the returned letters are always
/// in alphabetical order so ring positions stay stable between predictions.
/// When space is offered it occupies the first slot. After a space it is only
/// offered while the context has no statistics, ahead of the starter letters.
#[derive(Clone, Debug)]
pub struct CandidateRanker {
    pub count: usize,
    pub unigram_weight: f64,
}

impl Default for CandidateRanker {
    fn default() -> Self {
        Self {
            count: DEFAULT_CANDIDATE_COUNT,
            unigram_weight: DEFAULT_UNIGRAM_WEIGHT,
        }
    }
}

impl CandidateRanker {
    pub fn new(count: usize, unigram_weight: f64) -> Self {
        Self {
            count: count.max(1),
            unigram_weight,
        }
    }

    pub fn rank(&self, model: &FrequencyModel, prev: char) -> Vec<char> {
        let prev = prev.to_ascii_lowercase();
        let k = self.count.max(1);

        let scored: Vec<(char, f64)> = ALPHABET
            .chars()
            .map(|c| {
                let score = model.digram(prev, c) as f64
                    + self.unigram_weight * model.unigram(c) as f64;
                (c, score)
            })
            .collect();
        let untrained = scored.iter().all(|&(_, s)| s == 0.0);

        let space = k > 1 && (allows_space(prev) || (untrained && prev == ' '));
        let take = if space { k - 1 } else { k };

        let mut letters: Vec<char> = if untrained {
            fallback_letters(prev, take)
        } else {
            let mut ranked = scored;
            // Stable sort keeps alphabet order among equal scores.
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            let mut top: Vec<char> = ranked.into_iter().take(take).map(|(c, _)| c).collect();
            if is_letter(prev) && !top.contains(&prev) {
                top.insert(0, prev);
                top.truncate(take);
            }
            top
        };

        letters.sort_unstable();
        letters.dedup();

        let mut out = Vec::with_capacity(letters.len() + 1);
        if space {
            out.push(' ');
        }
        out.extend(letters);
        out
    }
}

/// Static order used before any statistics exist for the context.
fn fallback_letters(prev: char, take: usize) -> Vec<char> {
    if prev == ' ' {
        return DEFAULT_STARTERS.iter().copied().take(take).collect();
    }
    let mut base: Vec<char> = DEFAULT_UNIGRAM_ORDER.chars().collect();
    if is_letter(prev) {
        base.retain(|&c| c != prev);
        base.insert(0, prev);
    }
    base.truncate(take);
    base
}
