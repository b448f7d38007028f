/// Levenshtein distance with unit insertion, deletion and substitution costs,
/// computed over chars with a single rolling row.
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diag + cost);
            diag = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

/// Distance from a fixed target to a produced text that grows and shrinks at
/// its end.
///
/// Keeps one DP column per produced character, so appending a character costs
/// O(len(target)) and deleting one is a truncation. Any edit that changes an
/// earlier character falls back to recomputing from the first difference.
#[derive(Clone, Debug)]
pub struct PrefixDistance {
    target: Vec<char>,
    produced: Vec<char>,
    // columns[k][i] = distance(target[..i], produced[..k])
    columns: Vec<Vec<usize>>,
}

impl PrefixDistance {
    pub fn new(target: &str) -> Self {
        let target: Vec<char> = target.chars().collect();
        let first = (0..=target.len()).collect();
        Self {
            target,
            produced: Vec::new(),
            columns: vec![first],
        }
    }

    pub fn distance_to(&mut self, produced: &str) -> usize {
        let next: Vec<char> = produced.chars().collect();
        let shared = self
            .produced
            .iter()
            .zip(&next)
            .take_while(|(a, b)| a == b)
            .count();

        self.produced.truncate(shared);
        self.columns.truncate(shared + 1);

        for &ch in &next[shared..] {
            let column = self.extend_column(ch);
            self.columns.push(column);
            self.produced.push(ch);
        }

        self.columns
            .last()
            .and_then(|col| col.last())
            .copied()
            .unwrap_or(0)
    }

    fn extend_column(&self, ch: char) -> Vec<usize> {
        let prev = &self.columns[self.columns.len() - 1];
        let mut column = Vec::with_capacity(self.target.len() + 1);
        column.push(prev[0] + 1);
        for (i, &t) in self.target.iter().enumerate() {
            let cost = usize::from(t != ch);
            let value = (prev[i + 1] + 1).min(column[i] + 1).min(prev[i] + cost);
            column.push(value);
        }
        column
    }
}
