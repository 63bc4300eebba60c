use std::collections::VecDeque;

use ca_core::grid::Symbol;

/// Une ligne de terminal : la ligne précédente en haut, la ligne courante en bas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowPair {
    pub top: Vec<Symbol>,
    pub bottom: Vec<Symbol>,
}

/// Historique borné des paires déjà dessinées, la plus récente en dernier.
///
/// # Example
/// ```
/// use ca_render::scrollback::Scrollback;
/// let mut history = Scrollback::new(2);
/// history.push(&[0, 1], &[1, 1]);
/// history.push(&[1, 0], &[0, 0]);
/// history.push(&[1, 1], &[1, 0]);
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.last(1).next().map(|p| p.top.as_slice()), Some(&[1, 1][..]));
/// ```
#[derive(Clone, Debug)]
pub struct Scrollback {
    pairs: VecDeque<RowPair>,
    capacity: usize,
}

impl Scrollback {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pairs: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a drawn pair, dropping the oldest one when full.
    pub fn push(&mut self, top: &[Symbol], bottom: &[Symbol]) {
        if self.pairs.len() == self.capacity {
            self.pairs.pop_front();
        }
        self.pairs.push_back(RowPair {
            top: top.to_vec(),
            bottom: bottom.to_vec(),
        });
    }

    /// The `n` most recent pairs, oldest first.
    pub fn last(&self, n: usize) -> impl Iterator<Item = &RowPair> {
        self.pairs.iter().skip(self.pairs.len().saturating_sub(n))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_is_never_exceeded() {
        let mut history = Scrollback::new(3);
        for i in 0..10u8 {
            history.push(&[i], &[i]);
        }
        assert_eq!(history.len(), 3);
        let tops: Vec<u8> = history.last(10).map(|p| p.top[0]).collect();
        assert_eq!(tops, vec![7, 8, 9]);
    }

    #[test]
    fn last_returns_oldest_first() {
        let mut history = Scrollback::new(8);
        for i in 0..5u8 {
            history.push(&[i], &[0]);
        }
        let tops: Vec<u8> = history.last(2).map(|p| p.top[0]).collect();
        assert_eq!(tops, vec![3, 4]);
        assert!(!history.is_empty());
    }

    #[test]
    fn zero_capacity_keeps_one_pair() {
        let mut history = Scrollback::new(0);
        history.push(&[1], &[1]);
        history.push(&[0], &[0]);
        assert_eq!(history.len(), 1);
    }
}
