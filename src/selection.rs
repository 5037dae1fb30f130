// Picks which loaded image the next stamp uses.

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SelectionPolicy {
    /// 0, 1, ..., len-1, 0, ...
    Sequential,
    /// Uniform pick, never the same image twice in a row
    Random,
}

/// The selection cursor: index of the image the next insertion will use.
pub struct Selector {
    index: usize,
    policy: SelectionPolicy,
    rng: StdRng,
}

impl Selector {
    pub fn new(policy: SelectionPolicy, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { index: 0, policy, rng }
    }

    pub fn current(&self) -> usize {
        self.index
    }

    /// Move past the image that was just used, for a list of `len` images.
    pub fn advance(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.index = match self.policy {
            SelectionPolicy::Sequential => (self.index + 1) % len,
            // a single image can only repeat
            SelectionPolicy::Random if len < 2 => 0,
            SelectionPolicy::Random => loop {
                let next = self.rng.gen_range(0..len);
                if next != self.index {
                    break next;
                }
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_cycles_without_skips() {
        let mut sel = Selector::new(SelectionPolicy::Sequential, None);
        let seen: Vec<usize> = (0..9)
            .map(|_| {
                let i = sel.current();
                sel.advance(4);
                i
            })
            .collect();
        assert_eq!(seen, vec![0, 1, 2, 3, 0, 1, 2, 3, 0]);
    }

    #[test]
    fn test_sequential_single_image() {
        let mut sel = Selector::new(SelectionPolicy::Sequential, None);
        for _ in 0..5 {
            sel.advance(1);
            assert_eq!(sel.current(), 0);
        }
    }

    #[test]
    fn test_random_never_repeats_back_to_back() {
        for len in 2..8 {
            let mut sel = Selector::new(SelectionPolicy::Random, Some(len as u64));
            let mut prev = sel.current();
            for _ in 0..500 {
                sel.advance(len);
                let next = sel.current();
                assert_ne!(prev, next);
                assert!(next < len);
                prev = next;
            }
        }
    }

    #[test]
    fn test_random_reaches_every_index() {
        let mut sel = Selector::new(SelectionPolicy::Random, Some(7));
        let mut hits = [false; 4];
        for _ in 0..200 {
            sel.advance(4);
            hits[sel.current()] = true;
        }
        assert!(hits.iter().all(|&h| h));
    }

    #[test]
    fn test_random_single_image_does_not_spin() {
        let mut sel = Selector::new(SelectionPolicy::Random, Some(1));
        sel.advance(1);
        assert_eq!(sel.current(), 0);
    }

    #[test]
    fn test_advance_on_empty_list_is_noop() {
        let mut sel = Selector::new(SelectionPolicy::Sequential, None);
        sel.advance(0);
        assert_eq!(sel.current(), 0);
    }
}
