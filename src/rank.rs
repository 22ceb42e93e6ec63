//! Ranking of words by decreasing occurrence frequency
//!
//! A ranking is derived from a score table built over every known word for
//! one query scope. The all-time ranking is computed once when the corpus is
//! frozen and cached inside the store; year-restricted rankings are computed
//! on demand per query, as caching every possible year range is unbounded.

use crate::{
    store::{Scope, WordStore},
    YearCount,
};
use rayon::prelude::*;
use std::{cmp::Reverse, num::NonZeroUsize};

/// 1-based frequency rank; rank 1 is the most frequent word
pub type Rank = NonZeroUsize;

/// All words of a corpus, ordered by decreasing frequency within one scope
///
/// Words with zero frequency in the scope have no rank there: the ranked
/// words are a permutation of the nonzero-frequency word subset, so every
/// rank from 1 to [`len()`](Self::len) is used exactly once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ranking {
    /// Rank of each word slot; None for words unranked in this scope
    ranks: Box<[Option<Rank>]>,

    /// Word slots and their scoped counts, in increasing rank order
    by_rank: Box<[(usize, YearCount)]>,
}
//
impl Ranking {
    /// Rank every known word by its frequency within `scope`
    pub fn over(scope: Scope, store: &WordStore) -> Self {
        let scores = (0..store.len())
            .map(|slot| {
                let record = store.record(slot);
                match scope {
                    Scope::AllTime => record.total(),
                    Scope::Years(range) => record.count_in(range),
                }
            })
            .collect();
        Self::from_scores(scores)
    }

    /// Rank word slots given their frequency score in the scope of interest
    ///
    /// Zero-score slots are left unranked. Slots arrive in first-encounter
    /// order and the sort is stable, so equally frequent words keep their
    /// first-encounter order relative to each other.
    pub(crate) fn from_scores(scores: Vec<YearCount>) -> Self {
        let num_slots = scores.len();
        let mut by_rank = (scores.into_iter().enumerate())
            .filter(|&(_slot, score)| score > 0)
            .collect::<Vec<_>>();
        by_rank.par_sort_by_key(|&(_slot, score)| Reverse(score));
        let mut ranks = vec![None; num_slots].into_boxed_slice();
        for (position, &(slot, _score)) in by_rank.iter().enumerate() {
            ranks[slot] = Some(Rank::new(position + 1).expect("ranks start at 1"));
        }
        Self {
            ranks,
            by_rank: by_rank.into(),
        }
    }

    /// Rank of a word slot, if the word is ranked in this scope
    pub fn rank_of(&self, slot: usize) -> Option<Rank> {
        self.ranks[slot]
    }

    /// Number of ranked words
    pub fn len(&self) -> usize {
        self.by_rank.len()
    }

    /// Truth that no word is ranked in this scope
    pub fn is_empty(&self) -> bool {
        self.by_rank.is_empty()
    }

    /// Ranked words, in increasing rank order
    pub fn iter(&self) -> impl Iterator<Item = RankedWord> + '_ {
        (self.by_rank.iter().enumerate()).map(|(position, &(slot, count))| RankedWord {
            rank: Rank::new(position + 1).expect("ranks start at 1"),
            slot,
            count,
        })
    }
}

/// One ranked word, as enumerated by [`Ranking::iter()`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RankedWord {
    /// 1-based rank within the scope
    pub rank: Rank,

    /// Word slot in the store's first-encounter order
    pub slot: usize,

    /// Occurrence count within the scope
    pub count: YearCount,
}
