//! In-memory word frequency store
//!
//! The corpus goes through two phases with distinct types: a [`CorpusBuilder`]
//! accumulates records while the data file is being read, then
//! [`finish()`](CorpusBuilder::finish) freezes it into the read-only
//! [`WordStore`] that every query is answered from. No mutation path exists
//! after the freeze, which is also when the all-time ranking is computed.

use crate::{
    rank::{Rank, Ranking},
    Word, Year, YearCount,
};
use std::collections::{btree_map, BTreeMap, HashMap};
use thiserror::Error;

/// Per-year occurrence counts for a single word
///
/// Created the first time a word is encountered during ingestion, mutated only
/// by the ingestion path, and owned by the store for its whole lifetime.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WordRecord {
    /// Occurrence count for each year with recorded data
    years: BTreeMap<Year, YearCount>,
}
//
impl WordRecord {
    /// Register `count` occurrences for `year`
    ///
    /// A year may be recorded at most once: on a resubmission the original
    /// value is retained and the call has no effect besides the returned
    /// [`DuplicateYear`], which callers are expected to report as a warning.
    pub fn add_occurrence(&mut self, year: Year, count: YearCount) -> Result<(), DuplicateYear> {
        match self.years.entry(year) {
            btree_map::Entry::Occupied(o) => Err(DuplicateYear {
                year,
                kept: *o.get(),
                ignored: count,
            }),
            btree_map::Entry::Vacant(v) => {
                v.insert(count);
                Ok(())
            }
        }
    }

    /// Total occurrences across every recorded year
    pub fn total(&self) -> YearCount {
        self.years.values().sum()
    }

    /// Occurrences over an inclusive range of years
    ///
    /// Years without recorded data contribute 0. A degenerate single-year
    /// range amounts to a single-year lookup.
    pub fn count_in(&self, range: YearRange) -> YearCount {
        (self.years.range(range.first()..=range.last()))
            .map(|(_year, count)| count)
            .sum()
    }

    /// Recorded (year, count) pairs, in ascending year order
    pub fn years(&self) -> impl Iterator<Item = (Year, YearCount)> + '_ {
        self.years.iter().map(|(&year, &count)| (year, count))
    }
}

/// A year was submitted twice for the same word
///
/// The first recorded value wins. This is a data quality warning, not a fatal
/// condition: ingestion reports it and carries on with the rest of the file.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("year {year} already has {kept} recorded occurrences, discarding {ignored}")]
pub struct DuplicateYear {
    /// Year that was resubmitted
    pub year: Year,

    /// Count that was already recorded and remains in place
    pub kept: YearCount,

    /// Count of the rejected resubmission
    pub ignored: YearCount,
}

/// A range query was requested with its start year after its end year
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("start year {first} is after end year {last}")]
pub struct InvalidRange {
    /// Requested start year
    pub first: Year,

    /// Requested end year
    pub last: Year,
}

/// Inclusive range of years
///
/// Inverted ranges are rejected at construction, so query code only ever sees
/// valid ranges and stays total.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct YearRange {
    /// First year of the range
    first: Year,

    /// Last year of the range, no older than `first`
    last: Year,
}
//
impl YearRange {
    /// Range covering `[first, last]`, rejecting inverted bounds
    pub fn new(first: Year, last: Year) -> Result<Self, InvalidRange> {
        if first > last {
            return Err(InvalidRange { first, last });
        }
        Ok(Self { first, last })
    }

    /// Degenerate range covering a single year
    pub fn single(year: Year) -> Self {
        Self {
            first: year,
            last: year,
        }
    }

    /// First year of the range
    pub fn first(&self) -> Year {
        self.first
    }

    /// Last year of the range
    pub fn last(&self) -> Year {
        self.last
    }
}

/// Year restriction applied to a count or rank query
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Scope {
    /// Consider every year with recorded data
    AllTime,

    /// Consider an inclusive range of years only
    Years(YearRange),
}
//
impl Scope {
    /// Scope restricted to a single year
    pub fn single_year(year: Year) -> Self {
        Self::Years(YearRange::single(year))
    }

    /// Scope restricted to the years `[first, last]`, rejecting inverted bounds
    pub fn years(first: Year, last: Year) -> Result<Self, InvalidRange> {
        YearRange::new(first, last).map(Self::Years)
    }
}

/// Accumulator for the records of a word data file
///
/// Records are ingested one input line at a time. Once the whole corpus has
/// been read, call [`finish()`](Self::finish) to obtain the [`WordStore`] that
/// queries are answered from.
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    /// Distinct normalized words, in first-encounter order
    words: Vec<Word>,

    /// Word -> slot in `words` and `records`
    index: HashMap<Word, usize>,

    /// Per-word yearly records, one slot per word in `words`
    records: Vec<WordRecord>,

    /// Number of ingested records, duplicates included
    ingested: u64,
}
//
impl CorpusBuilder {
    /// Set up the accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one (word, year, count) record
    ///
    /// The word is normalized to lower case and registered on first encounter.
    /// Resubmitting a year that the word already has data for leaves the first
    /// value in place and forwards the [`DuplicateYear`] for the caller to
    /// report; the record counter advances either way.
    pub fn ingest(&mut self, word: &str, year: Year, count: YearCount) -> Result<(), DuplicateYear> {
        self.ingested += 1;
        let word = word.to_lowercase();
        let slot = match self.index.get(word.as_str()) {
            Some(&slot) => slot,
            None => {
                let slot = self.words.len();
                let word = Word::from(word);
                self.words.push(word.clone());
                self.index.insert(word, slot);
                self.records.push(WordRecord::default());
                slot
            }
        };
        self.records[slot].add_occurrence(year, count)
    }

    /// Freeze the corpus into its queryable form
    ///
    /// This is where the all-time ranking is computed. It is computed exactly
    /// once: the store is read-only, so the ranking can never go stale.
    pub fn finish(self) -> WordStore {
        let Self {
            words,
            index,
            records,
            ingested,
        } = self;
        let overall = Ranking::from_scores(records.iter().map(WordRecord::total).collect());
        WordStore {
            words,
            index,
            records,
            ingested,
            overall,
        }
    }
}

/// Full mapping from normalized word to its yearly occurrence records
///
/// Built once per corpus load and read-only afterwards: queries can be
/// repeated in any order and always observe the same corpus.
#[derive(Debug)]
pub struct WordStore {
    /// Distinct normalized words, in first-encounter order
    words: Vec<Word>,

    /// Word -> slot in `words` and `records`
    index: HashMap<Word, usize>,

    /// Per-word yearly records, one slot per word in `words`
    records: Vec<WordRecord>,

    /// Number of ingested records, duplicates included
    ingested: u64,

    /// Cached ranking of all words by descending all-time occurrence count
    overall: Ranking,
}
//
impl WordStore {
    /// Number of ingested records, counting duplicates as separate records
    ///
    /// This is the corpus size statistic: distinct both from the number of
    /// distinct words and from the sum of occurrence counts.
    pub fn total_words(&self) -> u64 {
        self.ingested
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Truth that no record was ingested
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Distinct normalized words, in the order they were first encountered
    ///
    /// This order is what breaks frequency ties in rankings, so it is exposed
    /// as the one canonical word enumeration.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|word| &**word)
    }

    /// Word stored at a given slot of the first-encounter order
    pub(crate) fn word(&self, slot: usize) -> &str {
        &self.words[slot]
    }

    /// Slot of a word in the first-encounter order, if the word is known
    pub(crate) fn slot_of(&self, word: &str) -> Option<usize> {
        self.index.get(word.to_lowercase().as_str()).copied()
    }

    /// Per-word record at a given slot
    pub(crate) fn record(&self, slot: usize) -> &WordRecord {
        &self.records[slot]
    }

    /// Number of occurrences of a word within a scope
    ///
    /// An unknown word is not an error: absence of evidence is zero
    /// occurrence.
    pub fn count_for(&self, word: &str, scope: Scope) -> YearCount {
        let Some(slot) = self.slot_of(word) else {
            return 0;
        };
        let record = &self.records[slot];
        match scope {
            Scope::AllTime => record.total(),
            Scope::Years(range) => record.count_in(range),
        }
    }

    /// Frequency rank of a word within a scope
    ///
    /// Rank 1 is the most frequent word of the scope. A word that is unknown,
    /// or has no occurrence within the scope, has no rank there. The all-time
    /// scope is answered from the cached ranking; year-restricted scopes are
    /// ranked on demand since caching every possible range is unbounded.
    pub fn rank_for(&self, word: &str, scope: Scope) -> Option<Rank> {
        let slot = self.slot_of(word)?;
        match scope {
            Scope::AllTime => self.overall.rank_of(slot),
            scoped => Ranking::over(scoped, self).rank_of(slot),
        }
    }

    /// Cached ranking of all words by descending all-time occurrence count
    pub fn overall_ranking(&self) -> &Ranking {
        &self.overall
    }

    /// Every recorded (word, year, count) triple, for diagnostics
    ///
    /// Words come in first-encounter order with years ascending within each
    /// word, so the enumeration is deterministic for a given corpus.
    pub fn dump_all(&self) -> impl Iterator<Item = (&str, Year, YearCount)> {
        (self.words().zip(&self.records)).flat_map(|(word, record)| {
            (record.years()).map(move |(year, count)| (word, year, count))
        })
    }
}
