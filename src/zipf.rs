//! Zipf's Law goodness of fit
//!
//! Zipf's Law predicts that rank × frequency is roughly constant across the
//! words of a natural language corpus. Equivalently, for every word,
//! `ln(rank) + ln(count / count₁)` should be close to zero, where `count₁` is
//! the count of the most frequent word. The mean and standard deviation of
//! these per-word residuals over the whole corpus measure how well the loaded
//! data follows the law.

use crate::{
    rank::Rank,
    store::WordStore,
    YearCount,
};

/// Zipf's Law fit over the all-time ranking of a corpus
#[derive(Clone, Debug)]
pub struct ZipfFit<'store> {
    /// Corpus that was measured
    store: &'store WordStore,

    /// Per-word residuals `ln(rank) + ln(count/count₁)`, in rank order
    residuals: Box<[f64]>,

    /// Mean of the residuals
    mean: f64,

    /// Sample standard deviation of the residuals
    std_dev: f64,
}
//
impl<'store> ZipfFit<'store> {
    /// Measure the fit over a corpus
    ///
    /// There is no fit to measure when not a single word is ranked, i.e. when
    /// the corpus is empty or records zero occurrences everywhere.
    pub fn measure(store: &'store WordStore) -> Option<Self> {
        let ranking = store.overall_ranking();
        if ranking.is_empty() {
            return None;
        }
        let num_ranked = ranking.len();
        let top_count = (ranking.iter().next())
            .expect("a nonempty ranking has a top word")
            .count as f64;
        let residuals = (ranking.iter())
            .map(|ranked| {
                (ranked.rank.get() as f64).ln() + (ranked.count as f64 / top_count).ln()
            })
            .collect::<Box<[f64]>>();
        let mean = residuals.iter().sum::<f64>() / num_ranked as f64;
        // The n-1 denominator is undefined for a single ranked word; a lone
        // point deviates from itself by 0
        let std_dev = if num_ranked < 2 {
            0.0
        } else {
            ((residuals.iter()).map(|residual| (residual - mean).powi(2)).sum::<f64>()
                / (num_ranked - 1) as f64)
                .sqrt()
        };
        Some(Self {
            store,
            residuals,
            mean,
            std_dev,
        })
    }

    /// Mean of the per-word residuals (0 for a perfect fit)
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample standard deviation of the per-word residuals
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Number of ranked words that went into the fit
    pub fn ranked_words(&self) -> usize {
        self.residuals.len()
    }

    /// Per-rank data points, in increasing rank order
    ///
    /// These are the log-log values one would plot to eyeball the law.
    pub fn points(&self) -> impl Iterator<Item = ZipfPoint<'store>> + '_ {
        let ranking = self.store.overall_ranking();
        (ranking.iter().zip(&self.residuals[..])).map(|(ranked, &residual)| {
            let log_rank = (ranked.rank.get() as f64).ln();
            ZipfPoint {
                word: self.store.word(ranked.slot),
                rank: ranked.rank,
                count: ranked.count,
                log_rank,
                log_freq_ratio: residual - log_rank,
            }
        })
    }
}

/// One plottable point of a [`ZipfFit`]
#[derive(Clone, Copy, Debug)]
pub struct ZipfPoint<'store> {
    /// Ranked word
    pub word: &'store str,

    /// 1-based all-time rank of the word
    pub rank: Rank,

    /// All-time occurrence count of the word
    pub count: YearCount,

    /// Natural log of the rank
    pub log_rank: f64,

    /// Natural log of the count over the rank-1 count
    pub log_freq_ratio: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CorpusBuilder;
    use crate::{Year, YearCount as Count};

    fn store(records: &[(&str, Year, Count)]) -> WordStore {
        let mut builder = CorpusBuilder::new();
        for &(word, year, count) in records {
            let _ = builder.ingest(word, year, count);
        }
        builder.finish()
    }

    #[test]
    fn perfect_zipf_corpus_fits_exactly() {
        // Counts follow count₁/rank exactly, so every residual is ~0
        let store = store(&[
            ("the", 1900, 1200),
            ("and", 1900, 600),
            ("for", 1900, 400),
            ("was", 1900, 300),
        ]);
        let fit = ZipfFit::measure(&store).expect("four ranked words to fit");
        assert_eq!(fit.ranked_words(), 4);
        assert!(fit.mean().abs() < 1e-12);
        assert!(fit.std_dev().abs() < 1e-12);
    }

    #[test]
    fn empty_corpus_has_no_fit() {
        assert!(ZipfFit::measure(&store(&[])).is_none());
        // All-zero counts leave nothing ranked either
        assert!(ZipfFit::measure(&store(&[("ghost", 1900, 0)])).is_none());
    }

    #[test]
    fn single_word_fit_is_degenerate() {
        let store = store(&[("the", 1900, 42)]);
        let fit = ZipfFit::measure(&store).expect("one ranked word");
        assert_eq!(fit.ranked_words(), 1);
        assert_eq!(fit.mean(), 0.0);
        assert_eq!(fit.std_dev(), 0.0);
    }

    #[test]
    fn points_align_with_the_overall_ranking() {
        let store = store(&[
            ("the", 1900, 100),
            ("cat", 1900, 10),
            ("the", 1901, 50),
            ("dog", 1901, 40),
        ]);
        let fit = ZipfFit::measure(&store).expect("three ranked words");
        let points = fit.points().collect::<Vec<_>>();
        assert_eq!(points.len(), 3);
        assert_eq!(
            (points[0].word, points[0].rank.get(), points[0].count),
            ("the", 1, 150)
        );
        assert_eq!(points[0].log_rank, 0.0);
        assert_eq!(points[0].log_freq_ratio, 0.0);
        assert_eq!((points[1].word, points[1].count), ("dog", 40));
        assert_eq!((points[2].word, points[2].count), ("cat", 10));
        // Less frequent words plot below the top word
        assert!(points[1].log_freq_ratio < 0.0);
        assert!(points[2].log_freq_ratio < points[1].log_freq_ratio);
    }
}
