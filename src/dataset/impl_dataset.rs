use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{Dataset, Float};
use crate::error::{Error, Result};

impl<F: Float> Dataset<F> {
    /// Create a new dataset from a feature matrix and a target vector
    ///
    /// The number of rows of `records` and the length of `targets` must
    /// agree. Feature names are initialized to `feature-0`, `feature-1`, ..
    pub fn new(records: Array2<F>, targets: Array1<F>) -> Dataset<F> {
        let feature_names = (0..records.ncols())
            .map(|idx| format!("feature-{}", idx))
            .collect();

        Dataset {
            records,
            targets,
            feature_names,
        }
    }

    /// Replace the feature names with the given list
    pub fn with_feature_names<S: Into<String>>(mut self, names: Vec<S>) -> Dataset<F> {
        self.feature_names = names.into_iter().map(|x| x.into()).collect();
        self
    }

    pub fn records(&self) -> ArrayView2<'_, F> {
        self.records.view()
    }

    pub fn targets(&self) -> ArrayView1<'_, F> {
        self.targets.view()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of rows in the dataset
    pub fn nsamples(&self) -> usize {
        self.records.nrows()
    }

    /// Number of feature columns in the dataset
    pub fn nfeatures(&self) -> usize {
        self.records.ncols()
    }

    /// Return a copy of the dataset with its rows uniformly permuted
    ///
    /// The permutation is drawn without replacement from the passed random
    /// generator, so two calls with generators in the same state produce the
    /// same row order.
    pub fn shuffle<R: Rng>(&self, rng: &mut R) -> Dataset<F> {
        let mut indices = (0..self.nsamples()).collect::<Vec<_>>();
        indices.shuffle(rng);

        self.select(&indices)
    }

    /// Split the dataset into two disjoint parts at `ratio`
    ///
    /// The first part keeps `floor(ratio * nsamples)` rows, the second part
    /// the remainder; together they cover every row exactly once. Combine
    /// with [`shuffle`](Dataset::shuffle) for a random partition.
    pub fn split_with_ratio(self, ratio: f32) -> (Dataset<F>, Dataset<F>) {
        let n = (self.nsamples() as f32 * ratio) as usize;

        let (first_records, second_records) = self.records.view().split_at(Axis(0), n);
        let (first_targets, second_targets) = self.targets.view().split_at(Axis(0), n);

        let first = Dataset::new(first_records.to_owned(), first_targets.to_owned())
            .with_feature_names(self.feature_names.clone());
        let second = Dataset::new(second_records.to_owned(), second_targets.to_owned())
            .with_feature_names(self.feature_names);

        (first, second)
    }

    /// Partition the dataset into `k` contiguous folds
    ///
    /// Returns one `(train, validation)` pair per fold, where the validation
    /// part holds roughly `nsamples / k` rows and the training part all
    /// remaining rows. Fails for `k < 2` or more folds than samples.
    pub fn fold(&self, k: usize) -> Result<Vec<(Dataset<F>, Dataset<F>)>> {
        if k < 2 {
            return Err(Error::Parameters(format!(
                "cross-validation requires at least 2 folds, got {}",
                k
            )));
        }
        if k > self.nsamples() {
            return Err(Error::NotEnoughSamples);
        }

        let n = self.nsamples();
        let base = n / k;
        let remainder = n % k;

        let mut folds = Vec::with_capacity(k);
        let mut start = 0;
        for i in 0..k {
            let size = base + usize::from(i < remainder);
            let validation = (start..start + size).collect::<Vec<_>>();
            let train = (0..start).chain(start + size..n).collect::<Vec<_>>();

            folds.push((self.select(&train), self.select(&validation)));
            start += size;
        }

        Ok(folds)
    }

    fn select(&self, indices: &[usize]) -> Dataset<F> {
        Dataset {
            records: self.records.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            feature_names: self.feature_names.clone(),
        }
    }
}
