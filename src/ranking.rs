use std::cmp::Ordering;

use dary_heap::OctonaryHeap;

/// A ranked entry, e.g. (average rating, movie title, number of ratings).
#[derive(Debug, Clone)]
pub struct ScoredLabel {
    pub score: f64,
    pub label: String,
    pub support: usize,
}

impl ScoredLabel {
    pub fn new(score: f64, label: impl Into<String>, support: usize) -> Self {
        ScoredLabel {
            score,
            label: label.into(),
            support,
        }
    }
}

impl PartialEq for ScoredLabel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredLabel {}

impl Ord for ScoredLabel {
    /// Best entry first: highest score, then label ascending, then highest support. The score
    /// alone is not a total order over a multiset, so equal scores must not depend on input order.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.label.cmp(&other.label))
            .then_with(|| other.support.cmp(&self.support))
    }
}

impl PartialOrd for ScoredLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Keeps the `k` best entries with a support count strictly above `min_support`, best first.
pub fn select_top_k<I>(scored_labels: I, k: usize, min_support: usize) -> Vec<ScoredLabel>
where
    I: IntoIterator<Item = ScoredLabel>,
{
    if k == 0 {
        return Vec::new();
    }

    // max-heap on our ordering, so the top is the worst of the current k
    let mut heap = OctonaryHeap::<ScoredLabel>::with_capacity(k);

    for scored_label in scored_labels
        .into_iter()
        .filter(|scored_label| scored_label.support > min_support)
    {
        if heap.len() < k {
            heap.push(scored_label);
        } else if let Some(mut worst) = heap.peek_mut() {
            if scored_label < *worst {
                *worst = scored_label;
            }
        }
    }

    heap.into_sorted_vec()
}
