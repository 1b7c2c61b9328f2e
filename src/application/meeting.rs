// Pairwise meeting expressions: golfers gf0 < gf1 meet in group gr on week w
// when both are assigned to that group.

use crate::domain::{ExprId, Model};

use super::instance::Instance;
use super::lattice::VariableLattice;

/// Unordered pair of distinct golfers, stored as `low < high`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pair {
    low: usize,
    high: usize,
}

impl Pair {
    /// Orders the two golfers; `None` when they are the same golfer
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(self) -> usize {
        self.low
    }

    pub fn high(self) -> usize {
        self.high
    }
}

/// Triangular indexing of all pairs among `n` golfers
///
/// Pair `(i, j)` with `i < j` maps to `i*n - i*(i+1)/2 + (j - i - 1)`,
/// which enumerates `0..C(n, 2)` in lexicographic order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairIndex {
    n: usize,
}

impl PairIndex {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// `C(n, 2)`
    pub fn len(&self) -> usize {
        self.n * self.n.saturating_sub(1) / 2
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, pair: Pair) -> usize {
        debug_assert!(pair.high < self.n);
        let i = pair.low;
        i * self.n - i * (i + 1) / 2 + (pair.high - i - 1)
    }

    /// All pairs in index order
    pub fn iter(&self) -> impl Iterator<Item = Pair> {
        let n = self.n;
        (0..n).flat_map(move |low| (low + 1..n).map(move |high| Pair { low, high }))
    }
}

/// Flat table of `nbWeeks × nbGroups × C(nbGolfers, 2)` meeting expressions
#[derive(Debug, Clone)]
pub struct MeetingTable {
    nb_weeks: usize,
    nb_groups: usize,
    pairs: PairIndex,
    meetings: Vec<ExprId>,
}

impl MeetingTable {
    /// Builds `x[w][gr][low] AND x[w][gr][high]` for every week, group and
    /// pair, eagerly, in `model`.
    pub fn new(model: &mut Model, instance: &Instance, lattice: &VariableLattice) -> Self {
        let pairs = PairIndex::new(instance.nb_golfers());
        let mut meetings =
            Vec::with_capacity(instance.nb_weeks() * instance.nb_groups() * pairs.len());

        for w in 0..instance.nb_weeks() {
            for gr in 0..instance.nb_groups() {
                let group = lattice.group(w, gr);
                for pair in pairs.iter() {
                    let met = model.and(group[pair.low].expr(), group[pair.high].expr());
                    meetings.push(met);
                }
            }
        }

        log::debug!(
            "Meeting table: {} pairs, {} expressions",
            pairs.len(),
            meetings.len()
        );
        Self {
            nb_weeks: instance.nb_weeks(),
            nb_groups: instance.nb_groups(),
            pairs,
            meetings,
        }
    }

    pub fn pairs(&self) -> PairIndex {
        self.pairs
    }

    pub fn len(&self) -> usize {
        self.meetings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty()
    }

    /// Meeting expression of `pair` in group `group` on week `week`
    pub fn get(&self, week: usize, group: usize, pair: Pair) -> ExprId {
        assert!(week < self.nb_weeks && group < self.nb_groups);
        let block = week * self.nb_groups + group;
        self.meetings[block * self.pairs.len() + self.pairs.index(pair)]
    }

    /// Meeting expressions of `pair` over every (week, group)
    pub fn meetings_of(&self, pair: Pair) -> impl Iterator<Item = ExprId> + '_ {
        let offset = self.pairs.index(pair);
        let stride = self.pairs.len();
        (0..self.nb_weeks * self.nb_groups).map(move |block| self.meetings[block * stride + offset])
    }
}
