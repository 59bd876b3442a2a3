use crate::pred_map::PredicateId;

const BLOCK_BITS: usize = 64;

#[derive(Clone, Default, Debug)]
struct BitSet {
    blocks: Vec<u64>,
}

impl BitSet {
    fn with_capacity(bits: usize) -> Self {
        Self {
            blocks: vec![0; bits.div_ceil(BLOCK_BITS)],
        }
    }

    fn test(&self, bit: usize) -> bool {
        self.blocks
            .get(bit / BLOCK_BITS)
            .map(|block| block & (1 << (bit % BLOCK_BITS)) != 0)
            .unwrap_or(false)
    }

    fn set(&mut self, bit: usize) {
        let block = bit / BLOCK_BITS;
        if block >= self.blocks.len() {
            self.blocks.resize(block + 1, 0);
        }
        self.blocks[block] |= 1 << (bit % BLOCK_BITS);
    }
}

/// Per-evaluation predicate cache: two bitsets of length `pred_count` hold
/// the three states unknown / pass / fail in two bits. Owned exclusively by
/// one evaluation; allocate a fresh one per event.
#[derive(Clone, Default, Debug)]
pub struct Memoize {
    pass: BitSet,
    fail: BitSet,
}

impl Memoize {
    /// Allocates for `pred_count` predicates, normally
    /// [`Config::pred_count`](crate::Config::pred_count).
    pub fn new(pred_count: usize) -> Self {
        Self {
            pass: BitSet::with_capacity(pred_count),
            fail: BitSet::with_capacity(pred_count),
        }
    }

    pub(crate) fn check(&self, id: PredicateId) -> Option<bool> {
        if self.pass.test(id.0) {
            Some(true)
        } else if self.fail.test(id.0) {
            Some(false)
        } else {
            None
        }
    }

    pub(crate) fn record(&mut self, id: PredicateId, result: bool) {
        if result {
            self.pass.set(id.0);
        } else {
            self.fail.set(id.0);
        }
    }
}

/// Counters accumulated over one evaluation. `expressions_memoized` counts
/// top-level hits that short-circuited an entire tree;
/// `sub_expressions_memoized` counts every memoized hit.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct MatchReport {
    pub expressions_memoized: usize,
    pub sub_expressions_memoized: usize,
}

impl MatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_memoized(&mut self, is_top_level: bool) {
        if is_top_level {
            self.expressions_memoized += 1;
        }
        self.sub_expressions_memoized += 1;
    }
}
