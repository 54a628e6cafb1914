//! Memoization of basis function values.
//!
//! Entries are keyed by `(span, u)` using the exact bit pattern of `u`.
//! The cache remembers the knot vector and degree it was filled against and
//! drops every entry as soon as either changes. Once it holds `capacity`
//! entries the next miss clears it, so a parameter that never repeats
//! cannot grow it without bound.

use std::collections::HashMap;

use super::basis;

/// Entry limit used by [`BasisCache::new`].
pub const DEFAULT_CAPACITY: usize = 4096;

/// Hit/miss counters for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    /// Times the cache was cleared for reaching its capacity.
    pub evictions: u64,
}

#[derive(Debug)]
pub struct BasisCache {
    degree: usize,
    knots: Vec<f64>,
    capacity: usize,
    entries: HashMap<(usize, u64), Vec<f64>>,
    hits: u64,
    misses: u64,
    invalidations: u64,
    evictions: u64,
}

impl Default for BasisCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl BasisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            degree: 0,
            knots: Vec::new(),
            capacity: capacity.max(1),
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
            invalidations: 0,
            evictions: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Basis values for `span` at `u`, computing and storing them on a miss.
    pub fn basis(&mut self, span: usize, u: f64, degree: usize, knots: &[f64]) -> &[f64] {
        if degree != self.degree || knots != self.knots.as_slice() {
            self.invalidate();
            self.degree = degree;
            self.knots = knots.to_vec();
        }

        let key = (span, u.to_bits());
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            if self.entries.len() >= self.capacity {
                log::trace!("basis cache: full at {} entries, clearing", self.entries.len());
                self.entries.clear();
                self.evictions += 1;
            }
        }
        self.entries
            .entry(key)
            .or_insert_with(|| basis::basis_funs(span, u, degree, knots))
    }

    /// Drop all entries.
    pub fn invalidate(&mut self) {
        if !self.entries.is_empty() {
            log::trace!("basis cache: dropping {} entries", self.entries.len());
            self.invalidations += 1;
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            invalidations: self.invalidations,
            evictions: self.evictions,
        }
    }
}
