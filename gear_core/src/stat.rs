//! Stat vectors and sets of achievable stat vectors

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, AddAssign};

/// Fixed-length tuple of stat values, one per tracked stat dimension.
///
/// Ordering is lexicographic so vectors can key ordered sets deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatVector(Vec<i32>);

impl StatVector {
    /// All-zero vector with `dims` components
    pub fn zeros(dims: usize) -> Self {
        StatVector(vec![0; dims])
    }

    pub fn new(values: Vec<i32>) -> Self {
        StatVector(values)
    }

    /// Number of dimensions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of one dimension (0 when out of range)
    pub fn get(&self, dim: usize) -> i32 {
        self.0.get(dim).copied().unwrap_or(0)
    }

    pub fn values(&self) -> &[i32] {
        &self.0
    }

    /// Component-wise sum of `vectors`, starting from the zero vector
    pub fn sum<'a>(dims: usize, vectors: impl IntoIterator<Item = &'a StatVector>) -> Self {
        let mut total = StatVector::zeros(dims);
        for v in vectors {
            total += v;
        }
        total
    }
}

impl From<Vec<i32>> for StatVector {
    fn from(values: Vec<i32>) -> Self {
        StatVector(values)
    }
}

impl<const N: usize> From<[i32; N]> for StatVector {
    fn from(values: [i32; N]) -> Self {
        StatVector(values.to_vec())
    }
}

// Shorter operands are treated as zero-padded.
impl AddAssign<&StatVector> for StatVector {
    fn add_assign(&mut self, rhs: &StatVector) {
        if rhs.0.len() > self.0.len() {
            self.0.resize(rhs.0.len(), 0);
        }
        for (lhs, r) in self.0.iter_mut().zip(rhs.0.iter()) {
            *lhs += r;
        }
    }
}

impl Add<&StatVector> for &StatVector {
    type Output = StatVector;

    fn add(self, rhs: &StatVector) -> StatVector {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Add for StatVector {
    type Output = StatVector;

    fn add(mut self, rhs: StatVector) -> StatVector {
        self += &rhs;
        self
    }
}

impl fmt::Display for StatVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, ")")
    }
}

/// The set of distinct stat vectors an item can realize.
///
/// Compared as a set: insertion order never matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatSet(BTreeSet<StatVector>);

impl StatSet {
    pub fn new() -> Self {
        StatSet::default()
    }

    pub fn singleton(vector: StatVector) -> Self {
        let mut set = StatSet::new();
        set.insert(vector);
        set
    }

    /// Insert a vector, returning false if it was already present
    pub fn insert(&mut self, vector: StatVector) -> bool {
        self.0.insert(vector)
    }

    pub fn contains(&self, vector: &StatVector) -> bool {
        self.0.contains(vector)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatVector> {
        self.0.iter()
    }

    /// Add every vector of `other` to this set
    pub fn extend_from(&mut self, other: &StatSet) {
        self.0.extend(other.0.iter().cloned());
    }
}

impl FromIterator<StatVector> for StatSet {
    fn from_iter<I: IntoIterator<Item = StatVector>>(iter: I) -> Self {
        StatSet(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a StatSet {
    type Item = &'a StatVector;
    type IntoIter = std::collections::btree_set::Iter<'a, StatVector>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for StatSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "}}")
    }
}
