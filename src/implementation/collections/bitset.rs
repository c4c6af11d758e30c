// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides a fixed capacity set of small integers. It is used to
//! represent subsets of terminals (the keys of the dynamic program) as well as
//! subsets of nodes (the valid roots of a partial solution).

use std::cmp::Ordering;

/// The number of bits in one word of the set
const WORD: usize = 64;

/// A bitset is a set of integers in `0..capacity` where the capacity is fixed
/// once and for all when the set is created. Binary operations are only ever
/// defined between sets having the same capacity: combining sets with
/// different capacities is a programming error and it panics.
///
/// # Ordering
/// Bitsets are totally ordered. The order is lexicographic over the bits of
/// the set (bit 0 first) where an absent bit comes before a present one. This
/// order does **not** reflect set inclusion; it is only meant to key ordered
/// collections of bitsets.
///
/// # Example
/// ```
/// # use steiner_dp::Bitset;
/// let mut a = Bitset::new(10);
/// a.set(1);
/// a.set(4);
/// let mut b = Bitset::new(10);
/// b.set(4);
/// b.set(7);
///
/// assert_eq!(3, a.union(&b).popcount());
/// assert_eq!(vec![4], a.intersect(&b).ones().collect::<Vec<_>>());
/// assert!(a.intersects(&b));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bitset {
    capacity: usize,
    words: Vec<u64>,
}

impl Bitset {
    /// Creates an empty set able to hold the integers in `0..capacity`
    pub fn new(capacity: usize) -> Self {
        Bitset { capacity, words: vec![0; Self::nb_words(capacity)] }
    }
    /// Creates the set containing all integers in `0..capacity`
    pub fn full(capacity: usize) -> Self {
        let mut set = Bitset { capacity, words: vec![u64::MAX; Self::nb_words(capacity)] };
        set.clear_padding();
        set
    }
    /// Creates a set containing the single given integer
    pub fn singleton(capacity: usize, bit: usize) -> Self {
        let mut set = Self::new(capacity);
        set.set(bit);
        set
    }
    /// Creates a set holding all the given integers
    pub fn from_bits(capacity: usize, bits: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self::new(capacity);
        for bit in bits {
            set.set(bit);
        }
        set
    }

    #[inline]
    fn nb_words(capacity: usize) -> usize {
        (capacity + WORD - 1) / WORD
    }
    #[inline]
    fn clear_padding(&mut self) {
        let rem = self.capacity % WORD;
        if rem != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1_u64 << rem) - 1;
            }
        }
    }
    #[inline]
    fn check_capacity(&self, other: &Bitset) {
        assert_eq!(self.capacity, other.capacity, "bitsets of different capacities");
    }

    /// The capacity of the set (it can hold the integers `0..capacity`)
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
    /// Returns true iff the given bit is present
    #[inline]
    pub fn contains(&self, bit: usize) -> bool {
        debug_assert!(bit < self.capacity, "bit {bit} out of bounds");
        self.words[bit / WORD] & (1 << (bit % WORD)) != 0
    }
    /// Adds the given bit to the set
    #[inline]
    pub fn set(&mut self, bit: usize) {
        debug_assert!(bit < self.capacity, "bit {bit} out of bounds");
        self.words[bit / WORD] |= 1 << (bit % WORD);
    }
    /// Removes the given bit from the set
    #[inline]
    pub fn clear(&mut self, bit: usize) {
        debug_assert!(bit < self.capacity, "bit {bit} out of bounds");
        self.words[bit / WORD] &= !(1 << (bit % WORD));
    }
    /// Removes all bits from the set
    pub fn clear_all(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }
    /// The number of bits in the set
    pub fn popcount(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
    /// Returns true iff no bit is set
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Returns a new set holding the bits of both sets
    pub fn union(&self, other: &Bitset) -> Bitset {
        let mut out = self.clone();
        out.union_with(other);
        out
    }
    /// Returns a new set holding the bits present in both sets
    pub fn intersect(&self, other: &Bitset) -> Bitset {
        let mut out = self.clone();
        out.intersect_with(other);
        out
    }
    /// Returns a new set holding the bits of self that are absent from other
    pub fn difference(&self, other: &Bitset) -> Bitset {
        self.check_capacity(other);
        let words = self.words.iter().zip(other.words.iter()).map(|(a, b)| a & !b).collect();
        Bitset { capacity: self.capacity, words }
    }
    /// Adds all the bits of other to self
    pub fn union_with(&mut self, other: &Bitset) {
        self.check_capacity(other);
        self.words.iter_mut().zip(other.words.iter()).for_each(|(a, b)| *a |= b);
    }
    /// Only keeps the bits of self that are also present in other
    pub fn intersect_with(&mut self, other: &Bitset) {
        self.check_capacity(other);
        self.words.iter_mut().zip(other.words.iter()).for_each(|(a, b)| *a &= b);
    }

    /// Returns true iff all bits of self are present in other
    pub fn is_subset_of(&self, other: &Bitset) -> bool {
        self.check_capacity(other);
        self.words.iter().zip(other.words.iter()).all(|(a, b)| a & !b == 0)
    }
    /// Returns true iff all bits of other are present in self
    pub fn is_superset_of(&self, other: &Bitset) -> bool {
        other.is_subset_of(self)
    }
    /// Returns true iff the two sets share at least one bit
    pub fn intersects(&self, other: &Bitset) -> bool {
        self.check_capacity(other);
        self.words.iter().zip(other.words.iter()).any(|(a, b)| a & b != 0)
    }
    /// Returns true iff the two sets share no bit at all
    pub fn is_disjoint(&self, other: &Bitset) -> bool {
        !self.intersects(other)
    }

    /// Iterates over the bits of the set in increasing order
    pub fn ones(&self) -> Ones<'_> {
        Ones { words: &self.words, index: 0, current: self.words.first().copied().unwrap_or(0) }
    }
}

impl Ord for Bitset {
    fn cmp(&self, other: &Self) -> Ordering {
        self.check_capacity(other);
        for (a, b) in self.words.iter().zip(other.words.iter()) {
            match a.reverse_bits().cmp(&b.reverse_bits()) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}
impl PartialOrd for Bitset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Iterator over the bits of a set
pub struct Ones<'a> {
    words: &'a [u64],
    index: usize,
    current: u64,
}
impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.index += 1;
            if self.index >= self.words.len() {
                return None;
            }
            self.current = self.words[self.index];
        }
        let bit = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        Some(self.index * WORD + bit)
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
