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

//! This module provides the bookkeeping of the reduction loops: which
//! techniques are still worth trying, and how many eliminations each of them
//! has performed so far.

use std::fmt;

/// The reduction techniques
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Technique {
    /// Degree tests of the Steiner tree problem
    Degree,
    /// Contraction of the edges having no cost
    ZeroEdge,
    /// Deletion of edges longer than an alternative path
    LongEdge,
    /// Special distance test (Voronoi bottleneck bound)
    Sd,
    /// Special distance test along paths
    Sdsp,
    /// Bottleneck degree 3 test (node replacement)
    Bd3,
    /// Nearest vertex and short links tests
    Nvsl,
    /// Voronoi radius bound test
    Bound,
    /// Dual ascent from the source
    DualAscent,
    /// Dual ascent from several roots
    DualAscentExt,
    /// Degree tests of the prize-collecting variants
    PcDegree,
    /// Degree tests of the maximum-weight variant
    MwDegree,
    /// Adjacent neighbourhood test
    Ans,
    /// Degree tests of the Steiner arborescence problem
    SapDegree,
}

impl Technique {
    /// The number of techniques
    pub const COUNT: usize = 14;
    /// All the techniques
    pub const ALL: [Technique; Technique::COUNT] = [
        Technique::Degree, Technique::ZeroEdge, Technique::LongEdge, Technique::Sd,
        Technique::Sdsp, Technique::Bd3, Technique::Nvsl, Technique::Bound,
        Technique::DualAscent, Technique::DualAscentExt, Technique::PcDegree,
        Technique::MwDegree, Technique::Ans, Technique::SapDegree,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
    #[inline]
    fn flag(self) -> u16 {
        1 << self.index()
    }
    /// A short name, used in the logs
    pub fn name(self) -> &'static str {
        match self {
            Technique::Degree        => "degree",
            Technique::ZeroEdge      => "zero-edge",
            Technique::LongEdge      => "le",
            Technique::Sd            => "sd",
            Technique::Sdsp          => "sdsp",
            Technique::Bd3           => "bd3",
            Technique::Nvsl          => "nvsl",
            Technique::Bound         => "bnd",
            Technique::DualAscent    => "da",
            Technique::DualAscentExt => "da-ext",
            Technique::PcDegree      => "pc-degree",
            Technique::MwDegree      => "mw-degree",
            Technique::Ans           => "ans",
            Technique::SapDegree     => "sap-degree",
        }
    }
}
impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compact set of techniques (one bit per technique)
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct TechniqueSet(u16);
impl TechniqueSet {
    #[inline]
    pub fn empty() -> Self {
        TechniqueSet(0)
    }
    /// The set containing exactly the given techniques
    pub fn of(techniques: &[Technique]) -> Self {
        let mut set = Self::empty();
        techniques.iter().for_each(|t| set.insert(*t));
        set
    }
    #[inline]
    pub fn contains(self, t: Technique) -> bool {
        self.0 & t.flag() != 0
    }
    #[inline]
    pub fn insert(&mut self, t: Technique) {
        self.0 |= t.flag()
    }
    #[inline]
    pub fn remove(&mut self, t: Technique) {
        self.0 &= !t.flag()
    }
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }
    /// Iterates over the techniques of the set in declaration order
    pub fn iter(self) -> impl Iterator<Item = Technique> {
        Technique::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

/// The number of calls and eliminations of each technique
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElimHistory {
    calls: [usize; Technique::COUNT],
    elims: [usize; Technique::COUNT],
}
impl ElimHistory {
    pub fn record(&mut self, t: Technique, nelims: usize) {
        self.calls[t.index()] += 1;
        self.elims[t.index()] += nelims;
    }
    /// The number of times the technique was applied
    pub fn calls(&self, t: Technique) -> usize {
        self.calls[t.index()]
    }
    /// The number of eliminations performed by the technique
    pub fn eliminations(&self, t: Technique) -> usize {
        self.elims[t.index()]
    }
    /// The number of eliminations performed by all techniques
    pub fn total(&self) -> usize {
        self.elims.iter().sum()
    }
}

/// The scheduler keeps track of the techniques that are worth applying in the
/// next round of a reduction loop. A technique is disabled as soon as it
/// performs too few eliminations and remains so until the scheduler is
/// restarted.
#[derive(Debug, Clone)]
pub struct Scheduler {
    initial: TechniqueSet,
    active: TechniqueSet,
    history: ElimHistory,
    round: usize,
}
impl Scheduler {
    pub fn new(initial: TechniqueSet) -> Self {
        Scheduler { initial, active: initial, history: ElimHistory::default(), round: 0 }
    }
    #[inline]
    pub fn is_active(&self, t: Technique) -> bool {
        self.active.contains(t)
    }
    pub fn any_active(&self) -> bool {
        !self.active.is_empty()
    }
    pub fn active(&self) -> TechniqueSet {
        self.active
    }
    pub fn initial(&self) -> TechniqueSet {
        self.initial
    }
    /// Records the outcome of one application of `t`. The technique is
    /// disabled when it did not eliminate more than `bound` items.
    pub fn record(&mut self, t: Technique, nelims: usize, bound: usize) {
        self.history.record(t, nelims);
        if nelims <= bound {
            self.active.remove(t);
        }
    }
    /// Records the outcome of one application of a technique which is never
    /// disabled
    pub fn count(&mut self, t: Technique, nelims: usize) {
        self.history.record(t, nelims);
    }
    /// Re-enables all the initial techniques
    pub fn restart(&mut self) {
        self.active = self.initial;
    }
    pub fn round(&self) -> usize {
        self.round
    }
    pub fn next_round(&mut self) {
        self.round += 1;
    }
    pub fn history(&self) -> &ElimHistory {
        &self.history
    }
    pub fn into_history(self) -> ElimHistory {
        self.history
    }
}
