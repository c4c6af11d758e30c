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

//! This module provides the exact dynamic programming solver. It combines the
//! partial solutions in order of increasing number of terminals, and prunes
//! every label that can not possibly lead to a tree cheaper than the best one
//! known so far.

use std::{cmp::Ordering, collections::BTreeMap};

use binary_heap_plus::BinaryHeap;
use compare::Compare;
use fxhash::FxHashSet;
use log::debug;
use ordered_float::OrderedFloat;
use rand::{SeedableRng, rngs::StdRng};

use crate::{Ancestors, Bitset, Completion, Cutoff, DpGraph, DpIterator, EdgeId, Graph,
    NodeId, Seed, ShortestPathHeuristic, SolTrace, Solution, Solver, StpError, SubSolution,
    SubsolTree, TraceRef, Variant, EPSILON, HEURISTIC_STARTS, is_lt};

/// A partial solution waiting for its expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub nterms: usize,
    pub cost: OrderedFloat<f64>,
    pub bitkey: Bitset,
}

/// The order in which the candidates are popped: the smallest subsets first,
/// then the cheapest, then the smallest key.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompareCandidate;
impl Compare<Candidate> for CompareCandidate {
    fn compare(&self, l: &Candidate, r: &Candidate) -> Ordering {
        r.nterms.cmp(&l.nterms)
            .then_with(|| r.cost.cmp(&l.cost))
            .then_with(|| r.bitkey.cmp(&l.bitkey))
    }
}

/// The state of the dynamic program after a call to `step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DpState {
    /// A partial solution spanning `nterms` terminals has been expanded
    Expanding { nterms: usize, cost: f64 },
    /// The optimal tree has been found
    Done,
    /// The terminals can not be connected
    Infeasible,
    /// The cutoff criterion was met
    Stopped,
}

/// The exact dynamic program over the subsets of terminals. It only deals with
/// the plain Steiner tree problem.
///
/// # Example
/// ```
/// # use steiner_dp::*;
/// let mut graph = Graph::new(4, Variant::Stp);
/// graph.add_edge(0, 1, 1.0);
/// graph.add_edge(1, 2, 1.0);
/// graph.add_edge(1, 3, 1.0);
/// graph.add_edge(0, 2, 3.0);
/// graph.set_terminal(0);
/// graph.set_terminal(2);
/// graph.set_terminal(3);
///
/// let mut solver = DpSolver::new(&graph, &NoCutoff).unwrap();
/// let completion = solver.minimize();
/// assert!(completion.is_exact);
/// assert_eq!(Some(3.0), completion.best_value);
/// assert_eq!(Some(vec![0, 1, 2]), solver.best_solution());
/// ```
pub struct DpSolver<'a> {
    graph: &'a Graph,
    cutoff: &'a dyn Cutoff,
    dpgraph: DpGraph,
    iterator: DpIterator,

    /// All the partial solutions that have been created so far
    subsols: Vec<SubSolution>,
    /// Maps the terminal sets onto the partial solutions
    soltree: BTreeMap<Bitset, usize>,
    /// The expanded partial solutions
    stree: SubsolTree,
    queue: BinaryHeap<Candidate, CompareCandidate>,

    /// The key standing for all terminals
    all_terms: Bitset,
    /// The distance from each terminal to every node
    term_dist: Vec<Vec<f64>>,

    upper_bound: f64,
    lower_bound: f64,
    best_solution: Option<Solution>,
    state: Option<DpState>,
    expansions: usize,
}

impl <'a> DpSolver<'a> {
    pub fn new(graph: &'a Graph, cutoff: &'a dyn Cutoff) -> Result<Self, StpError> {
        if graph.variant() != Variant::Stp {
            return Err(StpError::UnsupportedVariant(graph.variant()));
        }
        graph.validate()?;

        let dpgraph   = DpGraph::new(graph);
        let nterms    = dpgraph.nb_terminals();
        let nnodes    = dpgraph.nb_nodes();
        let term_dist = (0..nterms).map(|i| dpgraph.distances_from(dpgraph.terminal(i))).collect();

        let mut solver = DpSolver {
            graph,
            cutoff,
            iterator: DpIterator::new(nnodes),
            subsols: vec![],
            soltree: BTreeMap::new(),
            stree: SubsolTree::new(nterms, nnodes),
            queue: BinaryHeap::from_vec_cmp(vec![], CompareCandidate),
            all_terms: Bitset::full(nterms),
            term_dist,
            upper_bound: f64::INFINITY,
            lower_bound: 0.0,
            best_solution: None,
            state: None,
            expansions: 0,
            dpgraph,
        };
        solver.initialize();
        Ok(solver)
    }

    /// The number of partial solutions expanded so far
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    fn initialize(&mut self) {
        let nterms = self.dpgraph.nb_terminals();
        if nterms == 0 {
            self.upper_bound   = 0.0;
            self.best_solution = Some(vec![]);
            self.finish(DpState::Done);
            return;
        }
        let first = &self.term_dist[0];
        let connected = (0..nterms).all(|i| first[self.dpgraph.terminal(i)].is_finite());
        if !connected {
            self.finish(DpState::Infeasible);
            return;
        }

        let mut rng = StdRng::seed_from_u64(0);
        if let Some(tree) = ShortestPathHeuristic::new(self.graph).run(HEURISTIC_STARTS, &mut rng) {
            let edges = self.graph.prune_solution(&tree.edges);
            let cost  = edges.iter().map(|e| self.graph.cost(*e)).sum();
            self.set_primal(cost, edges);
        }

        for i in 0..nterms {
            let key  = Bitset::singleton(nterms, i);
            let mut subsol = SubSolution::new(key.clone());
            subsol.offer_seed(self.dpgraph.terminal(i), Seed { cost: 0.0, prevs: Ancestors::Empty });
            self.soltree.insert(key.clone(), self.subsols.len());
            self.subsols.push(subsol);
            self.queue.push(Candidate { nterms: 1, cost: OrderedFloat(0.0), bitkey: key });
        }
    }

    fn finish(&mut self, state: DpState) {
        match state {
            DpState::Done       => self.lower_bound = self.upper_bound,
            DpState::Infeasible => self.lower_bound = f64::INFINITY,
            _ => {},
        }
        debug!("dynamic program over after {} expansions: {:?} (best {})", self.expansions, state, self.upper_bound);
        self.state = Some(state);
    }

    /// Performs one step of the dynamic program: expands the next candidate
    /// unless the program is over. Once over, the same final state is returned
    /// at every call.
    pub fn step(&mut self) -> DpState {
        if let Some(state) = self.state {
            return state;
        }
        loop {
            if self.cutoff.must_stop() {
                self.finish(DpState::Stopped);
                return DpState::Stopped;
            }
            let Some(candidate) = self.queue.pop() else {
                // nothing cheaper than the primal exists
                let state = if self.best_solution.is_some() { DpState::Done } else { DpState::Infeasible };
                self.finish(state);
                return state;
            };
            let Some(id) = self.soltree.get(&candidate.bitkey).copied() else {
                continue;
            };
            if self.subsols[id].is_expanded() || self.subsols[id].best_seed_cost() > self.upper_bound + EPSILON {
                continue;
            }
            if candidate.bitkey == self.all_terms {
                self.finish(DpState::Done);
                return DpState::Done;
            }
            self.expand(id);
            self.combine(id);
            self.expansions += 1;
            return DpState::Expanding { nterms: candidate.nterms, cost: candidate.cost.0 };
        }
    }

    /// A lower bound on the cost of connecting node v to the terminals which
    /// do not belong to the key (infinite when v is cut off from them)
    fn missing_cost(term_dist: &[Vec<f64>], key: &Bitset, v: NodeId) -> f64 {
        if key.popcount() == key.capacity() {
            return 0.0;
        }
        (0..key.capacity())
            .filter(|t| !key.contains(*t))
            .map(|t| term_dist[t][v])
            .fold(f64::INFINITY, f64::min)
    }

    fn expand(&mut self, id: usize) {
        let seeds     = self.subsols[id].seeds();
        let key       = self.subsols[id].bitkey.clone();
        let term_dist = &self.term_dist;
        let ub        = self.upper_bound + EPSILON;
        let bound     = |v: NodeId| ub - Self::missing_cost(term_dist, &key, v);
        let traces    = self.iterator.expand(&self.dpgraph, id, &seeds, &bound);

        let mut roots = Bitset::new(self.dpgraph.nb_nodes());
        traces.iter().for_each(|t| roots.set(t.root));
        self.subsols[id].set_expanded(traces);

        let inserted = self.stree.insert(&key, roots, id);
        debug_assert!(inserted.is_ok(), "a partial solution is expanded only once");
    }

    /// Merges the freshly expanded partial solution `id` with all the expanded
    /// partial solutions it shares a root with and covering other terminals.
    fn combine(&mut self, id: usize) {
        let key = self.subsols[id].bitkey.clone();
        let partners: Vec<usize> = match self.stree.roots(&key) {
            Some(roots) => self.stree.collect_intersects(roots, &key).collect(),
            None => vec![],
        };

        for partner in partners {
            let union = key.union(&self.subsols[partner].bitkey);
            let seeds = self.merge_seeds(id, partner, &union);
            if seeds.is_empty() {
                continue;
            }
            let target = self.get_or_create(union.clone());
            if self.subsols[target].is_expanded() {
                continue;
            }
            let before = self.subsols[target].best_seed_cost();
            for (root, seed) in seeds {
                if self.subsols[target].offer_seed(root, seed) && union == self.all_terms && is_lt(seed.cost, self.upper_bound) {
                    let edges = self.reconstruct(seed.prevs);
                    let cost  = edges.iter().map(|e| self.graph.cost(*e)).sum();
                    self.set_primal(cost, edges);
                }
            }
            let after = self.subsols[target].best_seed_cost();
            if after < before {
                self.queue.push(Candidate { nterms: union.popcount(), cost: OrderedFloat(after), bitkey: union });
            }
        }
    }

    /// The seeds of `union` obtained by merging the traces of `a` and `b`
    /// rooted at the same node. Only the seeds that survive the bound are kept.
    fn merge_seeds(&self, a: usize, b: usize, union: &Bitset) -> Vec<(NodeId, Seed)> {
        let (sa, sb) = (&self.subsols[a], &self.subsols[b]);
        let (small, large) = if sa.extensions.len() <= sb.extensions.len() { (a, b) } else { (b, a) };
        let ub = self.upper_bound + EPSILON;

        let mut seeds = vec![];
        for (i, ts) in self.subsols[small].extensions.iter().enumerate() {
            let Some(j) = self.subsols[large].ext_at(ts.root) else {
                continue;
            };
            let tl   = &self.subsols[large].extensions[j];
            let cost = ts.cost + tl.cost;
            if cost <= ub - Self::missing_cost(&self.term_dist, union, ts.root) {
                let prevs = Ancestors::Pair(TraceRef { subsol: small, ext: i }, TraceRef { subsol: large, ext: j });
                seeds.push((ts.root, Seed { cost, prevs }));
            }
        }
        seeds
    }

    fn get_or_create(&mut self, key: Bitset) -> usize {
        if let Some(id) = self.soltree.get(&key) {
            return *id;
        }
        let id = self.subsols.len();
        self.subsols.push(SubSolution::new(key.clone()));
        self.soltree.insert(key, id);
        id
    }

    /// Walks back the traces from the given ancestors and returns the edges of
    /// the tree they stand for (pruned and sorted).
    fn reconstruct(&self, prevs: Ancestors) -> Vec<EdgeId> {
        let mut edges   = vec![];
        let mut visited = FxHashSet::default();
        let mut stack: Vec<TraceRef> = prevs.iter().collect();
        while let Some(r) = stack.pop() {
            if !visited.insert(r) {
                continue;
            }
            let trace: &SolTrace = &self.subsols[r.subsol].extensions[r.ext];
            edges.extend(trace.edge);
            stack.extend(trace.prevs.iter());
        }
        edges.sort_unstable();
        edges.dedup();
        self.graph.prune_solution(&edges)
    }
}

impl Solver for DpSolver<'_> {
    fn minimize(&mut self) -> Completion {
        loop {
            match self.step() {
                DpState::Expanding { .. } => continue,
                DpState::Done       => return Completion { is_exact: true,  best_value: self.best_value() },
                DpState::Infeasible => return Completion { is_exact: true,  best_value: None },
                DpState::Stopped    => return Completion { is_exact: false, best_value: self.best_value() },
            }
        }
    }

    fn best_value(&self) -> Option<f64> {
        self.best_solution.as_ref().map(|_| self.upper_bound)
    }
    fn best_solution(&self) -> Option<Solution> {
        self.best_solution.clone()
    }
    fn best_lower_bound(&self) -> f64 {
        self.lower_bound
    }
    fn best_upper_bound(&self) -> f64 {
        self.upper_bound
    }
    fn set_primal(&mut self, value: f64, solution: Solution) {
        if self.best_solution.is_none() || value < self.upper_bound {
            self.upper_bound   = value;
            self.best_solution = Some(solution);
        }
    }
}

/// Solves the given graph to optimality with the dynamic program (unless the
/// cutoff is met). Returns the completion along with the best tree found.
pub fn solve_dp(graph: &Graph, cutoff: &dyn Cutoff) -> Result<(Completion, Option<Solution>), StpError> {
    let mut solver = DpSolver::new(graph, cutoff)?;
    let completion = solver.minimize();
    Ok((completion, solver.best_solution()))
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_dp_solver {
    use std::time::Duration;

    use ordered_float::OrderedFloat;
    use rand::{SeedableRng, rngs::StdRng};

    use crate::*;
    use crate::test_utils::*;

    /// The 6-cycle with costs 1..6 and every other node being a terminal
    fn hexagon() -> Graph {
        let mut g = Graph::new(6, Variant::Stp);
        for v in 0..6 {
            g.add_edge(v, (v + 1) % 6, (v + 1) as f64);
        }
        g.set_terminal(0);
        g.set_terminal(2);
        g.set_terminal(4);
        g
    }

    fn is_connected_tree(graph: &Graph, edges: &[EdgeId]) -> bool {
        let mut sets = DisjointSets::new(graph.nb_nodes());
        if !edges.iter().all(|e| { let (u, v) = graph.endpoints(*e); sets.union(u, v) }) {
            return false;
        }
        let terminals = graph.terminals();
        terminals.iter().all(|t| sets.find(*t) == sets.find(terminals[0]))
    }

    #[test]
    fn the_candidates_are_ordered_by_size_then_cost_then_key() {
        let cmp = CompareCandidate;
        let small = Candidate { nterms: 1, cost: OrderedFloat(9.0), bitkey: Bitset::singleton(3, 0) };
        let cheap = Candidate { nterms: 2, cost: OrderedFloat(1.0), bitkey: Bitset::from_bits(3, [0, 1]) };
        let other = Candidate { nterms: 2, cost: OrderedFloat(1.0), bitkey: Bitset::from_bits(3, [1, 2]) };
        let large = Candidate { nterms: 2, cost: OrderedFloat(4.0), bitkey: Bitset::from_bits(3, [0, 2]) };
        let mut heap = binary_heap_plus::BinaryHeap::from_vec_cmp(vec![large, other, small, cheap], cmp);
        assert_eq!(9.0, heap.pop().unwrap().cost.0);
        assert_eq!(Bitset::from_bits(3, [1, 2]), heap.pop().unwrap().bitkey);
        assert_eq!(Bitset::from_bits(3, [0, 1]), heap.pop().unwrap().bitkey);
        assert_eq!(4.0, heap.pop().unwrap().cost.0);
    }

    #[test]
    fn it_solves_the_hexagon() {
        let g = hexagon();
        let (completion, solution) = solve_dp(&g, &NoCutoff).unwrap();
        assert!(completion.is_exact);
        assert_eq!(Some(10.0), completion.best_value);
        let solution = solution.unwrap();
        assert_eq!(vec![0, 1, 2, 3], solution);
        assert!(is_connected_tree(&g, &solution));
    }

    #[test]
    fn a_single_terminal_costs_nothing() {
        let mut g = Graph::new(3, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        g.set_terminal(1);
        let (completion, solution) = solve_dp(&g, &NoCutoff).unwrap();
        assert_eq!(Completion { is_exact: true, best_value: Some(0.0) }, completion);
        assert_eq!(Some(vec![]), solution);
    }

    #[test]
    fn no_terminal_at_all_costs_nothing() {
        let mut g = Graph::new(2, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        let (completion, solution) = solve_dp(&g, &NoCutoff).unwrap();
        assert_eq!(Completion { is_exact: true, best_value: Some(0.0) }, completion);
        assert_eq!(Some(vec![]), solution);
    }

    #[test]
    fn disconnected_terminals_are_infeasible() {
        let mut g = Graph::new(4, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(2, 3, 1.0);
        g.set_terminal(0);
        g.set_terminal(3);
        let mut solver = DpSolver::new(&g, &NoCutoff).unwrap();
        assert_eq!(Completion { is_exact: true, best_value: None }, solver.minimize());
        assert_eq!(None, solver.best_solution());
        assert_eq!(DpState::Infeasible, solver.step());
        assert_eq!(f64::INFINITY, solver.best_lower_bound());
    }

    #[test]
    fn other_variants_are_not_supported() {
        let mut g = Graph::new(2, Variant::Pc);
        g.add_edge(0, 1, 1.0);
        g.set_potential(0, 2.0);
        assert_eq!(Some(StpError::UnsupportedVariant(Variant::Pc)), DpSolver::new(&g, &NoCutoff).err());
    }

    #[test]
    fn an_expired_deadline_stops_the_dp_with_the_heuristic_tree() {
        let g = hexagon();
        let deadline = TimeBudget::new(Duration::from_secs(0));
        let (completion, solution) = solve_dp(&g, &deadline).unwrap();
        assert!(!completion.is_exact);
        assert!(completion.best_value.unwrap() >= 10.0);
        assert!(is_connected_tree(&g, &solution.unwrap()));
    }

    #[test]
    fn the_expanded_subsets_never_shrink_and_their_costs_never_decrease_within_a_size() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..5 {
            let g = random_stp(&mut rng, 12, 10, 5);
            let mut solver = DpSolver::new(&g, &NoCutoff).unwrap();
            let mut last = (0, f64::NEG_INFINITY);
            while let DpState::Expanding { nterms, cost } = solver.step() {
                assert!(nterms >= last.0);
                if nterms == last.0 {
                    assert!(cost >= last.1);
                }
                last = (nterms, cost);
            }
            assert_eq!(DpState::Done, solver.step());
            assert!(solver.expansions() > 0);
        }
    }

    #[test]
    fn it_finds_the_same_optimum_as_an_exhaustive_search() {
        let mut rng = StdRng::seed_from_u64(7);
        for nterms in 2..=5 {
            for _ in 0..6 {
                let g = random_stp(&mut rng, 10, 8, nterms);
                let expected = brute_force(&g).unwrap();
                let (completion, solution) = solve_dp(&g, &NoCutoff).unwrap();
                assert!(completion.is_exact);
                let value = completion.best_value.unwrap();
                assert!((expected - value).abs() < 1e-6, "expected {expected} got {value}");

                let solution = solution.unwrap();
                assert!(is_connected_tree(&g, &solution));
                assert!(solution.len() < g.nb_edges());
                let cost: f64 = solution.iter().map(|e| g.cost(*e)).sum();
                assert!((cost - value).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn a_better_primal_is_kept_and_a_worse_one_ignored() {
        let g = hexagon();
        let mut solver = DpSolver::new(&g, &NoCutoff).unwrap();
        assert_eq!(0.0, solver.best_lower_bound());
        let ub = solver.best_upper_bound();
        solver.set_primal(ub + 5.0, vec![]);
        assert_eq!(ub, solver.best_upper_bound());
        assert!(solver.gap() > 0.0);
        solver.minimize();
        assert_eq!(10.0, solver.best_upper_bound());
        assert_eq!(10.0, solver.best_lower_bound());
        assert_eq!(0.0, solver.gap());
    }
}
