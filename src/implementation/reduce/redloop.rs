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

//! This module provides the reduction loops. Each problem variant comes with
//! its own loop which repeatedly applies the techniques that are sound for
//! that variant until they stop being productive, the round budget is
//! exhausted or the cutoff criterion is met.

use log::{Level, log};

use crate::{Cutoff, Graph, Reduced, Reduction, StpError, Technique, TechniqueSet, Variant,
    ElimHistory, ReduceConfig, ReductionLevel, Scheduler,
    DegreeTest, ZeroEdgeContraction, PcDegreeTest, MwDegreeTest, AnsTest, SapDegreeTest, LongEdgeTest, SdTest,
    SdspTest, Bd3Test, NvslTest, BoundTest, DualAscent, DualAscentExt,
    level0, level0_rooted, level0_infeasible, delete_multiedges, pc_upper_bound, promote_potentials};

/// What the reduction of a graph has achieved
#[derive(Debug, Clone, PartialEq)]
pub struct ReduceOutcome {
    /// The cost that must be added to the cost of any solution of the reduced
    /// graph to obtain the cost of that solution in the original graph
    pub offset: f64,
    /// The total number of eliminations
    pub nelims: usize,
    /// True iff the graph was proved to have no feasible solution
    pub infeasible: bool,
    /// True iff the reduction was interrupted by the cutoff
    pub stopped: bool,
    /// The eliminations performed by each technique
    pub history: ElimHistory,
}

/// Reduces the graph in place. The variant of the graph determines the loop
/// (and thus the techniques) being used. The cutoff is polled before each
/// round and after each technique; when it fires, the graph is left in a
/// consistent (partially reduced) state.
///
/// # Example
/// ```
/// # use steiner_dp::*;
/// // a path 0 - 1 - 2 with a useless detour through 3
/// let mut graph = Graph::new(4, Variant::Stp);
/// graph.add_edge(0, 1, 1.0);
/// graph.add_edge(1, 2, 1.0);
/// graph.add_edge(0, 3, 2.0);
/// graph.add_edge(3, 2, 2.0);
/// graph.set_terminal(0);
/// graph.set_terminal(2);
///
/// let outcome = reduce(&mut graph, &ReduceConfig::default(), &NoCutoff).unwrap();
/// assert!(!outcome.infeasible);
/// assert_eq!(2.0, outcome.offset);
/// assert_eq!(0, graph.nb_edges());
/// assert_eq!(vec![0, 1], graph.original_solution(&[]));
/// ```
pub fn reduce(graph: &mut Graph, config: &ReduceConfig, cutoff: &dyn Cutoff) -> Result<ReduceOutcome, StpError> {
    graph.validate()?;
    if cutoff.must_stop() {
        return Ok(ReduceOutcome { offset: 0.0, nelims: 0, infeasible: false, stopped: true, history: ElimHistory::default() });
    }

    let mut ctx = LoopContext::new(config, cutoff, initial_techniques(graph.variant(), config));
    let sweep = match graph.variant() {
        Variant::Rpc => level0_rooted(graph),
        _            => level0_infeasible(graph),
    };
    ctx.total.absorb(sweep);
    ctx.total.nelims += delete_multiedges(graph);

    if !ctx.total.infeasible && config.level != ReductionLevel::None {
        match graph.variant() {
            Variant::Stp              => redloop_stp(&mut ctx, graph)?,
            Variant::Pc | Variant::Rpc => redloop_pc(&mut ctx, graph)?,
            Variant::Mw               => redloop_mw(&mut ctx, graph)?,
            Variant::Sap              => redloop_da(&mut ctx, graph)?,
            Variant::Dhc | Variant::Dc => {},
        }
    }
    ctx.sweep(graph);
    graph.validate()?;

    let history = ctx.scheduler.history();
    for t in Technique::ALL.into_iter().filter(|t| history.calls(*t) > 0) {
        log!(ctx.level(), "{:>10}: {:>4} calls, {:>6} eliminations", t, history.calls(t), history.eliminations(t));
    }
    log!(ctx.level(), "{:?} reduced: {} eliminations in {} rounds, offset {}{}",
        graph.variant(), ctx.total.nelims, ctx.scheduler.round(), ctx.total.fixed,
        if ctx.total.infeasible { " (infeasible)" } else { "" });
    Ok(ctx.into_outcome())
}

/// The techniques a loop starts with, given the variant and the configuration
fn initial_techniques(variant: Variant, config: &ReduceConfig) -> TechniqueSet {
    let advanced = config.level == ReductionLevel::Advanced;
    let mut set  = match variant {
        Variant::Stp               => TechniqueSet::of(&[Technique::LongEdge, Technique::Sd, Technique::Nvsl]),
        Variant::Pc | Variant::Rpc => TechniqueSet::of(&[Technique::LongEdge, Technique::Nvsl]),
        Variant::Mw                => TechniqueSet::of(&[Technique::Ans]),
        _                          => TechniqueSet::empty(),
    };
    match variant {
        Variant::Stp => {
            if advanced {
                set.insert(Technique::Sdsp);
                set.insert(Technique::Bound);
                if config.node_replacing {
                    set.insert(Technique::Bd3);
                }
                if config.dual_ascent {
                    set.insert(Technique::DualAscent);
                    set.insert(Technique::DualAscentExt);
                }
            }
        },
        Variant::Pc | Variant::Rpc => {
            if advanced {
                set.insert(Technique::Sdsp);
                if config.node_replacing {
                    set.insert(Technique::Bd3);
                }
                // only applied once the instance is rooted
                if config.dual_ascent {
                    set.insert(Technique::DualAscent);
                }
            }
        },
        Variant::Sap => {
            if advanced && config.dual_ascent {
                set.insert(Technique::DualAscent);
            }
        },
        Variant::Mw | Variant::Dhc | Variant::Dc => {},
    }
    set
}

/// The number of edges divided by the number of node pairs
fn density(graph: &Graph) -> f64 {
    let n = graph.nb_active_nodes() as f64;
    if n < 2.0 {
        0.0
    } else {
        2.0 * graph.nb_edges() as f64 / (n * (n - 1.0))
    }
}

// ----------------------------------------------------------------------------
// --- LOOP CONTEXT -----------------------------------------------------------
// ----------------------------------------------------------------------------
/// The state shared by all the rounds of a reduction loop
struct LoopContext<'a> {
    config: &'a ReduceConfig,
    cutoff: &'a dyn Cutoff,
    scheduler: Scheduler,
    total: Reduced,
    stopped: bool,
    /// The number of restarts still allowed outside of the extensive mode
    restarts: usize,
}

impl <'a> LoopContext<'a> {
    fn new(config: &'a ReduceConfig, cutoff: &'a dyn Cutoff, initial: TechniqueSet) -> Self {
        LoopContext {
            config,
            cutoff,
            scheduler: Scheduler::new(initial),
            total: Reduced::default(),
            stopped: false,
            restarts: usize::from(config.full_reduce),
        }
    }
    fn level(&self) -> Level {
        if self.config.verbose { Level::Info } else { Level::Debug }
    }
    /// Polls the cutoff. Nothing is done anymore once it has fired or once
    /// the instance is known to be infeasible.
    fn must_stop(&mut self) -> bool {
        if !self.stopped && self.cutoff.must_stop() {
            self.stopped = true;
        }
        self.stopped || self.total.infeasible
    }
    fn out_of_rounds(&self) -> bool {
        self.scheduler.round() >= self.config.max_rounds
    }
    /// True iff the technique should be applied now
    fn proceed(&mut self, t: Technique) -> bool {
        !self.must_stop() && self.scheduler.is_active(t)
    }

    /// Applies a scheduled technique which is disabled as soon as it
    /// eliminates no more than `bound` items
    fn run<R: Reduction>(&mut self, graph: &mut Graph, mut reduction: R, bound: usize) -> Result<usize, StpError> {
        let reduced = reduction.apply(graph)?;
        self.scheduler.record(reduction.technique(), reduced.nelims, bound);
        Ok(self.absorb(reduction.technique(), reduced))
    }
    /// Applies a technique which is never disabled
    fn run_always<R: Reduction>(&mut self, graph: &mut Graph, mut reduction: R) -> Result<usize, StpError> {
        let reduced = reduction.apply(graph)?;
        self.scheduler.count(reduction.technique(), reduced.nelims);
        Ok(self.absorb(reduction.technique(), reduced))
    }
    fn absorb(&mut self, t: Technique, reduced: Reduced) -> usize {
        log!(self.level(), "round {:>3} {:>10}: {:>6} eliminations, {} fixed",
            self.scheduler.round(), t, reduced.nelims, reduced.fixed);
        self.total.absorb(reduced);
        reduced.nelims
    }
    /// Removes the parts of the graph that can not belong to any solution
    fn sweep(&mut self, graph: &mut Graph) -> usize {
        let reduced = match graph.variant() {
            Variant::Rpc => level0_rooted(graph),
            _            => Reduced { nelims: level0(graph), ..Reduced::default() },
        };
        self.total.absorb(reduced);
        reduced.nelims
    }

    /// Decides whether an other round should follow the one which has just
    /// eliminated `elims` items with the techniques `ran`. A complete round
    /// which was not productive enough ends the loop. Otherwise, the disabled
    /// techniques may be given an other chance.
    fn keep_going(&mut self, elims: usize, bound: usize, ran: TechniqueSet) -> bool {
        let extensive = self.config.extensive;
        let fruitful  = if extensive { elims > 0 } else { elims > 2 * bound };
        if fruitful {
            if self.scheduler.any_active() {
                return true;
            }
        } else if ran == self.scheduler.initial() {
            return false;
        }
        if extensive || self.restarts > 0 {
            self.restarts = self.restarts.saturating_sub(1);
            self.scheduler.restart();
            true
        } else {
            false
        }
    }

    fn into_outcome(self) -> ReduceOutcome {
        ReduceOutcome {
            offset: self.total.fixed,
            nelims: self.total.nelims,
            infeasible: self.total.infeasible,
            stopped: self.stopped,
            history: self.scheduler.into_history(),
        }
    }
}

// ----------------------------------------------------------------------------
// --- STEINER TREE -----------------------------------------------------------
// ----------------------------------------------------------------------------
fn redloop_stp(ctx: &mut LoopContext, graph: &mut Graph) -> Result<(), StpError> {
    let c = ctx.config;
    ctx.run_always(graph, ZeroEdgeContraction)?;
    ctx.run_always(graph, DegreeTest)?;
    loop {
        while !ctx.must_stop() && !ctx.out_of_rounds() {
            let bound = c.reduction_bound(graph);
            let round = ctx.scheduler.round();
            let ran   = ctx.scheduler.active();
            let mut elims = 0;
            if ctx.proceed(Technique::LongEdge) {
                let limit = c.work_limit(graph, round, c.sdsp_bound, c.sdsp_bound2);
                elims += ctx.run(graph, LongEdgeTest { limit }, bound)?;
            }
            if ctx.proceed(Technique::Sd) {
                elims += ctx.run(graph, SdTest, bound)?;
            }
            if ctx.proceed(Technique::Sdsp) {
                let limit = c.work_limit(graph, round, c.sdsp_bound, c.sdsp_bound2);
                elims += ctx.run(graph, SdspTest { limit }, bound)?;
            }
            if ctx.proceed(Technique::Bd3) {
                elims += ctx.run(graph, Bd3Test { limit: c.bd3_bound }, bound)?;
            }
            if ctx.proceed(Technique::Nvsl) {
                elims += ctx.run(graph, NvslTest { min_elims: c.min_elims }, bound)?;
            }
            if ctx.proceed(Technique::DualAscent) {
                elims += ctx.run(graph, DualAscent { seed: c.seed }, c.ex_factor * bound)?;
            }
            if ctx.proceed(Technique::Bound) && density(graph) <= c.bound_density {
                elims += ctx.run(graph, BoundTest { seed: c.seed }, bound)?;
            }
            elims += ctx.sweep(graph);
            if !ctx.must_stop() {
                elims += ctx.run_always(graph, ZeroEdgeContraction)?;
                elims += ctx.run_always(graph, DegreeTest)?;
            }
            ctx.scheduler.next_round();
            if !ctx.keep_going(elims, bound, ran) {
                break;
            }
        }

        // restart everything when the extended dual ascent is productive
        if ctx.must_stop() || ctx.out_of_rounds() || !ctx.scheduler.initial().contains(Technique::DualAscentExt) {
            return Ok(());
        }
        let bound = c.reduction_bound(graph);
        let elims = ctx.run_always(graph, DualAscentExt { roots: c.da_roots, seed: c.seed })?;
        let threshold = if c.extensive { 0 } else { c.ex_factor * bound };
        if elims <= threshold {
            if elims > 0 && !ctx.must_stop() {
                ctx.sweep(graph);
                ctx.run_always(graph, DegreeTest)?;
            }
            return Ok(());
        }
        ctx.scheduler.restart();
    }
}

// ----------------------------------------------------------------------------
// --- PRIZE COLLECTING -------------------------------------------------------
// ----------------------------------------------------------------------------
fn redloop_pc(ctx: &mut LoopContext, graph: &mut Graph) -> Result<(), StpError> {
    let c = ctx.config;
    ctx.run_always(graph, PcDegreeTest)?;
    loop {
        while !ctx.must_stop() && !ctx.out_of_rounds() {
            let bound  = c.reduction_bound(graph);
            let round  = ctx.scheduler.round();
            let rooted = graph.variant() == Variant::Rpc;
            let ran    = ctx.scheduler.active();
            let mut elims = 0;
            if ctx.proceed(Technique::LongEdge) {
                let limit = c.work_limit(graph, round, c.sdsp_bound, c.sdsp_bound2);
                elims += ctx.run(graph, LongEdgeTest { limit }, bound)?;
            }
            if rooted && ctx.proceed(Technique::Sdsp) {
                let limit = c.work_limit(graph, round, c.sdsp_bound, c.sdsp_bound2);
                elims += ctx.run(graph, SdspTest { limit }, bound)?;
            }
            if ctx.proceed(Technique::Bd3) {
                elims += ctx.run(graph, Bd3Test { limit: c.bd3_bound }, bound)?;
            }
            if rooted && ctx.proceed(Technique::Nvsl) {
                elims += ctx.run(graph, NvslTest { min_elims: c.min_elims }, bound)?;
            }
            if rooted && ctx.proceed(Technique::DualAscent) {
                elims += ctx.run(graph, DualAscent { seed: c.seed }, c.ex_factor * bound)?;
            }
            elims += ctx.sweep(graph);
            if !ctx.must_stop() {
                elims += ctx.run_always(graph, PcDegreeTest)?;
            }
            ctx.scheduler.next_round();
            if !ctx.keep_going(elims, bound, ran) {
                break;
            }
        }

        // at the fixed point, the most profitable nodes become terminals
        let allowed = c.try_rooted || graph.variant() == Variant::Rpc;
        if !allowed || ctx.must_stop() || ctx.out_of_rounds() {
            return Ok(());
        }
        let Some(upper) = pc_upper_bound(graph)? else {
            return Ok(());
        };
        let promoted = promote_potentials(graph, upper)?;
        if promoted == 0 {
            return Ok(());
        }
        log!(ctx.level(), "{} potential nodes promoted to terminals (upper bound {})", promoted, upper);
        ctx.sweep(graph);
        ctx.scheduler.restart();
    }
}

// ----------------------------------------------------------------------------
// --- MAXIMUM WEIGHT ---------------------------------------------------------
// ----------------------------------------------------------------------------
fn redloop_mw(ctx: &mut LoopContext, graph: &mut Graph) -> Result<(), StpError> {
    let c = ctx.config;
    ctx.run_always(graph, MwDegreeTest)?;
    while !ctx.must_stop() && !ctx.out_of_rounds() {
        let bound = c.reduction_bound(graph);
        let ran   = ctx.scheduler.active();
        let mut elims = 0;
        if ctx.proceed(Technique::Ans) {
            elims += ctx.run(graph, AnsTest, bound)?;
        }
        elims += ctx.sweep(graph);
        if !ctx.must_stop() {
            elims += ctx.run_always(graph, MwDegreeTest)?;
        }
        ctx.scheduler.next_round();
        if !ctx.keep_going(elims, bound, ran) {
            break;
        }
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// --- STEINER ARBORESCENCE ---------------------------------------------------
// ----------------------------------------------------------------------------
fn redloop_da(ctx: &mut LoopContext, graph: &mut Graph) -> Result<(), StpError> {
    let c = ctx.config;
    ctx.run_always(graph, SapDegreeTest)?;
    while !ctx.must_stop() && !ctx.out_of_rounds() {
        let bound = c.reduction_bound(graph);
        let ran   = ctx.scheduler.active();
        let mut elims = 0;
        if ctx.proceed(Technique::DualAscent) {
            elims += ctx.run(graph, DualAscent { seed: c.seed }, c.ex_factor * bound)?;
        }
        elims += ctx.sweep(graph);
        if !ctx.must_stop() {
            elims += ctx.run_always(graph, SapDegreeTest)?;
        }
        ctx.scheduler.next_round();
        if !ctx.keep_going(elims, bound, ran) {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod test_redloop {
    use std::time::Duration;

    use rand::{SeedableRng, rngs::StdRng};

    use crate::*;
    use crate::test_utils::*;

    fn exhaustive() -> ReduceConfig {
        ReduceConfigBuilder::default()
            .min_elims(0)
            .extensive(true)
            .max_rounds(1000)
            .build()
            .unwrap()
    }

    fn assert_sound(g: &Graph, config: &ReduceConfig) -> (Graph, ReduceOutcome) {
        let mut reduced = g.clone();
        let outcome = reduce(&mut reduced, config, &NoCutoff).unwrap();
        assert!(!outcome.stopped);
        let expected = brute_force(g);
        match brute_force(&reduced) {
            Some(opt) if !outcome.infeasible => {
                let actual = opt + outcome.offset;
                let expected = expected.unwrap();
                assert!((expected - actual).abs() < 1e-6, "expected {expected} got {actual}");
            },
            _ => assert_eq!(None, expected),
        }
        (reduced, outcome)
    }

    #[test]
    fn the_steiner_tree_loop_is_sound() {
        let mut rng = StdRng::seed_from_u64(41);
        for _ in 0..25 {
            let g = random_stp(&mut rng, 12, 10, 4);
            assert_sound(&g, &ReduceConfig::default());
            assert_sound(&g, &exhaustive());
        }
    }
    #[test]
    fn the_prize_collecting_loop_is_sound() {
        let mut rng = StdRng::seed_from_u64(43);
        for _ in 0..25 {
            let g = random_pc(&mut rng, 10, 8, 5);
            assert_sound(&g, &ReduceConfig::default());
            assert_sound(&g, &exhaustive());
        }
    }
    #[test]
    fn the_rooted_prize_collecting_loop_is_sound() {
        let mut rng = StdRng::seed_from_u64(71);
        let mut da_calls = 0;
        for _ in 0..25 {
            let g = random_rpc(&mut rng, 10, 8, 5);
            let (_, outcome) = assert_sound(&g, &ReduceConfig::default());
            da_calls += outcome.history.calls(Technique::DualAscent);
            assert_sound(&g, &exhaustive());
        }
        assert!(da_calls > 0);
    }
    #[test]
    fn the_maximum_weight_loop_is_sound() {
        let mut rng = StdRng::seed_from_u64(47);
        for _ in 0..25 {
            let g = random_mw(&mut rng, 10, 6);
            assert_sound(&g, &ReduceConfig::default());
            assert_sound(&g, &exhaustive());
        }
    }
    #[test]
    fn the_maximum_weight_loop_disables_an_unproductive_ans_test() {
        // 0 and 2 are both adjacent to 1 and to each other
        let mut g = Graph::new(4, Variant::Mw);
        g.add_edge(0, 1, 0.0);
        g.add_edge(1, 2, 0.0);
        g.add_edge(0, 2, 0.0);
        g.add_edge(2, 3, 0.0);
        g.set_weight(0, 1.0);
        g.set_weight(1, -1.0);
        g.set_weight(2, -1.0);
        g.set_weight(3, 4.0);
        let config = ReduceConfigBuilder::default().min_elims(100).build().unwrap();
        let outcome = reduce(&mut g, &config, &NoCutoff).unwrap();
        assert_eq!(1, outcome.history.calls(Technique::Ans));
        assert_eq!(2, outcome.history.eliminations(Technique::Ans));
        assert_eq!(0, g.degree(1));
        assert_eq!(Some(-4.0), brute_force(&g));
    }
    #[test]
    fn the_arborescence_loop_preserves_the_optimum() {
        let mut rng = StdRng::seed_from_u64(53);
        for _ in 0..25 {
            let g = random_sap(&mut rng, 6, 3, 2);
            let mut reduced = g.clone();
            let outcome = reduce(&mut reduced, &exhaustive(), &NoCutoff).unwrap();
            assert_eq!(0.0, outcome.offset);
            assert!(outcome.history.calls(Technique::SapDegree) >= 1);
            if !outcome.infeasible {
                assert_eq!(brute_force_sap(&g), brute_force_sap(&reduced));
            } else {
                assert_eq!(None, brute_force_sap(&g));
            }
        }
    }
    #[test]
    fn the_arborescence_loop_bypasses_single_paths() {
        // 0 -> 1 -> 2 -> 3 with a shortcut 0 -> 3 and a dead end 1 -> 4
        let mut g = Graph::new(5, Variant::Sap);
        g.add_arc_pair(0, 1, 1.0, f64::INFINITY);
        g.add_arc_pair(1, 2, 1.0, f64::INFINITY);
        g.add_arc_pair(2, 3, 1.0, f64::INFINITY);
        g.add_arc_pair(0, 3, 5.0, f64::INFINITY);
        g.add_arc_pair(1, 4, 2.0, f64::INFINITY);
        g.set_terminal(0);
        g.set_terminal(3);
        let outcome = reduce(&mut g, &ReduceConfig::default(), &NoCutoff).unwrap();
        assert!(!outcome.infeasible);
        assert!(outcome.history.eliminations(Technique::SapDegree) >= 2);
        assert_eq!(0, g.degree(2));
        assert_eq!(0, g.degree(4));
        assert_eq!(Some(3.0), brute_force_sap(&g));
    }
    #[test]
    fn an_exhaustive_reduction_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(59);
        for _ in 0..15 {
            let g = random_stp(&mut rng, 12, 10, 4);
            let (mut reduced, _) = assert_sound(&g, &exhaustive());
            let again = reduce(&mut reduced, &exhaustive(), &NoCutoff).unwrap();
            assert_eq!(0, again.nelims);
            assert_eq!(0.0, again.offset);
        }
    }
    #[test]
    fn the_level_none_only_sweeps_the_graph() {
        let mut g = Graph::new(4, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        g.set_terminal(0);
        g.set_terminal(2);
        g.add_edge(2, 3, 1.0);
        let config = ReduceConfigBuilder::default().level(ReductionLevel::None).build().unwrap();
        let outcome = reduce(&mut g, &config, &NoCutoff).unwrap();
        assert_eq!(0, outcome.nelims);
        assert_eq!(3, g.nb_edges());
        assert_eq!(0, outcome.history.total());
    }
    #[test]
    fn unreachable_terminals_make_the_instance_infeasible() {
        let mut g = Graph::new(4, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        g.add_edge(2, 3, 1.0);
        g.set_terminal(0);
        g.set_terminal(3);
        let outcome = reduce(&mut g, &ReduceConfig::default(), &NoCutoff).unwrap();
        assert!(outcome.infeasible);
    }
    #[test]
    fn an_expired_deadline_leaves_the_graph_untouched() {
        let mut rng = StdRng::seed_from_u64(61);
        let g = random_stp(&mut rng, 12, 10, 4);
        let mut reduced = g.clone();
        let outcome = reduce(&mut reduced, &ReduceConfig::default(), &TimeBudget::new(Duration::ZERO)).unwrap();
        assert!(outcome.stopped);
        assert_eq!(0, outcome.nelims);
        assert_eq!(0.0, outcome.offset);
        assert_eq!(g.nb_edges(), reduced.nb_edges());
        assert_eq!(g.terminals(), reduced.terminals());
    }
    #[test]
    fn the_history_accounts_for_all_the_technique_eliminations() {
        let mut rng = StdRng::seed_from_u64(67);
        let mut g = random_stp(&mut rng, 12, 10, 4);
        let outcome = reduce(&mut g, &ReduceConfig::default(), &NoCutoff).unwrap();
        assert!(outcome.history.total() <= outcome.nelims);
        assert!(outcome.history.calls(Technique::Degree) >= 1);
    }
    #[test]
    fn directed_instances_are_rejected_by_undirected_techniques() {
        let mut g = Graph::new(2, Variant::Sap);
        g.add_arc_pair(0, 1, 1.0, f64::INFINITY);
        g.set_terminal(0);
        g.set_terminal(1);
        assert!(matches!(DegreeTest.apply(&mut g), Err(StpError::UnsupportedVariant(Variant::Sap))));
        let outcome = reduce(&mut g, &ReduceConfig::default(), &NoCutoff).unwrap();
        assert!(!outcome.infeasible);
        assert_eq!(1, g.nb_edges());
    }
    #[test]
    fn a_terminal_only_reachable_against_the_arcs_makes_a_hop_constrained_instance_infeasible() {
        let mut g = Graph::new(3, Variant::Dhc);
        g.add_arc_pair(0, 1, 1.0, f64::INFINITY);
        g.add_arc_pair(2, 1, 1.0, f64::INFINITY);
        g.set_terminal(0);
        g.set_terminal(2);
        let outcome = reduce(&mut g, &ReduceConfig::default(), &NoCutoff).unwrap();
        assert!(outcome.infeasible);
        assert_eq!(0, outcome.history.total());
    }
    #[test]
    fn hop_constrained_instances_only_lose_what_can_not_be_reached() {
        let mut g = Graph::new(4, Variant::Dhc);
        g.add_arc_pair(0, 1, 1.0, f64::INFINITY);
        g.add_arc_pair(1, 2, 1.0, f64::INFINITY);
        g.add_arc_pair(3, 0, 1.0, f64::INFINITY);
        g.set_terminal(0);
        g.set_terminal(2);
        let outcome = reduce(&mut g, &ReduceConfig::default(), &NoCutoff).unwrap();
        assert!(!outcome.infeasible);
        assert_eq!(1, outcome.nelims);
        assert_eq!(2, g.nb_edges());
        assert_eq!(0, g.degree(3));
        assert_eq!(0, outcome.history.total());
    }
    #[test]
    fn degree_constrained_instances_only_get_the_level_zero_sweeps() {
        // the steiner leaf 3 would be deleted by the degree test
        let mut g = Graph::new(4, Variant::Dc);
        g.add_edge(0, 1, 1.0);
        g.add_edge(1, 2, 1.0);
        g.add_edge(1, 3, 1.0);
        g.set_terminal(0);
        g.set_terminal(2);
        let outcome = reduce(&mut g, &ReduceConfig::default(), &NoCutoff).unwrap();
        assert!(!outcome.infeasible);
        assert_eq!(0, outcome.nelims);
        assert_eq!(3, g.nb_edges());

        let mut g = Graph::new(4, Variant::Dc);
        g.add_edge(0, 1, 1.0);
        g.add_edge(2, 3, 1.0);
        g.set_terminal(0);
        g.set_terminal(3);
        assert!(reduce(&mut g, &ReduceConfig::default(), &NoCutoff).unwrap().infeasible);
    }
}
