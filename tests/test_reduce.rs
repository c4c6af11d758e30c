#![cfg(test)]
extern crate steiner_dp;

use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use steiner_dp::*;

/// The 6-cycle with costs 1..6 and every other node being a terminal
fn hexagon() -> Graph {
    let mut graph = Graph::new(6, Variant::Stp);
    for v in 0..6 {
        graph.add_edge(v, (v + 1) % 6, (v + 1) as f64);
    }
    graph.set_terminal(0);
    graph.set_terminal(2);
    graph.set_terminal(4);
    graph
}

/// A random connected instance: a random spanning tree plus a few chords
fn random_instance(rng: &mut StdRng, nnodes: usize, extra: usize, nterms: usize) -> Graph {
    let mut graph = Graph::new(nnodes, Variant::Stp);
    for v in 1..nnodes {
        let u = rng.gen_range(0..v);
        graph.add_edge(u, v, rng.gen_range(1..=20) as f64);
    }
    for _ in 0..extra {
        let u = rng.gen_range(0..nnodes);
        let v = rng.gen_range(0..nnodes);
        if u != v && graph.find_edge(u, v).is_none() {
            graph.add_edge(u, v, rng.gen_range(1..=20) as f64);
        }
    }
    let nodes: Vec<usize> = (0..nnodes).collect();
    for t in nodes.choose_multiple(rng, nterms) {
        graph.set_terminal(*t);
    }
    graph
}

fn optimum(graph: &Graph) -> f64 {
    let (completion, _) = solve_dp(graph, &NoCutoff).unwrap();
    assert!(completion.is_exact);
    completion.best_value.unwrap()
}

fn exhaustive() -> ReduceConfig {
    ReduceConfigBuilder::default()
        .min_elims(0)
        .extensive(true)
        .max_rounds(1000)
        .build()
        .unwrap()
}

#[test]
fn hexagon_end_to_end() {
    let mut graph = hexagon();
    let outcome = reduce(&mut graph, &ReduceConfig::default(), &NoCutoff).unwrap();
    assert!(!outcome.infeasible);
    assert!(!outcome.stopped);

    // the degree test alone takes the whole cycle apart
    assert!(outcome.history.eliminations(Technique::Degree) > 0);
    assert_eq!(outcome.history.total(), outcome.history.eliminations(Technique::Degree));
    assert_eq!(outcome.nelims, outcome.history.eliminations(Technique::Degree));
    assert_eq!(10.0, outcome.offset);
    assert_eq!(0, graph.nb_edges());

    let (completion, solution) = solve_dp(&graph, &NoCutoff).unwrap();
    assert!(completion.is_exact);
    assert_eq!(Some(10.0), completion.best_value.map(|v| v + outcome.offset));

    let edges = graph.original_solution(&solution.unwrap());
    assert_eq!(vec![0, 1, 2, 3], edges);
    assert_eq!(10.0, graph.original_cost(&edges));
}

#[test]
fn reductions_preserve_the_optimum() {
    let mut rng = StdRng::seed_from_u64(2020);
    for _ in 0..40 {
        let original = random_instance(&mut rng, 30, 40, 6);
        let expected = optimum(&original);
        for config in [ReduceConfig::default(), exhaustive()] {
            let mut graph = original.clone();
            let outcome = reduce(&mut graph, &config, &NoCutoff).unwrap();
            assert!(!outcome.infeasible);

            let (completion, solution) = solve_dp(&graph, &NoCutoff).unwrap();
            let actual = completion.best_value.unwrap() + outcome.offset;
            assert!((expected - actual).abs() < 1e-6, "expected {expected} got {actual}");

            // the solution maps back onto a tree of the original graph
            let edges = graph.original_solution(&solution.unwrap());
            assert!((expected - original.original_cost(&edges)).abs() < 1e-6);
        }
    }
}

#[test]
fn reductions_are_idempotent() {
    let mut rng = StdRng::seed_from_u64(2021);
    for _ in 0..20 {
        let mut graph = random_instance(&mut rng, 30, 40, 6);
        reduce(&mut graph, &exhaustive(), &NoCutoff).unwrap();
        let nedges = graph.nb_edges();
        let again  = reduce(&mut graph, &exhaustive(), &NoCutoff).unwrap();
        assert_eq!(0, again.nelims);
        assert_eq!(0.0, again.offset);
        assert_eq!(nedges, graph.nb_edges());
    }
}

#[test]
fn expired_deadline() {
    let mut rng = StdRng::seed_from_u64(2022);
    let original = random_instance(&mut rng, 30, 40, 6);
    let mut graph = original.clone();
    let outcome = reduce(&mut graph, &ReduceConfig::default(), &TimeBudget::new(Duration::ZERO)).unwrap();
    assert!(outcome.stopped);
    assert_eq!(0, outcome.nelims);
    assert_eq!(0.0, outcome.offset);
    assert_eq!(original.nb_edges(), graph.nb_edges());
    assert!(original.edges().eq(graph.edges()));
}

#[test]
fn interrupt_or_deadline() {
    let interrupt = Interrupt::default();
    let cutoff = AnyCutoff::new(TimeBudget::new(Duration::from_secs(3600)), interrupt.clone());
    interrupt.interrupt();
    let mut graph = hexagon();
    let outcome = reduce(&mut graph, &ReduceConfig::default(), &cutoff).unwrap();
    assert!(outcome.stopped);
    assert_eq!(6, graph.nb_edges());
}

#[test]
fn invalid_graph() {
    let mut graph = Graph::new(2, Variant::Stp);
    graph.add_edge(0, 1, -1.0);
    graph.set_terminal(0);
    graph.set_terminal(1);
    let result = reduce(&mut graph, &ReduceConfig::default(), &NoCutoff);
    assert!(matches!(result, Err(StpError::InvalidGraph(_))));
}
