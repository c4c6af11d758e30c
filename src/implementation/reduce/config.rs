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

//! This module defines the parameters of the reduction loops.

use derive_builder::Builder;

use crate::{Graph, StpError, Variant};

/// How hard the reduction loop should try
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReductionLevel {
    /// No reduction at all (only the level 0 sweeps)
    None,
    /// The cheap techniques only
    Basic,
    /// All the techniques
    Advanced,
}

/// The parameters of the reduction loops. All of them have a sensible default
/// value, so that a configuration is typically built as follows:
///
/// ```
/// # use steiner_dp::*;
/// let config = ReduceConfigBuilder::default()
///     .max_rounds(5)
///     .dual_ascent(false)
///     .build()
///     .unwrap();
/// assert_eq!(5, config.max_rounds);
/// assert_eq!(3, config.min_elims);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ReduceConfig {
    #[builder(default="ReductionLevel::Advanced")]
    pub level: ReductionLevel,
    /// A technique is disabled as soon as it eliminates no more than
    /// max(min_elims, |E| / 1000) edges
    #[builder(default="3")]
    pub min_elims: usize,
    /// The maximum number of rounds of a reduction loop
    #[builder(default="15")]
    pub max_rounds: usize,
    /// The work limit of the path based tests in the first round
    #[builder(default="200")]
    pub sdsp_bound: usize,
    /// The work limit of the path based tests in the later rounds
    #[builder(default="1000")]
    pub sdsp_bound2: usize,
    /// The work limit of the bottleneck degree 3 test
    #[builder(default="500")]
    pub bd3_bound: usize,
    /// The number of edges above which the work limits grow slower
    #[builder(default="200000")]
    pub edge_limit: usize,
    /// Factor applied to the elimination bound of the expensive techniques
    #[builder(default="2")]
    pub ex_factor: usize,
    /// The bound test is only used on graphs whose density is lower
    #[builder(default="0.03")]
    pub bound_density: f64,
    /// Keep reducing as long as anything gets eliminated
    #[builder(default="false")]
    pub extensive: bool,
    #[builder(default="true")]
    pub node_replacing: bool,
    #[builder(default="true")]
    pub dual_ascent: bool,
    /// Allow one restart of the loop when a round is fruitful
    #[builder(default="true")]
    pub full_reduce: bool,
    /// Turn unrooted prize-collecting instances into rooted ones when possible
    #[builder(default="true")]
    pub try_rooted: bool,
    /// The number of roots of the extended dual ascent
    #[builder(default="5")]
    pub da_roots: usize,
    /// The seed of the random choices (the same seed gives the same result)
    #[builder(default="1")]
    pub seed: u64,
    /// Log the eliminations at the `info` level instead of `debug`
    #[builder(default="false")]
    pub verbose: bool,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        ReduceConfig {
            level: ReductionLevel::Advanced,
            min_elims: 3,
            max_rounds: 15,
            sdsp_bound: 200,
            sdsp_bound2: 1000,
            bd3_bound: 500,
            edge_limit: 200_000,
            ex_factor: 2,
            bound_density: 0.03,
            extensive: false,
            node_replacing: true,
            dual_ascent: true,
            full_reduce: true,
            try_rooted: true,
            da_roots: 5,
            seed: 1,
            verbose: false,
        }
    }
}

impl ReduceConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(d) = self.bound_density {
            if !(0.0..=1.0).contains(&d) {
                return Err(format!("bound density {d} is not in [0, 1]"));
            }
        }
        if self.ex_factor == Some(0) {
            return Err("ex_factor must be positive".to_string());
        }
        Ok(())
    }
}

impl From<ReduceConfigBuilderError> for StpError {
    fn from(e: ReduceConfigBuilderError) -> Self {
        StpError::Config(e.to_string())
    }
}

impl ReduceConfig {
    /// Below this number of eliminations, a technique is considered useless
    pub fn reduction_bound(&self, graph: &Graph) -> usize {
        let size = match graph.variant() {
            Variant::Pc | Variant::Rpc | Variant::Mw => graph.nb_nodes(),
            _ => graph.nb_edges(),
        };
        (size / 1000).max(self.min_elims)
    }

    /// The work limit of a path based test: `first` is the limit of the first
    /// round, `later` the limit of the subsequent ones. Both grow with the
    /// square root of the number of edges.
    pub fn work_limit(&self, graph: &Graph, round: usize, first: usize, later: usize) -> usize {
        let limit  = (if round > 0 { later } else { first }) as f64;
        let sqrt_e = (graph.nb_edges() as f64).sqrt();
        let scaled = if graph.nb_edges() >= self.edge_limit && round == 0 {
            limit * sqrt_e / 5000.0
        } else {
            limit * sqrt_e / 150.0
        };
        limit.max(scaled) as usize
    }
}

#[cfg(test)]
mod test_config {
    use crate::*;

    #[test]
    fn the_builder_defaults_match_the_default_configuration() {
        let built = ReduceConfigBuilder::default().build().unwrap();
        let dflt  = ReduceConfig::default();
        assert_eq!(dflt.level, built.level);
        assert_eq!(dflt.min_elims, built.min_elims);
        assert_eq!(dflt.max_rounds, built.max_rounds);
        assert_eq!(dflt.sdsp_bound, built.sdsp_bound);
        assert_eq!(dflt.sdsp_bound2, built.sdsp_bound2);
        assert_eq!(dflt.bd3_bound, built.bd3_bound);
        assert_eq!(dflt.edge_limit, built.edge_limit);
        assert_eq!(dflt.ex_factor, built.ex_factor);
        assert_eq!(dflt.bound_density, built.bound_density);
        assert_eq!(dflt.seed, built.seed);
        assert_eq!(dflt.da_roots, built.da_roots);
    }
    #[test]
    fn an_invalid_density_is_rejected() {
        let err = ReduceConfigBuilder::default().bound_density(1.5).build();
        assert!(err.is_err());
        let err: StpError = err.unwrap_err().into();
        assert!(matches!(err, StpError::Config(_)));
    }
    #[test]
    fn the_reduction_bound_is_at_least_min_elims() {
        let mut g = Graph::new(3, Variant::Stp);
        g.add_edge(0, 1, 1.0);
        let config = ReduceConfig::default();
        assert_eq!(3, config.reduction_bound(&g));
    }
    #[test]
    fn the_work_limit_depends_on_the_round_and_grows_with_the_graph() {
        let mut g = Graph::new(400, Variant::Stp);
        for v in 1..400 {
            g.add_edge(v - 1, v, 1.0);
        }
        let config = ReduceConfig::default();
        assert_eq!(200, config.work_limit(&g, 0, 200, 1000));
        assert_eq!(1000, config.work_limit(&g, 1, 200, 1000));

        let mut big = Graph::new(40_001, Variant::Stp);
        for v in 1..=40_000 {
            big.add_edge(v - 1, v, 1.0);
        }
        // sqrt(40000) = 200
        assert_eq!(266, config.work_limit(&big, 0, 200, 1000));
    }
}
