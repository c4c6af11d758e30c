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

//! This module defines the graph of a Steiner problem instance along with all
//! the elementary editing operations the reductions are made of.

use crate::{NodeId, EdgeId, StpError};

// ----------------------------------------------------------------------------
// --- VARIANT ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The variant of the Steiner problem a graph is an instance of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Steiner tree problem in graphs
    Stp,
    /// Prize-collecting Steiner tree problem
    Pc,
    /// Rooted prize-collecting Steiner tree problem
    Rpc,
    /// Maximum-weight connected subgraph problem
    Mw,
    /// Steiner arborescence problem
    Sap,
    /// Hop-constrained directed Steiner tree problem
    Dhc,
    /// Degree-constrained Steiner tree problem
    Dc,
}
impl Variant {
    /// True for the prize-collecting variants
    pub fn is_prize_collecting(self) -> bool {
        matches!(self, Variant::Pc | Variant::Rpc)
    }
    /// True iff the arcs of the graph have a direction
    pub fn is_directed(self) -> bool {
        matches!(self, Variant::Sap | Variant::Dhc)
    }
    /// True iff every solution must contain the source node
    pub fn is_rooted(self) -> bool {
        !matches!(self, Variant::Pc | Variant::Mw)
    }
}

// ----------------------------------------------------------------------------
// --- NODE KIND --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The role of a node in the instance.
///
/// The variants are ordered: when two nodes are merged, the resulting node
/// takes the greatest of both kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeKind {
    /// A node which may or may not be part of a solution (Steiner node)
    Steiner,
    /// A node with a positive prize (prize-collecting variants) or a positive
    /// weight (maximum-weight variant). It may be left out of a solution.
    Potential,
    /// A node which must be part of every solution
    Terminal,
}

// ----------------------------------------------------------------------------
// --- GRAPH ------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// An edge of the original graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginalEdge {
    pub tail: NodeId,
    pub head: NodeId,
    pub cost: f64,
}

/// The graph of a Steiner problem instance.
///
/// Edges are stored in an arena: deleting an edge only marks it as dead and
/// removes it from the adjacency lists of its endpoints, the ids of all other
/// edges remain valid. Each edge has a tail and a head; the cost of going from
/// the tail to the head may differ from the cost of the opposite direction in
/// the directed variants (an infinite cost means the arc does not exist).
///
/// Next to the current graph, the history of the reductions is maintained:
/// * every edge knows the original edges it stands for (its ancestors);
/// * every node knows the original edges that have been contracted into it.
///   These belong to any solution containing the node.
#[derive(Debug, Clone)]
pub struct Graph {
    variant: Variant,
    source: Option<NodeId>,
    nterms: usize,
    nedges: usize,

    // -- nodes ---------------------------------------------------------------
    kind: Vec<NodeKind>,
    prize: Vec<f64>,
    adj: Vec<Vec<EdgeId>>,
    merged: Vec<Vec<EdgeId>>,

    // -- edges ---------------------------------------------------------------
    tail: Vec<NodeId>,
    head: Vec<NodeId>,
    cost: Vec<f64>,
    cost_rev: Vec<f64>,
    alive: Vec<bool>,
    ancestors: Vec<Vec<EdgeId>>,

    // -- original instance ---------------------------------------------------
    pub(crate) original: Vec<OriginalEdge>,
    pub(crate) original_kind: Vec<NodeKind>,
}

impl Graph {
    /// Creates a graph with `nnodes` isolated Steiner nodes
    pub fn new(nnodes: usize, variant: Variant) -> Self {
        Graph {
            variant,
            source: None,
            nterms: 0,
            nedges: 0,
            kind: vec![NodeKind::Steiner; nnodes],
            prize: vec![0.0; nnodes],
            adj: vec![vec![]; nnodes],
            merged: vec![vec![]; nnodes],
            tail: vec![],
            head: vec![],
            cost: vec![],
            cost_rev: vec![],
            alive: vec![],
            ancestors: vec![],
            original: vec![],
            original_kind: vec![NodeKind::Steiner; nnodes],
        }
    }

    // ------------------------------------------------------------------------
    // -- instance definition -------------------------------------------------
    // ------------------------------------------------------------------------
    /// Adds an undirected edge of the original instance
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, cost: f64) -> EdgeId {
        self.add_arc_pair(u, v, cost, cost)
    }
    /// Adds an edge of the original instance whose cost depends on the
    /// direction in which it is traversed
    pub fn add_arc_pair(&mut self, u: NodeId, v: NodeId, cost_uv: f64, cost_vu: f64) -> EdgeId {
        let id = self.original.len();
        self.original.push(OriginalEdge { tail: u, head: v, cost: cost_uv.min(cost_vu) });
        self.insert_edge(u, v, cost_uv, cost_vu, vec![id])
    }
    /// Makes v a terminal. The first terminal is the default source.
    pub fn set_terminal(&mut self, v: NodeId) {
        self.original_kind[v] = NodeKind::Terminal;
        self.set_kind(v, NodeKind::Terminal);
        if self.source.is_none() {
            self.source = Some(v);
        }
    }
    /// Gives a prize to v (prize-collecting variants)
    pub fn set_potential(&mut self, v: NodeId, prize: f64) {
        self.prize[v] = prize;
        if self.kind[v] != NodeKind::Terminal {
            let kind = if prize > 0.0 { NodeKind::Potential } else { NodeKind::Steiner };
            self.original_kind[v] = kind;
            self.set_kind(v, kind);
        }
    }
    /// Sets the weight of v (maximum-weight variant). Positive weights make
    /// potential nodes, non-positive ones Steiner nodes.
    pub fn set_weight(&mut self, v: NodeId, weight: f64) {
        self.set_potential(v, weight);
    }
    /// Sets the node which must be part of any solution of a rooted variant
    pub fn set_source(&mut self, v: NodeId) {
        self.source = Some(v);
    }

    // ------------------------------------------------------------------------
    // -- queries -------------------------------------------------------------
    // ------------------------------------------------------------------------
    pub fn variant(&self) -> Variant {
        self.variant
    }
    pub fn source(&self) -> Option<NodeId> {
        self.source
    }
    pub fn nb_nodes(&self) -> usize {
        self.kind.len()
    }
    /// The number of alive edges
    pub fn nb_edges(&self) -> usize {
        self.nedges
    }
    /// The number of edge ids ever handed out (dead edges included)
    pub fn edge_capacity(&self) -> usize {
        self.tail.len()
    }
    /// The number of nodes having at least one incident edge
    pub fn nb_active_nodes(&self) -> usize {
        self.adj.iter().filter(|a| !a.is_empty()).count()
    }
    pub fn nb_terminals(&self) -> usize {
        self.nterms
    }
    pub fn terminals(&self) -> Vec<NodeId> {
        (0..self.nb_nodes()).filter(|v| self.kind[*v] == NodeKind::Terminal).collect()
    }
    pub fn kind(&self, v: NodeId) -> NodeKind {
        self.kind[v]
    }
    pub fn is_terminal(&self, v: NodeId) -> bool {
        self.kind[v] == NodeKind::Terminal
    }
    pub fn prize(&self, v: NodeId) -> f64 {
        self.prize[v]
    }
    pub fn degree(&self, v: NodeId) -> usize {
        self.adj[v].len()
    }
    /// The alive edges incident to v
    pub fn incident(&self, v: NodeId) -> &[EdgeId] {
        &self.adj[v]
    }
    /// The original edges that have been contracted into v
    pub fn merged_into(&self, v: NodeId) -> &[EdgeId] {
        &self.merged[v]
    }
    /// Iterates over the ids of the alive edges
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edge_capacity()).filter(move |e| self.alive[*e])
    }
    pub fn is_alive(&self, e: EdgeId) -> bool {
        self.alive[e]
    }
    pub fn endpoints(&self, e: EdgeId) -> (NodeId, NodeId) {
        (self.tail[e], self.head[e])
    }
    /// The endpoint of e which is not v
    #[inline]
    pub fn opposite(&self, e: EdgeId, v: NodeId) -> NodeId {
        if self.tail[e] == v { self.head[e] } else { self.tail[e] }
    }
    /// The cost of e (in the undirected variants, the direction is irrelevant)
    #[inline]
    pub fn cost(&self, e: EdgeId) -> f64 {
        self.cost[e]
    }
    /// The cost of traversing e when leaving node `from`
    #[inline]
    pub fn cost_from(&self, e: EdgeId, from: NodeId) -> f64 {
        if self.tail[e] == from { self.cost[e] } else { self.cost_rev[e] }
    }
    pub fn ancestors(&self, e: EdgeId) -> &[EdgeId] {
        &self.ancestors[e]
    }
    /// Returns the alive edge connecting u and v (if any)
    pub fn find_edge(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        let (from, to) = if self.adj[u].len() <= self.adj[v].len() { (u, v) } else { (v, u) };
        self.adj[from].iter().copied().find(|e| self.opposite(*e, from) == to)
    }
    /// Returns true iff two alive edges connect the same pair of nodes
    pub fn has_parallel_edges(&self) -> bool {
        let mut seen = vec![usize::MAX; self.nb_nodes()];
        for v in 0..self.nb_nodes() {
            for e in self.adj[v].iter() {
                let w = self.opposite(*e, v);
                if seen[w] == v {
                    return true;
                }
                seen[w] = v;
            }
        }
        false
    }

    /// Checks the consistency of the graph
    pub fn validate(&self) -> Result<(), StpError> {
        let n = self.nb_nodes();
        if let Some(s) = self.source {
            if s >= n {
                return Err(StpError::InvalidGraph(format!("source {s} does not exist")));
            }
            if self.variant.is_rooted() && self.kind[s] != NodeKind::Terminal {
                return Err(StpError::InvalidGraph(format!("source {s} is not a terminal")));
            }
        } else if self.variant.is_rooted() && self.nterms > 0 {
            return Err(StpError::InvalidGraph("no source defined".to_string()));
        }
        let mut nedges = 0;
        for e in 0..self.edge_capacity() {
            let (t, h) = (self.tail[e], self.head[e]);
            if t >= n || h >= n {
                return Err(StpError::InvalidGraph(format!("edge {e} is dangling")));
            }
            if t == h {
                return Err(StpError::InvalidGraph(format!("edge {e} is a loop")));
            }
            if self.cost[e].is_nan() || self.cost_rev[e].is_nan() {
                return Err(StpError::InvalidGraph(format!("edge {e} has no cost")));
            }
            if self.variant != Variant::Mw && (self.cost[e] < 0.0 || self.cost_rev[e] < 0.0) {
                return Err(StpError::InvalidGraph(format!("edge {e} has a negative cost")));
            }
            let listed = self.adj[t].contains(&e) && self.adj[h].contains(&e);
            if self.alive[e] != listed {
                return Err(StpError::InvalidGraph(format!("edge {e} is inconsistently listed")));
            }
            if self.alive[e] {
                nedges += 1;
            }
        }
        if nedges != self.nedges {
            return Err(StpError::InvalidGraph("wrong number of edges".to_string()));
        }
        if self.adj.iter().flatten().any(|e| !self.alive[*e]) {
            return Err(StpError::InvalidGraph("dead edge in an adjacency list".to_string()));
        }
        if self.terminals().len() != self.nterms {
            return Err(StpError::InvalidGraph("wrong number of terminals".to_string()));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // -- editing -------------------------------------------------------------
    // ------------------------------------------------------------------------
    pub fn set_variant(&mut self, variant: Variant) {
        self.variant = variant;
    }
    /// Changes the kind of v (the original kind is left untouched)
    pub fn set_kind(&mut self, v: NodeId, kind: NodeKind) {
        if self.kind[v] == NodeKind::Terminal {
            self.nterms -= 1;
        }
        if kind == NodeKind::Terminal {
            self.nterms += 1;
        }
        self.kind[v] = kind;
    }
    pub fn set_prize(&mut self, v: NodeId, prize: f64) {
        self.prize[v] = prize;
    }
    /// Changes the cost of an undirected edge
    pub fn set_cost(&mut self, e: EdgeId, cost: f64) {
        self.cost[e]     = cost;
        self.cost_rev[e] = cost;
    }

    /// Creates a new edge standing for the given original edges
    pub fn insert_edge(&mut self, u: NodeId, v: NodeId, cost_uv: f64, cost_vu: f64, ancestors: Vec<EdgeId>) -> EdgeId {
        let id = self.tail.len();
        self.tail.push(u);
        self.head.push(v);
        self.cost.push(cost_uv);
        self.cost_rev.push(cost_vu);
        self.alive.push(true);
        self.ancestors.push(ancestors);
        self.adj[u].push(id);
        self.adj[v].push(id);
        self.nedges += 1;
        id
    }
    /// Connects u and v with an undirected edge of the given cost unless an
    /// edge at least as cheap already connects them. When the existing edge is
    /// more expensive, it is updated to the new cost and ancestors.
    ///
    /// Returns the id of the edge that was created or updated (if any).
    pub fn add_or_tighten(&mut self, u: NodeId, v: NodeId, cost: f64, ancestors: Vec<EdgeId>) -> Option<EdgeId> {
        match self.find_edge(u, v) {
            Some(e) if self.cost[e] <= cost => None,
            Some(e) => {
                self.set_cost(e, cost);
                self.ancestors[e] = ancestors;
                Some(e)
            },
            None => Some(self.insert_edge(u, v, cost, cost, ancestors))
        }
    }
    /// Deletes an alive edge
    pub fn delete_edge(&mut self, e: EdgeId) {
        debug_assert!(self.alive[e], "edge {e} deleted twice");
        let (t, h) = (self.tail[e], self.head[e]);
        self.adj[t].retain(|x| *x != e);
        self.adj[h].retain(|x| *x != e);
        self.alive[e] = false;
        self.nedges -= 1;
    }
    /// Deletes all the edges incident to v. Returns the number of deleted edges.
    pub fn delete_node(&mut self, v: NodeId) -> usize {
        let edges = std::mem::take(&mut self.adj[v]);
        for e in edges.iter().copied() {
            let w = self.opposite(e, v);
            self.adj[w].retain(|x| *x != e);
            self.alive[e] = false;
            self.nedges -= 1;
        }
        self.merged[v].clear();
        edges.len()
    }
    /// Replaces the Steiner node v which has exactly two incident edges by one
    /// single edge connecting its neighbors (whose ancestors are those of the
    /// path through v). Returns the edge that was created or updated if any.
    pub fn replace_by_edge(&mut self, v: NodeId) -> Option<EdgeId> {
        debug_assert_eq!(2, self.degree(v));
        let (e1, e2) = (self.adj[v][0], self.adj[v][1]);
        let u = self.opposite(e1, v);
        let w = self.opposite(e2, v);
        let cost = self.cost[e1] + self.cost[e2];
        let ancestors = self.path_ancestors(&[e1, e2], v);
        self.delete_node(v);
        if u == w {
            None
        } else {
            self.add_or_tighten(u, w, cost, ancestors)
        }
    }
    /// The original edges standing for a path that goes through v along the
    /// given edges.
    pub fn path_ancestors(&self, edges: &[EdgeId], v: NodeId) -> Vec<EdgeId> {
        let mut ancestors: Vec<EdgeId> = edges.iter()
            .flat_map(|e| self.ancestors[*e].iter().copied())
            .chain(self.merged[v].iter().copied())
            .collect();
        ancestors.sort_unstable();
        ancestors.dedup();
        ancestors
    }
    /// Contracts the edge e: the endpoint of e which is not `keep` is merged
    /// into `keep`. The ancestors of e (and everything that had previously been
    /// merged into the vanishing node) become part of any solution containing
    /// `keep`. The kind of the merged node is the greatest of both kinds and
    /// its prize is the sum of both prizes.
    ///
    /// When the merge produces parallel edges, only the cheapest survives.
    /// This operation is only meant for the undirected variants.
    pub fn contract_edge(&mut self, e: EdgeId, keep: NodeId) {
        debug_assert!(!self.variant.is_directed());
        let gone = self.opposite(e, keep);
        let mut merged = std::mem::take(&mut self.merged[gone]);
        merged.extend_from_slice(&self.ancestors[e]);
        self.merged[keep].append(&mut merged);
        self.delete_edge(e);

        let kind = self.kind[keep].max(self.kind[gone]);
        self.set_kind(gone, NodeKind::Steiner);
        self.set_kind(keep, kind);
        self.prize[keep] += self.prize[gone];
        self.prize[gone]  = 0.0;
        if self.source == Some(gone) {
            self.source = Some(keep);
        }

        let moved = std::mem::take(&mut self.adj[gone]);
        for f in moved {
            let w = self.opposite(f, gone);
            if w == keep {
                self.adj[keep].retain(|x| *x != f);
                self.alive[f] = false;
                self.nedges  -= 1;
                continue;
            }
            match self.find_edge(keep, w) {
                Some(g) => {
                    if self.cost[f] < self.cost[g] {
                        self.set_cost(g, self.cost[f]);
                        self.ancestors[g] = std::mem::take(&mut self.ancestors[f]);
                    }
                    self.adj[w].retain(|x| *x != f);
                    self.alive[f] = false;
                    self.nedges  -= 1;
                },
                None => {
                    if self.tail[f] == gone {
                        self.tail[f] = keep;
                    } else {
                        self.head[f] = keep;
                    }
                    self.adj[keep].push(f);
                }
            }
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
