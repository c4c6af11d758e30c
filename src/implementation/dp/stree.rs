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

//! This module provides the index of the partial solutions which have already
//! been expanded by the dynamic program. It answers the one question the
//! dynamic program asks over and over: which expanded partial solutions cover
//! terminals that are disjoint from a given subset, and share at least one
//! root node with it ?

use crate::{Bitset, StpError};

/// A node of the trie
#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: [Option<usize>; 2],
    entry: Option<usize>,
}

/// An entry of the index
#[derive(Debug, Clone)]
struct Entry {
    roots: Bitset,
    payload: usize,
}

/// The sub-solution index is a binary trie over the bits of the terminal
/// subsets: the node at depth `i` branches on the presence of terminal `i` in
/// the key. All keys have the same length, hence all the entries are stored at
/// depth `nb_terminals` and the trie is perfectly balanced with respect to the
/// key length. Each entry carries a bitset over the graph nodes (the roots
/// where the partial solution is anchored) and a payload (the id of the
/// partial solution).
///
/// Iterating over the trie always follows the key order of `Bitset`.
#[derive(Debug, Clone)]
pub struct SubsolTree {
    nterms: usize,
    nnodes: usize,
    nodes: Vec<TrieNode>,
    entries: Vec<Entry>,
}

impl SubsolTree {
    /// Creates an empty index for subsets of `nterms` terminals whose roots are
    /// subsets of `nnodes` nodes
    pub fn new(nterms: usize, nnodes: usize) -> Self {
        SubsolTree { nterms, nnodes, nodes: vec![TrieNode::default()], entries: vec![] }
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a new entry in the index. An index never holds two entries with
    /// the same key: trying to insert a duplicate fails and leaves the index
    /// untouched.
    pub fn insert(&mut self, terms: &Bitset, roots: Bitset, payload: usize) -> Result<(), StpError> {
        assert_eq!(self.nterms, terms.capacity(), "key capacity mismatch");
        assert_eq!(self.nnodes, roots.capacity(), "roots capacity mismatch");
        let mut current = 0;
        for bit in 0..self.nterms {
            let branch = terms.contains(bit) as usize;
            current = match self.nodes[current].children[branch] {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[current].children[branch] = Some(child);
                    child
                }
            };
        }
        if self.nodes[current].entry.is_some() {
            return Err(StpError::DuplicateKey);
        }
        self.nodes[current].entry = Some(self.entries.len());
        self.entries.push(Entry { roots, payload });
        Ok(())
    }

    /// Returns the payload of the entry having exactly the given key
    pub fn get(&self, terms: &Bitset) -> Option<usize> {
        let mut current = 0;
        for bit in 0..self.nterms {
            current = self.nodes[current].children[terms.contains(bit) as usize]?;
        }
        self.nodes[current].entry.map(|e| self.entries[e].payload)
    }

    /// Returns the roots of the entry having exactly the given key
    pub fn roots(&self, terms: &Bitset) -> Option<&Bitset> {
        let mut current = 0;
        for bit in 0..self.nterms {
            current = self.nodes[current].children[terms.contains(bit) as usize]?;
        }
        self.nodes[current].entry.map(|e| &self.entries[e].roots)
    }

    /// Lazily iterates over the payloads of all the entries whose key is
    /// disjoint from `exclude_terms` and whose roots intersect `include_roots`.
    /// The entries are visited in key order.
    pub fn collect_intersects<'a>(&'a self, include_roots: &'a Bitset, exclude_terms: &'a Bitset) -> Intersects<'a> {
        Intersects { tree: self, include_roots, exclude_terms, stack: vec![(0, 0)] }
    }
}

/// The lazy iterator returned by `SubsolTree::collect_intersects`. It performs
/// a depth first traversal of the trie which never enters a branch holding a
/// terminal of the excluded set.
pub struct Intersects<'a> {
    tree: &'a SubsolTree,
    include_roots: &'a Bitset,
    exclude_terms: &'a Bitset,
    /// (trie node, depth)
    stack: Vec<(usize, usize)>,
}
impl Iterator for Intersects<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while let Some((node, depth)) = self.stack.pop() {
            let trie = &self.tree.nodes[node];
            if depth == self.tree.nterms {
                if let Some(e) = trie.entry {
                    let entry = &self.tree.entries[e];
                    if entry.roots.intersects(self.include_roots) {
                        return Some(entry.payload);
                    }
                }
                continue;
            }
            if let Some(one) = trie.children[1] {
                if !self.exclude_terms.contains(depth) {
                    self.stack.push((one, depth + 1));
                }
            }
            if let Some(zero) = trie.children[0] {
                self.stack.push((zero, depth + 1));
            }
        }
        None
    }
}

#[cfg(test)]
mod test_subsol_tree {
    use crate::*;

    fn key(bits: &[usize]) -> Bitset {
        Bitset::from_bits(4, bits.iter().copied())
    }
    fn roots(bits: &[usize]) -> Bitset {
        Bitset::from_bits(10, bits.iter().copied())
    }

    #[test]
    fn by_default_it_is_empty() {
        let tree = SubsolTree::new(4, 10);
        assert!(tree.is_empty());
        assert_eq!(None, tree.get(&key(&[0])));
    }
    #[test]
    fn inserted_entries_can_be_found_again() {
        let mut tree = SubsolTree::new(4, 10);
        tree.insert(&key(&[0]), roots(&[1, 2]), 7).unwrap();
        tree.insert(&key(&[1, 3]), roots(&[5]), 8).unwrap();
        assert_eq!(2, tree.len());
        assert_eq!(Some(7), tree.get(&key(&[0])));
        assert_eq!(Some(8), tree.get(&key(&[1, 3])));
        assert_eq!(Some(&roots(&[5])), tree.roots(&key(&[1, 3])));
        assert_eq!(None, tree.get(&key(&[1])));
    }
    #[test]
    fn duplicate_keys_are_rejected() {
        let mut tree = SubsolTree::new(4, 10);
        tree.insert(&key(&[2]), roots(&[1]), 1).unwrap();
        assert_eq!(Err(StpError::DuplicateKey), tree.insert(&key(&[2]), roots(&[3]), 2));
        assert_eq!(1, tree.len());
        assert_eq!(Some(1), tree.get(&key(&[2])));
    }
    #[test]
    fn intersect_queries_only_yield_disjoint_keys_with_common_roots() {
        let mut tree = SubsolTree::new(4, 10);
        tree.insert(&key(&[0]),    roots(&[0, 1]), 0).unwrap();
        tree.insert(&key(&[1]),    roots(&[1, 2]), 1).unwrap();
        tree.insert(&key(&[2]),    roots(&[3]),    2).unwrap();
        tree.insert(&key(&[3]),    roots(&[1, 9]), 3).unwrap();
        tree.insert(&key(&[0, 1]), roots(&[1]),    4).unwrap();
        tree.insert(&key(&[2, 3]), roots(&[1]),    5).unwrap();

        let include = roots(&[1]);
        let exclude = key(&[0]);
        let mut found: Vec<usize> = tree.collect_intersects(&include, &exclude).collect();
        found.sort_unstable();
        assert_eq!(vec![1, 3, 5], found);

        let include = roots(&[3, 9]);
        let exclude = key(&[1]);
        let mut found: Vec<usize> = tree.collect_intersects(&include, &exclude).collect();
        found.sort_unstable();
        assert_eq!(vec![2, 3], found);
    }
    #[test]
    fn intersect_queries_follow_the_key_order() {
        let mut tree = SubsolTree::new(4, 10);
        let keys = [key(&[0]), key(&[1]), key(&[2]), key(&[3]), key(&[1, 2])];
        for (i, k) in keys.iter().enumerate() {
            tree.insert(k, roots(&[0]), i).unwrap();
        }
        let found: Vec<usize> = tree.collect_intersects(&roots(&[0]), &Bitset::new(4)).collect();
        let mut expected: Vec<usize> = (0..keys.len()).collect();
        expected.sort_by(|a, b| keys[*a].cmp(&keys[*b]));
        assert_eq!(expected, found);
    }
    #[test]
    fn an_exhausted_query_stays_exhausted() {
        let mut tree = SubsolTree::new(4, 10);
        tree.insert(&key(&[0]), roots(&[0]), 0).unwrap();
        let include = roots(&[0]);
        let exclude = Bitset::new(4);
        let mut query = tree.collect_intersects(&include, &exclude);
        assert_eq!(Some(0), query.next());
        assert_eq!(None, query.next());
        assert_eq!(None, query.next());
    }
}
