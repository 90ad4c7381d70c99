use crate::node::Node;

/// Disjoint-set forest over the nodes `0..n` with path compression and union by rank
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<Node>,
    rank: Vec<u8>,
    num_sets: usize,
}

impl UnionFind {
    /// Creates `n` singleton sets
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n as Node).collect(),
            rank: vec![0; n],
            num_sets: n,
        }
    }

    /// Returns the representative of the set containing `u`
    pub fn find(&mut self, u: Node) -> Node {
        let mut root = u;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }

        let mut cur = u;
        while cur != root {
            let next = self.parent[cur as usize];
            self.parent[cur as usize] = root;
            cur = next;
        }

        root
    }

    /// Merges the sets of `u` and `v`.
    /// Returns *false* if they were in the same set already.
    pub fn union(&mut self, u: Node, v: Node) -> bool {
        let (ru, rv) = (self.find(u), self.find(v));
        if ru == rv {
            return false;
        }

        let (lo, hi) = if self.rank[ru as usize] < self.rank[rv as usize] {
            (ru, rv)
        } else {
            (rv, ru)
        };
        self.parent[lo as usize] = hi;
        if self.rank[lo as usize] == self.rank[hi as usize] {
            self.rank[hi as usize] += 1;
        }

        self.num_sets -= 1;
        true
    }

    pub fn same_set(&mut self, u: Node, v: Node) -> bool {
        self.find(u) == self.find(v)
    }

    pub fn num_sets(&self) -> usize {
        self.num_sets
    }
}
