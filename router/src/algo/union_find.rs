use pcb_common::geom::Coordinate;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Disjoint sets over arbitrary handles. Unknown handles are singleton sets.
pub struct UnionFind<T> {
    parent: HashMap<T, T>,
}

impl<T: Copy + Eq + Hash> UnionFind<T> {
    pub fn new() -> Self {
        Self {
            parent: HashMap::new(),
        }
    }

    pub fn find(&mut self, x: T) -> T {
        let mut root = x;
        while let Some(&p) = self.parent.get(&root) {
            if p == root {
                break;
            }
            root = p;
        }

        // Second pass points every node on the walk straight at the root.
        let mut node = x;
        while node != root {
            let next = self.parent.get(&node).copied().unwrap_or(root);
            self.parent.insert(node, root);
            node = next;
        }
        root
    }

    /// Merges the set of `a` into the set of `b`.
    pub fn unite(&mut self, a: T, b: T) {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a != root_b {
            self.parent.insert(root_a, root_b);
        }
    }

    pub fn connected(&mut self, a: T, b: T) -> bool {
        self.find(a) == self.find(b)
    }
}

impl<T: Copy + Eq + Hash> Default for UnionFind<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedEdge<T> {
    pub a: T,
    pub b: T,
    pub distance: f64,
}

/// Minimum spanning forest by Kruskal's algorithm.
pub fn kruskal_mst<T: Copy + Eq + Hash>(edges: &[WeightedEdge<T>]) -> Vec<WeightedEdge<T>> {
    let mut sorted = edges.to_vec();
    sorted.sort_by(|x, y| {
        x.distance
            .partial_cmp(&y.distance)
            .unwrap_or(Ordering::Equal)
    });

    let mut uf = UnionFind::new();
    let mut mst = Vec::new();
    for edge in sorted {
        if uf.find(edge.a) != uf.find(edge.b) {
            uf.unite(edge.a, edge.b);
            mst.push(edge);
        }
    }
    mst
}

/// Complete graph over a point set, addressed by slice index.
pub fn point_edges(points: &[Coordinate]) -> Vec<WeightedEdge<usize>> {
    let mut edges = Vec::new();
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            edges.push(WeightedEdge {
                a: i,
                b: j,
                distance: points[i].distance(&points[j]),
            });
        }
    }
    edges
}
