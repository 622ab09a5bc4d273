use priority_queue::PriorityQueue;
use std::cmp::Reverse;
use std::collections::VecDeque;

const INF: i64 = i64::MAX / 4;

/// Directed edge stored in its tail's adjacency list. `rev` indexes the
/// paired residual edge in `to`'s list.
#[derive(Clone, Debug)]
pub struct FlowEdge {
    pub to: usize,
    pub rev: usize,
    pub cap: i64,
    pub flow: i64,
    pub cost: i64,
}

impl FlowEdge {
    #[inline(always)]
    fn residual(&self) -> i64 {
        self.cap - self.flow
    }
}

/// Handle returned by [`FlowNetwork::add_edge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeRef {
    pub from: usize,
    pub index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FlowResult {
    pub flow: i64,
    pub cost: i64,
}

#[derive(Clone, Debug, Default)]
pub struct FlowNetwork {
    adj: Vec<Vec<FlowEdge>>,
    edge_count: usize,
}

impl FlowNetwork {
    pub fn new(nodes: usize) -> Self {
        Self {
            adj: vec![Vec::new(); nodes],
            edge_count: 0,
        }
    }

    pub fn add_node(&mut self) -> usize {
        self.adj.push(Vec::new());
        self.adj.len() - 1
    }

    pub fn num_nodes(&self) -> usize {
        self.adj.len()
    }

    /// Forward edges only; residual twins are not counted.
    pub fn num_edges(&self) -> usize {
        self.edge_count
    }

    pub fn add_edge(&mut self, from: usize, to: usize, cap: i64, cost: i64) -> EdgeRef {
        let fwd = self.adj[from].len();
        let bwd = self.adj[to].len() + usize::from(from == to);
        self.adj[from].push(FlowEdge {
            to,
            rev: bwd,
            cap,
            flow: 0,
            cost,
        });
        self.adj[to].push(FlowEdge {
            to: from,
            rev: fwd,
            cap: 0,
            flow: 0,
            cost: -cost,
        });
        self.edge_count += 1;
        EdgeRef { from, index: fwd }
    }

    pub fn edge(&self, e: EdgeRef) -> &FlowEdge {
        &self.adj[e.from][e.index]
    }

    pub fn edges_from(&self, v: usize) -> &[FlowEdge] {
        &self.adj[v]
    }

    /// Net flow leaving `v` over forward edges minus flow entering it.
    pub fn excess(&self, v: usize) -> i64 {
        self.adj[v]
            .iter()
            .filter(|e| e.cap > 0)
            .map(|e| e.flow)
            .sum::<i64>()
            - self
                .adj
                .iter()
                .flat_map(|list| list.iter())
                .filter(|e| e.to == v && e.cap > 0)
                .map(|e| e.flow)
                .sum::<i64>()
    }

    /// Successive shortest augmenting paths from `s` to `t`.
    ///
    /// Initial potentials come from Bellman-Ford (SPFA) so negative edge costs
    /// are allowed as long as there is no negative cycle; each round then runs
    /// Dijkstra on reduced costs.
    pub fn min_cost_max_flow(&mut self, s: usize, t: usize) -> FlowResult {
        let n = self.adj.len();
        let mut result = FlowResult::default();
        if s == t || s >= n || t >= n {
            return result;
        }

        let mut potential = self.spfa(s);
        for p in potential.iter_mut() {
            if *p >= INF {
                *p = 0;
            }
        }

        let mut dist = vec![INF; n];
        let mut prev: Vec<Option<(usize, usize)>> = vec![None; n];
        let mut rounds = 0usize;

        loop {
            dist.fill(INF);
            prev.fill(None);
            dist[s] = 0;

            let mut pq = PriorityQueue::new();
            pq.push(s, Reverse(0i64));
            while let Some((u, Reverse(d))) = pq.pop() {
                if d > dist[u] {
                    continue;
                }
                for (i, e) in self.adj[u].iter().enumerate() {
                    if e.residual() <= 0 {
                        continue;
                    }
                    let reduced = e.cost + potential[u] - potential[e.to];
                    let nd = d + reduced;
                    if nd < dist[e.to] {
                        dist[e.to] = nd;
                        prev[e.to] = Some((u, i));
                        pq.push(e.to, Reverse(nd));
                    }
                }
            }

            if dist[t] >= INF {
                break;
            }
            for v in 0..n {
                if dist[v] < INF {
                    potential[v] += dist[v];
                }
            }

            let mut push = INF;
            let mut v = t;
            while let Some((u, i)) = prev[v] {
                push = push.min(self.adj[u][i].residual());
                v = u;
            }

            let mut v = t;
            while let Some((u, i)) = prev[v] {
                let rev = self.adj[u][i].rev;
                self.adj[u][i].flow += push;
                result.cost += push * self.adj[u][i].cost;
                self.adj[v][rev].flow -= push;
                v = u;
            }
            result.flow += push;
            rounds += 1;
        }

        log::debug!(
            "Min-cost flow: {} units, cost {}, {} augmentations over {} nodes",
            result.flow,
            result.cost,
            rounds,
            n
        );
        result
    }

    fn spfa(&self, s: usize) -> Vec<i64> {
        let n = self.adj.len();
        let mut dist = vec![INF; n];
        let mut in_queue = vec![false; n];
        let mut queue = VecDeque::new();
        dist[s] = 0;
        queue.push_back(s);
        in_queue[s] = true;

        while let Some(u) = queue.pop_front() {
            in_queue[u] = false;
            for e in &self.adj[u] {
                if e.residual() <= 0 {
                    continue;
                }
                let nd = dist[u] + e.cost;
                if nd < dist[e.to] {
                    dist[e.to] = nd;
                    if !in_queue[e.to] {
                        in_queue[e.to] = true;
                        queue.push_back(e.to);
                    }
                }
            }
        }
        dist
    }
}
