//! This module implements the A* search used for single segments. It follows the shape of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
//! but keeps an explicit arena of search nodes, since a cell may be pushed several times with
//! different parents when relaxation is turned off.
use fxhash::{FxHashMap, FxHashSet};
use log::{debug, warn};
use num_traits::Float;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// A node created during one search. Parents always precede their children in the arena.
#[derive(Clone, Debug)]
pub struct SearchNode<N, C> {
    pub node: N,
    pub parent: Option<usize>,
    pub g: C,
    pub h: C,
    pub f: C,
}

/// Open set entry. The arena index doubles as insertion sequence number for tie-breaking.
struct SmallestCostHolder<K> {
    estimated_cost: K,
    index: usize,
}

impl<K: PartialOrd> Eq for SmallestCostHolder<K> {}

impl<K: PartialOrd> PartialEq for SmallestCostHolder<K> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<K: PartialOrd> PartialOrd for SmallestCostHolder<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: PartialOrd> Ord for SmallestCostHolder<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: smaller estimates and then earlier insertions compare greater
        match other
            .estimated_cost
            .partial_cmp(&self.estimated_cost)
            .unwrap_or(Ordering::Equal)
        {
            Ordering::Equal => other.index.cmp(&self.index),
            s => s,
        }
    }
}

/// Holds the open set, closed set and node arena of a search. A context can be reused across
/// searches; [astar](Self::astar) clears it before starting.
#[derive(Clone, Debug)]
pub struct SearchContext<N, C> {
    pub nodes: Vec<SearchNode<N, C>>,
    pub closed: FxHashSet<N>,
    /// When set, a cell is only pushed if it improves on the best known cost to it, and entries
    /// made stale by such an improvement are skipped when popped.
    pub relax: bool,
    /// Number of nodes popped and expanded during the last search.
    pub expanded: usize,
    best_cost: FxHashMap<N, C>,
}

impl<N, C> Default for SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Float,
{
    fn default() -> Self {
        SearchContext::new()
    }
}

impl<N, C> SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Float,
{
    pub fn new() -> SearchContext<N, C> {
        SearchContext {
            nodes: Vec::new(),
            closed: FxHashSet::default(),
            relax: false,
            expanded: 0,
            best_cost: FxHashMap::default(),
        }
    }

    pub fn with_relaxation(relax: bool) -> SearchContext<N, C> {
        SearchContext {
            relax,
            ..SearchContext::new()
        }
    }

    /// Number of nodes created during the last search, the start node included.
    pub fn pushed(&self) -> usize {
        self.nodes.len()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.closed.clear();
        self.best_cost.clear();
        self.expanded = 0;
    }

    /// Follows parent links from `index` back to the root and returns the nodes in root-first order.
    fn reverse_path(&self, index: usize) -> Vec<N> {
        let mut path: Vec<N> = std::iter::successors(Some(index), |&ix| self.nodes[ix].parent)
            .map(|ix| self.nodes[ix].node.clone())
            .collect();
        path.reverse();
        path
    }

    /// Searches from `start` until a node satisfying `success` is popped. `successors` yields the
    /// expandable neighbours of a node, `cost` the cost of moving between two neighbours and
    /// `heuristic` the estimated remaining cost. Returns the path and its accumulated cost.
    pub fn astar<FN, IN, FC, FH, FS>(
        &mut self,
        start: &N,
        mut successors: FN,
        mut cost: FC,
        mut heuristic: FH,
        mut success: FS,
    ) -> Option<(Vec<N>, C)>
    where
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = N>,
        FC: FnMut(&N, &N) -> C,
        FH: FnMut(&N) -> C,
        FS: FnMut(&N) -> bool,
    {
        self.clear();
        let mut to_see = BinaryHeap::new();
        let h = heuristic(start);
        self.nodes.push(SearchNode {
            node: start.clone(),
            parent: None,
            g: C::zero(),
            h,
            f: h,
        });
        to_see.push(SmallestCostHolder {
            estimated_cost: h,
            index: 0,
        });
        if self.relax {
            self.best_cost.insert(start.clone(), C::zero());
        }

        while let Some(SmallestCostHolder { index, .. }) = to_see.pop() {
            let (current, g) = {
                let entry = &self.nodes[index];
                (entry.node.clone(), entry.g)
            };
            if success(&current) {
                debug!(
                    "Goal popped after {} expansions, {} nodes created",
                    self.expanded,
                    self.nodes.len()
                );
                return Some((self.reverse_path(index), g));
            }
            if self.relax {
                // A cheaper route to this node was found after this entry was pushed
                let stale = self.closed.contains(&current)
                    || self.best_cost.get(&current).map_or(false, |&best| g > best);
                if stale {
                    continue;
                }
            }
            self.closed.insert(current.clone());
            self.expanded += 1;

            for successor in successors(&current) {
                if self.closed.contains(&successor) {
                    continue;
                }
                let new_g = g + cost(&current, &successor);
                if self.relax {
                    if self
                        .best_cost
                        .get(&successor)
                        .map_or(false, |&best| best <= new_g)
                    {
                        continue;
                    }
                    self.best_cost.insert(successor.clone(), new_g);
                }
                let h = heuristic(&successor);
                let f = new_g + h;
                let n = self.nodes.len();
                self.nodes.push(SearchNode {
                    node: successor,
                    parent: Some(index),
                    g: new_g,
                    h,
                    f,
                });
                to_see.push(SmallestCostHolder {
                    estimated_cost: f,
                    index: n,
                });
            }
        }
        warn!(
            "Open set exhausted after {} expansions without reaching the goal",
            self.expanded
        );
        None
    }
}
