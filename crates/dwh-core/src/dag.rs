//! Table dependency graph and topological ordering
//!
//! Tables are nodes; a foreign key from `songplays` to `users` is an edge
//! `users -> songplays`, so a topological walk yields referenced tables before
//! the tables that reference them. DDL order is derived from this graph rather
//! than from hand-maintained lists.

use crate::error::{CoreError, CoreResult};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A directed acyclic graph of foreign-key references between tables
#[derive(Debug)]
pub struct TableDag {
    /// The underlying graph
    graph: DiGraph<String, ()>,

    /// Map from table name to node index
    node_map: HashMap<String, NodeIndex>,
}

impl TableDag {
    /// Create a new empty DAG
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Add a table to the DAG. Declaration order is the tie-breaker for
    /// tables that do not depend on each other.
    pub fn add_table(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(name) {
            idx
        } else {
            let idx = self.graph.add_node(name.to_string());
            self.node_map.insert(name.to_string(), idx);
            idx
        }
    }

    /// Record that `table` holds a foreign key into `referenced`
    pub fn add_reference(&mut self, table: &str, referenced: &str) -> CoreResult<()> {
        let Some(&referenced_idx) = self.node_map.get(referenced) else {
            return Err(CoreError::UnknownTable {
                table: table.to_string(),
                referenced: referenced.to_string(),
            });
        };
        let table_idx = self.add_table(table);
        // Edge goes from the referenced table to the referencing one
        self.graph.add_edge(referenced_idx, table_idx, ());
        Ok(())
    }

    /// Build the DAG from `(table, referenced tables)` pairs in declaration order
    pub fn build<'a, I, R>(tables: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (&'a str, R)>,
        R: IntoIterator<Item = &'a str>,
    {
        let mut dag = Self::new();
        let mut references = Vec::new();

        for (table, refs) in tables {
            dag.add_table(table);
            references.extend(refs.into_iter().map(|r| (table, r)));
        }

        for (table, referenced) in references {
            dag.add_reference(table, referenced)?;
        }

        dag.validate()?;

        Ok(dag)
    }

    /// Validate the DAG has no cycles
    pub fn validate(&self) -> CoreResult<()> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(CoreError::CircularDependency {
                cycle: self.find_cycle_path(cycle.node_id()),
            }),
        }
    }

    /// Find a cycle path starting from a node for error reporting
    fn find_cycle_path(&self, start: NodeIndex) -> String {
        let mut path: Vec<String> = vec![self.graph[start].clone()];
        let mut current = start;
        let mut visited = HashSet::new();
        visited.insert(current);

        while let Some(edge) = self.graph.edges(current).next() {
            let target = edge.target();
            path.push(self.graph[target].clone());

            if target == start || visited.contains(&target) {
                break;
            }

            visited.insert(target);
            current = target;
        }

        path.join(" -> ")
    }

    /// Tables in creation order: every table after the tables it references,
    /// ties resolved by declaration order.
    pub fn creation_order(&self) -> CoreResult<Vec<String>> {
        self.validate()?;

        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.edges_directed(idx, Direction::Incoming).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = self
            .graph
            .node_indices()
            .filter(|idx| in_degree[idx.index()] == 0)
            .map(|idx| Reverse(idx.index()))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse(index)) = ready.pop() {
            let idx = NodeIndex::new(index);
            order.push(self.graph[idx].clone());

            for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
                let target = edge.target().index();
                in_degree[target] -= 1;
                if in_degree[target] == 0 {
                    ready.push(Reverse(target));
                }
            }
        }

        Ok(order)
    }

    /// Tables in drop order: the exact reverse of [`creation_order`](Self::creation_order),
    /// so referencing tables go before the tables they reference.
    pub fn drop_order(&self) -> CoreResult<Vec<String>> {
        let mut order = self.creation_order()?;
        order.reverse();
        Ok(order)
    }
}

impl Default for TableDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
