//! The route finder: concrete join chains between tables.
//!
//! Routes are searched breadth-first over `(database, table)` nodes with
//! [`relate`](crate::relate) as the edge expansion, so the first route found
//! is shortest in hop count and ties fall to the first-discovered edge in
//! declaration order. Visited-table tracking makes every returned route
//! cycle-free and guarantees termination even when the declared relations
//! contain cycles.

use std::collections::VecDeque;

use tl_core::{Dtf, JoinPair, LinkModel, fx_hash_map, fx_hash_set, FxHashMap, FxHashSet};
use tracing::debug;

use crate::relate::relate;

/// A search node: one table in one database. Field components are ignored
/// throughout route finding.
type Node = (String, String);

fn node_of(dtf: &Dtf) -> Node {
    (dtf.database.clone(), dtf.table.clone())
}

/// Finds a join route between two tables.
///
/// The field components of `a` and `b` are ignored - only table identity
/// matters. Returns `Some(vec![])` when the endpoints are the same table
/// (trivially connected) and `None` when no chain of declared relations
/// reaches `b`. In a non-empty route, consecutive pairs connect - each
/// pair's target table is the next pair's source table - and no table
/// repeats.
///
/// # Examples
///
/// ```
/// use tl_core::Dtf;
/// use tl_engine::{find_route, load_str};
///
/// let model = load_str(
///     "demo.links",
///     "identifier a\n  field pub.t1.id\n  field pub.t2.id\n\
///      identifier b\n  field pub.t2.code\n  field pub.t3.code\n",
/// )?;
/// let route = find_route(&model, &Dtf::new("pub", "t1", ""), &Dtf::new("pub", "t3", ""))
///     .expect("route exists");
/// assert_eq!(route.len(), 2);
/// assert_eq!(route[0].target.table, "t2");
/// # Ok::<(), tl_engine::LoadError>(())
/// ```
#[must_use]
pub fn find_route(model: &LinkModel, a: &Dtf, b: &Dtf) -> Option<Vec<JoinPair>> {
    if a.same_table(b) {
        return Some(Vec::new());
    }

    let start = node_of(a);
    let goal = node_of(b);

    let mut visited = fx_hash_set();
    visited.insert(start.clone());
    let mut prev: FxHashMap<Node, JoinPair> = fx_hash_map();
    let mut queue = VecDeque::from([start]);

    while let Some((database, table)) = queue.pop_front() {
        for pair in relate(model, &database, &table) {
            let next = node_of(&pair.target);
            if !visited.insert(next.clone()) {
                continue;
            }
            prev.insert(next.clone(), pair);
            if next == goal {
                let route = backtrack(&prev, &goal);
                debug!(from = %a, to = %b, hops = route.len(), "route found");
                return Some(route);
            }
            queue.push_back(next);
        }
    }

    debug!(from = %a, to = %b, "no route");
    None
}

/// Rebuilds the path into `goal` from the predecessor map.
fn backtrack(prev: &FxHashMap<Node, JoinPair>, goal: &Node) -> Vec<JoinPair> {
    let mut route = Vec::new();
    let mut current = goal.clone();
    while let Some(pair) = prev.get(&current) {
        current = node_of(&pair.source);
        route.push(pair.clone());
    }
    route.reverse();
    route
}

/// Finds a route connecting the first table to every other listed table.
///
/// Greedy nearest-expansion: coverage starts with the first table, and each
/// round runs one breadth-first search seeded with every covered table (in
/// coverage order) to the nearest not-yet-covered input table, appending its
/// path minus any edges already present and marking every table along it
/// covered. This approximates a Steiner tree rather than minimizing total
/// edges - a deliberate tradeoff for determinism and simplicity.
///
/// Zero or one input tables are trivially connected (`Some(vec![])`); any
/// input table unreachable from the growing connected set yields `None`.
#[must_use]
pub fn find_route_through_all(model: &LinkModel, tables: &[Dtf]) -> Option<Vec<JoinPair>> {
    let Some((first, rest)) = tables.split_first() else {
        return Some(Vec::new());
    };

    let mut covered_order = vec![node_of(first)];
    let mut covered: FxHashSet<Node> = covered_order.iter().cloned().collect();
    let mut pending: Vec<Node> = Vec::new();
    for dtf in rest {
        let node = node_of(dtf);
        if !covered.contains(&node) && !pending.contains(&node) {
            pending.push(node);
        }
    }

    let mut route: Vec<JoinPair> = Vec::new();
    while !pending.is_empty() {
        let path = bfs_to_nearest(model, &covered_order, &covered, &pending)?;
        for pair in path {
            for node in [node_of(&pair.source), node_of(&pair.target)] {
                if covered.insert(node.clone()) {
                    covered_order.push(node);
                }
            }
            if !route.contains(&pair) {
                route.push(pair);
            }
        }
        pending.retain(|node| !covered.contains(node));
    }

    Some(route)
}

/// One breadth-first wave from the whole covered set to the nearest pending
/// table, returning the connecting path.
fn bfs_to_nearest(
    model: &LinkModel,
    covered_order: &[Node],
    covered: &FxHashSet<Node>,
    pending: &[Node],
) -> Option<Vec<JoinPair>> {
    let mut visited = covered.clone();
    let mut prev: FxHashMap<Node, JoinPair> = fx_hash_map();
    let mut queue: VecDeque<Node> = covered_order.iter().cloned().collect();

    while let Some((database, table)) = queue.pop_front() {
        for pair in relate(model, &database, &table) {
            let next = node_of(&pair.target);
            if !visited.insert(next.clone()) {
                continue;
            }
            prev.insert(next.clone(), pair);
            if pending.contains(&next) {
                return Some(backtrack(&prev, &next));
            }
            queue.push_back(next);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_str;

    fn model(source: &str) -> LinkModel {
        load_str("test.links", source).expect("load failed")
    }

    /// Two identifier sets chaining t1 - t2 - t3, as in the canonical
    /// scenario: A on t1.id/t2.id, B on t2.code/t3.code.
    fn chain_model() -> LinkModel {
        model(
            "identifier a\n\
             \tfield pub.t1.id\n\
             \tfield pub.t2.id\n\
             identifier b\n\
             \tfield pub.t2.code\n\
             \tfield pub.t3.code\n",
        )
    }

    fn table(db: &str, name: &str) -> Dtf {
        Dtf::new(db, name, "")
    }

    #[test]
    fn test_find_route_same_table_is_empty() {
        let model = chain_model();
        let route = find_route(&model, &table("pub", "t1"), &table("pub", "t1"));
        assert_eq!(route, Some(Vec::new()));
    }

    #[test]
    fn test_find_route_two_hops() {
        let model = chain_model();
        let route = find_route(&model, &table("pub", "t1"), &table("pub", "t3"))
            .expect("route exists");

        assert_eq!(route.len(), 2);
        assert_eq!(route[0].source.to_string(), "pub.t1.id");
        assert_eq!(route[0].target.to_string(), "pub.t2.id");
        assert_eq!(route[1].source.to_string(), "pub.t2.code");
        assert_eq!(route[1].target.to_string(), "pub.t3.code");

        let a = model.set_id("a").expect("set");
        let b = model.set_id("b").expect("set");
        assert_eq!(route[0].via, a);
        assert_eq!(route[1].via, b);
    }

    #[test]
    fn test_find_route_consecutive_pairs_connect() {
        let model = chain_model();
        let route = find_route(&model, &table("pub", "t1"), &table("pub", "t3"))
            .expect("route exists");
        for window in route.windows(2) {
            assert_eq!(window[0].target.table, window[1].source.table);
            assert_eq!(window[0].target.database, window[1].source.database);
        }

        // No table repeats along the route.
        let mut seen = vec![route[0].source.table.clone()];
        for pair in &route {
            assert!(!seen.contains(&pair.target.table));
            seen.push(pair.target.table.clone());
        }
    }

    #[test]
    fn test_find_route_unreachable() {
        let model = model(
            "identifier a\n\
             \tfield pub.t1.id\n\
             \tfield pub.t2.id\n\
             identifier b\n\
             \tfield pub.island.code\n\
             \tfield pub.island2.code\n",
        );
        assert_eq!(
            find_route(&model, &table("pub", "t1"), &table("pub", "island")),
            None
        );
    }

    #[test]
    fn test_find_route_ignores_field_component() {
        let model = chain_model();
        let a = Dtf::new("pub", "t1", "whatever");
        let b = Dtf::new("pub", "t3", "other");
        assert!(find_route(&model, &a, &b).is_some());
    }

    #[test]
    fn test_find_route_prefers_fewer_hops() {
        // t1 connects to t3 both directly (set c) and through t2.
        let model = model(
            "identifier a\n\
             \tfield pub.t1.id\n\
             \tfield pub.t2.id\n\
             identifier b\n\
             \tfield pub.t2.code\n\
             \tfield pub.t3.code\n\
             identifier c\n\
             \tfield pub.t1.direct\n\
             \tfield pub.t3.direct\n",
        );
        let route = find_route(&model, &table("pub", "t1"), &table("pub", "t3"))
            .expect("route exists");
        assert_eq!(route.len(), 1);
        assert_eq!(route[0].source.field, "direct");
    }

    #[test]
    fn test_find_route_avoids_ignored_hop() {
        // The only path through t2 is blocked by an ignore rule.
        let model = model(
            "identifier a\n\
             \tfield pub.t1.id\n\
             \tfield pub.t2.id\n\
             identifier b\n\
             \tfield pub.t2.code\n\
             \tfield pub.t3.code\n\
             ignore pub\n\
             \ttable: t2\n",
        );
        assert_eq!(
            find_route(&model, &table("pub", "t1"), &table("pub", "t3")),
            None
        );
    }

    #[test]
    fn test_find_route_crosses_databases() {
        let model = model(
            "identifier x\n\
             \tfield pub.t1.id\n\
             \tfield archive.t9.id\n",
        );
        let route = find_route(&model, &table("pub", "t1"), &table("archive", "t9"))
            .expect("route exists");
        assert_eq!(route.len(), 1);
        assert_eq!(route[0].target.database, "archive");
    }

    #[test]
    fn test_find_route_terminates_on_relation_cycles() {
        // t1 - t2 - t3 - t1 cycle plus a dead end; search must terminate.
        let model = model(
            "identifier a\n\
             \tfield pub.t1.id\n\
             \tfield pub.t2.id\n\
             identifier b\n\
             \tfield pub.t2.code\n\
             \tfield pub.t3.code\n\
             identifier c\n\
             \tfield pub.t3.key\n\
             \tfield pub.t1.key\n",
        );
        assert_eq!(
            find_route(&model, &table("pub", "t1"), &table("pub", "nowhere")),
            None
        );
    }

    #[test]
    fn test_through_all_single_element() {
        let model = chain_model();
        let route = find_route_through_all(&model, &[table("pub", "t1")]);
        assert_eq!(route, Some(Vec::new()));
        assert_eq!(find_route_through_all(&model, &[]), Some(Vec::new()));
    }

    #[test]
    fn test_through_all_chain() {
        let model = chain_model();
        let route =
            find_route_through_all(&model, &[table("pub", "t1"), table("pub", "t3")])
                .expect("route exists");
        assert_eq!(route.len(), 2);
        assert_eq!(route[0].source.table, "t1");
        assert_eq!(route[1].target.table, "t3");
    }

    #[test]
    fn test_through_all_shares_edges() {
        // Connecting t1 to both t2 and t3 must not duplicate the t1-t2 edge.
        let model = chain_model();
        let route = find_route_through_all(
            &model,
            &[table("pub", "t1"), table("pub", "t3"), table("pub", "t2")],
        )
        .expect("route exists");
        assert_eq!(route.len(), 2);
    }

    #[test]
    fn test_through_all_unreachable_table() {
        let model = model(
            "identifier a\n\
             \tfield pub.t1.id\n\
             \tfield pub.t2.id\n\
             identifier b\n\
             \tfield pub.island.code\n\
             \tfield pub.island2.code\n",
        );
        assert_eq!(
            find_route_through_all(
                &model,
                &[table("pub", "t1"), table("pub", "t2"), table("pub", "island")],
            ),
            None
        );
    }

    #[test]
    fn test_through_all_star_topology() {
        // hub joins t1, t2, t3 through three sets; all inputs get covered.
        let model = model(
            "identifier s1\n\
             \tfield pub.hub.a\n\
             \tfield pub.t1.a\n\
             identifier s2\n\
             \tfield pub.hub.b\n\
             \tfield pub.t2.b\n\
             identifier s3\n\
             \tfield pub.hub.c\n\
             \tfield pub.t3.c\n",
        );
        let route = find_route_through_all(
            &model,
            &[table("pub", "t1"), table("pub", "t2"), table("pub", "t3")],
        )
        .expect("route exists");

        // Every requested table appears somewhere in the route.
        for wanted in ["t1", "t2", "t3"] {
            assert!(
                route
                    .iter()
                    .any(|p| p.source.table == wanted || p.target.table == wanted),
                "{wanted} missing from route"
            );
        }
        // t1 -> hub, then hub -> t2 and hub -> t3.
        assert_eq!(route.len(), 3);
    }

    #[test]
    fn test_through_all_duplicate_inputs() {
        let model = chain_model();
        let route = find_route_through_all(
            &model,
            &[table("pub", "t1"), table("pub", "t2"), table("pub", "t2")],
        )
        .expect("route exists");
        assert_eq!(route.len(), 1);
    }
}
