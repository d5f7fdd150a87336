//! Edge queries and maintenance
//!
//! Reroute nodes are editor-only pass-through points. Anything that reaches
//! the file format sees through them to the real node behind.

use std::collections::HashSet;

use super::types::{Dialog, Edge};

/// Outgoing edges of `uuid`, in insertion order.
pub fn outgoing<'a>(dialog: &'a Dialog, uuid: &'a str) -> impl Iterator<Item = &'a Edge> {
    dialog.edges.iter().filter(move |e| e.from == uuid)
}

/// Incoming edges of `uuid`, in insertion order.
pub fn incoming<'a>(dialog: &'a Dialog, uuid: &'a str) -> impl Iterator<Item = &'a Edge> {
    dialog.edges.iter().filter(move |e| e.to == uuid)
}

/// Children of `uuid` with reroutes resolved.
///
/// Each outgoing edge that lands on a reroute is followed through the
/// reroute's first outgoing edge until a real node is reached. A reroute
/// without an outgoing edge (or a reroute cycle) contributes nothing.
/// Results keep edge order and contain no duplicates.
#[must_use]
pub fn children_of(dialog: &Dialog, uuid: &str) -> Vec<String> {
    let mut children: Vec<String> = Vec::new();
    for edge in outgoing(dialog, uuid) {
        let Some(target) = resolve_reroutes(dialog, &edge.to) else {
            continue;
        };
        if !children.iter().any(|c| c == target) {
            children.push(target.to_string());
        }
    }
    children
}

fn resolve_reroutes<'a>(dialog: &'a Dialog, start: &'a str) -> Option<&'a str> {
    let mut current = start;
    let mut visited = HashSet::new();
    loop {
        let node = dialog.nodes.get(current)?;
        if !node.kind.is_reroute() {
            return Some(current);
        }
        if !visited.insert(current) {
            tracing::warn!("Reroute cycle through {current}");
            return None;
        }
        current = outgoing(dialog, current).next()?.to.as_str();
    }
}

/// Remove direct edges that duplicate a path through a reroute.
///
/// For every reroute R with an incoming edge P→R and an outgoing edge R→C,
/// a direct edge P→C is removed. Returns the number of edges removed.
pub fn remove_direct_links_bypassing_reroutes(dialog: &mut Dialog) -> usize {
    let mut redundant = Vec::new();
    for node in dialog.nodes.values().filter(|n| n.kind.is_reroute()) {
        for parent in incoming(dialog, &node.uuid) {
            for child in outgoing(dialog, &node.uuid) {
                redundant.push(Edge::new(parent.from.clone(), child.to.clone()));
            }
        }
    }

    let mut removed = 0;
    for edge in redundant {
        if dialog.edges.shift_remove(&edge) {
            tracing::debug!("Removed direct link {} -> {}", edge.from, edge.to);
            removed += 1;
        }
    }
    if removed > 0 {
        tracing::info!("Removed {removed} link(s) bypassing reroutes");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::types::{DialogNode, DialogueLine, NodeKind};
    use pretty_assertions::assert_eq;

    fn dialog(nodes: &[(&str, bool)], edges: &[(&str, &str)]) -> Dialog {
        let mut dialog = Dialog::new();
        for (uuid, reroute) in nodes {
            let kind = if *reroute {
                NodeKind::Reroute
            } else {
                NodeKind::DialogueLine(DialogueLine::default())
            };
            dialog
                .nodes
                .insert((*uuid).to_string(), DialogNode::new(*uuid, kind));
        }
        for (from, to) in edges {
            dialog.edges.insert(Edge::new(*from, *to));
        }
        dialog
    }

    #[test]
    fn test_children_through_reroutes() {
        let d = dialog(
            &[("a", false), ("r1", true), ("r2", true), ("b", false), ("c", false)],
            &[("a", "r1"), ("r1", "r2"), ("r2", "b"), ("a", "c"), ("a", "b")],
        );
        assert_eq!(children_of(&d, "a"), vec!["b", "c"]);
    }

    #[test]
    fn test_dead_end_reroute() {
        let d = dialog(&[("a", false), ("r", true)], &[("a", "r")]);
        assert!(children_of(&d, "a").is_empty());
    }

    #[test]
    fn test_reroute_cycle() {
        let d = dialog(
            &[("a", false), ("r1", true), ("r2", true)],
            &[("a", "r1"), ("r1", "r2"), ("r2", "r1")],
        );
        assert!(children_of(&d, "a").is_empty());
    }

    #[test]
    fn test_remove_bypassing_links() {
        let mut d = dialog(
            &[("p", false), ("r", true), ("c", false), ("x", false)],
            &[("p", "r"), ("r", "c"), ("p", "c"), ("p", "x")],
        );
        assert_eq!(remove_direct_links_bypassing_reroutes(&mut d), 1);
        assert!(!d.has_edge("p", "c"));
        assert!(d.has_edge("p", "x"));
        assert_eq!(remove_direct_links_bypassing_reroutes(&mut d), 0);
    }
}
