//! Topology and advertisement-order loading
//!
//! Topology files hold one link per line, either as three fields
//! (`A B 8`) or in the compact form used by the reference inputs, where
//! spaces are ignored and the first two characters name the routers
//! (`AB8`). Blank lines and `#` comments are skipped.
//!
//! Message files list the advertising routers in order, separated by
//! whitespace or commas. A token that is not a router label but spells
//! single-character routers (`ABCDEF`) is read as one router per character.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::error::{RoutingError, RoutingResult};
use crate::network::Topology;
use crate::RouterId;

/// Parse a single topology line into `(a, b, cost)`.
fn parse_link(line_no: usize, line: &str) -> RoutingResult<(RouterId, RouterId, u32)> {
    let malformed = |reason: String| RoutingError::MalformedTopologyInput {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    let (a, b, cost) = if fields.len() == 3 {
        (fields[0].to_string(), fields[1].to_string(), fields[2].to_string())
    } else {
        let mut compact = line.chars().filter(|c| !c.is_whitespace());
        match (compact.next(), compact.next()) {
            (Some(a), Some(b)) => (a.to_string(), b.to_string(), compact.collect::<String>()),
            _ => {
                return Err(malformed(format!(
                    "expected two routers and a cost, got {:?}",
                    line
                )));
            }
        }
    };

    if cost.is_empty() {
        return Err(malformed(format!("missing cost in {:?}", line)));
    }
    let cost = cost
        .parse::<u32>()
        .map_err(|e| malformed(format!("invalid cost {:?}: {}", cost, e)))?;

    Ok((a, b, cost))
}

/// Parse a whole topology. Nothing is returned unless every line is valid.
pub fn parse_topology(input: &str) -> RoutingResult<Topology> {
    let mut topology = Topology::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (a, b, cost) = parse_link(idx + 1, line)?;
        topology.add_link(a, b, cost)?;
    }

    Ok(topology)
}

pub fn load_topology(path: impl AsRef<Path>) -> RoutingResult<Topology> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let topology = parse_topology(&content)?;
    for link in topology.links() {
        debug!("Link {} <-> {} cost {}", link.a, link.b, link.cost);
    }
    info!(
        "{} loaded: {} routers, {} links",
        path.display(),
        topology.router_count(),
        topology.link_count()
    );
    Ok(topology)
}

/// Parse the advertisement order. Labels are not checked against a topology here.
pub fn parse_message_order(input: &str) -> Vec<RouterId> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split compact tokens such as `ABCDEF` into single-character routers.
///
/// Tokens naming a router are kept, as are tokens that cannot be split into
/// known routers, so validation reports them.
pub fn expand_message_order(topology: &Topology, order: Vec<RouterId>) -> Vec<RouterId> {
    let mut expanded = Vec::with_capacity(order.len());
    for token in order {
        let splittable = token.chars().count() > 1
            && token.chars().all(|c| topology.contains(&c.to_string()));
        if topology.contains(&token) || !splittable {
            expanded.push(token);
        } else {
            expanded.extend(token.chars().map(String::from));
        }
    }
    expanded
}

/// Ensure every router of the order exists in the topology.
pub fn validate_message_order(topology: &Topology, order: &[RouterId]) -> RoutingResult<()> {
    match order.iter().find(|router| !topology.contains(router)) {
        Some(unknown) => Err(RoutingError::UnknownRouterInMessageOrder(unknown.clone())),
        None => Ok(()),
    }
}

pub fn load_message_order(
    path: impl AsRef<Path>,
    topology: &Topology,
) -> RoutingResult<Vec<RouterId>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let order = expand_message_order(topology, parse_message_order(&content));
    validate_message_order(topology, &order)?;
    info!("{} loaded: {} advertisements", path.display(), order.len());
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spaced_and_compact_lines() {
        let topology = parse_topology("A B 8\nAC5\nA D2\n\n# comment\nB D 1\n").unwrap();
        assert_eq!(topology.link_cost("A", "B"), 8);
        assert_eq!(topology.link_cost("C", "A"), 5);
        assert_eq!(topology.link_cost("A", "D"), 2);
        assert_eq!(topology.link_cost("D", "B"), 1);
        assert_eq!(topology.link_count(), 4);
    }

    #[test]
    fn test_multi_character_labels() {
        let topology = parse_topology("r1 r2 10\nr2 r3 4\n").unwrap();
        assert_eq!(topology.all_routers(), vec!["r1", "r2", "r3"]);
        assert_eq!(topology.link_cost("r3", "r2"), 4);
    }

    #[test]
    fn test_compact_multi_digit_cost() {
        let topology = parse_topology("AB 12").unwrap();
        assert_eq!(topology.link_cost("A", "B"), 12);
    }

    #[test]
    fn test_short_line_is_malformed() {
        let err = parse_topology("A B 1\nAB\n").unwrap_err();
        assert!(matches!(err, RoutingError::MalformedTopologyInput { line: 2, .. }));
    }

    #[test]
    fn test_non_numeric_cost_is_malformed() {
        let err = parse_topology("A B x\n").unwrap_err();
        assert!(matches!(err, RoutingError::MalformedTopologyInput { line: 1, .. }));
    }

    #[test]
    fn test_self_loop_aborts_load() {
        let err = parse_topology("A B 1\nA A 3\n").unwrap_err();
        assert!(matches!(err, RoutingError::InvalidLink { .. }));
    }

    #[test]
    fn test_parse_message_order() {
        assert_eq!(parse_message_order("A B\nC,D  E"), vec!["A", "B", "C", "D", "E"]);
        assert!(parse_message_order("  \n").is_empty());
    }

    #[test]
    fn test_unknown_router_in_order() {
        let topology = parse_topology("A B 1").unwrap();
        let order = parse_message_order("A Z B");
        let err = validate_message_order(&topology, &order).unwrap_err();
        assert!(matches!(err, RoutingError::UnknownRouterInMessageOrder(r) if r == "Z"));
    }

    #[test]
    fn test_compact_message_order() {
        let topology = parse_topology("AB1\nBC2\nCD3\n").unwrap();
        let order = expand_message_order(&topology, parse_message_order("ABCD\nDC, B"));
        assert_eq!(order, vec!["A", "B", "C", "D", "D", "C", "B"]);
        validate_message_order(&topology, &order).unwrap();
    }

    #[test]
    fn test_compact_order_keeps_known_labels() {
        let topology = parse_topology("AB 1\nA AB 2\n").unwrap();
        let order = expand_message_order(&topology, parse_message_order("AB BA AX"));
        assert_eq!(order, vec!["AB", "B", "A", "AX"]);
        let err = validate_message_order(&topology, &order).unwrap_err();
        assert!(matches!(err, RoutingError::UnknownRouterInMessageOrder(r) if r == "AX"));
    }
}
