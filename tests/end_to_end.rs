//! End-to-end runs of both engines: load from disk, compute, write tables.

use std::fs;

use routecalc::network::{load_message_order, load_topology, parse_topology};
use routecalc::{output, DistanceVectorEngine, LinkStateEngine, RoutingError, RoutingTable};

const REFERENCE: &str = "A B 8\nA C 5\nA D 2\nB D 1\nB E 3\nC E 2\nC F 1\nE F 1\n";

fn next_hop<'t>(tables: &'t [RoutingTable], router: &str, dest: &str) -> Option<&'t str> {
    tables
        .iter()
        .find(|t| t.router() == router)
        .and_then(|t| t.next_hop(dest))
        .map(String::as_str)
}

#[test]
fn test_link_state_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let topology_path = dir.path().join("topology.txt");
    fs::write(&topology_path, REFERENCE).unwrap();

    let topology = load_topology(&topology_path).unwrap();
    let tables = LinkStateEngine::new(&topology).unwrap().compute_all().unwrap();
    assert_eq!(tables.len(), 6);
    assert_eq!(next_hop(&tables, "A", "B"), Some("D"));
    assert_eq!(next_hop(&tables, "A", "F"), Some("C"));

    let out = dir.path().join("output");
    let written = output::write_tables(&out, &tables).unwrap();
    assert_eq!(written.len(), 6);

    let a = fs::read_to_string(out.join("A.txt")).unwrap();
    assert_eq!(a, "A direct\nB D\nC C\nD D\nE D\nF C\n");
}

#[test]
fn test_distance_vector_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let topology_path = dir.path().join("topology.txt");
    let messages_path = dir.path().join("messages.txt");
    fs::write(&topology_path, REFERENCE).unwrap();
    fs::write(&messages_path, "A B C D E F\nF E D C B A\nA B C D E F\n").unwrap();

    let topology = load_topology(&topology_path).unwrap();
    let order = load_message_order(&messages_path, &topology).unwrap();
    assert_eq!(order.len(), 18);

    let mut engine = DistanceVectorEngine::new(&topology).unwrap();
    engine.run(&order).unwrap();
    assert!(engine.is_converged());
    let tables = engine.into_tables();

    // Converged distance-vector costs agree with link-state costs everywhere
    let link_state = LinkStateEngine::new(&topology).unwrap().compute_all().unwrap();
    for (dv, ls) in tables.iter().zip(&link_state) {
        assert_eq!(dv.router(), ls.router());
        for entry in ls.entries() {
            assert_eq!(
                dv.cost_to(&entry.destination).unwrap(),
                entry.cost,
                "{} -> {}",
                dv.router(),
                entry.destination
            );
        }
    }

    let json_path = dir.path().join("out").join("tables.json");
    output::write_json(&json_path, "distance-vector", &tables).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["tables"].as_array().unwrap().len(), 6);
}

#[test]
fn test_compact_message_file() {
    let dir = tempfile::tempdir().unwrap();
    let messages_path = dir.path().join("messages.txt");
    fs::write(&messages_path, "ABCDEF\nFEDCBA\nABCDEF\n").unwrap();

    let topology = parse_topology(REFERENCE).unwrap();
    let order = load_message_order(&messages_path, &topology).unwrap();
    assert_eq!(order.len(), 18);
    assert_eq!(order[..6], ["A", "B", "C", "D", "E", "F"]);

    let mut engine = DistanceVectorEngine::new(&topology).unwrap();
    engine.run(&order).unwrap();
    assert!(engine.is_converged());
}

#[test]
fn test_message_order_with_unknown_router() {
    let dir = tempfile::tempdir().unwrap();
    let messages_path = dir.path().join("messages.txt");
    fs::write(&messages_path, "A B X").unwrap();

    let topology = parse_topology(REFERENCE).unwrap();
    let err = load_message_order(&messages_path, &topology).unwrap_err();
    assert!(matches!(err, RoutingError::UnknownRouterInMessageOrder(r) if r == "X"));
}

#[test]
fn test_empty_topology_file() {
    let dir = tempfile::tempdir().unwrap();
    let topology_path = dir.path().join("topology.txt");
    fs::write(&topology_path, "\n# nothing here\n").unwrap();

    let topology = load_topology(&topology_path).unwrap();
    assert!(matches!(LinkStateEngine::new(&topology), Err(RoutingError::EmptyTopology)));
    assert!(matches!(DistanceVectorEngine::new(&topology), Err(RoutingError::EmptyTopology)));
}

#[test]
fn test_malformed_topology_aborts_load() {
    let dir = tempfile::tempdir().unwrap();
    let topology_path = dir.path().join("topology.txt");
    fs::write(&topology_path, "A B 8\nA C\nC D 1\n").unwrap();

    let err = load_topology(&topology_path).unwrap_err();
    assert!(matches!(err, RoutingError::MalformedTopologyInput { line: 2, .. }));
}

#[test]
fn test_missing_topology_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_topology(dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, RoutingError::Io(_)));
}
