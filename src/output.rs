//! Rendering of finished routing tables
//!
//! Console text, one `<router>.txt` file per router and a JSON dump.
//! A next hop equal to both the destination and the owning router is shown
//! as `direct`; unreachable destinations show `-` and an infinite cost `*`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::error::RoutingResult;
use crate::protocol::{RoutingEntry, RoutingTable};
use crate::INFINITY;

const DIRECT: &str = "direct";
const NO_HOP: &str = "-";
const NO_COST: &str = "*";

fn next_hop_label<'t>(table: &'t RoutingTable, entry: &'t RoutingEntry) -> &'t str {
    if table.is_direct(entry) {
        return DIRECT;
    }
    entry.next_hop.as_deref().unwrap_or(NO_HOP)
}

/// `*` for an infinite cost, the number otherwise.
pub fn cost_label(cost: u32) -> String {
    if cost == INFINITY {
        NO_COST.to_string()
    } else {
        cost.to_string()
    }
}

/// Console rendering of one table.
pub fn render_table(table: &RoutingTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Router {}:", table.router());
    let _ = writeln!(out, "Dest, Next hop, Cost");
    for entry in table.entries() {
        let _ = writeln!(
            out,
            "{:<6}{:<10}{}",
            entry.destination,
            next_hop_label(table, entry),
            cost_label(entry.cost)
        );
    }
    out
}

pub fn render_tables<'t>(tables: impl IntoIterator<Item = &'t RoutingTable>) -> String {
    tables
        .into_iter()
        .map(render_table)
        .collect::<Vec<_>>()
        .join("\n")
}

/// File rendering: `<dest> <next hop>` per line, no cost.
pub fn render_file(table: &RoutingTable) -> String {
    let mut out = String::new();
    for entry in table.entries() {
        let _ = writeln!(out, "{} {}", entry.destination, next_hop_label(table, entry));
    }
    out
}

/// Write `<router>.txt` for every table into `dir`, creating it if needed.
pub fn write_tables<'t>(
    dir: impl AsRef<Path>,
    tables: impl IntoIterator<Item = &'t RoutingTable>,
) -> RoutingResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for table in tables {
        let path = dir.join(format!("{}.txt", table.router()));
        fs::write(&path, render_file(table))?;
        written.push(path);
    }

    info!("Routing tables written to {} files in {}", written.len(), dir.display());
    Ok(written)
}

#[derive(Serialize)]
struct TablesDocument<'t> {
    algorithm: &'t str,
    tables: Vec<&'t RoutingTable>,
}

pub fn render_json<'t>(
    algorithm: &str,
    tables: impl IntoIterator<Item = &'t RoutingTable>,
) -> RoutingResult<String> {
    let document = TablesDocument {
        algorithm,
        tables: tables.into_iter().collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn write_json<'t>(
    path: impl AsRef<Path>,
    algorithm: &str,
    tables: impl IntoIterator<Item = &'t RoutingTable>,
) -> RoutingResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_json(algorithm, tables)?)?;
    info!("Routing tables written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RoutingTable {
        let mut table = RoutingTable::with_self_entry("A");
        table.add_entry(RoutingEntry::new("B", "D", 3)).unwrap();
        table.add_entry(RoutingEntry::new("D", "D", 2)).unwrap();
        table.add_entry(RoutingEntry::unreachable("G")).unwrap();
        table
    }

    #[test]
    fn test_render_file() {
        assert_eq!(render_file(&sample()), "A direct\nB D\nD D\nG -\n");
    }

    #[test]
    fn test_render_table() {
        let text = render_table(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Router A:");
        assert_eq!(lines[1], "Dest, Next hop, Cost");
        assert_eq!(lines[2], "A     direct    0");
        assert_eq!(lines[3], "B     D         3");
        assert_eq!(lines[5], "G     -         *");
    }

    #[test]
    fn test_render_json() {
        let json = render_json("link-state", [&sample()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["algorithm"], "link-state");
        assert_eq!(value["tables"][0]["router"], "A");
        assert_eq!(value["tables"][0]["entries"][1]["next_hop"], "D");
        assert_eq!(value["tables"][0]["entries"][3]["cost"], serde_json::Value::Null);
    }

    #[test]
    fn test_cost_label() {
        assert_eq!(cost_label(0), "0");
        assert_eq!(cost_label(12), "12");
        assert_eq!(cost_label(INFINITY), "*");
    }
}
