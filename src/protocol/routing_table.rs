use serde::{Serialize, Serializer};

use crate::error::{RoutingError, RoutingResult};
use crate::protocol::DistanceVector;
use crate::{INFINITY, RouterId};

/// Forwarding table owned by a single router.
///
/// Entries are only ever added or improved, never removed.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingTable {
    router: RouterId,
    entries: Vec<RoutingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingEntry {
    pub destination: RouterId,
    /// `None` when the destination is unreachable
    pub next_hop: Option<RouterId>,
    #[serde(serialize_with = "serialize_cost")]
    pub cost: u32,
}

fn serialize_cost<S: Serializer>(cost: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    if *cost == INFINITY {
        serializer.serialize_none()
    } else {
        serializer.serialize_some(cost)
    }
}

impl RoutingEntry {
    pub fn new(destination: impl Into<RouterId>, next_hop: impl Into<RouterId>, cost: u32) -> Self {
        Self {
            destination: destination.into(),
            next_hop: Some(next_hop.into()),
            cost,
        }
    }

    pub fn unreachable(destination: impl Into<RouterId>) -> Self {
        Self {
            destination: destination.into(),
            next_hop: None,
            cost: INFINITY,
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.next_hop.is_some() && self.cost != INFINITY
    }
}

impl RoutingTable {
    pub fn new(router: impl Into<RouterId>) -> Self {
        Self {
            router: router.into(),
            entries: Vec::new(),
        }
    }

    /// Table holding only the self entry.
    pub fn with_self_entry(router: impl Into<RouterId>) -> Self {
        let router = router.into();
        let mut table = Self::new(router.clone());
        table.entries.push(RoutingEntry::new(router.clone(), router, 0));
        table
    }

    pub fn router(&self) -> &RouterId {
        &self.router
    }

    pub fn add_entry(&mut self, entry: RoutingEntry) -> RoutingResult<()> {
        if self.has_destination(&entry.destination) {
            return Err(RoutingError::DuplicateDestination {
                router: self.router.clone(),
                destination: entry.destination,
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn update_entry(
        &mut self,
        destination: &str,
        next_hop: impl Into<RouterId>,
        cost: u32,
    ) -> RoutingResult<()> {
        let index = self.find_entry_index(destination)?;
        let entry = &mut self.entries[index];
        entry.next_hop = Some(next_hop.into());
        entry.cost = cost;
        Ok(())
    }

    pub fn has_destination(&self, destination: &str) -> bool {
        self.entries.iter().any(|e| e.destination == destination)
    }

    pub fn cost_to(&self, destination: &str) -> RoutingResult<u32> {
        let index = self.find_entry_index(destination)?;
        Ok(self.entries[index].cost)
    }

    pub fn get(&self, destination: &str) -> Option<&RoutingEntry> {
        self.entries.iter().find(|e| e.destination == destination)
    }

    pub fn next_hop(&self, destination: &str) -> Option<&RouterId> {
        self.get(destination).and_then(|e| e.next_hop.as_ref())
    }

    /// Stable sort by destination, ascending.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.destination.cmp(&b.destination));
    }

    pub fn entries(&self) -> &[RoutingEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finite-cost knowledge of this router, without its self entry.
    pub fn distance_vector(&self) -> DistanceVector {
        let mut routes: Vec<(RouterId, u32)> = self
            .entries
            .iter()
            .filter(|e| e.destination != self.router && e.cost != INFINITY)
            .map(|e| (e.destination.clone(), e.cost))
            .collect();
        routes.sort();
        DistanceVector {
            router: self.router.clone(),
            routes,
        }
    }

    /// True for the self entry: next hop, destination and owner are the same router.
    pub fn is_direct(&self, entry: &RoutingEntry) -> bool {
        entry.destination == self.router && entry.next_hop.as_deref() == Some(self.router.as_str())
    }

    fn find_entry_index(&self, destination: &str) -> RoutingResult<usize> {
        self.entries
            .iter()
            .position(|e| e.destination == destination)
            .ok_or_else(|| RoutingError::UnknownDestination {
                router: self.router.clone(),
                destination: destination.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_entry() {
        let table = RoutingTable::with_self_entry("A");
        assert_eq!(table.len(), 1);
        assert_eq!(table.cost_to("A").unwrap(), 0);
        assert_eq!(table.next_hop("A").map(String::as_str), Some("A"));
        assert!(table.is_direct(&table.entries()[0]));
    }

    #[test]
    fn test_add_and_update_entry() {
        let mut table = RoutingTable::with_self_entry("A");
        table.add_entry(RoutingEntry::new("C", "B", 7)).unwrap();
        assert!(table.has_destination("C"));
        assert_eq!(table.cost_to("C").unwrap(), 7);

        table.update_entry("C", "D", 4).unwrap();
        let entry = table.get("C").unwrap();
        assert_eq!(entry.next_hop.as_deref(), Some("D"));
        assert_eq!(entry.cost, 4);
        assert!(!table.is_direct(entry));
    }

    #[test]
    fn test_duplicate_destination_rejected() {
        let mut table = RoutingTable::with_self_entry("A");
        table.add_entry(RoutingEntry::new("B", "B", 1)).unwrap();
        let err = table.add_entry(RoutingEntry::new("B", "C", 9)).unwrap_err();
        assert!(matches!(err, RoutingError::DuplicateDestination { .. }));
        assert_eq!(table.cost_to("B").unwrap(), 1);
    }

    #[test]
    fn test_unknown_destination() {
        let mut table = RoutingTable::with_self_entry("A");
        assert!(matches!(
            table.update_entry("Z", "B", 1),
            Err(RoutingError::UnknownDestination { .. })
        ));
        assert!(matches!(
            table.cost_to("Z"),
            Err(RoutingError::UnknownDestination { .. })
        ));
        assert!(table.get("Z").is_none());
    }

    #[test]
    fn test_sort_by_destination() {
        let mut table = RoutingTable::new("B");
        table.add_entry(RoutingEntry::new("D", "D", 1)).unwrap();
        table.add_entry(RoutingEntry::new("B", "B", 0)).unwrap();
        table.add_entry(RoutingEntry::new("A", "D", 3)).unwrap();
        table.sort();
        let order: Vec<&str> = table.entries().iter().map(|e| e.destination.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "D"]);
    }

    #[test]
    fn test_distance_vector_skips_self_and_unreachable() {
        let mut table = RoutingTable::with_self_entry("A");
        table.add_entry(RoutingEntry::new("C", "B", 5)).unwrap();
        table.add_entry(RoutingEntry::unreachable("E")).unwrap();
        table.add_entry(RoutingEntry::new("B", "B", 2)).unwrap();

        let dv = table.distance_vector();
        assert_eq!(dv.router, "A");
        assert_eq!(dv.routes, vec![("B".to_string(), 2), ("C".to_string(), 5)]);
    }

    #[test]
    fn test_infinite_cost_serializes_as_null() {
        let json = serde_json::to_value(RoutingEntry::unreachable("E")).unwrap();
        assert_eq!(json["cost"], serde_json::Value::Null);
        assert_eq!(json["next_hop"], serde_json::Value::Null);

        let json = serde_json::to_value(RoutingEntry::new("B", "D", 3)).unwrap();
        assert_eq!(json["cost"], 3);
        assert_eq!(json["next_hop"], "D");
    }
}
