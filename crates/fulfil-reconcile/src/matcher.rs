//! Greedy line matching

use crate::Result;
use crate::inventory::{InventoryLookup, plan_inventory};
use fulfil_model::{ExistingLine, FulfillmentDraft, InventoryPlanEntry, RequestedItem};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Outcome for one existing row
#[derive(Debug, Clone, PartialEq)]
pub enum Match {
    /// The row is fulfilled with the requested quantity and location
    Matched(ExistingLine, RequestedItem),
    /// No requested item is left for the row
    Excluded(ExistingLine),
}

impl Match {
    /// The existing row this outcome is for
    #[must_use]
    pub fn line(&self) -> &ExistingLine {
        match self {
            Match::Matched(line, _) | Match::Excluded(line) => line,
        }
    }

    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self, Match::Matched(..))
    }
}

/// Match rows to requested items
///
/// Rows are visited in the given order. Each takes the first requested item
/// with an equal item reference that has not been used yet. Quantities are
/// not compared.
#[must_use]
pub fn reconcile(existing: &[ExistingLine], requested: &[RequestedItem]) -> Vec<Match> {
    let mut used_indexes = HashSet::new();

    existing
        .iter()
        .map(|line| {
            let found = requested
                .iter()
                .enumerate()
                .find(|(idx, item)| item.item_ref == line.item_ref && !used_indexes.contains(idx));

            match found {
                Some((idx, item)) => {
                    used_indexes.insert(idx);
                    debug!(
                        line = line.line_number,
                        item = %line.item_ref,
                        request_index = idx,
                        "Line matched"
                    );
                    Match::Matched(line.clone(), item.clone())
                }
                None => {
                    debug!(line = line.line_number, item = %line.item_ref, "Line excluded");
                    Match::Excluded(line.clone())
                }
            }
        })
        .collect()
}

/// Matches plus the inventory plans derived for them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconciliation {
    /// One outcome per row, in row order
    pub matches: Vec<Match>,
    /// Replacement plans keyed by line number
    pub plans: BTreeMap<usize, Vec<InventoryPlanEntry>>,
    requested_count: usize,
}

impl Reconciliation {
    /// Number of matched rows
    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matches.iter().filter(|m| m.is_matched()).count()
    }

    /// Plan derived for a line, if any
    #[must_use]
    pub fn plan(&self, line_number: usize) -> Option<&[InventoryPlanEntry]> {
        self.plans.get(&line_number).map(Vec::as_slice)
    }

    /// Every row was excluded although items were requested
    #[must_use]
    pub fn is_total_mismatch(&self) -> bool {
        self.requested_count > 0 && self.matches.iter().all(|m| !m.is_matched())
    }

    /// Build the draft's replacement row list
    ///
    /// Excluded rows stop being received. Matched rows are received with the
    /// requested quantity and location (the row keeps its own location when
    /// none was requested), and take the derived plan when there is one.
    #[must_use]
    pub fn apply_to(&self, draft: FulfillmentDraft) -> FulfillmentDraft {
        let outcomes: BTreeMap<usize, &Match> = self
            .matches
            .iter()
            .map(|m| (m.line().line_number, m))
            .collect();

        let lines = draft
            .lines
            .iter()
            .cloned()
            .map(|mut row| {
                match outcomes.get(&row.line_number) {
                    Some(Match::Excluded(_)) => row.receive = false,
                    Some(Match::Matched(_, item)) => {
                        row.receive = true;
                        row.quantity = item.quantity;
                        if let Some(location) = &item.location {
                            row.location = Some(location.clone());
                        }
                        if let Some(plan) = self.plans.get(&row.line_number) {
                            row.inventory_plan.clone_from(plan);
                        }
                    }
                    None => {}
                }
                row
            })
            .collect();

        draft.with_lines(lines)
    }
}

/// Match rows and derive inventory plans for the rows that need them
///
/// # Errors
///
/// Fails with the first lookup error; no partial result is returned.
pub fn reconcile_lines(
    existing: &[ExistingLine],
    requested: &[RequestedItem],
    lookup: &impl InventoryLookup,
) -> Result<Reconciliation> {
    let matches = reconcile(existing, requested);

    let mut plans = BTreeMap::new();
    for m in &matches {
        if let Match::Matched(line, item) = m {
            if line.needs_inventory_plan() {
                plans.insert(line.line_number, plan_inventory(line, item, lookup)?);
            }
        }
    }

    let reconciliation = Reconciliation {
        matches,
        plans,
        requested_count: requested.len(),
    };
    info!(
        lines = existing.len(),
        requested = requested.len(),
        matched = reconciliation.matched_count(),
        plans = reconciliation.plans.len(),
        "Lines reconciled"
    );
    Ok(reconciliation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::inventory::testing::StaticLookup;
    use fulfil_model::{DraftLine, InventoryAssignment, InventoryType, ItemKind, RecordRef};

    fn lines(refs: &[&str]) -> Vec<ExistingLine> {
        refs.iter()
            .enumerate()
            .map(|(i, r)| ExistingLine::new(i, *r))
            .collect()
    }

    fn summary(matches: &[Match]) -> Vec<(usize, Option<f64>)> {
        matches
            .iter()
            .map(|m| match m {
                Match::Matched(line, item) => (line.line_number, Some(item.quantity)),
                Match::Excluded(line) => (line.line_number, None),
            })
            .collect()
    }

    #[test]
    fn test_scenario_second_line_matched() {
        let existing = lines(&["A", "B"]);
        let requested = vec![RequestedItem::new("B", 5.0)];

        let matches = reconcile(&existing, &requested);

        assert_eq!(summary(&matches), vec![(0, None), (1, Some(5.0))]);
    }

    #[test]
    fn test_disjoint_references_exclude_everything() {
        let existing = lines(&["A", "B", "C"]);
        let requested = vec![RequestedItem::new("X", 1.0), RequestedItem::new("Y", 1.0)];

        let matches = reconcile(&existing, &requested);

        assert!(matches.iter().all(|m| !m.is_matched()));
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn test_duplicates_consumed_once_in_order() {
        let existing = lines(&["A", "A", "A"]);
        let requested = vec![RequestedItem::new("A", 1.0), RequestedItem::new("A", 2.0)];

        let matches = reconcile(&existing, &requested);

        assert_eq!(
            summary(&matches),
            vec![(0, Some(1.0)), (1, Some(2.0)), (2, None)]
        );
    }

    #[test]
    fn test_order_follows_existing_lines() {
        let existing = lines(&["A", "B", "C"]);
        let forward = vec![
            RequestedItem::new("A", 1.0),
            RequestedItem::new("B", 2.0),
            RequestedItem::new("C", 3.0),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let a = reconcile(&existing, &forward);
        let b = reconcile(&existing, &backward);

        assert_eq!(summary(&a), summary(&b));
        let order: Vec<_> = a.iter().map(|m| m.line().line_number).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_quantity_and_location_passed_verbatim() {
        let existing = vec![ExistingLine::new(0, "A").with_location("1")];
        let requested = vec![RequestedItem::new("A", 999.5).at("7")];

        match &reconcile(&existing, &requested)[0] {
            Match::Matched(_, item) => {
                assert_eq!(item.quantity, 999.5);
                assert_eq!(item.location.as_deref(), Some("7"));
            }
            Match::Excluded(_) => panic!("expected a match"),
        }
    }

    #[test]
    fn test_total_mismatch() {
        let lookup = StaticLookup::default();

        let r = reconcile_lines(&lines(&["A"]), &[RequestedItem::new("B", 1.0)], &lookup).unwrap();
        assert!(r.is_total_mismatch());

        let r = reconcile_lines(&lines(&["A"]), &[], &lookup).unwrap();
        assert!(!r.is_total_mismatch());

        let r = reconcile_lines(&lines(&["A", "B"]), &[RequestedItem::new("B", 1.0)], &lookup)
            .unwrap();
        assert!(!r.is_total_mismatch());
        assert_eq!(r.matched_count(), 1);
    }

    #[test]
    fn test_plans_only_for_tracked_non_service_lines() {
        let existing = vec![
            ExistingLine::new(0, "A").tracked().with_location("12"),
            ExistingLine::new(1, "S")
                .tracked()
                .with_kind(ItemKind::Service)
                .with_location("12"),
            ExistingLine::new(2, "N").with_location("12"),
            ExistingLine::new(3, "Z").tracked().with_location("12"),
        ];
        let detail = InventoryAssignment::in_bin("A-01", 1.0);
        let requested = vec![
            RequestedItem::new("A", 1.0).with_assignment(detail.clone()),
            RequestedItem::new("S", 1.0).with_assignment(detail.clone()),
            RequestedItem::new("N", 1.0).with_assignment(detail),
        ];
        let lookup = StaticLookup {
            bins: vec![("A-01", Some("12"), "301")],
            ..StaticLookup::default()
        };

        let r = reconcile_lines(&existing, &requested, &lookup).unwrap();

        assert_eq!(r.plans.keys().copied().collect::<Vec<_>>(), vec![0]);
        assert_eq!(r.plan(0).unwrap()[0].bin.as_deref(), Some("301"));
        assert!(r.plan(3).is_none());
    }

    #[test]
    fn test_lookup_failure_aborts() {
        let existing = vec![
            ExistingLine::new(0, "A").tracked(),
            ExistingLine::new(1, "B").tracked(),
        ];
        let requested = vec![
            RequestedItem::new("A", 1.0).with_assignment(InventoryAssignment::in_bin("A-01", 1.0)),
            RequestedItem::new("B", 1.0).with_assignment(InventoryAssignment::in_bin("NOPE", 1.0)),
        ];
        let lookup = StaticLookup {
            bins: vec![("A-01", None, "301")],
            ..StaticLookup::default()
        };

        let result = reconcile_lines(&existing, &requested, &lookup);
        assert!(matches!(result, Err(Error::LookupNotFound { line: 1, .. })));
    }

    fn draft_line(line_number: usize, item: &str, location: &str) -> DraftLine {
        DraftLine {
            line_number,
            item_ref: item.to_string(),
            inventory_type: InventoryType::Tracked,
            item_kind: ItemKind::Other,
            location: Some(location.to_string()),
            quantity: 10.0,
            receive: true,
            inventory_plan: vec![InventoryPlanEntry {
                bin: Some("old".to_string()),
                quantity: 10.0,
                ..InventoryPlanEntry::default()
            }],
        }
    }

    #[test]
    fn test_apply_to_draft() {
        let draft = FulfillmentDraft::new(RecordRef::new("salesorder", 5001), "itemfulfillment")
            .with_lines(vec![
                draft_line(0, "A", "1"),
                draft_line(1, "B", "1"),
                draft_line(2, "C", "1"),
            ]);
        let requested = vec![
            RequestedItem::new("B", 4.0)
                .at("12")
                .with_assignment(InventoryAssignment::in_bin("A-01", 4.0)),
            RequestedItem::new("C", 2.0),
        ];
        let lookup = StaticLookup {
            bins: vec![("A-01", Some("12"), "301")],
            ..StaticLookup::default()
        };

        let r = reconcile_lines(&draft.existing_lines(), &requested, &lookup).unwrap();
        let rebuilt = r.apply_to(draft);

        let a = &rebuilt.lines[0];
        assert!(!a.receive);
        assert_eq!(a.quantity, 10.0);

        let b = &rebuilt.lines[1];
        assert!(b.receive);
        assert_eq!(b.quantity, 4.0);
        assert_eq!(b.location.as_deref(), Some("12"));
        assert_eq!(b.inventory_plan.len(), 1);
        assert_eq!(b.inventory_plan[0].bin.as_deref(), Some("301"));

        // C has no assignments: an empty plan replaces the old one
        let c = &rebuilt.lines[2];
        assert!(c.receive);
        assert_eq!(c.quantity, 2.0);
        assert_eq!(c.location.as_deref(), Some("1"));
        assert!(c.inventory_plan.is_empty());
    }
}
