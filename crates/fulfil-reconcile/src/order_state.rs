//! Source order state checks
//!
//! Run against the loaded order before it is transformed. Every problem is
//! collected so the caller sees them all at once.

use crate::matcher::{Match, reconcile};
use crate::{Error, Result};
use fulfil_model::fields::{header, line};
use fulfil_model::{ExistingLine, Record, RequestedItem};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Order statuses a fulfillment may be created from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderPolicy {
    pub allowed_statuses: Vec<String>,
}

impl Default for OrderPolicy {
    fn default() -> Self {
        // A: pending approval, B: pending fulfillment, E: partially fulfilled
        Self {
            allowed_statuses: vec!["A".to_string(), "B".to_string(), "E".to_string()],
        }
    }
}

impl OrderPolicy {
    #[must_use]
    pub fn allows(&self, status: &str) -> bool {
        self.allowed_statuses.iter().any(|s| s == status)
    }
}

/// Check that an order can be fulfilled for the requested items
///
/// Rows are matched with the same greedy policy as the reconciler. Only
/// matched rows are inspected.
///
/// # Errors
///
/// Returns [`Error::OrderState`] with every failed check, in this order:
/// order closed, status not allowed, per matched row (closed, nothing left
/// to ship), and no row matched at all (only when nothing else failed).
pub fn check_order(order: &Record, requested: &[RequestedItem], policy: &OrderPolicy) -> Result<()> {
    let order_id = order.id;
    let mut errors = Vec::new();

    if order.bool_field(header::IS_CLOSED) {
        errors.push(format!("order {order_id} is closed and cannot be modified"));
    }

    let status = order.str_field(header::ORDER_STATUS).unwrap_or_default();
    if !policy.allows(&status) {
        let shown = if status.is_empty() { "none" } else { status.as_str() };
        errors.push(format!(
            "order {order_id} is not in an approved status (current status: {shown})"
        ));
    }

    let existing: Vec<ExistingLine> = (0..order.line_count())
        .map(|i| ExistingLine::new(i, order.line_str(i, line::ITEM).unwrap_or_default()))
        .collect();

    let mut matched = 0;
    for m in reconcile(&existing, requested) {
        let Match::Matched(row, _) = m else {
            continue;
        };
        matched += 1;

        let i = row.line_number;
        let item = &row.item_ref;
        if order.line_bool(i, line::IS_CLOSED) {
            errors.push(format!(
                "line {} (item {item}) is closed and cannot be processed",
                i + 1
            ));
        }

        let quantity = order.line_f64(i, line::QUANTITY);
        let fulfilled = order.line_f64(i, line::QUANTITY_FULFILLED);
        if (quantity - fulfilled).abs() < f64::EPSILON {
            errors.push(format!(
                "line {} (item {item}) has no quantity left to ship",
                i + 1
            ));
        }
    }

    if matched == 0 && errors.is_empty() {
        errors.push(format!(
            "request items do not match the lines of order {order_id}"
        ));
    }

    if errors.is_empty() {
        debug!(order = order_id, matched, "Order state checks passed");
        Ok(())
    } else {
        warn!(order = order_id, errors = errors.len(), "Order state checks failed");
        Err(Error::OrderState { order_id, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(status: &str, closed: bool, rows: &[(&str, f64, f64, bool)]) -> Record {
        let mut order = Record::new("salesorder", 5001);
        order
            .set_field(header::ORDER_STATUS, json!(status))
            .set_field(header::IS_CLOSED, json!(closed));
        order.lines = rows
            .iter()
            .map(|(item, qty, fulfilled, closed)| {
                let mut row = fulfil_model::record::FieldMap::new();
                row.insert(line::ITEM.to_string(), json!(item));
                row.insert(line::QUANTITY.to_string(), json!(qty));
                row.insert(line::QUANTITY_FULFILLED.to_string(), json!(fulfilled));
                row.insert(line::IS_CLOSED.to_string(), json!(closed));
                row
            })
            .collect();
        order
    }

    fn errors_of(result: Result<()>) -> Vec<String> {
        match result {
            Err(Error::OrderState { errors, .. }) => errors,
            other => panic!("Expected OrderState, got {other:?}"),
        }
    }

    #[test]
    fn test_open_order_passes() {
        let order = order("B", false, &[("1001", 5.0, 0.0, false), ("2002", 1.0, 0.0, false)]);
        let requested = vec![RequestedItem::new("2002", 1.0)];

        assert!(check_order(&order, &requested, &OrderPolicy::default()).is_ok());
    }

    #[test]
    fn test_partially_fulfilled_status_allowed() {
        let order = order("E", false, &[("1001", 5.0, 2.0, false)]);
        let requested = vec![RequestedItem::new("1001", 3.0)];

        assert!(check_order(&order, &requested, &OrderPolicy::default()).is_ok());
    }

    #[test]
    fn test_all_errors_collected() {
        let order = order(
            "G",
            true,
            &[
                ("1001", 5.0, 5.0, false),
                ("2002", 1.0, 0.0, true),
                ("3003", 1.0, 1.0, true),
            ],
        );
        let requested = vec![
            RequestedItem::new("1001", 1.0),
            RequestedItem::new("2002", 1.0),
        ];

        let errors = errors_of(check_order(&order, &requested, &OrderPolicy::default()));

        assert_eq!(
            errors,
            vec![
                "order 5001 is closed and cannot be modified",
                "order 5001 is not in an approved status (current status: G)",
                "line 1 (item 1001) has no quantity left to ship",
                "line 2 (item 2002) is closed and cannot be processed",
            ]
        );
    }

    #[test]
    fn test_no_match_reported_alone() {
        let order = order("B", false, &[("1001", 5.0, 0.0, false)]);
        let requested = vec![RequestedItem::new("9999", 1.0)];

        let errors = errors_of(check_order(&order, &requested, &OrderPolicy::default()));
        assert_eq!(errors, vec!["request items do not match the lines of order 5001"]);

        // suppressed when another check already failed
        let order = order_with_status_only("H");
        let errors = errors_of(check_order(&order, &requested, &OrderPolicy::default()));
        assert_eq!(
            errors,
            vec!["order 5001 is not in an approved status (current status: H)"]
        );
    }

    fn order_with_status_only(status: &str) -> Record {
        order(status, false, &[("1001", 5.0, 0.0, false)])
    }

    #[test]
    fn test_missing_status() {
        let mut order = order("B", false, &[("1001", 5.0, 0.0, false)]);
        order.fields.remove(header::ORDER_STATUS);

        let errors = errors_of(check_order(
            &order,
            &[RequestedItem::new("1001", 1.0)],
            &OrderPolicy::default(),
        ));
        assert_eq!(
            errors,
            vec!["order 5001 is not in an approved status (current status: none)"]
        );
    }

    #[test]
    fn test_custom_policy() {
        let order = order("D", false, &[("1001", 5.0, 0.0, false)]);
        let policy = OrderPolicy {
            allowed_statuses: vec!["D".to_string()],
        };

        assert!(check_order(&order, &[RequestedItem::new("1001", 1.0)], &policy).is_ok());
    }
}
