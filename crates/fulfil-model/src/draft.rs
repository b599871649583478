//! Fulfillment draft
//!
//! A draft is what the host hands back when a source order is transformed
//! into an item fulfillment. Its item rows are an immutable list: callers
//! build a replacement list and swap it in with [`FulfillmentDraft::with_lines`]
//! instead of editing rows in place.
#![allow(clippy::must_use_candidate)] // Constructor helpers are clear at call sites without #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent setters are designed for chaining.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::fields::line;
use crate::lines::{ExistingLine, InventoryType, ItemKind};
use crate::record::{self, FieldMap, Record, RecordId, RecordRef};

/// Resolved inventory assignment for one row
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryPlanEntry {
    /// Resolved inventory (serial/lot) number id
    #[serde(rename = "issueinventorynumber", default, skip_serializing_if = "Option::is_none")]
    pub inventory_number: Option<String>,
    /// Resolved bin id
    #[serde(rename = "binnumber", default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
    /// Inventory status, passed through from the request
    #[serde(rename = "inventorystatus", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub quantity: f64,
}

/// An item row of the draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    pub line_number: usize,
    pub item_ref: String,
    pub inventory_type: InventoryType,
    pub item_kind: ItemKind,
    pub location: Option<String>,
    pub quantity: f64,
    /// Whether the row takes part in this fulfillment
    pub receive: bool,
    pub inventory_plan: Vec<InventoryPlanEntry>,
}

impl DraftLine {
    /// Read a row from a host sublist row
    pub fn from_row(line_number: usize, row: &FieldMap) -> Self {
        let get = |id: &str| row.get(id).and_then(record::text);
        let inventory_plan = row
            .get(line::INVENTORY_DETAIL)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default();

        Self {
            line_number,
            item_ref: get(line::ITEM).unwrap_or_default(),
            inventory_type: get(line::INVENTORY_TYPE)
                .map(|c| InventoryType::from_code(&c))
                .unwrap_or_default(),
            item_kind: get(line::ITEM_TYPE)
                .map(|c| ItemKind::from_code(&c))
                .unwrap_or_default(),
            location: get(line::LOCATION),
            quantity: row.get(line::QUANTITY).and_then(record::number).unwrap_or(0.0),
            receive: row.get(line::RECEIVE).is_some_and(record::flag),
            inventory_plan,
        }
    }

    /// Write the row back in host sublist form
    pub fn to_row(&self) -> FieldMap {
        let mut row = FieldMap::new();
        row.insert(line::ITEM.to_string(), json!(self.item_ref));
        row.insert(
            line::INVENTORY_TYPE.to_string(),
            json!(self.inventory_type.code()),
        );
        row.insert(line::ITEM_TYPE.to_string(), json!(self.item_kind.code()));
        row.insert(
            line::LOCATION.to_string(),
            self.location.as_ref().map_or(Value::Null, |l| json!(l)),
        );
        row.insert(line::QUANTITY.to_string(), json!(self.quantity));
        row.insert(line::RECEIVE.to_string(), json!(self.receive));
        if !self.inventory_plan.is_empty() {
            row.insert(
                line::INVENTORY_DETAIL.to_string(),
                json!(self.inventory_plan),
            );
        }
        row
    }

    /// Matching view of the row
    pub fn existing(&self) -> ExistingLine {
        ExistingLine {
            line_number: self.line_number,
            item_ref: self.item_ref.clone(),
            inventory_type: self.inventory_type,
            item_kind: self.item_kind,
            location: self.location.clone(),
        }
    }
}

/// A transformed, unsaved item fulfillment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FulfillmentDraft {
    /// Order the draft was created from
    pub source: RecordRef,
    /// Host record type of the draft
    pub record_type: String,
    /// Header field values
    pub fields: FieldMap,
    /// Item rows in line order
    pub lines: Vec<DraftLine>,
}

impl FulfillmentDraft {
    /// Create an empty draft for a source order
    pub fn new(source: RecordRef, record_type: impl Into<String>) -> Self {
        Self {
            source,
            record_type: record_type.into(),
            fields: FieldMap::new(),
            lines: Vec::new(),
        }
    }

    /// Raw header value
    pub fn field(&self, field_id: &str) -> Option<&Value> {
        self.fields.get(field_id)
    }

    /// Header value rendered as text
    pub fn str_field(&self, field_id: &str) -> Option<String> {
        self.field(field_id).and_then(record::text)
    }

    /// Set a header value
    pub fn with_field(mut self, field_id: impl Into<String>, value: Value) -> Self {
        self.fields.insert(field_id.into(), value);
        self
    }

    /// Set a header value unless it is null or an empty string.
    ///
    /// Returns whether the value was written.
    pub fn set_if_present(&mut self, field_id: &str, value: Option<Value>) -> bool {
        match value {
            Some(v) if !record::is_blank(&v) => {
                self.fields.insert(field_id.to_string(), v);
                true
            }
            _ => false,
        }
    }

    /// Replace the row list
    pub fn with_lines(mut self, lines: Vec<DraftLine>) -> Self {
        self.lines = lines;
        self
    }

    /// Matching view of every row in line order
    pub fn existing_lines(&self) -> Vec<ExistingLine> {
        self.lines.iter().map(DraftLine::existing).collect()
    }

    /// Rows flagged for this fulfillment
    pub fn received_lines(&self) -> impl Iterator<Item = &DraftLine> {
        self.lines.iter().filter(|l| l.receive)
    }

    /// Host record form of the draft once it has an id
    pub fn into_record(self, id: RecordId) -> Record {
        let lines = self.lines.iter().map(DraftLine::to_row).collect();
        let mut record = Record::new(self.record_type, id);
        record.fields = self.fields;
        record.fields.insert(
            crate::fields::header::CREATED_FROM.to_string(),
            json!(self.source.id),
        );
        record.lines = lines;
        record
    }
}
