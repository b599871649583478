//! Reconciliation inputs

use serde::{Deserialize, Serialize};

/// Inventory tracking mode of an item row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InventoryType {
    /// Lot/serial/bin tracked; rows need an inventory detail
    Tracked,
    #[default]
    Other,
}

impl InventoryType {
    /// Interpret the host `invttype` code
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        if code == "T" {
            Self::Tracked
        } else {
            Self::Other
        }
    }

    /// Host `invttype` code
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Tracked => "T",
            Self::Other => "",
        }
    }
}

/// Kind of item on a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ItemKind {
    Service,
    #[default]
    Other,
}

impl ItemKind {
    /// Interpret the host `itemtype` value
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        if code == "Service" {
            Self::Service
        } else {
            Self::Other
        }
    }

    /// Host `itemtype` value
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Service => "Service",
            Self::Other => "InvtPart",
        }
    }
}

/// A row of the source order or fulfillment draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingLine {
    /// 0-based row index, stable for the draft's lifetime
    pub line_number: usize,
    /// Item reference used for matching
    pub item_ref: String,
    pub inventory_type: InventoryType,
    pub item_kind: ItemKind,
    /// Location currently set on the row
    pub location: Option<String>,
}

impl ExistingLine {
    pub fn new(line_number: usize, item_ref: impl Into<String>) -> Self {
        Self {
            line_number,
            item_ref: item_ref.into(),
            inventory_type: InventoryType::Other,
            item_kind: ItemKind::Other,
            location: None,
        }
    }

    #[must_use]
    pub fn tracked(mut self) -> Self {
        self.inventory_type = InventoryType::Tracked;
        self
    }

    #[must_use]
    pub fn with_kind(mut self, item_kind: ItemKind) -> Self {
        self.item_kind = item_kind;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Whether a matched row needs an inventory plan
    #[must_use]
    pub fn needs_inventory_plan(&self) -> bool {
        self.inventory_type == InventoryType::Tracked && self.item_kind != ItemKind::Service
    }
}

/// An item the caller asks to fulfill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestedItem {
    #[serde(rename = "itemId")]
    pub item_ref: String,
    pub quantity: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub inventory_detail: Vec<InventoryAssignment>,
}

impl RequestedItem {
    pub fn new(item_ref: impl Into<String>, quantity: f64) -> Self {
        Self {
            item_ref: item_ref.into(),
            quantity,
            location: None,
            inventory_detail: Vec::new(),
        }
    }

    #[must_use]
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_assignment(mut self, assignment: InventoryAssignment) -> Self {
        self.inventory_detail.push(assignment);
        self
    }
}

/// One inventory sub-assignment of a requested item
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAssignment {
    #[serde(default)]
    pub serial_lot_number: Option<String>,
    #[serde(default)]
    pub bin_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub quantity: f64,
}

impl InventoryAssignment {
    #[must_use]
    pub fn in_bin(bin_number: impl Into<String>, quantity: f64) -> Self {
        Self {
            bin_number: Some(bin_number.into()),
            quantity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_lot(mut self, serial_lot_number: impl Into<String>) -> Self {
        self.serial_lot_number = Some(serial_lot_number.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_host_codes() {
        assert_eq!(InventoryType::from_code("T"), InventoryType::Tracked);
        assert_eq!(InventoryType::from_code("N"), InventoryType::Other);
        assert_eq!(ItemKind::from_code("Service"), ItemKind::Service);
        assert_eq!(ItemKind::from_code("InvtPart"), ItemKind::Other);
    }

    #[test]
    fn test_needs_inventory_plan() {
        assert!(ExistingLine::new(0, "A").tracked().needs_inventory_plan());
        assert!(!ExistingLine::new(0, "A").needs_inventory_plan());
        assert!(
            !ExistingLine::new(0, "A")
                .tracked()
                .with_kind(ItemKind::Service)
                .needs_inventory_plan()
        );
    }

    #[test]
    fn test_requested_item_from_payload() {
        let item: RequestedItem = serde_json::from_value(json!({
            "itemId": "X",
            "quantity": 2,
            "inventoryDetail": [
                { "binNumber": "B1", "serialLotNumber": "L-9", "quantity": 2 }
            ]
        }))
        .unwrap();

        assert_eq!(item.item_ref, "X");
        assert!(item.location.is_none());
        assert_eq!(item.inventory_detail.len(), 1);
        assert_eq!(item.inventory_detail[0].bin_number.as_deref(), Some("B1"));
        assert_eq!(item.inventory_detail[0].serial_lot_number.as_deref(), Some("L-9"));
        assert!(item.inventory_detail[0].status.is_none());
    }
}
