//! Inventory plan derivation

use crate::{Error, LookupKind, Result};
use fulfil_model::{ExistingLine, InventoryPlanEntry, RequestedItem};
use tracing::{debug, trace};

/// Resolves request codes to host inventory identifiers
///
/// Implementations search with "starts with" semantics and return the first
/// row. `Ok(None)` means nothing matched; `Err` means the lookup itself failed.
pub trait InventoryLookup {
    /// Bin id for a bin code, optionally scoped to a location
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying search fails.
    fn find_bin(&self, bin_number: &str, location: Option<&str>) -> Result<Option<String>>;

    /// Inventory number id for a serial or lot code, scoped to a bin and location
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying search fails.
    fn find_lot(
        &self,
        serial_lot_number: &str,
        bin: Option<&str>,
        location: Option<&str>,
    ) -> Result<Option<String>>;
}

impl<T: InventoryLookup + ?Sized> InventoryLookup for &T {
    fn find_bin(&self, bin_number: &str, location: Option<&str>) -> Result<Option<String>> {
        (**self).find_bin(bin_number, location)
    }

    fn find_lot(
        &self,
        serial_lot_number: &str,
        bin: Option<&str>,
        location: Option<&str>,
    ) -> Result<Option<String>> {
        (**self).find_lot(serial_lot_number, bin, location)
    }
}

/// Build the inventory plan of a matched row
///
/// One entry per requested assignment, in order. The bin is resolved first
/// and scopes the lot lookup. Lookups use the requested location, falling
/// back to the row's own.
///
/// # Errors
///
/// Returns [`Error::LookupNotFound`] on the first code that does not
/// resolve; no partial plan is returned.
pub fn plan_inventory(
    line: &ExistingLine,
    requested: &RequestedItem,
    lookup: &impl InventoryLookup,
) -> Result<Vec<InventoryPlanEntry>> {
    let location = requested.location.as_deref().or(line.location.as_deref());
    let not_found = |kind, value: &str| Error::LookupNotFound {
        kind,
        value: value.to_string(),
        line: line.line_number,
        location: location.map(str::to_string),
    };

    let mut plan = Vec::with_capacity(requested.inventory_detail.len());
    for assignment in &requested.inventory_detail {
        let bin = match non_empty(assignment.bin_number.as_deref()) {
            Some(code) => {
                let id = lookup
                    .find_bin(code, location)?
                    .ok_or_else(|| not_found(LookupKind::Bin, code))?;
                trace!(line = line.line_number, bin = code, id = %id, "Resolved bin");
                Some(id)
            }
            None => None,
        };

        let inventory_number = match non_empty(assignment.serial_lot_number.as_deref()) {
            Some(code) => {
                let id = lookup
                    .find_lot(code, bin.as_deref(), location)?
                    .ok_or_else(|| not_found(LookupKind::InventoryNumber, code))?;
                trace!(line = line.line_number, lot = code, id = %id, "Resolved inventory number");
                Some(id)
            }
            None => None,
        };

        plan.push(InventoryPlanEntry {
            inventory_number,
            bin,
            status: assignment.status.clone(),
            quantity: assignment.quantity,
        });
    }

    debug!(
        line = line.line_number,
        item = %line.item_ref,
        entries = plan.len(),
        "Derived inventory plan"
    );
    Ok(plan)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
