//! Host searches used during registration

use fulfil_host::{Column, Filter, Search, SearchQuery};
use fulfil_model::fields::{column, record_type};
use fulfil_reconcile::InventoryLookup;
use tracing::debug;

/// Address and ubigeo of a location
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocationAddress {
    pub address: Option<String>,
    pub ubigeo: Option<String>,
}

/// Address and ubigeo of a location, `None` when no location has that id
///
/// # Errors
///
/// Returns an error when the search fails.
pub fn find_location<H: Search + ?Sized>(
    host: &H,
    location_id: &str,
) -> fulfil_host::Result<Option<LocationAddress>> {
    let address = Column::new(column::LOCATION_ADDRESS);
    let ubigeo = Column::new(column::LOCATION_UBIGEO);
    let query = SearchQuery::new(record_type::LOCATION)
        .filter(Filter::any_of(column::INTERNAL_ID, [location_id.to_string()]))
        .column(address.clone())
        .column(ubigeo.clone())
        .max_results(1);

    let found = host.search(&query)?.into_iter().next().map(|row| LocationAddress {
        address: row.text(&address),
        ubigeo: row.text(&ubigeo),
    });
    debug!(location = location_id, found = found.is_some(), "Location lookup");
    Ok(found)
}

/// Ubigeo stored on one of a customer's address book entries
///
/// # Errors
///
/// Returns an error when the search fails.
pub fn find_customer_ubigeo<H: Search + ?Sized>(
    host: &H,
    customer_id: &str,
    address_id: &str,
) -> fulfil_host::Result<Option<String>> {
    let ubigeo = Column::joined(column::ADDRESS_UBIGEO, column::JOIN_ADDRESS);
    let query = SearchQuery::new(record_type::CUSTOMER)
        .filter(Filter::any_of(column::INTERNAL_ID, [customer_id.to_string()]))
        .filter(Filter::any_of(column::ADDRESS_INTERNAL_ID, [address_id.to_string()]))
        .column(ubigeo.clone())
        .max_results(1);

    let found = host
        .search(&query)?
        .into_iter()
        .next()
        .and_then(|row| row.text(&ubigeo));
    debug!(customer = customer_id, address = address_id, found = found.is_some(), "Customer address lookup");
    Ok(found)
}

/// [`InventoryLookup`] over host bin and inventory-number searches
pub struct HostInventoryLookup<'h, H: Search + ?Sized> {
    host: &'h H,
}

impl<'h, H: Search + ?Sized> HostInventoryLookup<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    fn first_id(&self, query: &SearchQuery, id: &Column) -> fulfil_reconcile::Result<Option<String>> {
        let rows = self
            .host
            .search(query)
            .map_err(|e| fulfil_reconcile::Error::lookup(e.to_string()))?;
        Ok(rows.into_iter().next().and_then(|row| row.text(id)))
    }
}

impl<H: Search + ?Sized> InventoryLookup for HostInventoryLookup<'_, H> {
    fn find_bin(&self, bin_number: &str, location: Option<&str>) -> fulfil_reconcile::Result<Option<String>> {
        let id = Column::new(column::INTERNAL_ID);
        let mut query = SearchQuery::new(record_type::BIN)
            .filter(Filter::starts_with(column::BIN_NUMBER, bin_number));
        if let Some(location) = location {
            query = query.filter(Filter::any_of(column::LOCATION, [location.to_string()]));
        }

        self.first_id(&query.column(id.clone()).max_results(1), &id)
    }

    fn find_lot(
        &self,
        serial_lot_number: &str,
        bin: Option<&str>,
        location: Option<&str>,
    ) -> fulfil_reconcile::Result<Option<String>> {
        let id = Column::joined(column::INTERNAL_ID, column::JOIN_INVENTORY_NUMBER);
        let mut query = SearchQuery::new(record_type::INVENTORY_NUMBER_BIN)
            .filter(Filter::starts_with(column::INVENTORY_NUMBER, serial_lot_number));
        if let Some(bin) = bin {
            query = query.filter(Filter::any_of(column::BIN_NUMBER, [bin.to_string()]));
        }
        if let Some(location) = location {
            query = query.filter(Filter::any_of(column::LOCATION, [location.to_string()]));
        }

        self.first_id(&query.column(id.clone()).max_results(1), &id)
    }
}
