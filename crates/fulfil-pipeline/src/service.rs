//! Registration service

use fulfil_host::Host;
use fulfil_model::fields::header;
use fulfil_model::{FulfillmentDraft, OrderType, RecordId, RegistrationRequest, Response};
use fulfil_reconcile::{check_order, reconcile_lines};
use fulfil_schema::{SchemaLoader, SchemaRegistry, fulfillment_registry};
use fulfil_validation::{ValidationEngine, ValidationResult};
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::attachments::upload_attachments;
use crate::config::ServiceConfig;
use crate::header::{HeaderParams, log_snapshot};
use crate::lookups::{HostInventoryLookup, find_customer_ubigeo, find_location};
use crate::{Error, Result};

/// Draft fields holding the customer address, in preference order
const CUSTOMER_ADDRESS_FIELDS: [&str; 3] = [
    header::ADDRESSBOOK_ADDRESS,
    header::BILLING_ADDRESS,
    header::SHIPPING_ADDRESS,
];

/// Registers item fulfillments against a host
///
/// One service can handle any number of sequential requests; it keeps no
/// per-request state.
#[derive(Debug)]
pub struct FulfillmentService<H> {
    host: H,
    registry: SchemaRegistry,
    config: ServiceConfig,
}

impl<H: Host> FulfillmentService<H> {
    /// Service with the built-in request schema and default configuration
    pub fn new(host: H) -> Self {
        Self {
            host,
            registry: fulfillment_registry(),
            config: ServiceConfig::default(),
        }
    }

    /// Service configured from a [`ServiceConfig`]
    ///
    /// # Errors
    ///
    /// Returns an error when the configured schema file cannot be loaded.
    pub fn with_config(host: H, config: ServiceConfig) -> Result<Self> {
        let registry = match &config.schema_file {
            Some(path) => {
                info!(path = %path.display(), "Loading request schema");
                SchemaLoader::default().load_from_file(path)?
            }
            None => fulfillment_registry(),
        };
        Ok(Self {
            host,
            registry,
            config,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validate a payload against the configured root schema
    pub fn validate(&self, payload: &Value) -> ValidationResult {
        ValidationEngine::with_config(&self.registry, self.config.validation())
            .validate(payload, &self.config.root_schema)
    }

    /// Register a fulfillment and answer with the response envelope
    pub fn register(&self, payload: &Value) -> Response {
        match self.try_register(payload) {
            Ok(record_id) => Response::success(record_id),
            Err(e) => {
                error!(error = %e, "Registration failed");
                e.to_response()
            }
        }
    }

    /// Register a fulfillment and return the saved record id
    ///
    /// # Errors
    ///
    /// Returns the first failure; nothing is saved unless every step before
    /// the save succeeded.
    pub fn try_register(&self, payload: &Value) -> Result<RecordId> {
        let validation = self.validate(payload);
        if !validation.is_valid {
            warn!(errors = validation.errors.len(), "Schema validation failed");
            return Err(Error::SchemaValidation {
                errors: validation.errors,
            });
        }
        debug!("Payload validated");

        let request = serde_json::from_value::<RegistrationRequest>(payload.clone())
            .map_err(|e| fulfil_model::Error::invalid_value("itemFulfillment", e.to_string()))?
            .item_fulfillment;
        let order_id = request.order_record_id()?;
        let mut params = HeaderParams::from_request(&request)?;
        info!(
            order = order_id,
            order_type = %request.order_type,
            items = request.items.len(),
            "Registering item fulfillment"
        );

        let folder_id = self.domain_value(&self.config.folder_code, None)?;

        if let Some(location_id) = params.source_location.clone() {
            let location = find_location(&self.host, &location_id)?
                .ok_or_else(|| not_found("location", &location_id))?;
            if location.ubigeo.is_some() {
                params.source_ubigeo = location.ubigeo;
            }
        }

        let source_type =
            self.domain_value(&self.config.record_type_code, Some(request.order_type.code()))?;
        debug!(order = order_id, record_type = %source_type, "Loading source order");
        let order = self.host.load(&source_type, order_id).map_err(|e| match e {
            fulfil_host::Error::NotFound { .. } => Error::OrderNotFound { order_id },
            other => Error::Host(other),
        })?;
        check_order(&order, &request.items, &self.config.order_policy)?;

        let draft =
            self.host
                .transform(&source_type, order_id, &self.config.target_record_type)?;
        debug!(order = order_id, lines = draft.lines.len(), "Order transformed");

        self.resolve_destination(request.order_type, &draft, &mut params)?;
        params.take_classification(&draft);
        debug!(
            params = %log_snapshot(&params, request.files.as_ref(), self.config.log_content_limit),
            "Header parameters"
        );

        // uploads wait until every inventory lookup has resolved
        let lookup = HostInventoryLookup::new(&self.host);
        let reconciliation = reconcile_lines(&draft.existing_lines(), &request.items, &lookup)?;
        if reconciliation.is_total_mismatch() {
            return Err(Error::OrderState {
                order_id,
                errors: vec![format!(
                    "request items do not match the lines of order {order_id}"
                )],
            });
        }
        let mut draft: FulfillmentDraft = reconciliation.apply_to(draft);

        let written = params.apply(&mut draft);
        let uploaded =
            upload_attachments(&self.host, request.files.as_ref(), &folder_id, &mut draft)?;
        debug!(fields = written, attachments = uploaded, "Header assigned");

        let record_id = self.host.save(&draft).map_err(Error::persistence)?;
        info!(order = order_id, record = record_id, "Item fulfillment saved");

        if let Some(tranid) = params.tranid.as_deref() {
            self.correct_tranid(record_id, tranid)?;
        }
        Ok(record_id)
    }

    fn domain_value(&self, code: &str, qualifier: Option<&str>) -> Result<String> {
        let value = self.host.value(code, qualifier).map_err(|e| match e {
            fulfil_host::Error::Config { code, details } => Error::DomainConfig { code, details },
            other => Error::Host(other),
        })?;
        debug!(code, qualifier, value = %value, "Domain value");
        Ok(value)
    }

    /// Fill the shipping address and destination ubigeo
    ///
    /// Transfers ship to the draft's transfer location, which must exist.
    /// Sales and returns ship to a customer address; its ubigeo is optional.
    /// An ubigeo already taken from the request is never replaced.
    fn resolve_destination(
        &self,
        order_type: OrderType,
        draft: &FulfillmentDraft,
        params: &mut HeaderParams,
    ) -> Result<()> {
        if order_type.ships_to_customer() {
            if params.shipping_address.is_none() {
                params.shipping_address = CUSTOMER_ADDRESS_FIELDS
                    .iter()
                    .find_map(|field| draft.str_field(field));
            }
            if params.destination_ubigeo.is_none() {
                let customer = draft.str_field(header::ENTITY);
                if let (Some(customer), Some(address)) =
                    (customer.as_deref(), params.shipping_address.as_deref())
                {
                    params.destination_ubigeo = find_customer_ubigeo(&self.host, customer, address)?;
                }
            }
        } else {
            if params.shipping_address.is_none() {
                params.shipping_address = draft.str_field(header::TRANSFER_LOCATION);
            }
            if let Some(location_id) = params.shipping_address.as_deref() {
                let location = find_location(&self.host, location_id)?
                    .ok_or_else(|| not_found("location", location_id))?;
                if params.destination_ubigeo.is_none() {
                    params.destination_ubigeo = location.ubigeo;
                }
            }
        }

        debug!(
            order_type = %order_type,
            address = ?params.shipping_address,
            ubigeo = ?params.destination_ubigeo,
            "Destination resolved"
        );
        Ok(())
    }

    /// Write the requested `tranid` back when the host renumbered it on save
    fn correct_tranid(&self, record_id: RecordId, tranid: &str) -> Result<()> {
        let mut saved = self
            .host
            .load(&self.config.target_record_type, record_id)
            .map_err(Error::persistence)?;

        let stored = saved.str_field(header::TRANID);
        if stored.as_deref() == Some(tranid) {
            return Ok(());
        }

        warn!(
            record = record_id,
            stored = ?stored,
            requested = tranid,
            "Stored tranid differs from the request, writing it back"
        );
        saved.set_field(header::TRANID, json!(tranid));
        self.host.save_record(&saved).map_err(Error::persistence)?;
        Ok(())
    }
}

fn not_found(record_type: &str, value: &str) -> Error {
    Error::RecordNotFound {
        record_type: record_type.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfil_host::{DomainValue, MemoryHost};
    use fulfil_model::Record;

    fn payload(order_type: &str) -> Value {
        json!({
            "itemFulfillment": {
                "orderId": "5001",
                "orderType": order_type,
                "shipstatus": "C",
                "localizations": {
                    "documentType": "31",
                    "serieLocation": "12",
                    "serie": "T001",
                    "transportMode": "02",
                    "sourceUbigeoCode": "150101"
                },
                "items": [{ "itemId": "1001", "quantity": 1, "inventoryDetail": [{ "binNumber": "A-01", "quantity": 1 }] }]
            }
        })
    }

    fn host() -> MemoryHost {
        let host = MemoryHost::new();
        host.add_domain_value(DomainValue::new("ruta_folder_fulfillment", "645"));
        host.add_domain_value(DomainValue::new("record_type_fulfillment", "salesorder").qualified("OV"));
        host.insert_record(
            serde_json::from_value::<Record>(json!({
                "record_type": "salesorder",
                "id": 5001,
                "fields": { "orderstatus": "B" },
                "lines": [{ "item": "1001", "quantity": 2 }]
            }))
            .unwrap(),
        );
        host
    }

    #[test]
    fn test_schema_errors_stop_before_host_calls() {
        let service = FulfillmentService::new(MemoryHost::new());
        let mut request = payload("OV");
        request["itemFulfillment"]["items"] = json!([]);

        let response = service.register(&request);

        assert!(!response.success);
        assert_eq!(
            response.details,
            Some(json!(["itemFulfillment.items is required"]))
        );
    }

    #[test]
    fn test_missing_folder_configuration() {
        let service = FulfillmentService::new(MemoryHost::new());

        let err = service.try_register(&payload("OV")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Domain configuration not found for ruta_folder_fulfillment: no value configured"
        );
    }

    #[test]
    fn test_unconfigured_order_type() {
        let service = FulfillmentService::new(host());

        let err = service.try_register(&payload("ODV")).unwrap_err();
        assert!(matches!(err, Error::DomainConfig { ref code, .. } if code == "record_type_fulfillment"));
    }

    #[test]
    fn test_unknown_order() {
        let service = FulfillmentService::new(host());
        let mut request = payload("OV");
        request["itemFulfillment"]["orderId"] = json!("404");

        let response = service.register(&request);
        assert_eq!(
            response.message.as_deref(),
            Some("Order with ID 404 was not found")
        );
    }

    #[test]
    fn test_non_numeric_order_id() {
        let service = FulfillmentService::new(host());
        let mut request = payload("OV");
        request["itemFulfillment"]["orderId"] = json!("SO-5001");

        let err = service.try_register(&request).unwrap_err();
        assert!(matches!(err, Error::Request(_)));
    }

    #[test]
    fn test_missing_source_location() {
        let service = FulfillmentService::new(host());
        let mut request = payload("OV");
        request["itemFulfillment"]["localizations"]["sourceLocation"] = json!("99");
        service.host().add_rows("location", Vec::new());

        let err = service.try_register(&request).unwrap_err();
        assert_eq!(err.to_string(), "No location found for '99'");
    }

    #[test]
    fn test_custom_root_schema() {
        let config = ServiceConfig {
            root_schema: "missing".to_string(),
            ..ServiceConfig::default()
        };
        let service = FulfillmentService::with_config(host(), config).unwrap();

        let result = service.validate(&payload("OV"));
        assert_eq!(result.errors, vec!["Validation schema 'missing' not found"]);
    }
}
