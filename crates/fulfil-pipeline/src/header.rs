//! Header parameters of the fulfillment
//!
//! Collected from the request, completed by host lookups and the draft, then
//! written onto the draft through a fixed field table.

use chrono::NaiveDate;
use fulfil_model::fields::header;
use fulfil_model::record::text;
use fulfil_model::{Attachments, FulfillmentDraft, FulfillmentRequest};
use serde::Serialize;
use serde_json::{Value, json};

use crate::Result;

/// Resolved header values, one per mapped host field
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderParams {
    pub order_id: String,
    pub order_type: String,
    pub tranid: Option<String>,
    pub trandate: Option<NaiveDate>,
    pub memo: Option<String>,
    pub shipping_address: Option<String>,
    pub shipstatus: Option<String>,
    pub document_type: Option<String>,
    pub serie_location: Option<String>,
    pub serie: Option<String>,
    pub delivery_information: Option<Value>,
    pub mtc_registration: Option<Value>,
    pub carrier_certificate: Option<Value>,
    pub driver: Option<Value>,
    pub source_location: Option<String>,
    pub source_ubigeo: Option<String>,
    pub transport_mode: Option<String>,
    pub transport_reason: Option<String>,
    pub ship_address_list: Option<Value>,
    pub destination_ubigeo: Option<String>,
    pub total_weight: Option<Value>,
    pub total_volume: Option<Value>,
    pub ticket: Option<String>,
    pub department: Option<Value>,
    pub class: Option<Value>,
    pub location: Option<Value>,
}

impl HeaderParams {
    /// Initial values taken from the request alone
    ///
    /// Body passthrough fields (`custbody_pe_conductor`, ...) win over their
    /// `localizations` counterparts. The destination ubigeo starts from
    /// `destinationUbigeoCode`, then `custbody_pe_ubigeo_punto_llegada`.
    ///
    /// # Errors
    ///
    /// Returns an error when `trandate` is not a calendar date.
    pub fn from_request(request: &FulfillmentRequest) -> Result<Self> {
        let loc = &request.localizations;
        Ok(Self {
            order_id: request.order_id.clone(),
            order_type: request.order_type.code().to_string(),
            tranid: non_empty(request.tranid.as_deref()),
            trandate: request.transaction_date()?,
            memo: non_empty(request.memo.as_deref()),
            shipping_address: non_empty(request.shipaddress.as_deref()),
            shipstatus: non_empty(Some(request.shipstatus.as_str())),
            document_type: non_empty(Some(loc.document_type.as_str())),
            serie_location: non_empty(Some(loc.serie_location.as_str())),
            serie: non_empty(Some(loc.serie.as_str())),
            delivery_information: request
                .delivery_information
                .clone()
                .or_else(|| loc.delivery_information.as_ref().map(|v| json!(v))),
            mtc_registration: request.mtc_registration.clone(),
            carrier_certificate: request.carrier_certificate.clone(),
            driver: request
                .driver
                .clone()
                .or_else(|| loc.driver.as_ref().map(|v| json!(v))),
            source_location: non_empty(loc.source_location.as_deref()),
            source_ubigeo: non_empty(Some(loc.source_ubigeo_code.as_str())),
            transport_mode: non_empty(Some(loc.transport_mode.as_str())),
            transport_reason: non_empty(loc.transport_reason.as_deref()),
            ship_address_list: request.ship_address_list.clone(),
            destination_ubigeo: non_empty(loc.destination_ubigeo_code.as_deref())
                .or_else(|| request.arrival_ubigeo.as_ref().and_then(text)),
            total_weight: request.total_weight.clone(),
            total_volume: request.total_volume.clone(),
            ticket: non_empty(loc.ticket.as_deref()),
            department: None,
            class: None,
            location: None,
        })
    }

    /// Copy the organisational fields the transform put on the draft
    pub fn take_classification(&mut self, draft: &FulfillmentDraft) {
        self.department = draft.field(header::DEPARTMENT).cloned();
        self.class = draft.field(header::CLASS).cloned();
        self.location = draft.field(header::LOCATION).cloned();
    }

    /// Host field id and value, in write order
    #[must_use]
    pub fn field_values(&self) -> Vec<(&'static str, Option<Value>)> {
        let s = |v: &Option<String>| v.as_ref().map(|s| json!(s));
        vec![
            (header::TRANID, s(&self.tranid)),
            (
                header::TRANDATE,
                self.trandate.map(|d| json!(d.format("%Y-%m-%d").to_string())),
            ),
            (header::MEMO, s(&self.memo)),
            (header::SHIPPING_ADDRESS, s(&self.shipping_address)),
            (header::SHIP_STATUS, s(&self.shipstatus)),
            (header::DOCUMENT_TYPE, s(&self.document_type)),
            (header::SERIE_LOCATION, s(&self.serie_location)),
            (header::SERIE, s(&self.serie)),
            (header::DELIVERY_INFORMATION, self.delivery_information.clone()),
            (header::MTC_REGISTRATION, self.mtc_registration.clone()),
            (header::CARRIER_CERTIFICATE, self.carrier_certificate.clone()),
            (header::DRIVER, self.driver.clone()),
            (header::SOURCE_LOCATION, s(&self.source_location)),
            (header::SOURCE_UBIGEO, s(&self.source_ubigeo)),
            (header::TRANSPORT_MODE, s(&self.transport_mode)),
            (header::TRANSPORT_REASON, s(&self.transport_reason)),
            (header::SHIP_ADDRESS_LIST, self.ship_address_list.clone()),
            (header::DESTINATION_UBIGEO, s(&self.destination_ubigeo)),
            (header::TOTAL_WEIGHT, self.total_weight.clone()),
            (header::TOTAL_VOLUME, self.total_volume.clone()),
            (header::TICKET, s(&self.ticket)),
            (header::DEPARTMENT, self.department.clone()),
            (header::CLASS, self.class.clone()),
            (header::LOCATION, self.location.clone()),
        ]
    }

    /// Write every non-blank value onto the draft; returns how many were written
    pub fn apply(&self, draft: &mut FulfillmentDraft) -> usize {
        let mut written = 0;
        for (field, value) in self.field_values() {
            if draft.set_if_present(field, value) {
                written += 1;
            }
        }
        written
    }
}

/// Pretty JSON of the header and attachments for the debug log
///
/// Attachment `content` strings longer than `limit` are replaced by
/// `[CONTENT_TRUNCATED: <n> bytes]`.
#[must_use]
pub fn log_snapshot(params: &HeaderParams, files: Option<&Attachments>, limit: usize) -> String {
    let mut snapshot = json!({ "header": params, "files": files });
    elide_content(&mut snapshot, limit);
    serde_json::to_string_pretty(&snapshot).unwrap_or_default()
}

fn elide_content(value: &mut Value, limit: usize) {
    match value {
        Value::Object(map) => {
            for (key, v) in map.iter_mut() {
                let oversized = match v {
                    Value::String(s) if key == "content" && s.len() > limit => Some(s.len()),
                    _ => None,
                };
                match oversized {
                    Some(len) => *v = json!(format!("[CONTENT_TRUNCATED: {len} bytes]")),
                    None => elide_content(v, limit),
                }
            }
        }
        Value::Array(items) => {
            for v in items {
                elide_content(v, limit);
            }
        }
        _ => {}
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
