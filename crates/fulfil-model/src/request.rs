//! Typed view of the registration request
//!
//! The payload is schema-validated as raw JSON first; these types are only
//! deserialized afterwards, so they stay permissive (optional fields default
//! to `None`, unknown keys are ignored).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::fields::header;
use crate::lines::RequestedItem;
use crate::record::RecordId;
use crate::{Error, Result};

/// Date format of `trandate` in requests
pub const REQUEST_DATE_FORMAT: &str = "%d/%m/%Y";

/// Kind of source order a fulfillment is created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Transfer order
    #[serde(rename = "OTR")]
    Transfer,
    /// Sales order
    #[serde(rename = "OV")]
    Sales,
    /// Return-authorization order
    #[serde(rename = "ODV")]
    Return,
}

impl OrderType {
    /// Request code of the order type
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Transfer => "OTR",
            Self::Sales => "OV",
            Self::Return => "ODV",
        }
    }

    /// Whether the destination is a customer address rather than a location
    #[must_use]
    pub fn ships_to_customer(self) -> bool {
        matches!(self, Self::Sales | Self::Return)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Root of the request payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    #[serde(rename = "itemFulfillment")]
    pub item_fulfillment: FulfillmentRequest,
}

/// The `itemFulfillment` object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentRequest {
    pub order_id: String,
    pub order_type: OrderType,
    #[serde(default)]
    pub tranid: Option<String>,
    #[serde(default)]
    pub trandate: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub shipaddress: Option<String>,
    pub shipstatus: String,
    pub localizations: Localizations,
    pub items: Vec<RequestedItem>,
    #[serde(default)]
    pub files: Option<Attachments>,

    // Host body fields some callers send through verbatim.
    #[serde(rename = "shipaddresslist", default)]
    pub ship_address_list: Option<Value>,
    #[serde(rename = "custbody_pe_delivery_information", default)]
    pub delivery_information: Option<Value>,
    #[serde(rename = "custbody_pe_numero_de_registro_mtc", default)]
    pub mtc_registration: Option<Value>,
    #[serde(rename = "custbody_pe_cert_insc_transportista", default)]
    pub carrier_certificate: Option<Value>,
    #[serde(rename = "custbody_pe_conductor", default)]
    pub driver: Option<Value>,
    #[serde(rename = "custbody_pe_ubigeo_punto_llegada", default)]
    pub arrival_ubigeo: Option<Value>,
    #[serde(rename = "custbody_uni_peso_total", default)]
    pub total_weight: Option<Value>,
    #[serde(rename = "custbody_uni_cubicaje_total", default)]
    pub total_volume: Option<Value>,
}

impl FulfillmentRequest {
    /// Parse `orderId` as a host record id
    ///
    /// # Errors
    ///
    /// Returns an error when the id is not a non-negative integer.
    pub fn order_record_id(&self) -> Result<RecordId> {
        self.order_id
            .trim()
            .parse()
            .map_err(|_| Error::invalid_value("orderId", format!("'{}' is not a record id", self.order_id)))
    }

    /// Parse `trandate` (DD/MM/YYYY)
    ///
    /// # Errors
    ///
    /// Returns an error when the date is present but not a calendar date.
    pub fn transaction_date(&self) -> Result<Option<NaiveDate>> {
        match self.trandate.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, REQUEST_DATE_FORMAT)
                .map(Some)
                .map_err(|_| Error::InvalidDate {
                    value: raw.to_string(),
                    format: "DD/MM/YYYY".to_string(),
                }),
        }
    }
}

/// The `localizations` object (electronic shipping guide data)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Localizations {
    pub document_type: String,
    pub serie_location: String,
    pub serie: String,
    #[serde(default)]
    pub delivery_information: Option<String>,
    #[serde(default)]
    pub driver: Option<String>,
    #[serde(default)]
    pub source_location: Option<String>,
    pub transport_mode: String,
    #[serde(default)]
    pub transport_reason: Option<String>,
    #[serde(default)]
    pub transport_reason_detail: Option<String>,
    pub source_ubigeo_code: String,
    #[serde(default)]
    pub destination_ubigeo_code: Option<String>,
    #[serde(default)]
    pub ticket: Option<String>,
}

/// Printed documents attached to the fulfillment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachments {
    #[serde(default)]
    pub printed_cdr_response: Option<AttachmentPayload>,
    #[serde(default)]
    pub printed_pdf: Option<AttachmentPayload>,
    #[serde(default)]
    pub printed_xml_request: Option<AttachmentPayload>,
    #[serde(default)]
    pub printed_xml_response: Option<AttachmentPayload>,
}

impl Attachments {
    /// Payload for one attachment slot
    #[must_use]
    pub fn get(&self, kind: AttachmentKind) -> Option<&AttachmentPayload> {
        match kind {
            AttachmentKind::CdrResponse => self.printed_cdr_response.as_ref(),
            AttachmentKind::Pdf => self.printed_pdf.as_ref(),
            AttachmentKind::XmlRequest => self.printed_xml_request.as_ref(),
            AttachmentKind::XmlResponse => self.printed_xml_response.as_ref(),
        }
    }
}

/// One Base64 document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPayload {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

impl AttachmentPayload {
    /// Both content and file name are present
    #[must_use]
    pub fn is_uploadable(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
            && self.file_name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Base64 body with any `data:<mime>;base64,` prefix removed
    #[must_use]
    pub fn base64_body(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(|c| c.split_once(',').map_or(c, |(_, body)| body))
    }
}

/// Attachment slots and where their file ids are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    CdrResponse,
    Pdf,
    XmlRequest,
    XmlResponse,
}

impl AttachmentKind {
    /// Upload order
    pub const ALL: [AttachmentKind; 4] = [
        AttachmentKind::CdrResponse,
        AttachmentKind::Pdf,
        AttachmentKind::XmlRequest,
        AttachmentKind::XmlResponse,
    ];

    /// File type code passed to the file store
    #[must_use]
    pub fn file_type(self) -> &'static str {
        match self {
            Self::CdrResponse => "ZIP",
            Self::Pdf => "PDF",
            Self::XmlRequest | Self::XmlResponse => "XML",
        }
    }

    /// Header field receiving the uploaded file id
    #[must_use]
    pub fn field_id(self) -> &'static str {
        match self {
            Self::CdrResponse => header::PRINTED_CDR_RESPONSE,
            Self::Pdf => header::PRINTED_PDF,
            Self::XmlRequest => header::PRINTED_XML_REQUEST,
            Self::XmlResponse => header::PRINTED_XML_RESPONSE,
        }
    }

    /// Payload key
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::CdrResponse => "printedCdrResponse",
            Self::Pdf => "printedPdf",
            Self::XmlRequest => "printedXmlRequest",
            Self::XmlResponse => "printedXmlResponse",
        }
    }
}
