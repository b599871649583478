//! Host field, column, and record type identifiers

/// Host record types
pub mod record_type {
    pub const ITEM_FULFILLMENT: &str = "itemfulfillment";
    pub const LOCATION: &str = "location";
    pub const CUSTOMER: &str = "customer";
    pub const BIN: &str = "bin";
    pub const INVENTORY_NUMBER_BIN: &str = "inventorynumberbin";
}

/// Header (body) fields of orders and fulfillments
pub mod header {
    pub const TRANID: &str = "tranid";
    pub const TRANDATE: &str = "trandate";
    pub const MEMO: &str = "memo";
    pub const SHIPPING_ADDRESS: &str = "shippingaddress";
    pub const SHIP_STATUS: &str = "shipstatus";
    pub const SHIP_ADDRESS_LIST: &str = "shipaddresslist";
    pub const DOCUMENT_TYPE: &str = "custbody_pe_document_type";
    pub const SERIE_LOCATION: &str = "custbody_pe_ubicacion_para_serie";
    pub const SERIE: &str = "custbody_pe_serie";
    pub const DELIVERY_INFORMATION: &str = "custbody_pe_delivery_information";
    pub const MTC_REGISTRATION: &str = "custbody_pe_numero_de_registro_mtc";
    pub const CARRIER_CERTIFICATE: &str = "custbody_pe_cert_insc_transportista";
    pub const DRIVER: &str = "custbody_pe_conductor";
    pub const SOURCE_LOCATION: &str = "custbody_pe_location_source";
    pub const SOURCE_UBIGEO: &str = "custbody_pe_ubigeo_punto_partida";
    pub const TRANSPORT_MODE: &str = "custbody_pe_modalidad_de_traslado";
    pub const TRANSPORT_REASON: &str = "custbody_pe_motivos_de_traslado";
    pub const DESTINATION_UBIGEO: &str = "custbody_pe_ubigeo_punto_llegada";
    pub const TOTAL_WEIGHT: &str = "custbody_uni_peso_total";
    pub const TOTAL_VOLUME: &str = "custbody_uni_cubicaje_total";
    pub const TICKET: &str = "custbody_pe_fe_ticket_id";
    pub const DEPARTMENT: &str = "department";
    pub const CLASS: &str = "class";
    pub const LOCATION: &str = "location";

    pub const ENTITY: &str = "entity";
    pub const TRANSFER_LOCATION: &str = "transferlocation";
    pub const ADDRESSBOOK_ADDRESS: &str = "addressbookaddress";
    pub const BILLING_ADDRESS: &str = "billingaddress";
    pub const CREATED_FROM: &str = "createdfrom";
    pub const IS_CLOSED: &str = "isclosed";
    pub const ORDER_STATUS: &str = "orderstatus";

    pub const PRINTED_CDR_RESPONSE: &str = "custbody_pe_ei_printed_cdr_res";
    pub const PRINTED_PDF: &str = "custbody_pe_ei_printed_pdf";
    pub const PRINTED_XML_REQUEST: &str = "custbody_pe_ei_printed_xml_req";
    pub const PRINTED_XML_RESPONSE: &str = "custbody_pe_ei_printed_xml_res";
}

/// Item sublist fields
pub mod line {
    pub const ITEM: &str = "item";
    pub const QUANTITY: &str = "quantity";
    pub const QUANTITY_FULFILLED: &str = "quantityfulfilled";
    pub const IS_CLOSED: &str = "isclosed";
    pub const INVENTORY_TYPE: &str = "invttype";
    pub const ITEM_TYPE: &str = "itemtype";
    pub const LOCATION: &str = "location";
    pub const RECEIVE: &str = "itemreceive";
    pub const INVENTORY_DETAIL: &str = "inventorydetail";
}

/// Search filter and column names
pub mod column {
    pub const INTERNAL_ID: &str = "internalid";
    pub const LOCATION: &str = "location";
    pub const BIN_NUMBER: &str = "binnumber";
    pub const INVENTORY_NUMBER: &str = "inventorynumber";
    pub const LOCATION_ADDRESS: &str = "custrecord_pe_direccion_origen";
    pub const LOCATION_UBIGEO: &str = "custrecord_pe_ubigeo_ubicacion";
    pub const ADDRESS_UBIGEO: &str = "custrecord_pe_ubigeo";
    pub const ADDRESS_INTERNAL_ID: &str = "address.internalid";

    /// Join names
    pub const JOIN_ADDRESS: &str = "Address";
    pub const JOIN_INVENTORY_NUMBER: &str = "inventoryNumber";
}
