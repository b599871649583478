//! Built-in schemas for the fulfillment registration request

use crate::model::{Schema, SchemaRule};
use crate::registry::SchemaRegistry;

/// Root schema every registration request is validated against
pub const ROOT_SCHEMA: &str = "mainRequest";

/// Pattern for `trandate` (DD/MM/YYYY)
///
/// Spelled with `[0-9]` since `\d` in `regex` also matches non-ASCII digits.
pub const DATE_PATTERN: &str = r"^[0-9]{2}/[0-9]{2}/[0-9]{4}$";

/// Registry with every schema of the registration request
#[must_use]
pub fn fulfillment_registry() -> SchemaRegistry {
    SchemaRegistry::new()
        .with(main_request())
        .with(item_fulfillment())
        .with(localizations())
        .with(item())
        .with(inventory_detail())
        .with(files())
        .with(attachment())
}

fn main_request() -> Schema {
    Schema::new(ROOT_SCHEMA).field(
        "itemFulfillment",
        SchemaRule::object().required().item_schema("itemFulfillment"),
    )
}

fn item_fulfillment() -> Schema {
    Schema::new("itemFulfillment")
        .field("orderId", SchemaRule::string().required())
        .field(
            "orderType",
            SchemaRule::string().required().one_of(["OTR", "OV", "ODV"]),
        )
        .field("tranid", SchemaRule::string())
        .field("trandate", SchemaRule::string().pattern(DATE_PATTERN))
        .field("memo", SchemaRule::string())
        .field("shipaddress", SchemaRule::string())
        .field("shipstatus", SchemaRule::string().required().one_of(["C"]))
        .field(
            "localizations",
            SchemaRule::object().required().item_schema("localizations"),
        )
        .field(
            "items",
            SchemaRule::array().required().min_items(1).item_schema("item"),
        )
        .field("files", SchemaRule::object().item_schema("files"))
}

fn localizations() -> Schema {
    Schema::new("localizations")
        .field("documentType", SchemaRule::string().required().min_length(1))
        .field("serieLocation", SchemaRule::string().required().min_length(1))
        .field("serie", SchemaRule::string().required().min_length(1))
        .field("deliveryInformation", SchemaRule::string())
        .field("driver", SchemaRule::string())
        .field("sourceLocation", SchemaRule::string())
        .field("transportMode", SchemaRule::string().required())
        .field("transportReason", SchemaRule::string())
        .field("transportReasonDetail", SchemaRule::string())
        .field("sourceUbigeoCode", SchemaRule::string().required())
        .field("destinationUbigeoCode", SchemaRule::string())
        .field("ticket", SchemaRule::string())
}

fn item() -> Schema {
    Schema::new("item")
        .field("itemId", SchemaRule::string().required())
        .field("quantity", SchemaRule::number().required().min(1.0))
        .field("location", SchemaRule::string())
        .field(
            "inventoryDetail",
            SchemaRule::array()
                .required()
                .min_items(1)
                .item_schema("inventoryDetail"),
        )
}

fn inventory_detail() -> Schema {
    Schema::new("inventoryDetail")
        .field("serialLotNumber", SchemaRule::string())
        .field("binNumber", SchemaRule::string().required())
        .field("status", SchemaRule::string())
        .field("m3individual", SchemaRule::string())
        .field("quantity", SchemaRule::number().required().min(1.0))
}

fn files() -> Schema {
    Schema::new("files")
        .field("printedCdrResponse", SchemaRule::object().item_schema("attachment"))
        .field("printedPdf", SchemaRule::object().item_schema("attachment"))
        .field("printedXmlRequest", SchemaRule::object().item_schema("attachment"))
        .field("printedXmlResponse", SchemaRule::object().item_schema("attachment"))
}

fn attachment() -> Schema {
    Schema::new("attachment")
        .field("content", SchemaRule::string())
        .field("fileName", SchemaRule::string())
}
