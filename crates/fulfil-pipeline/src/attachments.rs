//! Upload of the printed documents

use fulfil_host::{FileStore, FileUpload};
use fulfil_model::{AttachmentKind, Attachments, FulfillmentDraft};
use serde_json::json;
use tracing::debug;

use crate::{Error, Result};

/// Upload every attachment that has both content and a file name
///
/// Slots are handled in [`AttachmentKind::ALL`] order. Each stored file id
/// is written to the slot's header field. Returns the number of uploads.
///
/// # Errors
///
/// Returns [`Error::Attachment`] on the first upload the host rejects.
pub fn upload_attachments<H: FileStore + ?Sized>(
    host: &H,
    files: Option<&Attachments>,
    folder_id: &str,
    draft: &mut FulfillmentDraft,
) -> Result<usize> {
    let Some(files) = files else {
        return Ok(0);
    };

    let mut uploaded = 0;
    for kind in AttachmentKind::ALL {
        let Some(payload) = files.get(kind).filter(|p| p.is_uploadable()) else {
            continue;
        };
        let file_name = payload.file_name.clone().unwrap_or_default();
        debug!(slot = kind.key(), file = %file_name, "Uploading attachment");

        let upload = FileUpload {
            file_name: file_name.clone(),
            file_type: kind.file_type().to_string(),
            folder_id: folder_id.to_string(),
            content: payload.base64_body().unwrap_or_default().to_string(),
        };
        let file_id = host.upload(&upload).map_err(|e| Error::Attachment {
            file_name,
            details: e.to_string(),
        })?;

        draft.fields.insert(kind.field_id().to_string(), json!(file_id));
        uploaded += 1;
    }
    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfil_host::MemoryHost;
    use fulfil_model::RecordRef;

    fn draft() -> FulfillmentDraft {
        FulfillmentDraft::new(RecordRef::new("salesorder", 5001), "itemfulfillment")
    }

    fn files() -> Attachments {
        serde_json::from_value(json!({
            "printedCdrResponse": { "content": "UEsDBA==", "fileName": "R-T001-1.zip" },
            "printedPdf": { "content": "data:application/pdf;base64,JVBERi0=", "fileName": "T001-1.pdf" },
            "printedXmlRequest": { "content": "PD94bWw+" },
            "printedXmlResponse": { "fileName": "R-T001-1.xml" }
        }))
        .unwrap()
    }

    #[test]
    fn test_uploads_complete_slots_in_order() {
        let host = MemoryHost::new();
        host.add_folder("645");
        let mut draft = draft();

        let uploaded = upload_attachments(&host, Some(&files()), "645", &mut draft).unwrap();

        assert_eq!(uploaded, 2);
        let stored = host.files();
        assert_eq!(stored[0].file_type, "ZIP");
        assert_eq!(stored[1].file_type, "PDF");
        assert_eq!(stored[1].content, "JVBERi0=");
        assert_eq!(
            draft.str_field("custbody_pe_ei_printed_cdr_res"),
            Some(stored[0].id.clone())
        );
        assert_eq!(draft.str_field("custbody_pe_ei_printed_pdf"), Some(stored[1].id.clone()));
        assert!(draft.field("custbody_pe_ei_printed_xml_req").is_none());
    }

    #[test]
    fn test_no_files() {
        let mut draft = draft();
        assert_eq!(upload_attachments(&MemoryHost::new(), None, "645", &mut draft).unwrap(), 0);
    }

    #[test]
    fn test_rejected_upload() {
        let host = MemoryHost::new();
        let mut draft = draft();

        let err = upload_attachments(&host, Some(&files()), "645", &mut draft).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Attachment 'R-T001-1.zip' could not be uploaded: File error: folder '645' does not exist"
        );
    }
}
