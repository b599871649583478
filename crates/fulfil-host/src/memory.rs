//! In-memory host backed by fixture data

use crate::fixture::{DomainValue, HostFixture};
use crate::search::{Search, SearchQuery, SearchRow};
use crate::store::{DomainConfig, FileStore, FileUpload, RecordStore};
use crate::{Error, Result};
use dashmap::{DashMap, DashSet};
use fulfil_model::fields::{header, line};
use fulfil_model::{DraftLine, FulfillmentDraft, Record, RecordId};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// First id handed out when the fixture does not set one
pub const DEFAULT_FIRST_ID: RecordId = 100_000;

/// Header fields a transform carries from the order onto the draft
const TRANSFORMED_HEADER_FIELDS: [&str; 8] = [
    header::ENTITY,
    header::TRANSFER_LOCATION,
    header::ADDRESSBOOK_ADDRESS,
    header::BILLING_ADDRESS,
    header::SHIPPING_ADDRESS,
    header::DEPARTMENT,
    header::CLASS,
    header::LOCATION,
];

/// A file accepted by [`MemoryHost::upload`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: String,
    pub file_name: String,
    pub file_type: String,
    pub folder_id: String,
    pub content: String,
}

#[derive(Debug)]
struct MemoryState {
    records: DashMap<(String, RecordId), Record>,
    tables: DashMap<String, Vec<SearchRow>>,
    domain_values: DashMap<String, Vec<DomainValue>>,
    folders: DashSet<String>,
    files: DashMap<String, StoredFile>,
    next_id: AtomicU64,
}

/// Host implementation over concurrent in-memory tables
///
/// Clones share the same tables.
#[derive(Debug, Clone)]
pub struct MemoryHost {
    state: Arc<MemoryState>,
    auto_number_tranid: Option<String>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Create an empty host
    #[must_use]
    pub fn new() -> Self {
        Self::with_first_id(DEFAULT_FIRST_ID)
    }

    fn with_first_id(first_id: RecordId) -> Self {
        Self {
            state: Arc::new(MemoryState {
                records: DashMap::new(),
                tables: DashMap::new(),
                domain_values: DashMap::new(),
                folders: DashSet::new(),
                files: DashMap::new(),
                next_id: AtomicU64::new(first_id),
            }),
            auto_number_tranid: None,
        }
    }

    /// Create a host seeded from a fixture
    #[must_use]
    pub fn from_fixture(fixture: HostFixture) -> Self {
        let mut host = Self::with_first_id(fixture.first_id.unwrap_or(DEFAULT_FIRST_ID));
        host.auto_number_tranid = fixture.auto_number_tranid;

        for folder in fixture.folders {
            host.add_folder(folder);
        }
        for value in fixture.domain_values {
            host.add_domain_value(value);
        }
        for record in fixture.records {
            host.insert_record(record);
        }
        for (record_type, rows) in fixture.search {
            host.add_rows(&record_type, rows);
        }

        debug!(
            records = host.state.records.len(),
            tables = host.state.tables.len(),
            "Memory host seeded"
        );
        host
    }

    /// Create a host from a fixture file
    ///
    /// # Errors
    ///
    /// Returns an error when the fixture cannot be read or parsed.
    pub fn load_fixture(path: &Path) -> Result<Self> {
        Ok(Self::from_fixture(HostFixture::from_file(path)?))
    }

    /// Overwrite the `tranid` of every saved record with `<prefix><id>`
    #[must_use]
    pub fn with_auto_number(mut self, prefix: impl Into<String>) -> Self {
        self.auto_number_tranid = Some(prefix.into());
        self
    }

    pub fn insert_record(&self, record: Record) {
        self.state
            .records
            .insert((record.record_type.clone(), record.id), record);
    }

    /// Append search rows for a record type
    pub fn add_rows(&self, record_type: &str, rows: Vec<SearchRow>) {
        self.state
            .tables
            .entry(record_type.to_string())
            .or_default()
            .extend(rows);
    }

    pub fn add_domain_value(&self, value: DomainValue) {
        self.state
            .domain_values
            .entry(value.code.clone())
            .or_default()
            .push(value);
    }

    pub fn add_folder(&self, folder_id: impl Into<String>) {
        self.state.folders.insert(folder_id.into());
    }

    /// Stored copy of a record
    #[must_use]
    pub fn record(&self, record_type: &str, id: RecordId) -> Option<Record> {
        self.state
            .records
            .get(&(record_type.to_string(), id))
            .map(|r| r.value().clone())
    }

    /// Every stored record of a type, by id
    #[must_use]
    pub fn records_of_type(&self, record_type: &str) -> Vec<Record> {
        let mut records: Vec<Record> = self
            .state
            .records
            .iter()
            .filter(|r| r.key().0 == record_type)
            .map(|r| r.value().clone())
            .collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Every uploaded file, by id
    #[must_use]
    pub fn files(&self) -> Vec<StoredFile> {
        let mut files: Vec<StoredFile> =
            self.state.files.iter().map(|f| f.value().clone()).collect();
        files.sort_by(|a, b| a.id.cmp(&b.id));
        files
    }

    fn allocate_id(&self) -> RecordId {
        self.state.next_id.fetch_add(1, Ordering::SeqCst)
    }
}

impl RecordStore for MemoryHost {
    fn load(&self, record_type: &str, id: RecordId) -> Result<Record> {
        self.record(record_type, id)
            .ok_or_else(|| Error::not_found(record_type, id))
    }

    fn transform(&self, from_type: &str, from_id: RecordId, to_type: &str) -> Result<FulfillmentDraft> {
        let source = self.load(from_type, from_id)?;

        let mut draft = FulfillmentDraft::new(source.reference(), to_type);
        for field in TRANSFORMED_HEADER_FIELDS {
            if let Some(value) = source.field(field) {
                draft.fields.insert(field.to_string(), value.clone());
            }
        }

        // Only open rows with quantity left become draft rows, renumbered from zero.
        let lines: Vec<DraftLine> = source
            .lines
            .iter()
            .enumerate()
            .filter(|(i, _)| !source.line_bool(*i, line::IS_CLOSED))
            .filter_map(|(i, row)| {
                let remaining =
                    source.line_f64(i, line::QUANTITY) - source.line_f64(i, line::QUANTITY_FULFILLED);
                (remaining > 0.0).then_some((row, remaining))
            })
            .enumerate()
            .map(|(n, (row, remaining))| {
                let mut draft_line = DraftLine::from_row(n, row);
                draft_line.quantity = remaining;
                draft_line.receive = true;
                draft_line.inventory_plan.clear();
                draft_line
            })
            .collect();

        if lines.is_empty() {
            warn!(from_type, from_id, "Nothing left to fulfill");
            return Err(Error::persistence(format!(
                "cannot transform {from_type} {from_id} into {to_type}: no lines left to fulfill"
            )));
        }

        debug!(from_type, from_id, to_type, lines = lines.len(), "Record transformed");
        Ok(draft.with_lines(lines))
    }

    fn save(&self, draft: &FulfillmentDraft) -> Result<RecordId> {
        let received: Vec<DraftLine> = draft.received_lines().cloned().collect();
        if received.is_empty() {
            return Err(Error::persistence("at least one line must be fulfilled"));
        }

        for row in &received {
            if !row.existing().needs_inventory_plan() {
                continue;
            }
            let planned: f64 = row.inventory_plan.iter().map(|e| e.quantity).sum();
            if (planned - row.quantity).abs() > f64::EPSILON {
                return Err(Error::persistence(format!(
                    "line {} (item {}): inventory detail quantity {planned} does not match line quantity {}",
                    row.line_number + 1,
                    row.item_ref,
                    row.quantity
                )));
            }
        }

        let id = self.allocate_id();
        let mut record = draft.clone().with_lines(received).into_record(id);
        if let Some(prefix) = &self.auto_number_tranid {
            record.set_field(header::TRANID, json!(format!("{prefix}{id}")));
        }

        info!(
            record_type = %record.record_type,
            id,
            source = draft.source.id,
            lines = record.line_count(),
            "Record saved"
        );
        self.insert_record(record);
        Ok(id)
    }

    fn save_record(&self, record: &Record) -> Result<RecordId> {
        let key = (record.record_type.clone(), record.id);
        if !self.state.records.contains_key(&key) {
            return Err(Error::not_found(&record.record_type, record.id));
        }
        self.state.records.insert(key, record.clone());
        debug!(record_type = %record.record_type, id = record.id, "Record updated");
        Ok(record.id)
    }
}

impl Search for MemoryHost {
    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchRow>> {
        let table = self
            .state
            .tables
            .get(&query.record_type)
            .ok_or_else(|| Error::Search {
                record_type: query.record_type.clone(),
                details: "record type is not searchable".to_string(),
            })?;

        let matching = table.iter().filter(|row| {
            query.filters.iter().all(|filter| {
                let value = row
                    .values
                    .get(&filter.field)
                    .and_then(fulfil_model::record::text);
                filter.matches(value.as_deref())
            })
        });

        let mut rows: Vec<SearchRow> = if query.columns.is_empty() {
            matching.cloned().collect()
        } else {
            matching
                .map(|row| {
                    SearchRow::new(
                        query
                            .columns
                            .iter()
                            .filter_map(|c| row.get(c).map(|v| (c.key(), v.clone())))
                            .collect(),
                    )
                })
                .collect()
        };

        if let Some(max) = query.max_results {
            rows.truncate(max);
        }

        debug!(
            record_type = %query.record_type,
            filters = query.filters.len(),
            rows = rows.len(),
            "Search executed"
        );
        Ok(rows)
    }
}

impl FileStore for MemoryHost {
    fn upload(&self, file: &FileUpload) -> Result<String> {
        if file.folder_id.is_empty() {
            return Err(Error::file(format!("file '{}' has no folder", file.file_name)));
        }
        if !self.state.folders.contains(&file.folder_id) {
            return Err(Error::file(format!(
                "folder '{}' does not exist",
                file.folder_id
            )));
        }
        if file.content.is_empty() {
            return Err(Error::file(format!("file '{}' has no content", file.file_name)));
        }

        let id = self.allocate_id().to_string();
        self.state.files.insert(
            id.clone(),
            StoredFile {
                id: id.clone(),
                file_name: file.file_name.clone(),
                file_type: file.file_type.clone(),
                folder_id: file.folder_id.clone(),
                content: file.content.clone(),
            },
        );
        debug!(id = %id, name = %file.file_name, folder = %file.folder_id, "File uploaded");
        Ok(id)
    }
}

impl DomainConfig for MemoryHost {
    fn value(&self, code: &str, qualifier: Option<&str>) -> Result<String> {
        let mut values: Vec<String> = self
            .state
            .domain_values
            .get(code)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| qualifier.is_none() || e.qualifier.as_deref() == qualifier)
                    .map(|e| e.value.clone())
                    .collect()
            })
            .unwrap_or_default();

        match values.len() {
            1 => Ok(values.remove(0)),
            0 => Err(Error::config(
                code,
                match qualifier {
                    Some(q) => format!("no value configured for '{q}'"),
                    None => "no value configured".to_string(),
                },
            )),
            n => Err(Error::config(
                code,
                format!("{n} values configured, expected exactly one"),
            )),
        }
    }
}
