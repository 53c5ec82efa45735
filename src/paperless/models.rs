//! Typed payloads for the Paperless-ngx REST API.
//!
//! Only the fields the server actually consumes are modeled; everything
//! else the API returns is ignored on deserialization. Partial-update
//! payloads skip `None` fields on serialization so a PATCH body contains
//! exactly the fields the caller supplied.

use serde::{Deserialize, Serialize};

/// A reference to a named entity (correspondent, document type) embedded
/// in a document payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedEntity {
    /// Entity id.
    pub id: i64,
    /// Entity name.
    pub name: String,
}

/// A tag as embedded in a document payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagSummary {
    /// Tag id.
    pub id: i64,
    /// Tag name.
    pub name: String,
    /// Tag color (hex format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A document in the archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document id.
    pub id: i64,
    /// Document title.
    #[serde(default)]
    pub title: Option<String>,
    /// Extracted text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Correspondent, if assigned.
    #[serde(default)]
    pub correspondent: Option<NamedEntity>,
    /// Document type, if assigned.
    #[serde(default)]
    pub document_type: Option<NamedEntity>,
    /// Assigned tags.
    #[serde(default)]
    pub tags: Option<Vec<TagSummary>>,
    /// Creation timestamp.
    #[serde(default)]
    pub created: Option<String>,
    /// Last-modified timestamp.
    #[serde(default)]
    pub modified: Option<String>,
    /// Timestamp the document was added to the archive.
    #[serde(default)]
    pub added: Option<String>,
    /// Archive serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_serial_number: Option<String>,
    /// Original file name of the upload.
    #[serde(default)]
    pub original_file_name: Option<String>,
    /// Checksum of the original file.
    #[serde(default)]
    pub checksum: Option<String>,
}

/// A paginated listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching items.
    pub count: u64,
    /// URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,
    /// Items on this page.
    pub results: Vec<T>,
}

/// A tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    /// Tag id.
    pub id: i64,
    /// Tag name.
    pub name: String,
    /// Tag color (hex format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Text color (hex format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

/// A correspondent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Correspondent {
    /// Correspondent id.
    pub id: i64,
    /// Correspondent name.
    pub name: String,
}

/// A document type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentType {
    /// Document type id.
    pub id: i64,
    /// Document type name.
    pub name: String,
}

/// A storage path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoragePath {
    /// Storage path id.
    pub id: i64,
    /// Storage path name.
    pub name: String,
    /// File system path template.
    pub path: String,
    /// Matching pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#match: Option<String>,
    /// Matching algorithm id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_algorithm: Option<i64>,
}

/// Data types supported by custom fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldDataType {
    /// Free-form string.
    String,
    /// URL.
    Url,
    /// Calendar date.
    Date,
    /// Boolean flag.
    Boolean,
    /// Integer number.
    Integer,
    /// Floating-point number.
    Float,
    /// Monetary amount.
    Monetary,
}

/// A custom field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomField {
    /// Custom field id.
    pub id: i64,
    /// Custom field name.
    pub name: String,
    /// Data type of the field.
    pub data_type: CustomFieldDataType,
}

/// A saved view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedView {
    /// Saved view id.
    pub id: i64,
    /// Saved view name.
    pub name: String,
    /// Whether the view appears on the dashboard.
    #[serde(default)]
    pub show_on_dashboard: Option<bool>,
    /// Whether the view appears in the sidebar.
    #[serde(default)]
    pub show_in_sidebar: Option<bool>,
    /// Sort field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    /// Whether the sort order is reversed.
    #[serde(default)]
    pub sort_reverse: Option<bool>,
    /// Filter rules (opaque to this server).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_rules: Option<Vec<serde_json::Value>>,
}

/// A background task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperlessTask {
    /// Task id.
    pub id: i64,
    /// Celery task id.
    #[serde(default)]
    pub task_id: Option<String>,
    /// Task status.
    #[serde(default)]
    pub status: Option<String>,
    /// Related file name.
    #[serde(default)]
    pub task_file_name: Option<String>,
    /// Result message.
    #[serde(default)]
    pub result: Option<String>,
    /// Whether the task has been acknowledged.
    #[serde(default)]
    pub acknowledged: Option<bool>,
}

/// Sort orders accepted by document search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentOrdering {
    /// Oldest first.
    #[serde(rename = "created")]
    Created,
    /// Newest first.
    #[serde(rename = "-created")]
    CreatedDesc,
    /// Least recently modified first.
    #[serde(rename = "modified")]
    Modified,
    /// Most recently modified first.
    #[serde(rename = "-modified")]
    ModifiedDesc,
    /// Title ascending.
    #[serde(rename = "title")]
    Title,
    /// Title descending.
    #[serde(rename = "-title")]
    TitleDesc,
}

impl DocumentOrdering {
    /// Returns the query-parameter value for this ordering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::CreatedDesc => "-created",
            Self::Modified => "modified",
            Self::ModifiedDesc => "-modified",
            Self::Title => "title",
            Self::TitleDesc => "-title",
        }
    }
}

/// Filters for document search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    /// Free-text search query.
    #[serde(default)]
    pub query: Option<String>,
    /// Maximum number of results (`page_size`).
    #[serde(default)]
    pub limit: Option<u32>,
    /// Sort order for results.
    #[serde(default)]
    pub ordering: Option<DocumentOrdering>,
    /// Filter by document type id.
    #[serde(default)]
    pub document_type: Option<i64>,
    /// Filter by correspondent id.
    #[serde(default)]
    pub correspondent: Option<i64>,
    /// Filter by tag ids.
    #[serde(default)]
    pub tags: Option<Vec<i64>>,
}

impl SearchParams {
    /// Builds the query-string pairs for `GET /api/documents/`.
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(query) = &self.query {
            pairs.push(("query".to_string(), query.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("page_size".to_string(), limit.to_string()));
        }
        if let Some(ordering) = self.ordering {
            pairs.push(("ordering".to_string(), ordering.as_str().to_string()));
        }
        if let Some(document_type) = self.document_type {
            pairs.push(("document_type__id".to_string(), document_type.to_string()));
        }
        if let Some(correspondent) = self.correspondent {
            pairs.push(("correspondent__id".to_string(), correspondent.to_string()));
        }
        if let Some(tags) = &self.tags {
            for tag in tags {
                pairs.push(("tags__id__in".to_string(), tag.to_string()));
            }
        }

        pairs
    }
}

/// Partial update for a document. `None` fields are omitted from the
/// PATCH body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentUpdate {
    /// New document title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Correspondent id to assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correspondent: Option<i64>,
    /// Document type id to assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<i64>,
    /// Tag ids to assign.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<i64>>,
    /// Archive serial number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_serial_number: Option<String>,
}

/// One entry in a bulk document update: a target id plus the fields to
/// change on it.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkUpdateItem {
    /// Document id to update.
    pub id: i64,
    /// Fields to change.
    #[serde(flatten)]
    pub fields: DocumentUpdate,
}

/// A failed entry in a bulk update, keyed by the document's own id.
#[derive(Debug, Clone, Serialize)]
pub struct FailedUpdate {
    /// Document id that failed to update.
    pub id: i64,
    /// Error message for this document.
    pub error: String,
}

/// Aggregate outcome of a bulk update. Partial success is the normal
/// case, not an error state.
#[derive(Debug, Clone, Serialize)]
pub struct BulkUpdateOutcome {
    /// Number of documents updated successfully.
    pub updated_count: usize,
    /// Per-document failures, in settle order.
    pub failed_updates: Vec<FailedUpdate>,
}

/// Payload for creating a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCreate {
    /// Name of the new tag.
    pub name: String,
    /// Color code (hex format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Text color (hex format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

/// Partial update for a tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagUpdate {
    /// Tag name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Color code (hex format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Text color (hex format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

/// Payload for creating a correspondent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrespondentCreate {
    /// Name of the new correspondent.
    pub name: String,
}

/// Partial update for a correspondent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrespondentUpdate {
    /// Correspondent name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Payload for creating a document type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTypeCreate {
    /// Name of the new document type.
    pub name: String,
}

/// Partial update for a document type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentTypeUpdate {
    /// Document type name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Payload for creating a storage path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoragePathCreate {
    /// Name of the storage path.
    pub name: String,
    /// File system path template.
    pub path: String,
    /// Matching pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#match: Option<String>,
    /// Matching algorithm id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_algorithm: Option<i64>,
}

/// Partial update for a storage path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoragePathUpdate {
    /// Storage path name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// File system path template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Matching pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#match: Option<String>,
    /// Matching algorithm id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_algorithm: Option<i64>,
}

/// Payload for creating a custom field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldCreate {
    /// Name of the custom field.
    pub name: String,
    /// Data type of the field.
    pub data_type: CustomFieldDataType,
}

/// Partial update for a custom field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomFieldUpdate {
    /// Custom field name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Data type of the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<CustomFieldDataType>,
}

/// Payload for creating a saved view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedViewCreate {
    /// Name of the saved view.
    pub name: String,
    /// Show on dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_on_dashboard: Option<bool>,
    /// Show in sidebar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_sidebar: Option<bool>,
    /// Sort field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    /// Reverse sort order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_reverse: Option<bool>,
    /// Filter rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_rules: Option<Vec<serde_json::Value>>,
}

/// Partial update for a saved view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedViewUpdate {
    /// Saved view name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Show on dashboard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_on_dashboard: Option<bool>,
    /// Show in sidebar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_in_sidebar: Option<bool>,
    /// Sort field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    /// Reverse sort order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_reverse: Option<bool>,
    /// Filter rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_rules: Option<Vec<serde_json::Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_params_to_query() {
        let params = SearchParams {
            query: Some("invoice".to_string()),
            limit: Some(5),
            ..Default::default()
        };

        let query = params.to_query();
        assert_eq!(
            query,
            vec![
                ("query".to_string(), "invoice".to_string()),
                ("page_size".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_params_repeats_tag_filter() {
        let params = SearchParams {
            tags: Some(vec![3, 7]),
            ..Default::default()
        };

        let query = params.to_query();
        assert_eq!(
            query,
            vec![
                ("tags__id__in".to_string(), "3".to_string()),
                ("tags__id__in".to_string(), "7".to_string()),
            ]
        );
    }

    #[test]
    fn test_document_update_skips_unset_fields() {
        let update = DocumentUpdate {
            title: Some("Q3 Invoice".to_string()),
            tags: Some(vec![1, 2]),
            ..Default::default()
        };

        let body = serde_json::to_value(&update).expect("serialize");
        assert_eq!(body, json!({"title": "Q3 Invoice", "tags": [1, 2]}));
    }

    #[test]
    fn test_bulk_update_item_splits_id_from_fields() {
        let item: BulkUpdateItem =
            serde_json::from_value(json!({"id": 42, "title": "Renamed"})).expect("deserialize");

        assert_eq!(item.id, 42);
        assert_eq!(item.fields.title.as_deref(), Some("Renamed"));

        // The id must never leak into the PATCH body.
        let body = serde_json::to_value(&item.fields).expect("serialize");
        assert_eq!(body, json!({"title": "Renamed"}));
    }

    #[test]
    fn test_ordering_round_trip() {
        let ordering: DocumentOrdering =
            serde_json::from_value(json!("-created")).expect("deserialize");
        assert_eq!(ordering, DocumentOrdering::CreatedDesc);
        assert_eq!(ordering.as_str(), "-created");
    }

    #[test]
    fn test_custom_field_data_type_rejects_unknown() {
        let result: std::result::Result<CustomFieldDataType, _> =
            serde_json::from_value(json!("blob"));
        assert!(result.is_err());
    }
}
