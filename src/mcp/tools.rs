//! MCP tool implementations.
//!
//! A static registration table built once at startup: tool name →
//! {input schema, handler}. Every tool is a pass-through to one
//! [`PaperlessClient`] method plus a response formatter. Argument
//! validation failures, upstream failures, and unknown tool names all
//! surface as errors here and are converted to `isError` tool results at
//! the dispatch boundary, never to protocol-level errors.

use crate::paperless::PaperlessClient;
use crate::paperless::models::{
    BulkUpdateItem, CorrespondentCreate, CorrespondentUpdate, CustomFieldCreate, CustomFieldUpdate,
    DocumentTypeCreate, DocumentTypeUpdate, DocumentUpdate, SavedViewCreate, SavedViewUpdate,
    SearchParams, StoragePathCreate, StoragePathUpdate, TagCreate, TagUpdate,
};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of MCP tools.
pub struct ToolRegistry {
    /// Available tools.
    tools: HashMap<String, ToolDefinition>,
    /// Shared repository client.
    client: Arc<PaperlessClient>,
}

impl ToolRegistry {
    /// Creates a new tool registry with the full Paperless catalog.
    #[must_use]
    pub fn new(client: Arc<PaperlessClient>) -> Self {
        let tools = catalog()
            .into_iter()
            .map(|tool| (tool.name.clone(), tool))
            .collect();

        Self { tools, client }
    }

    /// Returns all tool definitions.
    #[must_use]
    pub fn list_tools(&self) -> Vec<&ToolDefinition> {
        self.tools.values().collect()
    }

    /// Gets a tool definition by name.
    #[must_use]
    pub fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Executes a tool with the given arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments fail validation, the tool name is
    /// unknown, or the repository call fails. Callers convert these to
    /// failed tool results, not protocol errors.
    #[allow(clippy::too_many_lines)]
    pub async fn execute(&self, name: &str, arguments: Value) -> Result<ToolResult> {
        match name {
            // Documents
            "search_documents" => {
                let params: SearchParams = parse_args(arguments)?;
                let page = self.client.search_documents(&params).await?;
                Ok(text_result(pretty(&page)))
            },
            "get_document" => {
                let args: DocumentIdArgs = parse_args(arguments)?;
                let document = self.client.get_document(args.document_id).await?;
                Ok(text_result(pretty(&document)))
            },
            "update_document" => {
                let args: UpdateDocumentArgs = parse_args(arguments)?;
                let updated = self
                    .client
                    .update_document(args.document_id, &args.fields)
                    .await?;
                Ok(text_result(format!(
                    "Document {} updated successfully: {}",
                    args.document_id,
                    pretty(&updated)
                )))
            },
            "delete_document" => {
                let args: DocumentIdArgs = parse_args(arguments)?;
                self.client.delete_document(args.document_id).await?;
                Ok(text_result(format!(
                    "Document {} deleted successfully",
                    args.document_id
                )))
            },
            "bulk_update_documents" => {
                let args: BulkUpdateArgs = parse_args(arguments)?;
                let outcome = self.client.bulk_update_documents(args.documents).await;

                let mut output = format!(
                    "Bulk update completed:\n✅ Successfully updated: {} documents\n",
                    outcome.updated_count
                );
                if !outcome.failed_updates.is_empty() {
                    output.push_str(&format!(
                        "❌ Failed updates: {}\n\nFailure details:\n",
                        outcome.failed_updates.len()
                    ));
                    for failure in &outcome.failed_updates {
                        output
                            .push_str(&format!("- Document ID {}: {}\n", failure.id, failure.error));
                    }
                }
                Ok(text_result(output))
            },
            "download_document" => {
                let args: DocumentIdArgs = parse_args(arguments)?;
                let url = self.client.download_url(args.document_id);
                Ok(text_result(format!("Download URL: {url}")))
            },
            "get_document_suggestions" => {
                let args: DocumentIdArgs = parse_args(arguments)?;
                let suggestions = self.client.get_document_suggestions(args.document_id).await?;
                Ok(text_result(pretty(&suggestions)))
            },
            "get_document_metadata" => {
                let args: DocumentIdArgs = parse_args(arguments)?;
                let metadata = self.client.get_document_metadata(args.document_id).await?;
                Ok(text_result(pretty(&metadata)))
            },

            // Tags
            "list_tags" => {
                let tags = self.client.list_tags().await?;
                Ok(text_result(pretty(&tags)))
            },
            "get_tag" => {
                let args: IdArgs = parse_args(arguments)?;
                let tag = self.client.get_tag(args.id).await?;
                Ok(text_result(pretty(&tag)))
            },
            "create_tag" => {
                let payload: TagCreate = parse_args(arguments)?;
                let tag = self.client.create_tag(&payload).await?;
                Ok(text_result(format!(
                    "Tag created successfully: {}",
                    pretty(&tag)
                )))
            },
            "update_tag" => {
                let args: UpdateTagArgs = parse_args(arguments)?;
                let tag = self.client.update_tag(args.id, &args.fields).await?;
                Ok(text_result(format!("Tag updated: {}", pretty(&tag))))
            },
            "delete_tag" => {
                let args: IdArgs = parse_args(arguments)?;
                self.client.delete_tag(args.id).await?;
                Ok(text_result(format!("Tag {} deleted successfully", args.id)))
            },

            // Correspondents
            "list_correspondents" => {
                let correspondents = self.client.list_correspondents().await?;
                Ok(text_result(pretty(&correspondents)))
            },
            "get_correspondent" => {
                let args: IdArgs = parse_args(arguments)?;
                let correspondent = self.client.get_correspondent(args.id).await?;
                Ok(text_result(pretty(&correspondent)))
            },
            "create_correspondent" => {
                let payload: CorrespondentCreate = parse_args(arguments)?;
                let correspondent = self.client.create_correspondent(&payload).await?;
                Ok(text_result(format!(
                    "Correspondent created successfully: {}",
                    pretty(&correspondent)
                )))
            },
            "update_correspondent" => {
                let args: UpdateCorrespondentArgs = parse_args(arguments)?;
                let correspondent = self
                    .client
                    .update_correspondent(args.id, &args.fields)
                    .await?;
                Ok(text_result(format!(
                    "Correspondent updated: {}",
                    pretty(&correspondent)
                )))
            },
            "delete_correspondent" => {
                let args: IdArgs = parse_args(arguments)?;
                self.client.delete_correspondent(args.id).await?;
                Ok(text_result(format!(
                    "Correspondent {} deleted successfully",
                    args.id
                )))
            },

            // Document types
            "list_document_types" => {
                let document_types = self.client.list_document_types().await?;
                Ok(text_result(pretty(&document_types)))
            },
            "get_document_type" => {
                let args: IdArgs = parse_args(arguments)?;
                let document_type = self.client.get_document_type(args.id).await?;
                Ok(text_result(pretty(&document_type)))
            },
            "create_document_type" => {
                let payload: DocumentTypeCreate = parse_args(arguments)?;
                let document_type = self.client.create_document_type(&payload).await?;
                Ok(text_result(format!(
                    "Document type created successfully: {}",
                    pretty(&document_type)
                )))
            },
            "update_document_type" => {
                let args: UpdateDocumentTypeArgs = parse_args(arguments)?;
                let document_type = self
                    .client
                    .update_document_type(args.id, &args.fields)
                    .await?;
                Ok(text_result(format!(
                    "Document type updated: {}",
                    pretty(&document_type)
                )))
            },
            "delete_document_type" => {
                let args: IdArgs = parse_args(arguments)?;
                self.client.delete_document_type(args.id).await?;
                Ok(text_result(format!(
                    "Document type {} deleted successfully",
                    args.id
                )))
            },

            // Storage paths
            "list_storage_paths" => {
                let storage_paths = self.client.list_storage_paths().await?;
                Ok(text_result(pretty(&storage_paths)))
            },
            "get_storage_path" => {
                let args: IdArgs = parse_args(arguments)?;
                let storage_path = self.client.get_storage_path(args.id).await?;
                Ok(text_result(pretty(&storage_path)))
            },
            "create_storage_path" => {
                let payload: StoragePathCreate = parse_args(arguments)?;
                let storage_path = self.client.create_storage_path(&payload).await?;
                Ok(text_result(format!(
                    "Storage path created: {}",
                    pretty(&storage_path)
                )))
            },
            "update_storage_path" => {
                let args: UpdateStoragePathArgs = parse_args(arguments)?;
                let storage_path = self
                    .client
                    .update_storage_path(args.id, &args.fields)
                    .await?;
                Ok(text_result(format!(
                    "Storage path updated: {}",
                    pretty(&storage_path)
                )))
            },
            "delete_storage_path" => {
                let args: IdArgs = parse_args(arguments)?;
                self.client.delete_storage_path(args.id).await?;
                Ok(text_result(format!(
                    "Storage path {} deleted successfully",
                    args.id
                )))
            },

            // Custom fields
            "list_custom_fields" => {
                let custom_fields = self.client.list_custom_fields().await?;
                Ok(text_result(pretty(&custom_fields)))
            },
            "get_custom_field" => {
                let args: IdArgs = parse_args(arguments)?;
                let custom_field = self.client.get_custom_field(args.id).await?;
                Ok(text_result(pretty(&custom_field)))
            },
            "create_custom_field" => {
                let payload: CustomFieldCreate = parse_args(arguments)?;
                let custom_field = self.client.create_custom_field(&payload).await?;
                Ok(text_result(format!(
                    "Custom field created: {}",
                    pretty(&custom_field)
                )))
            },
            "update_custom_field" => {
                let args: UpdateCustomFieldArgs = parse_args(arguments)?;
                let custom_field = self
                    .client
                    .update_custom_field(args.id, &args.fields)
                    .await?;
                Ok(text_result(format!(
                    "Custom field updated: {}",
                    pretty(&custom_field)
                )))
            },
            "delete_custom_field" => {
                let args: IdArgs = parse_args(arguments)?;
                self.client.delete_custom_field(args.id).await?;
                Ok(text_result(format!(
                    "Custom field {} deleted successfully",
                    args.id
                )))
            },

            // Saved views
            "list_saved_views" => {
                let saved_views = self.client.list_saved_views().await?;
                Ok(text_result(pretty(&saved_views)))
            },
            "get_saved_view" => {
                let args: IdArgs = parse_args(arguments)?;
                let saved_view = self.client.get_saved_view(args.id).await?;
                Ok(text_result(pretty(&saved_view)))
            },
            "create_saved_view" => {
                let payload: SavedViewCreate = parse_args(arguments)?;
                let saved_view = self.client.create_saved_view(&payload).await?;
                Ok(text_result(format!(
                    "Saved view created: {}",
                    pretty(&saved_view)
                )))
            },
            "update_saved_view" => {
                let args: UpdateSavedViewArgs = parse_args(arguments)?;
                let saved_view = self.client.update_saved_view(args.id, &args.fields).await?;
                Ok(text_result(format!(
                    "Saved view updated: {}",
                    pretty(&saved_view)
                )))
            },
            "delete_saved_view" => {
                let args: IdArgs = parse_args(arguments)?;
                self.client.delete_saved_view(args.id).await?;
                Ok(text_result(format!(
                    "Saved view {} deleted successfully",
                    args.id
                )))
            },

            // Tasks, statistics, system
            "list_tasks" => {
                let tasks = self.client.list_tasks().await?;
                Ok(text_result(pretty(&tasks)))
            },
            "acknowledge_task" => {
                let args: IdArgs = parse_args(arguments)?;
                self.client.acknowledge_task(args.id).await?;
                Ok(text_result(format!(
                    "Task {} acknowledged successfully",
                    args.id
                )))
            },
            "get_statistics" => {
                let statistics = self.client.get_statistics().await?;
                Ok(text_result(pretty(&statistics)))
            },
            "get_logs" => {
                let logs = self.client.get_logs().await?;
                Ok(text_result(pretty(&logs)))
            },

            _ => Err(Error::InvalidInput(format!("Unknown tool: {name}"))),
        }
    }
}

/// Definition of an MCP tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name.
    pub name: String,
    /// Tool description.
    pub description: String,
    /// JSON Schema for input validation.
    pub input_schema: Value,
}

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the result represents an error.
    #[serde(default)]
    pub is_error: bool,
}

/// Content types that can be returned by tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Wraps text in a successful tool result.
fn text_result(text: impl Into<String>) -> ToolResult {
    ToolResult {
        content: vec![ToolContent::Text { text: text.into() }],
        is_error: false,
    }
}

/// Pretty-prints a serializable value.
fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Deserializes tool arguments, converting failures to validation errors.
fn parse_args<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    serde_json::from_value(arguments).map_err(|e| Error::InvalidInput(e.to_string()))
}

/// Arguments carrying a bare resource id.
#[derive(Debug, Deserialize)]
struct IdArgs {
    id: i64,
}

/// Arguments carrying a document id.
#[derive(Debug, Deserialize)]
struct DocumentIdArgs {
    document_id: i64,
}

/// Arguments for `update_document`: target id plus the fields to change.
#[derive(Debug, Deserialize)]
struct UpdateDocumentArgs {
    document_id: i64,
    #[serde(flatten)]
    fields: DocumentUpdate,
}

/// Arguments for `bulk_update_documents`.
#[derive(Debug, Deserialize)]
struct BulkUpdateArgs {
    documents: Vec<BulkUpdateItem>,
}

/// Arguments for `update_tag`.
#[derive(Debug, Deserialize)]
struct UpdateTagArgs {
    id: i64,
    #[serde(flatten)]
    fields: TagUpdate,
}

/// Arguments for `update_correspondent`.
#[derive(Debug, Deserialize)]
struct UpdateCorrespondentArgs {
    id: i64,
    #[serde(flatten)]
    fields: CorrespondentUpdate,
}

/// Arguments for `update_document_type`.
#[derive(Debug, Deserialize)]
struct UpdateDocumentTypeArgs {
    id: i64,
    #[serde(flatten)]
    fields: DocumentTypeUpdate,
}

/// Arguments for `update_storage_path`.
#[derive(Debug, Deserialize)]
struct UpdateStoragePathArgs {
    id: i64,
    #[serde(flatten)]
    fields: StoragePathUpdate,
}

/// Arguments for `update_custom_field`.
#[derive(Debug, Deserialize)]
struct UpdateCustomFieldArgs {
    id: i64,
    #[serde(flatten)]
    fields: CustomFieldUpdate,
}

/// Arguments for `update_saved_view`.
#[derive(Debug, Deserialize)]
struct UpdateSavedViewArgs {
    id: i64,
    #[serde(flatten)]
    fields: SavedViewUpdate,
}

/// Builds one tool definition.
fn tool(name: &str, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema,
    }
}

/// Schema for tools that take no arguments.
fn empty_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "required": []
    })
}

/// Schema for tools addressed by a bare resource id.
fn id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "description": description }
        },
        "required": ["id"]
    })
}

/// Schema for tools addressed by a document id.
fn document_id_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "document_id": { "type": "integer", "description": description }
        },
        "required": ["document_id"]
    })
}

/// Schema fragment for the fields of a document update.
fn document_update_properties() -> Value {
    json!({
        "title": { "type": "string", "description": "New document title" },
        "correspondent": { "type": "integer", "description": "Correspondent ID" },
        "document_type": { "type": "integer", "description": "Document type ID" },
        "tags": {
            "type": "array",
            "items": { "type": "integer" },
            "description": "Array of tag IDs to assign"
        },
        "archive_serial_number": { "type": "string", "description": "Archive serial number" }
    })
}

/// Schema fragment for the fields of a saved view.
fn saved_view_properties() -> Value {
    json!({
        "name": { "type": "string", "description": "Name of the saved view" },
        "show_on_dashboard": { "type": "boolean", "description": "Show on dashboard" },
        "show_in_sidebar": { "type": "boolean", "description": "Show in sidebar" },
        "sort_field": { "type": "string", "description": "Field to sort by" },
        "sort_reverse": { "type": "boolean", "description": "Reverse sort order" },
        "filter_rules": { "type": "array", "description": "Filter rules" }
    })
}

/// The full tool catalog.
#[allow(clippy::too_many_lines)]
fn catalog() -> Vec<ToolDefinition> {
    let mut update_document = document_update_properties();
    if let Some(properties) = update_document.as_object_mut() {
        properties.insert(
            "document_id".to_string(),
            json!({ "type": "integer", "description": "ID of the document to update" }),
        );
    }

    let mut bulk_item = document_update_properties();
    if let Some(properties) = bulk_item.as_object_mut() {
        properties.insert(
            "id".to_string(),
            json!({ "type": "integer", "description": "Document ID to update" }),
        );
    }

    let mut update_saved_view = saved_view_properties();
    if let Some(properties) = update_saved_view.as_object_mut() {
        properties.insert(
            "id".to_string(),
            json!({ "type": "integer", "description": "ID of the saved view to update" }),
        );
    }

    vec![
        // Documents
        tool(
            "search_documents",
            "Search for documents in Paperless-ngx with optional filters",
            json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query for documents" },
                    "limit": { "type": "integer", "description": "Maximum number of results to return" },
                    "ordering": {
                        "type": "string",
                        "description": "Sort order for results",
                        "enum": ["created", "-created", "modified", "-modified", "title", "-title"]
                    },
                    "document_type": { "type": "integer", "description": "Filter by document type ID" },
                    "correspondent": { "type": "integer", "description": "Filter by correspondent ID" },
                    "tags": {
                        "type": "array",
                        "items": { "type": "integer" },
                        "description": "Filter by tag IDs"
                    }
                },
                "required": []
            }),
        ),
        tool(
            "get_document",
            "Retrieve detailed information about a specific document",
            document_id_schema("ID of the document to retrieve"),
        ),
        tool(
            "update_document",
            "Update document metadata (title, tags, correspondent, etc.)",
            json!({
                "type": "object",
                "properties": update_document,
                "required": ["document_id"]
            }),
        ),
        tool(
            "delete_document",
            "Delete a document from Paperless-ngx",
            document_id_schema("ID of the document to delete"),
        ),
        tool(
            "bulk_update_documents",
            "Update multiple documents at once with new metadata (requires document IDs)",
            json!({
                "type": "object",
                "properties": {
                    "documents": {
                        "type": "array",
                        "description": "Array of documents to update with their IDs and new values",
                        "items": {
                            "type": "object",
                            "properties": bulk_item,
                            "required": ["id"]
                        }
                    }
                },
                "required": ["documents"]
            }),
        ),
        tool(
            "download_document",
            "Get download URL for a document's original file",
            document_id_schema("ID of the document to download"),
        ),
        tool(
            "get_document_suggestions",
            "Get automatic suggestions for document metadata",
            document_id_schema("ID of the document"),
        ),
        tool(
            "get_document_metadata",
            "Get extracted metadata from document",
            document_id_schema("ID of the document"),
        ),
        // Tags
        tool(
            "list_tags",
            "List all available tags in Paperless-ngx",
            empty_schema(),
        ),
        tool("get_tag", "Get details of a specific tag", id_schema("ID of the tag")),
        tool(
            "create_tag",
            "Create a new tag in Paperless-ngx",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Name of the new tag" },
                    "color": { "type": "string", "description": "Color code for the tag (hex format)" },
                    "text_color": { "type": "string", "description": "Text color for the tag (hex format)" }
                },
                "required": ["name"]
            }),
        ),
        tool(
            "update_tag",
            "Update an existing tag",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "description": "ID of the tag to update" },
                    "name": { "type": "string", "description": "Name of the tag" },
                    "color": { "type": "string", "description": "Color code for the tag (hex format)" },
                    "text_color": { "type": "string", "description": "Text color for the tag (hex format)" }
                },
                "required": ["id"]
            }),
        ),
        tool("delete_tag", "Delete a tag", id_schema("ID of the tag to delete")),
        // Correspondents
        tool(
            "list_correspondents",
            "List all correspondents in Paperless-ngx",
            empty_schema(),
        ),
        tool(
            "get_correspondent",
            "Get details of a specific correspondent",
            id_schema("ID of the correspondent"),
        ),
        tool(
            "create_correspondent",
            "Create a new correspondent in Paperless-ngx",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Name of the new correspondent" }
                },
                "required": ["name"]
            }),
        ),
        tool(
            "update_correspondent",
            "Update an existing correspondent",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "description": "ID of the correspondent to update" },
                    "name": { "type": "string", "description": "Name of the correspondent" }
                },
                "required": ["id"]
            }),
        ),
        tool(
            "delete_correspondent",
            "Delete a correspondent",
            id_schema("ID of the correspondent to delete"),
        ),
        // Document types
        tool(
            "list_document_types",
            "List all document types in Paperless-ngx",
            empty_schema(),
        ),
        tool(
            "get_document_type",
            "Get details of a specific document type",
            id_schema("ID of the document type"),
        ),
        tool(
            "create_document_type",
            "Create a new document type in Paperless-ngx",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Name of the new document type" }
                },
                "required": ["name"]
            }),
        ),
        tool(
            "update_document_type",
            "Update an existing document type",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "description": "ID of the document type to update" },
                    "name": { "type": "string", "description": "Name of the document type" }
                },
                "required": ["id"]
            }),
        ),
        tool(
            "delete_document_type",
            "Delete a document type",
            id_schema("ID of the document type to delete"),
        ),
        // Storage paths
        tool(
            "list_storage_paths",
            "List all storage paths in Paperless-ngx",
            empty_schema(),
        ),
        tool(
            "get_storage_path",
            "Get details of a specific storage path",
            id_schema("ID of the storage path"),
        ),
        tool(
            "create_storage_path",
            "Create a new storage path",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Name of the storage path" },
                    "path": { "type": "string", "description": "File system path" },
                    "match": { "type": "string", "description": "Matching pattern" },
                    "matching_algorithm": { "type": "integer", "description": "Algorithm for matching" }
                },
                "required": ["name", "path"]
            }),
        ),
        tool(
            "update_storage_path",
            "Update an existing storage path",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "description": "ID of the storage path to update" },
                    "name": { "type": "string", "description": "Name of the storage path" },
                    "path": { "type": "string", "description": "File system path" },
                    "match": { "type": "string", "description": "Matching pattern" },
                    "matching_algorithm": { "type": "integer", "description": "Algorithm for matching" }
                },
                "required": ["id"]
            }),
        ),
        tool(
            "delete_storage_path",
            "Delete a storage path",
            id_schema("ID of the storage path to delete"),
        ),
        // Custom fields
        tool(
            "list_custom_fields",
            "List all custom fields in Paperless-ngx",
            empty_schema(),
        ),
        tool(
            "get_custom_field",
            "Get details of a specific custom field",
            id_schema("ID of the custom field"),
        ),
        tool(
            "create_custom_field",
            "Create a new custom field",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Name of the custom field" },
                    "data_type": {
                        "type": "string",
                        "description": "Data type of the field",
                        "enum": ["string", "url", "date", "boolean", "integer", "float", "monetary"]
                    }
                },
                "required": ["name", "data_type"]
            }),
        ),
        tool(
            "update_custom_field",
            "Update an existing custom field",
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "description": "ID of the custom field to update" },
                    "name": { "type": "string", "description": "Name of the custom field" },
                    "data_type": {
                        "type": "string",
                        "description": "Data type of the field",
                        "enum": ["string", "url", "date", "boolean", "integer", "float", "monetary"]
                    }
                },
                "required": ["id"]
            }),
        ),
        tool(
            "delete_custom_field",
            "Delete a custom field",
            id_schema("ID of the custom field to delete"),
        ),
        // Saved views
        tool(
            "list_saved_views",
            "List all saved views in Paperless-ngx",
            empty_schema(),
        ),
        tool(
            "get_saved_view",
            "Get details of a specific saved view",
            id_schema("ID of the saved view"),
        ),
        tool(
            "create_saved_view",
            "Create a new saved view",
            json!({
                "type": "object",
                "properties": saved_view_properties(),
                "required": ["name"]
            }),
        ),
        tool(
            "update_saved_view",
            "Update an existing saved view",
            json!({
                "type": "object",
                "properties": update_saved_view,
                "required": ["id"]
            }),
        ),
        tool(
            "delete_saved_view",
            "Delete a saved view",
            id_schema("ID of the saved view to delete"),
        ),
        // Tasks, statistics, system
        tool("list_tasks", "List all tasks in Paperless-ngx", empty_schema()),
        tool(
            "acknowledge_task",
            "Acknowledge a completed task",
            id_schema("ID of the task to acknowledge"),
        ),
        tool("get_statistics", "Get Paperless-ngx statistics", empty_schema()),
        tool("get_logs", "Get Paperless-ngx system logs", empty_schema()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaperlessConfig;

    fn test_registry() -> ToolRegistry {
        let config = PaperlessConfig::new("http://127.0.0.1:9", "token-1234").expect("config");
        let client = Arc::new(PaperlessClient::new(&config).expect("client"));
        ToolRegistry::new(client)
    }

    #[test]
    fn test_registry_contains_core_tools() {
        let registry = test_registry();

        assert!(registry.get_tool("search_documents").is_some());
        assert!(registry.get_tool("get_document").is_some());
        assert!(registry.get_tool("update_document").is_some());
        assert!(registry.get_tool("bulk_update_documents").is_some());
        assert!(registry.get_tool("create_tag").is_some());
        assert!(registry.get_tool("list_saved_views").is_some());
        assert!(registry.get_tool("acknowledge_task").is_some());
        assert!(registry.get_tool("get_statistics").is_some());
    }

    #[test]
    fn test_tool_count() {
        let registry = test_registry();
        assert_eq!(registry.list_tools().len(), 42);
    }

    #[test]
    fn test_tool_definitions_have_required_fields() {
        let registry = test_registry();

        for tool in registry.list_tools() {
            assert!(!tool.name.is_empty(), "Tool name cannot be empty");
            assert!(
                !tool.description.is_empty(),
                "Tool {} must have a description",
                tool.name
            );
            assert_eq!(
                tool.input_schema["type"], "object",
                "Tool {} schema type must be object",
                tool.name
            );
            assert!(
                tool.input_schema["properties"].is_object(),
                "Tool {} must have properties in schema",
                tool.name
            );
        }
    }

    #[test]
    fn test_update_document_schema_splits_id() {
        let registry = test_registry();
        let tool = registry.get_tool("update_document").expect("tool");

        let required = tool.input_schema["required"].as_array().expect("required");
        assert_eq!(required, &vec![json!("document_id")]);
        assert!(tool.input_schema["properties"]["title"].is_object());
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_input() {
        let registry = test_registry();
        let result = registry.execute("unknown_tool", json!({})).await;

        match result {
            Err(Error::InvalidInput(message)) => {
                assert!(message.contains("Unknown tool: unknown_tool"));
            },
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_invalid_input() {
        let registry = test_registry();

        // Missing required document_id.
        let result = registry.execute("get_document", json!({})).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        // Wrong type for tags.
        let result = registry
            .execute("search_documents", json!({"tags": "not-an-array"}))
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        // Enum violation in ordering.
        let result = registry
            .execute("search_documents", json!({"ordering": "size"}))
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_download_document_needs_no_network() {
        let registry = test_registry();
        let result = registry
            .execute("download_document", json!({"document_id": 9}))
            .await
            .expect("download url");

        assert!(!result.is_error);
        let ToolContent::Text { text } = &result.content[0];
        assert_eq!(
            text,
            "Download URL: http://127.0.0.1:9/api/documents/9/download/"
        );
    }
}
