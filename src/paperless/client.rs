//! Async HTTP client for the Paperless-ngx REST API.
//!
//! A thin typed façade: one method per resource operation, no retries, no
//! caching. Failures surface as [`Error::Upstream`] with the status and
//! body text of the offending response. Bulk document update is the one
//! composite operation: independent PATCH calls fanned out concurrently
//! with per-item success/failure accounting.

use crate::config::PaperlessConfig;
use crate::paperless::models::{
    BulkUpdateItem, BulkUpdateOutcome, Correspondent, CorrespondentCreate, CorrespondentUpdate,
    CustomField, CustomFieldCreate, CustomFieldUpdate, Document, DocumentType, DocumentTypeCreate,
    DocumentTypeUpdate, DocumentUpdate, FailedUpdate, Page, PaperlessTask, SavedView,
    SavedViewCreate, SavedViewUpdate, SearchParams, StoragePath, StoragePathCreate,
    StoragePathUpdate, Tag, TagCreate, TagUpdate,
};
use crate::{Error, Result};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Client for the Paperless-ngx REST API.
///
/// Stateless and cheap to share: configuration is immutable after
/// construction and `reqwest::Client` pools connections internally.
pub struct PaperlessClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// HTTP client with default auth header and timeout.
    http: reqwest::Client,
}

impl PaperlessClient {
    /// Creates a new client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be encoded as a header value
    /// or the HTTP client fails to build.
    pub fn new(config: &PaperlessConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Token {}", config.token.expose_secret()))
            .map_err(|e| Error::MissingConfiguration(format!("PAPERLESS_TOKEN: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .user_agent(format!("paperless-mcp/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::OperationFailed {
                operation: "build_http_client".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
        })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------

    /// Searches documents with optional filters.
    pub async fn search_documents(&self, params: &SearchParams) -> Result<Page<Document>> {
        let operation = "search_documents";
        let url = self.endpoint("/api/documents/");
        let response = self
            .http
            .get(url)
            .query(&params.to_query())
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;

        decode(operation, check_status(operation, response).await?).await
    }

    /// Retrieves a single document.
    pub async fn get_document(&self, document_id: i64) -> Result<Document> {
        self.get_json("get_document", &format!("/api/documents/{document_id}/"))
            .await
    }

    /// Retrieves a document's extracted text content.
    ///
    /// Falls back to the `content` field of the document itself when the
    /// content endpoint fails, so a missing archive file does not make the
    /// document unreadable.
    pub async fn get_document_content(&self, document_id: i64) -> Result<String> {
        let operation = "get_document_content";
        let url = self.endpoint(&format!("/api/documents/{document_id}/content/"));

        let attempt = async {
            let response = self
                .http
                .get(url)
                .header(reqwest::header::ACCEPT, "text/plain")
                .send()
                .await
                .map_err(|e| transport_error(operation, &e))?;
            check_status(operation, response)
                .await?
                .text()
                .await
                .map_err(|e| decode_error(operation, &e))
        };

        match attempt.await {
            Ok(content) => Ok(content),
            Err(e) => {
                tracing::warn!(document_id, error = %e, "Content endpoint failed, falling back to document body");
                let document = self.get_document(document_id).await?;
                Ok(document
                    .content
                    .unwrap_or_else(|| "Content not available".to_string()))
            },
        }
    }

    /// Applies a partial update to a document.
    pub async fn update_document(
        &self,
        document_id: i64,
        update: &DocumentUpdate,
    ) -> Result<Document> {
        self.patch_json(
            "update_document",
            &format!("/api/documents/{document_id}/"),
            update,
        )
        .await
    }

    /// Deletes a document.
    pub async fn delete_document(&self, document_id: i64) -> Result<()> {
        self.delete("delete_document", &format!("/api/documents/{document_id}/"))
            .await
    }

    /// Retrieves metadata suggestions for a document.
    pub async fn get_document_suggestions(&self, document_id: i64) -> Result<Value> {
        self.get_json(
            "get_document_suggestions",
            &format!("/api/documents/{document_id}/suggestions/"),
        )
        .await
    }

    /// Retrieves extracted metadata for a document.
    pub async fn get_document_metadata(&self, document_id: i64) -> Result<Value> {
        self.get_json(
            "get_document_metadata",
            &format!("/api/documents/{document_id}/metadata/"),
        )
        .await
    }

    /// Returns the download URL for a document's original file.
    ///
    /// The caller must supply auth headers when fetching it; no request is
    /// issued here.
    #[must_use]
    pub fn download_url(&self, document_id: i64) -> String {
        format!("{}/api/documents/{document_id}/download/", self.base_url)
    }

    /// Updates many documents with independent PATCH calls.
    ///
    /// All items are dispatched concurrently; the failure list is built
    /// from whichever settle, keyed by document id. Partial success is the
    /// normal case; this never returns an error.
    pub async fn bulk_update_documents(&self, items: Vec<BulkUpdateItem>) -> BulkUpdateOutcome {
        let updates = items.into_iter().map(|item| async move {
            let outcome = self.update_document(item.id, &item.fields).await;
            (item.id, outcome)
        });

        let mut updated_count = 0;
        let mut failed_updates = Vec::new();
        for (id, outcome) in futures::future::join_all(updates).await {
            match outcome {
                Ok(_) => updated_count += 1,
                Err(e) => failed_updates.push(FailedUpdate {
                    id,
                    error: e.to_string(),
                }),
            }
        }

        BulkUpdateOutcome {
            updated_count,
            failed_updates,
        }
    }

    // ------------------------------------------------------------------
    // Tags
    // ------------------------------------------------------------------

    /// Lists all tags.
    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.list_results("list_tags", "/api/tags/").await
    }

    /// Retrieves a single tag.
    pub async fn get_tag(&self, id: i64) -> Result<Tag> {
        self.get_json("get_tag", &format!("/api/tags/{id}/")).await
    }

    /// Creates a tag.
    pub async fn create_tag(&self, tag: &TagCreate) -> Result<Tag> {
        self.post_json("create_tag", "/api/tags/", tag).await
    }

    /// Applies a partial update to a tag.
    pub async fn update_tag(&self, id: i64, update: &TagUpdate) -> Result<Tag> {
        self.patch_json("update_tag", &format!("/api/tags/{id}/"), update)
            .await
    }

    /// Deletes a tag.
    pub async fn delete_tag(&self, id: i64) -> Result<()> {
        self.delete("delete_tag", &format!("/api/tags/{id}/")).await
    }

    // ------------------------------------------------------------------
    // Correspondents
    // ------------------------------------------------------------------

    /// Lists all correspondents.
    pub async fn list_correspondents(&self) -> Result<Vec<Correspondent>> {
        self.list_results("list_correspondents", "/api/correspondents/")
            .await
    }

    /// Retrieves a single correspondent.
    pub async fn get_correspondent(&self, id: i64) -> Result<Correspondent> {
        self.get_json("get_correspondent", &format!("/api/correspondents/{id}/"))
            .await
    }

    /// Creates a correspondent.
    pub async fn create_correspondent(
        &self,
        correspondent: &CorrespondentCreate,
    ) -> Result<Correspondent> {
        self.post_json("create_correspondent", "/api/correspondents/", correspondent)
            .await
    }

    /// Applies a partial update to a correspondent.
    pub async fn update_correspondent(
        &self,
        id: i64,
        update: &CorrespondentUpdate,
    ) -> Result<Correspondent> {
        self.patch_json(
            "update_correspondent",
            &format!("/api/correspondents/{id}/"),
            update,
        )
        .await
    }

    /// Deletes a correspondent.
    pub async fn delete_correspondent(&self, id: i64) -> Result<()> {
        self.delete("delete_correspondent", &format!("/api/correspondents/{id}/"))
            .await
    }

    // ------------------------------------------------------------------
    // Document types
    // ------------------------------------------------------------------

    /// Lists all document types.
    pub async fn list_document_types(&self) -> Result<Vec<DocumentType>> {
        self.list_results("list_document_types", "/api/document_types/")
            .await
    }

    /// Retrieves a single document type.
    pub async fn get_document_type(&self, id: i64) -> Result<DocumentType> {
        self.get_json("get_document_type", &format!("/api/document_types/{id}/"))
            .await
    }

    /// Creates a document type.
    pub async fn create_document_type(
        &self,
        document_type: &DocumentTypeCreate,
    ) -> Result<DocumentType> {
        self.post_json("create_document_type", "/api/document_types/", document_type)
            .await
    }

    /// Applies a partial update to a document type.
    pub async fn update_document_type(
        &self,
        id: i64,
        update: &DocumentTypeUpdate,
    ) -> Result<DocumentType> {
        self.patch_json(
            "update_document_type",
            &format!("/api/document_types/{id}/"),
            update,
        )
        .await
    }

    /// Deletes a document type.
    pub async fn delete_document_type(&self, id: i64) -> Result<()> {
        self.delete("delete_document_type", &format!("/api/document_types/{id}/"))
            .await
    }

    // ------------------------------------------------------------------
    // Storage paths
    // ------------------------------------------------------------------

    /// Lists all storage paths.
    pub async fn list_storage_paths(&self) -> Result<Vec<StoragePath>> {
        self.list_results("list_storage_paths", "/api/storage_paths/")
            .await
    }

    /// Retrieves a single storage path.
    pub async fn get_storage_path(&self, id: i64) -> Result<StoragePath> {
        self.get_json("get_storage_path", &format!("/api/storage_paths/{id}/"))
            .await
    }

    /// Creates a storage path.
    pub async fn create_storage_path(&self, storage_path: &StoragePathCreate) -> Result<StoragePath> {
        self.post_json("create_storage_path", "/api/storage_paths/", storage_path)
            .await
    }

    /// Applies a partial update to a storage path.
    pub async fn update_storage_path(
        &self,
        id: i64,
        update: &StoragePathUpdate,
    ) -> Result<StoragePath> {
        self.patch_json(
            "update_storage_path",
            &format!("/api/storage_paths/{id}/"),
            update,
        )
        .await
    }

    /// Deletes a storage path.
    pub async fn delete_storage_path(&self, id: i64) -> Result<()> {
        self.delete("delete_storage_path", &format!("/api/storage_paths/{id}/"))
            .await
    }

    // ------------------------------------------------------------------
    // Custom fields
    // ------------------------------------------------------------------

    /// Lists all custom fields.
    pub async fn list_custom_fields(&self) -> Result<Vec<CustomField>> {
        self.list_results("list_custom_fields", "/api/custom_fields/")
            .await
    }

    /// Retrieves a single custom field.
    pub async fn get_custom_field(&self, id: i64) -> Result<CustomField> {
        self.get_json("get_custom_field", &format!("/api/custom_fields/{id}/"))
            .await
    }

    /// Creates a custom field.
    pub async fn create_custom_field(&self, field: &CustomFieldCreate) -> Result<CustomField> {
        self.post_json("create_custom_field", "/api/custom_fields/", field)
            .await
    }

    /// Applies a partial update to a custom field.
    pub async fn update_custom_field(
        &self,
        id: i64,
        update: &CustomFieldUpdate,
    ) -> Result<CustomField> {
        self.patch_json(
            "update_custom_field",
            &format!("/api/custom_fields/{id}/"),
            update,
        )
        .await
    }

    /// Deletes a custom field.
    pub async fn delete_custom_field(&self, id: i64) -> Result<()> {
        self.delete("delete_custom_field", &format!("/api/custom_fields/{id}/"))
            .await
    }

    // ------------------------------------------------------------------
    // Saved views
    // ------------------------------------------------------------------

    /// Lists all saved views.
    pub async fn list_saved_views(&self) -> Result<Vec<SavedView>> {
        self.list_results("list_saved_views", "/api/saved_views/")
            .await
    }

    /// Retrieves a single saved view.
    pub async fn get_saved_view(&self, id: i64) -> Result<SavedView> {
        self.get_json("get_saved_view", &format!("/api/saved_views/{id}/"))
            .await
    }

    /// Creates a saved view.
    pub async fn create_saved_view(&self, view: &SavedViewCreate) -> Result<SavedView> {
        self.post_json("create_saved_view", "/api/saved_views/", view)
            .await
    }

    /// Applies a partial update to a saved view.
    pub async fn update_saved_view(&self, id: i64, update: &SavedViewUpdate) -> Result<SavedView> {
        self.patch_json(
            "update_saved_view",
            &format!("/api/saved_views/{id}/"),
            update,
        )
        .await
    }

    /// Deletes a saved view.
    pub async fn delete_saved_view(&self, id: i64) -> Result<()> {
        self.delete("delete_saved_view", &format!("/api/saved_views/{id}/"))
            .await
    }

    // ------------------------------------------------------------------
    // Tasks, statistics, logs
    // ------------------------------------------------------------------

    /// Lists background tasks.
    pub async fn list_tasks(&self) -> Result<Vec<PaperlessTask>> {
        self.get_json("list_tasks", "/api/tasks/").await
    }

    /// Acknowledges a completed task.
    pub async fn acknowledge_task(&self, id: i64) -> Result<()> {
        let operation = "acknowledge_task";
        let url = self.endpoint(&format!("/api/tasks/{id}/acknowledge/"));
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;

        check_status(operation, response).await.map(|_| ())
    }

    /// Retrieves archive statistics.
    pub async fn get_statistics(&self) -> Result<Value> {
        self.get_json("get_statistics", "/api/statistics/").await
    }

    /// Retrieves system logs.
    pub async fn get_logs(&self) -> Result<Value> {
        self.get_json("get_logs", "/api/logs/").await
    }

    // ------------------------------------------------------------------
    // Request plumbing
    // ------------------------------------------------------------------

    /// Joins the base URL with an endpoint path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Issues a GET and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, operation: &'static str, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.endpoint(path))
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;

        decode(operation, check_status(operation, response).await?).await
    }

    /// Issues a GET against a paginated listing endpoint and unwraps the
    /// `results` array.
    async fn list_results<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<Vec<T>> {
        let page: Page<T> = self.get_json(operation, path).await?;
        Ok(page.results)
    }

    /// Issues a POST with a JSON body and decodes the response.
    async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;

        decode(operation, check_status(operation, response).await?).await
    }

    /// Issues a PATCH with a JSON body and decodes the response.
    async fn patch_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self
            .http
            .patch(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;

        decode(operation, check_status(operation, response).await?).await
    }

    /// Issues a DELETE and discards the body.
    async fn delete(&self, operation: &'static str, path: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoint(path))
            .send()
            .await
            .map_err(|e| transport_error(operation, &e))?;

        check_status(operation, response).await.map(|_| ())
    }
}

/// Maps a reqwest transport failure to an upstream error with a coarse
/// error kind for log filtering.
fn transport_error(operation: &str, e: &reqwest::Error) -> Error {
    let error_kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_request() {
        "request"
    } else {
        "unknown"
    };
    tracing::error!(
        operation,
        error = %e,
        error_kind,
        "Paperless request failed"
    );
    Error::Upstream {
        operation: operation.to_string(),
        cause: format!("{error_kind} error: {e}"),
    }
}

/// Rejects non-2xx responses, carrying the status and body text.
async fn check_status(operation: &str, response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!(operation, status = %status, body = %body, "Paperless API returned error status");
    Err(Error::Upstream {
        operation: operation.to_string(),
        cause: format!("API returned status: {status} - {body}"),
    })
}

/// Decodes a JSON response body.
async fn decode<T: DeserializeOwned>(operation: &str, response: reqwest::Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| decode_error(operation, &e))
}

/// Maps a body-decoding failure to an upstream error.
fn decode_error(operation: &str, e: &reqwest::Error) -> Error {
    tracing::error!(operation, error = %e, "Failed to decode Paperless response");
    Error::Upstream {
        operation: operation.to_string(),
        cause: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> PaperlessClient {
        let config = PaperlessConfig::new("http://paperless.local:8000", "token-1234")
            .expect("valid config");
        PaperlessClient::new(&config).expect("client")
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let client = test_client();
        assert_eq!(
            client.endpoint("/api/documents/"),
            "http://paperless.local:8000/api/documents/"
        );
    }

    #[test]
    fn test_download_url() {
        let client = test_client();
        assert_eq!(
            client.download_url(17),
            "http://paperless.local:8000/api/documents/17/download/"
        );
    }
}
