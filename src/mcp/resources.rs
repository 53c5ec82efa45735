//! MCP resource handlers.
//!
//! Exposes recent documents as addressable resources via the URI scheme
//! `paperless://document/{id}`. The projection is derived: regenerated
//! from a live repository query on each listing, never cached, never
//! mutated.

use crate::paperless::PaperlessClient;
use crate::paperless::models::SearchParams;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// URI prefix for document resources.
const DOCUMENT_URI_PREFIX: &str = "paperless://document/";

/// Page size for the recent-documents listing.
const RECENT_DOCUMENTS_LIMIT: u32 = 50;

/// Handler for MCP resources.
pub struct ResourceExposer {
    /// Shared repository client.
    client: Arc<PaperlessClient>,
}

impl ResourceExposer {
    /// Creates a new resource exposer.
    #[must_use]
    pub const fn new(client: Arc<PaperlessClient>) -> Self {
        Self { client }
    }

    /// Lists recent documents as resources.
    ///
    /// Returns an empty list when the repository is unreachable: an
    /// unavailable backend at startup must not abort initialization, and
    /// clients retry listing later.
    pub async fn list_resources(&self) -> Vec<ResourceDefinition> {
        let params = SearchParams {
            limit: Some(RECENT_DOCUMENTS_LIMIT),
            ..SearchParams::default()
        };

        match self.client.search_documents(&params).await {
            Ok(page) => page
                .results
                .iter()
                .map(|doc| ResourceDefinition {
                    uri: format!("{DOCUMENT_URI_PREFIX}{}", doc.id),
                    name: doc
                        .title
                        .clone()
                        .unwrap_or_else(|| format!("Document {}", doc.id)),
                    description: Some(format!(
                        "Document from {} - {}",
                        doc.correspondent
                            .as_ref()
                            .map_or("Unknown", |c| c.name.as_str()),
                        doc.document_type
                            .as_ref()
                            .map_or("No type", |t| t.name.as_str()),
                    )),
                    mime_type: Some("text/plain".to_string()),
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Repository unreachable, returning empty resource list");
                Vec::new()
            },
        }
    }

    /// Reads one document resource.
    ///
    /// The URI is validated before any repository call; a malformed scheme
    /// or non-numeric id is rejected synchronously. Repository failures on
    /// this path are hard errors, unlike listing: a read is an explicit,
    /// targeted request.
    pub async fn read_resource(&self, uri: &str) -> Result<ResourceContent> {
        let document_id = parse_document_uri(uri)?;

        let document = self.client.get_document(document_id).await?;
        let content = self.client.get_document_content(document_id).await?;

        let text = format!(
            "Title: {}\nCorrespondent: {}\nDocument Type: {}\nTags: {}\nCreated: {}\nModified: {}\n\nContent:\n{}",
            document.title.as_deref().unwrap_or("Untitled"),
            document
                .correspondent
                .as_ref()
                .map_or("None", |c| c.name.as_str()),
            document
                .document_type
                .as_ref()
                .map_or("None", |t| t.name.as_str()),
            format_tag_names(&document),
            document.created.as_deref().unwrap_or(""),
            document.modified.as_deref().unwrap_or(""),
            content,
        );

        Ok(ResourceContent {
            uri: uri.to_string(),
            mime_type: Some("text/plain".to_string()),
            text: Some(text),
        })
    }
}

/// Joins a document's tag names, or `None` when untagged.
fn format_tag_names(document: &crate::paperless::models::Document) -> String {
    document
        .tags
        .as_ref()
        .filter(|tags| !tags.is_empty())
        .map_or_else(
            || "None".to_string(),
            |tags| {
                tags.iter()
                    .map(|t| t.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            },
        )
}

/// Extracts the numeric document id from a resource URI.
///
/// Rejects unknown schemes and non-numeric ids before any network call.
fn parse_document_uri(uri: &str) -> Result<i64> {
    let Some(raw_id) = uri.strip_prefix(DOCUMENT_URI_PREFIX) else {
        return Err(Error::InvalidInput(format!(
            "Unsupported resource URI: {uri}"
        )));
    };

    raw_id
        .parse()
        .map_err(|_| Error::InvalidInput(format!("Invalid document ID in URI: {uri}")))
}

/// Definition of an MCP resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Resource URI.
    pub uri: String,
    /// Human-readable name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// MIME type of the content.
    pub mime_type: Option<String>,
}

/// Content of an MCP resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceContent {
    /// Resource URI.
    pub uri: String,
    /// MIME type of the content.
    pub mime_type: Option<String>,
    /// Text content.
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PaperlessConfig;

    fn test_exposer() -> ResourceExposer {
        // Port 9 (discard) is never listening; connection attempts fail fast.
        let config = PaperlessConfig::new("http://127.0.0.1:9", "token-1234").expect("config");
        let client = Arc::new(PaperlessClient::new(&config).expect("client"));
        ResourceExposer::new(client)
    }

    #[test]
    fn test_parse_document_uri() {
        assert_eq!(
            parse_document_uri("paperless://document/42").expect("valid"),
            42
        );
    }

    #[test]
    fn test_parse_rejects_unknown_scheme() {
        let result = parse_document_uri("foo://bar");
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let result = parse_document_uri("docs://document/42");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        let result = parse_document_uri("paperless://document/latest");
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let result = parse_document_uri("paperless://document/");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_listing_degrades_to_empty_when_unreachable() {
        let exposer = test_exposer();
        let resources = exposer.list_resources().await;
        assert!(resources.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_uri_rejected_before_any_request() {
        let exposer = test_exposer();
        let result = exposer.read_resource("foo://bar").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_targeted_read_surfaces_upstream_failure() {
        let exposer = test_exposer();
        let result = exposer.read_resource("paperless://document/1").await;
        assert!(matches!(result, Err(Error::Upstream { .. })));
    }
}
