//! MaxKB knowledge base client

use async_trait::async_trait;
use tracing::debug;

use super::records::{ChatRecord, HitRecord, KnowledgeBaseRecord};
use super::shape::ApiShape;
use super::transport::{HttpMethod, ReqwestTransport, Transport};
use crate::domain::{
    ChatRequest, ChatResponse, DomainError, KnowledgeBase, KnowledgeBaseGateway, SearchRequest,
    SearchResponse, SearchResult,
};

/// Adapter between the knowledge base gateway and one MaxKB deployment
///
/// Holds no per-call state, so a single instance can serve concurrent callers.
#[derive(Debug)]
pub struct MaxKbClient<T: Transport = ReqwestTransport> {
    transport: T,
    shape: Box<dyn ApiShape>,
}

impl<T: Transport> MaxKbClient<T> {
    pub fn new(transport: T, shape: Box<dyn ApiShape>) -> Self {
        Self { transport, shape }
    }

    pub fn shape(&self) -> &dyn ApiShape {
        self.shape.as_ref()
    }

    /// Tear down the client, releasing the underlying connection pool
    pub fn close(self) {
        debug!(api_version = %self.shape.version(), "Closing MaxKB client");
        drop(self.transport);
    }
}

#[async_trait]
impl<T: Transport> KnowledgeBaseGateway for MaxKbClient<T> {
    async fn list_knowledge_bases(&self) -> Result<Vec<KnowledgeBase>, DomainError> {
        let envelope = self
            .transport
            .request(HttpMethod::Get, &self.shape.list_path(), None)
            .await?;

        if !envelope.is_success() {
            debug!(code = envelope.code, message = %envelope.message, "No knowledge bases returned");
        }

        let records: Vec<KnowledgeBaseRecord> = envelope.into_records()?;
        Ok(records.into_iter().map(KnowledgeBase::from).collect())
    }

    async fn get_knowledge_base(&self, id: &str) -> Result<Option<KnowledgeBase>, DomainError> {
        let envelope = self
            .transport
            .request(HttpMethod::Get, &self.shape.get_path(id), None)
            .await?;

        if !envelope.is_success() {
            debug!(knowledge_base_id = %id, code = envelope.code, "Knowledge base not returned");
            return Ok(None);
        }

        // Some deployments answer with a one-element list instead of a record
        let mut records: Vec<KnowledgeBaseRecord> = envelope.into_records()?;
        if records.is_empty() {
            return Ok(None);
        }

        // Anonymous records can only be taken positionally
        let index = match records.iter().position(|record| record.has_id(id)) {
            Some(index) => index,
            None if !records.iter().any(KnowledgeBaseRecord::carries_id) => 0,
            None => {
                debug!(knowledge_base_id = %id, "No returned record matches the requested id");
                return Ok(None);
            }
        };

        Ok(Some(records.swap_remove(index).into()))
    }

    async fn search(&self, request: SearchRequest) -> Result<SearchResponse, DomainError> {
        let call = self.shape.search_call(&request);
        debug!(
            knowledge_base_id = %request.knowledge_base_id(),
            top_k = request.top_k(),
            path = %call.path,
            "Searching knowledge base"
        );

        let envelope = self
            .transport
            .request(HttpMethod::Post, &call.path, Some(call.body))
            .await?;

        if !envelope.is_success() {
            return Ok(SearchResponse::empty());
        }

        let hits: Vec<HitRecord> = envelope.into_records()?;
        Ok(SearchResponse::new(
            hits.into_iter().map(SearchResult::from).collect(),
        ))
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, DomainError> {
        let call = self
            .shape
            .chat_call(&request)
            .ok_or_else(|| DomainError::unsupported("chat", self.shape.version().to_string()))?;

        // Only the latest message is transmitted; the upstream keeps its own history
        debug!(
            knowledge_base_id = %request.knowledge_base_id(),
            turns = request.conversation().len(),
            "Sending chat message"
        );

        let envelope = self
            .transport
            .request(HttpMethod::Post, &call.path, Some(call.body))
            .await?;

        let record: Option<ChatRecord> = envelope.into_record()?;
        Ok(record.map(ChatResponse::from).unwrap_or_else(ChatResponse::fallback))
    }

    fn supports_chat(&self) -> bool {
        self.shape.supports_chat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiVersion;
    use crate::domain::{SearchMode, NO_ANSWER_FALLBACK};
    use crate::infrastructure::maxkb::envelope::Envelope;
    use crate::infrastructure::maxkb::shape::{DatasetApi, WorkspaceApi};
    use crate::infrastructure::maxkb::transport::MockTransport;
    use serde_json::{json, Value};

    fn envelope(value: Value) -> Envelope {
        Envelope::from_value(value).unwrap()
    }

    fn dataset_client(transport: MockTransport) -> MaxKbClient<MockTransport> {
        MaxKbClient::new(transport, Box::new(DatasetApi))
    }

    fn workspace_client(transport: MockTransport) -> MaxKbClient<MockTransport> {
        MaxKbClient::new(transport, Box::new(WorkspaceApi::new("default").unwrap()))
    }

    #[tokio::test]
    async fn test_list_knowledge_bases() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .withf(|method, path, body| {
                *method == HttpMethod::Get && path == "/dataset" && body.is_none()
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(envelope(json!({
                    "code": 200,
                    "message": "success",
                    "data": [
                        {"id": "kb1", "name": "Docs", "desc": "Manuals", "document_count": 3},
                        {"id": 7, "name": "FAQ", "document_count": null}
                    ]
                })))
            });

        let knowledge_bases = dataset_client(transport)
            .list_knowledge_bases()
            .await
            .unwrap();

        assert_eq!(knowledge_bases.len(), 2);
        assert_eq!(knowledge_bases[0].description, "Manuals");
        assert_eq!(knowledge_bases[0].document_count, 3);
        assert_eq!(knowledge_bases[1].id, "7");
        assert_eq!(knowledge_bases[1].document_count, 0);
    }

    #[tokio::test]
    async fn test_list_empty_on_non_success_code_or_null_data() {
        for body in [
            json!({"code": 404, "message": "not found", "data": [{"id": "kb1", "name": "x"}]}),
            json!({"code": 200, "message": "success", "data": null}),
        ] {
            let mut transport = MockTransport::new();
            transport
                .expect_request()
                .returning(move |_, _, _| Ok(envelope(body.clone())));

            let knowledge_bases = dataset_client(transport)
                .list_knowledge_bases()
                .await
                .unwrap();

            assert!(knowledge_bases.is_empty());
        }
    }

    #[tokio::test]
    async fn test_list_uses_workspace_path() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .withf(|method, path, body| {
                *method == HttpMethod::Get && path == "/workspace/default/knowledge" && body.is_none()
            })
            .times(1)
            .returning(|_, _, _| Ok(envelope(json!({"code": 200, "data": []}))));

        let knowledge_bases = workspace_client(transport)
            .list_knowledge_bases()
            .await
            .unwrap();

        assert!(knowledge_bases.is_empty());
    }

    #[tokio::test]
    async fn test_get_knowledge_base_from_list_payload() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .withf(|method, path, body| {
                *method == HttpMethod::Get && path == "/dataset/kb1" && body.is_none()
            })
            .returning(|_, _, _| {
                Ok(envelope(json!({
                    "code": 200,
                    "data": [{"id": "kb1", "name": "Docs", "desc": "", "document_count": null}]
                })))
            });

        let knowledge_base = dataset_client(transport)
            .get_knowledge_base("kb1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(knowledge_base.id, "kb1");
        assert_eq!(knowledge_base.name, "Docs");
        assert_eq!(knowledge_base.document_count, 0);
        assert_eq!(knowledge_base.description, "");
    }

    #[tokio::test]
    async fn test_get_knowledge_base_picks_matching_record() {
        let mut transport = MockTransport::new();
        transport.expect_request().returning(|_, _, _| {
            Ok(envelope(json!({
                "code": 200,
                "data": [{"id": "kb0", "name": "Other"}, {"id": "kb1", "name": "Docs"}]
            })))
        });

        let knowledge_base = dataset_client(transport)
            .get_knowledge_base("kb1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(knowledge_base.name, "Docs");
    }

    #[tokio::test]
    async fn test_get_knowledge_base_rejects_other_ids() {
        let mut transport = MockTransport::new();
        transport.expect_request().returning(|_, _, _| {
            Ok(envelope(json!({
                "code": 200,
                "data": [{"id": "kb0", "name": "Other"}, {"id": "kb2", "name": "Another"}]
            })))
        });

        let result = dataset_client(transport)
            .get_knowledge_base("kb1")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_get_knowledge_base_takes_first_anonymous_record() {
        let mut transport = MockTransport::new();
        transport.expect_request().returning(|_, _, _| {
            Ok(envelope(json!({
                "code": 200,
                "data": [{"name": "Docs", "document_count": 4}, {"name": "FAQ"}]
            })))
        });

        let knowledge_base = dataset_client(transport)
            .get_knowledge_base("kb1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(knowledge_base.name, "Docs");
        assert_eq!(knowledge_base.document_count, 4);
    }

    #[tokio::test]
    async fn test_non_success_code_with_malformed_data_is_empty() {
        let mut transport = MockTransport::new();
        transport.expect_request().times(4).returning(|_, path, _| {
            let data = if path.ends_with("hit_test") {
                json!([1, 2])
            } else {
                json!("knowledge base does not exist")
            };
            Ok(envelope(json!({"code": 404, "message": "not found", "data": data})))
        });
        let client = dataset_client(transport);

        assert!(client.list_knowledge_bases().await.unwrap().is_empty());
        assert!(client.get_knowledge_base("kb1").await.unwrap().is_none());

        let request = SearchRequest::new("reset password", "kb1").unwrap();
        assert_eq!(client.search(request).await.unwrap().total(), 0);

        let request = ChatRequest::new("hello", "app-1").unwrap();
        assert_eq!(client.chat(request).await.unwrap().answer, NO_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn test_get_knowledge_base_single_record() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .withf(|method, path, body| {
                *method == HttpMethod::Get && path == "/workspace/default/knowledge/kb9" && body.is_none()
            })
            .returning(|_, _, _| {
                Ok(envelope(json!({
                    "code": 200,
                    "data": {"id": "kb9", "name": "Nine", "create_time": "2024-01-01"}
                })))
            });

        let knowledge_base = workspace_client(transport)
            .get_knowledge_base("kb9")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(knowledge_base.create_time, "2024-01-01");
    }

    #[tokio::test]
    async fn test_get_knowledge_base_absent() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .returning(|_, _, _| Ok(envelope(json!({"code": 500, "message": "missing"}))));

        let result = dataset_client(transport)
            .get_knowledge_base("nope")
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_workspace_search_payload_and_mapping() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .withf(|method, path, body| {
                *method == HttpMethod::Post
                    && path == "/workspace/default/knowledge/kb1/hit_test"
                    && body.as_ref()
                        == Some(&json!({
                            "query_text": "foo?",
                            "top_number": 5,
                            "search_mode": "embedding",
                            "similarity": 0.6
                        }))
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(envelope(json!({
                    "code": 200,
                    "data": [{"content": "foo", "similarity": 0.82}]
                })))
            });

        let request = SearchRequest::builder("foo?", "kb1")
            .top_k(5)
            .similarity(0.6)
            .search_mode(SearchMode::Embedding)
            .build()
            .unwrap();

        let response = workspace_client(transport).search(request).await.unwrap();

        assert_eq!(response.total(), 1);
        assert_eq!(response.results()[0].content, "foo");
        assert_eq!(response.results()[0].title, "");
        assert_eq!(response.results()[0].similarity, 0.82);
    }

    #[tokio::test]
    async fn test_dataset_search_ignores_caller_mode_and_threshold() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .withf(|_, path, body| {
                path == "/dataset/kb1/hit_test"
                    && body.as_ref()
                        == Some(&json!({
                            "query": "foo",
                            "top_number": 10,
                            "search_mode": "embedding",
                            "similarity": 0.6
                        }))
            })
            .returning(|_, _, _| {
                Ok(envelope(json!({
                    "code": 200,
                    "data": [
                        {"content": "a", "similarity": 0.4},
                        {"content": "b", "similarity": 0.9}
                    ],
                    "total": 99
                })))
            });

        let request = SearchRequest::builder("foo", "kb1")
            .top_k(10)
            .similarity(0.1)
            .search_mode(SearchMode::Keywords)
            .build()
            .unwrap();

        let response = dataset_client(transport).search(request).await.unwrap();

        // upstream order is preserved and total matches the mapped list
        assert_eq!(response.total(), 2);
        assert_eq!(response.results()[0].content, "a");
        assert_eq!(response.results()[1].content, "b");
    }

    #[tokio::test]
    async fn test_search_empty_on_no_data() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .returning(|_, _, _| Ok(envelope(json!({"code": 200, "data": []}))));

        let request = SearchRequest::new("foo", "kb1").unwrap();
        let response = dataset_client(transport).search(request).await.unwrap();

        assert_eq!(response.total(), 0);
        assert!(response.results().is_empty());
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .returning(|_, _, _| Err(DomainError::authentication("expired key")));

        let request = SearchRequest::new("foo", "kb1").unwrap();
        let result = dataset_client(transport).search(request).await;

        assert!(matches!(result, Err(DomainError::Authentication { .. })));
    }

    #[tokio::test]
    async fn test_chat() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .withf(|method, path, body| {
                *method == HttpMethod::Post
                    && path == "/application/chat"
                    && body.as_ref()
                        == Some(&json!({
                            "message": "How do I reset?",
                            "re_chat": false,
                            "stream": false,
                            "application_id": "app-1"
                        }))
            })
            .returning(|_, _, _| {
                Ok(envelope(json!({
                    "code": 200,
                    "data": {
                        "content": "Use the reset link.",
                        "reference": [{"content": "Reset via email", "similarity": 0.77}]
                    }
                })))
            });

        let request = ChatRequest::new("How do I reset?", "app-1").unwrap();
        let response = dataset_client(transport).chat(request).await.unwrap();

        assert_eq!(response.answer, "Use the reset link.");
        assert_eq!(response.references.len(), 1);
        assert_eq!(response.references[0].similarity, 0.77);
    }

    #[tokio::test]
    async fn test_chat_fallback_on_empty_data() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .returning(|_, _, _| Ok(envelope(json!({"code": 400, "message": "bad app"}))));

        let request = ChatRequest::new("hello", "app-1").unwrap();
        let response = dataset_client(transport).chat(request).await.unwrap();

        assert_eq!(response.answer, NO_ANSWER_FALLBACK);
        assert!(response.references.is_empty());
    }

    #[tokio::test]
    async fn test_chat_unsupported_on_workspace_api() {
        let mut transport = MockTransport::new();
        transport.expect_request().never();

        let client = workspace_client(transport);
        assert!(!client.supports_chat());

        let request = ChatRequest::new("hello", "kb1").unwrap();
        let result = client.chat(request).await;

        assert!(matches!(result, Err(DomainError::Unsupported { .. })));
        assert_eq!(client.shape().version(), ApiVersion::V2);
    }

    #[tokio::test]
    async fn test_close_after_use() {
        let mut transport = MockTransport::new();
        transport
            .expect_request()
            .times(1)
            .returning(|_, _, _| Ok(envelope(json!({"code": 200, "data": []}))));

        let client = dataset_client(transport);
        assert!(client.list_knowledge_bases().await.unwrap().is_empty());

        client.close();
    }
}
