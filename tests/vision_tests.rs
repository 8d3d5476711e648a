// ClaudeVision adapter tests against an in-memory Messages API
// Author: kelexine (https://github.com/kelexine)

use async_trait::async_trait;
use claude_vision::models::{ContentBlock, ImageSource, MessagesRequest, MessagesResponse, Usage};
use claude_vision::usage::{TokenUsage, UsageByModel};
use claude_vision::vision::{ClaudeVision, MediaType, Vision};
use claude_vision::{MessagesApi, VisionError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Replays canned responses and records every request it receives.
#[derive(Default)]
struct ScriptedApi {
    responses: Mutex<VecDeque<claude_vision::Result<MessagesResponse>>>,
    requests: Mutex<Vec<MessagesRequest>>,
}

impl ScriptedApi {
    fn with(responses: Vec<claude_vision::Result<MessagesResponse>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<MessagesRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl MessagesApi for ScriptedApi {
    async fn create_message(&self, request: &MessagesRequest) -> claude_vision::Result<MessagesResponse> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .expect("no scripted response left")
    }
}

fn response(content: Vec<ContentBlock>, input_tokens: u32, output_tokens: u32) -> MessagesResponse {
    MessagesResponse {
        id: "msg_test".to_string(),
        response_type: "message".to_string(),
        role: "assistant".to_string(),
        content,
        model: "claude-3-haiku-20240307".to_string(),
        stop_reason: Some("end_turn".to_string()),
        stop_sequence: None,
        usage: Usage {
            input_tokens,
            output_tokens,
            ..Default::default()
        },
    }
}

fn text_response(text: &str, input_tokens: u32, output_tokens: u32) -> MessagesResponse {
    response(vec![ContentBlock::text(text)], input_tokens, output_tokens)
}

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

#[tokio::test]
async fn test_png_query_composes_request_and_returns_first_text() {
    let api = ScriptedApi::with(vec![Ok(text_response("A single red pixel.", 20, 6))]);
    let vision = ClaudeVision::new(api.clone());
    let mut usage = UsageByModel::new();

    let answer = vision
        .query_image(
            "You are a vision assistant",
            "Describe this",
            Some(PNG_HEADER),
            &mut usage,
        )
        .await
        .unwrap();

    assert_eq!(answer, "A single red pixel.");

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.model, "claude-3-haiku-20240307");
    assert_eq!(request.system.as_deref(), Some("You are a vision assistant"));
    assert_eq!(request.max_tokens, 4096);
    assert_eq!(request.temperature, Some(0.0));
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].role, "user");

    let content = &request.messages[0].content;
    assert_eq!(content.len(), 2);
    match &content[0] {
        ContentBlock::Image {
            source: ImageSource::Base64 { media_type, data },
        } => {
            assert_eq!(*media_type, MediaType::Png);
            assert!(data.starts_with("iVBORw0KGgo"));
        }
        other => panic!("expected image block first, got {:?}", other),
    }
    assert!(matches!(&content[1], ContentBlock::Text { text } if text == "Describe this"));
}

#[tokio::test]
async fn test_usage_accumulates_across_calls() {
    let api = ScriptedApi::with(vec![
        Ok(text_response("first", 10, 5)),
        Ok(text_response("second", 7, 3)),
    ]);
    let vision = ClaudeVision::new(api);
    let mut usage = UsageByModel::new();

    vision.query_image("sys", "q1", Some(PNG_HEADER), &mut usage).await.unwrap();
    vision.query_image("sys", "q2", Some(PNG_HEADER), &mut usage).await.unwrap();

    assert_eq!(usage.len(), 1);
    assert_eq!(
        usage["claude-3-haiku-20240307"],
        TokenUsage {
            input_tokens: 17,
            output_tokens: 8,
            total_tokens: 25
        }
    );
}

#[tokio::test]
async fn test_single_call_creates_one_entry() {
    let api = ScriptedApi::with(vec![Ok(text_response("ok", 100, 50))]);
    let vision = ClaudeVision::with_model(api, "claude-3-haiku-20240307");
    let mut usage = UsageByModel::new();

    vision.query_image("sys", "q", Some(PNG_HEADER), &mut usage).await.unwrap();

    assert_eq!(usage.len(), 1);
    assert_eq!(usage["claude-3-haiku-20240307"].total_tokens, 150);
}

#[tokio::test]
async fn test_usage_keyed_by_configured_model() {
    // The response echoes a different model id; accounting follows the adapter's model
    let api = ScriptedApi::with(vec![Ok(text_response("ok", 1, 2))]);
    let vision = ClaudeVision::with_model(api, "claude-3-5-sonnet-20241022");
    let mut usage = UsageByModel::new();
    usage.insert("other-model".to_string(), TokenUsage::new(5, 5));

    vision.query_image("sys", "q", None, &mut usage).await.unwrap();

    assert_eq!(usage["claude-3-5-sonnet-20241022"], TokenUsage::new(1, 2));
    assert_eq!(usage["other-model"], TokenUsage::new(5, 5));
}

#[tokio::test]
async fn test_absent_image_sends_text_only() {
    let api = ScriptedApi::with(vec![
        Ok(text_response("four", 3, 1)),
        Ok(text_response("four", 3, 1)),
    ]);
    let vision = ClaudeVision::new(api.clone());
    let mut usage = UsageByModel::new();

    vision.query_image("sys", "What is 2+2?", None, &mut usage).await.unwrap();
    vision.query_image("sys", "What is 2+2?", Some(&[][..]), &mut usage).await.unwrap();

    for request in api.requests() {
        let content = &request.messages[0].content;
        assert_eq!(content.len(), 1);
        assert!(matches!(&content[0], ContentBlock::Text { text } if text == "What is 2+2?"));
    }
}

#[tokio::test]
async fn test_unknown_bytes_sent_as_jpeg() {
    let api = ScriptedApi::with(vec![Ok(text_response("noise", 1, 1))]);
    let vision = ClaudeVision::new(api.clone());

    vision.query("sys", "q", Some(&b"BM\x36\x00\x00\x00"[..])).await.unwrap();

    match &api.requests()[0].messages[0].content[0] {
        ContentBlock::Image {
            source: ImageSource::Base64 { media_type, .. },
        } => assert_eq!(*media_type, MediaType::Jpeg),
        other => panic!("expected image block, got {:?}", other),
    }
}

#[tokio::test]
async fn test_query_returns_usage_delta() {
    let api = ScriptedApi::with(vec![Ok(text_response("hi", 11, 4))]);
    let vision = ClaudeVision::new(api);

    let reply = vision.query("sys", "q", None).await.unwrap();
    assert_eq!(reply.text, "hi");
    assert_eq!(reply.model, "claude-3-haiku-20240307");
    assert_eq!(reply.usage, TokenUsage::new(11, 4));
}

#[tokio::test]
async fn test_only_first_content_block_returned() {
    let api = ScriptedApi::with(vec![Ok(response(
        vec![ContentBlock::text("first"), ContentBlock::text("second")],
        1,
        1,
    ))]);
    let vision = ClaudeVision::new(api);

    let reply = vision.query("sys", "q", None).await.unwrap();
    assert_eq!(reply.text, "first");
}

#[tokio::test]
async fn test_api_error_propagates_and_leaves_usage_untouched() {
    let api = ScriptedApi::with(vec![Err(VisionError::TooManyRequests(
        "rate_limit_error".to_string(),
    ))]);
    let vision = ClaudeVision::new(api.clone());
    let mut usage = UsageByModel::new();

    let err = vision
        .query_image("sys", "q", Some(PNG_HEADER), &mut usage)
        .await
        .unwrap_err();

    assert!(matches!(err, VisionError::TooManyRequests(ref m) if m == "rate_limit_error"));
    assert!(usage.is_empty());
    // No retries
    assert_eq!(api.requests().len(), 1);
}

#[tokio::test]
async fn test_empty_content_reports_missing_text() {
    let api = ScriptedApi::with(vec![Ok(response(vec![], 1, 0))]);
    let vision = ClaudeVision::new(api);

    let err = vision.query("sys", "q", None).await.unwrap_err();
    assert!(matches!(err, VisionError::MissingText { .. }));
    assert_eq!(err.billed_usage(), Some(TokenUsage::new(1, 0)));
}

#[tokio::test]
async fn test_usage_recorded_when_response_has_no_text() {
    let api = ScriptedApi::with(vec![
        Ok(response(vec![], 40, 0)),
        Ok(text_response("ok", 10, 5)),
    ]);
    let vision = ClaudeVision::new(api);
    let mut usage = UsageByModel::new();

    let result = vision.query_image("sys", "q", Some(PNG_HEADER), &mut usage).await;
    assert!(result.is_err());
    assert_eq!(
        usage.get("claude-3-haiku-20240307"),
        Some(&TokenUsage {
            input_tokens: 40,
            output_tokens: 0,
            total_tokens: 40
        })
    );

    // Later calls keep adding on top of the billed-but-empty one
    vision.query_image("sys", "q", Some(PNG_HEADER), &mut usage).await.unwrap();
    assert_eq!(usage["claude-3-haiku-20240307"], TokenUsage::new(50, 5));
}

#[tokio::test]
async fn test_usage_recorded_when_first_block_is_not_text() {
    let api = ScriptedApi::with(vec![Ok(response(
        vec![
            ContentBlock::ToolUse {
                id: "toolu_01".to_string(),
                name: "lookup".to_string(),
                input: serde_json::json!({}),
            },
            ContentBlock::text("late text"),
        ],
        12,
        7,
    ))]);
    let vision = ClaudeVision::new(api);
    let mut usage = UsageByModel::new();

    let err = vision
        .query_image("sys", "q", None, &mut usage)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("tool_use"));
    assert_eq!(usage["claude-3-haiku-20240307"], TokenUsage::new(12, 7));
}

#[tokio::test]
async fn test_non_text_first_block_is_malformed() {
    let api = ScriptedApi::with(vec![Ok(response(
        vec![ContentBlock::Thinking {
            thinking: "hmm".to_string(),
            signature: None,
        }],
        1,
        1,
    ))]);
    let vision = ClaudeVision::new(api);

    let err = vision.query("sys", "q", None).await.unwrap_err();
    assert!(err.to_string().contains("thinking"));
}
