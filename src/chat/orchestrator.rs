//! Turn orchestrator: one user message in, one final answer out
//!
//! Owns the transcript mutation protocol and the two-pass tool-call
//! exchange with the model. Everything the model asks to run goes through
//! the tool registry; every result is folded back into the transcript
//! before the model is asked for its final answer.

use super::gate::{KeywordGate, ToolGate};
use super::transcript::Transcript;
use crate::llm::{ChatMessage, LlmError, ModelClient};
use crate::tools::ToolRegistry;
use std::sync::Arc;

/// Tool-call rounds serviced per turn. A model that requests more calls in
/// its follow-up response is answered from what it already has.
const MAX_TOOL_ROUNDS: usize = 1;

const SYSTEM_PROMPT: &str = "You are a helpful assistant. When you have access to tools, \
use them to provide accurate, current information.";

/// Drives one conversation. Each connection owns its own orchestrator and
/// therefore its own transcript; turns run strictly in sequence through
/// `&mut self`.
pub struct Orchestrator<C> {
    client: C,
    tools: Arc<ToolRegistry>,
    gate: Box<dyn ToolGate>,
    transcript: Transcript,
}

impl<C: ModelClient> Orchestrator<C> {
    pub fn new(client: C, tools: Arc<ToolRegistry>) -> Self {
        Self {
            client,
            tools,
            gate: Box::new(KeywordGate),
            transcript: Transcript::new(),
        }
    }

    /// Swap the gating strategy.
    #[allow(dead_code)] // Seam for broader classifiers
    pub fn with_gate(mut self, gate: Box<dyn ToolGate>) -> Self {
        self.gate = gate;
        self
    }

    #[allow(dead_code)] // Useful for tests
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Run one turn.
    ///
    /// On a model failure during the first call the transcript keeps only
    /// the user message; a failure after tool dispatch keeps the partial
    /// state (assistant tool-call message and tool results) in place.
    pub async fn handle(&mut self, user_text: &str) -> Result<String, LlmError> {
        self.transcript.bootstrap(SYSTEM_PROMPT);
        self.transcript.push(ChatMessage::user(user_text));

        let needs_tools = self.gate.needs_tools(user_text);
        tracing::debug!(needs_tools, "prompt analysis");

        let advertised = if needs_tools {
            self.tools.definitions()
        } else {
            Vec::new()
        };

        let mut reply = self
            .client
            .chat(self.transcript.messages(), &advertised)
            .await?;

        let mut rounds = 0;
        while !reply.tool_calls.is_empty() && rounds < MAX_TOOL_ROUNDS {
            rounds += 1;
            tracing::debug!(calls = reply.tool_calls.len(), "processing tool calls");

            let calls = reply.tool_calls.clone();
            self.transcript
                .push(ChatMessage::assistant_with_calls(reply.content, calls.clone()));

            for call in &calls {
                let name = &call.function.name;
                tracing::debug!(tool = %name, args = ?call.function.arguments, "dispatching tool");
                let result = self.tools.dispatch(name, &call.function.arguments).await;
                self.transcript.push(ChatMessage::tool(name, result));
            }

            let definitions = self.tools.definitions();
            reply = self
                .client
                .chat(self.transcript.messages(), &definitions)
                .await?;
        }

        if !reply.tool_calls.is_empty() {
            tracing::warn!(
                calls = reply.tool_calls.len(),
                "tool round budget exhausted, answering without further calls"
            );
        }

        let answer = reply.content;
        self.transcript.push(ChatMessage::assistant(answer.clone()));
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Role, ToolCall, ToolDefinition};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Scripted client: pops queued replies, records what it was sent.
    struct MockClient {
        replies: Mutex<VecDeque<Result<ChatMessage, LlmError>>>,
        /// (message count, advertised tool count) per request
        requests: Mutex<Vec<(usize, usize)>>,
    }

    impl MockClient {
        fn new() -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn queue(&self, reply: ChatMessage) {
            self.replies.lock().unwrap().push_back(Ok(reply));
        }

        fn queue_error(&self, error: LlmError) {
            self.replies.lock().unwrap().push_back(Err(error));
        }

        fn recorded(&self) -> Vec<(usize, usize)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelClient for MockClient {
        async fn chat(
            &self,
            messages: &[ChatMessage],
            tools: &[ToolDefinition],
        ) -> Result<ChatMessage, LlmError> {
            self.requests
                .lock()
                .unwrap()
                .push((messages.len(), tools.len()));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::network("no scripted reply")))
        }

        fn model_id(&self) -> &str {
            "mock"
        }
    }

    fn orchestrator(client: Arc<MockClient>) -> Orchestrator<Arc<MockClient>> {
        Orchestrator::new(client, Arc::new(ToolRegistry::new()))
    }

    fn weather_call(location: &str) -> ToolCall {
        let mut args = serde_json::Map::new();
        args.insert("location".to_string(), json!(location));
        ToolCall::new("get_weather", args)
    }

    #[tokio::test]
    async fn plain_turn_appends_user_and_assistant() {
        let client = Arc::new(MockClient::new());
        client.queue(ChatMessage::assistant("here's a joke"));
        let mut orch = orchestrator(client.clone());

        let answer = orch.handle("tell me a joke").await.unwrap();

        assert_eq!(answer, "here's a joke");
        assert_eq!(
            orch.transcript().roles(),
            vec![Role::System, Role::User, Role::Assistant]
        );
        // one model call, no tools advertised
        assert_eq!(client.recorded(), vec![(2, 0)]);
    }

    #[tokio::test]
    async fn system_message_inserted_exactly_once() {
        let client = Arc::new(MockClient::new());
        client.queue(ChatMessage::assistant("one"));
        client.queue(ChatMessage::assistant("two"));
        let mut orch = orchestrator(client);

        orch.handle("first").await.unwrap();
        orch.handle("second").await.unwrap();

        let roles = orch.transcript().roles();
        assert_eq!(roles[0], Role::System);
        assert_eq!(roles.iter().filter(|r| **r == Role::System).count(), 1);
    }

    #[tokio::test]
    async fn gated_prompt_advertises_tools() {
        let client = Arc::new(MockClient::new());
        client.queue(ChatMessage::assistant("sunny, probably"));
        let mut orch = orchestrator(client.clone());

        orch.handle("what's the weather in Paris?").await.unwrap();

        let recorded = client.recorded();
        assert_eq!(recorded.len(), 1);
        assert!(recorded[0].1 > 0, "tools should be advertised");
    }

    #[tokio::test]
    async fn tool_round_folds_results_and_asks_again() {
        let client = Arc::new(MockClient::new());
        client.queue(ChatMessage::assistant_with_calls(
            "",
            vec![weather_call("Paris"), weather_call("Oslo")],
        ));
        client.queue(ChatMessage::assistant("cloudy in both"));
        let mut orch = orchestrator(client.clone());

        let answer = orch.handle("weather in Paris and Oslo today").await.unwrap();

        assert_eq!(answer, "cloudy in both");
        // user + assistant-with-calls + 2 tool results + final assistant
        assert_eq!(
            orch.transcript().roles(),
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::Tool,
                Role::Tool,
                Role::Assistant,
            ]
        );

        // results kept call order
        let messages = orch.transcript().messages();
        assert!(messages[3].content.contains("Paris"));
        assert!(messages[4].content.contains("Oslo"));
        assert_eq!(messages[3].tool_name.as_deref(), Some("get_weather"));

        // two model calls; the second saw the extended transcript with tools
        let recorded = client.recorded();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1].0, 5);
        assert!(recorded[1].1 > 0);
    }

    #[tokio::test]
    async fn unknown_tool_becomes_text_result() {
        let client = Arc::new(MockClient::new());
        client.queue(ChatMessage::assistant_with_calls(
            "",
            vec![ToolCall::new("get_stock_price", serde_json::Map::new())],
        ));
        client.queue(ChatMessage::assistant("couldn't look that up"));
        let mut orch = orchestrator(client);

        let answer = orch.handle("current stock price of ACME").await.unwrap();

        assert_eq!(answer, "couldn't look that up");
        let messages = orch.transcript().messages();
        let tool_msg = messages.iter().find(|m| m.role == Role::Tool).unwrap();
        assert_eq!(tool_msg.content, "Unknown tool: get_stock_price");
    }

    #[tokio::test]
    async fn first_call_failure_keeps_only_user_message() {
        let client = Arc::new(MockClient::new());
        client.queue_error(LlmError::network("connection refused"));
        let mut orch = orchestrator(client);

        let err = orch.handle("hello there").await.unwrap_err();

        assert!(err.message.contains("connection refused"));
        assert_eq!(orch.transcript().roles(), vec![Role::System, Role::User]);
    }

    #[tokio::test]
    async fn second_call_failure_retains_partial_state() {
        let client = Arc::new(MockClient::new());
        client.queue(ChatMessage::assistant_with_calls(
            "",
            vec![weather_call("Paris")],
        ));
        client.queue_error(LlmError::network("connection reset"));
        let mut orch = orchestrator(client);

        orch.handle("weather in Paris now").await.unwrap_err();

        // assistant-with-calls and the tool result stay in the transcript
        assert_eq!(
            orch.transcript().roles(),
            vec![Role::System, Role::User, Role::Assistant, Role::Tool]
        );
    }

    #[tokio::test]
    async fn second_round_of_tool_calls_is_not_dispatched() {
        let client = Arc::new(MockClient::new());
        client.queue(ChatMessage::assistant_with_calls(
            "",
            vec![weather_call("Paris")],
        ));
        client.queue(ChatMessage::assistant_with_calls(
            "let me check once more",
            vec![weather_call("Oslo")],
        ));
        let mut orch = orchestrator(client.clone());

        let answer = orch.handle("weather in Paris today").await.unwrap();

        // the follow-up request is answered from its content, not serviced
        assert_eq!(answer, "let me check once more");
        assert_eq!(client.recorded().len(), 2);
        let tool_results = orch
            .transcript()
            .messages()
            .iter()
            .filter(|m| m.role == Role::Tool)
            .count();
        assert_eq!(tool_results, 1);
    }
}
