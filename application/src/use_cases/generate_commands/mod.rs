//! GenerateCommands use case: the tool-calling conversation loop.
//!
//! ```text
//! Init ──▶ AwaitingModelTurn ──▶ InterpretingTurn ──▶ ExecutingTools ─┐
//!                 ▲                     │                             │
//!                 └─────────────────────┼─────────────────────────────┘
//!                                       ▼
//!                                  Terminated
//! ```
//!
//! Each turn sends the whole history plus the single `generateCurlCommands`
//! tool. Every honored tool call runs its commands in order and answers with
//! one aggregated tool result before the provider is invoked again, so the
//! conversation never advances on partial results.
//!
//! Protocol differences handled here:
//!
//! | | OpenAI-style | Anthropic-style |
//! |---|---|---|
//! | tool calls honored | only when `finish_reason == "tool_calls"` | every `tool_use` block |
//! | natural stop | `stop` | `end_turn` |
//!
//! Encoding of tool results per protocol is the adapters' job.

mod types;

pub use types::{GenerateCommandsInput, GenerateCommandsOutput, RunError, Termination};

use crate::config::RunParams;
use crate::ports::command_runner::CommandRunner;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmProvider};
use crate::ports::progress::{NoProgress, RunProgressNotifier};
use crate::registry::{ProviderRegistry, ResolvedModel};
use crate::use_cases::execute_command::CommandExecutor;
use crate::use_cases::shared::check_cancelled;
use backon::{ExponentialBuilder, Retryable};
use curlgen_domain::{
    CommandBatch, DomainError, LlmResponse, Message, PROPOSE_COMMANDS_TOOL, ProviderKind, RunLedger,
    StopReason, inline_tool_instruction, propose_commands_tool,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Prefix of the aggregated tool result sent back after a batch ran.
const RESULTS_PREFIX: &str = "We were able to run the curls with following response: ";

/// Use case for generating, running, and refining curl commands
pub struct GenerateCommandsUseCase {
    registry: Arc<ProviderRegistry>,
    runner: Arc<dyn CommandRunner>,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl GenerateCommandsUseCase {
    pub fn new(registry: Arc<ProviderRegistry>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            registry,
            runner,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: GenerateCommandsInput,
        ledger: &mut RunLedger,
    ) -> Result<GenerateCommandsOutput, RunError> {
        self.execute_with_progress(input, ledger, &NoProgress).await
    }

    /// Execute the use case with progress callbacks.
    ///
    /// Outcomes are appended to `ledger` as they happen, so on error the
    /// ledger still holds everything recorded before the failure.
    pub async fn execute_with_progress(
        &self,
        input: GenerateCommandsInput,
        ledger: &mut RunLedger,
        progress: &dyn RunProgressNotifier,
    ) -> Result<GenerateCommandsOutput, RunError> {
        let ResolvedModel { model, provider } = self.registry.resolve(&input.model).await?;
        info!(
            "Starting run with {} via {} provider",
            model.canonical_id(),
            model.kind()
        );

        let tool = propose_commands_tool();
        let (first_turn, tools) = if model.rejects_tool_declarations() {
            debug!("{} rejects tool declarations, inlining the schema", model.canonical_id());
            (inline_tool_instruction(&input.prompt, &tool), Vec::new())
        } else {
            (input.prompt.clone(), vec![tool])
        };
        let mut history = vec![Message::user(first_turn)];

        let executor = CommandExecutor::new(self.runner.clone(), input.target.clone())
            .with_dry_run(!input.params.execute_commands)
            .with_timeout(input.params.command_timeout);

        let mut final_text = String::new();
        for turn in 1..=input.params.max_turns {
            check_cancelled(&self.cancellation_token)?;
            progress.on_turn_start(turn);

            let request = CompletionRequest {
                model: model.canonical_id(),
                messages: &history,
                tools: &tools,
            };
            self.conversation_logger.log(ConversationEvent::new(
                "llm_request",
                json!({
                    "turn": turn,
                    "model": model.canonical_id(),
                    "messages": history.len(),
                    "tools": tools.len(),
                }),
            ));
            let response = self
                .invoke(provider.as_ref(), &request, &input.params, progress)
                .await
                .map_err(|source| match source {
                    InvokeError::Cancelled => RunError::Cancelled,
                    InvokeError::Gateway(source) => RunError::ProviderInvocation {
                        model: model.canonical_id().to_string(),
                        source,
                    },
                })?;
            progress.on_turn_end(turn);
            self.log_response(turn, &response);

            let text = response.text_content();
            if !text.is_empty() {
                progress.on_assistant_text(&text);
                final_text = text;
            }

            let calls = honored_tool_calls(provider.kind(), &response);
            history.push(Message::assistant(response.content.clone()));

            if calls.is_empty() {
                let termination = if response.stop_reason == Some(StopReason::EndTurn) {
                    Termination::Completed
                } else {
                    Termination::FinalAnswer
                };
                info!(
                    "Run finished after {} turn(s): {}",
                    turn,
                    termination.as_str()
                );
                progress.on_finished(termination);
                self.log_finished(turn, termination, ledger);
                return Ok(GenerateCommandsOutput {
                    termination,
                    turns: turn,
                    final_text,
                    model_id: model.canonical_id().to_string(),
                });
            }

            for (id, name, arguments) in calls {
                let reply = self
                    .handle_tool_call(&id, &name, &arguments, &executor, ledger, progress)
                    .await?;
                history.push(reply);
            }
        }

        let max_turns = input.params.max_turns;
        warn!(
            "Stopping after {} turns; the model was still proposing commands",
            max_turns
        );
        progress.on_turn_limit(max_turns);
        self.log_finished(max_turns, Termination::TurnLimit, ledger);
        Ok(GenerateCommandsOutput {
            termination: Termination::TurnLimit,
            turns: max_turns,
            final_text,
            model_id: model.canonical_id().to_string(),
        })
    }

    /// Invoke the provider with the configured deadline and retry policy,
    /// racing the cancellation token.
    async fn invoke(
        &self,
        provider: &dyn LlmProvider,
        request: &CompletionRequest<'_>,
        params: &RunParams,
        progress: &dyn RunProgressNotifier,
    ) -> Result<LlmResponse, InvokeError> {
        let timeout = params.provider_timeout;
        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(500))
            .with_max_delay(Duration::from_secs(8))
            .with_max_times(params.max_retries);

        let mut attempt = 0;
        let call = (|| async move { complete_with_deadline(provider, request, timeout).await })
            .retry(backoff)
            .when(GatewayError::is_transient)
            .notify(|err: &GatewayError, delay: Duration| {
                attempt += 1;
                warn!(
                    "Provider call failed ({}), retry {} in {:?}",
                    err, attempt, delay
                );
                progress.on_retry(attempt, &err.to_string());
            });

        match &self.cancellation_token {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(InvokeError::Cancelled),
                result = call => result.map_err(InvokeError::Gateway),
            },
            None => call.await.map_err(InvokeError::Gateway),
        }
    }

    /// Answer one tool call: run its commands, or explain why it was not honored.
    async fn handle_tool_call(
        &self,
        id: &str,
        name: &str,
        arguments: &serde_json::Value,
        executor: &CommandExecutor,
        ledger: &mut RunLedger,
        progress: &dyn RunProgressNotifier,
    ) -> Result<Message, RunError> {
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call",
            json!({ "id": id, "name": name, "input": arguments }),
        ));

        if name != PROPOSE_COMMANDS_TOOL {
            let reason = DomainError::UnknownTool(name.to_string()).to_string();
            return Ok(self.skip_tool_call(id, reason, progress));
        }

        let batch = match CommandBatch::from_arguments(arguments) {
            Ok(batch) => batch,
            Err(e) => {
                let reason = format!("Error parsing curl commands: {}", e);
                return Ok(self.skip_tool_call(id, reason, progress));
            }
        };

        info!("Running {} proposed command(s)", batch.len());
        let mut lines = Vec::with_capacity(batch.len());
        for proposed in &batch.commands {
            check_cancelled(&self.cancellation_token)?;
            let outcome = executor.execute(proposed, progress).await;
            ledger.record(&outcome);
            progress.on_command_complete(&outcome);
            self.conversation_logger.log(ConversationEvent::new(
                "command_outcome",
                json!({
                    "tool_use_id": id,
                    "command": proposed.command,
                    "expected_success": proposed.expected_success,
                    "met_expectation": outcome.met_expectation(),
                    "summary": outcome.summary_line(),
                }),
            ));
            lines.push(outcome.summary_line());
        }

        Ok(Message::tool_result(
            id,
            format!("{}{}", RESULTS_PREFIX, lines.join("\n")),
        ))
    }

    fn skip_tool_call(
        &self,
        id: &str,
        reason: String,
        progress: &dyn RunProgressNotifier,
    ) -> Message {
        warn!("Skipping tool call {}: {}", id, reason);
        progress.on_tool_call_skipped(id, &reason);
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call_skipped",
            json!({ "id": id, "reason": reason }),
        ));
        Message::tool_error(id, reason)
    }

    fn log_response(&self, turn: usize, response: &LlmResponse) {
        self.conversation_logger.log(ConversationEvent::new(
            "llm_response",
            json!({
                "turn": turn,
                "model": response.model,
                "stop_reason": response.stop_reason.as_ref().map(|r| r.to_string()),
                "text": response.text_content(),
                "tool_calls": response.tool_uses().len(),
            }),
        ));
    }

    fn log_finished(&self, turns: usize, termination: Termination, ledger: &RunLedger) {
        self.conversation_logger.log(ConversationEvent::new(
            "run_finished",
            json!({
                "turns": turns,
                "termination": termination.as_str(),
                "successful": ledger.successful().len(),
                "failed": ledger.failed().len(),
            }),
        ));
    }
}

enum InvokeError {
    Cancelled,
    Gateway(GatewayError),
}

async fn complete_with_deadline(
    provider: &dyn LlmProvider,
    request: &CompletionRequest<'_>,
    timeout: Option<Duration>,
) -> Result<LlmResponse, GatewayError> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, provider.complete(request))
            .await
            .map_err(|_| GatewayError::Timeout)?,
        None => provider.complete(request).await,
    }
}

/// Tool calls the driver acts on for this turn, as owned `(id, name, arguments)`.
fn honored_tool_calls(
    kind: ProviderKind,
    response: &LlmResponse,
) -> Vec<(String, String, serde_json::Value)> {
    if kind == ProviderKind::OpenAiStyle && !response.stopped_for_tools() {
        if response.has_tool_calls() {
            debug!(
                "Ignoring tool calls under finish reason {:?}",
                response.stop_reason
            );
        }
        return Vec::new();
    }
    response
        .tool_uses()
        .into_iter()
        .map(|(id, name, input)| (id.to_string(), name.to_string(), input.clone()))
        .collect()
}
