//! Tool-driven project generation

use super::session::GenerationSession;
use crate::codegen_type::CodeGenType;
use crate::error::{Error, Result};
use crate::routing::missing_tool_response;
use kiln_llm::{Message, ToolCompletionRequest};
use kiln_memory::ConversationTurn;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

/// Progress of a project generation
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectEvent {
    /// A model call is about to be made
    Iteration {
        /// 1-based call number
        n: usize,
    },
    /// The model asked for a registered tool
    ToolCall {
        /// Tool name
        name: String,
        /// Raw JSON arguments
        arguments: String,
    },
    /// A tool finished
    ToolResult {
        /// Tool name
        name: String,
        /// Whether it succeeded
        success: bool,
        /// Content fed back to the model
        content: String,
    },
    /// The model asked for a tool that does not exist
    UnknownTool {
        /// Requested name
        name: String,
    },
    /// The model stopped calling tools
    Completed {
        /// Final reply
        summary: String,
    },
}

/// What a project generation produced
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOutcome {
    /// Project root
    pub dir: PathBuf,
    /// Resolved paths of the files written, in first-write order
    pub files: Vec<PathBuf>,
    /// Final reply of the model
    pub summary: String,
    /// Model calls made
    pub iterations: usize,
}

impl GenerationSession {
    /// Run the tool loop until the model replies without tool calls.
    ///
    /// Tool traffic stays in a local transcript; the conversation window only
    /// gains the user prompt and, on success, the final summary.
    #[instrument(skip(self, user_message, events), fields(key = %self.key, session_id = %self.id))]
    pub async fn generate_project(
        &self,
        user_message: &str,
        events: Option<&UnboundedSender<ProjectEvent>>,
    ) -> Result<ProjectOutcome> {
        if self.key.code_gen_type != CodeGenType::VueProject {
            return Err(Error::UnsupportedGenerationType(format!(
                "{} requested from a {} session",
                CodeGenType::VueProject,
                self.key.code_gen_type
            )));
        }

        let emit = |event: ProjectEvent| {
            if let Some(tx) = events {
                let _ = tx.send(event);
            }
        };

        let mut memory = self.memory.lock().await;
        self.bridge
            .append_turn(&mut memory, ConversationTurn::now(Message::user(user_message)));

        let tools = self.tools.definitions();
        let mut transcript = memory.messages();
        let mut files: Vec<PathBuf> = Vec::new();

        for n in 1..=self.max_tool_iterations {
            emit(ProjectEvent::Iteration { n });
            let request =
                ToolCompletionRequest::new(self.request_with(transcript.clone()), tools.clone());
            let response = self.provider.complete_with_tools(request).await?;

            if !response.has_tool_calls() {
                let summary = project_summary(response.content, files.len());
                self.bridge.append_turn(
                    &mut memory,
                    ConversationTurn::now(Message::assistant(summary.clone())),
                );
                info!(iterations = n, files = files.len(), "Project generation completed");
                emit(ProjectEvent::Completed {
                    summary: summary.clone(),
                });
                return Ok(ProjectOutcome {
                    dir: self.project_dir.clone(),
                    files,
                    summary,
                    iterations: n,
                });
            }

            transcript.push(Message::assistant_with_tool_calls(
                response.content.unwrap_or_default(),
                response.tool_calls.clone(),
            ));

            for call in response.tool_calls {
                if !self.tools.has(&call.name) {
                    emit(ProjectEvent::UnknownTool {
                        name: call.name.clone(),
                    });
                    transcript.push(missing_tool_response(&call));
                    continue;
                }

                emit(ProjectEvent::ToolCall {
                    name: call.name.clone(),
                    arguments: call.arguments.clone(),
                });

                let (success, content) = match self.tools.dispatch(&call).await {
                    Ok(output) => {
                        for path in output.written {
                            if !files.contains(&path) {
                                files.push(path);
                            }
                        }
                        (true, output.report.to_string())
                    }
                    Err(e) => {
                        warn!(tool = %call.name, error = %e, "Tool call failed");
                        (false, format!("Error: {e}"))
                    }
                };
                debug!(tool = %call.name, success, "Tool call finished");

                emit(ProjectEvent::ToolResult {
                    name: call.name.clone(),
                    success,
                    content: content.clone(),
                });
                transcript.push(Message::tool_response(call.id, content).with_name(call.name));
            }
        }

        warn!(
            max = self.max_tool_iterations,
            files = files.len(),
            "Project generation hit the iteration limit"
        );
        Err(Error::ToolLoopExhausted(self.max_tool_iterations))
    }
}

/// Final reply of the model, or a stand-in when it said nothing.
///
/// The window and the history log both keep this text.
fn project_summary(content: Option<String>, files: usize) -> String {
    match content {
        Some(text) if !text.trim().is_empty() => text,
        _ => format!("Generated project ({files} files written)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_summary_fills_blank_reply() {
        assert_eq!(project_summary(Some("Done.".to_string()), 2), "Done.");
        assert_eq!(
            project_summary(Some("  ".to_string()), 3),
            "Generated project (3 files written)"
        );
        assert_eq!(project_summary(None, 0), "Generated project (0 files written)");
    }
}
