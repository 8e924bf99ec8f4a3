//! Calls to tools the session does not have
//!
//! A hallucinated tool name never ends a generation. The call is answered
//! with an error tool result so the model can correct itself on the next
//! iteration.

use kiln_llm::{Message, ToolCall};
use tracing::warn;

/// Tool-result message answering a call to an unregistered tool
#[must_use]
pub fn missing_tool_response(call: &ToolCall) -> Message {
    warn!(tool = %call.name, call_id = %call.id, "Model called a tool that does not exist");
    Message::tool_response(
        call.id.clone(),
        format!("Error: there is no tool called {}", call.name),
    )
    .with_name(call.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_llm::MessageRole;

    #[test]
    fn test_missing_tool_response_names_the_tool() {
        let call = ToolCall {
            id: "call_7".to_string(),
            name: "run_shell".to_string(),
            arguments: "{}".to_string(),
        };
        let msg = missing_tool_response(&call);
        assert_eq!(msg.role, MessageRole::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_7"));
        assert_eq!(msg.name.as_deref(), Some("run_shell"));
        assert_eq!(msg.content, "Error: there is no tool called run_shell");
    }
}
