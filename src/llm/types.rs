use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Model families that accept the `think` flag.
pub const REASONING_MODEL_PREFIX: &str = "deepseek-r1";

/// Content suffix the server leaves on cut-off generations.
pub const TRUNCATION_MARKER: &str = "...";

pub fn is_reasoning_model(model: &str) -> bool {
    model.starts_with(REASONING_MODEL_PREFIX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered messages, sent to the server exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation(Vec<Message>);

impl Conversation {
    pub fn new(messages: Vec<Message>) -> Self {
        Self(messages)
    }

    /// Wraps a `(system_message, user_prompt)` pair produced by a prompt builder.
    pub fn from_prompt(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self(vec![Message::system(system), Message::user(user)])
    }

    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self(messages)
    }
}

/// Which default model a call falls back to when no override is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Code,
    NonCode,
}

impl TaskKind {
    pub fn from_code_flag(is_code_task: bool) -> Self {
        if is_code_task { Self::Code } else { Self::NonCode }
    }
}

/// JSON schema forwarded to the server as a generation constraint.
///
/// The client never inspects it; responses are only checked for being valid JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSchema(Value);

impl OutputSchema {
    pub fn new(schema: Value) -> Self {
        Self(schema)
    }

    /// Parses a pre-rendered schema document.
    pub fn from_json_str(document: &str) -> serde_json::Result<Self> {
        serde_json::from_str(document).map(Self)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for OutputSchema {
    fn from(schema: Value) -> Self {
        Self(schema)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelOptions {
    pub num_ctx: u32,
}

/// Request body for the chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatPayload {
    pub model: String,
    pub messages: Vec<Message>,
    pub stream: bool,
    pub options: ModelOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub think: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputSchema>,
}

impl ChatPayload {
    pub fn new(
        model: impl Into<String>,
        conversation: &Conversation,
        schema: Option<&OutputSchema>,
        num_ctx: u32,
    ) -> Self {
        let model = model.into();
        let think = is_reasoning_model(&model).then_some(true);

        Self {
            model,
            messages: conversation.messages().to_vec(),
            stream: false,
            options: ModelOptions { num_ctx },
            think,
            format: schema.cloned(),
        }
    }

    pub fn is_structured(&self) -> bool {
        self.format.is_some()
    }
}

/// Pulls `message.content` out of a response body; any other shape is empty.
pub fn extract_content(body: &Value) -> String {
    body.pointer("/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
