//! Assistant collaborator boundary.
//!
//! The board treats the chat assistant as an opaque message-exchange
//! service: send the transcript, receive one complete assistant turn or a
//! failure. Engine construction (model loading, worker processes) lives
//! behind [`AssistantEngine`]; this module only owns the transcript and the
//! status surfaced to the UI.

use anyhow::Result;

/// System prompt seeded into every session transcript.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

/// Engine lifecycle status observed by the UI.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum AssistantStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
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

/// Opaque completion transport.
///
/// Implementations receive the full transcript and return the next
/// assistant turn. Failures are reported, never panicked.
pub trait AssistantEngine {
    fn complete(&mut self, transcript: &[Message]) -> Result<Message>;
}

/// Owns one chat session: transcript, engine slot, and UI-facing status.
///
/// Engine creation is asynchronous and may outlive the session; a result
/// arriving after [`dispose`] is discarded instead of installed.
///
/// [`dispose`]: AssistantSession::dispose
#[derive(Debug)]
pub struct AssistantSession<E> {
    engine: Option<E>,
    status: AssistantStatus,
    error_message: Option<String>,
    busy: bool,
    disposed: bool,
    messages: Vec<Message>,
}

impl<E: AssistantEngine> AssistantSession<E> {
    pub fn new() -> Self {
        Self {
            engine: None,
            status: AssistantStatus::Idle,
            error_message: None,
            busy: false,
            disposed: false,
            messages: vec![Message::system(SYSTEM_PROMPT)],
        }
    }

    pub fn status(&self) -> AssistantStatus {
        self.status
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Inline error surfaced to the UI, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Marks engine creation as in flight.
    pub fn begin_loading(&mut self) {
        if self.disposed {
            return;
        }
        self.status = AssistantStatus::Loading;
        self.error_message = None;
    }

    /// Installs the outcome of engine creation.
    ///
    /// A result resolving after the session was disposed is dropped on the
    /// floor; the in-flight work is never interrupted, only discarded.
    pub fn attach(&mut self, engine: Result<E>) {
        if self.disposed {
            return;
        }

        match engine {
            Ok(engine) => {
                self.engine = Some(engine);
                self.status = AssistantStatus::Ready;
            }
            Err(err) => {
                log::error!("assistant engine initialization failed: {err:#}");
                self.status = AssistantStatus::Error;
                self.error_message = Some("Failed to initialize assistant engine.".to_string());
            }
        }
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
        self.engine = None;
    }

    /// Sends one user turn and appends the assistant's reply.
    ///
    /// Empty input and sends while the engine is not ready are ignored. A
    /// completion failure is logged and surfaced inline; the user turn stays
    /// in the transcript.
    pub fn send(&mut self, raw_input: &str) -> bool {
        let input = raw_input.trim();
        if input.is_empty() {
            return false;
        }
        if self.status != AssistantStatus::Ready {
            return false;
        }
        let Some(engine) = self.engine.as_mut() else {
            return false;
        };

        self.busy = true;
        self.messages.push(Message::user(input));

        match engine.complete(&self.messages) {
            Ok(reply) => {
                self.messages.push(reply);
                self.error_message = None;
            }
            Err(err) => {
                log::error!("assistant request failed: {err:#}");
                self.error_message = Some("Assistant request failed.".to_string());
            }
        }

        self.busy = false;
        true
    }
}

impl<E: AssistantEngine> Default for AssistantSession<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct EchoEngine;

    impl AssistantEngine for EchoEngine {
        fn complete(&mut self, transcript: &[Message]) -> Result<Message> {
            let last = transcript.last().unwrap();
            Ok(Message::assistant(format!("echo: {}", last.content)))
        }
    }

    struct FailingEngine;

    impl AssistantEngine for FailingEngine {
        fn complete(&mut self, _transcript: &[Message]) -> Result<Message> {
            Err(anyhow!("transport down"))
        }
    }

    fn ready_session() -> AssistantSession<EchoEngine> {
        let mut session = AssistantSession::new();
        session.begin_loading();
        session.attach(Ok(EchoEngine));
        session
    }

    #[test]
    fn transcript_starts_with_the_system_prompt() {
        let session = AssistantSession::<EchoEngine>::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::System);
        assert_eq!(session.status(), AssistantStatus::Idle);
    }

    #[test]
    fn send_appends_user_turn_and_reply() {
        let mut session = ready_session();

        assert!(session.send("  hello board  "));

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], Message::user("hello board"));
        assert_eq!(messages[2], Message::assistant("echo: hello board"));
        assert!(!session.is_busy());
    }

    #[test]
    fn empty_input_is_ignored() {
        let mut session = ready_session();
        assert!(!session.send("   "));
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn send_before_ready_is_ignored() {
        let mut session = AssistantSession::<EchoEngine>::new();
        session.begin_loading();

        assert!(!session.send("hello"));
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn failed_engine_creation_surfaces_an_error() {
        let mut session = AssistantSession::<EchoEngine>::new();
        session.begin_loading();
        session.attach(Err(anyhow!("no weights")));

        assert_eq!(session.status(), AssistantStatus::Error);
        assert!(session.error_message().is_some());
    }

    #[test]
    fn completion_failure_keeps_the_user_turn_and_reports_inline() {
        let mut session = AssistantSession::<FailingEngine>::new();
        session.begin_loading();
        session.attach(Ok(FailingEngine));

        assert!(session.send("hello"));

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].role, Role::User);
        assert_eq!(session.error_message(), Some("Assistant request failed."));
        assert_eq!(session.status(), AssistantStatus::Ready);
    }

    #[test]
    fn engine_resolving_after_dispose_is_discarded() {
        let mut session = AssistantSession::<EchoEngine>::new();
        session.begin_loading();
        session.dispose();
        session.attach(Ok(EchoEngine));

        assert_eq!(session.status(), AssistantStatus::Loading);
        assert!(!session.send("hello"));
    }
}
