//! Form controller: the four inputs and the request state machine.
//!
//! `Idle -> Loading -> {Success, Failure}`, and any settled state may be
//! submitted again. Each accepted submission gets a fresh request id; only
//! the completion for the latest in-flight id is applied.

use crate::agent::{AgentError, SuggestionClient};
use crate::suggestion::ConversationSuggestion;
use tracing::{debug, info, warn};

/// Shown when a field is left empty.
pub const INCOMPLETE_MESSAGE: &str = "Vui lòng điền đầy đủ tất cả các trường thông tin.";
/// Prefix for every generation failure.
pub const GENERATION_ERROR_PREFIX: &str = "Không thể tạo gợi ý. Vui lòng thử lại. Lỗi: ";
/// Used when a generation failure carries no text.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Không thể tạo gợi ý. Một lỗi không xác định đã xảy ra.";

/// The four free-text inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInputs {
    pub speaker_info: String,
    pub audience_info: String,
    pub context: String,
    pub goal: String,
}

impl FormInputs {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::SpeakerInfo => self.speaker_info.as_str(),
            Field::AudienceInfo => self.audience_info.as_str(),
            Field::Context => self.context.as_str(),
            Field::Goal => self.goal.as_str(),
        }
    }

    fn slot(&mut self, field: Field) -> &mut String {
        match field {
            Field::SpeakerInfo => &mut self.speaker_info,
            Field::AudienceInfo => &mut self.audience_info,
            Field::Context => &mut self.context,
            Field::Goal => &mut self.goal,
        }
    }

    /// Whitespace counts as content; only the empty string is rejected.
    pub fn is_complete(&self) -> bool {
        Field::ALL.iter().all(|&field| !self.get(field).is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    SpeakerInfo,
    AudienceInfo,
    Context,
    Goal,
}

impl Field {
    /// Form order
    pub const ALL: [Field; 4] = [
        Field::SpeakerInfo,
        Field::AudienceInfo,
        Field::Context,
        Field::Goal,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::SpeakerInfo => "Bạn là ai?",
            Field::AudienceInfo => "Bạn đang nói chuyện với ai?",
            Field::Context => "Bối cảnh cuộc trò chuyện?",
            Field::Goal => "Mục đích của bạn là gì?",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::SpeakerInfo => "VD: Một sinh viên IT năm cuối, tính cách hướng nội...",
            Field::AudienceInfo => {
                "VD: Một nhà tuyển dụng tại ngày hội việc làm, trông khá thân thiện..."
            }
            Field::Context => "VD: Tại một sự kiện networking công nghệ, không khí khá ồn ào...",
            Field::Goal => "VD: Gây ấn tượng và hỏi về cơ hội thực tập tại công ty của họ...",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(ConversationSuggestion),
    Failure(String),
}

impl RequestState {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn suggestion(&self) -> Option<&ConversationSuggestion> {
        match self {
            RequestState::Success(suggestion) => Some(suggestion),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RequestState::Failure(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// A submission accepted by [`FormController::submit`], waiting for its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: u64,
    pub inputs: FormInputs,
}

/// Owns the inputs and the request state
#[derive(Debug, Default)]
pub struct FormController {
    inputs: FormInputs,
    state: RequestState,
    last_request_id: u64,
    in_flight: Option<u64>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inputs(&self) -> &FormInputs {
        &self.inputs
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Overwrite one input. No validation happens here.
    pub fn update_field(&mut self, field: Field, value: impl Into<String>) {
        *self.inputs.slot(field) = value.into();
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        self.inputs.is_complete() && !self.state.is_loading()
    }

    /// Validate and move to `Loading`.
    ///
    /// Returns `None` (and sets the completeness failure) when any field is
    /// empty; no request must be issued in that case.
    pub fn submit(&mut self) -> Option<PendingRequest> {
        if !self.inputs.is_complete() {
            debug!("submission rejected: incomplete form");
            self.state = RequestState::Failure(INCOMPLETE_MESSAGE.to_string());
            return None;
        }

        self.last_request_id += 1;
        let id = self.last_request_id;
        if let Some(previous) = self.in_flight.replace(id) {
            debug!(previous, id, "superseding in-flight request");
        }
        self.state = RequestState::Loading;
        info!(id, "request issued");

        Some(PendingRequest {
            id,
            inputs: self.inputs.clone(),
        })
    }

    /// Apply the outcome of request `id`.
    ///
    /// Returns `false` when the outcome was discarded because a newer
    /// submission superseded it or it was already applied.
    pub fn complete(
        &mut self,
        id: u64,
        outcome: Result<ConversationSuggestion, AgentError>,
    ) -> bool {
        if self.in_flight != Some(id) {
            debug!(id, latest = self.last_request_id, "discarding stale completion");
            return false;
        }
        self.in_flight = None;

        self.state = match outcome {
            Ok(suggestion) => {
                info!(id, "request succeeded");
                RequestState::Success(suggestion)
            }
            Err(err) => {
                warn!(id, error = %err, "request failed");
                RequestState::Failure(failure_message(&err))
            }
        };
        true
    }

    /// Submit and drive one request to completion on the current task
    pub async fn submit_with(&mut self, client: &dyn SuggestionClient) {
        let Some(pending) = self.submit() else {
            return;
        };
        let outcome = client.get_conversation_starter(&pending.inputs).await;
        self.complete(pending.id, outcome);
    }
}

/// Display text for a failed generation
pub fn failure_message(err: &AgentError) -> String {
    let detail = err.to_string();
    if detail.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        format!("{GENERATION_ERROR_PREFIX}{detail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormController {
        let mut form = FormController::new();
        form.update_field(Field::SpeakerInfo, "Sinh viên IT");
        form.update_field(Field::AudienceInfo, "Nhà tuyển dụng");
        form.update_field(Field::Context, "Hội chợ việc làm");
        form.update_field(Field::Goal, "Hỏi về thực tập");
        form
    }

    fn suggestion() -> ConversationSuggestion {
        ConversationSuggestion::new("Chào anh/chị...", "Vì...", "Có thể...")
    }

    #[test]
    fn starts_idle_and_disabled() {
        let form = FormController::new();
        assert_eq!(form.state(), &RequestState::Idle);
        assert!(!form.can_submit());
    }

    #[test]
    fn update_field_is_idempotent() {
        let mut form = filled();
        form.update_field(Field::Context, "Quán cà phê");
        let snapshot = form.inputs().clone();
        form.update_field(Field::Context, "Quán cà phê");
        assert_eq!(form.inputs(), &snapshot);
        assert_eq!(form.state(), &RequestState::Idle);
    }

    #[test]
    fn whitespace_counts_as_filled() {
        let mut form = filled();
        form.update_field(Field::Goal, "   ");
        assert!(form.can_submit());
        assert!(form.submit().is_some());
    }

    #[test]
    fn each_empty_field_blocks_submission() {
        for field in Field::ALL {
            let mut form = filled();
            form.update_field(field, "");
            assert!(!form.can_submit());
            assert!(form.submit().is_none(), "{field:?}");
            assert_eq!(form.state().error(), Some(INCOMPLETE_MESSAGE));
        }
    }

    #[test]
    fn submit_clears_previous_result() {
        let mut form = filled();
        let first = form.submit().unwrap();
        assert!(form.complete(first.id, Ok(suggestion())));
        assert!(form.state().suggestion().is_some());

        let second = form.submit().unwrap();
        assert_eq!(form.state(), &RequestState::Loading);
        assert!(!form.can_submit());
        assert_eq!(second.inputs, *form.inputs());
    }

    #[test]
    fn completion_is_applied_once() {
        let mut form = filled();
        let pending = form.submit().unwrap();
        assert!(form.complete(pending.id, Ok(suggestion())));
        assert!(!form.complete(
            pending.id,
            Err(AgentError::RequestFailed("late".into()))
        ));
        assert_eq!(form.state(), &RequestState::Success(suggestion()));
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut form = filled();
        let first = form.submit().unwrap();
        let second = form.submit().unwrap();
        assert!(second.id > first.id);

        assert!(!form.complete(first.id, Ok(suggestion())));
        assert!(form.state().is_loading());

        assert!(form.complete(
            second.id,
            Err(AgentError::RequestFailed("network timeout".into()))
        ));
        assert!(form.state().error().unwrap().contains("network timeout"));
    }

    #[test]
    fn failure_message_has_prefix() {
        let message = failure_message(&AgentError::MissingField("loiChao"));
        assert!(message.starts_with(GENERATION_ERROR_PREFIX));
        assert!(message.ends_with("`loiChao`"));
    }

    #[test]
    fn empty_error_text_uses_generic_message() {
        let message = failure_message(&AgentError::RequestFailed(String::new()));
        assert_eq!(message, UNKNOWN_ERROR_MESSAGE);
    }
}
