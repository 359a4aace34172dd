use async_trait::async_trait;
use loichao::form::INCOMPLETE_MESSAGE;
use loichao::{
    AgentError, ConversationSuggestion, Field, FormController, FormInputs, RequestState,
    SuggestionClient,
};
use std::sync::Mutex;

/// Records every call and answers with a canned outcome
struct StubClient {
    calls: Mutex<Vec<FormInputs>>,
    reply: Result<ConversationSuggestion, String>,
}

impl StubClient {
    fn succeeding(suggestion: ConversationSuggestion) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(suggestion),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(message.to_string()),
        }
    }

    fn calls(&self) -> Vec<FormInputs> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SuggestionClient for StubClient {
    async fn get_conversation_starter(
        &self,
        inputs: &FormInputs,
    ) -> Result<ConversationSuggestion, AgentError> {
        self.calls.lock().unwrap().push(inputs.clone());
        self.reply
            .clone()
            .map_err(AgentError::RequestFailed)
    }
}

fn job_fair_form() -> FormController {
    let mut form = FormController::new();
    form.update_field(Field::SpeakerInfo, "Sinh viên IT");
    form.update_field(Field::AudienceInfo, "Nhà tuyển dụng");
    form.update_field(Field::Context, "Hội chợ việc làm");
    form.update_field(Field::Goal, "Hỏi về thực tập");
    form
}

fn job_fair_suggestion() -> ConversationSuggestion {
    ConversationSuggestion::new("Chào anh/chị...", "Vì...", "Có thể...")
}

#[tokio::test]
async fn successful_submission_stores_suggestion() {
    let client = StubClient::succeeding(job_fair_suggestion());
    let mut form = job_fair_form();

    form.submit_with(&client).await;

    assert_eq!(
        form.state(),
        &RequestState::Success(job_fair_suggestion())
    );
    let suggestion = form.state().suggestion().unwrap();
    assert_eq!(
        suggestion.sections(),
        ["Chào anh/chị...", "Vì...", "Có thể..."]
    );

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].speaker_info, "Sinh viên IT");
    assert_eq!(calls[0].audience_info, "Nhà tuyển dụng");
    assert_eq!(calls[0].context, "Hội chợ việc làm");
    assert_eq!(calls[0].goal, "Hỏi về thực tập");
}

#[tokio::test]
async fn blank_field_fails_without_calling_client() {
    let client = StubClient::succeeding(job_fair_suggestion());
    let mut form = job_fair_form();
    form.update_field(Field::Goal, "");

    form.submit_with(&client).await;

    assert_eq!(
        form.state(),
        &RequestState::Failure(INCOMPLETE_MESSAGE.to_string())
    );
    assert_eq!(
        INCOMPLETE_MESSAGE,
        "Vui lòng điền đầy đủ tất cả các trường thông tin."
    );
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn client_error_becomes_failure_message() {
    let client = StubClient::failing("network timeout");
    let mut form = job_fair_form();

    form.submit_with(&client).await;

    let message = form.state().error().expect("failure state");
    assert!(message.contains("network timeout"));
    assert!(message.starts_with("Không thể tạo gợi ý."));
    assert!(form.state().suggestion().is_none());
    assert_eq!(client.calls().len(), 1);
}

#[tokio::test]
async fn resubmitting_after_failure_recovers() {
    let mut form = job_fair_form();

    form.submit_with(&StubClient::failing("503")).await;
    assert!(form.state().error().is_some());

    form.submit_with(&StubClient::succeeding(job_fair_suggestion()))
        .await;
    assert_eq!(form.state().suggestion(), Some(&job_fair_suggestion()));
    assert!(form.state().error().is_none());
}

#[tokio::test]
async fn overlapping_submissions_keep_latest() {
    let mut form = job_fair_form();
    let first = form.submit().unwrap();

    form.update_field(Field::Goal, "Xin danh thiếp");
    let second = form.submit().unwrap();
    assert_eq!(second.inputs.goal, "Xin danh thiếp");

    let newer = ConversationSuggestion::new("mới", "mới", "mới");
    let client = StubClient::succeeding(newer.clone());
    let outcome = client.get_conversation_starter(&second.inputs).await;
    assert!(form.complete(second.id, outcome));

    // The first request resolves last but is older, so it is dropped
    assert!(!form.complete(first.id, Ok(job_fair_suggestion())));
    assert_eq!(form.state(), &RequestState::Success(newer));
}
