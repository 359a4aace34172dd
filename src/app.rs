//! Interactive application state: focus, key handling and background requests.

use crate::agent::{AgentError, SuggestionClient};
use crate::form::{Field, FormController};
use crate::suggestion::ConversationSuggestion;
use crate::ui::event::AppEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input(Field),
    Submit,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::Input(Field::SpeakerInfo),
        Focus::Input(Field::AudienceInfo),
        Focus::Input(Field::Context),
        Focus::Input(Field::Goal),
        Focus::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|&f| f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// Outcome of one background generation request
#[derive(Debug)]
pub struct Completion {
    pub id: u64,
    pub outcome: Result<ConversationSuggestion, AgentError>,
}

pub struct App {
    pub form: FormController,
    pub focus: Focus,
    pub should_quit: bool,
    /// 0-2 for the loading ellipsis
    pub animation_frame: u8,
    client: Arc<dyn SuggestionClient>,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(client: Arc<dyn SuggestionClient>, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            form: FormController::new(),
            focus: Focus::Input(Field::SpeakerInfo),
            should_quit: false,
            animation_frame: 0,
            client,
            events,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => {
                // The validation banner is shown for incomplete forms
                if !self.form.state().is_loading() {
                    self.submit();
                }
            }
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Enter => match self.focus {
                Focus::Submit => {
                    if self.form.can_submit() {
                        self.submit();
                    }
                }
                Focus::Input(_) => self.edit(|value| value.push('\n')),
            },
            KeyCode::Backspace => self.edit(|value| {
                value.pop();
            }),
            KeyCode::Char(c) if !ctrl => self.edit(|value| value.push(c)),
            _ => {}
        }
    }

    /// Apply an edit to the focused input through the controller
    fn edit<F>(&mut self, apply: F)
    where
        F: FnOnce(&mut String),
    {
        let Focus::Input(field) = self.focus else {
            return;
        };
        let mut value = self.form.inputs().get(field).to_string();
        apply(&mut value);
        self.form.update_field(field, value);
    }

    /// Submit the form and run the request on a background task.
    ///
    /// Returns the task handle, or `None` when validation failed.
    pub fn submit(&mut self) -> Option<JoinHandle<()>> {
        let pending = self.form.submit()?;
        self.animation_frame = 0;

        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        Some(tokio::spawn(async move {
            let outcome = client.get_conversation_starter(&pending.inputs).await;
            // The receiver is gone only when the app is shutting down
            let _ = events.send(AppEvent::Completion(Completion {
                id: pending.id,
                outcome,
            }));
        }))
    }

    pub fn on_completion(&mut self, completion: Completion) {
        self.form.complete(completion.id, completion.outcome);
    }

    pub fn tick(&mut self) {
        if self.form.state().is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}
