//! crates/study_tracker_core/src/subject_select.rs
//!
//! State machine behind the subject combobox: pick an existing subject, pick
//! "no subject", or create one inline. Transitions are pure; anything the host
//! has to do (call the creation action, refresh the view, report a selection)
//! comes back as an `Effect`.

use crate::domain::{Subject, SubjectColor};
use tracing::warn;
use uuid::Uuid;

pub const PLACEHOLDER_LABEL: &str = "Select a subject";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectState {
    Closed,
    ListOpen,
    CreateOpen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectDraft {
    pub name: String,
    pub color: SubjectColor,
}

impl Default for SubjectDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: SubjectColor::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectEvent {
    TriggerClicked,
    OutsideClicked,
    /// `None` is the "no subject" entry.
    Choose(Option<Uuid>),
    CreateRequested,
    CreateCancelled,
    NameEdited(String),
    ColorPicked(SubjectColor),
    Submit,
    CreateSucceeded(Subject),
    CreateFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Report the new selection to the owner of the picker.
    Select(Option<Uuid>),
    /// Run the creation action with a trimmed name.
    CreateSubject { name: String, color: SubjectColor },
    /// Reload the enclosing view so the subject list picks up the new entry.
    Refresh,
}

#[derive(Debug, Clone)]
pub struct SubjectSelect {
    state: SelectState,
    disabled: bool,
    value: Option<Uuid>,
    draft: SubjectDraft,
    submitting: bool,
    /// Survives a trigger close so the picker reopens on the create form.
    creating: bool,
}

impl SubjectSelect {
    pub fn new(value: Option<Uuid>, disabled: bool) -> Self {
        Self {
            state: SelectState::Closed,
            disabled,
            value,
            draft: SubjectDraft::default(),
            submitting: false,
            creating: false,
        }
    }

    pub fn state(&self) -> SelectState {
        self.state
    }

    pub fn value(&self) -> Option<Uuid> {
        self.value
    }

    pub fn draft(&self) -> &SubjectDraft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Whether the create button is enabled.
    pub fn can_submit(&self) -> bool {
        self.state == SelectState::CreateOpen
            && !self.submitting
            && !self.draft.name.trim().is_empty()
    }

    pub fn selected_subject<'a>(&self, subjects: &'a [Subject]) -> Option<&'a Subject> {
        let id = self.value?;
        subjects.iter().find(|s| s.id == id)
    }

    /// The trigger text. A value missing from `subjects` shows the placeholder
    /// until the list is refreshed.
    pub fn trigger_label<'a>(&self, subjects: &'a [Subject]) -> &'a str {
        self.selected_subject(subjects)
            .map(|s| s.name.as_str())
            .unwrap_or(PLACEHOLDER_LABEL)
    }

    pub fn handle(&mut self, event: SelectEvent) -> Vec<Effect> {
        match event {
            SelectEvent::TriggerClicked => {
                if !self.disabled {
                    self.state = match self.state {
                        SelectState::Closed if self.creating => SelectState::CreateOpen,
                        SelectState::Closed => SelectState::ListOpen,
                        SelectState::ListOpen | SelectState::CreateOpen => SelectState::Closed,
                    };
                }
                Vec::new()
            }
            SelectEvent::OutsideClicked => {
                self.state = SelectState::Closed;
                self.creating = false;
                Vec::new()
            }
            SelectEvent::Choose(value) => {
                if self.state != SelectState::ListOpen {
                    return Vec::new();
                }
                self.value = value;
                self.state = SelectState::Closed;
                vec![Effect::Select(value)]
            }
            SelectEvent::CreateRequested => {
                if self.state == SelectState::ListOpen {
                    self.state = SelectState::CreateOpen;
                    self.creating = true;
                }
                Vec::new()
            }
            SelectEvent::CreateCancelled => {
                if self.state == SelectState::CreateOpen {
                    self.state = SelectState::ListOpen;
                    self.creating = false;
                }
                Vec::new()
            }
            SelectEvent::NameEdited(name) => {
                self.draft.name = name;
                Vec::new()
            }
            SelectEvent::ColorPicked(color) => {
                self.draft.color = color;
                Vec::new()
            }
            SelectEvent::Submit => {
                if !self.can_submit() {
                    return Vec::new();
                }
                self.submitting = true;
                vec![Effect::CreateSubject {
                    name: self.draft.name.trim().to_string(),
                    color: self.draft.color,
                }]
            }
            SelectEvent::CreateSucceeded(subject) => {
                if !self.submitting {
                    return Vec::new();
                }
                self.submitting = false;
                self.creating = false;
                self.state = SelectState::Closed;
                self.draft.name.clear();
                self.value = Some(subject.id);
                vec![Effect::Refresh, Effect::Select(Some(subject.id))]
            }
            SelectEvent::CreateFailed(reason) => {
                warn!("Failed to create subject: {}", reason);
                self.submitting = false;
                Vec::new()
            }
        }
    }
}
