use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::fields::{AppointmentDraft, Field};
use crate::models::intent::FlowIntent;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    IntentDetection,
    CollectingFields,
    Confirming,
    Committing,
    Done,
    Aborted,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Idle => "idle",
            Stage::IntentDetection => "intent_detection",
            Stage::CollectingFields => "collecting_fields",
            Stage::Confirming => "confirming",
            Stage::Committing => "committing",
            Stage::Done => "done",
            Stage::Aborted => "aborted",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PatientKind {
    Unset,
    New,
    Returning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: String,
    pub content: String,
}

/// Per-session dialogue state. Mutated only by the conversation engine,
/// one utterance at a time, under the session's lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub stage: Stage,
    pub intent: Option<FlowIntent>,
    pub patient_kind: PatientKind,
    pub draft: AppointmentDraft,
    /// The single field the last prompt asked for, used to disambiguate
    /// terse answers ("tomorrow" while awaiting new_date goes to new_date).
    pub awaiting: Option<Field>,
    pub messages: Vec<ConversationMessage>,
    /// True once the customer id was checked against the customer master.
    pub identity_verified: bool,
    pub identity_retries: u8,
    pub parse_retries: u8,
    pub last_activity: NaiveDateTime,
}

impl Conversation {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            stage: Stage::Idle,
            intent: None,
            patient_kind: PatientKind::Unset,
            draft: AppointmentDraft::default(),
            awaiting: None,
            messages: vec![],
            identity_verified: false,
            identity_retries: 0,
            parse_retries: 0,
            last_activity: now,
        }
    }

    /// Clear flow state but keep the message history, so the session can
    /// run another flow after `done`/`aborted` or an explicit reset.
    pub fn reset_flow(&mut self) {
        self.stage = Stage::Idle;
        self.intent = None;
        self.patient_kind = PatientKind::Unset;
        self.draft = AppointmentDraft::default();
        self.awaiting = None;
        self.identity_verified = false;
        self.identity_retries = 0;
        self.parse_retries = 0;
    }

    /// Required fields still unknown, in prompt order.
    pub fn missing_fields(&self) -> Vec<Field> {
        let Some(intent) = self.intent else {
            return vec![];
        };
        Field::required_for(intent, self.patient_kind)
            .iter()
            .copied()
            .filter(|f| match f {
                Field::PatientKind => self.patient_kind == PatientKind::Unset,
                other => !self.draft.has(*other),
            })
            .collect()
    }
}
