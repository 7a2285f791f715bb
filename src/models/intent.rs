use serde::{Deserialize, Serialize};

/// The goal driving a multi-turn flow. Set once per conversation during
/// intent detection and never silently replaced mid-flow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlowIntent {
    Book,
    Reschedule,
    Cancel,
    View,
}

impl FlowIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowIntent::Book => "book",
            FlowIntent::Reschedule => "reschedule",
            FlowIntent::Cancel => "cancel",
            FlowIntent::View => "view",
        }
    }
}

/// What a single utterance is doing. Flow intents start a flow;
/// confirm/decline only matter while a proposal is on the table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UtteranceIntent {
    Book,
    Reschedule,
    Cancel,
    View,
    Confirm,
    Decline,
    Unknown,
}

impl UtteranceIntent {
    pub fn as_flow(&self) -> Option<FlowIntent> {
        match self {
            UtteranceIntent::Book => Some(FlowIntent::Book),
            UtteranceIntent::Reschedule => Some(FlowIntent::Reschedule),
            UtteranceIntent::Cancel => Some(FlowIntent::Cancel),
            UtteranceIntent::View => Some(FlowIntent::View),
            _ => None,
        }
    }
}

/// Raw, best-effort output of the field extractor for one utterance.
/// Every value is unvalidated text; the validator owns normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub intent: Option<UtteranceIntent>,
    pub returning: Option<bool>,
    pub customer_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub new_date: Option<String>,
    pub new_time: Option<String>,
    pub reason: Option<String>,
}

impl ExtractedFields {
    /// LLMs frequently return empty strings instead of null; treat those
    /// as absent so they never clobber known values.
    pub fn cleaned(mut self) -> Self {
        fn clean(v: &mut Option<String>) {
            if v.as_deref().map(|s| s.trim().is_empty()).unwrap_or(false) {
                *v = None;
            } else if let Some(s) = v.as_mut() {
                *s = s.trim().to_string();
            }
        }
        clean(&mut self.customer_id);
        clean(&mut self.name);
        clean(&mut self.phone);
        clean(&mut self.date);
        clean(&mut self.time);
        clean(&mut self.new_date);
        clean(&mut self.new_time);
        clean(&mut self.reason);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.customer_id.is_none()
            && self.name.is_none()
            && self.phone.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.new_date.is_none()
            && self.new_time.is_none()
            && self.reason.is_none()
    }
}
