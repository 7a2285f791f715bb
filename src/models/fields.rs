use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::models::intent::FlowIntent;
use crate::models::conversation::PatientKind;

/// A slot the conversation may need to fill. Order of the required-field
/// lists below is the prompt order: identity before date/time before reason.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    PatientKind,
    CustomerId,
    Name,
    Phone,
    Date,
    Time,
    NewDate,
    NewTime,
    Reason,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PatientKind => "patient_kind",
            Field::CustomerId => "customer_id",
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Date => "date",
            Field::Time => "time",
            Field::NewDate => "new_date",
            Field::NewTime => "new_time",
            Field::Reason => "reason",
        }
    }

    /// Required slots for an intent, in the order they should be asked.
    pub fn required_for(intent: FlowIntent, kind: PatientKind) -> &'static [Field] {
        match intent {
            FlowIntent::Book => match kind {
                PatientKind::Unset => &[
                    Field::PatientKind,
                    Field::Date,
                    Field::Time,
                    Field::Reason,
                ],
                PatientKind::New => &[
                    Field::Name,
                    Field::Phone,
                    Field::Date,
                    Field::Time,
                    Field::Reason,
                ],
                PatientKind::Returning => &[
                    Field::CustomerId,
                    Field::Date,
                    Field::Time,
                    Field::Reason,
                ],
            },
            FlowIntent::Reschedule => &[
                Field::Name,
                Field::Phone,
                Field::Date,
                Field::Time,
                Field::NewDate,
                Field::NewTime,
            ],
            FlowIntent::Cancel => &[
                Field::Name,
                Field::CustomerId,
                Field::Date,
                Field::Time,
            ],
            FlowIntent::View => &[Field::CustomerId],
        }
    }
}

/// The validated slot values accumulated across turns. Dates and times are
/// stored canonical; everything raw stays in the extractor layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub customer_id: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub new_date: Option<NaiveDate>,
    pub new_time: Option<NaiveTime>,
    pub reason: Option<String>,
}

impl AppointmentDraft {
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::PatientKind => false, // tracked on the conversation, not the draft
            Field::CustomerId => self.customer_id.is_some(),
            Field::Name => self.name.is_some(),
            Field::Phone => self.phone.is_some(),
            Field::Date => self.date.is_some(),
            Field::Time => self.time.is_some(),
            Field::NewDate => self.new_date.is_some(),
            Field::NewTime => self.new_time.is_some(),
            Field::Reason => self.reason.is_some(),
        }
    }
}
