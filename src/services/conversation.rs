use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::db::queries;
use crate::models::{
    Appointment, Conversation, ConversationMessage, Customer, Field, FlowIntent, PatientKind,
    Stage, UtteranceIntent,
};
use crate::services::calendar::CalendarEvent;
use crate::services::extractor;
use crate::services::validator::{self, ValidationError};
use crate::state::AppState;

pub const GREETING: &str = "Hello! Welcome to Smile Dental. How can I help you today?";

/// Give up on a field after this many consecutive unusable answers.
const MAX_PARSE_RETRIES: u8 = 3;
/// Unknown customer ids get this many re-prompts before the fallback.
const MAX_IDENTITY_RETRIES: u8 = 2;

/// Runs one turn of the conversation. The caller holds the session lock,
/// so there is never concurrent mutation of a single conversation.
pub async fn process_message(
    state: &Arc<AppState>,
    conv: &mut Conversation,
    message: &str,
) -> anyhow::Result<String> {
    let today = state.today();

    let reply = turn(state, conv, message, today).await?;

    conv.messages.push(ConversationMessage {
        role: "user".to_string(),
        content: message.to_string(),
    });
    conv.messages.push(ConversationMessage {
        role: "assistant".to_string(),
        content: reply.clone(),
    });
    conv.last_activity = Utc::now().naive_utc();

    tracing::info!(
        stage = conv.stage.as_str(),
        intent = ?conv.intent,
        awaiting = ?conv.awaiting,
        "turn processed"
    );

    Ok(reply)
}

async fn turn(
    state: &Arc<AppState>,
    conv: &mut Conversation,
    message: &str,
    today: NaiveDate,
) -> anyhow::Result<String> {
    if is_farewell(message) {
        if conv.stage != Stage::Done {
            conv.stage = Stage::Aborted;
        }
        return Ok(goodbye(conv));
    }

    // A finished or abandoned flow restarts cleanly on the next utterance.
    if matches!(conv.stage, Stage::Done | Stage::Aborted) {
        conv.reset_flow();
    }
    if conv.stage == Stage::Idle {
        conv.stage = Stage::IntentDetection;
    }

    let extracted = extractor::extract_fields(
        state.llm.as_ref(),
        &conv.messages,
        message,
        &conv.draft,
        conv.awaiting,
        today,
    )
    .await;

    match conv.stage {
        Stage::IntentDetection => {
            if let Some(flow) = extracted.intent.and_then(|i| i.as_flow()) {
                conv.intent = Some(flow);
                conv.stage = Stage::CollectingFields;
                tracing::info!(intent = flow.as_str(), "intent detected");
                collect(state, conv, &extracted, today)
            } else {
                Ok(
                    "I can help you book, reschedule, cancel, or view appointments. \
                     What would you like to do?"
                        .to_string(),
                )
            }
        }

        Stage::CollectingFields => collect(state, conv, &extracted, today),

        Stage::Confirming => match extracted.intent {
            Some(UtteranceIntent::Confirm) => {
                conv.stage = Stage::Committing;
                commit(state, conv, today).await
            }
            Some(UtteranceIntent::Decline) => {
                conv.stage = Stage::CollectingFields;
                Ok("No problem, what should I change?".to_string())
            }
            _ if !extracted.is_empty() => {
                // A correction: apply the revised values and re-validate.
                conv.stage = Stage::CollectingFields;
                collect(state, conv, &extracted, today)
            }
            _ => Ok(format!(
                "{} Please say yes to confirm, or tell me what to change.",
                summary(conv)
            )),
        },

        // Only reachable after a failed commit; the user retries or bails.
        Stage::Committing => match extracted.intent {
            Some(UtteranceIntent::Confirm) => commit(state, conv, today).await,
            Some(UtteranceIntent::Decline) => {
                conv.stage = Stage::Aborted;
                Ok("Okay, I won't go ahead. Is there anything else I can help with?".to_string())
            }
            _ => Ok(
                "I wasn't able to finish just now. Say yes to try again, or no to stop."
                    .to_string(),
            ),
        },

        // Normalized away above; reaching here means corrupted state.
        Stage::Idle | Stage::Done | Stage::Aborted => {
            tracing::error!(stage = conv.stage.as_str(), "unexpected stage, resetting");
            conv.reset_flow();
            Ok(GREETING.to_string())
        }
    }
}

/// Fill as many missing slots as the utterance provided, then either ask
/// for the next field or move to confirmation.
fn collect(
    state: &Arc<AppState>,
    conv: &mut Conversation,
    extracted: &crate::models::ExtractedFields,
    today: NaiveDate,
) -> anyhow::Result<String> {
    let mut applied_any = false;

    if conv.intent == Some(FlowIntent::Book) && conv.patient_kind == PatientKind::Unset {
        if let Some(returning) = extracted.returning {
            conv.patient_kind = if returning {
                PatientKind::Returning
            } else {
                PatientKind::New
            };
            applied_any = true;
        } else if extracted.customer_id.is_some() {
            conv.patient_kind = PatientKind::Returning;
            applied_any = true;
        }
    }

    if let Some(id) = &extracted.customer_id {
        let id = id.to_uppercase();
        if conv.draft.customer_id.as_deref() != Some(id.as_str()) {
            conv.draft.customer_id = Some(id);
            conv.identity_verified = false;
        }
        applied_any = true;
    }
    if let Some(name) = &extracted.name {
        conv.draft.name = Some(name.clone());
        applied_any = true;
    }
    if let Some(reason) = &extracted.reason {
        conv.draft.reason = Some(reason.clone());
        applied_any = true;
    }
    if let Some(phone) = &extracted.phone {
        match validator::normalize_phone(phone) {
            Ok(digits) => {
                conv.draft.phone = Some(digits);
                applied_any = true;
            }
            Err(e) => return Ok(reprompt(conv, Field::Phone, &e)),
        }
    }

    // Date/time slots arrive as raw text; normalize before accepting.
    let date_slots = [
        (extracted.date.as_deref(), Field::Date),
        (extracted.new_date.as_deref(), Field::NewDate),
    ];
    for (raw, field) in date_slots {
        let Some(raw) = raw else { continue };
        match validator::normalize_date(raw, today) {
            Ok(date) => {
                match field {
                    Field::Date => conv.draft.date = Some(date),
                    _ => conv.draft.new_date = Some(date),
                }
                applied_any = true;
            }
            Err(e) => return Ok(reprompt(conv, field, &e)),
        }
    }
    let time_slots = [
        (extracted.time.as_deref(), Field::Time),
        (extracted.new_time.as_deref(), Field::NewTime),
    ];
    for (raw, field) in time_slots {
        let Some(raw) = raw else { continue };
        match validator::normalize_time(raw) {
            Ok(time) => {
                match field {
                    Field::Time => conv.draft.time = Some(time),
                    _ => conv.draft.new_time = Some(time),
                }
                applied_any = true;
            }
            Err(e) => return Ok(reprompt(conv, field, &e)),
        }
    }

    if let Some(reply) = verify_identity(state, conv)? {
        return Ok(reply);
    }

    if let Some(reply) = check_slot_rules(state, conv, today) {
        return Ok(reply);
    }

    let missing = conv.missing_fields();
    if let Some(field) = missing.first().copied() {
        // Asking the same question again only counts against the retry
        // budget when the answer contributed nothing at all.
        if conv.awaiting == Some(field) && !applied_any {
            conv.parse_retries += 1;
            if conv.parse_retries >= MAX_PARSE_RETRIES {
                conv.stage = Stage::Aborted;
                return Ok(
                    "I'm having trouble understanding. Please call our front desk \
                     and we'll sort it out. Goodbye!"
                        .to_string(),
                );
            }
        } else {
            conv.parse_retries = 0;
        }
        conv.awaiting = Some(field);
        return Ok(prompt_for(field, conv));
    }

    conv.awaiting = None;
    conv.parse_retries = 0;
    conv.stage = Stage::Confirming;
    Ok(format!("{} Shall I go ahead?", summary(conv)))
}

/// Re-prompt for a single offending field; the rest of the draft is kept.
/// The retry budget covers consecutive failures on one field, so it
/// restarts whenever the offending field changes.
fn reprompt(conv: &mut Conversation, field: Field, err: &ValidationError) -> String {
    if conv.awaiting != Some(field) {
        conv.parse_retries = 0;
    }
    conv.parse_retries += 1;
    if conv.parse_retries >= MAX_PARSE_RETRIES {
        conv.stage = Stage::Aborted;
        return "I'm having trouble understanding. Please call our front desk \
                and we'll sort it out. Goodbye!"
            .to_string();
    }
    conv.awaiting = Some(field);
    format!("Sorry, {err}. {}", prompt_for(field, conv))
}

/// Check a supplied customer id against the customer master. Returns a
/// reply when the flow can't proceed yet.
fn verify_identity(state: &Arc<AppState>, conv: &mut Conversation) -> anyhow::Result<Option<String>> {
    let uses_identity = matches!(
        (conv.intent, conv.patient_kind),
        (Some(FlowIntent::Book), PatientKind::Returning)
            | (Some(FlowIntent::Cancel), _)
            | (Some(FlowIntent::View), _)
    );
    if !uses_identity || conv.identity_verified {
        return Ok(None);
    }
    let Some(customer_id) = conv.draft.customer_id.clone() else {
        return Ok(None);
    };

    let customer = {
        let db = state.db.lock().unwrap();
        queries::get_customer(&db, &customer_id)?
    };

    let Some(customer) = customer else {
        conv.identity_retries += 1;
        conv.draft.customer_id = None;
        tracing::warn!(customer_id = %customer_id, "unknown customer id");

        if let Some(reply) = identity_retries_spent(conv) {
            return Ok(Some(reply));
        }
        conv.awaiting = Some(Field::CustomerId);
        return Ok(Some(
            "I couldn't find that customer ID. Could you double-check it for me?".to_string(),
        ));
    };

    // A volunteered phone number must match the one on file. Mismatches
    // draw from the same retry budget as unknown ids.
    if let Some(phone) = &conv.draft.phone {
        if !validator::phones_match(&customer.phone, phone) {
            conv.identity_retries += 1;
            conv.draft.phone = None;
            conv.draft.customer_id = None;
            tracing::warn!(customer_id = %customer_id, "phone does not match customer master");

            if let Some(reply) = identity_retries_spent(conv) {
                return Ok(Some(reply));
            }
            conv.awaiting = Some(Field::CustomerId);
            return Ok(Some(format!(
                "Sorry, {}. Let's try again. What's your customer ID?",
                ValidationError::IdentityMismatch
            )));
        }
    }

    conv.identity_verified = true;
    conv.identity_retries = 0;
    if conv.intent == Some(FlowIntent::Book) {
        // Returning patients don't re-enter identity fields.
        conv.draft.name = Some(customer.name.clone());
        conv.draft.phone = Some(customer.phone.clone());
    }
    Ok(None)
}

/// Once the identity retry budget is spent, a booking falls back to
/// new-patient registration; cancel and view have nothing to fall back to
/// and abort.
fn identity_retries_spent(conv: &mut Conversation) -> Option<String> {
    if conv.identity_retries <= MAX_IDENTITY_RETRIES {
        return None;
    }
    if conv.intent == Some(FlowIntent::Book) {
        conv.patient_kind = PatientKind::New;
        conv.identity_retries = 0;
        conv.awaiting = Some(Field::Name);
        return Some(
            "I can't verify that customer ID, so let's get you set up as a \
             new patient. What's your name?"
                .to_string(),
        );
    }
    conv.stage = Stage::Aborted;
    Some(
        "I can't verify that customer ID. Please call our front desk and \
         we'll sort it out. Goodbye!"
            .to_string(),
    )
}

/// Business-hours and booking-window rules for the slot being booked.
/// The slot that identifies an EXISTING appointment is exempt.
fn check_slot_rules(
    state: &Arc<AppState>,
    conv: &mut Conversation,
    today: NaiveDate,
) -> Option<String> {
    let (date, time, date_field) = match conv.intent? {
        FlowIntent::Book => (conv.draft.date, conv.draft.time, Field::Date),
        FlowIntent::Reschedule => (conv.draft.new_date, conv.draft.new_time, Field::NewDate),
        FlowIntent::Cancel | FlowIntent::View => return None,
    };
    let (date, time) = (date?, time?);

    let checked = validator::business_hours(date, time).and_then(|_| {
        validator::booking_window(date, today, state.config.booking_window_days)
    });

    if let Err(e) = checked {
        match date_field {
            Field::Date => {
                conv.draft.date = None;
                conv.draft.time = None;
            }
            _ => {
                conv.draft.new_date = None;
                conv.draft.new_time = None;
            }
        }
        return Some(reprompt(conv, date_field, &e));
    }
    None
}

fn prompt_for(field: Field, conv: &Conversation) -> String {
    let existing_slot = matches!(
        conv.intent,
        Some(FlowIntent::Reschedule) | Some(FlowIntent::Cancel)
    );
    match field {
        Field::PatientKind => {
            "Are you a new patient or a returning patient? If you're returning, \
             just tell me your customer ID."
                .to_string()
        }
        Field::CustomerId => "What's your customer ID? It looks like CUST001.".to_string(),
        Field::Name => "What's your name?".to_string(),
        Field::Phone => match &conv.draft.name {
            Some(name) => format!("Great, {name}! What's your phone number?"),
            None => "What's your phone number?".to_string(),
        },
        Field::Date if existing_slot => "What date is your current appointment?".to_string(),
        Field::Date => "What date would you like to come in?".to_string(),
        Field::Time if existing_slot => "What time is your current appointment?".to_string(),
        Field::Time => "What time works for you?".to_string(),
        Field::NewDate => "What new date would you like?".to_string(),
        Field::NewTime => "What new time would you like?".to_string(),
        Field::Reason => "What's the reason for your visit?".to_string(),
    }
}

/// Human-readable recap shown before the commit.
fn summary(conv: &Conversation) -> String {
    let draft = &conv.draft;
    let date = draft.date.map(validator::human_date).unwrap_or_default();
    let time = draft.time.map(validator::human_time).unwrap_or_default();
    match conv.intent {
        Some(FlowIntent::Book) => format!(
            "Let me confirm: an appointment for {} on {} at {}, reason: {}. \
             We'll reach you at {}.",
            draft.name.as_deref().unwrap_or("you"),
            date,
            time,
            draft.reason.as_deref().unwrap_or("a visit"),
            draft.phone.as_deref().unwrap_or("your phone"),
        ),
        Some(FlowIntent::Reschedule) => format!(
            "Let me confirm: move {}'s appointment from {} at {} to {} at {}.",
            draft.name.as_deref().unwrap_or("your"),
            date,
            time,
            draft.new_date.map(validator::human_date).unwrap_or_default(),
            draft.new_time.map(validator::human_time).unwrap_or_default(),
        ),
        Some(FlowIntent::Cancel) => format!(
            "Let me confirm: cancel the appointment for {} ({}) on {} at {}.",
            draft.name.as_deref().unwrap_or("you"),
            draft.customer_id.as_deref().unwrap_or("unknown"),
            date,
            time,
        ),
        Some(FlowIntent::View) => format!(
            "You'd like to see the appointments on file for {}.",
            draft.customer_id.as_deref().unwrap_or("your customer ID"),
        ),
        None => "I'm not sure what you'd like to do.".to_string(),
    }
}

enum CommitOutcome {
    Completed(String),
    /// The stored data didn't match what the user described; back to
    /// collecting with the offending fields cleared.
    Rejected(String),
}

/// The single mutation point of a conversation. Runs only on the
/// transition into `Committing` (or an explicit user retry after a
/// transient failure); success moves the flow to `Done`.
async fn commit(
    state: &Arc<AppState>,
    conv: &mut Conversation,
    today: NaiveDate,
) -> anyhow::Result<String> {
    let result = match conv.intent {
        Some(FlowIntent::Book) => commit_book(state, conv).await,
        Some(FlowIntent::Reschedule) => commit_reschedule(state, conv).await,
        Some(FlowIntent::Cancel) => commit_cancel(state, conv).await,
        Some(FlowIntent::View) => commit_view(state, conv, today),
        None => {
            tracing::error!("commit without an intent, resetting");
            conv.reset_flow();
            return Ok(GREETING.to_string());
        }
    };

    match result {
        Ok(CommitOutcome::Completed(reply)) => {
            conv.stage = Stage::Done;
            Ok(reply)
        }
        Ok(CommitOutcome::Rejected(reply)) => {
            conv.stage = Stage::CollectingFields;
            Ok(reply)
        }
        Err(e) => {
            // Transient backend failure: state is preserved, the user may
            // confirm again; nothing is retried behind their back.
            tracing::error!(error = %e, "commit failed");
            Ok(
                "I couldn't reach our booking system just now. Say yes to try \
                 again, or no to stop."
                    .to_string(),
            )
        }
    }
}

fn required<T: Clone>(value: &Option<T>, field: &'static str) -> anyhow::Result<T> {
    value
        .clone()
        .ok_or_else(|| anyhow::anyhow!("field {field} missing at commit"))
}

async fn commit_book(
    state: &Arc<AppState>,
    conv: &mut Conversation,
) -> anyhow::Result<CommitOutcome> {
    let name = required(&conv.draft.name, "name")?;
    let phone = required(&conv.draft.phone, "phone")?;
    let date = required(&conv.draft.date, "date")?;
    let time = required(&conv.draft.time, "time")?;
    let reason = required(&conv.draft.reason, "reason")?;

    let freshly_registered = conv.patient_kind == PatientKind::New;

    // Mint the id before touching the calendar and remember it in the
    // draft, so a retried commit reuses it instead of minting another.
    let customer_id = match conv.draft.customer_id.clone() {
        Some(id) => id,
        None => {
            let now = Utc::now().naive_utc();
            let id = {
                let db = state.db.lock().unwrap();
                let id = queries::allocate_customer_id(&db)?;
                queries::upsert_customer(
                    &db,
                    &Customer {
                        customer_id: id.clone(),
                        name: name.clone(),
                        phone: phone.clone(),
                        created_at: now,
                    },
                )?;
                id
            };
            conv.draft.customer_id = Some(id.clone());
            id
        }
    };

    let event = CalendarEvent::for_appointment(
        &name,
        &phone,
        &reason,
        date.and_time(time),
        state.config.appointment_minutes,
    );
    let event_id = state.calendar.create_event(&event).await?;

    let now = Utc::now().naive_utc();
    let appointment = Appointment {
        id: uuid::Uuid::new_v4().to_string(),
        customer_id: customer_id.clone(),
        name: name.clone(),
        phone: phone.clone(),
        date: Some(date),
        time: Some(time),
        reason: Some(reason),
        calendar_event_id: Some(event_id.clone()),
        created_at: now,
        updated_at: now,
    };

    let inserted = {
        let db = state.db.lock().unwrap();
        queries::insert_appointment(&db, &appointment)
    };
    if let Err(e) = inserted {
        // Don't leave an orphan event behind the failed row write.
        if let Err(del) = state.calendar.delete_event(&event_id).await {
            tracing::error!(error = %del, event_id = %event_id, "orphan event cleanup failed");
        }
        return Err(e);
    }

    tracing::info!(customer_id = %customer_id, date = %date, "appointment booked");

    let id_line = if freshly_registered {
        format!(" Your customer ID is {customer_id}. Keep it handy for next time.")
    } else {
        String::new()
    };
    Ok(CommitOutcome::Completed(format!(
        "Perfect! Your appointment is confirmed for {} at {}.{} We'll call you at {} if needed. See you then!",
        validator::human_date(date),
        validator::human_time(time),
        id_line,
        phone,
    )))
}

async fn commit_reschedule(
    state: &Arc<AppState>,
    conv: &mut Conversation,
) -> anyhow::Result<CommitOutcome> {
    let name = required(&conv.draft.name, "name")?;
    let phone = required(&conv.draft.phone, "phone")?;
    let date = required(&conv.draft.date, "date")?;
    let time = required(&conv.draft.time, "time")?;
    let new_date = required(&conv.draft.new_date, "new_date")?;
    let new_time = required(&conv.draft.new_time, "new_time")?;

    let existing = {
        let db = state.db.lock().unwrap();
        queries::find_by_identity(&db, &name, &phone, date, time)?
    };
    let Some(existing) = existing else {
        conv.draft.date = None;
        conv.draft.time = None;
        conv.awaiting = Some(Field::Date);
        return Ok(CommitOutcome::Rejected(format!(
            "I couldn't find an appointment for {name} on {} at {}. Let's double-check: \
             what date is your current appointment?",
            validator::human_date(date),
            validator::human_time(time),
        )));
    };

    // New event first; the old one is only removed once the new slot is
    // safely in place.
    let reason = existing.reason.clone().unwrap_or_default();
    let event = CalendarEvent::for_appointment(
        &name,
        &phone,
        &reason,
        new_date.and_time(new_time),
        state.config.appointment_minutes,
    );
    let new_event_id = state.calendar.create_event(&event).await?;

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_appointment_slot(&db, &existing.id, new_date, new_time, &new_event_id)
    };
    if let Err(e) = updated {
        if let Err(del) = state.calendar.delete_event(&new_event_id).await {
            tracing::error!(error = %del, "orphan event cleanup failed");
        }
        return Err(e);
    }

    if let Some(old_event_id) = &existing.calendar_event_id {
        // Best effort; a missing old event must not fail the reschedule.
        if let Err(e) = state.calendar.delete_event(old_event_id).await {
            tracing::warn!(error = %e, event_id = %old_event_id, "failed to delete old event");
        }
    }

    tracing::info!(customer_id = %existing.customer_id, "appointment rescheduled");

    Ok(CommitOutcome::Completed(format!(
        "Perfect! Your appointment has been moved from {} at {} to {} at {}. See you then!",
        validator::human_date(date),
        validator::human_time(time),
        validator::human_date(new_date),
        validator::human_time(new_time),
    )))
}

async fn commit_cancel(
    state: &Arc<AppState>,
    conv: &mut Conversation,
) -> anyhow::Result<CommitOutcome> {
    let customer_id = required(&conv.draft.customer_id, "customer_id")?;
    let date = required(&conv.draft.date, "date")?;
    let time = required(&conv.draft.time, "time")?;

    let existing = {
        let db = state.db.lock().unwrap();
        queries::find_by_customer_slot(&db, &customer_id, date, time)?
    };
    let Some(existing) = existing else {
        conv.draft.date = None;
        conv.draft.time = None;
        conv.awaiting = Some(Field::Date);
        return Ok(CommitOutcome::Rejected(format!(
            "I couldn't find an appointment for {customer_id} on {} at {}. Let's double-check: \
             what date is the appointment?",
            validator::human_date(date),
            validator::human_time(time),
        )));
    };

    // Delete the event first: the tolerant delete makes a retry after a
    // partial failure converge instead of erroring.
    if let Some(event_id) = &existing.calendar_event_id {
        state.calendar.delete_event(event_id).await?;
    }
    {
        let db = state.db.lock().unwrap();
        queries::clear_appointment_slot(&db, &existing.id)?;
    }

    tracing::info!(customer_id = %customer_id, "appointment cancelled");

    Ok(CommitOutcome::Completed(format!(
        "Your appointment on {} at {} has been cancelled. Is there anything else I can help with?",
        validator::human_date(date),
        validator::human_time(time),
    )))
}

fn commit_view(
    state: &Arc<AppState>,
    conv: &mut Conversation,
    today: NaiveDate,
) -> anyhow::Result<CommitOutcome> {
    let customer_id = required(&conv.draft.customer_id, "customer_id")?;

    let appointments = {
        let db = state.db.lock().unwrap();
        queries::appointments_for_customer(&db, &customer_id)?
    };

    let upcoming: Vec<String> = appointments
        .iter()
        .filter(|a| a.date.map(|d| d >= today).unwrap_or(false))
        .map(|a| {
            format!(
                "- {} at {}{}",
                a.date.map(validator::human_date).unwrap_or_default(),
                a.time.map(validator::human_time).unwrap_or_default(),
                a.reason
                    .as_deref()
                    .map(|r| format!(" ({r})"))
                    .unwrap_or_default(),
            )
        })
        .collect();

    if upcoming.is_empty() {
        return Ok(CommitOutcome::Completed(format!(
            "I don't see any upcoming appointments for {customer_id}."
        )));
    }
    Ok(CommitOutcome::Completed(format!(
        "Here's what I have for {customer_id}:\n{}",
        upcoming.join("\n")
    )))
}

fn is_farewell(message: &str) -> bool {
    let lower = message.to_lowercase();
    ["bye", "goodbye", "exit", "quit"].iter().any(|w| {
        lower
            .split_whitespace()
            .any(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric()) == *w)
    })
}

fn goodbye(conv: &Conversation) -> String {
    match &conv.draft.name {
        Some(name) => format!("Thanks, {name}! Have a great day!"),
        None => "Thanks for contacting Smile Dental. Goodbye!".to_string(),
    }
}
