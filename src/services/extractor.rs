use chrono::NaiveDate;

use crate::models::conversation::ConversationMessage;
use crate::models::fields::{AppointmentDraft, Field};
use crate::models::intent::{ExtractedFields, UtteranceIntent};
use crate::services::ai::{LlmProvider, Message};
use crate::services::validator;

const SYSTEM_PROMPT: &str = r#"You are a field extraction engine for a dental appointment assistant. Analyze the patient's latest message in context of the conversation history.

Return ONLY valid JSON (no markdown, no explanation) with this exact structure:
{
  "intent": "book|reschedule|cancel|view|confirm|decline|unknown",
  "returning": true,
  "customer_id": "customer ID like CUST007 or null",
  "name": "extracted name or null",
  "phone": "digits only or null",
  "date": "date like 2026-01-15 or null",
  "time": "time like 11:00 AM or null",
  "new_date": "NEW date for a reschedule or null",
  "new_time": "NEW time for a reschedule or null",
  "reason": "reason for the visit or null"
}

Intent rules:
- "book": patient wants a new appointment
- "reschedule": patient wants to move an existing appointment
- "cancel": patient wants to cancel an existing appointment
- "view": patient wants to see their appointments
- "confirm": patient says yes/ok/correct/go ahead to a proposal
- "decline": patient says no/that's wrong to a proposal
- "unknown": can't determine

Extraction rules:
- Convert any date phrasing to YYYY-MM-DD and any time to HH:MM AM/PM.
- Phone numbers: digits only, no spaces or dashes.
- Names: handle "my name is X", "I'm X", "it's X", "X speaking".
- "returning": true if the patient says they are a returning/existing patient, false if they say they are new, omit otherwise.
- For a RESCHEDULE, "date"/"time" are the EXISTING appointment and "new_date"/"new_time" are where it should move.
- Extract only what the message actually contains. Never invent values.
"#;

/// Ask the LLM to fill missing slots from the latest utterance. Falls back
/// to the rule-based extractor when the provider or its output fails, so a
/// turn always produces a (possibly empty) field set.
pub async fn extract_fields(
    llm: &dyn LlmProvider,
    history: &[ConversationMessage],
    latest_message: &str,
    draft: &AppointmentDraft,
    awaiting: Option<Field>,
    today: NaiveDate,
) -> ExtractedFields {
    let mut messages: Vec<Message> = history
        .iter()
        .map(|m| Message {
            role: m.role.clone(),
            content: m.content.clone(),
        })
        .collect();
    messages.push(Message {
        role: "user".to_string(),
        content: latest_message.to_string(),
    });

    let known = serde_json::to_string(draft).unwrap_or_else(|_| "{}".to_string());
    let mut context = format!(
        "\nContext:\n- Today is {today}.\n- Fields already known: {known}"
    );
    if let Some(field) = awaiting {
        context.push_str(&format!(
            "\n- IMPORTANT: the patient was just asked for '{}'. Map their answer to that field.",
            field.as_str()
        ));
        match field {
            Field::NewDate => context.push_str(" Put the date in 'new_date', NOT 'date'."),
            Field::NewTime => context.push_str(" Put the time in 'new_time', NOT 'time'."),
            Field::Date => context.push_str(" This is the EXISTING appointment date."),
            Field::Time => context.push_str(" This is the EXISTING appointment time."),
            Field::Reason => {
                context.push_str(" If in doubt, take the whole message as the reason.")
            }
            _ => {}
        }
    }

    let system = format!("{SYSTEM_PROMPT}{context}");

    match llm.chat(&system, &messages).await {
        Ok(response) => parse_response(&response)
            .unwrap_or_else(|| {
                tracing::warn!("unparseable extractor response, using rule-based fallback");
                rule_based(latest_message, awaiting, today)
            })
            .cleaned(),
        Err(e) => {
            tracing::warn!(error = %e, "LLM call failed, using rule-based fallback");
            rule_based(latest_message, awaiting, today).cleaned()
        }
    }
}

/// Accepts raw JSON, markdown-fenced JSON, or JSON embedded in prose.
fn parse_response(response: &str) -> Option<ExtractedFields> {
    if let Ok(fields) = serde_json::from_str::<ExtractedFields>(response) {
        return Some(fields);
    }

    let cleaned = response
        .trim()
        .strip_prefix("```json")
        .or_else(|| response.trim().strip_prefix("```"))
        .unwrap_or(response.trim());
    let cleaned = cleaned.strip_suffix("```").unwrap_or(cleaned).trim();

    if let Ok(fields) = serde_json::from_str::<ExtractedFields>(cleaned) {
        return Some(fields);
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if start < end {
            if let Ok(fields) = serde_json::from_str::<ExtractedFields>(&cleaned[start..=end]) {
                return Some(fields);
            }
        }
    }

    None
}

/// Deterministic extractor used when the LLM is unreachable or returns
/// garbage, and directly by tests. Keyword intents plus simple patterns,
/// with terse answers mapped onto the awaited field.
pub fn rule_based(text: &str, awaiting: Option<Field>, today: NaiveDate) -> ExtractedFields {
    let lower = text.to_lowercase();

    let intent = if lower.contains("resched") {
        Some(UtteranceIntent::Reschedule)
    } else if lower.contains("cancel") {
        Some(UtteranceIntent::Cancel)
    } else if lower.contains("book") || lower.contains("appointment") {
        Some(UtteranceIntent::Book)
    } else if lower.contains("view") || lower.contains("my appointments") {
        Some(UtteranceIntent::View)
    } else if is_affirmative(&lower) {
        Some(UtteranceIntent::Confirm)
    } else if is_negative(&lower) {
        Some(UtteranceIntent::Decline)
    } else {
        None
    };

    let returning = if lower.contains("returning") || lower.contains("existing patient") {
        Some(true)
    } else if lower.contains("new patient") || lower.contains("first time") {
        Some(false)
    } else {
        None
    };

    let customer_id = find_customer_id(text);
    let name = find_name(text);
    let phone = find_phone(text);
    let date = validator::normalize_date(text, today)
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string());
    let time = find_time(text);

    let mut fields = ExtractedFields {
        intent,
        returning,
        customer_id,
        ..Default::default()
    };

    // A bare answer to a direct question belongs to the awaited slot.
    match awaiting {
        Some(Field::NewDate) => fields.new_date = date,
        Some(Field::NewTime) => fields.new_time = time,
        Some(Field::Date) => fields.date = date,
        Some(Field::Time) => fields.time = time,
        Some(Field::Name) => fields.name = name.or_else(|| Some(text.trim().to_string())),
        Some(Field::Phone) => fields.phone = phone,
        Some(Field::CustomerId) => {} // already captured above
        Some(Field::Reason) => fields.reason = Some(text.trim().to_string()),
        Some(Field::PatientKind) | None => {
            fields.name = name;
            fields.phone = phone;
            fields.date = date;
            fields.time = time;
        }
    }

    fields
}

fn has_word(lower: &str, word: &str) -> bool {
    lower
        .split_whitespace()
        .any(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric()) == word)
}

fn is_affirmative(lower: &str) -> bool {
    ["yes", "yeah", "yep", "correct", "confirm", "sure", "ok", "okay", "y"]
        .iter()
        .any(|w| has_word(lower, w))
        || lower.contains("sounds good")
        || lower.contains("go ahead")
}

fn is_negative(lower: &str) -> bool {
    ["no", "nope", "wrong", "decline"].iter().any(|w| has_word(lower, w))
        || lower.contains("doesn't work")
}

fn find_customer_id(text: &str) -> Option<String> {
    let upper = text.to_uppercase();
    let idx = upper.find("CUST")?;
    let digits: String = upper[idx + 4..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(format!("CUST{digits}"))
}

fn find_name(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    for marker in ["my name is ", "i am ", "i'm ", "this is ", "it's "] {
        if let Some(idx) = lower.find(marker) {
            let rest = &text[idx + marker.len()..];
            let name: String = rest
                .chars()
                .take_while(|c| c.is_alphabetic() || c.is_whitespace())
                .collect();
            let name = name.trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}

/// The longest run of digits (ignoring separators) that looks like a phone
/// number.
fn find_phone(text: &str) -> Option<String> {
    let mut best = String::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if c == '-' || c == ' ' || c == '(' || c == ')' {
            continue;
        } else {
            if current.len() > best.len() {
                best = std::mem::take(&mut current);
            }
            current.clear();
        }
    }
    if current.len() > best.len() {
        best = current;
    }
    (best.len() >= 7).then_some(best)
}

/// Finds "10am", "2:15 pm", or 24-hour "14:30" style tokens. A bare number
/// needs a colon or an adjacent meridiem so ids and counts aren't misread.
fn find_time(text: &str) -> Option<String> {
    let tokens: Vec<String> = text
        .split_whitespace()
        .map(|t| t.trim_matches(',').to_lowercase().replace('.', ""))
        .collect();

    for (i, token) in tokens.iter().enumerate() {
        let timeish = !token.is_empty()
            && token.chars().all(|c| c.is_ascii_digit() || c == ':');
        let next_meridiem = matches!(
            tokens.get(i + 1).map(String::as_str),
            Some("am") | Some("pm")
        );

        let candidate = if token.len() > 2 && (token.ends_with("am") || token.ends_with("pm")) {
            token.clone()
        } else if timeish && next_meridiem {
            format!("{token} {}", tokens[i + 1])
        } else if timeish && token.contains(':') {
            token.clone()
        } else {
            continue;
        };

        if let Ok(time) = validator::normalize_time(&candidate) {
            return Some(validator::human_time(time));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::parse_from_str("2026-08-30", "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_valid_json() {
        let json = r#"{"intent":"book","returning":false,"customer_id":null,"name":"John Smith","phone":"5551234","date":"2026-09-01","time":"10:00 AM","new_date":null,"new_time":null,"reason":"cleaning"}"#;
        let fields = parse_response(json).unwrap();
        assert_eq!(fields.intent, Some(UtteranceIntent::Book));
        assert_eq!(fields.name.as_deref(), Some("John Smith"));
        assert_eq!(fields.reason.as_deref(), Some("cleaning"));
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"intent\":\"confirm\"}\n```";
        let fields = parse_response(raw).unwrap();
        assert_eq!(fields.intent, Some(UtteranceIntent::Confirm));
    }

    #[test]
    fn test_parse_embedded_json() {
        let raw = "Here you go: {\"intent\":\"cancel\",\"name\":\"Alice\"} hope that helps";
        let fields = parse_response(raw).unwrap();
        assert_eq!(fields.intent, Some(UtteranceIntent::Cancel));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_response("I cannot help with that").is_none());
    }

    #[test]
    fn test_rule_based_one_shot_booking() {
        let fields = rule_based(
            "book tomorrow at 10am, new patient, my name is John Smith, phone 555-1234567",
            None,
            today(),
        );
        assert_eq!(fields.intent, Some(UtteranceIntent::Book));
        assert_eq!(fields.returning, Some(false));
        assert_eq!(fields.name.as_deref(), Some("John Smith"));
        assert_eq!(fields.phone.as_deref(), Some("5551234567"));
        assert_eq!(fields.date.as_deref(), Some("2026-08-31"));
        assert_eq!(fields.time.as_deref(), Some("10:00 AM"));
    }

    #[test]
    fn test_rule_based_awaited_field_mapping() {
        let fields = rule_based("tomorrow", Some(Field::NewDate), today());
        assert_eq!(fields.new_date.as_deref(), Some("2026-08-31"));
        assert!(fields.date.is_none());

        let fields = rule_based("2:30 pm", Some(Field::NewTime), today());
        assert_eq!(fields.new_time.as_deref(), Some("2:30 PM"));

        let fields = rule_based("tooth ache", Some(Field::Reason), today());
        assert_eq!(fields.reason.as_deref(), Some("tooth ache"));
    }

    #[test]
    fn test_rule_based_customer_id() {
        let fields = rule_based("I'm returning, my id is cust007", None, today());
        assert_eq!(fields.returning, Some(true));
        assert_eq!(fields.customer_id.as_deref(), Some("CUST007"));
    }

    #[test]
    fn test_rule_based_confirm_decline() {
        assert_eq!(
            rule_based("yes please", None, today()).intent,
            Some(UtteranceIntent::Confirm)
        );
        assert_eq!(
            rule_based("no, that's wrong", None, today()).intent,
            Some(UtteranceIntent::Decline)
        );
    }

    #[test]
    fn test_cleaned_drops_blank_strings() {
        let fields = ExtractedFields {
            name: Some("  ".to_string()),
            phone: Some(" 5551234 ".to_string()),
            ..Default::default()
        }
        .cleaned();
        assert!(fields.name.is_none());
        assert_eq!(fields.phone.as_deref(), Some("5551234"));
    }
}
