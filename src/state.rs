use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::calendar::CalendarProvider;
use crate::services::sessions::SessionRegistry;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub llm: Box<dyn LlmProvider>,
    pub calendar: Box<dyn CalendarProvider>,
    pub sessions: SessionRegistry,
}

impl AppState {
    /// "Today" for booking-window and relative-date math.
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}
