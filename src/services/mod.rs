pub mod ai;
pub mod calendar;
pub mod conversation;
pub mod extractor;
pub mod sessions;
pub mod validator;
