pub mod chat;
pub mod jobs;
