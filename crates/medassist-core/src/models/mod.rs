pub mod patient;
pub mod setting;
