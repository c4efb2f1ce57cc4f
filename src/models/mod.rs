pub mod chat;
pub mod quotation;
pub mod system;
