pub mod chat_responder;
pub mod quotation_engine;
