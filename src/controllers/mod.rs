pub mod chat_controller;
pub mod quotation_controller;
pub mod system_controller;

use std::time::Duration;

/// UX pacing configured per endpoint. Not a cancellation point: the work
/// that follows always runs to completion.
pub(crate) async fn pace(delay_ms: u64) {
    if delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }
}
