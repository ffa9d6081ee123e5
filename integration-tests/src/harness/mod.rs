mod records;
pub mod ferry;
pub mod log_capture;

pub use ferry::{RunningFerry, free_port, read_lines, wait_for_lines};
pub use log_capture::{CapturedEvent, captured_messages, init_test_tracing, wait_for_message};
pub use records::{caddy_record, caddy_records};
