pub mod indicator_worker;
pub mod schedule;
pub mod token_worker;

pub use indicator_worker::run as run_indicator_worker;
pub use schedule::RefreshSchedule;
pub use token_worker::run as run_token_worker;
