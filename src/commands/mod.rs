mod config_cmd;
mod guest;
mod report;
mod submit;

pub use config_cmd::ConfigCommand;
pub use guest::GuestCommand;
pub use report::ReportCommand;
pub use submit::SubmitCommand;
