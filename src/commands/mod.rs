mod config_cmd;
mod dashboard;
mod resource;

pub use config_cmd::ConfigCommand;
pub use dashboard::DashboardCommand;
pub use resource::ResourceCommand;
