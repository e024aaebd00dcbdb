mod boot;
mod migrate;
mod status;

pub use boot::run_boot;
pub use migrate::run_migrate;
pub use status::run_status;
