pub mod completions;
pub mod config;
pub mod load;
pub mod login;
pub mod status;
pub mod up;
