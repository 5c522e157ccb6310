pub mod commands;
pub mod install;
