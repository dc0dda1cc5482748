//! Process execution: the interactive recovery shell.

pub mod emergency_shell;

pub use emergency_shell::EmergencyShellHandler;
