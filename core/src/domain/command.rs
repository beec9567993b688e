//! Lifecycle commands accepted by the controller.

use std::str::FromStr;

use crate::error::Error;

/// One of the four operations the controller can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleCommand {
    #[default]
    Start,
    Stop,
    Restart,
    Status,
}

impl LifecycleCommand {
    /// All available commands, in the order they are listed to users.
    pub const ALL: [LifecycleCommand; 4] = [
        LifecycleCommand::Start,
        LifecycleCommand::Stop,
        LifecycleCommand::Restart,
        LifecycleCommand::Status,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LifecycleCommand::Start => "start",
            LifecycleCommand::Stop => "stop",
            LifecycleCommand::Restart => "restart",
            LifecycleCommand::Status => "status",
        }
    }

    /// Comma separated list of command names, for usage messages.
    pub fn available() -> String {
        Self::ALL
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for LifecycleCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| Error::UnknownCommand(lower))
    }
}

impl std::fmt::Display for LifecycleCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("start".parse::<LifecycleCommand>().unwrap(), LifecycleCommand::Start);
        assert_eq!("STOP".parse::<LifecycleCommand>().unwrap(), LifecycleCommand::Stop);
        assert_eq!("ReStArT".parse::<LifecycleCommand>().unwrap(), LifecycleCommand::Restart);
        assert_eq!("Status".parse::<LifecycleCommand>().unwrap(), LifecycleCommand::Status);
    }

    #[test]
    fn test_unknown_command() {
        let err = "deploy".parse::<LifecycleCommand>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown command: deploy");
    }

    #[test]
    fn test_default_is_start() {
        assert_eq!(LifecycleCommand::default(), LifecycleCommand::Start);
        assert_eq!(LifecycleCommand::available(), "start, stop, restart, status");
    }
}
