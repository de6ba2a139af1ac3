use std::str::FromStr;
use thiserror::Error;

/// A user action on a delivered reminder, decoded from the transport's
/// compact encoding: `"taken"`, `"skip"` or `"snooze:<minutes>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeAction {
    Taken,
    Skip,
    Snooze { minutes: i64 },
}

#[derive(Error, Debug)]
pub enum InvalidIntakeAction {
    #[error("Intake action: {0} is malformed, expected taken, skip or snooze:<minutes>")]
    Malformed(String),
}

impl FromStr for IntakeAction {
    type Err = InvalidIntakeAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "taken" => return Ok(IntakeAction::Taken),
            "skip" => return Ok(IntakeAction::Skip),
            _ => (),
        }

        let minutes = s
            .strip_prefix("snooze:")
            .and_then(|minutes| minutes.parse::<i64>().ok())
            .filter(|minutes| *minutes > 0)
            .ok_or_else(|| InvalidIntakeAction::Malformed(s.to_string()))?;
        Ok(IntakeAction::Snooze { minutes })
    }
}
