//! Transaction outcome classification

use core::fmt;

use oledprobe_hal::StatusCode;

/// Outcome of a submitted transaction
///
/// Every driver status maps to exactly one variant; codes that are neither
/// success nor timeout are kept verbatim in [`CommandResult::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandResult {
    /// Transaction completed, all checked bytes acknowledged
    Ok,
    /// Transaction did not complete within its timeout
    Timeout,
    /// Any other driver failure, with the raw code
    Other(StatusCode),
}

impl CommandResult {
    /// Classify a raw driver status
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::OK => CommandResult::Ok,
            StatusCode::TIMEOUT => CommandResult::Timeout,
            other => CommandResult::Other(other),
        }
    }

    /// Check for success
    pub fn is_ok(&self) -> bool {
        matches!(self, CommandResult::Ok)
    }

    /// The driver status this result was classified from
    pub fn status(&self) -> StatusCode {
        match self {
            CommandResult::Ok => StatusCode::OK,
            CommandResult::Timeout => StatusCode::TIMEOUT,
            CommandResult::Other(code) => *code,
        }
    }
}

impl From<StatusCode> for CommandResult {
    fn from(status: StatusCode) -> Self {
        Self::from_status(status)
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Ok => write!(f, "OK"),
            CommandResult::Timeout => write!(f, "TIMEOUT"),
            CommandResult::Other(code) => write!(f, "UNKNOWN {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ok_and_timeout() {
        assert_eq!(CommandResult::from_status(StatusCode::OK), CommandResult::Ok);
        assert_eq!(
            CommandResult::from_status(StatusCode::TIMEOUT),
            CommandResult::Timeout
        );
    }

    #[test]
    fn test_other_keeps_code() {
        let result = CommandResult::from_status(StatusCode::FAIL);
        assert_eq!(result, CommandResult::Other(StatusCode::FAIL));
        assert_eq!(result.status(), StatusCode(-1));
        assert!(!result.is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(CommandResult::Ok.to_string(), "OK");
        assert_eq!(CommandResult::Timeout.to_string(), "TIMEOUT");
        assert_eq!(CommandResult::Other(StatusCode(5)).to_string(), "UNKNOWN 5");
        assert_eq!(
            CommandResult::Other(StatusCode::FAIL).to_string(),
            "UNKNOWN -1"
        );
    }

    proptest! {
        #[test]
        fn classification_is_total(code in any::<i32>()) {
            let result = CommandResult::from_status(StatusCode(code));
            match code {
                0 => prop_assert_eq!(result, CommandResult::Ok),
                0x107 => prop_assert_eq!(result, CommandResult::Timeout),
                _ => prop_assert_eq!(result, CommandResult::Other(StatusCode(code))),
            }
            // The raw status always survives classification
            prop_assert_eq!(result.status(), StatusCode(code));
        }
    }
}
