// src/exit.rs
//! Process exit codes for `nbclone`.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum NbcloneExit {
    /// All requested reports were written.
    Success = 0,
    /// Generic error (I/O, config, report writing).
    Error = 1,
    /// Input paths missing or unusable.
    InvalidInput = 2,
}

impl NbcloneExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Termination for NbcloneExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(NbcloneExit::Success.code(), 0);
        assert_eq!(NbcloneExit::Error.code(), 1);
        assert_eq!(NbcloneExit::InvalidInput.code(), 2);
    }
}
