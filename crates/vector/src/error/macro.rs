// Copyright (c) reifydb.com 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

/// Macro to create an Error from a diagnostic function call
///
/// Usage: `error!(diagnostic_function(args))`
/// Expands to: `Error(diagnostic_function(args))`
#[macro_export]
macro_rules! error {
    ($diagnostic:expr) => {
        $crate::error::Error($diagnostic)
    };
}

/// Macro to return an error from a diagnostic function call
///
/// Usage: `return_error!(diagnostic_function(args))`
/// Expands to: `return Err(Error(diagnostic_function(args)))`
#[macro_export]
macro_rules! return_error {
    ($diagnostic:expr) => {
        return Err($crate::error::Error($diagnostic))
    };
}

/// Macro to create an Err(Error()) from a diagnostic function call
///
/// Usage: `err!(diagnostic_function(args))`
/// Expands to: `Err(Error(diagnostic_function(args)))`
#[macro_export]
macro_rules! err {
    ($diagnostic:expr) => {
        Err($crate::error::Error($diagnostic))
    };
}

#[cfg(test)]
mod tests {
    use crate::error::diagnostic::decimal::decimal_overflow;
    use crate::error::Error;

    #[test]
    fn test_error_macro() {
        let err = error!(decimal_overflow(1, (10, 2), (6, 2)));
        assert!(matches!(err, Error(_)));
        assert_eq!(err.diagnostic().code, "DECIMAL_001");
    }

    #[test]
    fn test_return_error_macro() {
        fn failing() -> crate::Result<()> {
            return_error!(decimal_overflow(1, (10, 2), (6, 2)));
        }

        let result = failing();
        assert!(result.is_err());
    }

    #[test]
    fn test_err_macro() {
        let result: crate::Result<()> = err!(decimal_overflow(1, (10, 2), (6, 2)));
        assert!(result.is_err());
    }
}
