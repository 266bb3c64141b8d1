//! Macro for implementing Display and FromStr for string-tagged enums
//!
//! Roles and calendar actions travel as lowercase strings (history files,
//! model output). This macro keeps the mapping in one place.
//!
//! # Example
//!
//! ```rust
//! use famcal_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Reminder {
//!     None,
//!     Popup,
//!     Email,
//! }
//!
//! impl_domain_status_conversions!(Reminder {
//!     None => "none",
//!     Popup => "popup",
//!     Email => "email",
//! });
//!
//! assert_eq!(Reminder::Popup.to_string(), "popup");
//! assert_eq!("EMAIL".parse::<Reminder>(), Ok(Reminder::Email));
//! ```

/// Implements Display and FromStr traits for string-tagged enums
///
/// - Display writes the mapped lowercase string
/// - FromStr parses case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
