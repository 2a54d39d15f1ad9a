//! Macro for implementing Display and FromStr for label enums
//!
//! Error kinds and write modes are logged and parsed by stable lowercase
//! labels. This macro provides both directions from a single mapping table.
//!
//! # Example
//!
//! ```rust
//! use ordersheet_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum DeliveryState {
//!     Received,
//!     Written,
//!     Rejected,
//! }
//!
//! impl_domain_status_conversions!(DeliveryState {
//!     Received => "received",
//!     Written => "written",
//!     Rejected => "rejected",
//! });
//!
//! assert_eq!(DeliveryState::Written.to_string(), "written");
//! ```

/// Implements Display and FromStr traits for label enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase labels
///
/// Parsing is case-insensitive; output is always the label as written.
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

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
