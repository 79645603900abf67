//! Macro for implementing Display and FromStr for closed string enums
//!
//! Roles, task statuses, collections and preference values are all stored as
//! fixed lowercase strings. This macro provides a single implementation for
//! both Display and FromStr with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use skytrack_domain::impl_domain_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Weekday {
//!     Monday,
//!     Tuesday,
//! }
//!
//! impl_domain_enum_conversions!(Weekday {
//!     Monday => "monday",
//!     Tuesday => "tuesday",
//! });
//!
//! assert_eq!(Weekday::Monday.to_string(), "monday");
//! assert_eq!("TUESDAY".parse::<Weekday>(), Ok(Weekday::Tuesday));
//! ```

/// Implements Display, FromStr and `as_str` for string-backed enums
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
#[macro_export]
macro_rules! impl_domain_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Stable string representation used in persisted documents.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
