//! Core identifier types for tapwatch.
//!
//! Every record kind is keyed by an opaque string that is unique within its
//! kind. The newtypes below keep a school id from being passed where a location
//! id is expected, while staying byte-for-byte identical to the stored string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Maximum accepted identifier length in bytes.
pub const MAX_ID_LEN: usize = 128;

/// Behaviour shared by all record identifiers.
pub trait RecordId:
    Clone + Eq + Hash + fmt::Debug + fmt::Display + Serialize + Send + Sync + 'static
{
    /// Parse and validate an identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty, too long, or contains
    /// control characters.
    fn parse(value: impl Into<String>) -> Result<Self, IdError>;

    /// Return the identifier as a string slice.
    fn as_str(&self) -> &str;
}

fn validate(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.len() > MAX_ID_LEN {
        return Err(IdError::TooLong {
            max: MAX_ID_LEN,
            got: value.len(),
        });
    }
    if value.chars().any(char::is_control) {
        return Err(IdError::ControlCharacter);
    }
    Ok(())
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create an identifier, validating its contents.
            ///
            /// # Errors
            ///
            /// Returns an error if the identifier is empty, too long, or
            /// contains control characters.
            pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                validate(&value)?;
                Ok(Self(value))
            }

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Return the raw bytes of the identifier.
            #[must_use]
            pub fn as_bytes(&self) -> &[u8] {
                self.0.as_bytes()
            }
        }

        impl RecordId for $name {
            fn parse(value: impl Into<String>) -> Result<Self, IdError> {
                Self::new(value)
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

record_id! {
    /// Identifier of a `Location` record.
    LocationId
}

record_id! {
    /// Identifier of a `School` record.
    SchoolId
}

record_id! {
    /// Identifier of a `TapConnection` record.
    TapConnectionId
}

record_id! {
    /// Identifier of an `InfrastructureProject` record.
    ProjectId
}

record_id! {
    /// Identifier of a `Registration` record.
    RegistrationId
}

record_id! {
    /// Identifier of a `Feedback` record.
    FeedbackId
}

record_id! {
    /// Identifier of an `Activity` log entry.
    ActivityId
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The identifier is an empty string.
    #[error("identifier is empty")]
    Empty,

    /// The identifier exceeds the maximum length.
    #[error("identifier too long: at most {max} bytes, got {got}")]
    TooLong {
        /// The maximum number of bytes.
        max: usize,
        /// The actual number of bytes.
        got: usize,
    },

    /// The identifier contains a control character (including NUL).
    #[error("identifier contains a control character")]
    ControlCharacter,
}
