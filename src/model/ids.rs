use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(s: impl Into<String>) -> Self {
                let id = s.into();
                assert!(!id.is_empty(), "{} cannot be empty", stringify!($name));
                Self(id)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

id_newtype!(SessionId);
id_newtype!(MessageId);
id_newtype!(PartId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "SessionId cannot be empty")]
    fn session_id_empty_string_panics() {
        SessionId::new("");
    }

    #[test]
    #[should_panic(expected = "PartId cannot be empty")]
    fn part_id_empty_string_panics() {
        PartId::new("");
    }

    #[test]
    fn message_id_from_str() {
        let id: MessageId = "msg_1".into();
        assert_eq!(id.as_str(), "msg_1");
        assert_eq!(id, "msg_1");
    }

    #[test]
    fn session_id_deserializes_transparently() {
        let id: SessionId = serde_json::from_str("\"ses_abc\"").unwrap();
        assert_eq!(id.to_string(), "ses_abc");
    }
}
