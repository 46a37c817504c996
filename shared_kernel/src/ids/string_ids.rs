/// Declares a string-backed newtype key such as a group code.
#[macro_export]
macro_rules! string_key {
    ($TypeName: ident) => {
        #[derive(
            Clone,
            Debug,
            Default,
            Eq,
            Hash,
            Ord,
            PartialEq,
            PartialOrd,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $TypeName(String);

        impl $TypeName {
            pub fn new(value: impl Into<String>) -> Self {
                $TypeName(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl PartialEq<str> for $TypeName {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $TypeName {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::fmt::Display for $TypeName {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $TypeName {
            fn from(value: String) -> Self {
                $TypeName(value)
            }
        }

        impl From<&str> for $TypeName {
            fn from(value: &str) -> Self {
                $TypeName(value.to_owned())
            }
        }

        impl From<$TypeName> for String {
            fn from(value: $TypeName) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $TypeName {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}
