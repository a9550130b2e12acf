//! Newtype IDs for type-safe entity references.
//!
//! The backend identifies documents with opaque string ids (`_id`). Use the
//! `define_id!` macro to create wrappers that prevent accidentally mixing ids
//! from different entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `Display`, `From<String>`, `From<&str>`
///
/// # Example
///
/// ```rust
/// # use booking_console_core::define_id;
/// define_id!(ReviewId);
/// define_id!(InvoiceId);
///
/// let review = ReviewId::new("66f1c0ffee");
/// assert_eq!(review.as_str(), "66f1c0ffee");
///
/// // These are different types, so this won't compile:
/// // let _: ReviewId = InvoiceId::new("66f1c0ffee");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying id.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying id.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(BookingId);
define_id!(DiscountId);
define_id!(ContactId);
define_id!(PhoneLeadId);

impl BookingId {
    /// Short human-facing reference: the last six characters, uppercased.
    ///
    /// Used when a booking has no booking number.
    #[must_use]
    pub fn short_ref(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let start = chars.len().saturating_sub(6);
        chars
            .get(start..)
            .unwrap_or_default()
            .iter()
            .collect::<String>()
            .to_uppercase()
    }
}
