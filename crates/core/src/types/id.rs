//! Identifier wrappers for catalog entities.
//!
//! The product dataset mixes numeric and string identifiers, and cart lines
//! persisted by older clients may carry either form. Use the `define_id!`
//! macro to create type-safe wrappers that accept both while keeping
//! different entity IDs from being mixed up.

/// Macro to define a type-safe `string | number` ID wrapper.
///
/// Creates an enum with `Number(i64)` and `Text(String)` variants:
/// - `Serialize`/`Deserialize` with `#[serde(untagged)]`, so JSON numbers stay
///   numbers and JSON strings stay strings
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Accessors: `as_number()`, `as_text()`
/// - `From<i64>`, `From<String>` and `From<&str>` implementations
///
/// Equality is exact: `Number(1)` and `Text("1")` are different IDs.
///
/// # Example
///
/// ```rust
/// # use boutique_core::define_id;
/// define_id!(ProductId);
/// define_id!(CategoryId);
///
/// let product_id = ProductId::from(1);
/// let category_id = CategoryId::from(1);
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = category_id;
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(untagged)]
        pub enum $name {
            /// Numeric identifier.
            Number(i64),
            /// String identifier.
            Text(String),
        }

        impl $name {
            /// Get the numeric value, if this is a numeric ID.
            #[must_use]
            pub const fn as_number(&self) -> Option<i64> {
                match self {
                    Self::Number(n) => Some(*n),
                    Self::Text(_) => None,
                }
            }

            /// Get the string value, if this is a string ID.
            #[must_use]
            pub fn as_text(&self) -> Option<&str> {
                match self {
                    Self::Number(_) => None,
                    Self::Text(s) => Some(s.as_str()),
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self {
                    Self::Number(n) => write!(f, "{n}"),
                    Self::Text(s) => f.write_str(s),
                }
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::Number(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::Text(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::Text(id.to_owned())
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(VariantId);
define_id!(CategoryId);
