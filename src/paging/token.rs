use std::fmt;

use serde::{Deserialize, Serialize};

/// Delimiter joining token components in the wire form.
///
/// There is no escaping: a component value containing the delimiter corrupts
/// the token's component boundaries on decode. Callers must only page on
/// columns whose encoded values cannot contain `,` (or re-encode such values
/// before building the token).
pub const TOKEN_DELIMITER: char = ',';

/// An opaque token representing a paging position, returned to clients and
/// presented back to request the next page of a query.
///
/// The wire form is the single delimiter-joined string; serde serializes the
/// token transparently as that string. Absence of a token means no further
/// pages.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken {
    token: String,
}

impl PageToken {
    /// Wraps an already-encoded token string, as presented by a client.
    #[must_use]
    pub fn new<S>(token: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            token: token.into(),
        }
    }

    /// Encodes an ordered list of components into a token.
    #[must_use]
    pub fn from_components<I>(components: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        let token = components
            .into_iter()
            .map(|component| component.to_string())
            .collect::<Vec<_>>()
            .join(&TOKEN_DELIMITER.to_string());
        Self { token }
    }

    /// Splits the token back into its ordered components.
    #[must_use]
    pub fn components(&self) -> Vec<&str> {
        self.token.split(TOKEN_DELIMITER).collect()
    }

    /// Returns the encoded wire form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.token
    }
}

impl From<String> for PageToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::PageToken;

    #[test]
    fn construction_forms_agree() {
        let raw = PageToken::new("abc,def");
        let built = PageToken::from_components(["abc", "def"]);
        assert_eq!(raw, built);
        assert_eq!(raw.as_str(), "abc,def");
    }

    #[test]
    fn round_trip_preserves_order_and_count() {
        let components = vec!["abc", "123.45", "", "zzz"];
        let token = PageToken::from_components(components.clone());
        assert_eq!(token.components(), components);
    }

    #[test]
    fn mixed_component_types_encode_via_to_string() {
        let token = PageToken::from_components(vec![
            "abc".to_string(),
            42.to_string(),
            123.45.to_string(),
        ]);
        assert_eq!(token.as_str(), "abc,42,123.45");
    }

    #[test]
    fn serde_wire_form_is_the_bare_string() {
        let token = PageToken::from_components(["abc", "def"]);
        let serialized = serde_json::to_string(&token).unwrap();
        assert_eq!(serialized, "\"abc,def\"");
        let read: PageToken = serde_json::from_str(&serialized).unwrap();
        assert_eq!(read, token);
    }
}
