//! AWS Query protocol parameter serialization.

/// Percent-encodes a string per RFC 3986.
///
/// Unreserved characters (A-Z, a-z, 0-9, '-', '.', '_', '~') are NOT encoded.
/// All other characters are encoded as `%XX` (uppercase hex).
/// Spaces become `%20` (NOT `+`).
pub(crate) fn percent_encode(s: &str) -> String {
    let mut encoded = String::with_capacity(s.len() * 2);
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    encoded
}

/// Encodes `(key, value)` pairs as an `application/x-www-form-urlencoded` body.
pub(crate) fn form_body<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Accumulates flattened Query parameters in insertion order.
///
/// Lists use the `Name.member.N` convention with 1-based indices.
#[derive(Debug, Default)]
pub struct QueryWriter {
    params: Vec<(String, String)>,
}

impl QueryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    /// Writes `prefix.member.N=value` for each scalar item.
    pub fn push_list<V: ToString>(&mut self, prefix: &str, items: &[V]) -> &mut Self {
        for (i, item) in items.iter().enumerate() {
            self.push(format!("{}.member.{}", prefix, i + 1), item.to_string());
        }
        self
    }

    /// Writes `prefix.member.N.Field=value` for each structured item.
    pub fn push_struct_list<T>(
        &mut self,
        prefix: &str,
        items: &[T],
        mut fields: impl FnMut(&T) -> Vec<(&'static str, String)>,
    ) -> &mut Self {
        for (i, item) in items.iter().enumerate() {
            for (field, value) in fields(item) {
                self.push(format!("{}.member.{}.{}", prefix, i + 1, field), value);
            }
        }
        self
    }

    pub fn finish(self) -> Vec<(String, String)> {
        self.params
    }
}
