//! Request parameter signing

use std::fmt;
use zeroize::Zeroize;

/// Form field carrying the application API key
pub(crate) const API_KEY_PARAM: &str = "key";
/// Form field carrying the user session id
pub(crate) const SESSION_ID_PARAM: &str = "sessionid";

/// Ordered, duplicate-free form fields for one API call
///
/// Values are zeroized on drop since they routinely hold the API key,
/// session ids and passwords.
#[derive(Default)]
pub(crate) struct FormParams {
    pairs: Vec<(String, String)>,
}

impl FormParams {
    /// Sign caller parameters with the API key and optional session id
    ///
    /// A caller-supplied `key` or `sessionid` replaces the signed value in place.
    pub fn signed<I, K, V>(api_key: &str, session_id: Option<&str>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut form = Self::default();
        form.insert(API_KEY_PARAM, api_key);
        if let Some(session_id) = session_id.filter(|id| !id.is_empty()) {
            form.insert(SESSION_ID_PARAM, session_id);
        }
        for (name, value) in params {
            form.insert(name.as_ref(), value.as_ref());
        }
        form
    }

    /// Set a field, replacing any earlier value with the same name
    pub fn insert(&mut self, name: &str, value: &str) {
        match self.pairs.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => {
                slot.zeroize();
                slot.push_str(value);
            }
            None => self.pairs.push((name.to_owned(), value.to_owned())),
        }
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

impl fmt::Debug for FormParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.pairs.iter().map(|(name, _)| (name, "<redacted>")))
            .finish()
    }
}

impl Drop for FormParams {
    fn drop(&mut self) {
        for (_, value) in &mut self.pairs {
            value.zeroize();
        }
    }
}
