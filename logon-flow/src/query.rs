use url::form_urlencoded;

/// Prompt value asking for the account chooser
pub const PROMPT_SELECT_ACCOUNT: &str = "select_account";

/// Parsed request query, in the order the parameters appeared
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    /// Parse a search string with or without the leading `?`
    pub fn parse(search: &str) -> Self {
        let raw = search.strip_prefix('?').unwrap_or(search);
        Self {
            params: form_urlencoded::parse(raw.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.remove(key);
        self.params.push((key.to_string(), value.to_string()));
    }

    pub fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn prompt(&self) -> Option<&str> {
        self.get("prompt")
    }

    pub fn flow(&self) -> Option<&str> {
        self.get("flow")
    }

    pub fn continue_uri(&self) -> Option<&str> {
        self.get("continue")
    }

    /// Whether `prompt` lists `value`. Prompt is a space separated list.
    pub fn has_prompt(&self, value: &str) -> bool {
        self.prompt()
            .map(|p| p.split_whitespace().any(|v| v == value))
            .unwrap_or(false)
    }

    pub fn wants_account_selection(&self) -> bool {
        self.has_prompt(PROMPT_SELECT_ACCOUNT)
    }

    /// Serialize back to `a=1&b=2` form (no leading `?`)
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish()
    }
}
