// Fetch request domain model - retry policies, user input and payloads

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Exactly one attempt
    None,
    /// Retry up to `n` more times, on not-found responses only
    Bounded(u32),
    /// Keep going, with no backoff, until a valid payload arrives
    UntilSuccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InputError(pub String);

/// What a feature expects from the user before it may hit the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRule {
    None,
    Optional,
    /// First value must be non-blank, otherwise the message is shown
    Required(&'static str),
    /// First value must parse as a number
    Number(&'static str),
    /// First value must still be non-blank once `place_name` has cleaned it
    Place(&'static str),
}

/// Strip trailing punctuation that dictation tends to leave behind
pub fn place_name(raw: &str) -> &str {
    raw.trim().trim_end_matches(['.', ',', '!', '?', ';', ':']).trim_end()
}

impl InputRule {
    pub fn validate(&self, input: &FeatureInput) -> Result<(), InputError> {
        match self {
            InputRule::None | InputRule::Optional => Ok(()),
            InputRule::Required(message) => match input.first() {
                Some(_) => Ok(()),
                None => Err(InputError(message.to_string())),
            },
            InputRule::Number(message) => match input.first().map(str::parse::<f64>) {
                Some(Ok(n)) if n.is_finite() => Ok(()),
                _ => Err(InputError(message.to_string())),
            },
            InputRule::Place(message) => match input.first().map(place_name) {
                Some(name) if !name.is_empty() => Ok(()),
                _ => Err(InputError(message.to_string())),
            },
        }
    }
}

/// Positional values the user supplied for one action (text fields, selects)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureInput {
    values: Vec<String>,
}

impl FeatureInput {
    pub fn new(values: Vec<String>) -> Self {
        Self {
            values: values.into_iter().map(|v| v.trim().to_string()).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn single(value: &str) -> Self {
        Self::new(vec![value.to_string()])
    }

    /// First value, treating blank as absent
    pub fn first(&self) -> Option<&str> {
        self.get(0)
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.values
            .get(idx)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}
