// Saved item lists - per-feature collections of user-saved artifacts

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SavedListKind {
    Dogs,
    Cats,
    Jokes,
}

impl SavedListKind {
    pub const ALL: [SavedListKind; 3] = [Self::Dogs, Self::Cats, Self::Jokes];

    /// Storage key the list is persisted under
    pub fn storage_key(&self) -> &'static str {
        match self {
            Self::Dogs => "savedDogs",
            Self::Cats => "savedCats",
            Self::Jokes => "savedJokes",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Dogs => "Saved Dogs",
            Self::Cats => "Saved Cats",
            Self::Jokes => "Saved Jokes",
        }
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            Self::Dogs => "No saved dog images.",
            Self::Cats => "No saved cat images.",
            Self::Jokes => "No saved jokes.",
        }
    }

    /// Whether items are image URLs (true) or text snippets (false)
    pub fn holds_images(&self) -> bool {
        matches!(self, Self::Dogs | Self::Cats)
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dog" | "dogs" => Some(Self::Dogs),
            "cat" | "cats" => Some(Self::Cats),
            "joke" | "jokes" => Some(Self::Jokes),
            _ => None,
        }
    }
}

/// Append-only list of opaque strings. A reset drops the stored list whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedItemList {
    items: Vec<String>,
}

impl SavedItemList {
    pub fn new(items: Vec<String>) -> Self {
        Self { items }
    }

    pub fn push(&mut self, item: String) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
