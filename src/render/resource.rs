/// Kind of sub-request issued while a page loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Document,
    Script,
    Xhr,
    Fetch,
    Image,
    Font,
    Media,
    Stylesheet,
    Other,
}

impl ResourceType {
    /// Parses a resource type name as used in configuration (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "document" => Some(Self::Document),
            "script" => Some(Self::Script),
            "xhr" => Some(Self::Xhr),
            "fetch" => Some(Self::Fetch),
            "image" => Some(Self::Image),
            "font" => Some(Self::Font),
            "media" => Some(Self::Media),
            "stylesheet" => Some(Self::Stylesheet),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Returns the configuration name of this resource type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Script => "script",
            Self::Xhr => "xhr",
            Self::Fetch => "fetch",
            Self::Image => "image",
            Self::Font => "font",
            Self::Media => "media",
            Self::Stylesheet => "stylesheet",
            Self::Other => "other",
        }
    }

    /// Parses a list of names, silently skipping unknown ones
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Vec<Self> {
        names
            .iter()
            .filter_map(|name| Self::from_name(name.as_ref()))
            .collect()
    }
}
