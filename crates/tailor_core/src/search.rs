use std::fmt;

use url::Url;

/// Upper bound the search service accepts for `limit`.
pub const SEARCH_LIMIT_MAX: u32 = 100;

/// Raw search input as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    pub query: String,
    pub location: String,
    pub limit: u32,
    pub use_proxy: bool,
    pub proxy_url: String,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            query: String::new(),
            location: String::new(),
            limit: 20,
            use_proxy: false,
            proxy_url: String::new(),
        }
    }
}

/// Validated search parameters, safe to hand to the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub location: String,
    pub limit: u32,
    pub proxy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFormError {
    EmptyQuery,
    EmptyLocation,
    LimitOutOfRange { given: u32 },
    MissingProxyUrl,
    InvalidProxyUrl { given: String },
}

impl fmt::Display for SearchFormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFormError::EmptyQuery => write!(f, "search query must not be empty"),
            SearchFormError::EmptyLocation => write!(f, "location must not be empty"),
            SearchFormError::LimitOutOfRange { given } => {
                write!(f, "limit {given} outside 1..={SEARCH_LIMIT_MAX}")
            }
            SearchFormError::MissingProxyUrl => {
                write!(f, "proxy enabled but no proxy URL given")
            }
            SearchFormError::InvalidProxyUrl { given } => {
                write!(f, "proxy URL {given:?} is not an absolute URL")
            }
        }
    }
}

impl SearchForm {
    /// Validates the form before any network call is made. Whitespace-only
    /// fields count as empty; the proxy URL must parse as an absolute URL
    /// when the proxy toggle is on.
    pub fn validate(&self) -> Result<SearchParams, SearchFormError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(SearchFormError::EmptyQuery);
        }
        let location = self.location.trim();
        if location.is_empty() {
            return Err(SearchFormError::EmptyLocation);
        }
        if self.limit == 0 || self.limit > SEARCH_LIMIT_MAX {
            return Err(SearchFormError::LimitOutOfRange { given: self.limit });
        }
        let proxy = if self.use_proxy {
            let raw = self.proxy_url.trim();
            if raw.is_empty() {
                return Err(SearchFormError::MissingProxyUrl);
            }
            if Url::parse(raw).is_err() {
                return Err(SearchFormError::InvalidProxyUrl {
                    given: raw.to_string(),
                });
            }
            Some(raw.to_string())
        } else {
            None
        };
        Ok(SearchParams {
            query: query.to_string(),
            location: location.to_string(),
            limit: self.limit,
            proxy,
        })
    }
}
