use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Invalid scheme '{0}', only 'http' & 'https' are allowed")]
    InvalidScheme(String),
    #[error("The Url has to be a base, i.e. `data:`, `mailto:` etc. are not allowed")]
    ShouldBeABase,
    #[error("Having a fragment (i.e. `#fragment`) is not allowed")]
    HasFragment,
    #[error("Having query parameters (i.e. `?query_param=value`) is not allowed")]
    HasQuery,
    #[error("Parsing the url: {0}")]
    Parsing(#[from] url::ParseError),
}

/// Base URL every API request path is joined onto, e.g.
/// `https://admob.googleapis.com/v1alpha/`.
///
/// On top of [`url::Url`]'s own validation it only admits `http`/`https`
/// base URLs without a query or a fragment, and it always stores the path
/// `/` suffixed so joining a relative endpoint cannot swallow the version
/// segment.
#[derive(Clone, Hash, Ord, PartialOrd, Eq, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Url", into = "Url")]
pub struct ApiUrl(Url);

impl ApiUrl {
    pub fn parse(input: &str) -> Result<Self, Error> {
        input.parse()
    }

    /// Joins a relative endpoint, which may carry its own query, onto the
    /// base. A leading `/` on the endpoint is stripped first, otherwise it
    /// would wipe the base path.
    pub fn join(&self, endpoint: &str) -> Result<Url, Error> {
        let relative = endpoint.strip_prefix('/').unwrap_or(endpoint);

        Ok(self.0.join(relative)?)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiUrl({})", self)
    }
}

impl TryFrom<Url> for ApiUrl {
    type Error = Error;

    fn try_from(mut url: Url) -> Result<Self, Self::Error> {
        if url.cannot_be_a_base() {
            return Err(Error::ShouldBeABase);
        }

        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(Error::InvalidScheme(scheme.to_string())),
        }

        if url.query().is_some() {
            return Err(Error::HasQuery);
        }

        if url.fragment().is_some() {
            return Err(Error::HasFragment);
        }

        if !url.path().ends_with('/') {
            let mut path = url.path().to_string();
            path.push('/');
            url.set_path(&path);
        }

        Ok(Self(url))
    }
}

impl From<ApiUrl> for Url {
    fn from(api_url: ApiUrl) -> Self {
        api_url.0
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::try_from(input.parse::<Url>()?)
    }
}
