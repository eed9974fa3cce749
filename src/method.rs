use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// HTTP verbs exposed by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    /// Every supported verb, in verb-table order
    pub const ALL: [Method; 7] = [
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Patch,
        Method::Delete,
        Method::Options,
    ];

    /// Lowercase method name, as placed in the transport options
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Head => "head",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Options => "options",
        }
    }

    /// Query methods carry their payload in the URL instead of the body
    pub fn is_query(&self) -> bool {
        matches!(self, Method::Get | Method::Head)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid_request(format!("Unsupported HTTP method: {}", s)))
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Head => http::Method::HEAD,
            Method::Post => http::Method::POST,
            Method::Put => http::Method::PUT,
            Method::Patch => http::Method::PATCH,
            Method::Delete => http::Method::DELETE,
            Method::Options => http::Method::OPTIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_methods() {
        let query: Vec<_> = Method::ALL.into_iter().filter(Method::is_query).collect();
        assert_eq!(query, vec![Method::Get, Method::Head]);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("PATCH".parse::<Method>().unwrap(), Method::Patch);
        assert_eq!("delete".parse::<Method>().unwrap(), Method::Delete);
        assert!("trace".parse::<Method>().is_err());
    }

    #[test]
    fn test_into_http_method() {
        assert_eq!(http::Method::from(Method::Options), http::Method::OPTIONS);
        assert_eq!(Method::Get.to_string(), "get");
    }
}
