use crate::{Error, ErrorKind, Message, Result};
use http::header::{HeaderName, CONTENT_TYPE};

/// A single entry of the signed component list.
///
/// Derived components start with `@` and are computed from message metadata;
/// header components carry the lowercased field name of the header they
/// cover.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Component {
    /// `@method`: the request method, uppercased.
    Method,

    /// `@path`: the path of the target URI, without the query.
    Path,

    /// `@query`: the raw query of the target URI, including the leading `?`.
    Query,

    /// `@authority`: host and optional port of the target URI, lowercased.
    Authority,

    /// `@status`: the response status code as a decimal integer.
    Status,

    /// A header field, identified by its lowercased name.
    Header(HeaderName),
}

impl Component {
    /// Parse a component identifier.
    ///
    /// Unrecognized `@`-prefixed names are rejected; anything else is treated
    /// as a header name and case-folded to lowercase.
    pub fn parse(raw: &str) -> Result<Self> {
        let component = match raw {
            "@method" => Self::Method,
            "@path" => Self::Path,
            "@query" => Self::Query,
            "@authority" => Self::Authority,
            "@status" => Self::Status,
            derived if derived.starts_with('@') => {
                return Err(Error::component_invalid(format!(
                    "unrecognized derived component: {derived}"
                )))
            }
            header => Self::Header(header.parse::<HeaderName>().map_err(|err| {
                Error::component_invalid(format!("invalid header name: {header}"))
                    .with_source(err)
            })?),
        };

        Ok(component)
    }

    /// The identifier as it appears, double-quoted, in component lines and
    /// the serialized component list.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Method => "@method",
            Self::Path => "@path",
            Self::Query => "@query",
            Self::Authority => "@authority",
            Self::Status => "@status",
            Self::Header(name) => name.as_str(),
        }
    }

    /// Resolve the component to its canonical value against the message.
    ///
    /// Absent headers and `@query` on a target without a query resolve as
    /// missing; derived components requested on the wrong message type are
    /// invalid. Nothing is ever silently skipped here.
    pub fn resolve(&self, message: Message<'_>) -> Result<String> {
        match (self, message) {
            (Self::Method, Message::Request(parts)) => Ok(parts.method.as_str().to_uppercase()),
            (Self::Path, Message::Request(parts)) => Ok(parts.uri.path().to_string()),
            (Self::Query, Message::Request(parts)) => match parts.uri.query() {
                Some(query) => Ok(format!("?{query}")),
                None => Err(Error::component_missing("request target has no query")),
            },
            (Self::Authority, Message::Request(parts)) => parts
                .uri
                .authority()
                .map(|authority| authority.as_str().to_ascii_lowercase())
                .ok_or_else(|| Error::component_missing("request target has no authority")),
            (Self::Status, Message::Response(parts)) => Ok(parts.status.as_u16().to_string()),
            (Self::Header(name), message) => {
                let value = message.headers().get(name).ok_or_else(|| {
                    Error::component_missing(format!("header {name} is absent from the message"))
                })?;

                Ok(value
                    .to_str()
                    .map_err(|err| {
                        Error::component_invalid(format!(
                            "value of header {name} is not visible ASCII"
                        ))
                        .with_source(err)
                    })?
                    .to_string())
            }
            (derived, Message::Request(_)) => Err(Error::component_invalid(format!(
                "{} is not valid for requests",
                derived.as_str()
            ))),
            (derived, Message::Response(_)) => Err(Error::component_invalid(format!(
                "{} is not valid for responses",
                derived.as_str()
            ))),
        }
    }

    /// Default component list for the given message.
    ///
    /// Requests cover method, path, query, authority, content-type and
    /// digest; responses cover status, content-type and digest. Unlike
    /// explicitly supplied lists, defaults drop any entry that resolves as
    /// missing on this particular message.
    pub fn defaults(message: Message<'_>) -> Vec<Component> {
        let digest = HeaderName::from_static("digest");

        let mut components = match message {
            Message::Request(_) => vec![
                Self::Method,
                Self::Path,
                Self::Query,
                Self::Authority,
                Self::Header(CONTENT_TYPE),
                Self::Header(digest),
            ],
            Message::Response(_) => {
                vec![Self::Status, Self::Header(CONTENT_TYPE), Self::Header(digest)]
            }
        };

        components.retain(|component| match component.resolve(message) {
            Ok(_) => true,
            Err(err) => err.kind() != ErrorKind::ComponentMissing,
        });
        components
    }
}
