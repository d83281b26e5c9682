use http::HeaderMap;

/// Borrowed view over the signable parts of an HTTP message.
///
/// The view is read-only: resolving components never mutates the underlying
/// parts. Header access is case-insensitive through [`http::HeaderMap`].
#[derive(Clone, Copy, Debug)]
pub enum Message<'a> {
    /// A request-like message: method, target URI and headers.
    Request(&'a http::request::Parts),

    /// A response-like message: status code and headers.
    Response(&'a http::response::Parts),
}

impl<'a> Message<'a> {
    /// Headers of the underlying message.
    pub fn headers(&self) -> &'a HeaderMap {
        match self {
            Message::Request(parts) => &parts.headers,
            Message::Response(parts) => &parts.headers,
        }
    }
}

impl<'a> From<&'a http::request::Parts> for Message<'a> {
    fn from(parts: &'a http::request::Parts) -> Self {
        Message::Request(parts)
    }
}

impl<'a> From<&'a http::response::Parts> for Message<'a> {
    fn from(parts: &'a http::response::Parts) -> Self {
        Message::Response(parts)
    }
}
