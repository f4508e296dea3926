//! URL construction with percent-encoding.

/// Accumulates the pieces of a request URL during a single request build.
///
/// Path segments and query parameters are percent-encoded as they are
/// appended: path segments pass the RFC 3986 unreserved set through and
/// percent-encode every other byte of their UTF-8 form; query names and
/// values additionally keep `*` unescaped, matching
/// `application/x-www-form-urlencoded` with `%20` for spaces. Segment and
/// query insertion order is preserved, and repeated query keys repeat in
/// the final URL.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    scheme: String,
    host: String,
    port: u16,
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
            segments: Vec::new(),
            query: Vec::new(),
        }
    }

    /// Append one path segment. The segment is encoded; `/` inside a
    /// segment is percent-encoded rather than interpreted.
    pub fn path_segment(&mut self, segment: &str) -> &mut Self {
        self.segments.push(encode_path_segment(segment));
        self
    }

    /// Append one query parameter.
    pub fn query_param(&mut self, name: &str, value: &str) -> &mut Self {
        self.query
            .push((encode_query_component(name), encode_query_component(value)));
        self
    }

    /// Render the final URL: `scheme://host[:port]/segments[?queries]`.
    /// The port is omitted when it matches the scheme default.
    pub fn build(&self) -> String {
        let mut url = format!("{}://{}", self.scheme, self.host);
        if default_port(&self.scheme) != Some(self.port) {
            url.push(':');
            url.push_str(&self.port.to_string());
        }
        if self.segments.is_empty() {
            url.push('/');
        } else {
            for segment in &self.segments {
                url.push('/');
                url.push_str(segment);
            }
        }
        for (i, (name, value)) in self.query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(name);
            url.push('=');
            url.push_str(value);
        }
        url
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

/// RFC 3986 unreserved characters.
fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

/// Form-urlencoded safe characters: alphanumerics plus `*-._`.
fn is_query_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'*' | b'-' | b'.' | b'_')
}

fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment, is_unreserved)
}

fn encode_query_component(component: &str) -> String {
    percent_encode(component, is_query_safe)
}

fn percent_encode(input: &str, is_safe: fn(u8) -> bool) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if is_safe(byte) {
            out.push(byte as char);
        } else {
            out.push('%');
            out.push_str(&format!("{byte:02X}"));
        }
    }
    out
}
