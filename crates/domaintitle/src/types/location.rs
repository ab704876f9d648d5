/*!
Location records.

A location is the `(scheme, host)` pair a document was loaded from. It is owned
by the host and may change between reads, so callers always ask the host for a
fresh copy instead of caching one.
*/

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{TitleError, TitleResult};

/// Where a document was loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Location {
  /// URL scheme without the trailing colon (`"https"`, `"file"`). Empty when unknown.
  pub scheme: String,
  /// Host including an explicit port (`"example.com:8080"`). Empty for hostless schemes.
  pub host: String,
}

/// Scheme families that domain resolution distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
  Http,
  Https,
  File,
  /// Anything else, including an empty scheme.
  Other,
}

impl Location {
  /// Create a location, normalizing browser-style protocols (`"HTTPS:"` -> `"https"`).
  pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
    let scheme = scheme.into();
    Self {
      scheme: scheme.trim_end_matches(':').to_ascii_lowercase(),
      host: host.into(),
    }
  }

  /// Parse a full URL the way a browser fills in `location.protocol` and `location.host`.
  ///
  /// # Example
  ///
  /// ```
  /// use domaintitle::Location;
  ///
  /// let location = Location::parse("https://example.com:8443/docs").unwrap();
  /// assert_eq!(location.scheme, "https");
  /// assert_eq!(location.host, "example.com:8443");
  /// ```
  pub fn parse(input: &str) -> TitleResult<Self> {
    let url = url::Url::parse(input).map_err(|e| TitleError::InvalidLocation(format!("{input}: {e}")))?;

    let host = match (url.host_str(), url.port()) {
      (Some(host), Some(port)) => format!("{host}:{port}"),
      (Some(host), None) => host.to_owned(),
      (None, _) => String::new(),
    };

    Ok(Self::new(url.scheme(), host))
  }

  /// Classify the scheme. Tolerates records that skipped [`Location::new`].
  pub fn scheme_kind(&self) -> Scheme {
    let scheme = self.scheme.trim_end_matches(':');
    if scheme.eq_ignore_ascii_case("http") {
      Scheme::Http
    } else if scheme.eq_ignore_ascii_case("https") {
      Scheme::Https
    } else if scheme.eq_ignore_ascii_case("file") {
      Scheme::File
    } else {
      Scheme::Other
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_normalizes_protocol_strings() {
    let location = Location::new("HTTPS:", "example.com");
    assert_eq!(location.scheme, "https");
    assert_eq!(location.scheme_kind(), Scheme::Https);
  }

  #[test]
  fn parse_keeps_explicit_port() {
    let location = Location::parse("http://localhost:3000/index.html").unwrap();
    assert_eq!(location.scheme_kind(), Scheme::Http);
    assert_eq!(location.host, "localhost:3000");
  }

  #[test]
  fn parse_drops_default_port() {
    let location = Location::parse("https://example.com:443/").unwrap();
    assert_eq!(location.host, "example.com");
  }

  #[test]
  fn parse_file_url_has_no_host() {
    let location = Location::parse("file:///home/user/page.html").unwrap();
    assert_eq!(location.scheme_kind(), Scheme::File);
    assert_eq!(location.host, "");
  }

  #[test]
  fn parse_opaque_scheme() {
    let location = Location::parse("about:blank").unwrap();
    assert_eq!(location.scheme, "about");
    assert_eq!(location.scheme_kind(), Scheme::Other);
  }

  #[test]
  fn parse_rejects_relative_input() {
    assert!(matches!(
      Location::parse("/just/a/path"),
      Err(TitleError::InvalidLocation(_))
    ));
  }

  #[test]
  fn raw_records_are_classified_case_insensitively() {
    let location = Location {
      scheme: "File:".into(),
      host: String::new(),
    };
    assert_eq!(location.scheme_kind(), Scheme::File);
    assert_eq!(Location::default().scheme_kind(), Scheme::Other);
  }
}
