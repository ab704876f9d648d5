/*!
Read-only queries against the host document.

Anchors are looked up fresh on every call; nothing here caches node references
or the domain.
*/

use std::sync::Arc;

use crate::config::Config;
use crate::host::DocumentHost;
use crate::types::{Location, NodeId, Scheme};

/// Locates the title and head anchors and resolves the current domain.
pub struct TreeAccessor<H> {
  host: Arc<H>,
  title_kind: String,
  head_kind: String,
  file_label: String,
}

impl<H> std::fmt::Debug for TreeAccessor<H> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TreeAccessor")
      .field("title_kind", &self.title_kind)
      .field("head_kind", &self.head_kind)
      .finish_non_exhaustive()
  }
}

impl<H: DocumentHost> TreeAccessor<H> {
  pub fn new(host: Arc<H>, config: &Config) -> Self {
    Self {
      host,
      title_kind: config.title_kind.clone(),
      head_kind: config.head_kind.clone(),
      file_label: config.file_label.clone(),
    }
  }

  /// The host this accessor reads from.
  pub const fn host(&self) -> &Arc<H> {
    &self.host
  }

  /// First title-like node in document order.
  pub fn title_anchor(&self) -> Option<NodeId> {
    self.host.first_of_kind(&self.title_kind)
  }

  /// First head-like node in document order.
  pub fn head_anchor(&self) -> Option<NodeId> {
    self.host.first_of_kind(&self.head_kind)
  }

  /// Check if a node kind names the title anchor.
  pub fn is_title_kind(&self, kind: &str) -> bool {
    kind.eq_ignore_ascii_case(&self.title_kind)
  }

  /// Resolve the domain for the host's current location.
  pub fn current_domain(&self) -> String {
    self.resolve_domain(&self.host.location())
  }

  /// Map a location to its domain string.
  ///
  /// - `http` / `https` -> the host (with port, if any)
  /// - `file` -> the configured file label
  /// - anything else -> empty string
  pub fn resolve_domain(&self, location: &Location) -> String {
    match location.scheme_kind() {
      Scheme::Http | Scheme::Https => location.host.clone(),
      Scheme::File => self.file_label.clone(),
      Scheme::Other => String::new(),
    }
  }
}
