/*!
Title synchronization.

The rule is idempotent: text that already ends with the domain is left alone,
so the write triggered by a sync is absorbed as a no-op when its own change
notification comes back. This is what keeps the watch loop from spinning.

An empty domain is a suffix of every string, so unknown schemes never get a
suffix. That is kept on purpose.
*/

use crate::config::Config;
use crate::host::DocumentHost;
use crate::types::{NodeId, TitleError, TitleResult};

/// What a synchronization pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
  /// Text already ended with the domain. Nothing written.
  Unchanged,
  /// Suffix appended.
  Appended { before: String, after: String },
}

/// Appends `separator + domain` to titles that lack it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synchronizer {
  separator: String,
}

impl Default for Synchronizer {
  fn default() -> Self {
    Self::new(&Config::default())
  }
}

impl Synchronizer {
  pub fn new(config: &Config) -> Self {
    Self {
      separator: config.separator.clone(),
    }
  }

  /// Pure form of the rule: the new text, or None if `text` already ends with `domain`.
  ///
  /// # Example
  ///
  /// ```
  /// use domaintitle::Synchronizer;
  ///
  /// let sync = Synchronizer::default();
  /// assert_eq!(sync.suffixed("Docs", "example.com").as_deref(), Some("Docs - example.com"));
  /// assert_eq!(sync.suffixed("Docs - example.com", "example.com"), None);
  /// assert_eq!(sync.suffixed("Docs", ""), None);
  /// ```
  pub fn suffixed(&self, text: &str, domain: &str) -> Option<String> {
    if text.ends_with(domain) {
      return None;
    }
    Some(format!("{text}{}{domain}", self.separator))
  }

  /// Apply the rule to a title node. Writes only when the text changes.
  pub fn synchronize<H: DocumentHost + ?Sized>(
    &self,
    host: &H,
    anchor: NodeId,
    domain: &str,
  ) -> TitleResult<SyncOutcome> {
    let before = host
      .text_content(anchor)
      .ok_or(TitleError::NodeNotFound(anchor))?;

    let Some(after) = self.suffixed(&before, domain) else {
      return Ok(SyncOutcome::Unchanged);
    };

    host.set_text_content(anchor, &after)?;
    Ok(SyncOutcome::Appended { before, after })
  }
}


#[cfg(test)]
mod proptests {
  use super::*;
  use proptest::prelude::*;

  proptest! {
    /// Applying the rule to its own output changes nothing
    #[test]
    fn idempotent(text in ".*", domain in "[a-z0-9.:-]{0,24}") {
      let sync = Synchronizer::default();
      let once = sync.suffixed(&text, &domain).unwrap_or_else(|| text.clone());
      prop_assert_eq!(sync.suffixed(&once, &domain), None);
    }

    /// Result always ends with the domain, and with separator + domain when something was appended
    #[test]
    fn suffix_invariant(text in ".*", domain in "[a-z0-9.-]{1,24}") {
      let sync = Synchronizer::default();
      match sync.suffixed(&text, &domain) {
        Some(after) => {
          let expected_suffix = format!(" - {domain}");
          prop_assert!(after.ends_with(&expected_suffix));
          prop_assert!(after.starts_with(&text));
        }
        None => prop_assert!(text.ends_with(&domain)),
      }
    }

    /// Empty domain never changes anything
    #[test]
    fn empty_domain_unchanged(text in ".*") {
      prop_assert_eq!(Synchronizer::default().suffixed(&text, ""), None);
    }

    /// Whole-text rewrites each end up with exactly one suffix
    #[test]
    fn rewrites_never_accumulate(titles in prop::collection::vec("[A-Z ]{1,16}", 1..6)) {
      let sync = Synchronizer::default();
      let domain = "localpath";
      let mut current = String::new();
      for title in &titles {
        current = sync.suffixed(title, domain).unwrap_or_else(|| title.clone());
      }
      let last = titles.last().cloned().unwrap_or_default();
      prop_assert_eq!(current.matches(domain).count(), 1);
      prop_assert_eq!(current, format!("{last} - {domain}"));
    }
  }
}
