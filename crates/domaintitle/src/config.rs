/*!
Controller configuration.

Defaults reproduce the stock behaviour: `" - "` separator, `"localpath"` for
`file:` documents, `title`/`head` anchors. Hosts that store settings as JSON can
load them with [`Config::from_json`]; missing fields fall back to defaults.
*/

use serde::{Deserialize, Serialize};

use crate::types::TitleResult;

const DEFAULT_SEPARATOR: &str = " - ";
const DEFAULT_FILE_LABEL: &str = "localpath";
const DEFAULT_TITLE_KIND: &str = "title";
const DEFAULT_HEAD_KIND: &str = "head";

/// Settings shared by the accessor, synchronizer and controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Inserted between the original title and the domain.
  pub separator: String,
  /// Domain used for `file:` locations.
  pub file_label: String,
  /// Node kind treated as the title anchor.
  pub title_kind: String,
  /// Node kind treated as the head anchor.
  pub head_kind: String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      separator: DEFAULT_SEPARATOR.into(),
      file_label: DEFAULT_FILE_LABEL.into(),
      title_kind: DEFAULT_TITLE_KIND.into(),
      head_kind: DEFAULT_HEAD_KIND.into(),
    }
  }
}

impl Config {
  /// Parse a JSON settings object.
  ///
  /// # Example
  ///
  /// ```
  /// use domaintitle::Config;
  ///
  /// let config = Config::from_json(r#"{ "separator": " | " }"#).unwrap();
  /// assert_eq!(config.separator, " | ");
  /// assert_eq!(config.file_label, "localpath");
  /// ```
  pub fn from_json(json: &str) -> TitleResult<Self> {
    Ok(serde_json::from_str(json)?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::TitleError;

  #[test]
  fn default_config_values() {
    let config = Config::default();
    assert_eq!(config.separator, " - ");
    assert_eq!(config.file_label, "localpath");
    assert_eq!(config.title_kind, "title");
    assert_eq!(config.head_kind, "head");
  }

  #[test]
  fn empty_json_is_default() {
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
  }

  #[test]
  fn malformed_json_is_rejected() {
    assert!(matches!(
      Config::from_json("{ separator"),
      Err(TitleError::InvalidConfig(_))
    ));
  }
}
