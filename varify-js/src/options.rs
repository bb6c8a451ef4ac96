use serde::Deserialize;
use serde::Serialize;
use symbol_js::identifiers::DEFAULT_SEPARATOR;
use symbol_js::scope::Scope;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Options {
  /// Whether `let` and `const` are rewritten at all.
  pub let_const: bool,
  /// Placed between a name and its counter when a binding must be renamed.
  pub rename_separator: String,
}

impl Default for Options {
  fn default() -> Self {
    Options {
      let_const: true,
      rename_separator: DEFAULT_SEPARATOR.to_string(),
    }
  }
}

impl Options {
  /// Reads options from a JSON object. Missing keys take their defaults and unknown keys are
  /// ignored.
  pub fn from_json(json: &str) -> Result<Options, serde_json::Error> {
    serde_json::from_str(json)
  }
}

/// Options overriding the run's options for a scope and everything below it. Attach as scope
/// associated data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ScopeOptions {
  pub let_const: Option<bool>,
}

/// Whether declarations in `scope` are rewritten, according to the nearest scope options that
/// decide it.
pub fn let_const_enabled(scope: &Scope, options: &Options) -> bool {
  scope
    .self_and_ancestors()
    .find_map(|s| {
      let scope_options = s.data().get_assoc::<ScopeOptions>().copied();
      scope_options.and_then(|o| o.let_const)
    })
    .unwrap_or(options.let_const)
}

#[cfg(test)]
mod tests {
  use super::let_const_enabled;
  use super::Options;
  use super::ScopeOptions;
  use symbol_js::scope::Scope;
  use symbol_js::scope::ScopeType;

  #[test]
  fn test_from_json() {
    let options = Options::from_json(r#"{"let-const": false, "disallow-duplicated": true}"#).unwrap();
    assert!(!options.let_const);
    assert_eq!(options.rename_separator, "$");

    let options = Options::from_json(r#"{"rename-separator": "_"}"#).unwrap();
    assert!(options.let_const);
    assert_eq!(options.rename_separator, "_");

    assert!(Options::from_json(r#"{"let-const": "yes"}"#).is_err());
  }

  #[test]
  fn test_scope_options_inherit() {
    let global = Scope::new_root(ScopeType::Global);
    let func = global.create_child_scope(ScopeType::Function);
    let block = func.create_child_scope(ScopeType::Block);
    let options = Options::default();
    assert!(let_const_enabled(&block, &options));

    func.data_mut().set_assoc(ScopeOptions {
      let_const: Some(false),
    });
    assert!(!let_const_enabled(&block, &options));
    assert!(let_const_enabled(&global, &options));

    block.data_mut().set_assoc(ScopeOptions {
      let_const: Some(true),
    });
    assert!(let_const_enabled(&block, &options));

    let disabled = Options {
      let_const: false,
      ..Options::default()
    };
    assert!(!let_const_enabled(&global, &disabled));
  }
}
