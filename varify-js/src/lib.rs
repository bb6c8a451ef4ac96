use err::VarifyError;
use let_const::LetConst;
use options::Options;
use parse_js::parse;
use patch::Patches;
use stats::Stats;
use symbol_js::compute_scopes;
use symbol_js::identifiers::Identifiers;

pub mod err;
pub mod let_const;
pub mod options;
pub mod patch;
pub mod rewrite;
pub mod stats;

#[derive(Debug)]
pub struct Output {
  pub code: String,
  pub stats: Stats,
}

/// Parses `source`, rewrites every `let` and `const` into `var`, and returns the edited source.
///
/// On error, no output is produced; edits made before the error are discarded.
pub fn varify(source: &str, options: &Options) -> Result<Output, VarifyError> {
  let mut top_level = parse(source)?;
  let top_scope = compute_scopes(&mut top_level);
  let mut identifiers =
    Identifiers::from_top_level(&top_level).with_separator(options.rename_separator.as_str());
  let mut patches = Patches::new();
  let mut stats = Stats::default();

  let mut let_const = LetConst::new(options.clone());
  let_const.reset(&top_scope);
  let mut pass = let_const.setup(&mut patches, &mut stats, &mut identifiers, source);
  pass.run(&mut top_level, &top_scope)?;

  let code = patches.apply(source)?;
  Ok(Output { code, stats })
}
