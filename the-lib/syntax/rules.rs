//! The ordered highlighting rule table.
//!
//! Rules are painted in table order and each rule sees the whole, unmodified
//! line. There is no "first match wins": a keyword that is also followed by
//! `(` is painted as a keyword, then repainted by the call rule. Reordering
//! the table changes the output for ambiguous tokens.

use fancy_regex::Regex;

use super::{
  LineText,
  Result,
  Scope,
  Span,
  SyntaxError,
};

/// Preprocessor directives. Painted before anything else.
const PREPROCESSOR: &[&str] = &[
  r"#\s*include\b",
  r"#\s*define\b",
  r"#\s*ifdef\b",
  r"#\s*ifndef\b",
  r"#\s*else\b",
  r"#\s*elif\b",
  r"#\s*endif\b",
  r"#\s*pragma\b",
  r"#\s*error\b",
  r"#\s*warning\b",
  r"#\s*undef\b",
];

/// Language keywords and builtin type names, one rule each. Duplicates are
/// kept: they only repaint with the same scope.
const KEYWORDS: &[&str] = &[
  "class",
  "const",
  "double",
  "enum",
  "explicit",
  "friend",
  "inline",
  "namespace",
  "operator",
  "private",
  "protected",
  "public",
  "short",
  "signals",
  "signed",
  "slots",
  "static",
  "struct",
  "template",
  "typedef",
  "typename",
  "union",
  "unsigned",
  "virtual",
  "void",
  "volatile",
  "bool",
  "true",
  "false",
  "for",
  "if",
  "else",
  "while",
  "return",
  "switch",
  "case",
  "default",
  "do",
  "break",
  "continue",
  "goto",
  "try",
  "catch",
  "throw",
  "const_cast",
  "dynamic_cast",
  "reinterpret_cast",
  "static_cast",
  "include",
  "define",
  "ifdef",
  "ifndef",
  "endif",
  "pragma",
  "error",
  "warning",
  "undef",
  // integer types
  "char",
  "int",
  "uint8_t",
  "uint16_t",
  "uint32_t",
  "uint64_t",
  "int8_t",
  "int16_t",
  "int32_t",
  "int64_t",
  "uint_fast8_t",
  "uint_fast16_t",
  "uint_fast32_t",
  "uint_fast64_t",
  "int_fast8_t",
  "int_fast16_t",
  "int_fast32_t",
  "int_fast64_t",
  "uint_least8_t",
  "uint_least16_t",
  "uint_least32_t",
  "uint_least64_t",
  "int_least8_t",
  "int_least16_t",
  "int_least32_t",
  "int_least64_t",
  "uintmax_t",
  "intmax_t",
  "size_t",
  "ptrdiff_t",
  // floating point types
  "float",
  "double",
  "long double",
  // stddef.h
  "ptrdiff_t",
  "size_t",
  "max_align_t",
  "nullptr_t",
];

/// Everything after the keywords, in precedence order.
const TAIL_RULES: &[(&str, Scope)] = &[
  (
    r"\+|-|\*|/|%|=|==|!=|>|<|>=|<=|&|\||\^|~|!|\?|:|,|;|\[|\]|\(|\)|\{|\}",
    Scope::Operator,
  ),
  (r#"".*"|<.*>"#, Scope::String),
  (r"\b[0-9]+\b", Scope::Number),
  (r"\b[A-Za-z0-9_]+(?=\()", Scope::Function),
  (r#"<[^>]+>|"[^"]+""#, Scope::Include),
  (r"\b[A-Za-z0-9_]+\s*(?=\()", Scope::FunctionDefinition),
  (r"\bclass\s+[A-Za-z0-9_]+", Scope::Class),
  (
    r"\b[A-Za-z_][A-Za-z0-9_]*\s+(?=[A-Za-z_][A-Za-z0-9_]*\s*\()",
    Scope::Parameter,
  ),
  (
    r"\b[A-Za-z_][A-Za-z0-9_]*(?=\s+[A-Za-z_][A-Za-z0-9_]*\s*(?:=|;|\(|,))",
    Scope::Type,
  ),
  (r"\bnamespace\s+[A-Za-z_][A-Za-z0-9_]*", Scope::Namespace),
  (r"\btemplate\s*<[^>]+>", Scope::TemplateParameter),
  (r"//[^\n]*", Scope::Comment),
];

/// An uncompiled rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
  pub pattern: String,
  pub scope:   Scope,
}

impl RuleSpec {
  pub fn new(pattern: impl Into<String>, scope: Scope) -> Self {
    Self {
      pattern: pattern.into(),
      scope,
    }
  }

  /// The C/C++ table in painting order.
  pub fn cpp() -> Vec<RuleSpec> {
    let preprocessor = PREPROCESSOR
      .iter()
      .map(|pattern| RuleSpec::new(*pattern, Scope::Keyword));
    let keywords = KEYWORDS
      .iter()
      .map(|keyword| RuleSpec::new(format!(r"\b{keyword}\b"), Scope::Keyword));
    let tail = TAIL_RULES
      .iter()
      .map(|(pattern, scope)| RuleSpec::new(*pattern, *scope));

    preprocessor.chain(keywords).chain(tail).collect()
  }
}

#[derive(Debug, Clone)]
struct Rule {
  pattern: Regex,
  scope:   Scope,
}

/// Compiled rules, immutable once built.
#[derive(Debug, Clone)]
pub struct RuleTable {
  rules: Vec<Rule>,
}

impl RuleTable {
  pub fn new(specs: impl IntoIterator<Item = RuleSpec>) -> Result<Self> {
    let rules = specs
      .into_iter()
      .map(|spec| {
        let pattern = Regex::new(&spec.pattern).map_err(|err| {
          SyntaxError::InvalidPattern {
            pattern: spec.pattern.clone(),
            source:  Box::new(err),
          }
        })?;
        Ok(Rule {
          pattern,
          scope: spec.scope,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(Self { rules })
  }

  pub fn cpp() -> Result<Self> {
    Self::new(RuleSpec::cpp())
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  /// Scopes in painting order.
  pub fn scopes(&self) -> impl Iterator<Item = Scope> + '_ {
    self.rules.iter().map(|rule| rule.scope)
  }

  /// Append one span per match of every rule, in table order.
  pub(crate) fn paint(&self, line: &LineText<'_>, spans: &mut Vec<Span>) {
    let text = line.as_str();
    for rule in &self.rules {
      for found in rule.pattern.find_iter(text) {
        match found {
          Ok(found) if found.start() < found.end() => {
            spans.push(line.span(found.start()..found.end(), rule.scope));
          },
          Ok(_) => {},
          Err(err) => {
            tracing::warn!(
              %err,
              pattern = rule.pattern.as_str(),
              "highlight rule failed, skipping it for this line"
            );
            break;
          },
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cpp_table_compiles() {
    let table = RuleTable::cpp().unwrap();
    assert_eq!(table.len(), PREPROCESSOR.len() + KEYWORDS.len() + TAIL_RULES.len());
  }

  #[test]
  fn table_order_is_precedence_order() {
    let scopes: Vec<_> = RuleTable::cpp().unwrap().scopes().collect();
    let tail: Vec<_> = scopes[PREPROCESSOR.len() + KEYWORDS.len()..].to_vec();

    assert!(
      scopes[..PREPROCESSOR.len() + KEYWORDS.len()]
        .iter()
        .all(|scope| *scope == Scope::Keyword)
    );
    assert_eq!(tail, [
      Scope::Operator,
      Scope::String,
      Scope::Number,
      Scope::Function,
      Scope::Include,
      Scope::FunctionDefinition,
      Scope::Class,
      Scope::Parameter,
      Scope::Type,
      Scope::Namespace,
      Scope::TemplateParameter,
      Scope::Comment,
    ]);
  }

  #[test]
  fn invalid_pattern_is_reported() {
    let err = RuleTable::new([RuleSpec::new("(unclosed", Scope::Keyword)]).unwrap_err();
    match err {
      SyntaxError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "(unclosed"),
    }
  }

  #[test]
  fn every_match_of_a_rule_is_painted() {
    let table = RuleTable::new([RuleSpec::new(r"\b[0-9]+\b", Scope::Number)]).unwrap();
    let line = LineText::new("a[10] = 2 + 30;");
    let mut spans = Vec::new();
    table.paint(&line, &mut spans);

    assert_eq!(spans, [
      Span::new(2, 2, Scope::Number),
      Span::new(8, 1, Scope::Number),
      Span::new(12, 2, Scope::Number),
    ]);
  }

  #[test]
  fn greedy_string_spans_both_quotes() {
    let table = RuleTable::new([RuleSpec::new(r#"".*"|<.*>"#, Scope::String)]).unwrap();
    let line = LineText::new(r#"f("a", "b");"#);
    let mut spans = Vec::new();
    table.paint(&line, &mut spans);

    assert_eq!(spans, [Span::new(2, 8, Scope::String)]);
  }
}
