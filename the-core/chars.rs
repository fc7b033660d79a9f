/// Whitespace that can make up an indentation run.
///
/// Line endings are deliberately excluded: an indent never spans lines.
#[inline]
pub fn char_is_whitespace(ch: char) -> bool {
  match ch {
      '\u{0009}' | // Character Tabulation
      '\u{000B}' | // Line Tabulation
      '\u{000C}' | // Form Feed
      '\u{0020}' | // Space
      '\u{00A0}' | // No-break Space
      '\u{1680}' | // Ogham Space Mark
      '\u{202F}' | // Narrow No-break Space
      '\u{205F}' | // Medium Mathematical Space
      '\u{3000}' | // Ideographic Space
      '\u{FEFF}'   // Zero Width No-break Space
      => true,

      // En Quad through Hair Space.
      ch if ('\u{2000}' ..= '\u{200A}').contains(&ch) => true,

      _ => false,
    }
}

/// Characters that make up a completable word: alphanumerics and `_`.
#[inline]
pub fn char_is_word(ch: char) -> bool {
  ch.is_alphanumeric() || ch == '_'
}
