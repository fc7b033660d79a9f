/// Per-view display state owned alongside the editor.
///
/// Font size is abstract: hosts map it to whatever zoom their surface has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
  font_size:       u16,
  /// First visible block.
  pub scroll_line: usize,
}

impl ViewState {
  pub const MIN_FONT_SIZE: u16 = 1;

  pub fn new(font_size: u16) -> Self {
    Self {
      font_size: font_size.max(Self::MIN_FONT_SIZE),
      scroll_line: 0,
    }
  }

  pub fn font_size(&self) -> u16 {
    self.font_size
  }

  /// Grow or shrink the font by `steps`, never below
  /// [`Self::MIN_FONT_SIZE`].
  pub fn zoom(&mut self, steps: i32) -> u16 {
    let size = i64::from(self.font_size) + i64::from(steps);
    self.font_size = size.clamp(i64::from(Self::MIN_FONT_SIZE), i64::from(u16::MAX)) as u16;
    self.font_size
  }
}

impl Default for ViewState {
  fn default() -> Self {
    Self::new(14)
  }
}
