//! Editing core: documents, rule-based highlighting, and the editing
//! reactions (indent copy, comment toggle, completion) driven through one
//! event entry point.

use smartstring::{
  LazyCompact,
  SmartString,
};

pub mod comment;
pub mod completion;
pub mod config;
pub mod document;
pub mod editor;
pub mod indent;
pub mod input;
pub mod movement;
pub mod render;
pub mod selection;
pub mod syntax;
pub mod transaction;
pub mod view;

pub type Tendril = SmartString<LazyCompact>;
