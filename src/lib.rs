//! Presentational code blocks for ratatui terminals
//!
//! Each block owns its chrome: a header with a language tag and a copy
//! button, a numbered gutter, and a syntax highlighted body. Blocks render
//! into whatever area the host allocates and never touch cells outside it.
//! Syntax assets deserialize once per process and are shared by every
//! block, no matter how many are active.
//!
//! ```no_run
//! use codepane::{CodeBlock, Dimension};
//!
//! # async fn demo() {
//! let mut block = CodeBlock::new()
//!     .language("rust")
//!     .width(Dimension::Percent(90));
//! block.activate("fn main() {\n    println!(\"hi\");\n}");
//! # }
//! ```

pub mod assets;
pub mod clipboard;
pub mod dimension;
pub mod highlight;
pub mod theme;
pub mod traits;
pub mod widget;

pub use dimension::Dimension;
pub use theme::BlockTheme;
pub use widget::CodeBlock;
