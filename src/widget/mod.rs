//! The code block widget and its supporting parts

mod code_block;
mod copy_button;
mod scroll;

pub use code_block::CodeBlock;
pub use copy_button::CopyButton;
pub use scroll::ScrollState;
