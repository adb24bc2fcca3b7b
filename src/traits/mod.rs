//! Widget trait system
//!
//! Contracts the code block and any future widgets implement. The host
//! (gallery, embedding app) talks to widgets through these instead of
//! reaching into each widget's internals.
//!
//! - [`Component`] - identity + rendering
//! - [`Copyable`] - clipboard content
//! - [`Interactive`] - keyboard and mouse input

mod component;
mod copyable;
mod interactive;

pub use component::{Component, RenderContext, WidgetId};
pub use copyable::Copyable;
pub use interactive::{Handled, Interactive};
