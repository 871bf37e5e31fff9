//! Rendering engine adapters.

mod cookiecutter;
mod simple;

pub use cookiecutter::CookiecutterRenderer;
pub use simple::{RenderFailure, SimpleRenderer};
