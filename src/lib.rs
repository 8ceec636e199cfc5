//! Honyaku - English detection and translation
//!
//! Decides whether a piece of text is English and, if not, translates it
//! through an ollama chat model. A network-free demo mode answers with a
//! local heuristic.

pub mod cli;
pub mod config;
pub mod translate;
pub mod server;
pub mod error;
