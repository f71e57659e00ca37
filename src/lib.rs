pub use crate::dsl::Rule;
pub use crate::errors::{GrammarError, Result};
pub use crate::grammar::Grammar;
pub use crate::merge::Extension;

pub mod cli;
pub mod cst;
pub mod dsl;
pub mod errors;
pub mod grammar;
pub mod lexical;
pub mod merge;
pub mod objc;
pub mod resolve;
pub mod validation;
