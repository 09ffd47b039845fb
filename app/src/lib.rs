pub use {dependency::*, error::*, input::*};

mod command;
mod dependency;
mod error;
mod input;
mod query;
