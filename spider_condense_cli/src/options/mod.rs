mod args;

pub use args::{Cli, MarkerArg};
