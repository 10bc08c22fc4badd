pub use self::node::{Arg, Parent};
mod node;

mod container;
mod scalar;

#[cfg(test)]
mod tests;
