pub mod classifier;
pub mod download;
pub mod engine;
pub mod fuzzy;
pub mod matchers;
pub mod resolver;
pub mod scan;

#[cfg(test)]
pub mod testing;
