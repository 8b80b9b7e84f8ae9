pub mod error;
pub mod loader;
pub mod paths;
pub mod repository;

#[cfg(test)]
pub mod test_utils;
