//! Configuration access port trait.

/// Raw string access; parsing and range checks belong to the loader.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Section names, sorted.
    fn sections(&self) -> Vec<String>;
}
