//! Configuration access port trait.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    /// Unsigned value, `None` when missing or not a non-negative integer.
    fn get_u64(&self, section: &str, key: &str) -> Option<u64> {
        self.get_string(section, key)
            .and_then(|s| s.trim().parse().ok())
    }
}
