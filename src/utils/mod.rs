// Utility functions
pub mod sanitize;
pub mod validation;

/// Percent-encode a value for use as a single URL path segment
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("Chana Masala"), "Chana%20Masala");
        assert_eq!(path_segment("a/b"), "a%2Fb");
    }
}
