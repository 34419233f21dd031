/// Case-insensitive substring test.
/// An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive ordering for display sorting
pub fn cmp_ignore_case(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("São Paulo", "são"));
        assert!(contains_ignore_case("São Paulo", "PAULO"));
        assert!(contains_ignore_case("Rio de Janeiro", ""));
        assert!(!contains_ignore_case("Rio de Janeiro", "paulo"));
    }

    #[test]
    fn test_cmp_ignore_case() {
        use std::cmp::Ordering;
        assert_eq!(cmp_ignore_case("abc", "ABC"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("Aracaju", "belem"), Ordering::Less);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        // Multi-byte input must not split a character
        assert_eq!(truncate("ação ação ação", 7), "ação...");
    }
}
