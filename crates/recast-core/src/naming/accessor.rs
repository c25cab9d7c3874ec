//! Property names derived from accessor and setter method names.

/// Lower-case the first character, bean style: a name starting with two upper-case
/// characters (`URL`) is left unchanged.
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            name.to_string()
        }
        (Some(first), _) => {
            let mut result: String = first.to_lowercase().collect();
            result.push_str(&name[first.len_utf8()..]);
            result
        }
        (None, _) => String::new(),
    }
}

/// Strip `prefix` when it is followed by an upper-case character.
fn strip_prefix_word<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = name.strip_prefix(prefix)?;
    rest.chars()
        .next()
        .filter(|c| c.is_uppercase())
        .map(|_| rest)
}

/// Virtual property name for a zero-argument accessor.
///
/// `getFirstName` becomes `firstName`, `isActive` becomes `active`; any other method
/// name is used as-is.
pub fn property_name_for_accessor(method: &str) -> String {
    strip_prefix_word(method, "get")
        .or_else(|| strip_prefix_word(method, "is"))
        .map(decapitalize)
        .unwrap_or_else(|| method.to_string())
}

/// Property name written by a setter-shaped method (`setFirstName` -> `firstName`).
pub fn property_name_for_setter(method: &str) -> Option<String> {
    strip_prefix_word(method, "set").map(decapitalize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("getFirstName", "firstName")]
    #[case("isActive", "active")]
    #[case("getURL", "URL")]
    #[case("getter", "getter")]
    #[case("island", "island")]
    #[case("fullName", "fullName")]
    fn test_accessor_names(#[case] method: &str, #[case] expected: &str) {
        assert_eq!(property_name_for_accessor(method), expected);
    }

    #[test]
    fn test_setter_names() {
        assert_eq!(property_name_for_setter("setAge"), Some("age".to_string()));
        assert_eq!(property_name_for_setter("settle"), None);
        assert_eq!(property_name_for_setter("age"), None);
    }
}
