/// Characters that make a tag key unusable as a column value. A key containing
/// any of these is dropped from the output entirely.
const PROBLEM_CHARS: &str = "=+/&<>;'\"?%#$@,. \t\r\n";

const DEFAULT_TAG_TYPE: &str = "regular";

#[derive(Debug, PartialEq)]
pub struct ClassifiedKey {
    pub tag_type: String,
    pub key: String,
    pub problematic: bool,
}

/// Split a raw `k` attribute into (type, key). The type is the text before the
/// first colon, or "regular" if there is none; further colons stay in the key
/// verbatim. No case or whitespace normalization.
pub fn classify(raw_key: &str) -> ClassifiedKey {
    let problematic = raw_key.chars().any(|c| PROBLEM_CHARS.contains(c));
    match raw_key.split_once(':') {
        Some((tag_type, key)) => ClassifiedKey {
            tag_type: tag_type.to_string(),
            key: key.to_string(),
            problematic,
        },
        None => ClassifiedKey {
            tag_type: DEFAULT_TAG_TYPE.to_string(),
            key: raw_key.to_string(),
            problematic,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_key_is_regular() {
        let classified = classify("amenity");
        assert_eq!(classified.tag_type, "regular");
        assert_eq!(classified.key, "amenity");
        assert!(!classified.problematic);
    }

    #[test]
    fn single_colon_splits_type_and_key() {
        let classified = classify("addr:street");
        assert_eq!(classified.tag_type, "addr");
        assert_eq!(classified.key, "street");
        assert!(!classified.problematic);
    }

    #[test]
    fn further_colons_stay_in_key() {
        let classified = classify("addr:street:name");
        assert_eq!(classified.tag_type, "addr");
        assert_eq!(classified.key, "street:name");
        assert!(!classified.problematic);
    }

    #[test]
    fn problem_characters_are_flagged() {
        for raw_key in [
            "a=b", "a+b", "a/b", "a&b", "a<b", "a>b", "a;b", "a'b", "a\"b",
            "a?b", "a%b", "a#b", "a$b", "a@b", "a,b", "a.b", "a b", "a\tb",
            "a\rb", "a\nb",
        ] {
            assert!(classify(raw_key).problematic, "expected {:?} to be problematic", raw_key);
        }
    }

    #[test]
    fn colon_is_not_a_problem_character() {
        assert!(!classify("addr:street").problematic);
    }
}
