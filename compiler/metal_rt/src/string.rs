use std::cmp::Ordering;

/// Three-way compare of two runtime strings.
///
/// A null string orders before every non-null one, and two nulls are equal.
/// Otherwise bytes compare lexicographically and a proper prefix orders
/// first.
pub fn compare_strings(left: Option<&[u8]>, right: Option<&[u8]>) -> Ordering {
    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => left.cmp(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn nulls() {
        assert_eq!(compare_strings(None, None), Ordering::Equal);
        assert_eq!(compare_strings(None, Some(b"")), Ordering::Less);
        assert_eq!(compare_strings(Some(b""), None), Ordering::Greater);
    }

    #[test]
    fn bytes_then_length() {
        assert_eq!(compare_strings(Some(b"abc"), Some(b"abd")), Ordering::Less);
        assert_eq!(compare_strings(Some(b"ab"), Some(b"abc")), Ordering::Less);
        assert_eq!(compare_strings(Some(b"b"), Some(b"abc")), Ordering::Greater);
        assert_eq!(compare_strings(Some(b"same"), Some(b"same")), Ordering::Equal);
    }

    proptest! {
        #[test]
        fn antisymmetric(a in proptest::collection::vec(any::<u8>(), 0..16),
                         b in proptest::collection::vec(any::<u8>(), 0..16)) {
            prop_assert_eq!(
                compare_strings(Some(&a), Some(&b)),
                compare_strings(Some(&b), Some(&a)).reverse()
            );
        }
    }
}
