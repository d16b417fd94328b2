use proptest::prelude::*;
use recidx::destrip::destrip;

proptest! {
    /// Destripping inverts the accidental extra UTF-8 layer: encoding each
    /// byte of an arbitrary byte string as a character and destripping the
    /// resulting UTF-8 yields the original bytes.
    #[test]
    fn destrip_inverts_double_encoding(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let doubled: String = bytes.iter().map(|&b| char::from(b)).collect();
        prop_assert_eq!(destrip(doubled.as_bytes()).unwrap(), bytes);
    }

    /// A destripped result re-encoded as UTF-8 destrips back to itself
    /// (idempotence over the byte range).
    #[test]
    fn destrip_is_idempotent_over_the_byte_range(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let doubled: String = bytes.iter().map(|&b| char::from(b)).collect();
        let once = destrip(doubled.as_bytes()).unwrap();
        let redoubled: String = once.iter().map(|&b| char::from(b)).collect();
        prop_assert_eq!(destrip(redoubled.as_bytes()).unwrap(), once);
    }

    /// Printable ASCII is a fixed point of destripping.
    #[test]
    fn ascii_is_a_fixed_point(text in "[ -~]{0,128}") {
        prop_assert_eq!(destrip(text.as_bytes()).unwrap(), text.into_bytes());
    }

    /// Any character above U+00FF fails with the byte offset of the prefix
    /// before it.
    #[test]
    fn characters_above_ff_fail_at_their_offset(
        prefix in "[ -~\u{A0}-\u{FF}]{0,32}",
        big in proptest::char::range('\u{100}', '\u{FFFF}'),
    ) {
        let input = format!("{prefix}{big}");
        let err = destrip(input.as_bytes()).unwrap_err();
        prop_assert_eq!(err.offset, prefix.len());
    }
}
