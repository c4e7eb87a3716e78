//! Format matcher: score how likely an input is a Touchstone file.

/// Confidence (out of 100) assigned to a matching file name.
const FILENAME_CONFIDENCE: u8 = 10;

const DOT_EXTENSIONS: [&str; 8] = [
    ".s1p", ".s2p", ".s3p", ".s4p", ".s5p", ".s6p", ".s7p", ".s8p",
];

/// Return a confidence score for the candidate file name, or `None`
/// when nothing points at Touchstone.
///
/// File names are a strong hint, so a `.s1p`..`.s8p` suffix scores
/// immediately.
// TODO: grow a header-snippet argument and sniff for an option line or
// [VERSION] keyword.
pub fn format_match(filename: Option<&str>) -> Option<u8> {
    let name = filename?.to_ascii_lowercase();
    DOT_EXTENSIONS
        .iter()
        .any(|ext| name.ends_with(ext))
        .then_some(FILENAME_CONFIDENCE)
}
