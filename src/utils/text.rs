//! Output formatting for converted messages.
//!
//! Converted symbols are printed in groups of five separated by a single
//! space; the final group may be shorter.

/// Number of symbols per output group.
pub const GROUP_SIZE: usize = 5;

/// Joins `symbols` into groups of [`GROUP_SIZE`] separated by one space.
///
/// No trailing space is produced, even when the length is a multiple of
/// the group size.
///
/// # Examples
///
/// ```
/// use rotorcrypt::utils::text::group;
///
/// let symbols: Vec<char> = "ILBDAAMTAZ".chars().collect();
/// assert_eq!(group(&symbols), "ILBDA AMTAZ");
/// ```
pub fn group(symbols: &[char]) -> String {
    let mut out = String::with_capacity(symbols.len() + symbols.len() / GROUP_SIZE);
    for (i, chunk) in symbols.chunks(GROUP_SIZE).enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.extend(chunk.iter());
    }
    out
}

/// Returns the non-whitespace characters of `text`, in order.
pub fn significant_chars(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|c| !c.is_whitespace())
}
