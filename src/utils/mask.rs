/// Shorten an API key for display: "sk-abcdefghijkl...vwxyz".
/// Keys too short to keep both ends only show a short prefix.
pub(crate) fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 20 {
        let head: String = chars[..15].iter().collect();
        let tail: String = chars[chars.len() - 5..].iter().collect();
        format!("{head}...{tail}")
    } else {
        let head: String = chars.iter().take(4).collect();
        format!("{head}...")
    }
}
