/// One candidate rewording of a tool description.
pub type Description = String;

/// The candidates of one generation, in insertion order. Duplicates are allowed.
pub type Population = Vec<Description>;

/// Number of whitespace-separated words in a description.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Number of characters (not bytes) in a description.
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}
