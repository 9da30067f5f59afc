/// Splits a comma-separated form value, trimming entries and dropping blanks
/// and repeats. First occurrence wins; comparison is case-sensitive.
pub fn split_list(raw: &str) -> Vec<String> {
    dedup(raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from))
}

pub fn dedup<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
