/// Natural ordering for folder and file names
///
/// Names are split into alternating text and number runs, so that
/// "Chapter 2" sorts before "Chapter 10" and "ch1.5" falls between
/// "ch1" and "ch2". Text runs compare case-insensitively.
use std::cmp::Ordering;
use std::path::Path;

/// One run of a natural sort key
#[derive(Debug, Clone, PartialEq)]
pub enum KeyPart {
    Text(String),
    Number(f64),
}

/// Sort key built by [`natural_key`]
///
/// The parts always alternate text, number, text, ... starting and ending
/// with a (possibly empty) text run, so parts at the same position are
/// always of the same kind.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalKey(Vec<KeyPart>);

#[cfg(test)]
impl NaturalKey {
    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }
}

impl Eq for NaturalKey {}

impl PartialOrd for NaturalKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NaturalKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.0.iter().zip(other.0.iter()) {
            let ord = match (a, b) {
                (KeyPart::Number(x), KeyPart::Number(y)) => x.total_cmp(y),
                (KeyPart::Text(x), KeyPart::Text(y)) => x.cmp(y),
                // Unreachable for keys built by natural_key; kept total.
                (KeyPart::Number(_), KeyPart::Text(_)) => Ordering::Less,
                (KeyPart::Text(_), KeyPart::Number(_)) => Ordering::Greater,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}

/// Build the natural sort key of a name
pub fn natural_key(name: &str) -> NaturalKey {
    let mut parts = Vec::new();
    let mut rest = name;

    while let Some((start, end)) = find_number(rest) {
        parts.push(KeyPart::Text(rest[..start].to_lowercase()));
        let run = &rest[start..end];
        match run.parse::<f64>() {
            Ok(value) => parts.push(KeyPart::Number(value)),
            Err(_) => parts.push(KeyPart::Text(run.to_lowercase())),
        }
        rest = &rest[end..];
    }
    parts.push(KeyPart::Text(rest.to_lowercase()));

    NaturalKey(parts)
}

/// Compare two names in natural order
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Compare two paths by their final component in natural order
pub fn natural_cmp_paths(a: &Path, b: &Path) -> Ordering {
    let a_name = a.file_name().unwrap_or_default().to_string_lossy();
    let b_name = b.file_name().unwrap_or_default().to_string_lossy();
    natural_cmp(&a_name, &b_name)
}

/// Locate the first run matching `\d+(\.\d+)?` and return its byte range
fn find_number(s: &str) -> Option<(usize, usize)> {
    let bytes = s.as_bytes();
    let start = bytes.iter().position(|b| b.is_ascii_digit())?;

    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }

    // A fractional part only counts when a digit follows the dot
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    Some((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        names.sort_by(|a, b| natural_cmp(a, b));
        names
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert_eq!(sorted(&["ch1", "ch10", "ch2"]), vec!["ch1", "ch2", "ch10"]);
    }

    #[test]
    fn test_decimal_chapters() {
        assert_eq!(
            sorted(&["ch1", "ch2", "ch10", "ch1.5"]),
            vec!["ch1", "ch1.5", "ch2", "ch10"]
        );
    }

    #[test]
    fn test_text_is_case_insensitive() {
        assert_eq!(natural_cmp("Volume 3", "volume 3"), Ordering::Equal);
        assert_eq!(sorted(&["beta", "Alpha"]), vec!["Alpha", "beta"]);
    }

    #[test]
    fn test_key_alternates_text_and_numbers() {
        let key = natural_key("Chapter 12.5 extra");
        assert_eq!(
            key.parts(),
            &[
                KeyPart::Text("chapter ".to_string()),
                KeyPart::Number(12.5),
                KeyPart::Text(" extra".to_string()),
            ]
        );
    }

    #[test]
    fn test_trailing_dot_is_text() {
        let key = natural_key("v2.cbz");
        assert_eq!(
            key.parts(),
            &[
                KeyPart::Text("v".to_string()),
                KeyPart::Number(2.0),
                KeyPart::Text(".cbz".to_string()),
            ]
        );
    }

    #[test]
    fn test_paths_compare_by_file_name() {
        let a = Path::new("/z/Chapter 2.cbz");
        let b = Path::new("/a/Chapter 10.cbz");
        assert_eq!(natural_cmp_paths(a, b), Ordering::Less);
    }
}
