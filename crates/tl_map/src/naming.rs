use serde::Deserialize;

/// How in-memory names are spelled in documents.
///
/// Applied to member names that carry no explicit rename, to enum variant
/// names, and to the type identifier used to name sequence items.
///
/// ```
/// use tl_map::NamingConvention;
///
/// assert_eq!(NamingConvention::PascalCase.apply("first_name"), "FirstName");
/// assert_eq!(NamingConvention::CamelCase.apply("first_name"), "firstName");
/// assert_eq!(NamingConvention::SnakeCase.apply("HTTPServer"), "http_server");
/// assert_eq!(NamingConvention::KebabCase.apply("Value2"), "value2");
/// assert_eq!(NamingConvention::AsIs.apply("first_name"), "first_name");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum NamingConvention {
    #[default]
    AsIs,
    PascalCase,
    CamelCase,
    SnakeCase,
    KebabCase,
    LowerCase,
    UpperCase,
}

impl NamingConvention {
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::AsIs => name.to_owned(),
            Self::LowerCase => words(name).concat().to_lowercase(),
            Self::UpperCase => words(name).concat().to_uppercase(),
            Self::SnakeCase => join_lower(name, "_"),
            Self::KebabCase => join_lower(name, "-"),
            Self::PascalCase => words(name).into_iter().map(capitalize).collect(),
            Self::CamelCase => {
                let mut out = String::with_capacity(name.len());
                for (i, word) in words(name).into_iter().enumerate() {
                    if i == 0 {
                        out.push_str(&word.to_lowercase());
                    } else {
                        out.push_str(&capitalize(word));
                    }
                }
                out
            }
        }
    }
}

fn join_lower(name: &str, sep: &str) -> String {
    words(name)
        .into_iter()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(sep)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Splits on separators and case boundaries, keeping acronyms together.
///
/// `"HTTPServer"` is `["HTTP", "Server"]`, `"value_2"` is `["value", "2"]`,
/// `"Value2"` is `["Value2"]`.
fn words(name: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let chars: Vec<(usize, char)> = name.char_indices().collect();
    let mut start: Option<usize> = None;

    for (i, &(pos, c)) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if let Some(s) = start.take() {
                out.push(&name[s..pos]);
            }
            continue;
        }
        let Some(s) = start else {
            start = Some(pos);
            continue;
        };
        if c.is_uppercase() {
            let prev = chars[i - 1].1;
            let next_lower = chars.get(i + 1).is_some_and(|&(_, n)| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                out.push(&name[s..pos]);
                start = Some(pos);
            }
        }
    }
    if let Some(s) = start {
        out.push(&name[s..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{NamingConvention, words};

    #[test]
    fn splits_words() {
        assert_eq!(words("first_name"), ["first", "name"]);
        assert_eq!(words("firstName"), ["first", "Name"]);
        assert_eq!(words("HTTPServer"), ["HTTP", "Server"]);
        assert_eq!(words("--a--b"), ["a", "b"]);
        assert!(words("").is_empty());
    }

    #[test]
    fn applies_each_convention() {
        let name = "phone_numbers";
        assert_eq!(NamingConvention::PascalCase.apply(name), "PhoneNumbers");
        assert_eq!(NamingConvention::CamelCase.apply(name), "phoneNumbers");
        assert_eq!(NamingConvention::KebabCase.apply(name), "phone-numbers");
        assert_eq!(NamingConvention::LowerCase.apply(name), "phonenumbers");
        assert_eq!(NamingConvention::UpperCase.apply(name), "PHONENUMBERS");
        assert_eq!(NamingConvention::SnakeCase.apply("PhoneNumbers"), name);
    }
}
