use tl_reflect::info::ScalarKind;

/// Template used when text names no variant of an enum.
pub const ENUM: &str = "'{value}' is not a valid option, must be one of the following: {options}.";

/// The default end-user template for a scalar family.
///
/// Templates may use `{value}` (the offending text), `{type}` (the type
/// name) and, for enums, `{options}`.
pub const fn template(kind: ScalarKind) -> &'static str {
    use ScalarKind::*;
    match kind {
        String => "'{value}' is not valid text.",
        Char => "Char '{value}' not formatted correctly, must be a single character.",
        Bool => "Boolean '{value}' not formatted correctly, must be 'true' or 'false'.",
        I8 => "Signed byte '{value}' not formatted correctly, must be an integer between -128 and 127.",
        U8 => "Byte '{value}' not formatted correctly, must be an integer between 0 and 255.",
        I16 => "Short '{value}' not formatted correctly, must be an integer between -32,768 and 32,767.",
        U16 => "Unsigned short '{value}' not formatted correctly, must be an integer between 0 and 65,535.",
        I32 => {
            "Integer '{value}' not formatted correctly, must be an integer between -2,147,483,648 and 2,147,483,647."
        }
        U32 => {
            "Unsigned integer '{value}' not formatted correctly, must be an integer between 0 and 4,294,967,295."
        }
        I64 | Isize => {
            "Long '{value}' not formatted correctly, must be an integer between -9,223,372,036,854,775,808 and 9,223,372,036,854,775,807."
        }
        U64 | Usize => {
            "Unsigned long '{value}' not formatted correctly, must be an integer between 0 and 18,446,744,073,709,551,615."
        }
        F32 => "Single '{value}' not formatted correctly, must be a number.",
        F64 => "Double '{value}' not formatted correctly, must be a number.",
        Duration => "Timespan '{value}' not formatted correctly, must be a number of seconds.",
        DateTime => "Datetime '{value}' not formatted correctly, must be an RFC 3339 date and time.",
        NaiveDate => "Date '{value}' not formatted correctly, must be formatted as YYYY-MM-DD.",
        NaiveDateTime => {
            "Datetime '{value}' not formatted correctly, must be formatted as YYYY-MM-DDTHH:MM:SS."
        }
        Uuid => {
            "UUID '{value}' not formatted correctly, should be formatted as 00000000-0000-0000-0000-000000000000."
        }
        Url => "Url '{value}' not formatted correctly, must be an absolute URL.",
    }
}

/// Fills in the placeholders of a template in one pass, so substituted
/// text is never expanded again. Unknown placeholders are kept as is.
pub fn render(template: &str, value: &str, type_name: &str, options: &str) -> String {
    let mut out = String::with_capacity(template.len() + value.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let fill = [("{value}", value), ("{type}", type_name), ("{options}", options)]
            .into_iter()
            .find(|(key, _)| rest.starts_with(key));
        match fill {
            Some((key, text)) => {
                out.push_str(text);
                rest = &rest[key.len()..];
            }
            None => {
                out.push('{');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use tl_reflect::info::ScalarKind;

    use super::{ENUM, render, template};

    #[test]
    fn renders_integer_message() {
        let text = render(template(ScalarKind::I32), "abc", "i32", "");
        assert_eq!(
            text,
            "Integer 'abc' not formatted correctly, must be an integer between -2,147,483,648 and 2,147,483,647."
        );
    }

    #[test]
    fn renders_enum_choices() {
        let text = render(ENUM, "Blue", "Colour", "Red, Green");
        assert_eq!(text, "'Blue' is not a valid option, must be one of the following: Red, Green.");
    }

    #[test]
    fn substituted_text_is_not_expanded_again() {
        let text = render("{value} / {type} / {other}", "{type}{options}", "u8", "x");
        assert_eq!(text, "{type}{options} / u8 / {other}");
    }
}
