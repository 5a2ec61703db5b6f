use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WORD_RUN: Regex = Regex::new(r"[A-Z][^A-Z]*").unwrap();
}

/// Converts `snake_case` to `PascalCase` (a.k.a. UpperCamelCase).
///
/// Every underscore-separated piece is title-cased, so `"http_server"`
/// becomes `"HttpServer"`. A letter after a digit starts a new word
/// (`"v2api"` -> `"V2Api"`). Empty pieces vanish.
pub fn snake_to_pascal(name: &str) -> String {
    name.split('_').map(title).collect()
}

/// Converts `PascalCase` to `snake_case`.
///
/// The name is cut into runs starting at each capital letter. Consecutive
/// single-letter runs are glued together so acronyms survive as one word:
/// `"HTTPServer"` becomes `"http_server"`, `"IDCode"` becomes `"id_code"`.
/// Anything before the first capital is dropped.
pub fn pascal_to_snake(name: &str) -> String {
    let runs: Vec<&str> = WORD_RUN.find_iter(name).map(|m| m.as_str()).collect();

    // Consecutive runs of equal length form one group.
    let mut groups: Vec<String> = Vec::new();
    let mut start = 0;
    while start < runs.len() {
        let length = runs[start].len();
        let end = runs[start..]
            .iter()
            .position(|run| run.len() != length)
            .map_or(runs.len(), |offset| start + offset);
        let separator = if length == 1 { "" } else { "_" };
        groups.push(runs[start..end].join(separator));
        start = end;
    }

    groups.join("_").to_lowercase()
}

/// Upper-cases every letter that does not follow another letter and
/// lower-cases the rest, so `"v2api"` becomes `"V2Api"`.
fn title(word: &str) -> String {
    let mut titled = String::with_capacity(word.len());
    let mut after_letter = false;
    for c in word.chars() {
        if after_letter {
            titled.extend(c.to_lowercase());
        } else {
            titled.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    titled
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("snake_case", "SnakeCase")]
    #[case("http_server", "HttpServer")]
    #[case("double__underscore", "DoubleUnderscore")]
    #[case("_leading", "Leading")]
    #[case("v2_api", "V2Api")]
    #[case("v2api_x1y", "V2ApiX1Y")]
    #[case("HTTP_server", "HttpServer")]
    #[case("already", "Already")]
    #[case("", "")]
    fn snake_to_pascal_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(snake_to_pascal(input), expected);
    }

    #[rstest]
    #[case("Color", "color")]
    #[case("TaskState", "task_state")]
    #[case("FooBarBaz", "foo_bar_baz")]
    #[case("HTTPServer", "http_server")]
    #[case("IDCode", "id_code")]
    #[case("ID", "id")]
    #[case("MyID", "my_id")]
    #[case("NullValue", "null_value")]
    #[case("camelCase", "case")]
    #[case("", "")]
    fn pascal_to_snake_cases(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(pascal_to_snake(input), expected);
    }

    #[test]
    fn equal_length_words_share_a_group() {
        // "Abc" and "Def" fall in one group joined with "_", "Gh" in another.
        assert_eq!(pascal_to_snake("AbcDefGh"), "abc_def_gh");
    }
}
