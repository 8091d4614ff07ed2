use derive_more::Display;

/// Syntax the editor highlights a file with, picked from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Language {
    #[display("javascript")]
    JavaScript,
    #[display("typescript")]
    TypeScript,
    #[display("python")]
    Python,
    #[display("html")]
    Html,
    #[display("css")]
    Css,
    #[display("plaintext")]
    PlainText,
}

impl Language {
    pub fn from_file_name(name: &str) -> Self {
        let extension = name.rsplit('.').next().unwrap_or(name);
        match extension {
            "js" => Language::JavaScript,
            "ts" => Language::TypeScript,
            "py" => Language::Python,
            "html" => Language::Html,
            "css" => Language::Css,
            _ => Language::PlainText,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("main.js", Language::JavaScript)]
    #[case("app.component.ts", Language::TypeScript)]
    #[case("script.py", Language::Python)]
    #[case("index.html", Language::Html)]
    #[case("site.css", Language::Css)]
    #[case("README.md", Language::PlainText)]
    #[case("Makefile", Language::PlainText)]
    #[case("archive.JS", Language::PlainText)]
    fn picks_language_from_extension(#[case] name: &str, #[case] expected: Language) {
        assert_eq!(Language::from_file_name(name), expected);
    }

    #[test]
    fn display_matches_editor_ids() {
        assert_eq!(Language::JavaScript.to_string(), "javascript");
        assert_eq!(Language::PlainText.to_string(), "plaintext");
    }
}
