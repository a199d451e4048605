//! The fixed set of supported languages.

use serde::{Deserialize, Serialize};

/// Supported programming languages. The serialized tag is the one used in
/// feature names (`python_call`, `is_c_sharp`) and verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "python")]
    Python,
    #[serde(rename = "java")]
    Java,
    #[serde(rename = "javascript")]
    JavaScript,
    #[serde(rename = "typescript")]
    TypeScript,
    #[serde(rename = "c")]
    C,
    #[serde(rename = "cpp")]
    Cpp,
    #[serde(rename = "c_sharp")]
    CSharp,
    #[serde(rename = "go")]
    Go,
    #[serde(rename = "ruby")]
    Ruby,
    #[serde(rename = "php")]
    Php,
}

impl Language {
    /// All supported languages, in declaration order.
    pub const ALL: [Language; 10] = [
        Language::Python,
        Language::Java,
        Language::JavaScript,
        Language::TypeScript,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Go,
        Language::Ruby,
        Language::Php,
    ];

    /// The stable lowercase tag (`"c_sharp"`, `"cpp"`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "c_sharp",
            Language::Go => "go",
            Language::Ruby => "ruby",
            Language::Php => "php",
        }
    }

    /// Detect language from a file extension string (case-insensitive).
    pub fn from_extension(ext: Option<&str>) -> Option<Language> {
        let ext = ext?.to_ascii_lowercase();
        match ext.as_str() {
            "py" | "pyi" => Some(Language::Python),
            "java" => Some(Language::Java),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "c" | "h" => Some(Language::C),
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => Some(Language::Cpp),
            "cs" => Some(Language::CSharp),
            "go" => Some(Language::Go),
            "rb" | "rake" | "gemspec" => Some(Language::Ruby),
            "php" => Some(Language::Php),
            _ => None,
        }
    }

    /// Get the tree-sitter grammar for this language.
    pub fn ts_language(&self) -> tree_sitter::Language {
        match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::C => tree_sitter_c::LANGUAGE.into(),
            Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Language::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Ruby => tree_sitter_ruby::LANGUAGE.into(),
            Language::Php => tree_sitter_php::LANGUAGE_PHP.into(),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_tags() {
        let json = serde_json::to_string(&Language::CSharp).unwrap();
        assert_eq!(json, "\"c_sharp\"");
        let back: Language = serde_json::from_str("\"javascript\"").unwrap();
        assert_eq!(back, Language::JavaScript);
    }

    #[test]
    fn extension_lookup_ignores_case() {
        assert_eq!(Language::from_extension(Some("PY")), Some(Language::Python));
        assert_eq!(Language::from_extension(Some("Hpp")), Some(Language::Cpp));
        assert_eq!(Language::from_extension(Some("txt")), None);
        assert_eq!(Language::from_extension(None), None);
    }
}
