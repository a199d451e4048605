//! Language detection: extension override, then weighted regex signatures.
//!
//! Each language carries a list of `(pattern, weight)` signatures. A
//! language's score is the sum of `weight * match_count` over its list; the
//! winner's confidence saturates at [`DETECTION_SATURATION_SCORE`].

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use sentinel_core::constants::DETECTION_SATURATION_SCORE;
use serde::{Deserialize, Serialize};

use super::types::Language;

/// Result of language identification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub language: Language,
    /// In `[0, 1]`. `1.0` for an extension hit, `0.0` when nothing matched.
    pub confidence: f64,
}

struct Signature {
    regex: Regex,
    weight: u32,
}

type SignatureTable = Vec<(Language, Vec<Signature>)>;

const RAW_SIGNATURES: &[(Language, &[(&str, u32)])] = &[
    (
        Language::TypeScript,
        &[
            (r"\binterface\s+\w+\s*\{", 10),
            (r":\s*(string|number|boolean|any)\b", 8),
            (r"\btype\s+\w+\s*=", 10),
            (r"<\w+>\s*\(", 5),
            (r"\basync\s+function", 3),
        ],
    ),
    (
        Language::Java,
        &[
            (r"\bpublic\s+(static\s+)?(void|class|interface)", 15),
            (r"\bprivate\s+(static\s+)?(void|class)", 12),
            (r"\bString\s+\w+\s*=", 10),
            (r"\bSystem\.out\.print", 15),
            (r"\bimport\s+java\.", 20),
            (r"\bnew\s+\w+\s*\(", 5),
            (r"\bextends\s+\w+", 8),
            (r"\bimplements\s+\w+", 10),
        ],
    ),
    (
        Language::CSharp,
        &[
            (r"\busing\s+System", 20),
            (r"\bnamespace\s+\w+", 15),
            (r"\bConsole\.(Write|Read)", 15),
            (r"\bvar\s+\w+\s*=", 5),
            (r"\basync\s+Task", 10),
            (r"\bpublic\s+partial\s+class", 12),
        ],
    ),
    (
        Language::Cpp,
        &[
            (r"#include\s*<\w+>", 15),
            (r"\bstd::", 20),
            (r"\bcout\s*<<", 15),
            (r"\bcin\s*>>", 15),
            (r"\busing\s+namespace\s+std", 20),
            (r"\btemplate\s*<", 10),
            (r"\bclass\s+\w+\s*:", 8),
            (r"nullptr", 10),
        ],
    ),
    (
        Language::C,
        &[
            (r"#include\s*<stdio\.h>", 20),
            (r"#include\s*<stdlib\.h>", 20),
            (r"\bprintf\s*\(", 15),
            (r"\bscanf\s*\(", 15),
            (r"\bmalloc\s*\(", 12),
            (r"\bfree\s*\(", 10),
            (r"\bint\s+main\s*\(", 15),
            (r"\bchar\s*\*", 8),
        ],
    ),
    (
        Language::Go,
        &[
            (r"\bpackage\s+\w+", 20),
            (r"\bfunc\s+\w+\s*\(", 15),
            (r"\bfmt\.(Print|Scan)", 15),
            (r":=", 10),
            (r"\bgo\s+func", 12),
            (r"\bchan\s+\w+", 12),
            (r"\bdefer\s+", 10),
        ],
    ),
    (
        Language::Ruby,
        &[
            (r"\bdef\s+\w+", 10),
            (r"\bend\s*$", 8),
            (r#"\brequire\s+['"]"#, 15),
            (r"\battr_(reader|writer|accessor)", 15),
            (r"\bputs\s+", 12),
            (r"\bclass\s+\w+\s*<", 10),
            (r"\.each\s+do\s*\|", 12),
        ],
    ),
    (
        Language::Php,
        &[
            (r"<\?php", 25),
            (r"\$\w+\s*=", 15),
            (r"\becho\s+", 12),
            (r"\bfunction\s+\w+\s*\(", 8),
            (r"\barray\s*\(", 10),
            (r"->", 5),
        ],
    ),
    (
        Language::JavaScript,
        &[
            (r"\bconst\s+\w+\s*=", 8),
            (r"\blet\s+\w+\s*=", 8),
            (r"\bvar\s+\w+\s*=", 6),
            (r"\bfunction\s+\w+\s*\(", 8),
            (r"=>", 6),
            (r"\bconsole\.(log|error|warn)", 15),
            (r#"\brequire\s*\(['"]"#, 12),
            (r"\bexport\s+(default|const|function)", 12),
            (r#"\bimport\s+.*\s+from\s+['"]"#, 12),
        ],
    ),
    (
        Language::Python,
        &[
            (r"\bdef\s+\w+\s*\(", 10),
            (r"\bimport\s+\w+", 10),
            (r"\bfrom\s+\w+\s+import", 12),
            (r"\bprint\s*\(", 8),
            (r"\bclass\s+\w+\s*(\(|:)", 10),
            (r"\bself\.\w+", 12),
            (r"\bif\s+.*:", 5),
            (r"\belif\s+", 10),
            (r"\b__\w+__", 10),
        ],
    ),
];

static SIGNATURES: LazyLock<SignatureTable> = LazyLock::new(|| {
    RAW_SIGNATURES
        .iter()
        .map(|(lang, raw)| {
            let sigs = raw
                .iter()
                .filter_map(|(pattern, weight)| {
                    // Multi-line so `^`/`$` anchor per line.
                    match Regex::new(&format!("(?m){pattern}")) {
                        Ok(regex) => Some(Signature {
                            regex,
                            weight: *weight,
                        }),
                        Err(e) => {
                            tracing::error!(language = %lang, pattern, error = %e, "bad detection signature");
                            None
                        }
                    }
                })
                .collect();
            (*lang, sigs)
        })
        .collect()
});

/// Score every language against `code`. Languages appear in signature-table order.
pub fn score_languages(code: &str) -> Vec<(Language, u32)> {
    SIGNATURES
        .iter()
        .map(|(lang, sigs)| {
            let score: u32 = sigs
                .iter()
                .map(|s| s.weight * s.regex.find_iter(code).count() as u32)
                .sum();
            (*lang, score)
        })
        .collect()
}

/// Identify the language of `code`.
///
/// A recognized `filename` extension wins outright with confidence `1.0`.
/// Otherwise the highest content score wins; ties go to the
/// lexicographically smallest language tag. No signal at all yields
/// `python` with confidence `0.0`.
pub fn detect_language(code: &str, filename: Option<&str>) -> Detection {
    if let Some(language) = filename
        .and_then(|f| Path::new(f).extension())
        .and_then(|e| e.to_str())
        .and_then(|e| Language::from_extension(Some(e)))
    {
        return Detection {
            language,
            confidence: 1.0,
        };
    }

    let best = score_languages(code)
        .into_iter()
        .max_by(|(la, sa), (lb, sb)| sa.cmp(sb).then_with(|| lb.tag().cmp(la.tag())));

    match best {
        Some((language, score)) if score > 0 => Detection {
            language,
            confidence: (f64::from(score) / DETECTION_SATURATION_SCORE).min(1.0),
        },
        _ => Detection {
            language: Language::Python,
            confidence: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_signature_compiles() {
        let compiled: usize = SIGNATURES.iter().map(|(_, s)| s.len()).sum();
        let declared: usize = RAW_SIGNATURES.iter().map(|(_, s)| s.len()).sum();
        assert_eq!(compiled, declared);
    }

    #[test]
    fn extension_overrides_content() {
        let d = detect_language(
            "#include <stdio.h>\nint main() { printf(\"x\"); }",
            Some("script.PY"),
        );
        assert_eq!(d.language, Language::Python);
        assert_eq!(d.confidence, 1.0);
    }

    #[test]
    fn unknown_extension_falls_through_to_content() {
        let d = detect_language(
            "package main\nfunc main() {\n\tx := 1\n\tfmt.Println(x)\n}",
            Some("notes.txt"),
        );
        assert_eq!(d.language, Language::Go);
        assert_eq!(d.confidence, 1.0);
    }

    #[test]
    fn no_signal_defaults_to_python() {
        let d = detect_language("   \n\n", None);
        assert_eq!(d.language, Language::Python);
        assert_eq!(d.confidence, 0.0);
    }

    #[test]
    fn tie_resolves_to_smallest_tag() {
        // `function f(` hits the php and javascript function signatures at 8 each.
        let d = detect_language("function f(", None);
        assert_eq!(d.language, Language::JavaScript);
        assert!((d.confidence - 8.0 / 50.0).abs() < 1e-9);
    }

    #[test]
    fn php_open_tag_dominates() {
        let d = detect_language("<?php\n$x = 1;\necho $x;\n", None);
        assert_eq!(d.language, Language::Php);
    }
}
