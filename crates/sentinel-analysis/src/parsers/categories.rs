//! Cross-language structural categories.
//!
//! Each category lists, per language, the grammar node tags that express the
//! same construct. Counts summed over those tags become `common_<category>`
//! features, so one classifier schema spans every grammar.

use serde::Serialize;

use crate::language::Language;

/// A language-independent structural construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FunctionDefinition,
    ClassDefinition,
    VariableDeclaration,
    CallExpression,
    StringLiteral,
    ImportStatement,
    IfStatement,
    LoopStatement,
    BinaryExpression,
    ExceptionHandling,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::FunctionDefinition,
        Category::ClassDefinition,
        Category::VariableDeclaration,
        Category::CallExpression,
        Category::StringLiteral,
        Category::ImportStatement,
        Category::IfStatement,
        Category::LoopStatement,
        Category::BinaryExpression,
        Category::ExceptionHandling,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::FunctionDefinition => "function_definition",
            Category::ClassDefinition => "class_definition",
            Category::VariableDeclaration => "variable_declaration",
            Category::CallExpression => "call_expression",
            Category::StringLiteral => "string_literal",
            Category::ImportStatement => "import_statement",
            Category::IfStatement => "if_statement",
            Category::LoopStatement => "loop_statement",
            Category::BinaryExpression => "binary_expression",
            Category::ExceptionHandling => "exception_handling",
        }
    }

    /// Feature key of this category's aggregate count.
    pub fn feature_name(&self) -> String {
        format!("common_{}", self.name())
    }
}

type LanguageTags = &'static [(Language, &'static [&'static str])];

/// Node tags per category. A language with no entry has no such construct.
const DEFAULT_TABLE: &[(Category, LanguageTags)] = &[
    (
        Category::FunctionDefinition,
        &[
            (Language::Python, &["function_definition"]),
            (Language::Java, &["method_declaration", "constructor_declaration"]),
            (
                Language::JavaScript,
                &["function_declaration", "arrow_function", "method_definition"],
            ),
            (
                Language::TypeScript,
                &["function_declaration", "arrow_function", "method_definition"],
            ),
            (Language::C, &["function_definition"]),
            (Language::Cpp, &["function_definition"]),
            (Language::CSharp, &["method_declaration"]),
            (
                Language::Go,
                &["function_declaration", "method_declaration", "func_literal"],
            ),
            (Language::Ruby, &["method", "singleton_method"]),
            (Language::Php, &["function_definition", "method_declaration"]),
        ],
    ),
    (
        Category::ClassDefinition,
        &[
            (Language::Python, &["class_definition"]),
            (Language::Java, &["class_declaration", "class_body"]),
            (Language::JavaScript, &["class_declaration", "class_body"]),
            (Language::TypeScript, &["class_declaration", "class_body"]),
            (Language::C, &["struct_specifier"]),
            (Language::Cpp, &["class_specifier", "struct_specifier"]),
            (Language::CSharp, &["class_declaration"]),
            (Language::Ruby, &["class", "module"]),
            (Language::Php, &["class_declaration"]),
        ],
    ),
    (
        Category::VariableDeclaration,
        &[
            (Language::Python, &["assignment"]),
            (
                Language::Java,
                &["local_variable_declaration", "variable_declarator"],
            ),
            (
                Language::JavaScript,
                &["variable_declaration", "lexical_declaration", "variable_declarator"],
            ),
            (
                Language::TypeScript,
                &["variable_declaration", "lexical_declaration", "variable_declarator"],
            ),
            (Language::C, &["declaration", "init_declarator"]),
            (Language::Cpp, &["declaration", "init_declarator"]),
            (
                Language::CSharp,
                &["variable_declaration", "variable_declarator"],
            ),
            (Language::Go, &["short_var_declaration", "var_declaration"]),
            (Language::Ruby, &["assignment"]),
            (Language::Php, &["assignment_expression"]),
        ],
    ),
    (
        Category::CallExpression,
        &[
            (Language::Python, &["call"]),
            (Language::Java, &["method_invocation"]),
            (Language::JavaScript, &["call_expression"]),
            (Language::TypeScript, &["call_expression"]),
            (Language::C, &["call_expression"]),
            (Language::Cpp, &["call_expression"]),
            (Language::CSharp, &["invocation_expression"]),
            (Language::Go, &["call_expression"]),
            (Language::Ruby, &["call"]),
            (
                Language::Php,
                &["function_call_expression", "member_call_expression"],
            ),
        ],
    ),
    (
        Category::StringLiteral,
        &[
            (Language::Python, &["string"]),
            (Language::Java, &["string_literal"]),
            (Language::JavaScript, &["string", "template_string"]),
            (Language::TypeScript, &["string", "template_string"]),
            (Language::C, &["string_literal"]),
            (Language::Cpp, &["string_literal"]),
            (Language::CSharp, &["string_literal"]),
            (
                Language::Go,
                &["interpreted_string_literal", "raw_string_literal"],
            ),
            (Language::Ruby, &["string"]),
            (Language::Php, &["string", "encapsed_string"]),
        ],
    ),
    (
        Category::ImportStatement,
        &[
            (
                Language::Python,
                &["import_statement", "import_from_statement"],
            ),
            (Language::Java, &["import_declaration"]),
            (Language::JavaScript, &["import_statement"]),
            (Language::TypeScript, &["import_statement"]),
            (Language::C, &["preproc_include"]),
            (Language::Cpp, &["preproc_include", "using_declaration"]),
            (Language::CSharp, &["using_directive"]),
            (Language::Go, &["import_declaration"]),
            (
                Language::Php,
                &[
                    "namespace_use_declaration",
                    "include_expression",
                    "require_expression",
                ],
            ),
        ],
    ),
    (
        Category::IfStatement,
        &[
            (Language::Python, &["if_statement", "conditional_expression"]),
            (Language::Java, &["if_statement", "ternary_expression"]),
            (Language::JavaScript, &["if_statement", "ternary_expression"]),
            (Language::TypeScript, &["if_statement", "ternary_expression"]),
            (Language::C, &["if_statement", "conditional_expression"]),
            (Language::Cpp, &["if_statement", "conditional_expression"]),
            (Language::CSharp, &["if_statement", "conditional_expression"]),
            (Language::Go, &["if_statement"]),
            (Language::Ruby, &["if", "unless", "conditional"]),
            (Language::Php, &["if_statement", "conditional_expression"]),
        ],
    ),
    (
        Category::LoopStatement,
        &[
            (Language::Python, &["for_statement", "while_statement"]),
            (
                Language::Java,
                &[
                    "for_statement",
                    "enhanced_for_statement",
                    "while_statement",
                    "do_statement",
                ],
            ),
            (
                Language::JavaScript,
                &[
                    "for_statement",
                    "for_in_statement",
                    "while_statement",
                    "do_statement",
                ],
            ),
            (
                Language::TypeScript,
                &[
                    "for_statement",
                    "for_in_statement",
                    "while_statement",
                    "do_statement",
                ],
            ),
            (
                Language::C,
                &["for_statement", "while_statement", "do_statement"],
            ),
            (
                Language::Cpp,
                &[
                    "for_statement",
                    "for_range_loop",
                    "while_statement",
                    "do_statement",
                ],
            ),
            (Language::CSharp, &["for_statement", "while_statement"]),
            (Language::Go, &["for_statement", "range_clause"]),
            (Language::Ruby, &["for", "while", "until"]),
            (
                Language::Php,
                &["for_statement", "foreach_statement", "while_statement"],
            ),
        ],
    ),
    (
        Category::BinaryExpression,
        &[
            (
                Language::Python,
                &["binary_operator", "comparison_operator", "boolean_operator"],
            ),
            (Language::Java, &["binary_expression"]),
            (Language::JavaScript, &["binary_expression"]),
            (Language::TypeScript, &["binary_expression"]),
            (Language::C, &["binary_expression"]),
            (Language::Cpp, &["binary_expression"]),
            (Language::CSharp, &["binary_expression"]),
            (Language::Go, &["binary_expression"]),
            (Language::Ruby, &["binary"]),
            (Language::Php, &["binary_expression"]),
        ],
    ),
    (
        Category::ExceptionHandling,
        &[
            (Language::Python, &["try_statement", "except_clause"]),
            (Language::Java, &["try_statement", "catch_clause"]),
            (Language::JavaScript, &["try_statement", "catch_clause"]),
            (Language::TypeScript, &["try_statement", "catch_clause"]),
            (Language::Cpp, &["try_statement", "catch_clause"]),
            (Language::CSharp, &["try_statement", "catch_clause"]),
            (Language::Ruby, &["begin", "rescue"]),
            (Language::Php, &["try_statement", "catch_clause"]),
        ],
    ),
];

/// Problems found when checking the table against loaded grammars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CategoryIssue {
    /// The grammar has no named node kind with this tag.
    UnknownTag {
        category: Category,
        language: Language,
        tag: &'static str,
    },
    /// None of the listed tags exist, so the category would always count zero.
    EmptyCategory {
        category: Category,
        language: Language,
    },
}

/// The typed category → language → tags table.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    entries: &'static [(Category, LanguageTags)],
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TABLE,
        }
    }
}

impl CategoryTable {
    /// Tags for `category` in `language`; empty when the language lacks the construct.
    pub fn tags(&self, category: Category, language: Language) -> &'static [&'static str] {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .and_then(|(_, langs)| langs.iter().find(|(l, _)| *l == language))
            .map(|(_, tags)| *tags)
            .unwrap_or(&[])
    }

    /// The category a node tag belongs to in `language`, if any.
    pub fn category_of(&self, language: Language, kind: &str) -> Option<Category> {
        self.entries.iter().find_map(|(category, langs)| {
            langs
                .iter()
                .any(|(l, tags)| *l == language && tags.contains(&kind))
                .then_some(*category)
        })
    }

    /// Check every listed tag against the grammar's node-kind table.
    ///
    /// Languages whose grammar is not available are skipped.
    pub fn validate(&self, registry: &super::ParserRegistry) -> Vec<CategoryIssue> {
        let mut issues = Vec::new();
        for (category, langs) in self.entries {
            for (language, tags) in langs.iter() {
                let Some(grammar) = registry.grammar(*language) else {
                    continue;
                };
                let mut valid = 0usize;
                for tag in tags.iter() {
                    if grammar.id_for_node_kind(tag, true) != 0 {
                        valid += 1;
                    } else {
                        issues.push(CategoryIssue::UnknownTag {
                            category: *category,
                            language: *language,
                            tag: *tag,
                        });
                    }
                }
                if valid == 0 {
                    issues.push(CategoryIssue::EmptyCategory {
                        category: *category,
                        language: *language,
                    });
                }
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_agree_in_both_directions() {
        let table = CategoryTable::default();
        assert_eq!(
            table.category_of(Language::Python, "call"),
            Some(Category::CallExpression)
        );
        assert!(table
            .tags(Category::CallExpression, Language::Python)
            .contains(&"call"));
        assert_eq!(table.category_of(Language::Java, "call"), None);
    }

    #[test]
    fn missing_construct_has_no_tags() {
        let table = CategoryTable::default();
        assert!(table.tags(Category::ExceptionHandling, Language::Go).is_empty());
    }

    #[test]
    fn feature_names_are_prefixed() {
        assert_eq!(
            Category::LoopStatement.feature_name(),
            "common_loop_statement"
        );
    }
}
