//! Corpus builder: split sources into function units, canonicalize, dedup.
//!
//! Parsing and canonicalization may fan out over rayon. Deduplication and
//! row appends stay on the calling thread, in input order, so a build over
//! the same inputs always yields the same rows.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;
use sentinel_core::config::CorpusConfig;
use sentinel_core::errors::CorpusError;
use sentinel_core::tracing::metrics;
use serde::Deserialize;

use super::dedup::{content_hash, DuplicateRegistry};
use super::types::{CorpusLabel, CorpusRow, CorpusStats};
use crate::canonical::{to_canonical_text, Canonicalizer};
use crate::language::{detect_language, Language};
use crate::parsers::{AstNode, Category, CategoryTable, ParserRegistry};

/// Sample folders under a data directory and their labels.
const LABELED_FOLDERS: [(&str, CorpusLabel); 2] = [
    ("clean", CorpusLabel::Clean),
    ("corrupted", CorpusLabel::Malicious),
];

const EXTERNAL_DEFAULT_SOURCE: &str = "external_unknown";

/// A source file waiting to be split and canonicalized.
struct PendingSource {
    raw: String,
    language: Language,
    label: CorpusLabel,
    source: String,
    split_functions: bool,
}

/// A canonicalized unit, ready for the dedup check.
struct PreparedUnit {
    raw_code: String,
    normalized_code: String,
    digest: String,
    name: String,
}

/// Row shape accepted by [`CorpusBuilder::add_external_jsonl`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExternalRow {
    #[serde(default)]
    raw_code: String,
    #[serde(default)]
    label: Option<CorpusLabel>,
    #[serde(default)]
    source: Option<String>,
}

pub struct CorpusBuilder<'r> {
    registry: &'r ParserRegistry,
    dedup: DuplicateRegistry,
    rows: Vec<CorpusRow>,
    stats: CorpusStats,
    parallel: bool,
}

impl<'r> CorpusBuilder<'r> {
    pub fn new(registry: &'r ParserRegistry) -> Self {
        Self {
            registry,
            dedup: DuplicateRegistry::new(),
            rows: Vec::new(),
            stats: CorpusStats::default(),
            parallel: true,
        }
    }

    /// Toggle rayon fan-out for batch ingestion.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Split one source into function units and append every new unit.
    /// Returns the number of rows added.
    pub fn add_source(
        &mut self,
        raw: &str,
        language: Language,
        label: CorpusLabel,
        source: &str,
    ) -> usize {
        self.ingest(vec![PendingSource {
            raw: raw.to_string(),
            language,
            label,
            source: source.to_string(),
            split_functions: true,
        }])
    }

    /// Walk `clean/` (label 0) and `corrupted/` (label 1) under `data_dir`.
    /// Hidden files and files without a known extension are skipped.
    pub fn add_directory(&mut self, data_dir: &Path) -> Result<usize, CorpusError> {
        if !data_dir.is_dir() {
            return Err(CorpusError::MissingDataDir {
                path: data_dir.to_path_buf(),
            });
        }

        let mut pending = Vec::new();
        for (folder, label) in LABELED_FOLDERS {
            let folder_path = data_dir.join(folder);
            if !folder_path.is_dir() {
                tracing::warn!(path = %folder_path.display(), "sample folder not found; skipping");
                continue;
            }
            for path in sample_files(&folder_path) {
                let Some(language) =
                    Language::from_extension(path.extension().and_then(|e| e.to_str()))
                else {
                    tracing::debug!(path = %path.display(), "unknown extension; skipping");
                    continue;
                };
                let raw = std::fs::read_to_string(&path).map_err(|source| CorpusError::Io {
                    path: path.clone(),
                    source,
                })?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                pending.push(PendingSource {
                    raw,
                    language,
                    label,
                    source: file_name,
                    split_functions: true,
                });
            }
        }

        tracing::info!(path = %data_dir.display(), files = pending.len(), "ingesting sample directory");
        Ok(self.ingest(pending))
    }

    /// Ingest external `{rawCode, label, source}` JSON lines. Each snippet is
    /// one unit; surrounding markdown fences are stripped and the language is
    /// detected from content.
    pub fn add_external_jsonl(&mut self, path: &Path) -> Result<usize, CorpusError> {
        let file = std::fs::File::open(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut pending = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|source| CorpusError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let row: ExternalRow =
                serde_json::from_str(&line).map_err(|e| CorpusError::MalformedRow {
                    path: path.to_path_buf(),
                    line: index + 1,
                    message: e.to_string(),
                })?;

            let code = strip_markdown_fences(&row.raw_code);
            if code.trim().is_empty() {
                continue;
            }
            let language = detect_language(&code, None).language;
            pending.push(PendingSource {
                raw: code,
                language,
                label: row.label.unwrap_or(CorpusLabel::Clean),
                source: row
                    .source
                    .unwrap_or_else(|| EXTERNAL_DEFAULT_SOURCE.to_string()),
                split_functions: false,
            });
        }

        Ok(self.ingest(pending))
    }

    pub fn rows(&self) -> &[CorpusRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<CorpusRow> {
        self.rows
    }

    pub fn stats(&self) -> CorpusStats {
        self.stats
    }

    /// Write every row as one JSON object per line.
    pub fn write_jsonl(&self, path: &Path) -> Result<(), CorpusError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| CorpusError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let io_err = |source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        for row in &self.rows {
            serde_json::to_writer(&mut writer, row)
                .map_err(|e| CorpusError::Serialization(e.to_string()))?;
            writer.write_all(b"\n").map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;
        tracing::info!(path = %path.display(), rows = self.rows.len(), "corpus written");
        Ok(())
    }

    fn ingest(&mut self, pending: Vec<PendingSource>) -> usize {
        let registry = self.registry;
        let prepared: Vec<Option<Vec<PreparedUnit>>> = if self.parallel && pending.len() > 1 {
            pending.par_iter().map(|p| prepare(registry, p)).collect()
        } else {
            pending.iter().map(|p| prepare(registry, p)).collect()
        };

        let before = self.rows.len();
        for (source, units) in pending.into_iter().zip(prepared) {
            self.stats.sources += 1;
            let Some(units) = units else {
                self.stats.unparseable += 1;
                tracing::warn!(source = %source.source, language = %source.language, "unparseable source skipped");
                continue;
            };
            for unit in units {
                self.stats.units += 1;
                if !self.dedup.record(&unit.digest) {
                    self.stats.duplicates += 1;
                    tracing::debug!(
                        source = %source.source,
                        unit = %unit.name,
                        { metrics::DEDUP_SKIPPED } = self.stats.duplicates,
                        "duplicate unit skipped"
                    );
                    continue;
                }
                let row_source = if source.split_functions {
                    format!("{}_{}", source.source, unit.name)
                } else {
                    source.source.clone()
                };
                self.rows.push(CorpusRow {
                    raw_code: unit.raw_code,
                    normalized_code: unit.normalized_code,
                    label: source.label,
                    source: row_source,
                });
                self.stats.kept += 1;
            }
        }
        self.rows.len() - before
    }
}

/// Parse, split, and canonicalize one source. `None` when it does not parse.
fn prepare(registry: &ParserRegistry, pending: &PendingSource) -> Option<Vec<PreparedUnit>> {
    let tree = registry.parse(&pending.raw, pending.language)?;

    let units: Vec<(&AstNode, String)> = if pending.split_functions {
        function_units(&tree, pending.language, registry.categories())
            .into_iter()
            .map(|node| (node, unit_name(node)))
            .collect()
    } else {
        Vec::new()
    };

    if units.is_empty() {
        return Some(vec![prepare_unit(
            tree.clone(),
            pending.raw.clone(),
            "module".to_string(),
        )]);
    }

    Some(
        units
            .into_iter()
            .map(|(node, name)| {
                let raw_code = node
                    .position
                    .and_then(|span| pending.raw.get(span.start_byte..span.end_byte))
                    .unwrap_or_default()
                    .to_string();
                prepare_unit(node.clone(), raw_code, name)
            })
            .collect(),
    )
}

fn prepare_unit(unit: AstNode, raw_code: String, name: String) -> PreparedUnit {
    // Fresh canonicalizer per unit.
    let canonical = Canonicalizer::new().canonicalize(unit);
    let normalized_code = to_canonical_text(&canonical.tree);
    let digest = content_hash(&normalized_code);
    PreparedUnit {
        raw_code,
        normalized_code,
        digest,
        name,
    }
}

/// Run a full build from configuration: `clean/` and `corrupted/` under the
/// data directory, then any `external/*.jsonl`, written to the output path.
pub fn build_corpus(
    config: &CorpusConfig,
    root: &Path,
    registry: &ParserRegistry,
) -> Result<CorpusStats, CorpusError> {
    let data_dir = config.effective_data_dir(root);
    let mut builder = CorpusBuilder::new(registry).with_parallel(config.effective_parallel());
    builder.add_directory(&data_dir)?;

    let external = data_dir.join("external");
    if external.is_dir() {
        for path in sample_files(&external) {
            if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
                builder.add_external_jsonl(&path)?;
            }
        }
    }

    builder.write_jsonl(&config.effective_output_path(root))?;
    let stats = builder.stats();
    tracing::info!(
        sources = stats.sources,
        kept = stats.kept,
        duplicates = stats.duplicates,
        unparseable = stats.unparseable,
        "corpus build finished"
    );
    Ok(stats)
}

/// Function-category nodes with no function-category ancestor, in document order.
fn function_units<'t>(
    tree: &'t AstNode,
    language: Language,
    categories: &CategoryTable,
) -> Vec<&'t AstNode> {
    let function_tags = categories.tags(Category::FunctionDefinition, language);
    let mut units = Vec::new();
    let mut stack = vec![tree];
    while let Some(node) = stack.pop() {
        if function_tags.contains(&node.kind.as_str()) {
            units.push(node);
            continue;
        }
        stack.extend(node.children.iter().rev());
    }
    units
}

/// The declared name of a function node, or `"anonymous"`.
fn unit_name(node: &AstNode) -> String {
    if let Some(name) = node.child_by_field("name") {
        return name.leaf_text();
    }
    // C-family functions nest the name inside a declarator chain.
    node.child_by_field("declarator")
        .and_then(|d| {
            d.preorder()
                .find(|n| n.named && n.is_leaf() && n.kind.ends_with("identifier"))
        })
        .and_then(|n| n.text.clone())
        .unwrap_or_else(|| "anonymous".to_string())
}

/// Regular, non-hidden files under `folder`, sorted by name.
fn sample_files(folder: &Path) -> Vec<PathBuf> {
    let mut walker = WalkBuilder::new(folder);
    walker
        .hidden(true)
        .git_ignore(false)
        .sort_by_file_name(|a, b| a.cmp(b));
    walker
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "walk error; entry skipped");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .collect()
}

/// Drop a leading ```` ```lang ```` line and a trailing ```` ``` ```` line.
fn strip_markdown_fences(code: &str) -> String {
    let trimmed = code.trim();
    if !trimmed.starts_with("```") {
        return code.to_string();
    }
    let mut lines: Vec<&str> = trimmed.lines().collect();
    if lines.first().is_some_and(|l| l.starts_with("```")) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.starts_with("```")) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fences_are_stripped() {
        assert_eq!(
            strip_markdown_fences("```python\nprint(1)\n```\n"),
            "print(1)"
        );
        assert_eq!(strip_markdown_fences("print(1)\n"), "print(1)\n");
    }

    #[test]
    fn splits_top_level_functions_only() {
        let registry = ParserRegistry::new();
        let mut builder = CorpusBuilder::new(&registry);
        let code = "def outer():\n    def inner():\n        return 1\n    return inner\n\ndef other(x):\n    return x * 2\n";
        let added = builder.add_source(code, Language::Python, CorpusLabel::Clean, "a.py");
        assert_eq!(added, 2);
        let sources: Vec<&str> = builder.rows().iter().map(|r| r.source.as_str()).collect();
        assert_eq!(sources, ["a.py_outer", "a.py_other"]);
        assert!(builder.rows()[1].raw_code.starts_with("def other(x):"));
    }

    #[test]
    fn file_without_functions_is_one_module_unit() {
        let registry = ParserRegistry::new();
        let mut builder = CorpusBuilder::new(&registry);
        builder.add_source("x = 1\nprint(x)\n", Language::Python, CorpusLabel::Malicious, "s.py");
        assert_eq!(builder.rows().len(), 1);
        assert_eq!(builder.rows()[0].source, "s.py_module");
        assert_eq!(builder.rows()[0].label, CorpusLabel::Malicious);
    }

    #[test]
    fn c_function_name_comes_from_declarator() {
        let registry = ParserRegistry::new();
        let mut builder = CorpusBuilder::new(&registry);
        builder.add_source(
            "int main(void) { return 0; }\n",
            Language::C,
            CorpusLabel::Clean,
            "m.c",
        );
        assert_eq!(builder.rows()[0].source, "m.c_main");
    }

    #[test]
    fn unparseable_source_is_counted() {
        let registry = ParserRegistry::new();
        let mut builder = CorpusBuilder::new(&registry);
        assert_eq!(
            builder.add_source("def f(:\n", Language::Python, CorpusLabel::Clean, "bad.py"),
            0
        );
        assert_eq!(builder.stats().unparseable, 1);
        assert_eq!(builder.stats().sources, 1);
    }
}
