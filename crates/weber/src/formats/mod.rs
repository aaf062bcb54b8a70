// ABOUTME: Schema sinks: pretty JSON, the .json output path rule, and scraping-code generation.
// ABOUTME: Generated scripts re-select each schema node with CSS selectors nested like the schema.

//! Output formats for inferred schemas.
//!
//! JSON uses four-space indentation. Generated code mirrors the schema tree:
//! the root is selected anywhere in the document, every child is selected
//! among the direct children of its parent match, and leaves print their text.
//! Variable names derive from the node's position so output is reproducible.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Result, WeberError};
use crate::resource::is_website;
use crate::schema::Schema;

/// Target ecosystem for generated scraping code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeTarget {
    /// Rust using the `scraper` crate.
    #[default]
    Scraper,
    /// Python using BeautifulSoup.
    BeautifulSoup,
}

impl fmt::Display for CodeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CodeTarget::Scraper => "scraper",
            CodeTarget::BeautifulSoup => "bs4",
        };
        write!(f, "{}", s)
    }
}

/// Serialize a schema as JSON indented with four spaces.
pub fn to_json_pretty(schema: &Schema) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    schema
        .serialize(&mut ser)
        .map_err(|e| WeberError::write(&schema.name, "Serialize", Some(anyhow::Error::new(e))))?;
    String::from_utf8(buf)
        .map_err(|e| WeberError::write(&schema.name, "Serialize", Some(anyhow::Error::new(e))))
}

/// The path a JSON schema is written to: the extension is forced to `.json`.
pub fn json_output_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match path.extension() {
        Some(ext) if ext == "json" => path.to_path_buf(),
        _ => path.with_extension("json"),
    }
}

/// CSS selector for a schema node: tag name plus every retained attribute token.
pub fn css_selector(schema: &Schema) -> String {
    let mut selector = schema.name.clone();
    if let Some(attrs) = &schema.attrs {
        for (attr, tokens) in attrs {
            for token in tokens {
                if attr == "class" && is_css_ident(token) {
                    selector.push('.');
                    selector.push_str(token);
                } else {
                    selector.push_str(&format!(
                        "[{}~=\"{}\"]",
                        attr,
                        token.replace('\\', "\\\\").replace('"', "\\\"")
                    ));
                }
            }
        }
    }
    selector
}

fn is_css_ident(token: &str) -> bool {
    let rest = token.strip_prefix('-').unwrap_or(token);
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Render an extraction script for `schema` reading the document at `source`.
pub fn render_code(schema: &Schema, source: &str, target: CodeTarget) -> String {
    let mut out = CodeWriter::default();
    match target {
        CodeTarget::Scraper => render_scraper(&mut out, schema, source),
        CodeTarget::BeautifulSoup => render_bs4(&mut out, schema, source),
    }
    out.finish()
}

#[derive(Default)]
struct CodeWriter {
    lines: Vec<String>,
    indent: usize,
    unit: &'static str,
}

impl CodeWriter {
    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", self.unit.repeat(self.indent), text));
        }
    }

    fn finish(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

fn rust_str(s: &str) -> String {
    format!("{:?}", s)
}

fn py_str(s: &str) -> String {
    format!(
        "\"{}\"",
        s.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    )
}

fn var_name(path: &[usize]) -> String {
    let parts: Vec<String> = path.iter().map(usize::to_string).collect();
    format!("node_{}", parts.join("_"))
}

fn render_scraper(out: &mut CodeWriter, schema: &Schema, source: &str) {
    out.unit = "    ";
    out.line(format!("// Generated by weber from {}", source));
    out.line("use scraper::{ElementRef, Html, Selector};");
    out.line("");
    out.line("fn do_scrape(html: &Html) {");
    out.indent += 1;
    walk_scraper(out, schema, None, &mut vec![0]);
    out.indent -= 1;
    out.line("}");
    out.line("");
    out.line("fn main() -> Result<(), Box<dyn std::error::Error>> {");
    out.indent += 1;
    if is_website(source) {
        out.line(format!(
            "let raw = reqwest::blocking::get({})?.text()?;",
            rust_str(source)
        ));
    } else {
        out.line(format!("let raw = std::fs::read_to_string({})?;", rust_str(source)));
    }
    out.line("do_scrape(&Html::parse_document(&raw));");
    out.line("Ok(())");
    out.indent -= 1;
    out.line("}");
}

fn walk_scraper(out: &mut CodeWriter, schema: &Schema, parent: Option<&str>, path: &mut Vec<usize>) {
    let var = var_name(path);
    let sel = format!("sel_{}", &var["node_".len()..]);
    out.line(format!(
        "let {} = Selector::parse({}).unwrap();",
        sel,
        rust_str(&css_selector(schema))
    ));
    match parent {
        None => out.line(format!("for {} in html.select(&{}) {{", var, sel)),
        Some(parent) => out.line(format!(
            "for {} in {}.children().filter_map(ElementRef::wrap).filter(|el| {}.matches(el)) {{",
            var, parent, sel
        )),
    }
    out.indent += 1;
    if schema.children().is_empty() {
        out.line(format!(
            "println!(\"{{}}\", {}.text().collect::<String>().trim());",
            var
        ));
    }
    for (i, child) in schema.children().iter().enumerate() {
        path.push(i);
        walk_scraper(out, child, Some(var.as_str()), path);
        path.pop();
    }
    out.indent -= 1;
    out.line("}");
}

fn render_bs4(out: &mut CodeWriter, schema: &Schema, source: &str) {
    out.unit = "  ";
    out.line(format!("# Generated by weber from {}", source));
    out.line("from bs4 import BeautifulSoup");
    if is_website(source) {
        out.line("from urllib.request import urlopen");
    }
    out.line("");
    out.line("def doScrape(html):");
    out.indent += 1;
    walk_bs4(out, schema, None, &mut vec![0]);
    out.indent -= 1;
    out.line("");
    let read = if is_website(source) {
        format!("urlopen({}).read().decode('utf-8')", py_str(source))
    } else {
        format!("open({}).read()", py_str(source))
    };
    out.line(format!("doScrape(BeautifulSoup({}, 'html.parser'))", read));
}

fn walk_bs4(out: &mut CodeWriter, schema: &Schema, parent: Option<&str>, path: &mut Vec<usize>) {
    let var = var_name(path);
    let selector = css_selector(schema);
    match parent {
        None => out.line(format!("for {} in html.select({}):", var, py_str(&selector))),
        Some(parent) => out.line(format!(
            "for {} in {}.select({}):",
            var,
            parent,
            py_str(&format!(":scope > {}", selector))
        )),
    }
    out.indent += 1;
    if schema.children().is_empty() {
        out.line(format!("print({}.get_text(strip=True))", var));
    }
    for (i, child) in schema.children().iter().enumerate() {
        path.push(i);
        walk_bs4(out, child, Some(var.as_str()), path);
        path.pop();
    }
    out.indent -= 1;
}
