//! rill CLI
//!
//! Parses a document and prints the resulting tree, either as an indented
//! outline or as JSON. Input can be fed in fixed-size chunks to exercise
//! the streaming path.

mod json;

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, ValueEnum};
use log::debug;
use owo_colors::OwoColorize;
use rill_html::{DomHandler, DomHandlerOptions, Parser, ParserOptions, format_tree};

/// Output format for the parsed tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Indented outline, one node per line
    Tree,
    /// JSON array of root nodes
    Json,
}

/// rill — parse HTML or XML and print the document tree
#[derive(ClapParser, Debug)]
#[command(name = "rill")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Parse a file
    rill ./index.html

    # Parse inline HTML
    rill --html '<ul><li>one<li>two</ul>'

    # Read from stdin, decode entities, emit JSON
    cat page.html | rill --decode-entities --format json

    # XML with source offsets, fed 7 bytes at a time
    rill --xml --indices --chunk-size 7 feed.xml
"#)]
struct Cli {
    /// Path to the input file (stdin when omitted)
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this string instead of a file
    #[arg(long, value_name = "HTML", conflicts_with = "path")]
    html: Option<String>,

    /// Parse as XML
    #[arg(long)]
    xml: bool,

    /// Decode character references
    #[arg(long)]
    decode_entities: bool,

    /// Collapse whitespace runs in text nodes
    #[arg(long)]
    normalize_whitespace: bool,

    /// Report CDATA sections outside XML mode
    #[arg(long)]
    recognize_cdata: bool,

    /// Honour `/>` outside XML mode
    #[arg(long)]
    recognize_self_closing: bool,

    /// Record source offsets on every node
    #[arg(long)]
    indices: bool,

    /// Feed the parser this many bytes at a time (0 = all at once)
    #[arg(long, value_name = "BYTES", default_value = "0")]
    chunk_size: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "tree")]
    format: Format,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let input = read_input(&cli)?;
    let options = ParserOptions::new()
        .with_xml_mode(cli.xml)
        .with_decode_entities(cli.decode_entities)
        .with_recognize_cdata(cli.recognize_cdata)
        .with_recognize_self_closing(cli.recognize_self_closing);
    let dom_options = DomHandlerOptions::new()
        .with_normalize_whitespace(cli.normalize_whitespace)
        .with_indices(cli.indices);

    let mut parser = Parser::new(DomHandler::new(dom_options), options);
    let pieces = split_chunks(&input, cli.chunk_size);
    debug!("feeding {} bytes in {} chunks", input.len(), pieces.len());
    for piece in pieces {
        parser.write(piece);
    }
    parser.end();

    let tree = match parser.into_handler().into_result() {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            std::process::exit(1);
        }
    };

    match cli.format {
        Format::Tree => {
            println!("{}", "=== DOM Tree ===".bold());
            print!("{}", format_tree(&tree));
        }
        Format::Json => {
            let value = json::tree_to_json(&tree);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}

/// Load the document from `--html`, a file, or stdin.
fn read_input(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        return Ok(html.clone());
    }
    if let Some(ref path) = cli.path {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut input = String::new();
    let _ = io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;
    Ok(input)
}

/// Split `input` into pieces of about `size` bytes without cutting a
/// character in half.
fn split_chunks(input: &str, size: usize) -> Vec<&str> {
    if size == 0 || input.len() <= size {
        return vec![input];
    }
    let mut pieces = Vec::new();
    let mut start = 0;
    while start < input.len() {
        let mut end = (start + size).min(input.len());
        while !input.is_char_boundary(end) {
            end += 1;
        }
        pieces.push(&input[start..end]);
        start = end;
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_chunks_respects_char_boundaries() {
        let input = "a\u{e9}b\u{1F600}c";
        let pieces = split_chunks(input, 2);
        assert_eq!(pieces.concat(), input);
        assert!(pieces.iter().all(|piece| !piece.is_empty()));
    }

    #[test]
    fn test_split_chunks_whole_input() {
        assert_eq!(split_chunks("abc", 0), ["abc"]);
        assert_eq!(split_chunks("abc", 10), ["abc"]);
        assert_eq!(split_chunks("abcd", 2), ["ab", "cd"]);
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "rill",
            "--xml",
            "--chunk-size",
            "3",
            "--format",
            "json",
            "--html",
            "<a/>",
        ]);
        assert!(cli.xml);
        assert_eq!(cli.chunk_size, 3);
        assert_eq!(cli.format, Format::Json);
        assert_eq!(cli.html.as_deref(), Some("<a/>"));
    }
}
