//! Linden CLI
//!
//! Parses a file or an inline string and prints what the engine built:
//! a summary, the tree, JSON records or the raw token stream.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use linden_common::warning::set_warnings_enabled;
use linden_dom::{Document, NodeId};
use linden_html::{ParseConfig, ParseOutput, parse_document, parse_from_string, print_tree};
use linden_tokenizer::{TokenKind, tokenize};
use owo_colors::OwoColorize;
use strum::IntoEnumIterator;

/// Linden: parse HTML into a tree and query it from the terminal
#[derive(Parser, Debug)]
#[command(name = "linden")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Summarize a file
    linden ./index.html

    # Parse inline HTML and run selectors
    linden --html '<ul><li class="a">1</li><li>2</li></ul>' -q 'li.a' -q li

    # Print the element tree
    linden --format tree ./index.html

    # Plain JSON records from the lenient builder
    linden --lenient --format json ./broken.html

    # Drop scripts and inline handlers
    linden --filter-tag script --filter-attr onclick ./index.html

    # Show the token stream
    linden --format tokens --html '<p>hi<br/></p>'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Use the lenient builder (never fails on nesting, no filters)
    #[arg(short, long)]
    lenient: bool,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = Format::Summary)]
    format: Format,

    /// Selector to run against the document; may be repeated
    #[arg(short, long = "query", value_name = "SELECTOR")]
    queries: Vec<String>,

    /// JSON file with parse options
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tag whose elements are dropped with their subtree; may be repeated
    #[arg(long = "filter-tag", value_name = "TAG")]
    filter_tags: Vec<String>,

    /// Attribute removed from every element; may be repeated
    #[arg(long = "filter-attr", value_name = "ATTR")]
    filter_attrs: Vec<String>,

    /// Cap in bytes on one script or style body
    #[arg(long, value_name = "BYTES")]
    max_script_size: Option<usize>,

    /// Input bytes walked per tokenizer chunk
    #[arg(long, value_name = "BYTES")]
    chunk_size: Option<usize>,

    /// Suppress recovery warnings on stderr
    #[arg(long)]
    quiet: bool,
}

/// Output modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Doctype, charset, element count, tag names and query results
    Summary,
    /// The element tree, one node per line
    Tree,
    /// Plain records as JSON
    Json,
    /// The token stream with per-kind counts
    Tokens,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.quiet {
        set_warnings_enabled(false);
    }

    let markup = load_markup(&cli)?;
    let config = load_config(&cli)?;

    if cli.format == Format::Tokens {
        return print_tokens(&markup, &config);
    }

    if cli.lenient {
        if cli.format == Format::Tree {
            bail!("--format tree needs the strict builder");
        }
        if !cli.queries.is_empty() {
            bail!("--query needs the strict builder");
        }
        let output = parse_from_string(&markup, &config)?;
        if cli.format == Format::Json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_header("Document");
            print_field("doctype", output.root.doctype.as_deref());
            print_field("charset", output.root.charset.as_deref());
            println!("{} elements", output.root.element_count());
            print_names(&output);
        }
        return Ok(());
    }

    let output = parse_document(&markup, &config)?;
    let doc = &output.root;
    match cli.format {
        Format::Tree => print_tree(doc, NodeId::ROOT, 0),
        Format::Json => {
            let plain = ParseOutput {
                root: doc.to_plain(),
                components: output.components.clone(),
                tags: output.tags.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&plain)?);
        }
        Format::Summary | Format::Tokens => {
            print_header("Document");
            print_field("doctype", doc.doctype());
            print_field("charset", doc.charset());
            println!("{} elements", doc.all().len());
            print_names(&output);
        }
    }
    for selector in &cli.queries {
        print_query(doc, selector)?;
    }
    Ok(())
}

/// Read the markup from `--html` or the file argument.
fn load_markup(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    } else {
        bail!("expected a file path or --html")
    }
}

/// Start from the config file, if any, then apply flags on top.
fn load_config(cli: &Cli) -> Result<ParseConfig> {
    let mut config = match cli.config {
        Some(ref path) => read_config(path)?,
        None => ParseConfig::default(),
    };
    config.filter_tags.extend(cli.filter_tags.iter().cloned());
    config.filter_attrs.extend(cli.filter_attrs.iter().cloned());
    if let Some(size) = cli.max_script_size {
        config.max_script_size = size;
    }
    if let Some(size) = cli.chunk_size {
        config.chunk_size = size;
    }
    config.validate()?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<ParseConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn print_tokens(markup: &str, config: &ParseConfig) -> Result<()> {
    let tokens = tokenize(markup, &config.tokenizer_options());
    for token in &tokens {
        println!("{} {:?}", format!("{:<8}", token.kind).cyan(), token.raw);
    }

    print_header("Counts");
    for kind in TokenKind::iter() {
        let count = tokens.iter().filter(|token| token.kind == kind).count();
        println!("{kind}: {count}");
    }
    Ok(())
}

fn print_query(doc: &Document, selector: &str) -> Result<()> {
    let found = doc
        .query_selector_all(NodeId::ROOT, selector)
        .with_context(|| format!("query {selector:?} failed"))?;
    print_header(&format!("Query: {selector} ({} matches)", found.len()));
    for id in found {
        println!("{}", doc.outer_html(id));
    }
    Ok(())
}

fn print_names<R>(output: &ParseOutput<R>) {
    print_header("Tags");
    println!("{}", output.tags.join(", "));
    print_header("Components");
    println!("{}", output.components.join(", ").green());
}

fn print_header(title: &str) {
    println!("\n{}", format!("=== {title} ===").bold());
}

fn print_field(name: &str, value: Option<&str>) {
    match value {
        Some(value) => println!("{name}: {value}"),
        None => println!("{name}: {}", "none".dimmed()),
    }
}
