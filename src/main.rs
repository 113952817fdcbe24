use std::fs;
use std::path::Path;
use std::process;

use clap::Parser;
use jsonschema::{Draft, JSONSchema};

use jsonschema_export::{convert, ConversionReport, SchemaNode, UnconvertibleReason};

#[derive(Parser, Debug)]
#[command(name = "jsonschema-export")]
#[command(about = "Export a schema-builder validation tree as a JSON Schema document")]
struct Args {
    /// Path to the serialized schema tree (JSON, or YAML by file extension)
    tree_file: String,

    /// Write the schema document to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<String>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Skip compiling the emitted document as a Draft 4 schema
    #[arg(long)]
    no_check: bool,
}

fn main() {
    let args = Args::parse();

    let raw = match fs::read_to_string(&args.tree_file) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", args.tree_file, e);
            process::exit(1);
        }
    };

    let node = match parse_tree(&args.tree_file, &raw) {
        Ok(node) => node,
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    // Survey before converting: warn about silently dropped tests, and point
    // at every unconvertible branch instead of failing on the first one.
    let report = ConversionReport::survey(&node);
    for ignored in &report.ignored_tests {
        eprintln!(
            "  ⚠ Ignoring test `{}` on {} node at {}",
            ignored.test_name, ignored.type_name, ignored.path
        );
    }
    if !report.is_convertible() {
        eprintln!("❌ The schema tree cannot be converted:");
        for broken in &report.unconvertible {
            match &broken.reason {
                UnconvertibleReason::MissingType => {
                    eprintln!("  - {}: node has no type tag", broken.path)
                }
                UnconvertibleReason::UnsupportedType(tag) => {
                    eprintln!("  - {}: unsupported type `{}`", broken.path, tag)
                }
            }
        }
        process::exit(1);
    }

    let schema = match convert(&node) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("❌ Conversion failed: {}", e);
            process::exit(1);
        }
    };

    let document =
        serde_json::to_value(&schema).expect("Failed to serialize the schema document");

    // Check the emitted document compiles as a Draft 4 schema.
    if !args.no_check {
        if let Err(e) = JSONSchema::options()
            .with_draft(Draft::Draft4)
            .compile(&document)
        {
            eprintln!("❌ Emitted document is not a loadable Draft 4 schema: {}", e);
            eprintln!("This indicates a conversion rule bug. Please report it with your input tree.");
            process::exit(1);
        }
    }

    let rendered = if args.compact {
        serde_json::to_string(&document)
    } else {
        serde_json::to_string_pretty(&document)
    }
    .expect("Failed to serialize the schema document");

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, rendered + "\n") {
                eprintln!("❌ Failed to write {}: {}", path, e);
                process::exit(1);
            }
            println!("\n=== Conversion Complete ===");
            println!("  ✓ Converted {} schema nodes", report.node_count);
            println!("  ✓ Output file: {}", path);
        }
        None => println!("{}", rendered),
    }
}

/// Parses the serialized tree; YAML when the extension says so, JSON otherwise.
fn parse_tree(path: &str, raw: &str) -> Result<SchemaNode, String> {
    let is_yaml = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(raw)
            .map_err(|e| format!("Failed to parse the schema tree as YAML: {}", e))
    } else {
        serde_json::from_str(raw)
            .map_err(|e| format!("Failed to parse the schema tree as JSON: {}", e))
    }
}
