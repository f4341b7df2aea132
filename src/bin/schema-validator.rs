//! # SCIM Schema Validator
//!
//! A command-line utility for checking SCIM schema description documents
//! before they are loaded by a service.
//!
//! ## Overview
//!
//! Each file is loaded with [`Schema::from_file`], which rejects:
//! - malformed JSON and missing or empty `id`
//! - attribute names outside the ATTRNAME grammar
//! - sub-attributes on non-complex attributes and nested complex attributes
//! - sub-attributes sharing a case-insensitive name
//!
//! On top of that the utility warns about schema ids that are not URIs and
//! complex attributes without sub-attributes.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin schema-validator schemas/User.json
//! cargo run --bin schema-validator ./schemas/
//! ```
//!
//! ## Output Examples
//!
//! ```text
//! Validating schema file: schemas/User.json
//! ✓ Schema is valid!
//!
//! Schema Summary:
//!   ID: urn:ietf:params:scim:schemas:core:2.0:User
//!   Name: User
//!   Description: User Account
//!   Attributes: 18
//!   Required attributes: 1
//!   Multi-valued attributes: 4
//!   Attribute types:
//!     - boolean: 1
//!     - complex: 6
//!     - reference: 1
//!     - string: 10
//!   Required attribute names: userName
//! ```
//!
//! ## Exit Codes
//!
//! - `0`: All schemas are valid
//! - `1`: One or more schemas are invalid or validation error occurred

use scim_validator::schema::{AttributeDefinition, AttributeType, Schema};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <schema-file-or-directory>", args[0]);
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} schemas/User.json", args[0]);
        eprintln!("  {} ./schemas/", args[0]);
        process::exit(1);
    }

    let path = Path::new(&args[1]);

    if path.is_file() {
        validate_single_file(path);
    } else if path.is_dir() {
        validate_directory(path);
    } else {
        eprintln!(
            "Error: '{}' is not a valid file or directory",
            path.display()
        );
        process::exit(1);
    }
}

fn validate_single_file(file_path: &Path) {
    println!("Validating schema file: {}", file_path.display());

    match Schema::from_file(file_path) {
        Ok(schema) => {
            println!("✓ Schema is valid!");
            print_warnings(&schema, "");
            print_schema_summary(&schema);
        }
        Err(e) => {
            eprintln!("❌ Schema validation failed: {}", e);
            process::exit(1);
        }
    }
}

fn validate_directory(dir_path: &Path) {
    println!("Validating schemas in directory: {}", dir_path.display());

    let entries = match fs::read_dir(dir_path) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error reading directory: {}", e);
            process::exit(1);
        }
    };

    let mut valid: Vec<Schema> = Vec::new();
    let mut error_count = 0;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        println!("\nValidating: {}", entry.file_name().to_string_lossy());

        match Schema::from_file(&path) {
            Ok(schema) => {
                println!("  ✓ Valid - {} ({})", schema.name(), schema.id());
                print_warnings(&schema, "  ");
                valid.push(schema);
            }
            Err(e) => {
                eprintln!("  ❌ Invalid - {}", e);
                error_count += 1;
            }
        }
    }

    println!("\nValidation Summary:");
    println!("  Valid schemas: {}", valid.len());
    println!("  Invalid schemas: {}", error_count);

    let mut seen = BTreeMap::new();
    for schema in &valid {
        if let Some(previous) = seen.insert(schema.id().to_lowercase(), schema.name()) {
            eprintln!(
                "  ❌ Duplicate schema id {} ({} and {})",
                schema.id(),
                previous,
                schema.name()
            );
            error_count += 1;
        }
    }

    if error_count > 0 {
        process::exit(1);
    }
}

fn print_warnings(schema: &Schema, indent: &str) {
    if !schema.id().starts_with("urn:") && !schema.id().starts_with("http") {
        println!(
            "{indent}⚠ Schema ID should be a URI (starting with 'urn:' or 'http')"
        );
    }
    for attribute in schema.attributes() {
        if attribute.data_type() == AttributeType::Complex && !attribute.has_sub_attributes() {
            println!(
                "{indent}⚠ Complex attribute '{}' has no sub-attributes",
                attribute.name()
            );
        }
    }
}

fn print_schema_summary(schema: &Schema) {
    let attributes = schema.attributes();

    println!();
    println!("Schema Summary:");
    println!("  ID: {}", schema.id());
    println!("  Name: {}", schema.name());
    println!("  Description: {}", schema.description());
    println!("  Attributes: {}", attributes.len());

    let mut type_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for attribute in attributes {
        *type_counts.entry(attribute.data_type().as_str()).or_insert(0) += 1;
    }

    let required: Vec<&str> = attributes
        .iter()
        .filter(|attribute| attribute.required())
        .map(AttributeDefinition::name)
        .collect();
    let multi_valued = attributes
        .iter()
        .filter(|attribute| attribute.multi_valued())
        .count();

    println!("  Required attributes: {}", required.len());
    println!("  Multi-valued attributes: {}", multi_valued);
    println!("  Attribute types:");
    for (data_type, count) in type_counts {
        println!("    - {}: {}", data_type, count);
    }

    if !required.is_empty() {
        println!("  Required attribute names: {}", required.join(", "));
    }
}
