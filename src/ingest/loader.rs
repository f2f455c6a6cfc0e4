//! Topics CSV loading.
//!
//! One row per Topic. Required columns must be present in the header;
//! a missing or unreadable file is fatal to the run. Row-level
//! problems are softer: empty required values are caught by
//! `Topic::validate` at pipeline entry (aborting only that row), and
//! malformed optional values degrade to their defaults with a warning.
//!
//! Quoted fields are supported — keyword lists and outline JSON carry
//! embedded commas.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::warn;

use crate::domain::{Outline, Topic};

const REQUIRED_COLUMNS: [&str; 5] = [
    "topic",
    "primary_keywords",
    "additional_keywords",
    "target_audience",
    "tone_style",
];

/// Load all topic rows from a CSV file
pub fn load_topics(path: &Path) -> Result<Vec<Topic>> {
    if !path.exists() {
        bail!("Input file not found: {}", path.display());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let mut records = parse_csv(&content).into_iter();

    let header = records
        .next()
        .with_context(|| format!("Input file is empty: {}", path.display()))?;

    let columns: HashMap<String, usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.trim().to_lowercase(), i))
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .copied()
        .collect();
    if !missing.is_empty() {
        bail!(
            "Input file {} is missing required columns: {}",
            path.display(),
            missing.join(", ")
        );
    }

    Ok(records
        .enumerate()
        .map(|(i, row)| topic_from_row(&columns, &row, i + 2))
        .collect())
}

/// Build a Topic from one data row (`line` is 1-based, for warnings)
fn topic_from_row(columns: &HashMap<String, usize>, row: &[String], line: usize) -> Topic {
    let get = |name: &str| -> String {
        columns
            .get(name)
            .and_then(|&i| row.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    };

    let word_count = match get("word_count").as_str() {
        "" => None,
        raw => match raw.parse::<usize>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                warn!(line, value = raw, "Invalid word_count, using default");
                None
            }
        },
    };

    let custom_outline = match get("custom_outline").as_str() {
        "" => None,
        raw => match serde_json::from_str::<Outline>(raw) {
            Ok(outline) => Some(outline),
            Err(e) => {
                warn!(line, error = %e, "Invalid custom_outline JSON, ignoring");
                None
            }
        },
    };

    Topic {
        topic: get("topic"),
        primary_keywords: get("primary_keywords"),
        additional_keywords: get("additional_keywords"),
        target_audience: get("target_audience"),
        tone_style: get("tone_style"),
        word_count,
        custom_outline,
        categories: split_list(&get("categories")),
        tags: split_list(&get("tags")),
        video_required: parse_flag(&get("video_required")),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.to_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

/// Minimal CSV reader: quoted fields, doubled-quote escapes, embedded
/// commas and newlines. Blank records are dropped.
fn parse_csv(input: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                if record.iter().any(|f| !f.is_empty()) {
                    records.push(std::mem::take(&mut record));
                } else {
                    record.clear();
                }
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        if record.iter().any(|f| !f.is_empty()) {
            records.push(record);
        }
    }

    records
}

fn csv_escape(field: &str) -> String {
    if field.contains(['"', ',', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Write a template topics file with two sample rows
pub fn write_sample_topics(path: &Path) -> Result<()> {
    let header = [
        "topic",
        "primary_keywords",
        "additional_keywords",
        "target_audience",
        "tone_style",
        "word_count",
        "categories",
        "tags",
        "custom_outline",
        "video_required",
    ];

    let rows: [[&str; 10]; 2] = [
        [
            "Benefits of Organic Gardening",
            "organic gardening, natural farming",
            "sustainable gardening, eco-friendly, organic soil",
            "home gardeners",
            "friendly, informative",
            "3200",
            "Gardening,Sustainability",
            "organic,gardening",
            r#"{"sections":[{"title":"Introduction","subsections":["What is Organic Gardening","Benefits Overview"]}]}"#,
            "true",
        ],
        [
            "Quick SEO Guide 2024",
            "SEO, search optimization",
            "digital marketing, website ranking",
            "business owners",
            "professional, concise",
            "1500",
            "Digital Marketing,SEO",
            "seo,marketing",
            r#"{"sections":[{"title":"SEO Basics","subsections":["What is SEO","Why it Matters"]}]}"#,
            "false",
        ],
    ];

    let mut lines = vec![header.join(",")];
    for row in rows {
        let escaped: Vec<String> = row.iter().map(|f| csv_escape(f)).collect();
        lines.push(escaped.join(","));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(path, lines.join("\n") + "\n")
        .with_context(|| format!("Failed to write sample topics: {}", path.display()))?;

    Ok(())
}
