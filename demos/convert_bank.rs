//! Question Bank Conversion Tool
//!
//! This example demonstrates how to build a one-shot command-line tool
//! using quizbank for converting a quiz workbook into a question bank.

use std::process;

use quizbank::ExtractorBuilder;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <input.xlsx> <output.xlsx>", args[0]);
        eprintln!("\nReads the quiz sheets (选择题 / 判断题对 / 判断题错) from the");
        eprintln!("input workbook and writes the normalized 题库 sheet to the output.");
        eprintln!("\nExamples:");
        eprintln!("  {} 低压.xlsx 低压_converted.xlsx", args[0]);
        process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];

    let extractor = match ExtractorBuilder::new().build() {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match extractor.convert_path(input_path, output_path) {
        Ok(()) => {
            println!("Conversion complete: {}", output_path);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
