//! quizbank - Pure-Rust quiz sheet extractor and question bank writer
//!
//! This crate parses a human-authored Excel quiz workbook (question text in
//! numbered rows, answer options in the rows below, the correct option marked
//! by a red font) and re-emits the questions as a normalized single-sheet
//! question bank workbook.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use quizbank::ExtractorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create an extractor with default settings
//!     let extractor = ExtractorBuilder::new().build()?;
//!
//!     // Open input Excel file
//!     let input = File::open("低压.xlsx")?;
//!
//!     // Create output Excel file
//!     let output = File::create("低压_converted.xlsx")?;
//!
//!     // Convert quiz sheets into a question bank workbook
//!     extractor.convert(input, output)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! For in-memory conversion, use `Cursor`:
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use quizbank::ExtractorBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = ExtractorBuilder::new().build()?;
//! let excel_data: Vec<u8> = vec![]; // Your Excel file bytes
//! let bank = extractor.convert_to_buffer(Cursor::new(excel_data))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Inspecting the records
//!
//! ```rust,no_run
//! use std::fs::File;
//! use quizbank::{ExtractorBuilder, QuestionKind};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = ExtractorBuilder::new().build()?;
//!     let input = File::open("低压.xlsx")?;
//!
//!     // Extract records without writing a workbook
//!     for record in extractor.extract(input)? {
//!         if record.kind == QuestionKind::SingleChoice {
//!             println!("{} -> {}", record.prompt, record.answer);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use std::fs::File;
//! use quizbank::ExtractorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create an extractor with custom settings
//!     let extractor = ExtractorBuilder::new()
//!         .with_choice_sheet("单选题")
//!         .with_choice_row_limit(200)
//!         .with_correct_answer_color("FFFF0000")
//!         .build()?;
//!
//!     let input = File::open("input.xlsx")?;
//!     let output = File::create("output.xlsx")?;
//!     extractor.convert(input, output)?;
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod error;
mod output;
mod parser;
mod scanner;
mod security;
mod types;

// 公開API
pub use api::{OptionKey, QuestionKind, QuestionRecord};
pub use builder::{Extractor, ExtractorBuilder};
pub use error::QuizBankError;
