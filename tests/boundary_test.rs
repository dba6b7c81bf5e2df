//! Boundary Tests for quizbank
//!
//! Edge-case coverage for the row scan: orphan option rows, empty blocks,
//! scan-bound truncation, color matching, and the inherited append-without-
//! dedup answer behavior.

use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use std::io::Cursor;

use quizbank::{ExtractorBuilder, QuestionKind};

fn red_font() -> Format {
    Format::new().set_font_color(Color::Red)
}

/// Build a choice-sheet-only workbook from (text, is_red) rows
fn choice_workbook(rows: &[(&str, bool)]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("选择题")?;

    for (i, (text, is_red)) in rows.iter().enumerate() {
        if *is_red {
            worksheet.write_string_with_format(i as u32, 0, *text, &red_font())?;
        } else {
            worksheet.write_string(i as u32, 0, *text)?;
        }
    }

    workbook.save_to_buffer()
}

#[test]
fn test_orphan_option_rows_produce_no_record() {
    let input = choice_workbook(&[
        ("A、An option with no question", true),
        ("B、Another stray option", false),
    ])
    .unwrap();

    let extractor = ExtractorBuilder::new().build().unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert!(records.is_empty());
}

#[test]
fn test_orphan_options_before_first_question_are_dropped() {
    let input = choice_workbook(&[
        ("D、Stray before any block", true),
        ("1、The real question", false),
        ("A、First option", false),
    ])
    .unwrap();

    let extractor = ExtractorBuilder::new().build().unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].prompt, "1、The real question");
    assert_eq!(records[0].options[0], "First option");
    // The stray red D row must not leak into the answer
    assert_eq!(records[0].answer, "");
}

#[test]
fn test_block_with_no_options_is_still_emitted() {
    let input = choice_workbook(&[("1、Question without options", false)]).unwrap();

    let extractor = ExtractorBuilder::new().build().unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, QuestionKind::SingleChoice);
    assert!(records[0].options.iter().all(|o| o.is_empty()));
    assert_eq!(records[0].answer, "");
}

#[test]
fn test_multi_correct_letters_in_detection_order() {
    let input = choice_workbook(&[
        ("1、Pick two", false),
        ("A、First", true),
        ("B、Second", false),
        ("C、Third", true),
        ("D、Fourth", false),
    ])
    .unwrap();

    let extractor = ExtractorBuilder::new().build().unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records[0].answer, "AC");
}

#[test]
fn test_duplicate_option_letter_appends_and_overwrites() {
    // The same letter marked correct twice appears twice in the answer,
    // while the option body keeps the last occurrence
    let input = choice_workbook(&[
        ("1、Duplicate option rows", false),
        ("A、First body", true),
        ("A、Second body", true),
    ])
    .unwrap();

    let extractor = ExtractorBuilder::new().build().unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records[0].answer, "AA");
    assert_eq!(records[0].options[0], "Second body");
}

#[test]
fn test_non_red_font_is_not_a_correct_marker() {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("选择题").unwrap();
    worksheet.write_string(0, 0, "1、Colored but not red").unwrap();
    worksheet
        .write_string_with_format(1, 0, "A、Blue text", &Format::new().set_font_color(Color::Blue))
        .unwrap();
    worksheet
        .write_string_with_format(2, 0, "B、Green text", &Format::new().set_font_color(Color::Green))
        .unwrap();
    let input = workbook.save_to_buffer().unwrap();

    let extractor = ExtractorBuilder::new().build().unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records[0].answer, "");
    assert_eq!(records[0].options[0], "Blue text");
}

#[test]
fn test_noise_rows_do_not_break_blocks() {
    let input = choice_workbook(&[
        ("说明：请认真作答", false),
        ("1、A question", false),
        ("(note between rows)", false),
        ("A、Option A", true),
        ("E、Not a valid option key", false),
        ("B、Option B", false),
    ])
    .unwrap();

    let extractor = ExtractorBuilder::new().build().unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].options[0], "Option A");
    assert_eq!(records[0].options[1], "Option B");
    assert_eq!(records[0].answer, "A");
}

#[test]
fn test_ascii_separators_are_recognized() {
    let input = choice_workbook(&[
        ("12.Question with ascii separator", false),
        ("A.Alpha", true),
        ("B、Beta", false),
    ])
    .unwrap();

    let extractor = ExtractorBuilder::new().build().unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].prompt, "12.Question with ascii separator");
    assert_eq!(records[0].options[0], "Alpha");
    assert_eq!(records[0].answer, "A");
}

#[test]
fn test_rows_beyond_choice_scan_bound_are_dropped() {
    let input = choice_workbook(&[
        ("1、Inside the bound", false),
        ("A、Kept", true),
        ("", false),
        ("", false),
        ("", false),
        ("2、Beyond the bound", false),
        ("A、Dropped", true),
    ])
    .unwrap();

    let extractor = ExtractorBuilder::new()
        .with_choice_row_limit(5)
        .build()
        .unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].prompt, "1、Inside the bound");
}

#[test]
fn test_rows_beyond_judgment_scan_bound_are_dropped() {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("判断题对").unwrap();
    worksheet.write_string(0, 0, "1、Inside").unwrap();
    worksheet.write_string(2, 0, "2、Inside too").unwrap();
    worksheet.write_string(6, 0, "3、Outside").unwrap();
    let input = workbook.save_to_buffer().unwrap();

    let extractor = ExtractorBuilder::new()
        .with_judgment_row_limit(3)
        .build()
        .unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].prompt, "1、Inside");
    assert_eq!(records[1].prompt, "2、Inside too");
}

#[test]
fn test_question_on_last_scanned_row_is_flushed() {
    // A block opened on the final in-bound row still produces a record
    let input = choice_workbook(&[
        ("", false),
        ("", false),
        ("1、Opened on the last row", false),
    ])
    .unwrap();

    let extractor = ExtractorBuilder::new()
        .with_choice_row_limit(3)
        .build()
        .unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].prompt, "1、Opened on the last row");
}

#[test]
fn test_custom_correct_color() {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("选择题").unwrap();
    worksheet.write_string(0, 0, "1、Custom marker color").unwrap();
    worksheet
        .write_string_with_format(1, 0, "A、Blue is correct here", &Format::new().set_font_color(Color::Blue))
        .unwrap();
    worksheet
        .write_string_with_format(2, 0, "B、Red is not", &red_font())
        .unwrap();
    let input = workbook.save_to_buffer().unwrap();

    // Color::Blue serializes as FF0000FF
    let extractor = ExtractorBuilder::new()
        .with_correct_answer_color("FF0000FF")
        .build()
        .unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records[0].answer, "A");
}

#[test]
fn test_whitespace_around_cells_is_trimmed() {
    let input = choice_workbook(&[
        ("  1、Padded question  ", false),
        ("  A、 padded option  ", true),
    ])
    .unwrap();

    let extractor = ExtractorBuilder::new().build().unwrap();
    let records = extractor.extract(Cursor::new(input)).unwrap();

    assert_eq!(records[0].prompt, "1、Padded question");
    assert_eq!(records[0].options[0], "padded option");
    assert_eq!(records[0].answer, "A");
}
