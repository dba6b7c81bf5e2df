//! Font Color Sidecar Module
//!
//! XLSX内部のXMLファイルから、calamineで取得不可能なフォント色情報を
//! 抽出するモジュール。正解選択肢はフォント色だけで示されるため、
//! `xl/styles.xml`（フォント定義とセルスタイル）と各worksheet XML
//! （セルごとのスタイルインデックス）を直接解析します。
//!
//! シート名とworksheet XMLファイルの対応は`xl/workbook.xml`と
//! `xl/_rels/workbook.xml.rels`から解決します（ファイル名からの推測は
//! シートの追加・削除で順序がずれるため使用しません）。

use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

use quick_xml::events::BytesStart;

use crate::error::QuizBankError;
use crate::security::{validate_zip_path, SecurityConfig};
use crate::types::ArgbColor;

/// フォント色サイドカーパーサー
///
/// XLSXファイル（ZIPアーカイブ）からXMLを直接解析し、明示的なRGB指定を
/// 持つセルの色を`(シート名, 行, 列)`で引けるようにします。テーマ色・
/// インデックス色は正解判定の対象外のため解決しません。
pub(crate) struct FontColorSidecar {
    /// シート名 -> セル座標（0始まり） -> フォント色
    cell_colors: HashMap<String, HashMap<(u32, u32), ArgbColor>>,
}

impl FontColorSidecar {
    /// XLSXファイル（ZIPアーカイブ）からフォント色情報を解析
    ///
    /// # 引数
    ///
    /// * `xlsx_reader` - XLSXファイルを読み込むためのリーダー（Read + Seekトレイトを実装）
    ///
    /// # 戻り値
    ///
    /// * `Ok(FontColorSidecar)` - 解析に成功した場合
    /// * `Err(QuizBankError)` - アーカイブまたはXMLの解析エラーが発生した場合
    ///
    /// # 注意
    ///
    /// `xl/styles.xml`が存在しないワークブックは「色付きセルなし」として
    /// 扱われ、エラーにはなりません。
    pub fn new<R: Read + Seek>(xlsx_reader: R) -> Result<Self, QuizBankError> {
        let security_config = SecurityConfig::default();

        let mut archive =
            ZipArchive::new(xlsx_reader).map_err(|e| QuizBankError::Zip(format!("{}", e)))?;

        // セキュリティチェック: ファイル数の上限
        if archive.len() > security_config.max_file_count {
            return Err(QuizBankError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                archive.len(),
                security_config.max_file_count
            )));
        }

        // セキュリティチェック: パストラバーサル対策
        for i in 0..archive.len() {
            let file_name = archive
                .by_index(i)
                .map_err(|e| QuizBankError::Zip(format!("{}", e)))?
                .name()
                .to_string();
            validate_zip_path(&file_name).map_err(QuizBankError::SecurityViolation)?;
        }

        // 1. xl/styles.xml: スタイルインデックス -> フォント色
        let xf_colors = match Self::read_zip_entry(&mut archive, "xl/styles.xml")? {
            Some(xml) => Self::parse_styles(&xml)?,
            None => Vec::new(),
        };

        // 2. xl/workbook.xml + rels: シート名 -> worksheet XMLパス
        let sheet_paths = Self::resolve_sheet_paths(&mut archive)?;

        // 3. 各worksheet XML: 色付きセルのみ保持
        let mut cell_colors: HashMap<String, HashMap<(u32, u32), ArgbColor>> = HashMap::new();
        for (sheet_name, path) in sheet_paths {
            let xml = match Self::read_zip_entry(&mut archive, &path)? {
                Some(xml) => xml,
                None => continue,
            };

            let mut colors = HashMap::new();
            for (coord, style_idx) in Self::parse_worksheet_cells(&xml)? {
                if let Some(color) = xf_colors.get(style_idx).cloned().flatten() {
                    colors.insert(coord, color);
                }
            }
            if !colors.is_empty() {
                cell_colors.insert(sheet_name, colors);
            }
        }

        Ok(Self { cell_colors })
    }

    /// セルのフォント色を取得
    ///
    /// # 引数
    ///
    /// * `sheet_name` - シート名
    /// * `row` - 行インデックス（0始まり）
    /// * `col` - 列インデックス（0始まり）
    ///
    /// # 戻り値
    ///
    /// * `Some(&ArgbColor)` - セルに明示的なRGBフォント色が設定されている場合
    /// * `None` - 色指定がない、またはテーマ色のみの場合
    pub fn font_color(&self, sheet_name: &str, row: u32, col: u32) -> Option<&ArgbColor> {
        self.cell_colors.get(sheet_name)?.get(&(row, col))
    }

    /// ZIPアーカイブからエントリを読み込む（存在しない場合はNone）
    fn read_zip_entry<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        name: &str,
    ) -> Result<Option<Vec<u8>>, QuizBankError> {
        let mut file = match archive.by_name(name) {
            Ok(file) => file,
            Err(_) => return Ok(None),
        };

        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(Some(content))
    }

    /// xl/styles.xml の解析（プライベート）
    ///
    /// `<fonts>` からフォントごとのRGB色を、`<cellXfs>` からスタイルごとの
    /// `fontId` を読み取り、スタイルインデックス -> フォント色の対応表を
    /// 構築します。`<cellStyleXfs>` 内の `<xf>` は対象外です。
    fn parse_styles(xml: &[u8]) -> Result<Vec<Option<ArgbColor>>, QuizBankError> {
        use quick_xml::events::Event;
        use quick_xml::Reader;

        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut in_fonts = false;
        let mut in_cell_xfs = false;
        // Some = <font>要素の内側（内側のOptionが読み取った色）
        let mut current_font: Option<Option<ArgbColor>> = None;
        let mut font_colors: Vec<Option<ArgbColor>> = Vec::new();
        let mut xf_font_ids: Vec<Option<usize>> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"fonts" => in_fonts = true,
                    b"cellXfs" => in_cell_xfs = true,
                    b"font" if in_fonts => current_font = Some(None),
                    b"color" if current_font.is_some() => {
                        if let Some(slot) = current_font.as_mut() {
                            if slot.is_none() {
                                *slot = Self::rgb_attr(&e)?;
                            }
                        }
                    }
                    b"xf" if in_cell_xfs => xf_font_ids.push(Self::font_id_attr(&e)?),
                    _ => {}
                },
                // <color rgb=".."/>のような空要素はEmptyイベントになる
                Ok(Event::Empty(e)) => match e.name().as_ref() {
                    b"font" if in_fonts => font_colors.push(None),
                    b"color" if current_font.is_some() => {
                        if let Some(slot) = current_font.as_mut() {
                            if slot.is_none() {
                                *slot = Self::rgb_attr(&e)?;
                            }
                        }
                    }
                    b"xf" if in_cell_xfs => xf_font_ids.push(Self::font_id_attr(&e)?),
                    _ => {}
                },
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"fonts" => in_fonts = false,
                    b"cellXfs" => in_cell_xfs = false,
                    b"font" if in_fonts => {
                        if let Some(color) = current_font.take() {
                            font_colors.push(color);
                        }
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(QuizBankError::Xml(format!("{}", e))),
                _ => {}
            }
        }

        // スタイルインデックス -> fontId -> フォント色 を事前解決
        Ok(xf_font_ids
            .into_iter()
            .map(|font_id| font_id.and_then(|id| font_colors.get(id).cloned().flatten()))
            .collect())
    }

    /// シート名 -> worksheet XMLパス の解決（プライベート）
    fn resolve_sheet_paths<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
    ) -> Result<Vec<(String, String)>, QuizBankError> {
        let workbook_xml = match Self::read_zip_entry(archive, "xl/workbook.xml")? {
            Some(xml) => xml,
            None => return Ok(Vec::new()),
        };
        let sheets = Self::parse_sheet_list(&workbook_xml)?;

        let rels_xml = match Self::read_zip_entry(archive, "xl/_rels/workbook.xml.rels")? {
            Some(xml) => xml,
            None => return Ok(Vec::new()),
        };
        let targets = Self::parse_rels(&rels_xml)?;

        let mut paths = Vec::new();
        for (name, rid) in sheets {
            if let Some(target) = targets.get(&rid) {
                // Targetは通常xl/からの相対パス（例: "worksheets/sheet1.xml"）、
                // 先頭が'/'の場合はパッケージ絶対パス
                let path = match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("xl/{}", target),
                };
                paths.push((name, path));
            }
        }
        Ok(paths)
    }

    /// xl/workbook.xml の解析: (シート名, relationship ID) のリスト
    fn parse_sheet_list(xml: &[u8]) -> Result<Vec<(String, String)>, QuizBankError> {
        use quick_xml::events::Event;
        use quick_xml::Reader;

        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.name().as_ref() == b"sheet" {
                        // <sheet name="选择题" sheetId="1" r:id="rId1"/>
                        let mut name: Option<String> = None;
                        let mut rid: Option<String> = None;

                        for attr in e.attributes() {
                            let attr = attr.map_err(|e| {
                                QuizBankError::Xml(format!("XML attribute error: {}", e))
                            })?;
                            match attr.key.as_ref() {
                                b"name" => {
                                    let value = attr.decode_and_unescape_value(&reader).map_err(|e| {
                                        QuizBankError::Xml(format!("XML attribute error: {}", e))
                                    })?;
                                    name = Some(value.into_owned());
                                }
                                b"r:id" => {
                                    rid = Some(std::str::from_utf8(&attr.value)?.to_string());
                                }
                                _ => {}
                            }
                        }

                        if let (Some(name), Some(rid)) = (name, rid) {
                            sheets.push((name, rid));
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(QuizBankError::Xml(format!("{}", e))),
                _ => {}
            }
        }

        Ok(sheets)
    }

    /// xl/_rels/workbook.xml.rels の解析: relationship ID -> Target
    fn parse_rels(xml: &[u8]) -> Result<HashMap<String, String>, QuizBankError> {
        use quick_xml::events::Event;
        use quick_xml::Reader;

        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut targets = HashMap::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.name().as_ref() == b"Relationship" {
                        // <Relationship Id="rId1" Type="..." Target="worksheets/sheet1.xml"/>
                        let mut id: Option<String> = None;
                        let mut target: Option<String> = None;

                        for attr in e.attributes() {
                            let attr = attr.map_err(|e| {
                                QuizBankError::Xml(format!("XML attribute error: {}", e))
                            })?;
                            match attr.key.as_ref() {
                                b"Id" => {
                                    id = Some(std::str::from_utf8(&attr.value)?.to_string());
                                }
                                b"Target" => {
                                    let value = attr.decode_and_unescape_value(&reader).map_err(|e| {
                                        QuizBankError::Xml(format!("XML attribute error: {}", e))
                                    })?;
                                    target = Some(value.into_owned());
                                }
                                _ => {}
                            }
                        }

                        if let (Some(id), Some(target)) = (id, target) {
                            targets.insert(id, target);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(QuizBankError::Xml(format!("{}", e))),
                _ => {}
            }
        }

        Ok(targets)
    }

    /// worksheet XML の解析: スタイルインデックスを持つセルのリスト
    fn parse_worksheet_cells(xml: &[u8]) -> Result<Vec<((u32, u32), usize)>, QuizBankError> {
        use quick_xml::events::Event;
        use quick_xml::Reader;

        let mut reader = Reader::from_reader(xml);
        reader.trim_text(true);

        let mut buf = Vec::new();
        let mut cells = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    if e.name().as_ref() == b"c" {
                        // <c r="A5" s="1" t="s">
                        let mut coord: Option<(u32, u32)> = None;
                        let mut style_idx: Option<usize> = None;

                        for attr in e.attributes() {
                            let attr = attr.map_err(|e| {
                                QuizBankError::Xml(format!("XML attribute error: {}", e))
                            })?;
                            match attr.key.as_ref() {
                                b"r" => {
                                    let ref_str = std::str::from_utf8(&attr.value)?;
                                    coord = Self::parse_cell_ref(ref_str);
                                }
                                b"s" => {
                                    let s_str = std::str::from_utf8(&attr.value)?;
                                    style_idx = Some(s_str.parse()?);
                                }
                                _ => {}
                            }
                        }

                        if let (Some(coord), Some(style_idx)) = (coord, style_idx) {
                            cells.push((coord, style_idx));
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(QuizBankError::Xml(format!("{}", e))),
                _ => {}
            }
        }

        Ok(cells)
    }

    /// A1形式のセル参照を0始まりの(行, 列)に変換（例: "A1" -> (0, 0)）
    fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
        let mut col: u32 = 0;
        let mut digits_start: Option<usize> = None;

        for (i, ch) in cell_ref.char_indices() {
            if ch.is_ascii_uppercase() {
                col = col * 26 + (ch as u32 - 'A' as u32 + 1);
            } else {
                digits_start = Some(i);
                break;
            }
        }

        let row: u32 = cell_ref[digits_start?..].parse().ok()?;
        if col == 0 || row == 0 {
            return None;
        }

        Some((row - 1, col - 1))
    }

    /// `<color rgb="FFFF0000"/>` のrgb属性を読み取る
    ///
    /// テーマ色（`theme`属性のみ）やインデックス色は`None`になります。
    fn rgb_attr(e: &BytesStart<'_>) -> Result<Option<ArgbColor>, QuizBankError> {
        for attr in e.attributes() {
            let attr =
                attr.map_err(|e| QuizBankError::Xml(format!("XML attribute error: {}", e)))?;
            if attr.key.as_ref() == b"rgb" {
                let rgb = std::str::from_utf8(&attr.value)?;
                return Ok(ArgbColor::parse(rgb).ok());
            }
        }
        Ok(None)
    }

    /// `<xf fontId="1" .../>` のfontId属性を読み取る
    fn font_id_attr(e: &BytesStart<'_>) -> Result<Option<usize>, QuizBankError> {
        for attr in e.attributes() {
            let attr =
                attr.map_err(|e| QuizBankError::Xml(format!("XML attribute error: {}", e)))?;
            if attr.key.as_ref() == b"fontId" {
                let id_str = std::str::from_utf8(&attr.value)?;
                return Ok(Some(id_str.parse()?));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <fonts count="3">
    <font><sz val="11"/><color theme="1"/><name val="Calibri"/></font>
    <font><sz val="11"/><color rgb="FFFF0000"/><name val="Calibri"/></font>
    <font/>
  </fonts>
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>
  <cellXfs count="3">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
    <xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/>
    <xf numFmtId="0" fontId="2" fillId="0" borderId="0" xfId="0"/>
  </cellXfs>
</styleSheet>"#;

    #[test]
    fn test_parse_styles_resolves_rgb_fonts_only() {
        let xf_colors = FontColorSidecar::parse_styles(STYLES_XML.as_bytes()).unwrap();

        assert_eq!(xf_colors.len(), 3);
        // フォント0はテーマ色のみ -> None
        assert!(xf_colors[0].is_none());
        // フォント1は明示的な赤
        assert_eq!(
            xf_colors[1].as_ref().map(|c| c.as_str()),
            Some("FFFF0000")
        );
        // フォント2（空要素）は色なし
        assert!(xf_colors[2].is_none());
    }

    #[test]
    fn test_parse_styles_ignores_cell_style_xfs() {
        // cellStyleXfsのxfが混入すればインデックスがずれて3にならない
        let xf_colors = FontColorSidecar::parse_styles(STYLES_XML.as_bytes()).unwrap();
        assert_eq!(xf_colors.len(), 3);
    }

    #[test]
    fn test_parse_styles_missing_sections() {
        let xml = r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"/>"#;
        let xf_colors = FontColorSidecar::parse_styles(xml.as_bytes()).unwrap();
        assert!(xf_colors.is_empty());
    }

    #[test]
    fn test_parse_sheet_list() {
        let xml = r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="选择题" sheetId="1" r:id="rId1"/>
    <sheet name="判断题对" sheetId="2" r:id="rId2"/>
  </sheets>
</workbook>"#;
        let sheets = FontColorSidecar::parse_sheet_list(xml.as_bytes()).unwrap();

        assert_eq!(
            sheets,
            vec![
                ("选择题".to_string(), "rId1".to_string()),
                ("判断题对".to_string(), "rId2".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_rels() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#;
        let targets = FontColorSidecar::parse_rels(xml.as_bytes()).unwrap();

        assert_eq!(
            targets.get("rId1").map(String::as_str),
            Some("worksheets/sheet1.xml")
        );
        assert_eq!(targets.get("rId2").map(String::as_str), Some("styles.xml"));
    }

    #[test]
    fn test_parse_worksheet_cells() {
        let xml = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="1"><c r="A1" t="s"><v>0</v></c></row>
    <row r="3"><c r="A3" s="1" t="s"><v>1</v></c><c r="B3" s="2"/></row>
  </sheetData>
</worksheet>"#;
        let cells = FontColorSidecar::parse_worksheet_cells(xml.as_bytes()).unwrap();

        // スタイル属性のないA1は含まれない
        assert_eq!(cells, vec![((2, 0), 1), ((2, 1), 2)]);
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(FontColorSidecar::parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(FontColorSidecar::parse_cell_ref("B3"), Some((2, 1)));
        assert_eq!(FontColorSidecar::parse_cell_ref("Z10"), Some((9, 25)));
        assert_eq!(FontColorSidecar::parse_cell_ref("AA1"), Some((0, 26)));
        assert_eq!(FontColorSidecar::parse_cell_ref("A0"), None);
        assert_eq!(FontColorSidecar::parse_cell_ref("1"), None);
        assert_eq!(FontColorSidecar::parse_cell_ref(""), None);
    }
}
