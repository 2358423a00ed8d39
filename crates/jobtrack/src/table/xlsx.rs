//! Single-sheet `.xlsx` tables.
//!
//! The workbook is assembled by hand: a zip archive holding the handful of
//! SpreadsheetML parts Excel, LibreOffice and `calamine` need. Every cell is
//! an inline string, the header row is bold on a grey fill and frozen.

use std::borrow::Cow;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{Days, NaiveDate};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::TableError;
use crate::record::{ApplicationRecord, ApplicationStatus};
use crate::sanitize::redact_path;

use super::TableStore;

pub const DEFAULT_SHEET_NAME: &str = "Applications";

/// Column headers, in output order.
pub const HEADERS: [&str; 9] = [
    "Company",
    "Position",
    "Applied Date",
    "Status",
    "Source",
    "Location",
    "Job ID",
    "Status Link",
    "Notes",
];

const COL_COMPANY: usize = 0;
const COL_APPLIED_DATE: usize = 2;
const COL_STATUS: usize = 3;
const COL_NOTES: usize = 8;

const MAX_COLUMN_WIDTH: usize = 50;
const MAX_SHEET_NAME_CHARS: usize = 31;
const HEADER_STYLE: &str = "1";

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_DOC_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Reads and writes application tables as `.xlsx` workbooks.
#[derive(Debug, Clone)]
pub struct XlsxTable {
    sheet_name: String,
}

impl Default for XlsxTable {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_NAME)
    }
}

impl XlsxTable {
    /// Characters Excel rejects in sheet names are replaced and the name is
    /// cut to 31 characters.
    pub fn new(sheet_name: impl Into<String>) -> Self {
        let cleaned: String = sheet_name
            .into()
            .chars()
            .map(|c| match c {
                '[' | ']' | ':' | '*' | '?' | '/' | '\\' => ' ',
                c => c,
            })
            .take(MAX_SHEET_NAME_CHARS)
            .collect();
        let cleaned = cleaned.trim();

        Self {
            sheet_name: if cleaned.is_empty() {
                DEFAULT_SHEET_NAME.to_string()
            } else {
                cleaned.to_string()
            },
        }
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Builds the workbook bytes. Rows are sorted newest first.
    pub fn encode(&self, records: &[ApplicationRecord]) -> Result<Vec<u8>, TableError> {
        let rows = sorted_newest_first(records);

        let parts: [(&str, Vec<u8>); 6] = [
            ("[Content_Types].xml", content_types_xml()?),
            ("_rels/.rels", root_rels_xml()?),
            ("xl/workbook.xml", workbook_xml(&self.sheet_name)?),
            ("xl/_rels/workbook.xml.rels", workbook_rels_xml()?),
            ("xl/styles.xml", styles_xml()?),
            ("xl/worksheets/sheet1.xml", worksheet_xml(&rows)?),
        ];

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, bytes) in parts {
            zip.start_file(name, options).map_err(encode_error)?;
            zip.write_all(&bytes).map_err(encode_error)?;
        }
        let cursor = zip.finish().map_err(encode_error)?;
        Ok(cursor.into_inner())
    }
}

impl TableStore for XlsxTable {
    /// Writes to a temp file next to `path` and renames it into place.
    fn write_table(&self, records: &[ApplicationRecord], path: &Path) -> Result<(), TableError> {
        let bytes = self.encode(records)?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(|source| TableError::CreateDirectory {
            path: dir.clone(),
            source,
        })?;

        let write_error = |source| TableError::WriteFile {
            path: path.to_path_buf(),
            source,
        };
        let mut temp = NamedTempFile::new_in(&dir).map_err(write_error)?;
        temp.write_all(&bytes).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;

        temp.persist(path).map_err(|e| TableError::Persist {
            path: path.to_path_buf(),
            source: e.error,
        })?;

        debug!(
            file = %redact_path(path),
            rows = records.len(),
            bytes = bytes.len(),
            "Workbook written"
        );
        Ok(())
    }

    /// Reads the configured sheet, or the first sheet when it is missing.
    /// Columns are matched by header name, so reordered tables still load.
    fn read_table(&self, path: &Path) -> Result<Vec<ApplicationRecord>, TableError> {
        let read_error = |message: String| TableError::ReadFile {
            path: path.to_path_buf(),
            message,
        };

        let mut workbook =
            open_workbook::<Xlsx<_>, _>(path).map_err(|e| read_error(e.to_string()))?;
        let names = workbook.sheet_names();
        let sheet = names
            .iter()
            .find(|name| name.as_str() == self.sheet_name)
            .or_else(|| names.first())
            .cloned()
            .ok_or_else(|| TableError::NoWorksheet(path.to_path_buf()))?;
        if sheet != self.sheet_name {
            warn!(
                file = %redact_path(path),
                expected = %self.sheet_name,
                found = %sheet,
                "Sheet not found, reading the first sheet instead"
            );
        }

        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| read_error(e.to_string()))?;
        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };

        let columns = ColumnMap::from_header(header);
        if columns.index[COL_COMPANY].is_none() {
            return Err(read_error(format!(
                "sheet '{}' has no '{}' column",
                sheet, HEADERS[COL_COMPANY]
            )));
        }

        let records: Vec<ApplicationRecord> =
            rows.filter_map(|row| columns.record(row)).collect();
        debug!(file = %redact_path(path), rows = records.len(), "Workbook read");
        Ok(records)
    }
}

/// Stable sort by applied date, newest first; unparseable dates go last.
fn sorted_newest_first(records: &[ApplicationRecord]) -> Vec<&ApplicationRecord> {
    let mut rows: Vec<&ApplicationRecord> = records.iter().collect();
    rows.sort_by_key(|record| {
        std::cmp::Reverse(NaiveDate::parse_from_str(record.applied_date.trim(), "%Y-%m-%d").ok())
    });
    rows
}

fn cells(record: &ApplicationRecord) -> [&str; 9] {
    [
        &record.company,
        &record.position,
        &record.applied_date,
        record.status.as_str(),
        &record.source,
        &record.location,
        &record.job_id,
        &record.status_link,
        &record.notes,
    ]
}

/// Header-name to column-index lookup for a sheet being read.
struct ColumnMap {
    index: [Option<usize>; 9],
}

impl ColumnMap {
    fn from_header(header: &[Data]) -> Self {
        let mut index = [None; 9];
        for (col, cell) in header.iter().enumerate() {
            let name = cell_text(cell, false);
            let name = name.trim();
            let slot = HEADERS
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .or_else(|| name.eq_ignore_ascii_case("summary").then_some(COL_NOTES));
            if let Some(slot) = slot {
                index[slot].get_or_insert(col);
            }
        }
        Self { index }
    }

    fn record(&self, row: &[Data]) -> Option<ApplicationRecord> {
        let value = |slot: usize| -> String {
            self.index[slot]
                .and_then(|col| row.get(col))
                .map(|cell| cell_text(cell, slot == COL_APPLIED_DATE))
                .unwrap_or_default()
        };

        let values: [String; 9] = std::array::from_fn(value);
        if values.iter().all(|v| v.trim().is_empty()) {
            return None;
        }

        let status = if values[COL_STATUS].trim().is_empty() {
            ApplicationStatus::default()
        } else {
            values[COL_STATUS].parse().unwrap_or_else(|e| {
                warn!("{}, keeping row as {}", e, ApplicationStatus::default());
                ApplicationStatus::default()
            })
        };

        let [company, position, applied_date, _, source, location, job_id, status_link, notes] =
            values;
        Some(ApplicationRecord {
            company,
            position,
            applied_date,
            status,
            source,
            location,
            job_id,
            status_link,
            notes,
        })
    }
}

/// Cell value as text. Numbers without a fraction print as integers; in the
/// date column numeric and date cells become `YYYY-MM-DD`.
fn cell_text(cell: &Data, date_column: bool) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        Data::Int(n) if date_column => serial_to_date(*n as f64).unwrap_or_else(|| n.to_string()),
        Data::Int(n) => n.to_string(),
        Data::Float(f) if date_column => serial_to_date(*f).unwrap_or_else(|| format_number(*f)),
        Data::Float(f) => format_number(*f),
        Data::DateTime(dt) => {
            serial_to_date(dt.as_f64()).unwrap_or_else(|| format_number(dt.as_f64()))
        }
        Data::DateTimeIso(s) if date_column => s.get(..10).unwrap_or(s).to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Converts an Excel serial day number (1900 date system) to `YYYY-MM-DD`.
fn serial_to_date(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?
        .checked_add_days(Days::new(serial.floor() as u64))
        .map(|date| date.format("%Y-%m-%d").to_string())
}

fn encode_error(e: impl std::fmt::Display) -> TableError {
    TableError::Encode(e.to_string())
}

/// Escapes text the way spreadsheet applications do: control characters and
/// `\r` become `_x00HH_`, and a literal `_x00HH_` gets its underscore escaped
/// as `_x005F_`. Readers decode both back. `U+FFFE` and `U+FFFF` have no
/// escape and are dropped.
fn xml_safe(value: &str) -> Cow<'_, str> {
    let needs_escape = |c: char| c < ' ' && !matches!(c, '\t' | '\n');
    let invalid = |c: char| c == '\u{FFFE}' || c == '\u{FFFF}';
    if !value.chars().any(|c| needs_escape(c) || invalid(c)) && !value.contains("_x00") {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for (i, c) in value.char_indices() {
        match c {
            c if invalid(c) => {}
            '_' if is_escape_sequence(&value[i..]) => escaped.push_str("_x005F_"),
            c if needs_escape(c) => escaped.push_str(&format!("_x{:04X}_", c as u32)),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// `true` when `text` starts with `_x00HH_`.
fn is_escape_sequence(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 7
        && bytes.starts_with(b"_x00")
        && bytes[4].is_ascii_hexdigit()
        && bytes[5].is_ascii_hexdigit()
        && bytes[6] == b'_'
}

fn column_letter(col: usize) -> char {
    (b'A' + col as u8) as char
}

/// Thin wrapper over a quick-xml writer that maps errors to [`TableError`].
struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    fn new() -> Result<Self, TableError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(encode_error)?;
        Ok(Self { writer })
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), TableError> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer
            .write_event(Event::Start(element))
            .map_err(encode_error)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), TableError> {
        let element = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer
            .write_event(Event::Empty(element))
            .map_err(encode_error)
    }

    fn end(&mut self, name: &str) -> Result<(), TableError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(encode_error)
    }

    fn text(&mut self, value: &str) -> Result<(), TableError> {
        self.writer
            .write_event(Event::Text(BytesText::new(&xml_safe(value))))
            .map_err(encode_error)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn content_types_xml() -> Result<Vec<u8>, TableError> {
    let mut xml = XmlPart::new()?;
    xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    xml.empty(
        "Default",
        &[
            ("Extension", "rels"),
            ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
        ],
    )?;
    xml.empty(
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;
    for (part, content_type) in [
        (
            "/xl/workbook.xml",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
        ),
        (
            "/xl/worksheets/sheet1.xml",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
        ),
        (
            "/xl/styles.xml",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml",
        ),
    ] {
        xml.empty(
            "Override",
            &[("PartName", part), ("ContentType", content_type)],
        )?;
    }
    xml.end("Types")?;
    Ok(xml.finish())
}

fn root_rels_xml() -> Result<Vec<u8>, TableError> {
    let mut xml = XmlPart::new()?;
    xml.start("Relationships", &[("xmlns", NS_PKG_REL)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
            ),
            ("Target", "xl/workbook.xml"),
        ],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

fn workbook_xml(sheet_name: &str) -> Result<Vec<u8>, TableError> {
    let mut xml = XmlPart::new()?;
    xml.start("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_DOC_REL)])?;
    xml.start("sheets", &[])?;
    xml.empty(
        "sheet",
        &[("name", sheet_name), ("sheetId", "1"), ("r:id", "rId1")],
    )?;
    xml.end("sheets")?;
    xml.end("workbook")?;
    Ok(xml.finish())
}

fn workbook_rels_xml() -> Result<Vec<u8>, TableError> {
    let mut xml = XmlPart::new()?;
    xml.start("Relationships", &[("xmlns", NS_PKG_REL)])?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId1"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet",
            ),
            ("Target", "worksheets/sheet1.xml"),
        ],
    )?;
    xml.empty(
        "Relationship",
        &[
            ("Id", "rId2"),
            (
                "Type",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles",
            ),
            ("Target", "styles.xml"),
        ],
    )?;
    xml.end("Relationships")?;
    Ok(xml.finish())
}

/// Two cell formats: 0 is the default, 1 is the bold grey header.
fn styles_xml() -> Result<Vec<u8>, TableError> {
    let mut xml = XmlPart::new()?;
    xml.start("styleSheet", &[("xmlns", NS_MAIN)])?;

    xml.start("fonts", &[("count", "2")])?;
    for bold in [false, true] {
        xml.start("font", &[])?;
        if bold {
            xml.empty("b", &[])?;
        }
        xml.empty("sz", &[("val", "11")])?;
        xml.empty("name", &[("val", "Calibri")])?;
        xml.end("font")?;
    }
    xml.end("fonts")?;

    xml.start("fills", &[("count", "3")])?;
    for pattern in ["none", "gray125"] {
        xml.start("fill", &[])?;
        xml.empty("patternFill", &[("patternType", pattern)])?;
        xml.end("fill")?;
    }
    xml.start("fill", &[])?;
    xml.start("patternFill", &[("patternType", "solid")])?;
    xml.empty("fgColor", &[("rgb", "FFCCCCCC")])?;
    xml.empty("bgColor", &[("indexed", "64")])?;
    xml.end("patternFill")?;
    xml.end("fill")?;
    xml.end("fills")?;

    xml.start("borders", &[("count", "1")])?;
    xml.start("border", &[])?;
    for side in ["left", "right", "top", "bottom", "diagonal"] {
        xml.empty(side, &[])?;
    }
    xml.end("border")?;
    xml.end("borders")?;

    xml.start("cellStyleXfs", &[("count", "1")])?;
    xml.empty(
        "xf",
        &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")],
    )?;
    xml.end("cellStyleXfs")?;

    xml.start("cellXfs", &[("count", "2")])?;
    xml.empty(
        "xf",
        &[
            ("numFmtId", "0"),
            ("fontId", "0"),
            ("fillId", "0"),
            ("borderId", "0"),
            ("xfId", "0"),
        ],
    )?;
    xml.empty(
        "xf",
        &[
            ("numFmtId", "0"),
            ("fontId", "1"),
            ("fillId", "2"),
            ("borderId", "0"),
            ("xfId", "0"),
            ("applyFont", "1"),
            ("applyFill", "1"),
        ],
    )?;
    xml.end("cellXfs")?;

    xml.start("cellStyles", &[("count", "1")])?;
    xml.empty(
        "cellStyle",
        &[("name", "Normal"), ("xfId", "0"), ("builtinId", "0")],
    )?;
    xml.end("cellStyles")?;

    xml.end("styleSheet")?;
    Ok(xml.finish())
}

/// Column width: longest value plus padding, capped.
fn column_widths(rows: &[&ApplicationRecord]) -> [usize; 9] {
    std::array::from_fn(|col| {
        let longest = rows
            .iter()
            .map(|record| {
                cells(record)[col]
                    .lines()
                    .map(|line| line.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .chain(std::iter::once(HEADERS[col].len()))
            .max()
            .unwrap_or(0);
        (longest + 2).min(MAX_COLUMN_WIDTH)
    })
}

fn worksheet_xml(rows: &[&ApplicationRecord]) -> Result<Vec<u8>, TableError> {
    let mut xml = XmlPart::new()?;
    xml.start("worksheet", &[("xmlns", NS_MAIN), ("xmlns:r", NS_DOC_REL)])?;

    xml.start("sheetViews", &[])?;
    xml.start("sheetView", &[("tabSelected", "1"), ("workbookViewId", "0")])?;
    xml.empty(
        "pane",
        &[
            ("ySplit", "1"),
            ("topLeftCell", "A2"),
            ("activePane", "bottomLeft"),
            ("state", "frozen"),
        ],
    )?;
    xml.empty("selection", &[("pane", "bottomLeft")])?;
    xml.end("sheetView")?;
    xml.end("sheetViews")?;

    xml.empty("sheetFormatPr", &[("defaultRowHeight", "15")])?;

    xml.start("cols", &[])?;
    for (col, width) in column_widths(rows).iter().enumerate() {
        let index = (col + 1).to_string();
        let width = width.to_string();
        xml.empty(
            "col",
            &[
                ("min", index.as_str()),
                ("max", index.as_str()),
                ("width", width.as_str()),
                ("customWidth", "1"),
            ],
        )?;
    }
    xml.end("cols")?;

    xml.start("sheetData", &[])?;
    write_row(&mut xml, 1, HEADERS, Some(HEADER_STYLE))?;
    for (i, record) in rows.iter().enumerate() {
        write_row(&mut xml, i + 2, cells(record), None)?;
    }
    xml.end("sheetData")?;

    xml.end("worksheet")?;
    Ok(xml.finish())
}

fn write_row(
    xml: &mut XmlPart,
    row_number: usize,
    values: [&str; 9],
    style: Option<&str>,
) -> Result<(), TableError> {
    let row_ref = row_number.to_string();
    xml.start("row", &[("r", row_ref.as_str())])?;
    for (col, value) in values.iter().enumerate() {
        if value.is_empty() {
            continue;
        }
        let cell_ref = format!("{}{}", column_letter(col), row_number);
        let mut attrs = vec![("r", cell_ref.as_str()), ("t", "inlineStr")];
        if let Some(style) = style {
            attrs.push(("s", style));
        }
        xml.start("c", &attrs)?;
        xml.start("is", &[])?;
        xml.start("t", &[("xml:space", "preserve")])?;
        xml.text(value)?;
        xml.end("t")?;
        xml.end("is")?;
        xml.end("c")?;
    }
    xml.end("row")
}
