// File: ./src/source/sheet.rs
// Spreadsheet source: one worksheet per lesson slot, the group code somewhere
// in a known column, room and teacher at fixed offsets from it.
use crate::config::{ColumnLayout, SheetConfig};
use crate::model::RawFragment;
use crate::source::SourceError;
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worksheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Plain-text copy of a workbook. Column indices match the file's columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Worksheet>,
}

/// Whole numbers are stored as floats; `103.0` reads back as `103`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

impl Workbook {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| SourceError::Workbook(e.to_string()))?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|e| SourceError::Workbook(e.to_string()))?;
            // calamine trims leading empty columns off the range
            let first_col = range.start().map(|(_, col)| col as usize).unwrap_or(0);
            let rows = range
                .rows()
                .map(|row| {
                    std::iter::repeat_n(String::new(), first_col)
                        .chain(row.iter().map(cell_text))
                        .collect()
                })
                .collect();
            sheets.push(Worksheet { name, rows });
        }
        Ok(Self { sheets })
    }
}

/// Slot number of a worksheet named `<prefix><n>`, e.g. `Пара 3`.
pub fn slot_number(sheet_name: &str, prefix: &str) -> Option<u32> {
    sheet_name
        .trim()
        .strip_prefix(prefix)?
        .trim()
        .parse()
        .ok()
}

fn cell_at(row: &[String], col: usize, offset: isize) -> Option<String> {
    let idx = col.checked_add_signed(offset)?;
    row.get(idx)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

fn find_group<'a>(
    sheet: &'a Worksheet,
    group: &str,
    columns: &[ColumnLayout],
) -> Option<(&'a [String], ColumnLayout)> {
    sheet.rows.iter().find_map(|row| {
        columns.iter().find_map(|layout| {
            row.get(layout.group_col)
                .filter(|cell| cell.trim() == group)
                .map(|_| (row.as_slice(), *layout))
        })
    })
}

/// One fragment per slot worksheet that mentions `group`; the first matching
/// row of each worksheet wins.
pub fn fragments_from_workbook(
    workbook: &Workbook,
    group: &str,
    config: &SheetConfig,
) -> Vec<RawFragment> {
    workbook
        .sheets
        .iter()
        .filter_map(|sheet| {
            let slot = slot_number(&sheet.name, &config.slot_prefix)?;
            let Some((row, layout)) = find_group(sheet, group, &config.columns) else {
                debug!("Group {} not found on sheet {:?}", group, sheet.name);
                return None;
            };
            let time = slot
                .checked_sub(1)
                .and_then(|i| config.bells.get(i as usize))
                .cloned();
            Some(RawFragment::Row {
                slot,
                time,
                subject: layout
                    .subject
                    .and_then(|offset| cell_at(row, layout.group_col, offset)),
                room: cell_at(row, layout.group_col, layout.room),
                teacher: cell_at(row, layout.group_col, layout.teacher),
            })
        })
        .collect()
}

pub async fn fetch(config: &SheetConfig, group: &str) -> Result<Vec<RawFragment>, SourceError> {
    if config.path.as_os_str().is_empty() {
        return Err(SourceError::NotConfigured);
    }
    let path = config.path.clone();
    let workbook = tokio::task::spawn_blocking(move || Workbook::open(&path)).await??;
    Ok(fragments_from_workbook(&workbook, group, config))
}
