//! The two data stores threaded through a pipeline run.
//!
//! - [`Frame`] — the tabular store: one row per input item, one column per
//!   field name, every cell `Option<Value>` with `None` meaning unknown.
//! - [`MatrixStore`] — auxiliary matrices keyed by name, independent of rows.
//!
//! Both are plain owned values. The engine moves them into each stage and
//! takes them back, so at most one stage holds them at any time.

use std::collections::BTreeMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SummarizerError};
use crate::types::{Value, DOC_ID, DOC_TEXT};

/// A column of cells, one per row; `None` is unknown.
pub type Column = Vec<Option<Value>>;

// ============================================================================
// Frame — per-item tabular store
// ============================================================================

/// Tabular store with a stable row index.
///
/// The row index (`doc id`) is assigned in input order and never changes for
/// the lifetime of a run. Columns are kept in name order so that iteration
/// and serialization are reproducible.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    index: Vec<usize>,
    columns: BTreeMap<String, Column>,
}

impl Frame {
    /// An empty frame with `rows` rows and no columns.
    pub fn with_rows(rows: usize) -> Self {
        Self {
            index: (0..rows).collect(),
            columns: BTreeMap::new(),
        }
    }

    /// One row per text, with the `doc id` and `doc text` columns filled.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Column = texts
            .into_iter()
            .map(|t| Some(Value::Text(t.into())))
            .collect();
        let mut frame = Self::with_rows(cells.len());
        frame.columns.insert(DOC_TEXT.to_string(), cells);
        frame.fill_doc_ids();
        frame
    }

    /// Build a frame from per-row field maps. Fields absent from a row are
    /// unknown in that row, except `doc id`, which defaults to the row index.
    pub fn from_rows(rows: Vec<BTreeMap<String, Value>>) -> Self {
        let mut frame = Self::with_rows(rows.len());
        for (row, fields) in rows.into_iter().enumerate() {
            for (name, value) in fields {
                frame.ensure_column(&name);
                if let Some(column) = frame.columns.get_mut(&name) {
                    column[row] = Some(value);
                }
            }
        }
        frame.fill_doc_ids();
        frame
    }

    /// Fill every unknown `doc id` cell from the row index.
    pub(crate) fn fill_doc_ids(&mut self) {
        let ids: Vec<usize> = self.index.clone();
        let column = self
            .columns
            .entry(DOC_ID.to_string())
            .or_insert_with(|| vec![None; ids.len()]);
        for (cell, id) in column.iter_mut().zip(ids) {
            if cell.is_none() {
                *cell = Some(Value::Integer(id as i64));
            }
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The stable row identifiers, in row order.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Add an all-unknown column if `name` is not present yet.
    pub fn ensure_column(&mut self, name: &str) {
        if !self.columns.contains_key(name) {
            self.columns
                .insert(name.to_string(), vec![None; self.index.len()]);
        }
    }

    /// Borrow a column.
    pub fn column(&self, name: &str) -> Option<&[Option<Value>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Replace a whole column. The column must already exist and the new
    /// cells must match the row count.
    pub fn set_column(&mut self, name: &str, cells: Column) -> Result<()> {
        if cells.len() != self.index.len() {
            return Err(SummarizerError::bad_input(format!(
                "column \"{name}\" has {} cells for {} rows",
                cells.len(),
                self.index.len()
            )));
        }
        match self.columns.get_mut(name) {
            Some(column) => {
                *column = cells;
                Ok(())
            }
            None => Err(SummarizerError::bad_input(format!(
                "frame has no column \"{name}\""
            ))),
        }
    }

    /// Read one cell; `None` if the column is absent or the cell unknown.
    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        self.columns
            .get(name)
            .and_then(|c| c.get(row))
            .and_then(Option::as_ref)
    }

    /// Write one cell of an existing column.
    pub fn set(&mut self, row: usize, name: &str, value: Value) -> Result<()> {
        let rows = self.index.len();
        let column = self.columns.get_mut(name).ok_or_else(|| {
            SummarizerError::bad_input(format!("frame has no column \"{name}\""))
        })?;
        let cell = column.get_mut(row).ok_or_else(|| {
            SummarizerError::bad_input(format!("row {row} out of range for {rows} rows"))
        })?;
        *cell = Some(value);
        Ok(())
    }

    /// Returns `true` if the column exists and every cell is known.
    pub fn is_complete(&self, name: &str) -> bool {
        self.columns
            .get(name)
            .map_or(false, |c| c.iter().all(Option::is_some))
    }

    /// Check that every column agrees with the row count.
    pub(crate) fn check_shape(&self) -> Result<()> {
        for (name, column) in &self.columns {
            if column.len() != self.index.len() {
                return Err(SummarizerError::bad_input(format!(
                    "column \"{name}\" has {} cells for {} rows",
                    column.len(),
                    self.index.len()
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// MatrixStore — keyed auxiliary matrices
// ============================================================================

/// Auxiliary data keyed by name; a slot holding `None` is unknown.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatrixStore {
    slots: BTreeMap<String, Option<Array2<f64>>>,
}

impl MatrixStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an unknown slot for `key` if none exists yet.
    pub fn allocate(&mut self, key: &str) {
        self.slots.entry(key.to_string()).or_insert(None);
    }

    /// Store a known matrix, creating the slot if needed.
    pub fn insert(&mut self, key: impl Into<String>, matrix: Array2<f64>) {
        self.slots.insert(key.into(), Some(matrix));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, matrix: Array2<f64>) -> Self {
        self.insert(key, matrix);
        self
    }

    /// Returns `true` if a slot exists, known or not.
    pub fn contains(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    /// Returns `true` if the slot exists and holds a matrix.
    pub fn is_known(&self, key: &str) -> bool {
        matches!(self.slots.get(key), Some(Some(_)))
    }

    pub fn get(&self, key: &str) -> Option<&Array2<f64>> {
        self.slots.get(key).and_then(Option::as_ref)
    }

    /// Slot names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// ============================================================================
// Input — accepted caller input shapes
// ============================================================================

/// The input shapes a pipeline accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Raw text items; each becomes one row.
    Texts(Vec<String>),
    /// A pre-structured frame, possibly with fields already populated.
    Frame(Frame),
}

impl Input {
    /// Interpret a JSON value as pipeline input.
    ///
    /// - array of strings → [`Input::Texts`]
    /// - array of objects (field → cell) → [`Input::Frame`]
    ///
    /// A cell is either a plain string or number (`{"doc text": "hello"}`,
    /// `{"doc id": 3}`) or a tagged [`Value`] such as
    /// `{"scores": [0.5, 0.1]}`. Anything else is `BadInput`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let items = value.as_array().ok_or_else(|| {
            SummarizerError::bad_input(format!(
                "expected a list of strings or a list of rows, got {}",
                json_kind(value)
            ))
        })?;

        if items.iter().all(serde_json::Value::is_string) {
            let texts = items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            return Ok(Input::Texts(texts));
        }

        if items.iter().all(serde_json::Value::is_object) {
            let rows = items
                .iter()
                .filter_map(serde_json::Value::as_object)
                .map(|row| {
                    row.iter()
                        .map(|(name, cell)| Ok((name.clone(), cell_value(name, cell)?)))
                        .collect::<Result<BTreeMap<_, _>>>()
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(Input::Frame(Frame::from_rows(rows)));
        }

        Err(SummarizerError::bad_input(
            "list items must be all strings or all row objects",
        ))
    }

    /// Number of rows this input will produce.
    pub fn len(&self) -> usize {
        match self {
            Input::Texts(texts) => texts.len(),
            Input::Frame(frame) => frame.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode one row cell: plain scalars first, then the tagged form.
fn cell_value(name: &str, cell: &serde_json::Value) -> Result<Value> {
    match cell {
        serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
        serde_json::Value::Number(n) => n
            .as_i64()
            .map(Value::Integer)
            .or_else(|| n.as_f64().map(Value::Number))
            .ok_or_else(|| {
                SummarizerError::bad_input(format!("field \"{name}\": bad number {n}"))
            }),
        serde_json::Value::Object(_) => serde_json::from_value(cell.clone()).map_err(|e| {
            SummarizerError::bad_input(format!("malformed row: field \"{name}\": {e}"))
        }),
        other => Err(SummarizerError::bad_input(format!(
            "malformed row: field \"{name}\" is {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "a mapping",
    }
}

impl From<Vec<String>> for Input {
    fn from(texts: Vec<String>) -> Self {
        Input::Texts(texts)
    }
}

impl From<&[&str]> for Input {
    fn from(texts: &[&str]) -> Self {
        Input::Texts(texts.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Input {
    fn from(texts: [&str; N]) -> Self {
        Input::Texts(texts.iter().map(|s| s.to_string()).collect())
    }
}

impl From<Frame> for Input {
    fn from(frame: Frame) -> Self {
        Input::Frame(frame)
    }
}
