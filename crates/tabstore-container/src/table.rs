//! Tabular values and their slot encoding.
//!
//! Tables are stored as Arrow IPC streams produced by polars. A `Series` is
//! written as a single-column frame and tagged with [`TableKind::Series`] so
//! it comes back as a `Series`.

use std::io::Cursor;

use polars::prelude::*;

use crate::error::{ContainerError, Result};
use crate::types::{Entry, TableKind};

/// A table stored in one container slot.
#[derive(Debug, Clone)]
pub enum TableValue {
    /// Ordered rows by named columns.
    Frame(DataFrame),
    /// A named sequence of values.
    Series(Series),
}

impl TableValue {
    /// Shape of this table.
    pub fn kind(&self) -> TableKind {
        match self {
            Self::Frame(_) => TableKind::Frame,
            Self::Series(_) => TableKind::Series,
        }
    }

    /// Number of rows (or values for a series).
    pub fn len(&self) -> usize {
        match self {
            Self::Frame(df) => df.height(),
            Self::Series(s) => s.len(),
        }
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the frame, if this is one.
    pub fn as_frame(&self) -> Option<&DataFrame> {
        match self {
            Self::Frame(df) => Some(df),
            Self::Series(_) => None,
        }
    }

    /// Borrow the series, if this is one.
    pub fn as_series(&self) -> Option<&Series> {
        match self {
            Self::Frame(_) => None,
            Self::Series(s) => Some(s),
        }
    }

    /// Value and dtype equality, treating nulls in the same position as equal.
    pub fn equals_missing(&self, other: &TableValue) -> bool {
        match (self, other) {
            (Self::Frame(a), Self::Frame(b)) => a.schema() == b.schema() && a.equals_missing(b),
            (Self::Series(a), Self::Series(b)) => {
                a.name() == b.name() && a.dtype() == b.dtype() && a.equals_missing(b)
            }
            _ => false,
        }
    }
}

impl From<DataFrame> for TableValue {
    fn from(df: DataFrame) -> Self {
        Self::Frame(df)
    }
}

impl From<Series> for TableValue {
    fn from(series: Series) -> Self {
        Self::Series(series)
    }
}

/// Encode a table into a fresh slot.
pub(crate) fn encode_entry(key: &str, table: &TableValue) -> Result<Entry> {
    let mut frame = match table {
        TableValue::Frame(df) => df.clone(),
        TableValue::Series(s) => s.clone().into_frame(),
    };

    let mut payload = Vec::new();
    IpcWriter::new(&mut payload)
        .finish(&mut frame)
        .map_err(|source| ContainerError::Table {
            key: key.to_string(),
            source,
        })?;

    Ok(Entry::new(table.kind(), table.len() as u64, payload))
}

/// Decode the table held by a slot.
pub(crate) fn decode_entry(key: &str, entry: &Entry) -> Result<TableValue> {
    let table_error = |source| ContainerError::Table {
        key: key.to_string(),
        source,
    };

    let frame = IpcReader::new(Cursor::new(entry.payload.as_slice()))
        .finish()
        .map_err(table_error)?;

    let height = usize::try_from(entry.height).map_err(|_| {
        table_error(PolarsError::ComputeError(
            format!("row count {} does not fit in memory", entry.height).into(),
        ))
    })?;
    let frame = if frame.width() == 0 {
        DataFrame::empty_with_height(height)
    } else if frame.height() != height {
        return Err(table_error(PolarsError::ShapeMismatch(
            format!("slot records {} rows but holds {}", height, frame.height()).into(),
        )));
    } else {
        frame
    };

    match entry.kind {
        TableKind::Frame => Ok(TableValue::Frame(frame)),
        TableKind::Series => {
            if frame.width() != 1 {
                return Err(table_error(PolarsError::ShapeMismatch(
                    format!("series slot holds {} columns", frame.width()).into(),
                )));
            }
            let column = frame
                .take_columns()
                .pop()
                .ok_or_else(|| table_error(PolarsError::NoData("empty series slot".into())))?;
            Ok(TableValue::Series(column.take_materialized_series()))
        }
    }
}
