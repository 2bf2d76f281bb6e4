//! Cell coercion by declared column type

use calamine::Data;
use serde_json::{Number, Value};
use sheetsync_core::{CellRef, DataType, Result, SyncError};

// Largest magnitude at which every f64 is still an exact integer.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// True for empty cells and whitespace-only text
#[must_use]
pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Text of a cell as an author would read it
#[must_use]
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => float_text(*f),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => float_text(dt.as_f64()),
        Data::Error(e) => format!("{e:?}"),
    }
}

fn float_text(f: f64) -> String {
    match integral(f) {
        Some(i) => i.to_string(),
        None => f.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() <= EXACT_INTEGER_LIMIT).then(|| f as i64)
}

/// Convert one data cell to its JSON value.
///
/// Blank cells take the type's zero value. `Unknown` never reaches here;
/// the schema rejects it first.
///
/// # Errors
///
/// Returns `SyncError::Format` naming `at` when the cell does not satisfy `ty`
pub fn coerce(cell: &Data, ty: DataType, at: CellRef) -> Result<Value> {
    let mismatch = || SyncError::format(at, cell_text(cell), ty.as_str());

    if let Data::Error(_) = cell {
        return Err(mismatch());
    }

    match ty {
        DataType::Integer => {
            if is_blank(cell) {
                return Ok(Value::from(0));
            }
            let value = match cell {
                Data::Int(i) => Some(*i),
                Data::Float(f) => integral(*f),
                Data::String(s) => s.trim().parse::<i64>().ok(),
                _ => None,
            };
            value.map(Value::from).ok_or_else(mismatch)
        }
        DataType::Float => {
            if is_blank(cell) {
                return Ok(Value::from(0.0));
            }
            #[allow(clippy::cast_precision_loss)]
            let value = match cell {
                Data::Float(f) => Some(*f),
                Data::Int(i) => Some(*i as f64),
                Data::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            value
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(mismatch)
        }
        DataType::String => Ok(Value::String(cell_text(cell))),
        DataType::Bool => {
            if is_blank(cell) {
                return Ok(Value::Bool(false));
            }
            match cell {
                Data::Bool(b) => Ok(Value::Bool(*b)),
                Data::String(s) => match s.trim() {
                    "True" | "true" | "TRUE" => Ok(Value::Bool(true)),
                    "False" | "false" | "FALSE" => Ok(Value::Bool(false)),
                    _ => Err(mismatch()),
                },
                _ => Err(mismatch()),
            }
        }
        DataType::Unknown => Err(mismatch()),
    }
}
