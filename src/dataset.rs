//! Static tabular datasets backing the report figures.
//!
//! A `Dataset` is a named set of ordered columns and ordered rows. Every row
//! holds exactly one value per column; the constructor and `push_row` refuse
//! anything else, so readers never need to re-check row width.

use std::fmt;

use serde::Serialize;

use crate::{Error, Result};

/// A single scalar cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }
}

/// Numbers print rounded to one decimal; whole numbers print without a fraction.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) => {
                let rounded = (n * 10.0).round() / 10.0;
                if rounded.fract() == 0.0 {
                    // adding zero turns -0 into 0
                    write!(f, "{:.0}", rounded + 0.0)
                } else {
                    write!(f, "{:.1}", rounded)
                }
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    pub fn new<S: Into<String>>(name: &str, columns: impl IntoIterator<Item = S>) -> Result<Self> {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if columns.is_empty() {
            return Err(Error::DataShapeError(format!(
                "dataset '{}' has no columns",
                name
            )));
        }
        for (i, c) in columns.iter().enumerate() {
            if columns[..i].contains(c) {
                return Err(Error::DataShapeError(format!(
                    "dataset '{}' repeats column '{}'",
                    name, c
                )));
            }
        }
        Ok(Self {
            name: name.to_string(),
            columns,
            rows: Vec::new(),
        })
    }

    /// Build a dataset from column-major literals, the way the figure data is written.
    pub fn from_columns(name: &str, columns: Vec<(&str, Vec<Value>)>) -> Result<Self> {
        let mut ds = Self::new(name, columns.iter().map(|(c, _)| *c))?;
        let len = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        if let Some((c, v)) = columns.iter().find(|(_, v)| v.len() != len) {
            return Err(Error::DataShapeError(format!(
                "dataset '{}' column '{}' has {} values, expected {}",
                name,
                c,
                v.len(),
                len
            )));
        }
        for i in 0..len {
            ds.rows.push(columns.iter().map(|(_, v)| v[i].clone()).collect());
        }
        Ok(ds)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::DataShapeError(format!(
                "dataset '{}' row {} has {} values, expected {}",
                self.name,
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn index_of(&self, column: &str) -> Result<usize> {
        self.columns.iter().position(|c| c == column).ok_or_else(|| {
            Error::DataShapeError(format!(
                "dataset '{}' has no column '{}'",
                self.name, column
            ))
        })
    }

    pub fn column(&self, column: &str) -> Result<Vec<&Value>> {
        let idx = self.index_of(column)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// Numeric view of a column; any text cell is a shape error.
    pub fn numbers(&self, column: &str) -> Result<Vec<f64>> {
        self.column(column)?
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_f64().ok_or_else(|| {
                    Error::DataShapeError(format!(
                        "dataset '{}' column '{}' row {} is not numeric",
                        self.name, column, i
                    ))
                })
            })
            .collect()
    }

    /// Display strings of a column.
    pub fn strings(&self, column: &str) -> Result<Vec<String>> {
        Ok(self.column(column)?.into_iter().map(|v| v.to_string()).collect())
    }

    /// Rows restricted to the given columns, in the given order.
    pub fn select(&self, columns: &[&str]) -> Result<Vec<Vec<Value>>> {
        let idx = columns
            .iter()
            .map(|c| self.index_of(c))
            .collect::<Result<Vec<_>>>()?;
        Ok(self
            .rows
            .iter()
            .map(|r| idx.iter().map(|&i| r[i].clone()).collect())
            .collect())
    }
}
