use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::schema::{label, record};

/// Sentiment label attached to every post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Irrelevant,
}

impl Sentiment {
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Positive,
        Sentiment::Negative,
        Sentiment::Neutral,
        Sentiment::Irrelevant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => label::POSITIVE,
            Sentiment::Negative => label::NEGATIVE,
            Sentiment::Neutral => label::NEUTRAL,
            Sentiment::Irrelevant => label::IRRELEVANT,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            label::POSITIVE => Ok(Sentiment::Positive),
            label::NEGATIVE => Ok(Sentiment::Negative),
            label::NEUTRAL => Ok(Sentiment::Neutral),
            label::IRRELEVANT => Ok(Sentiment::Irrelevant),
            other => Err(AnalysisError::InvalidData(format!(
                "unknown sentiment label '{other}'"
            ))),
        }
    }
}

/// One labeled post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: i64,
    pub brand: String,
    pub sentiment: Sentiment,
    /// Post body; the source files contain rows with an empty text field.
    pub text: Option<String>,
}

impl Record {
    pub fn new(id: i64, brand: impl Into<String>, sentiment: Sentiment, text: impl Into<String>) -> Self {
        Self {
            id,
            brand: brand.into(),
            sentiment,
            text: Some(text.into()),
        }
    }
}

/// Shape of the loaded table, printed before any metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOverview {
    pub rows: usize,
    pub distinct_brands: usize,
    /// (column, null count) in column order.
    pub null_counts: Vec<(String, usize)>,
}

/// The full record table: training rows followed by validation rows.
///
/// Every row has an id, a brand and a sentiment label that parses as
/// [`Sentiment`]; construction fails otherwise.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
}

impl Dataset {
    /// Load and concatenate the training and validation files.
    pub fn load(training: &Path, validation: &Path) -> Result<Self> {
        let train = load_records(training)?;
        let val = load_records(validation)?;
        info!(
            training_rows = train.height(),
            validation_rows = val.height(),
            "loaded input files"
        );

        let df = train.vstack(&val)?;
        Self::from_dataframe(df)
    }

    /// Wrap an existing frame holding the four record columns.
    /// Extra columns are dropped.
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        require_columns(&df, &record::ALL)?;

        let df = df
            .lazy()
            .select([
                col(record::ID).cast(DataType::Int64),
                col(record::BRAND).cast(DataType::String),
                col(record::SENTIMENT)
                    .cast(DataType::String)
                    .str()
                    .strip_chars(lit(" \t\r\n")),
                col(record::TEXT).cast(DataType::String),
            ])
            .collect()?;

        validate(&df)?;
        Ok(Self { df })
    }

    pub fn from_records(records: &[Record]) -> Result<Self> {
        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let brands: Vec<&str> = records.iter().map(|r| r.brand.as_str()).collect();
        let labels: Vec<&str> = records.iter().map(|r| r.sentiment.as_str()).collect();
        let texts: Vec<Option<&str>> = records.iter().map(|r| r.text.as_deref()).collect();

        let df = DataFrame::new(vec![
            Column::new(record::ID.into(), ids),
            Column::new(record::BRAND.into(), brands),
            Column::new(record::SENTIMENT.into(), labels),
            Column::new(record::TEXT.into(), texts),
        ])?;
        Self::from_dataframe(df)
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Number of distinct brands.
    pub fn brand_count(&self) -> Result<usize> {
        Ok(self
            .df
            .column(record::BRAND)?
            .as_materialized_series()
            .n_unique()?)
    }

    pub fn overview(&self) -> Result<DatasetOverview> {
        let null_counts = record::ALL
            .iter()
            .map(|name| Ok((name.to_string(), self.df.column(name)?.null_count())))
            .collect::<Result<Vec<_>>>()?;

        Ok(DatasetOverview {
            rows: self.len(),
            distinct_brands: self.brand_count()?,
            null_counts,
        })
    }

    /// Materialize the table as typed records, in table order.
    pub fn records(&self) -> Result<Vec<Record>> {
        let ids = self.df.column(record::ID)?.i64()?;
        let brands = self.df.column(record::BRAND)?.str()?;
        let labels = self.df.column(record::SENTIMENT)?.str()?;
        let texts = self.df.column(record::TEXT)?.str()?;

        (0..self.df.height())
            .map(|i| {
                let id = ids
                    .get(i)
                    .ok_or_else(|| AnalysisError::InvalidData(format!("row {i}: missing id")))?;
                let brand = brands
                    .get(i)
                    .ok_or_else(|| AnalysisError::InvalidData(format!("row {i}: missing brand")))?;
                let sentiment = labels
                    .get(i)
                    .ok_or_else(|| {
                        AnalysisError::InvalidData(format!("row {i}: missing sentiment"))
                    })?
                    .parse()?;
                Ok(Record {
                    id,
                    brand: brand.to_string(),
                    sentiment,
                    text: texts.get(i).map(str::to_string),
                })
            })
            .collect()
    }
}

/// Read one headerless `id,brand,sentiment,text` file.
pub fn load_records(path: &Path) -> Result<DataFrame> {
    let schema = Schema::from_iter([
        Field::new(record::ID.into(), DataType::Int64),
        Field::new(record::BRAND.into(), DataType::String),
        Field::new(record::SENTIMENT.into(), DataType::String),
        Field::new(record::TEXT.into(), DataType::String),
    ]);

    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_schema(Some(Arc::new(schema)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(path = %path.display(), rows = df.height(), "read record file");
    Ok(df)
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(AnalysisError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Reject rows without key fields and rows whose label is not a known sentiment.
fn validate(df: &DataFrame) -> Result<()> {
    let ids = df.column(record::ID)?.i64()?;
    let brands = df.column(record::BRAND)?.str()?;
    let labels = df.column(record::SENTIMENT)?.str()?;

    for i in 0..df.height() {
        if ids.get(i).is_none() {
            return Err(AnalysisError::InvalidData(format!("row {i}: missing id")));
        }
        if brands.get(i).is_none() {
            return Err(AnalysisError::InvalidData(format!("row {i}: missing brand")));
        }
        let raw = labels
            .get(i)
            .ok_or_else(|| AnalysisError::InvalidData(format!("row {i}: missing sentiment")))?;
        if raw.parse::<Sentiment>().is_err() {
            return Err(AnalysisError::InvalidData(format!(
                "row {i}: unknown sentiment label '{raw}'"
            )));
        }
    }
    Ok(())
}
