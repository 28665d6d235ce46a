use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};

/// A number as SQLite stored it. Integer cells stay integers in the JSON
/// output, real cells stay reals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Real(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub release_year: Option<i64>,
    pub rating: Option<Numeric>,
    pub actor: Option<String>,
    pub box_office_collection: Option<Numeric>,
}

impl<'r> FromRow<'r, SqliteRow> for Movie {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Movie {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            director: row.try_get("director")?,
            genre: row.try_get("genre")?,
            release_year: row.try_get("release_year")?,
            rating: numeric(row, "rating")?,
            actor: row.try_get("actor")?,
            box_office_collection: numeric(row, "box_office_collection")?,
        })
    }
}

// NUMERIC columns may hold either storage class, so try integer first.
fn numeric(row: &SqliteRow, column: &str) -> Result<Option<Numeric>, sqlx::Error> {
    match row.try_get::<Option<i64>, _>(column) {
        Ok(v) => Ok(v.map(Numeric::Int)),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            let v: Option<f64> = row.try_get(column)?;
            Ok(v.map(Numeric::Real))
        }
        Err(e) => Err(e),
    }
}

/// The `{"movies": [...]}` envelope every movie query returns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Movies {
    pub movies: Vec<Movie>,
}

impl From<Vec<Movie>> for Movies {
    fn from(movies: Vec<Movie>) -> Self {
        Self { movies }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Failed to open database {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type DbResult<T> = Result<T, DbError>;
