use sqlx::SqlitePool;

use crate::models::Lecture;

const SELECT_COLUMNS: &str = "id, title, description, begin_at, end_at, price, location, \
     free, offline, created_at, updated_at";

/// Sort spec accepted by the listing endpoint, parsed from `?sort=field,dir`.
/// Column names are restricted to a fixed set; anything else falls back to
/// the default ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: &'static str,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self { column: "id", descending: false }
    }
}

impl SortSpec {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let mut parts = raw.splitn(2, ',');
        let column = match parts.next().map(str::trim) {
            Some("id") => "id",
            Some("title") => "title",
            Some("price") => "price",
            Some("begin_at") => "begin_at",
            Some("updated_at") => "updated_at",
            _ => return Self::default(),
        };
        let descending = parts
            .next()
            .is_some_and(|dir| dir.trim().eq_ignore_ascii_case("desc"));
        Self { column, descending }
    }

    fn order_clause(&self) -> String {
        let dir = if self.descending { "DESC" } else { "ASC" };
        format!("{} {}", self.column, dir)
    }
}

pub async fn find_lecture_by_id(db: &SqlitePool, id: i64) -> Result<Option<Lecture>, sqlx::Error> {
    sqlx::query_as::<_, Lecture>(&format!(
        "SELECT {SELECT_COLUMNS} FROM lectures WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Inserts the lecture and returns the row with its storage-assigned id.
pub async fn insert_lecture(db: &SqlitePool, lecture: &Lecture) -> Result<Lecture, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO lectures \
            (title, description, begin_at, end_at, price, location, \
            free, offline, created_at, updated_at) \
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&lecture.title)
    .bind(&lecture.description)
    .bind(lecture.begin_at)
    .bind(lecture.end_at)
    .bind(lecture.price)
    .bind(&lecture.location)
    .bind(lecture.free)
    .bind(lecture.offline)
    .bind(lecture.created_at)
    .bind(lecture.updated_at)
    .execute(db)
    .await?;

    let id = result.last_insert_rowid();
    find_lecture_by_id(db, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

pub async fn update_lecture(db: &SqlitePool, lecture: &Lecture) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE lectures \
        SET title = ?, description = ?, begin_at = ?, end_at = ?, price = ?, \
            location = ?, free = ?, offline = ?, updated_at = ? \
        WHERE id = ?",
    )
    .bind(&lecture.title)
    .bind(&lecture.description)
    .bind(lecture.begin_at)
    .bind(lecture.end_at)
    .bind(lecture.price)
    .bind(&lecture.location)
    .bind(lecture.free)
    .bind(lecture.offline)
    .bind(lecture.updated_at)
    .bind(lecture.id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn fetch_lectures_page(
    db: &SqlitePool,
    page: i64,
    size: i64,
    sort: SortSpec,
) -> Result<Vec<Lecture>, sqlx::Error> {
    // Sort column comes from the whitelist above, never from raw input.
    let query = format!(
        "SELECT {SELECT_COLUMNS} FROM lectures ORDER BY {} LIMIT ? OFFSET ?",
        sort.order_clause()
    );
    // page is caller-controlled; a huge value must yield an empty page,
    // not an overflow.
    sqlx::query_as::<_, Lecture>(&query)
        .bind(size)
        .bind(page.saturating_mul(size))
        .fetch_all(db)
        .await
}

pub async fn count_lectures(db: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM lectures")
        .fetch_one(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_defaults_to_id_ascending() {
        assert_eq!(SortSpec::parse(None), SortSpec::default());
        assert_eq!(SortSpec::parse(Some("")), SortSpec::default());
    }

    #[test]
    fn sort_parses_whitelisted_columns() {
        let sort = SortSpec::parse(Some("title,desc"));
        assert_eq!(sort.column, "title");
        assert!(sort.descending);

        let sort = SortSpec::parse(Some("price"));
        assert_eq!(sort.column, "price");
        assert!(!sort.descending);
    }

    #[test]
    fn sort_rejects_unknown_columns() {
        assert_eq!(SortSpec::parse(Some("id; DROP TABLE lectures")), SortSpec::default());
        assert_eq!(SortSpec::parse(Some("secret_column,desc")), SortSpec::default());
    }
}
