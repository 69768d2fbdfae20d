/// A stored mapping from the `urls` table.
///
/// `code` is the `short` column (primary key); `original` is the URL exactly as
/// it was submitted. Scheme normalisation happens at redirect time, never here.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UrlMapping {
    #[sqlx(rename = "short")]
    pub code: String,
    pub original: String,
}
