use sqlx::PgConnection;

use crate::error::Result;
use crate::slug::slugify;

pub mod club;
pub mod event;
pub mod result;
pub mod series;
pub mod spinnaker;
pub mod yacht;

/// Slug derived from `name`, suffixed `-2`, `-3`, ... until it is free in `table`.
pub(crate) async fn generate_unique_slug(
    conn: &mut PgConnection,
    table: &'static str,
    name: &str,
    fallback: &str,
) -> Result<String> {
    let base_slug = match slugify(name) {
        slug if slug.is_empty() => fallback.to_string(),
        slug => slug,
    };

    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE slug = $1)", table);
    let mut final_slug = base_slug.clone();
    let mut counter = 2;

    while sqlx::query_scalar::<_, bool>(&sql)
        .bind(&final_slug)
        .fetch_one(&mut *conn)
        .await?
    {
        final_slug = format!("{}-{}", base_slug, counter);
        counter += 1;
    }

    Ok(final_slug)
}
