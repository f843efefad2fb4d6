//! Repository for the `templates` table.

use clipdeck_core::conditions;
use clipdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::template::{CreateTemplate, Template, UpdateTemplate};

/// Column list for `templates` queries.
const COLUMNS: &str = "\
    id, name, required_tag_ids, optional_tag_ids, tag_ids, \
    exclude_from_generation, created_at, updated_at";

/// Provides CRUD operations for templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template, normalizing the tag lists (legacy flattened
    /// input promotes to required; the flattened column is the derived
    /// union).
    pub async fn create(pool: &PgPool, input: &CreateTemplate) -> Result<Template, sqlx::Error> {
        let (required, optional) = conditions::effective_tag_lists(
            &input.required_tag_ids,
            &input.optional_tag_ids,
            &input.tag_ids,
        );
        let legacy = conditions::legacy_union(&required, &optional);

        let query = format!(
            "INSERT INTO templates \
                (name, required_tag_ids, optional_tag_ids, tag_ids, exclude_from_generation) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(&input.name)
            .bind(&required)
            .bind(&optional)
            .bind(&legacy)
            .bind(input.exclude_from_generation)
            .fetch_one(pool)
            .await
    }

    /// Find a template by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all templates.
    pub async fn list(pool: &PgPool) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates ORDER BY name, id");
        sqlx::query_as::<_, Template>(&query).fetch_all(pool).await
    }

    /// Templates eligible for auto-generation.
    pub async fn list_included(pool: &PgPool) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates \
             WHERE exclude_from_generation = false \
             ORDER BY name, id"
        );
        sqlx::query_as::<_, Template>(&query).fetch_all(pool).await
    }

    /// Update a template. Tag lists, when either is present, are replaced
    /// together and the flattened list recomputed; read-modify-write keeps
    /// the untouched list intact.
    ///
    /// Returns `None` if no template with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let Some(existing) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let required = input
            .required_tag_ids
            .clone()
            .unwrap_or_else(|| existing.required_tag_ids.clone());
        let optional = input
            .optional_tag_ids
            .clone()
            .unwrap_or_else(|| existing.optional_tag_ids.clone());
        let legacy = conditions::legacy_union(&required, &optional);

        let query = format!(
            "UPDATE templates SET \
                 name = COALESCE($2, name), \
                 required_tag_ids = $3, \
                 optional_tag_ids = $4, \
                 tag_ids = $5, \
                 exclude_from_generation = COALESCE($6, exclude_from_generation), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&required)
            .bind(&optional)
            .bind(&legacy)
            .bind(input.exclude_from_generation)
            .fetch_optional(pool)
            .await
    }

    /// Delete a template by ID.
    ///
    /// Returns `true` if a template was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
