//! Generation orchestrator: actor x template cross product.
//!
//! Creates any missing per-actor SMART playlist and immediately populates
//! it through the resolver and reconcile engine. A failure on one pair
//! never aborts the run; errors accumulate in the report.

use std::collections::HashSet;

use clipdeck_catalog::CatalogClient;
use clipdeck_core::conditions::ConditionSet;
use clipdeck_db::models::template::Template;
use clipdeck_db::repositories::{ActorRepo, PlaylistRepo, TemplateRepo};
use clipdeck_db::DbPool;
use serde::Serialize;

use crate::error::EngineError;
use crate::{reconcile, resolver};

/// Aggregate result of one generation run.
#[derive(Debug, Default, Serialize)]
pub struct GenerationReport {
    pub actors_processed: usize,
    pub templates_processed: usize,
    pub playlists_created: usize,
    pub playlists_skipped: usize,
    pub errors: Vec<String>,
    pub duration_ms: i64,
}

/// Canonical name for a per-actor generated playlist.
pub fn playlist_name(actor_name: &str, template_name: &str) -> String {
    format!("{actor_name} - {template_name}")
}

/// Condition set for an actor/template pair. The template's tag lists are
/// canonicalized (legacy flattened fallback honored) and the legacy union
/// is recomputed for the new playlist row.
pub fn pair_condition(actor_id: &str, template: &Template) -> ConditionSet {
    let (required, optional) = template.effective_tag_lists();
    ConditionSet {
        performer_ids: vec![actor_id.to_string()],
        required_tag_ids: required,
        optional_tag_ids: optional,
        tag_ids: vec![],
        min_rating: None,
    }
    .normalized()
}

/// Run one generation pass.
///
/// Setup failures (loading actors, templates, or the existing name set)
/// abort the whole run; per-pair failures are accumulated. A playlist
/// whose row was created but whose population failed still counts as
/// created — partial success is valid.
pub async fn run_generation(
    pool: &DbPool,
    catalog: &CatalogClient,
) -> Result<GenerationReport, EngineError> {
    let started = std::time::Instant::now();

    let actors = ActorRepo::list(pool).await?;
    let templates = TemplateRepo::list_included(pool).await?;

    // Seeded once, then updated in-memory as playlists are created so one
    // pass can never create the same name twice.
    let mut names: HashSet<String> = PlaylistRepo::list_names(pool).await?.into_iter().collect();

    let mut report = GenerationReport {
        actors_processed: actors.len(),
        templates_processed: templates.len(),
        ..Default::default()
    };

    for actor in &actors {
        for template in &templates {
            let name = playlist_name(&actor.name, &template.name);
            if names.contains(&name) {
                report.playlists_skipped += 1;
                continue;
            }

            let condition = pair_condition(&actor.id, template);
            let playlist = match PlaylistRepo::create_smart(pool, &name, &condition).await {
                Ok(playlist) => playlist,
                Err(e) => {
                    report
                        .errors
                        .push(format!("create '{name}' failed: {e}"));
                    continue;
                }
            };
            names.insert(name.clone());
            report.playlists_created += 1;

            // The row exists; a population failure leaves it empty and is
            // reported without aborting the run.
            if let Err(e) = populate(pool, catalog, playlist.id, &condition).await {
                report
                    .errors
                    .push(format!("populate '{name}' failed: {e}"));
            }
        }
    }

    report.duration_ms = started.elapsed().as_millis() as i64;
    tracing::info!(
        created = report.playlists_created,
        skipped = report.playlists_skipped,
        errors = report.errors.len(),
        duration_ms = report.duration_ms,
        "Generation run finished"
    );
    Ok(report)
}

async fn populate(
    pool: &DbPool,
    catalog: &CatalogClient,
    playlist_id: i64,
    condition: &ConditionSet,
) -> Result<(), EngineError> {
    let markers = resolver::resolve_membership(pool, catalog, condition).await?;
    let candidates = resolver::to_candidates(&markers);
    reconcile::sync(pool, playlist_id, &candidates, false).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str, required: &[&str], optional: &[&str], legacy: &[&str]) -> Template {
        Template {
            id: 1,
            name: name.to_string(),
            required_tag_ids: required.iter().map(|s| s.to_string()).collect(),
            optional_tag_ids: optional.iter().map(|s| s.to_string()).collect(),
            tag_ids: legacy.iter().map(|s| s.to_string()).collect(),
            exclude_from_generation: false,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn playlist_name_follows_convention() {
        assert_eq!(playlist_name("Jane Doe", "Highlights"), "Jane Doe - Highlights");
    }

    #[test]
    fn pair_condition_targets_the_actor() {
        let t = template("T", &["x"], &["y"], &[]);
        let cond = pair_condition("actor-1", &t);
        assert_eq!(cond.performer_ids, vec!["actor-1".to_string()]);
        assert_eq!(cond.required_tag_ids, vec!["x".to_string()]);
        assert_eq!(cond.optional_tag_ids, vec!["y".to_string()]);
        // Legacy union recomputed for the new row.
        assert_eq!(cond.tag_ids, vec!["x".to_string(), "y".to_string()]);
        assert_eq!(cond.min_rating, None);
    }

    #[test]
    fn pair_condition_honors_legacy_template_tags() {
        let t = template("T", &[], &[], &["old"]);
        let cond = pair_condition("actor-1", &t);
        assert_eq!(cond.required_tag_ids, vec!["old".to_string()]);
        assert!(cond.optional_tag_ids.is_empty());
    }
}
