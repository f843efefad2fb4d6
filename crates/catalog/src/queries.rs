//! Typed catalog operations: marker search and bulk scene existence.

use std::collections::HashSet;

use serde::Deserialize;

use crate::client::{CatalogClient, CatalogError};

/// Marker search document. Filters by performers and a tag union; the
/// AND/OR split between required and optional tags is applied locally by
/// the membership resolver. The catalog's sort is the stable order used
/// for deterministic item ordering on regeneration.
const FIND_MARKERS_DOCUMENT: &str = "\
query FindMarkers($performer_ids: [ID!], $tag_ids: [ID!]) {
  findSceneMarkers(
    scene_marker_filter: {
      performers: { value: $performer_ids, modifier: INCLUDES }
      tags: { value: $tag_ids, modifier: INCLUDES }
    }
    filter: { per_page: -1, sort: \"title\" }
  ) {
    scene_markers {
      id
      title
      seconds
      end_seconds
      screenshot
      stream
      preview
      scene { id performers { id } }
      primary_tag { id }
      tags { id }
    }
  }
}";

/// Bulk scene existence document. One query for the whole id set so a
/// sweep issues a bounded number of requests regardless of item count.
const FIND_SCENES_DOCUMENT: &str = "\
query FindScenes($ids: [ID!]!) {
  findScenes(scene_ids: $ids, filter: { per_page: -1 }) {
    scenes { id }
  }
}";

// ---------------------------------------------------------------------------
// Typed records
// ---------------------------------------------------------------------------

/// A tagged time-range within a catalog scene; the atomic unit indexed
/// into playlists.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub title: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub screenshot_url: Option<String>,
    pub stream_url: Option<String>,
    pub preview_url: Option<String>,
    pub scene: Option<MarkerScene>,
    /// Primary tag first, then secondary tags.
    pub tag_ids: Vec<String>,
}

/// The scene a marker belongs to, with its performer ids.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerScene {
    pub id: String,
    pub performer_ids: Vec<String>,
}

impl Marker {
    /// Performer ids of the owning scene, empty when unknown.
    pub fn scene_performer_ids(&self) -> &[String] {
        self.scene.as_ref().map_or(&[], |s| &s.performer_ids)
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FindMarkersData {
    #[serde(rename = "findSceneMarkers")]
    find_scene_markers: MarkerPage,
}

#[derive(Debug, Deserialize)]
struct MarkerPage {
    scene_markers: Vec<WireMarker>,
}

#[derive(Debug, Deserialize)]
struct WireMarker {
    id: String,
    #[serde(default)]
    title: String,
    seconds: f64,
    #[serde(default)]
    end_seconds: Option<f64>,
    screenshot: Option<String>,
    stream: Option<String>,
    preview: Option<String>,
    scene: Option<WireScene>,
    primary_tag: Option<WireRef>,
    #[serde(default)]
    tags: Vec<WireRef>,
}

#[derive(Debug, Deserialize)]
struct WireScene {
    id: String,
    #[serde(default)]
    performers: Vec<WireRef>,
}

#[derive(Debug, Deserialize)]
struct WireRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FindScenesData {
    #[serde(rename = "findScenes")]
    find_scenes: ScenePage,
}

#[derive(Debug, Deserialize)]
struct ScenePage {
    scenes: Vec<WireRef>,
}

impl From<WireMarker> for Marker {
    fn from(wire: WireMarker) -> Self {
        let mut tag_ids: Vec<String> = Vec::with_capacity(wire.tags.len() + 1);
        if let Some(primary) = wire.primary_tag {
            tag_ids.push(primary.id);
        }
        for tag in wire.tags {
            if !tag_ids.contains(&tag.id) {
                tag_ids.push(tag.id);
            }
        }
        Self {
            id: wire.id,
            title: wire.title,
            start_seconds: wire.seconds,
            end_seconds: wire.end_seconds.unwrap_or(wire.seconds),
            screenshot_url: wire.screenshot,
            stream_url: wire.stream,
            preview_url: wire.preview,
            scene: wire.scene.map(|s| MarkerScene {
                id: s.id,
                performer_ids: s.performers.into_iter().map(|p| p.id).collect(),
            }),
            tag_ids,
        }
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

impl CatalogClient {
    /// Search markers by performer filter and tag union.
    ///
    /// Empty filters are omitted from the request (the catalog treats a
    /// missing filter as "no constraint"). Result order is preserved
    /// exactly as returned.
    pub async fn find_markers(
        &self,
        performer_ids: &[String],
        tag_ids: &[String],
    ) -> Result<Vec<Marker>, CatalogError> {
        let mut variables = serde_json::Map::new();
        if !performer_ids.is_empty() {
            variables.insert("performer_ids".into(), serde_json::json!(performer_ids));
        }
        if !tag_ids.is_empty() {
            variables.insert("tag_ids".into(), serde_json::json!(tag_ids));
        }

        let data = self
            .query(FIND_MARKERS_DOCUMENT, serde_json::Value::Object(variables))
            .await?;

        let parsed: FindMarkersData =
            serde_json::from_value(data).map_err(|e| CatalogError::Decode(e.to_string()))?;

        let markers: Vec<Marker> = parsed
            .find_scene_markers
            .scene_markers
            .into_iter()
            .map(Marker::from)
            .collect();

        tracing::debug!(count = markers.len(), "Catalog marker search completed");
        Ok(markers)
    }

    /// The subset of `scene_ids` that still exist in the catalog, fetched
    /// in one bulk query.
    pub async fn valid_scene_ids(
        &self,
        scene_ids: &[String],
    ) -> Result<HashSet<String>, CatalogError> {
        if scene_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let variables = serde_json::json!({ "ids": scene_ids });
        let data = self.query(FIND_SCENES_DOCUMENT, variables).await?;

        let parsed: FindScenesData =
            serde_json::from_value(data).map_err(|e| CatalogError::Decode(e.to_string()))?;

        Ok(parsed
            .find_scenes
            .scenes
            .into_iter()
            .map(|s| s.id)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn marker_json(id: &str, tag_ids: &[&str]) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": format!("marker {id}"),
            "seconds": 10.0,
            "end_seconds": 20.0,
            "screenshot": null,
            "stream": null,
            "preview": null,
            "scene": { "id": format!("scene-{id}"), "performers": [{ "id": "p1" }] },
            "primary_tag": { "id": tag_ids[0] },
            "tags": tag_ids[1..].iter().map(|t| serde_json::json!({ "id": t })).collect::<Vec<_>>(),
        })
    }

    async fn mock_graphql(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    // -- query error taxonomy -------------------------------------------------

    #[tokio::test]
    async fn non_2xx_status_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = CatalogClient::new(server.uri(), None);
        let err = client.query("query { x }", serde_json::json!({})).await;
        assert_matches!(err, Err(CatalogError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn graphql_errors_are_query_errors_not_empty_results() {
        let server = MockServer::start().await;
        mock_graphql(
            &server,
            serde_json::json!({ "errors": [{ "message": "tag not found" }] }),
        )
        .await;

        let client = CatalogClient::new(server.uri(), None);
        let err = client.query("query { x }", serde_json::json!({})).await;
        assert_matches!(err, Err(CatalogError::Query(msg)) if msg.contains("tag not found"));
    }

    #[tokio::test]
    async fn missing_data_is_a_decode_error() {
        let server = MockServer::start().await;
        mock_graphql(&server, serde_json::json!({})).await;

        let client = CatalogClient::new(server.uri(), None);
        let err = client.query("query { x }", serde_json::json!({})).await;
        assert_matches!(err, Err(CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn successful_query_returns_data() {
        let server = MockServer::start().await;
        mock_graphql(&server, serde_json::json!({ "data": { "ok": true } })).await;

        let client = CatalogClient::new(server.uri(), None);
        let data = client.query("query { ok }", serde_json::json!({})).await.unwrap();
        assert_eq!(data["ok"], true);
    }

    // -- find_markers ---------------------------------------------------------

    #[tokio::test]
    async fn find_markers_parses_and_preserves_order() {
        let server = MockServer::start().await;
        mock_graphql(
            &server,
            serde_json::json!({
                "data": {
                    "findSceneMarkers": {
                        "scene_markers": [
                            marker_json("m2", &["a", "b"]),
                            marker_json("m1", &["a"]),
                            marker_json("m3", &["c"]),
                        ]
                    }
                }
            }),
        )
        .await;

        let client = CatalogClient::new(server.uri(), None);
        let markers = client.find_markers(&[], &["a".into()]).await.unwrap();

        let ids: Vec<&str> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m1", "m3"]);
        assert_eq!(markers[0].tag_ids, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(markers[0].scene_performer_ids(), &["p1".to_string()]);
        assert_eq!(markers[0].start_seconds, 10.0);
        assert_eq!(markers[0].end_seconds, 20.0);
    }

    #[tokio::test]
    async fn find_markers_merges_primary_and_secondary_tags() {
        let server = MockServer::start().await;
        let mut marker = marker_json("m1", &["a"]);
        marker["tags"] = serde_json::json!([{ "id": "a" }, { "id": "b" }]);
        mock_graphql(
            &server,
            serde_json::json!({
                "data": { "findSceneMarkers": { "scene_markers": [marker] } }
            }),
        )
        .await;

        let client = CatalogClient::new(server.uri(), None);
        let markers = client.find_markers(&[], &[]).await.unwrap();
        // Primary tag "a" is not duplicated by the secondary list.
        assert_eq!(markers[0].tag_ids, vec!["a".to_string(), "b".to_string()]);
    }

    // -- valid_scene_ids ------------------------------------------------------

    #[tokio::test]
    async fn valid_scene_ids_collects_existing_set() {
        let server = MockServer::start().await;
        mock_graphql(
            &server,
            serde_json::json!({
                "data": { "findScenes": { "scenes": [{ "id": "s1" }, { "id": "s3" }] } }
            }),
        )
        .await;

        let client = CatalogClient::new(server.uri(), None);
        let valid = client
            .valid_scene_ids(&["s1".into(), "s2".into(), "s3".into()])
            .await
            .unwrap();
        assert!(valid.contains("s1"));
        assert!(!valid.contains("s2"));
        assert_eq!(valid.len(), 2);
    }

    #[tokio::test]
    async fn valid_scene_ids_skips_request_for_empty_input() {
        // No mock mounted: a request would fail the test.
        let client = CatalogClient::new("http://127.0.0.1:1", None);
        let valid = client.valid_scene_ids(&[]).await.unwrap();
        assert!(valid.is_empty());
    }
}
