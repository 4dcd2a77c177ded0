//! The locations administration surface: the directory table, the dropdown
//! option/suggestion feeds consumed by the other product pages, and the
//! cascading editor fragments.
//!
//! The operator's in-progress editor lives in the session; every fragment
//! endpoint first applies the posted form fields to it, performs its action,
//! and re-renders the editor. The forest itself is re-fetched from the
//! directory backend on every page mount, never cached across requests.

use std::collections::HashMap;

use askama::Template;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse},
};
use portal_core::error::AppError;
use serde::Deserialize;
use tower_sessions::Session;

use crate::AppState;
use crate::models::location::LocationNode;
use crate::models::user::{AuthUser, OperatorProfile};
use crate::services::location::{
    CascadingEditor, EditorState, FlattenedOption, flatten, path, suggest, suggest_scoped,
};

const EDITOR_SESSION_KEY: &str = "location_editor";

#[derive(Template)]
#[template(path = "locations.html")]
pub struct LocationsTemplate {
    pub user: OperatorProfile,
    pub current_page: &'static str,
    pub options: Vec<FlattenedOption>,
    pub roots: Vec<RootRow>,
    pub editor_html: String,
    pub load_error: String,
}

/// One top-level directory entry in the admin table.
pub struct RootRow {
    pub id: String,
    pub label: String,
    pub states: usize,
    pub cities: usize,
}

fn root_rows(forest: &[LocationNode]) -> Vec<RootRow> {
    forest
        .iter()
        .map(|node| RootRow {
            id: node.id.clone().unwrap_or_default(),
            label: node.primary_location.clone(),
            states: node.sub_locations.len(),
            cities: node
                .sub_locations
                .iter()
                .map(|state| state.secondary_locations.len())
                .sum(),
        })
        .collect()
}

pub async fn locations_page(
    State(state): State<AppState>,
    auth_user: AuthUser,
    session: Session,
) -> impl IntoResponse {
    let user = OperatorProfile {
        email: auth_user.email.clone(),
    };

    let (options, roots, load_error) = match state
        .directory_client
        .get_locations(&auth_user.access_token)
        .await
    {
        Ok(forest) => (flatten(&forest), root_rows(&forest), String::new()),
        Err(e) => {
            tracing::error!(
                user_id = %auth_user.user_id,
                error = %e,
                "Failed to fetch location forest"
            );
            (
                Vec::new(),
                Vec::new(),
                "Failed to load locations".to_string(),
            )
        }
    };

    let editor = load_editor(&session).await;

    LocationsTemplate {
        user,
        current_page: "locations",
        options,
        roots,
        editor_html: render_editor(&editor, None),
        load_error,
    }
}

/// Dropdown feed: the flattened forest, as consumed by the CCTV request,
/// user allocation, meeting venue and report filter pages.
pub async fn options_api(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<FlattenedOption>>, AppError> {
    let forest = state
        .directory_client
        .get_locations(&auth_user.access_token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch location forest");
            AppError::DirectoryUnavailable("Failed to load locations".to_string())
        })?;

    Ok(Json(flatten(&forest)))
}

#[derive(Debug, Deserialize)]
pub struct SuggestParams {
    #[serde(default)]
    pub q: String,
    /// Restrict matches to descendants of this path (e.g. the currently
    /// selected primary location).
    #[serde(default)]
    pub scope: Option<String>,
}

/// Autocomplete feed, recomputed per keystroke; the caller debounces.
pub async fn suggest_api(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<SuggestParams>,
) -> Result<Json<Vec<String>>, AppError> {
    let forest = state
        .directory_client
        .get_locations(&auth_user.access_token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch location forest");
            AppError::DirectoryUnavailable("Failed to load locations".to_string())
        })?;

    let suggestions = match params.scope.as_deref().filter(|s| !path::is_blank(s)) {
        Some(scope) => {
            let prefix = format!("{}{}", scope, path::PATH_SEPARATOR);
            suggest_scoped(&forest, &params.q, |parent| {
                parent == scope || parent.starts_with(&prefix)
            })
        }
        None => suggest(&forest, &params.q),
    };

    Ok(Json(suggestions))
}

pub async fn delete_location(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state
        .directory_client
        .delete_location(&auth_user.access_token, &id)
        .await
    {
        Ok(()) => {
            tracing::info!(location_id = %id, "Location deleted");
            let mut headers = HeaderMap::new();
            headers.insert("HX-Refresh", "true".parse().unwrap());
            (StatusCode::OK, headers, "").into_response()
        }
        Err(e) => {
            tracing::error!(location_id = %id, error = %e, "Failed to delete location");
            (
                StatusCode::BAD_GATEWAY,
                Html("<p class='text-danger small'>Failed to delete location</p>"),
            )
                .into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Editor fragments
// ---------------------------------------------------------------------------

async fn load_editor(session: &Session) -> CascadingEditor {
    session
        .get(EDITOR_SESSION_KEY)
        .await
        .unwrap_or(None)
        .unwrap_or_default()
}

async fn store_editor(session: &Session, editor: &CascadingEditor) {
    session.insert(EDITOR_SESSION_KEY, editor).await.unwrap();
}

fn param_usize(params: &HashMap<String, String>, key: &str) -> Option<usize> {
    params.get(key).and_then(|v| v.parse().ok())
}

/// Write the posted form fields back into the editor's working copy.
///
/// Rows that no longer exist (stale fragment raced with a remove) are
/// ignored; the re-rendered fragment replaces them anyway.
fn apply_fields(editor: &mut CascadingEditor, params: &HashMap<String, String>) {
    if editor.state() != EditorState::Editing {
        return;
    }

    if let Some(v) = params.get("primary_location") {
        let _ = editor.set_primary_location(v);
    }
    if let Some(v) = params.get("primary_sub_location") {
        let _ = editor.set_primary_sub_location(v);
    }

    for (key, value) in params {
        if let Some(rest) = key.strip_prefix("secondary_location_") {
            if let Ok(i) = rest.parse() {
                let _ = editor.set_secondary_location(i, value);
            }
        } else if let Some(rest) = key.strip_prefix("secondary_sub_location_") {
            if let Ok(i) = rest.parse() {
                let _ = editor.set_secondary_sub_location(i, value);
            }
        } else if let Some(rest) = key.strip_prefix("third_location_") {
            if let Some((i, j)) = parse_pair(rest) {
                let _ = editor.set_third_location(i, j, value);
            }
        } else if let Some(rest) = key.strip_prefix("third_sub_location_") {
            if let Some((i, j)) = parse_pair(rest) {
                let _ = editor.set_third_sub_location(i, j, value);
            }
        }
    }
}

fn parse_pair(rest: &str) -> Option<(usize, usize)> {
    let (i, j) = rest.split_once('_')?;
    Some((i.parse().ok()?, j.parse().ok()?))
}

pub async fn editor_open(
    State(state): State<AppState>,
    auth_user: AuthUser,
    session: Session,
    Form(params): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut editor = load_editor(&session).await;
    let mut notice = None;

    match params.get("id").map(String::as_str).filter(|id| !id.is_empty()) {
        Some(id) => match state
            .directory_client
            .get_locations(&auth_user.access_token)
            .await
        {
            Ok(forest) => match forest.iter().find(|n| n.id.as_deref() == Some(id)) {
                Some(node) => editor.open_for(node),
                None => {
                    editor.open_blank();
                    notice = Some("That location no longer exists".to_string());
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch location forest");
                return (
                    StatusCode::BAD_GATEWAY,
                    Html("<p class='text-danger small'>Failed to load locations</p>"),
                )
                    .into_response();
            }
        },
        None => editor.open_blank(),
    }

    store_editor(&session, &editor).await;
    Html(render_editor(&editor, notice.as_deref())).into_response()
}

pub async fn editor_cancel(session: Session) -> impl IntoResponse {
    let mut editor = load_editor(&session).await;
    editor.cancel();
    store_editor(&session, &editor).await;
    Html(render_editor(&editor, None))
}

pub async fn editor_add_secondary(
    session: Session,
    Form(params): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut editor = load_editor(&session).await;
    apply_fields(&mut editor, &params);
    let notice = editor.add_secondary().err().map(|e| e.to_string());
    store_editor(&session, &editor).await;
    Html(render_editor(&editor, notice.as_deref()))
}

pub async fn editor_remove_secondary(
    session: Session,
    Form(params): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut editor = load_editor(&session).await;
    apply_fields(&mut editor, &params);
    let notice = match param_usize(&params, "index") {
        Some(index) => editor.remove_secondary(index).err().map(|e| e.to_string()),
        None => Some("Missing entry index".to_string()),
    };
    store_editor(&session, &editor).await;
    Html(render_editor(&editor, notice.as_deref()))
}

pub async fn editor_add_third(
    session: Session,
    Form(params): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut editor = load_editor(&session).await;
    apply_fields(&mut editor, &params);
    let notice = match param_usize(&params, "secondary") {
        Some(secondary) => editor.add_third(secondary).err().map(|e| e.to_string()),
        None => Some("Missing entry index".to_string()),
    };
    store_editor(&session, &editor).await;
    Html(render_editor(&editor, notice.as_deref()))
}

pub async fn editor_remove_third(
    session: Session,
    Form(params): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut editor = load_editor(&session).await;
    apply_fields(&mut editor, &params);
    let notice = match (
        param_usize(&params, "secondary"),
        param_usize(&params, "third"),
    ) {
        (Some(secondary), Some(third)) => editor
            .remove_third(secondary, third)
            .err()
            .map(|e| e.to_string()),
        _ => Some("Missing entry index".to_string()),
    };
    store_editor(&session, &editor).await;
    Html(render_editor(&editor, notice.as_deref()))
}

/// Primary-location selection: hydrate from an existing record when the
/// typed name matches one, so operators do not create duplicates.
pub async fn editor_select_primary(
    State(state): State<AppState>,
    auth_user: AuthUser,
    session: Session,
    Form(params): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut editor = load_editor(&session).await;

    let chosen = params
        .get("primary_location")
        .cloned()
        .unwrap_or_default();

    let forest = match state
        .directory_client
        .get_locations(&auth_user.access_token)
        .await
    {
        Ok(forest) => forest,
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch location forest");
            let _ = editor.set_primary_location(&chosen);
            store_editor(&session, &editor).await;
            return Html(render_editor(&editor, Some("Failed to load locations"))).into_response();
        }
    };

    let notice = match editor.select_primary(&chosen, &forest) {
        Ok(selection) if selection.candidates > 1 => Some(format!(
            "{} existing records match \"{}\"; editing the first",
            selection.candidates,
            chosen.trim()
        )),
        Ok(selection) if selection.hydrated() => {
            Some("Loaded the existing record for editing".to_string())
        }
        Ok(_) => None,
        Err(e) => Some(e.to_string()),
    };

    store_editor(&session, &editor).await;
    Html(render_editor(&editor, notice.as_deref())).into_response()
}

pub async fn editor_submit(
    State(state): State<AppState>,
    auth_user: AuthUser,
    session: Session,
    Form(params): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut editor = load_editor(&session).await;
    apply_fields(&mut editor, &params);

    let payload = match editor.begin_submit() {
        Ok(payload) => payload,
        Err(e) => {
            store_editor(&session, &editor).await;
            return Html(render_editor(&editor, Some(&e.to_string()))).into_response();
        }
    };

    let result = match editor.editing_id() {
        Some(id) => {
            state
                .directory_client
                .update_location(&auth_user.access_token, id, &payload)
                .await
        }
        None => {
            state
                .directory_client
                .create_location(&auth_user.access_token, &payload)
                .await
        }
    };

    match result {
        Ok(()) => {
            tracing::info!(
                user_id = %auth_user.user_id,
                primary = %payload.primary_location,
                "Location saved"
            );
            editor.submit_succeeded();
            store_editor(&session, &editor).await;
            // Full page refresh re-fetches the forest; no optimistic merge
            let mut headers = HeaderMap::new();
            headers.insert("HX-Refresh", "true".parse().unwrap());
            (StatusCode::OK, headers, "").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save location");
            editor.submit_failed();
            store_editor(&session, &editor).await;
            Html(render_editor(&editor, Some("Failed to save location"))).into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Fragment rendering
// ---------------------------------------------------------------------------

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the editor card. Every action button posts the whole form back so
/// typed-but-unsynced fields survive the round trip.
fn render_editor(editor: &CascadingEditor, notice: Option<&str>) -> String {
    let mut html = String::from("<div id=\"location-editor\" class=\"card p-3\">\n");

    if let Some(notice) = notice {
        html.push_str(&format!(
            "<div class=\"alert alert-warning py-1\" role=\"alert\">{}</div>\n",
            escape_html(notice)
        ));
    }

    if editor.state() == EditorState::Empty {
        html.push_str(
            "<button class=\"btn btn-primary\" hx-post=\"/locations/editor/open\" \
             hx-target=\"#location-editor\" hx-swap=\"outerHTML\">New location</button>\n",
        );
        html.push_str("</div>");
        return html;
    }

    let form = editor.form();
    let heading = if editor.editing_id().is_some() {
        "Edit location"
    } else {
        "Add location"
    };
    html.push_str(&format!("<h5>{}</h5>\n", heading));
    html.push_str("<form id=\"editor-form\">\n");

    html.push_str(&format!(
        "<label class=\"form-label\">Primary location</label>\n\
         <input class=\"form-control\" name=\"primary_location\" value=\"{}\" \
         hx-post=\"/locations/editor/select-primary\" hx-trigger=\"change\" \
         hx-include=\"#editor-form\" hx-target=\"#location-editor\" hx-swap=\"outerHTML\">\n",
        escape_html(&form.primary_location)
    ));
    html.push_str(&format!(
        "<label class=\"form-label\">State</label>\n\
         <input class=\"form-control\" name=\"primary_sub_location\" value=\"{}\">\n",
        escape_html(&form.primary_sub_location)
    ));

    for (i, secondary) in form.secondaries.iter().enumerate() {
        html.push_str("<fieldset class=\"border rounded p-2 mt-2\">\n");
        html.push_str(&format!(
            "<input class=\"form-control\" name=\"secondary_location_{i}\" \
             placeholder=\"City\" value=\"{}\">\n",
            escape_html(&secondary.secondary_location)
        ));
        html.push_str(&format!(
            "<input class=\"form-control\" name=\"secondary_sub_location_{i}\" \
             placeholder=\"Area\" value=\"{}\">\n",
            escape_html(&secondary.sub_location)
        ));

        for (j, third) in secondary.thirds.iter().enumerate() {
            html.push_str(&format!(
                "<div class=\"d-flex gap-1 mt-1\">\
                 <input class=\"form-control\" name=\"third_location_{i}_{j}\" \
                 placeholder=\"Building\" value=\"{}\">\
                 <input class=\"form-control\" name=\"third_sub_location_{i}_{j}\" \
                 placeholder=\"Floor\" value=\"{}\">\
                 <button type=\"button\" class=\"btn btn-outline-danger btn-sm\" \
                 hx-post=\"/locations/editor/remove-third\" \
                 hx-vals='{{\"secondary\": \"{i}\", \"third\": \"{j}\"}}' \
                 hx-include=\"#editor-form\" hx-target=\"#location-editor\" \
                 hx-swap=\"outerHTML\">&times;</button></div>\n",
                escape_html(&third.third_location),
                escape_html(&third.sub_location)
            ));
        }

        html.push_str(&format!(
            "<div class=\"mt-1\">\
             <button type=\"button\" class=\"btn btn-outline-secondary btn-sm\" \
             hx-post=\"/locations/editor/add-third\" hx-vals='{{\"secondary\": \"{i}\"}}' \
             hx-include=\"#editor-form\" hx-target=\"#location-editor\" \
             hx-swap=\"outerHTML\">Add building</button> \
             <button type=\"button\" class=\"btn btn-outline-danger btn-sm\" \
             hx-post=\"/locations/editor/remove-secondary\" hx-vals='{{\"index\": \"{i}\"}}' \
             hx-include=\"#editor-form\" hx-target=\"#location-editor\" \
             hx-swap=\"outerHTML\">Remove city</button></div>\n",
        ));
        html.push_str("</fieldset>\n");
    }

    html.push_str(
        "<div class=\"mt-2\">\
         <button type=\"button\" class=\"btn btn-outline-secondary btn-sm\" \
         hx-post=\"/locations/editor/add-secondary\" hx-include=\"#editor-form\" \
         hx-target=\"#location-editor\" hx-swap=\"outerHTML\">Add city</button></div>\n",
    );

    html.push_str(
        "<div class=\"mt-3\">\
         <button type=\"button\" class=\"btn btn-primary\" \
         hx-post=\"/locations/editor/submit\" hx-include=\"#editor-form\" \
         hx-target=\"#location-editor\" hx-swap=\"outerHTML\">Save</button> \
         <button type=\"button\" class=\"btn btn-link\" \
         hx-post=\"/locations/editor/cancel\" hx-target=\"#location-editor\" \
         hx-swap=\"outerHTML\">Cancel</button></div>\n",
    );

    html.push_str("</form>\n</div>");
    html
}
