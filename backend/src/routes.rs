use std::path::Path;

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, delete, get, post, put, web};
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    AppState,
    browser::{outline::render_outline, parse_document},
    error::AppError,
    models::session::{OpenResponse, TableRequestResponse, ThemeRequest, UploadResponse},
};

const UPLOAD_FIELD: &str = "file";

pub fn register(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("invalid path: {err}")).into()
    }))
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("invalid body: {err}")).into()
    }))
    .service(health)
    .service(
        web::scope("/api")
            .service(create_session)
            .service(get_session)
            .service(delete_session)
            .service(open_node)
            .service(go_back)
            .service(jump_to_breadcrumb)
            .service(go_to_root)
            .service(upload_tree)
            .service(create_table)
            .service(get_map_view)
            .service(get_outline)
            .service(set_theme),
    );
}

#[get("/healthz")]
async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "datahub-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.active_count().await
    }))
}

#[post("/sessions")]
async fn create_session(state: web::Data<AppState>) -> HttpResponse {
    let view = state.sessions.create().await;
    info!(session_id = %view.session_id, "opened browser session");
    HttpResponse::Created().json(view)
}

#[get("/sessions/{session_id}")]
async fn get_session(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = state
        .sessions
        .read(path.into_inner(), |session| Ok(session.view()))
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/sessions/{session_id}")]
async fn delete_session(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    state.sessions.remove(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/sessions/{session_id}/open/{node_id}")]
async fn open_node(
    path: web::Path<(Uuid, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (session_id, node_id) = path.into_inner();
    let response = state
        .sessions
        .update(session_id, |session| {
            let opened = session.navigator.open(&node_id)?;
            Ok(OpenResponse {
                opened,
                view: session.view(),
            })
        })
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/sessions/{session_id}/back")]
async fn go_back(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = state
        .sessions
        .update(path.into_inner(), |session| {
            session.navigator.back();
            Ok(session.view())
        })
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/sessions/{session_id}/breadcrumb/{index}")]
async fn jump_to_breadcrumb(
    path: web::Path<(Uuid, usize)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (session_id, index) = path.into_inner();
    let view = state
        .sessions
        .update(session_id, |session| {
            session.navigator.jump(index)?;
            Ok(session.view())
        })
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/sessions/{session_id}/root")]
async fn go_to_root(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let view = state
        .sessions
        .update(path.into_inner(), |session| {
            session.navigator.reset();
            Ok(session.view())
        })
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/sessions/{session_id}/upload")]
async fn upload_tree(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let mut upload: Option<UploadedFile> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|err| AppError::BadRequest(format!("multipart error: {err}")))?
    {
        let content_disposition = field.content_disposition().clone();
        let field_name = content_disposition.get_name().unwrap_or("").to_string();

        if field_name == UPLOAD_FIELD && upload.is_none() {
            let file_name = content_disposition
                .get_filename()
                .map(|name| name.to_string())
                .unwrap_or_else(|| "upload.json".into());
            let content_type = field.content_type().map(|mime| mime.essence_str().to_string());
            let bytes = collect_binary_field(&mut field, state.max_upload_bytes).await?;
            upload = Some(UploadedFile {
                file_name,
                content_type,
                bytes,
            });
        } else {
            // Drain fields we don't use
            collect_binary_field(&mut field, state.max_upload_bytes).await?;
        }
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("no file provided".into()))?;

    if !is_json_upload(&upload.file_name, upload.content_type.as_deref()) {
        let received = upload
            .content_type
            .clone()
            .unwrap_or_else(|| upload.file_name.clone());
        warn!(%session_id, file_name = %upload.file_name, %received, "rejected non-JSON upload");
        return Err(AppError::UnsupportedFileType(received));
    }

    let document = parse_document(&upload.bytes).inspect_err(|err| {
        warn!(%session_id, file_name = %upload.file_name, error = %err, "failed to parse uploaded tree");
    })?;

    let root_count = document.roots.len();
    let node_count = document.node_count();
    let has_map_view = document.map_view.is_some();

    let view = state
        .sessions
        .update(session_id, |session| {
            session.replace_document(document);
            Ok(session.view())
        })
        .await?;

    info!(
        %session_id,
        file_name = %upload.file_name,
        root_count,
        node_count,
        "replaced session tree from upload"
    );

    Ok(HttpResponse::Ok().json(UploadResponse {
        file_name: upload.file_name,
        root_count,
        node_count,
        has_map_view,
        view,
    }))
}

#[post("/sessions/{session_id}/tables/{node_id}")]
async fn create_table(
    path: web::Path<(Uuid, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (session_id, node_id) = path.into_inner();
    let table_path = state
        .sessions
        .read(session_id, |session| session.navigator.table_path(&node_id))
        .await?;

    // Table creation is not wired to a backend yet; the request is only logged.
    info!(%session_id, path = %table_path, "creating table from path");

    Ok(HttpResponse::Accepted().json(TableRequestResponse {
        message: format!("Table creation initiated from path: {table_path}"),
        path: table_path,
    }))
}

#[get("/sessions/{session_id}/map")]
async fn get_map_view(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = path.into_inner();
    let map_view = state
        .sessions
        .read(session_id, |session| {
            session
                .map_view
                .clone()
                .ok_or_else(|| AppError::NotFound(format!("map view for session {session_id}")))
        })
        .await?;
    Ok(HttpResponse::Ok().json(map_view))
}

#[get("/sessions/{session_id}/outline")]
async fn get_outline(
    path: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let outline = state
        .sessions
        .read(path.into_inner(), |session| {
            Ok(render_outline(session.navigator.roots()))
        })
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(outline))
}

#[put("/sessions/{session_id}/theme")]
async fn set_theme(
    path: web::Path<Uuid>,
    body: web::Json<ThemeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let theme = body.into_inner().theme;
    let view = state
        .sessions
        .update(path.into_inner(), |session| {
            session.theme = theme;
            Ok(session.view())
        })
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

struct UploadedFile {
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

async fn collect_binary_field(field: &mut Field, limit: usize) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|err| AppError::BadRequest(format!("failed to read field: {err}")))?
    {
        if data.len() + chunk.len() > limit {
            return Err(AppError::BadRequest(format!(
                "upload exceeds the {limit} byte limit"
            )));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

fn is_json_upload(file_name: &str, content_type: Option<&str>) -> bool {
    if let Some(ct) = content_type
        && ct.eq_ignore_ascii_case("application/json")
    {
        return true;
    }
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
