//! HTTP handlers for spreadsheet import and export

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::documents::{ExportTable, ImportSummary};
use crate::services::DocumentService;
use crate::AppState;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn service(state: &AppState) -> DocumentService {
    DocumentService::new(state.db.clone(), state.config.inventory.good_defaults())
}

fn upload_error(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::validation("file", format!("Invalid upload: {}", err))
}

/// Import a workbook uploaded as the multipart part `file`. The first
/// sheet's name selects the target table.
pub async fn import_document(
    State(state): State<AppState>,
    current_user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(upload_error)? {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(str::to_string).unwrap_or_default();
            let bytes = field.bytes().await.map_err(upload_error)?;
            upload = Some((file_name, bytes));
        }
    }

    let (file_name, contents) =
        upload.ok_or_else(|| AppError::validation("file", "No file uploaded"))?;

    tracing::debug!(
        user_id = %current_user.0.user_id,
        %file_name,
        bytes = contents.len(),
        "import_document"
    );

    let summary = service(&state).import(&contents).await?;
    Ok(Json(summary))
}

/// Download a table as an xlsx attachment
pub async fn export_document(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(table): Path<String>,
) -> AppResult<impl IntoResponse> {
    let table: ExportTable = table.parse()?;
    let export = service(&state).export(table).await?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    ))
}
