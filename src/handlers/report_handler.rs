use std::str::FromStr;

use actix_web::{
    get,
    http::header::{ContentDisposition, ContentType, DispositionParam, DispositionType},
    post, web, HttpResponse,
};
use validator::Validate;

use crate::{
    app_state::AppState,
    constants::BANNER,
    errors::{AppError, ErrorResponse},
    models::{
        domain::ReportType,
        dto::{
            request::{DownloadReportQuery, GenerateReportRequest},
            response::GenerateReportResponse,
        },
    },
};

pub const GENERATION_FAILED_MESSAGE: &str = "An error occurred while generating the reports";

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(BANNER)
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[post("/generator/generate-reports")]
pub async fn generate_reports(
    state: web::Data<AppState>,
    request: web::Json<GenerateReportRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    match state.report_service.generate_reports(&request.url).await {
        Ok(paths) => {
            for report_type in ReportType::ALL {
                log::info!(
                    "{} for {} ready at {}",
                    report_type.title(),
                    request.url,
                    paths.get(report_type).display()
                );
            }
            Ok(HttpResponse::Ok().json(GenerateReportResponse::download_links()))
        }
        Err(e) => {
            log::error!("Report generation for {} failed: {}", request.url, e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse {
                error: GENERATION_FAILED_MESSAGE.to_string(),
                code: 500,
            }))
        }
    }
}

#[get("/generator/download-report")]
pub async fn download_report(
    state: web::Data<AppState>,
    query: web::Query<DownloadReportQuery>,
) -> Result<HttpResponse, AppError> {
    let report_type = ReportType::from_str(&query.report_type)?;
    let bytes = state.report_service.read_report(report_type).await?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(report_type.pdf_file_name())],
        })
        .body(bytes))
}
