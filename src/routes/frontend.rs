//! Single-page frontend served from the static build directory.

use crate::helpers::ApiError;
use actix_files::{Files, NamedFile};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StaticDir(PathBuf);

impl StaticDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn exists(&self) -> bool {
        self.0.is_dir()
    }

    fn file(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

/// Mount `/assets`, `/favicon.ico` and `/vite.svg` when the build directory exists.
pub fn configure(cfg: &mut web::ServiceConfig, dir: &StaticDir) {
    if !dir.exists() {
        tracing::warn!(path = %dir.0.display(), "static directory not found, frontend disabled");
        return;
    }

    cfg.service(
        Files::new("/assets", dir.file("assets")).default_handler(web::to(not_found)),
    )
    .route("/favicon.ico", web::get().to(favicon))
    .route("/vite.svg", web::get().to(vite_svg));
}

async fn serve(req: &HttpRequest, path: &Path) -> Result<HttpResponse, ApiError> {
    NamedFile::open_async(path)
        .await
        .map(|file| file.into_response(req))
        .map_err(|err| {
            tracing::debug!(path = %path.display(), "static file unavailable: {}", err);
            ApiError::not_found("not found")
        })
}

async fn favicon(req: HttpRequest, dir: web::Data<StaticDir>) -> Result<HttpResponse, ApiError> {
    serve(&req, &dir.file("favicon.ico")).await
}

async fn vite_svg(req: HttpRequest, dir: web::Data<StaticDir>) -> Result<HttpResponse, ApiError> {
    serve(&req, &dir.file("vite.svg")).await
}

pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::not_found("not found"))
}

fn is_reserved(path: &str) -> bool {
    path.starts_with("/api") || path.starts_with("/assets")
}

/// Default service: `index.html` for client-side routes, JSON 404 for API and asset misses.
pub async fn spa(req: HttpRequest, dir: web::Data<StaticDir>) -> Result<HttpResponse, ApiError> {
    if is_reserved(req.path()) {
        return Err(ApiError::not_found("not found"));
    }

    let index = dir.file("index.html");
    match NamedFile::open_async(&index).await {
        Ok(file) => Ok(file.into_response(&req)),
        Err(err) => {
            tracing::error!(path = %index.display(), "index.html unavailable: {}", err);
            Err(ApiError::not_found("frontend not found"))
        }
    }
}
