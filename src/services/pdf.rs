//! # PDF 업로드/조회 파이프라인
//!
//! 학습 가이드의 PDF는 gzip으로 압축해 `study_guides` 레코드 안에 저장합니다.
//! 별도의 파일 저장소는 없습니다.
//!
//! ## 업로드
//! 1. multipart 본문에서 `pdf` 파일 필드 하나와 `title`, `topicId`, `totalPages`
//!    텍스트 필드를 읽습니다.
//! 2. 파일 필드의 MIME 타입을 바이트를 읽기 전에 확인합니다.
//! 3. 조각(chunk) 단위로 읽으면서 누적 크기가 상한을 넘는 즉시 413으로 중단합니다.
//! 4. 원본의 SHA-256 체크섬을 기록하고 gzip으로 압축합니다.
//!
//! ## 조회
//! 레코드가 가진 저장 방식을 순서대로 확인합니다:
//! 인라인 압축 데이터 → 레거시 파일 경로 → 둘 다 없으면 "데이터 없음".
//! 인라인 데이터는 압축 해제 후 체크섬을 다시 확인합니다.

use std::io::{Read, Write};
use std::path::Path;

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};
use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use thiserror::Error;

use crate::db::study_guides::{self, StoredPayload};
use crate::error::AppError;
use crate::models::{normalize_ref, MigrationReport, NewStudyGuide};

/// 허용되는 유일한 MIME 타입
pub const PDF_MIME: &str = "application/pdf";

/// 파일이 담겨야 하는 multipart 필드 이름
pub const FILE_FIELD: &str = "pdf";

/// 파일이 아닌 필드(제목, 토픽 id, 페이지 수 등)를 모두 합친 최대 크기
pub const FORM_FIELDS_LIMIT: usize = 64 * 1024;

/// 한 요청에 허용하는 multipart 필드 수
const MAX_FIELDS: usize = 16;

/// 업로드/조회 파이프라인 에러
///
/// 사용자에게 보이는 메시지는 종류별로 고정되어 있고,
/// 내부 원인(경로, 압축 라이브러리 에러 등)은 로그에만 남습니다.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("uploaded file is not a PDF")]
    NotPdf,

    #[error("more than one file was attached")]
    TooManyFiles,

    #[error("no PDF file in the request")]
    MissingFile,

    #[error("upload exceeds the size ceiling")]
    TooLarge,

    #[error("malformed multipart body: {0}")]
    Malformed(String),

    #[error("failed to decompress stored PDF: {0}")]
    Decompress(String),

    #[error("legacy PDF file is missing: {0}")]
    LegacyFileMissing(String),

    #[error("failed to read legacy PDF file: {0}")]
    LegacyRead(#[source] std::io::Error),

    #[error("study guide has no stored PDF data")]
    DataUnavailable,

    #[error("upload failed: {0}")]
    Failed(String),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::NotPdf
            | UploadError::TooManyFiles
            | UploadError::MissingFile
            | UploadError::Malformed(_) => StatusCode::BAD_REQUEST,
            UploadError::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::LegacyFileMissing(_) => StatusCode::NOT_FOUND,
            UploadError::Decompress(_)
            | UploadError::LegacyRead(_)
            | UploadError::DataUnavailable
            | UploadError::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            UploadError::NotPdf => "not_pdf",
            UploadError::TooManyFiles => "too_many_files",
            UploadError::MissingFile => "missing_file",
            UploadError::TooLarge => "file_too_large",
            UploadError::Malformed(_) => "bad_request",
            UploadError::Decompress(_) => "decompress_failed",
            UploadError::LegacyFileMissing(_) => "file_not_found",
            UploadError::LegacyRead(_) => "file_read_failed",
            UploadError::DataUnavailable => "data_unavailable",
            UploadError::Failed(_) => "upload_failed",
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            UploadError::NotPdf => "Only PDF files are allowed",
            UploadError::TooManyFiles => "Too many files. Only one file allowed.",
            UploadError::MissingFile => "No PDF file uploaded",
            UploadError::TooLarge => "File too large. Maximum size is 50MB.",
            UploadError::Malformed(_) => "Invalid multipart form data",
            UploadError::Decompress(_) => "Failed to process PDF file",
            UploadError::LegacyFileMissing(_) => "PDF file not found",
            UploadError::LegacyRead(_) => "Failed to read PDF file",
            UploadError::DataUnavailable => "PDF data not available. Please re-upload the file.",
            UploadError::Failed(_) => "Failed to upload study guide",
        }
    }
}

/// multipart 본문에서 읽어낸 업로드 내용
#[derive(Debug, Default)]
pub struct PdfUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub topic_id: Option<String>,
    pub total_pages: Option<String>,
}

impl PdfUpload {
    /// 텍스트 필드를 검증해 저장할 메타데이터와 원본 바이트로 나눕니다.
    pub fn into_parts(self) -> Result<(NewStudyGuide, Vec<u8>), AppError> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::field("title", "must not be empty"))?;

        let total_pages = match self.total_pages.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<i64>() {
                Ok(pages) if pages >= 1 => Some(pages),
                _ => return Err(AppError::field("totalPages", "must be at least 1")),
            },
        };

        let guide = NewStudyGuide {
            topic_id: normalize_ref(self.topic_id),
            title,
            file_name: self.file_name,
            total_pages,
        };
        Ok((guide, self.bytes))
    }
}

/// multipart 본문을 읽습니다.
///
/// 라우트에는 본문 크기 제한이 없으므로 여기서 모든 필드의 바이트를 셉니다.
/// - 파일 필드는 정확히 하나, MIME 검사는 바이트를 읽기 전에 하고, 크기는 `max_bytes` 이하
/// - 나머지 필드는 합쳐서 `FORM_FIELDS_LIMIT` 이하 (모르는 필드도 읽어 버리면서 셈)
pub async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> Result<PdfUpload, UploadError> {
    let mut upload = PdfUpload::default();
    let mut has_file = false;
    let mut form_bytes = 0usize;
    let mut fields = 0usize;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        fields += 1;
        if fields > MAX_FIELDS {
            return Err(UploadError::Malformed("too many form fields".to_string()));
        }
        let name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_some() || name == FILE_FIELD {
            if has_file {
                return Err(UploadError::TooManyFiles);
            }
            if name != FILE_FIELD {
                return Err(UploadError::Malformed(format!("unexpected file field '{name}'")));
            }
            if !is_pdf_mime(field.content_type()) {
                return Err(UploadError::NotPdf);
            }
            has_file = true;
            upload.file_name = field
                .file_name()
                .map(str::to_string)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| "document.pdf".to_string());

            while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                if upload.bytes.len() + chunk.len() > max_bytes {
                    return Err(UploadError::TooLarge);
                }
                upload.bytes.extend_from_slice(&chunk);
            }
            continue;
        }

        let mut value = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            form_bytes += chunk.len();
            if form_bytes > FORM_FIELDS_LIMIT {
                return Err(UploadError::Malformed(format!(
                    "form fields exceed {FORM_FIELDS_LIMIT} bytes"
                )));
            }
            value.extend_from_slice(&chunk);
        }

        let slot = match name.as_str() {
            "title" => &mut upload.title,
            "topicId" => &mut upload.topic_id,
            "totalPages" => &mut upload.total_pages,
            _ => continue,
        };
        let text = String::from_utf8(value)
            .map_err(|_| UploadError::Malformed(format!("field '{name}' is not UTF-8 text")))?;
        *slot = Some(text);
    }

    if !has_file {
        return Err(UploadError::MissingFile);
    }
    Ok(upload)
}

/// 본문 크기 제한에 걸린 multipart 에러는 413으로 보고합니다.
fn multipart_error(err: MultipartError) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge
    } else {
        UploadError::Malformed(err.body_text())
    }
}

/// `application/pdf` (파라미터, 대소문자 무시)
pub fn is_pdf_mime(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME))
}

/// 압축된 PDF 페이로드
#[derive(Debug, Clone)]
pub struct CompressedPdf {
    pub data: Vec<u8>,
    pub original_size: i64,
    pub compressed_size: i64,
    /// 원본 바이트의 SHA-256 (16진수)
    pub checksum: String,
}

impl CompressedPdf {
    /// 압축으로 줄어든 비율(%)
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (self.original_size - self.compressed_size) as f64 / self.original_size as f64 * 100.0
    }
}

pub fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

pub fn compress(bytes: &[u8]) -> Result<CompressedPdf, UploadError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(bytes)
        .map_err(|e| UploadError::Failed(format!("compression failed: {e}")))?;
    let data = encoder
        .finish()
        .map_err(|e| UploadError::Failed(format!("compression failed: {e}")))?;

    Ok(CompressedPdf {
        original_size: bytes.len() as i64,
        compressed_size: data.len() as i64,
        checksum: checksum(bytes),
        data,
    })
}

/// 압축을 풀고, 체크섬이 기록되어 있으면 원본과 같은지 확인합니다.
pub fn decompress(data: &[u8], expected_checksum: Option<&str>) -> Result<Vec<u8>, UploadError> {
    let mut bytes = Vec::new();
    GzDecoder::new(data)
        .read_to_end(&mut bytes)
        .map_err(|e| UploadError::Decompress(e.to_string()))?;

    if let Some(expected) = expected_checksum {
        if checksum(&bytes) != expected {
            return Err(UploadError::Decompress("checksum mismatch".to_string()));
        }
    }
    Ok(bytes)
}

/// CPU를 쓰는 압축은 blocking 스레드에서 실행합니다.
pub async fn compress_blocking(bytes: Vec<u8>) -> Result<CompressedPdf, UploadError> {
    tokio::task::spawn_blocking(move || compress(&bytes))
        .await
        .map_err(|e| UploadError::Failed(e.to_string()))?
}

/// 저장된 페이로드를 원본 PDF 바이트로 되돌립니다.
pub async fn load_pdf(payload: StoredPayload) -> Result<Vec<u8>, UploadError> {
    match payload {
        StoredPayload::Inline { data, checksum } => {
            tokio::task::spawn_blocking(move || decompress(&data, checksum.as_deref()))
                .await
                .map_err(|e| UploadError::Decompress(e.to_string()))?
        }
        StoredPayload::LegacyFile(path) => read_legacy_file(&path).await,
        StoredPayload::Missing => Err(UploadError::DataUnavailable),
    }
}

async fn read_legacy_file(path: &Path) -> Result<Vec<u8>, UploadError> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => UploadError::LegacyFileMissing(path.display().to_string()),
        _ => UploadError::LegacyRead(e),
    })
}

/// `Content-Disposition: inline` 헤더 값
///
/// `filename`에는 따옴표와 제어 문자를 뺀 ASCII 이름을 넣고,
/// ASCII가 아닌 이름은 `filename*`에 UTF-8 퍼센트 인코딩으로 함께 보냅니다.
pub fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();

    if file_name.is_ascii() {
        return format!("inline; filename=\"{ascii}\"");
    }

    let encoded: String = file_name
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'_' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect();
    format!("inline; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}

/// 레거시 레코드(파일 경로만 있는 학습 가이드)를 인라인 저장 방식으로 옮깁니다.
///
/// 레코드별로 독립적으로 처리하고, 실패한 레코드는 보고서의 `errors`에 모읍니다.
pub async fn migrate_legacy(pool: &SqlitePool, user_id: &str) -> Result<MigrationReport, AppError> {
    let legacy = study_guides::list_legacy_files(pool, user_id).await?;

    let mut migrated_count = 0;
    let mut errors = Vec::new();

    for (id, path) in legacy {
        match migrate_one(pool, user_id, &id, &path).await {
            Ok(()) => {
                tracing::info!("Migrated study guide {} from {}", id, path.display());
                migrated_count += 1;
            }
            Err(e) => {
                tracing::warn!("Failed to migrate study guide {}: {}", id, e);
                errors.push(format!("Failed to migrate guide {id}: {e}"));
            }
        }
    }

    Ok(MigrationReport {
        message: format!("Migration completed. {migrated_count} guides migrated."),
        migrated_count,
        errors: (!errors.is_empty()).then_some(errors),
    })
}

async fn migrate_one(pool: &SqlitePool, user_id: &str, id: &str, path: &Path) -> Result<(), AppError> {
    let bytes = read_legacy_file(path).await?;
    let compressed = compress_blocking(bytes).await?;
    study_guides::store_payload(pool, user_id, id, &compressed).await?;
    tokio::fs::remove_file(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn compression_is_lossless(bytes in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let compressed = compress(&bytes).unwrap();
            prop_assert_eq!(compressed.original_size, bytes.len() as i64);
            prop_assert_eq!(compressed.compressed_size, compressed.data.len() as i64);

            let restored = decompress(&compressed.data, Some(&compressed.checksum)).unwrap();
            prop_assert_eq!(restored, bytes);
        }
    }

    #[test]
    fn empty_input_round_trips() {
        let compressed = compress(&[]).unwrap();
        assert_eq!(decompress(&compressed.data, Some(&compressed.checksum)).unwrap(), Vec::<u8>::new());
        assert_eq!(compressed.ratio(), 0.0);
    }

    #[test]
    fn corrupt_payload_is_a_decompress_error() {
        let err = decompress(b"definitely not gzip", None).unwrap_err();
        assert!(matches!(err, UploadError::Decompress(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "Failed to process PDF file");
    }

    #[test]
    fn checksum_mismatch_is_detected() {
        let compressed = compress(b"%PDF-1.7 original").unwrap();
        let other = checksum(b"%PDF-1.7 tampered");
        assert!(matches!(
            decompress(&compressed.data, Some(&other)),
            Err(UploadError::Decompress(_))
        ));
    }

    #[test]
    fn mime_check_ignores_parameters_and_case() {
        assert!(is_pdf_mime(Some("application/pdf")));
        assert!(is_pdf_mime(Some("Application/PDF; name=x.pdf")));
        assert!(!is_pdf_mime(Some("text/plain")));
        assert!(!is_pdf_mime(None));
    }

    #[test]
    fn disposition_escapes_file_names() {
        assert_eq!(content_disposition("cardio.pdf"), "inline; filename=\"cardio.pdf\"");
        assert_eq!(content_disposition("a\"b.pdf"), "inline; filename=\"a_b.pdf\"");
        assert_eq!(
            content_disposition("심장.pdf"),
            "inline; filename=\"__.pdf\"; filename*=UTF-8''%EC%8B%AC%EC%9E%A5.pdf"
        );
    }

    #[test]
    fn upload_form_requires_a_title() {
        let upload = PdfUpload {
            file_name: "x.pdf".into(),
            bytes: b"%PDF".to_vec(),
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(upload.into_parts(), Err(AppError::Validation(_))));

        let upload = PdfUpload {
            file_name: "x.pdf".into(),
            bytes: b"%PDF".to_vec(),
            title: Some("Cardio".into()),
            topic_id: Some("".into()),
            total_pages: Some("12".into()),
        };
        let (guide, bytes) = upload.into_parts().unwrap();
        assert_eq!(guide.topic_id, None);
        assert_eq!(guide.total_pages, Some(12));
        assert_eq!(bytes, b"%PDF");
    }

    #[tokio::test]
    async fn missing_payload_reports_data_unavailable() {
        let err = load_pdf(StoredPayload::Missing).await.unwrap_err();
        assert!(matches!(err, UploadError::DataUnavailable));

        let err = load_pdf(StoredPayload::LegacyFile("/nonexistent/studyhub/x.pdf".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
