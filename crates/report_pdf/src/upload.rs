//! Storage-sink contract and the Google Drive upload client.
//!
//! The renderer core only needs "accepts bytes plus filename plus MIME type,
//! returns an identifier or an error"; that contract is the [`StorageSink`]
//! trait. [`DriveClient`] implements it against the Drive v3 multipart upload
//! endpoint with a bearer token. Callers must always expose the rendered
//! document before attempting an upload, so a failed upload never withholds
//! the report from the user.

use log::info;
use serde::Deserialize;
use thiserror::Error;

/// MIME type attached to every rendered report.
pub const PDF_MIME: &str = "application/pdf";

const DRIVE_UPLOAD_URL: &str =
    "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields=id,webViewLink";
const MULTIPART_BOUNDARY: &str = "report_pdf_upload_boundary";

/// Everything a sink needs to store one rendered document.
#[derive(Clone, Copy, Debug)]
pub struct UploadRequest<'a> {
    /// Identifier of the destination folder.
    pub folder_id: &'a str,
    /// Desired file name, including extension.
    pub file_name: &'a str,
    /// MIME type of the content, normally [`PDF_MIME`].
    pub mime_type: &'a str,
    /// The complete document bytes.
    pub bytes: &'a [u8],
}

/// Identification of a stored file as reported by the sink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedFile {
    /// Opaque identifier assigned by the storage service.
    pub id: String,
    /// Browser link to the stored file, when the service provides one.
    pub view_link: Option<String>,
}

/// Upload failure, with an actionable hint for the operator.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The request never produced a usable response.
    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The storage service answered with a non-success status.
    #[error("storage service rejected the upload (status {status}): {body}")]
    Rejected {
        /// HTTP status code of the rejection.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },
}

impl UploadError {
    /// Remediation guidance suitable for showing next to the error message.
    pub fn remediation(&self) -> &'static str {
        match self {
            UploadError::Http(_) => "check network connectivity and the storage endpoint",
            UploadError::Rejected { status: 401, .. } => {
                "supply a fresh access token for the storage service"
            }
            UploadError::Rejected { status: 403, .. } => {
                "enable the Drive API for the project and share the destination \
                 folder with the uploading account"
            }
            UploadError::Rejected { status: 404, .. } => {
                "verify the destination folder id and that the folder is shared \
                 with the uploading account"
            }
            UploadError::Rejected { .. } => {
                "inspect the storage service response body for details"
            }
        }
    }
}

/// A destination that can store one rendered document.
pub trait StorageSink {
    /// Stores the document and returns its identifier.
    fn upload(&self, request: &UploadRequest<'_>) -> Result<UploadedFile, UploadError>;
}

/// Google Drive v3 implementation of [`StorageSink`].
///
/// Uses a short-lived OAuth bearer token supplied by the caller; token
/// acquisition is an application concern, not part of this crate.
pub struct DriveClient {
    http: reqwest::blocking::Client,
    access_token: String,
}

impl DriveClient {
    /// Creates a client that authenticates with the given bearer token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::new(),
            access_token: access_token.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DriveFileResponse {
    id: String,
    #[serde(rename = "webViewLink")]
    web_view_link: Option<String>,
}

impl StorageSink for DriveClient {
    fn upload(&self, request: &UploadRequest<'_>) -> Result<UploadedFile, UploadError> {
        let response = self
            .http
            .post(DRIVE_UPLOAD_URL)
            .bearer_auth(&self.access_token)
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(multipart_related_body(request))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let file: DriveFileResponse = response.json()?;
        info!("uploaded {} as file id {}", request.file_name, file.id);
        Ok(UploadedFile {
            id: file.id,
            view_link: file.web_view_link,
        })
    }
}

/// Builds the `multipart/related` body expected by the Drive upload endpoint:
/// a JSON metadata part naming the file and its parent folder, followed by the
/// raw document bytes.
fn multipart_related_body(request: &UploadRequest<'_>) -> Vec<u8> {
    let metadata = serde_json::json!({
        "name": request.file_name,
        "parents": [request.folder_id],
    });

    let mut body = Vec::with_capacity(request.bytes.len() + 512);
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Type: application/json; charset=UTF-8\r\n\r\n\
             {metadata}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\nContent-Type: {}\r\n\r\n",
            request.mime_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(request.bytes);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}
