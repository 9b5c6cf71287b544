//! Reports: role distribution, the activity log, and file exports.

use std::fmt;

use userdesk_protocol::{Codec, LogEntry, Page, RoleDistribution, endpoints};
use userdesk_transport::{ApiRequest, Backend};

use crate::{PageRequest, Userdesk, UserdeskError};

pub const REPORT_FAILED: &str = "Error al cargar el reporte";

/// What to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportTarget {
    Users,
    ActivityLogs,
}

impl ExportTarget {
    fn collection(self) -> &'static str {
        match self {
            Self::Users => endpoints::USERS,
            Self::ActivityLogs => endpoints::ACTIVITY_LOGS,
        }
    }

    fn file_stem(self) -> &'static str {
        match self {
            Self::Users => "Lista_Usuarios",
            Self::ActivityLogs => "Lista_Logs",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    /// The backend's name for the format, as it appears in the path.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "excel",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
        }
    }

    fn default_content_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A downloaded export, ready to be written to disk.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ExportFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportFile")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl<B: Backend, C: Codec> Userdesk<B, C> {
    /// The first page of the activity log at the configured page size.
    pub fn first_logs_page(&self) -> PageRequest {
        PageRequest::first(self.config.logs_page_size)
    }

    /// Accounts per role. Every role is present, with 0 if the backend
    /// left it out.
    pub async fn role_distribution(&self) -> Result<RoleDistribution, UserdeskError> {
        Ok(self
            .api
            .send_json(ApiRequest::get(endpoints::ROLE_DISTRIBUTION))
            .await?)
    }

    pub async fn activity_logs(&self, page: PageRequest) -> Result<Page<LogEntry>, UserdeskError> {
        Ok(self
            .api
            .send_json(page.apply(ApiRequest::get(endpoints::ACTIVITY_LOGS)))
            .await?)
    }

    /// Downloads an export.
    ///
    /// A `t=<unix millis>` parameter keeps caches from serving an old file.
    /// The filename comes from `Content-Disposition`, or defaults to
    /// `Lista_Usuarios.pdf`, `Lista_Logs.xlsx` and so on.
    pub async fn export(&self, target: ExportTarget, format: ExportFormat) -> Result<ExportFile, UserdeskError> {
        let request = ApiRequest::get(endpoints::export(target.collection(), format.as_str()))
            .query("t", chrono::Utc::now().timestamp_millis());
        let response = self.api.send(request).await?;

        let filename = response
            .attachment_filename()
            .unwrap_or_else(|| format!("{}.{}", target.file_stem(), format.extension()));
        let content_type = response
            .content_type
            .unwrap_or_else(|| format.default_content_type().to_string());
        tracing::info!(%filename, bytes = response.body.len(), "export downloaded");

        Ok(ExportFile {
            filename,
            content_type,
            bytes: response.body,
        })
    }
}
