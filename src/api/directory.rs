//! Account and project lookup, and the event-collection path.

use super::pagination::PageCursor;
use super::PageSource;
use crate::constants::EVENTS_PAGE_SIZE;
use crate::error::AppError;
use crate::types::TimeWindow;
use serde::Deserialize;
use serde_json::Value;

/// An organization as listed by `/accounts`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub name: String,
}

/// A project as listed by `/accounts/{id}/projects`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
}

/// Resolves `account_name/project_name` to a project id.
///
/// Pages are walked lazily and the walk stops at the first match, so large
/// organizations are not listed in full.
pub async fn find_project<S: PageSource + ?Sized>(
    source: &S,
    account_name: &str,
    project_name: &str,
) -> Result<String, AppError> {
    let mut accounts = PageCursor::new(source, "/accounts");
    while let Some(page) = accounts.next_page().await? {
        for account in decode::<Account>(page)? {
            if account.name != account_name {
                continue;
            }
            log::debug!("Account '{}' has id {}", account.name, account.id);

            let mut projects =
                PageCursor::new(source, format!("/accounts/{}/projects", account.id));
            while let Some(page) = projects.next_page().await? {
                if let Some(project) = decode::<Project>(page)?
                    .into_iter()
                    .find(|p| p.name == project_name)
                {
                    log::info!("Resolved {}/{} to project {}", account_name, project_name, project.id);
                    return Ok(project.id);
                }
            }
        }
    }

    Err(AppError::ProjectNotFound {
        account: account_name.to_string(),
        project: project_name.to_string(),
    })
}

fn decode<T: serde::de::DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>, AppError> {
    records
        .into_iter()
        .map(|record| serde_json::from_value(record).map_err(AppError::from))
        .collect()
}

/// Path of the first page of a project's events, with its query.
pub fn events_path(project_id: &str, window: &TimeWindow) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("per_page", &EVENTS_PAGE_SIZE.to_string());
    if let Some(start) = &window.start_time {
        query.append_pair("start_time", start);
    }
    if let Some(end) = &window.end_time {
        query.append_pair("end_time", end);
    }
    format!("/projects/{}/events?{}", project_id, query.finish())
}
