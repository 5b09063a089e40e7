use serde::Deserialize;

use crate::domain::doc_status::DocStatus;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw query string of a newsletter listing, before sanitization.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterQueryParams {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    CreatedAt,
    UpdatedAt,
    SentAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for Sort {
    fn default() -> Self {
        Sort {
            field: SortField::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl Sort {
    /// Parses `<field>` or `<field>:<asc|desc>`.
    pub fn parse(sort: &str) -> Result<Sort, String> {
        let (field, direction) = sort.split_once(':').unwrap_or((sort, "asc"));

        let field = match field {
            "id" => SortField::Id,
            "title" => SortField::Title,
            "createdAt" => SortField::CreatedAt,
            "updatedAt" => SortField::UpdatedAt,
            "sentAt" => SortField::SentAt,
            _ => return Err(format!("Invalid sort field: {}", field)),
        };
        let direction = match direction.to_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(format!("Invalid sort direction: {}", direction)),
        };

        Ok(Sort { field, direction })
    }
}

/// Sanitized listing query handed to the newsletter store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsletterQuery {
    pub status: Option<DocStatus>,
    pub page: u32,
    pub page_size: u32,
    pub sort: Sort,
}

impl Default for NewsletterQuery {
    fn default() -> Self {
        NewsletterQuery {
            status: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

impl NewsletterQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

impl TryFrom<NewsletterQueryParams> for NewsletterQuery {
    type Error = String;

    fn try_from(params: NewsletterQueryParams) -> Result<Self, Self::Error> {
        let status = params.status.map(DocStatus::parse).transpose()?;
        let sort = params.sort.as_deref().map(Sort::parse).transpose()?;

        Ok(NewsletterQuery {
            status,
            page: params.page.unwrap_or(1).max(1),
            page_size: params
                .page_size
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
            sort: sort.unwrap_or_default(),
        })
    }
}

/// One page of a listing plus the total number of matching documents.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}
