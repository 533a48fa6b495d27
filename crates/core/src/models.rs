use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Raw query parameters of an announcement card request.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct AnnouncementParams {
    pub title: Option<String>,
    pub study: Option<String>,
    pub date: Option<String>,
    pub theme: Option<String>,
}

/// Parameters that passed validation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Announcement<'a> {
    pub title: &'a str,
    pub study: &'a str,
    pub date: Option<&'a str>,
    pub theme: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("스터디 공지 제목을 입력해주세요.")]
    MissingTitle,
    #[error("스터디 이름을 입력해주세요.")]
    MissingStudy,
}

impl AnnouncementParams {
    /// Decodes a URL query string. The first occurrence of a repeated key wins.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "title" => &mut params.title,
                "study" => &mut params.study,
                "date" => &mut params.date,
                "theme" => &mut params.theme,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Checks required fields. The title is checked before the study name.
    pub fn validate(&self) -> Result<Announcement<'_>, ValidationError> {
        let title = present(&self.title).ok_or(ValidationError::MissingTitle)?;
        let study = present(&self.study).ok_or(ValidationError::MissingStudy)?;
        Ok(Announcement {
            title,
            study,
            date: self.date.as_deref(),
            theme: self.theme.as_deref(),
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl<S> FromRequestParts<S> for AnnouncementParams
where S: Send + Sync
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query()))
    }
}
