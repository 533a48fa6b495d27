use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use studycard_core::{
    AppError, date,
    models::{Announcement, AnnouncementParams},
};
use studycard_images::{RenderModel, Theme, card};
use time::{OffsetDateTime, UtcOffset};

use crate::AppState;

/// Cards rendered for an explicit date never change.
const CACHE_IMMUTABLE: &str = "public, immutable, no-transform, max-age=31536000";
/// Cards showing the current time go stale quickly.
const CACHE_SHORT: &str = "public, max-age=60";

pub async fn get_announcement(
    State(state): State<AppState>,
    params: AnnouncementParams,
) -> Result<Response, AppError> {
    let announcement =
        params.validate().map_err(|e| AppError::BadRequest(e.to_string().into()))?;
    let (model, fixed_date) =
        resolve(announcement, OffsetDateTime::now_utc(), state.config.render.utc_offset);
    tracing::debug!(theme = %Theme::from_param(announcement.theme), "Rendering announcement card");

    let svg = card::render_svg(&model, state.rasterizer.font_family());
    let rasterizer = state.rasterizer.clone();
    let data = tokio::task::spawn_blocking(move || rasterizer.render_png(&svg)).await??;
    Ok((
        [
            (header::CONTENT_TYPE, mime::IMAGE_PNG.as_ref()),
            (header::CACHE_CONTROL, if fixed_date { CACHE_IMMUTABLE } else { CACHE_SHORT }),
        ],
        data,
    )
        .into_response())
}

/// Computes the display date and palette. The flag reports whether the date came from the request.
fn resolve<'a>(
    announcement: Announcement<'a>,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> (RenderModel<'a>, bool) {
    let (display_date, fixed_date) = date::display_date(announcement.date, now, offset);
    let model = RenderModel {
        title: announcement.title,
        study: announcement.study,
        display_date,
        palette: Theme::from_param(announcement.theme).palette(),
    };
    (model, fixed_date)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use resvg::{tiny_skia::Pixmap, usvg::fontdb};
    use studycard_core::config::Config;
    use studycard_images::{CANVAS_HEIGHT, CANVAS_WIDTH, Rasterizer};
    use time::macros::{datetime, offset};
    use tower::ServiceExt;

    use super::*;
    use crate::handlers::build_router;

    const TITLE_MISSING: &str = "스터디 공지 제목을 입력해주세요.";
    const STUDY_MISSING: &str = "스터디 이름을 입력해주세요.";

    fn router() -> Router {
        let rasterizer = Rasterizer::with_fontdb(fontdb::Database::new(), "sans-serif".to_string());
        let state =
            AppState { config: Arc::new(Config::default()), rasterizer: Arc::new(rasterizer) };
        build_router().with_state(state)
    }

    async fn get(uri: &str) -> Response {
        router().oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap()
    }

    async fn text(response: Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let cases: &[(&str, &str)] = &[
            ("/api/study-announcement", TITLE_MISSING),
            ("/api/study-announcement?theme=rose&date=2024-03-15", TITLE_MISSING),
            ("/api/study-announcement?study=algo", TITLE_MISSING),
            ("/api/study-announcement?title=&study=", TITLE_MISSING),
            ("/api/study-announcement?title=kickoff", STUDY_MISSING),
            ("/api/study-announcement?title=kickoff&study=&theme=ai", STUDY_MISSING),
        ];
        for &(uri, message) in cases {
            let response = get(uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri: {uri}");
            let content_type = response.headers().get(header::CONTENT_TYPE).unwrap();
            assert!(content_type.to_str().unwrap().starts_with("text/plain"));
            assert_eq!(text(response).await, message, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn test_renders_png() {
        let uri = "/api/study-announcement?title=%EC%8A%A4%ED%84%B0%EB%94%94%ED%82%A5%EC%98%A4%ED%94%84\
                   &study=%EC%95%8C%EA%B3%A0%EB%A6%AC%EC%A6%98%EB%B0%98&theme=rose";
        let response = get(uri).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
        assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), CACHE_SHORT);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let pixmap = Pixmap::decode_png(&body).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }

    #[tokio::test]
    async fn test_control_characters_render() {
        let cases = [
            "/api/study-announcement?title=a%01b&study=x",
            "/api/study-announcement?title=a&study=%EF%BF%BF",
            "/api/study-announcement?title=%1F%08&study=%EF%BF%BE%0B",
        ];
        for uri in cases {
            let response = get(uri).await;
            assert_eq!(response.status(), StatusCode::OK, "uri: {uri}");
            assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "image/png");
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let pixmap = Pixmap::decode_png(&body).unwrap();
            assert_eq!((pixmap.width(), pixmap.height()), (CANVAS_WIDTH, CANVAS_HEIGHT));
        }
    }

    #[tokio::test]
    async fn test_explicit_date_is_cacheable() {
        let response =
            get("/api/study-announcement?title=a&study=b&date=2024-03-15T09:30:00").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), CACHE_IMMUTABLE);

        let response = get("/api/study-announcement?title=a&study=b&date=someday").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), CACHE_SHORT);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(get("/api/other").await.status(), StatusCode::NOT_FOUND);
        let response = router()
            .oneshot(
                Request::post("/api/study-announcement?title=a&study=b")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    fn announcement<'a>(date: Option<&'a str>, theme: Option<&'a str>) -> Announcement<'a> {
        Announcement { title: "킥오프", study: "알고리즘반", date, theme }
    }

    #[test]
    fn test_resolve_date() {
        let now = datetime!(2025-06-01 14:07:59 UTC);
        let kst = offset!(+9);
        let now_text = date::format_korean(now.to_offset(kst));
        for theme in [None, Some("rose"), Some("ai"), Some("unknownxyz")] {
            let (model, fixed) = resolve(announcement(Some("2024-03-15T09:30:00"), theme), now, kst);
            assert_eq!(model.display_date, "2024년 3월 15일 오전 09:30");
            assert!(fixed);

            let (model, fixed) = resolve(announcement(Some("garbage"), theme), now, kst);
            assert_eq!(model.display_date, now_text);
            assert!(!fixed);

            let (model, fixed) = resolve(announcement(None, theme), now, kst);
            assert_eq!(model.display_date, "2025년 6월 1일 오후 11:07");
            assert!(!fixed);
        }
    }

    #[test]
    fn test_resolve_theme() {
        let now = OffsetDateTime::now_utc();
        let palette = |theme| resolve(announcement(None, theme), now, UtcOffset::UTC).0.palette;
        assert_eq!(palette(Some("unknownxyz")), Theme::Indigo.palette());
        assert_eq!(palette(None), Theme::Indigo.palette());
        assert_eq!(palette(Some("spring")), Theme::Spring.palette());
    }
}
