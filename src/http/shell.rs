//! History-mode application shell.
//!
//! Every GET that is not an API call is resolved against the page router
//! and answered with a small HTML document naming the selected view, the
//! matched route chain and the props forwarded to the view.

use askama::Template;
use axum::{
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::RouteMatch;

/// Fallback handler rendering the shell for the resolved route.
pub async fn page(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let route = state.router.resolve(target);

    let status = if route.is_not_found() {
        tracing::warn!(path = %uri.path(), "No page route matched");
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    };

    metrics::record_page_view(route.name, status.as_u16());

    match render(&state.app_title, &route) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(route = route.name, error = %e, "Failed to render shell");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Template)]
#[template(path = "shell.html")]
struct ShellTemplate<'a> {
    title: &'a str,
    name: &'a str,
    view: &'static str,
    matched: String,
    props: String,
}

/// Render the shell document for a resolved route.
pub fn render(title: &str, route: &RouteMatch) -> Result<String, askama::Error> {
    let props = serde_json::to_string(&route.props).unwrap_or_else(|_| "{}".to_string());

    ShellTemplate {
        title,
        name: route.name,
        view: route.view.as_str(),
        matched: route.matched.join(" "),
        props,
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::PageRouter;

    #[test]
    fn test_render_edit_spend() {
        let router = PageRouter::app("/").unwrap();
        let html = render("Spend Tracker", &router.resolve("/spend/42")).unwrap();
        assert!(html.contains("data-route=\"EditSpend\""));
        assert!(html.contains("data-view=\"EditSpendPage\""));
        assert!(html.contains("data-matched=\"Main EditSpend\""));
        assert!(html.contains("data-props=\"{&quot;id&quot;:&quot;42&quot;}\""));
    }

    #[test]
    fn test_render_escapes_params() {
        let router = PageRouter::app("/").unwrap();
        let html = render("<Spend>", &router.resolve("/spend/%3Cb%3E")).unwrap();
        assert!(html.contains("<title>&lt;Spend&gt;</title>"));
        assert!(!html.contains("<b>"));
    }
}
