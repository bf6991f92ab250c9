use crate::application::loan::ServiceDependencies;
use crate::protocol;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use super::wsdl;

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// POST /ws, /loan - 操作エンベロープを1件処理する
///
/// 応答は常にエンベロープであり、Faultの場合のみサーバエラー系の
/// ステータスで返す。プロトコル層が全域関数であるため、この
/// ハンドラからエラーが漏れることはない。
pub async fn loan_endpoint(State(state): State<Arc<AppState>>, body: String) -> Response {
    let wire = protocol::handle_request(&state.service_deps, &body).await;

    let status = if wire.is_fault {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };

    (
        status,
        [(header::CONTENT_TYPE, "text/xml; charset=utf-8")],
        wire.body,
    )
        .into_response()
}

/// GET /ws, /loan - サービス定義（静的文書）を返す
pub async fn service_definition() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/xml")],
        wsdl::SERVICE_DEFINITION,
    )
}
