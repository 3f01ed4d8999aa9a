use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::audit::{Activity, ActivityRecorder};

/// Appends the [`Activity`] a handler attached to its response, once the
/// response is known to be a success.
///
/// Audit writes are best-effort: a failed append is logged and the original
/// response goes out unchanged.
pub async fn record_activity(
    State(recorder): State<ActivityRecorder>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    let Some(activity) = response.extensions_mut().remove::<Activity>() else {
        return response;
    };

    if !response.status().is_success() {
        return response;
    }

    if let Err(e) = recorder
        .append(&activity.subject, &activity.action, &activity.actor_role)
        .await
    {
        tracing::error!(
            subject = %activity.subject,
            action = %activity.action,
            "Failed to record activity: {e}"
        );
    }

    response
}
