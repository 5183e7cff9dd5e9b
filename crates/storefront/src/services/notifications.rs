//! Session-backed toast queue.

use chrono::Utc;
use smiley_day_core::notify::{Toast, ToastKind, ToastQueue};
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::Result;
use crate::models::session::keys;

/// Lifetime of the toast shown after a successful add to cart.
pub const ADDED_TO_CART_DURATION_MS: u64 = 3000;

async fn load(session: &Session) -> Result<ToastQueue> {
    Ok(session
        .get::<ToastQueue>(keys::TOASTS)
        .await?
        .unwrap_or_default())
}

async fn save(session: &Session, queue: &ToastQueue) -> Result<()> {
    session.insert(keys::TOASTS, queue).await?;
    Ok(())
}

/// Queue a toast for this session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn notify(
    session: &Session,
    kind: ToastKind,
    message: impl Into<String>,
    duration_ms: Option<u64>,
) -> Result<Uuid> {
    let mut queue = load(session).await?;
    let id = queue.notify(kind, message, duration_ms);
    save(session, &queue).await?;
    Ok(id)
}

/// Live toasts, oldest first. Expired ones are dropped from the session.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn active(session: &Session) -> Result<Vec<Toast>> {
    let mut queue = load(session).await?;
    let toasts = queue.active(Utc::now()).to_vec();
    save(session, &queue).await?;
    Ok(toasts)
}

/// Dismiss one toast. Returns whether it existed.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn dismiss(session: &Session, id: Uuid) -> Result<bool> {
    let mut queue = load(session).await?;
    let removed = queue.dismiss(id);
    if removed {
        save(session, &queue).await?;
    }
    Ok(removed)
}
