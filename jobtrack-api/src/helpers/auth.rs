use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use std::sync::Arc;

use crate::database::{users, Database};
use crate::error::ApiError;

/// The caller a request acts on behalf of, resolved from its bearer token.
/// Every job query is scoped to `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner {
    pub id: i64,
    pub is_test_user: bool,
}

impl Owner {
    /// Demo accounts are read-only
    pub fn ensure_writable(&self) -> Result<(), ApiError> {
        if self.is_test_user {
            return Err(ApiError::ReadOnly);
        }
        Ok(())
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

impl FromRequest for Owner {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let db = req.app_data::<web::Data<Arc<Database>>>().cloned();

        Box::pin(async move {
            let token = token.ok_or(ApiError::Unauthenticated)?;
            let db = db.ok_or_else(|| anyhow::anyhow!("Database missing from app data"))?;

            let user = users::find_user_by_token(db.async_connection.clone(), &token)
                .await?
                .ok_or(ApiError::Unauthenticated)?;

            Ok(Owner {
                id: user.id,
                is_test_user: user.is_test_user,
            })
        })
    }
}
