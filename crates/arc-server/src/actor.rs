//! `X-Actor` header extraction (§4.3.2): defaults to `anonymous` when
//! absent or blank. Actor identity is advisory only -- there is no
//! authentication layer (§9) -- so extraction never fails.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

const ACTOR_HEADER: &str = "x-actor";
const ANONYMOUS: &str = "anonymous";

pub struct ActorHeader(pub String);

impl<S> FromRequestParts<S> for ActorHeader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string();
        Ok(ActorHeader(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn missing_header_defaults_to_anonymous() {
        let req = Request::builder().body(()).unwrap();
        let (mut parts, _) = req.into_parts();
        let ActorHeader(actor) = ActorHeader::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(actor, "anonymous");
    }

    #[tokio::test]
    async fn blank_header_defaults_to_anonymous() {
        let req = Request::builder().header("X-Actor", "   ").body(()).unwrap();
        let (mut parts, _) = req.into_parts();
        let ActorHeader(actor) = ActorHeader::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(actor, "anonymous");
    }

    #[tokio::test]
    async fn present_header_is_used() {
        let req = Request::builder().header("X-Actor", "alice").body(()).unwrap();
        let (mut parts, _) = req.into_parts();
        let ActorHeader(actor) = ActorHeader::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(actor, "alice");
    }
}
