use actix_web::{http::StatusCode, HttpResponse};
use std::borrow::Cow;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct MessageBody {
    pub message: Cow<'static, str>,
}

/// JSON response with an explicit status. The payload is written as the
/// top-level body, without an envelope.
pub struct Success<T: serde::Serialize> {
    pub status: StatusCode,
    pub body: T,
}

impl<T: serde::Serialize> Success<T> {
    pub fn ok(data: T) -> Self {
        Self { status: StatusCode::OK, body: data }
    }

    pub fn created(data: T) -> Self {
        Self { status: StatusCode::CREATED, body: data }
    }
}

impl Success<MessageBody> {
    pub fn message<M>(msg: M) -> Self
    where
        M: Into<Cow<'static, str>>,
    {
        Self::ok(MessageBody { message: msg.into() })
    }
}

impl<T: serde::Serialize> actix_web::Responder for Success<T> {
    type Body = actix_web::body::BoxBody;

    fn respond_to(self, _req: &actix_web::HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::build(self.status).json(self.body)
    }
}
