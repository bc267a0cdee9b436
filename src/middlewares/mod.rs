use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::{
        header::{Accept, Header, Quality, QualityItem},
        Method,
    },
    middleware::Next,
    HttpMessage, ResponseError,
};
use futures_util::{future::LocalBoxFuture, FutureExt};
use mime_guess::mime::{self, Mime};

use crate::api::error;

fn covers(range: &Mime, target: &Mime) -> bool {
    let type_matches = range.type_() == mime::STAR || range.type_() == target.type_();
    let subtype_matches = range.subtype() == mime::STAR || range.subtype() == target.subtype();
    type_matches && subtype_matches
}

/// Whether the parsed `Accept` ranges admit `target`. No ranges admits anything.
pub fn accepts(ranges: &[QualityItem<Mime>], target: &Mime) -> bool {
    ranges.is_empty()
        || ranges.iter().any(|range| range.quality > Quality::ZERO && covers(&range.item, target))
}

fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

fn negotiation_error(
    req: &ServiceRequest,
    produces: &Mime,
    consumes: &Mime,
) -> Option<error::Error> {
    let acceptable = Accept::parse(req).map(|accept| accepts(&accept, produces)).unwrap_or(false);
    if !acceptable {
        return Some(error::Error::not_acceptable(format!("Request must accept {produces} data")));
    }

    if carries_body(req.method()) {
        let matches = match req.mime_type() {
            Ok(Some(content_type)) => content_type.essence_str() == consumes.essence_str(),
            _ => false,
        };
        if !matches {
            return Some(error::Error::unsupported_media_type(format!(
                "Request must contain {consumes} data"
            )));
        }
    }

    None
}

/// Answers 406 to requests that will not accept `produces` and, for body
/// carrying methods, 415 to requests whose body is not `consumes`.
pub fn content_negotiation<B>(
    produces: Mime,
    consumes: Mime,
) -> impl Fn(
    ServiceRequest,
    Next<B>,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, actix_web::Error>>
where
    B: MessageBody + 'static,
{
    move |req: ServiceRequest, next: Next<B>| {
        let produces = produces.clone();
        let consumes = consumes.clone();
        async move {
            if let Some(err) = negotiation_error(&req, &produces, &consumes) {
                return Ok(req.into_response(err.error_response()).map_into_right_body());
            }

            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        .boxed_local()
    }
}
