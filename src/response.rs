use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::json;

/* ========================= Response envelope ========================= */

/// Success responses always carry the same shape:
/// `{ success, message, data, statusCode }`.
pub fn ok<T: Serialize>(message: &str, data: T) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "data": data,
        "statusCode": 200,
    }))
}

/// Success without a `data` key. Deletes answer with this shape.
pub fn ok_empty(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "statusCode": 200,
    }))
}
