//! CORS policy - any origin may call the API, without credentials.

use actix_cors::Cors;

pub fn permissive_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}
