fn apply_cors_headers(headers: &mut axum::http::HeaderMap) {
    headers.insert(
        HeaderName::from_static("access-control-allow-origin"),
        HeaderValue::from_static("*"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-methods"),
        HeaderValue::from_static("GET,POST,PUT,OPTIONS"),
    );
    headers.insert(
        HeaderName::from_static("access-control-allow-headers"),
        HeaderValue::from_static("*"),
    );
}

fn require_text(field: &str, value: &str) -> Result<(), HttpApiError> {
    if value.trim().is_empty() {
        return Err(HttpApiError::invalid_query(
            format!("{field} must not be empty"),
            Some(format!("field={field}")),
        ));
    }
    Ok(())
}

fn validate_location(location: &Location) -> Result<(), HttpApiError> {
    let lat_ok = location.lat.is_finite() && (-90.0..=90.0).contains(&location.lat);
    let lng_ok = location.lng.is_finite() && (-180.0..=180.0).contains(&location.lng);
    if !(lat_ok && lng_ok) {
        return Err(HttpApiError::invalid_query(
            "location out of range",
            Some(format!("lat={} lng={}", location.lat, location.lng)),
        ));
    }
    Ok(())
}
