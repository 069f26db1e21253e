#[derive(Debug, Deserialize)]
struct LogsQuery {
    module: Option<String>,
}

#[derive(Debug, Serialize)]
struct LogsResponse {
    schema_version: String,
    module: Option<String>,
    entries: Vec<LogEntry>,
}

#[derive(Debug, Serialize)]
struct LocationResponse {
    schema_version: String,
    location: Option<Location>,
}

async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<LogsResponse>, HttpApiError> {
    let module = query
        .module
        .map(|module| module.trim().to_ascii_uppercase())
        .filter(|module| !module.is_empty());

    let entries = {
        let api = state.inner.lock().await;
        api.logs(module.as_deref())
    }
    .map_err(HttpApiError::from_persistence)?;

    Ok(Json(LogsResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        module,
        entries,
    }))
}

async fn get_location(
    State(state): State<AppState>,
) -> Result<Json<LocationResponse>, HttpApiError> {
    let location = {
        let api = state.inner.lock().await;
        api.user_location()
    }
    .map_err(HttpApiError::from_persistence)?;

    Ok(Json(LocationResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        location,
    }))
}

async fn put_location(
    State(state): State<AppState>,
    Json(location): Json<Location>,
) -> Result<Json<LocationResponse>, HttpApiError> {
    validate_location(&location)?;

    state
        .inner
        .lock()
        .await
        .set_user_location(location)
        .map_err(HttpApiError::from_persistence)?;

    Ok(Json(LocationResponse {
        schema_version: SCHEMA_VERSION_V1.to_string(),
        location: Some(location),
    }))
}

async fn get_status(State(state): State<AppState>) -> Json<ServiceStatus> {
    let api = state.inner.lock().await;
    Json(api.status())
}
