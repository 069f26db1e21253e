async fn calculate_lost_item(
    State(state): State<AppState>,
    Json(query): Json<LostItemQuery>,
) -> Result<Json<LostItemResult>, HttpApiError> {
    require_text("item_name", &query.item_name)?;
    require_text("date_lost", &query.date_lost)?;

    let result = {
        let mut api = state.inner.lock().await;
        api.lost_item(&query)
    };

    Ok(Json(result))
}

async fn calculate_numerology(
    State(state): State<AppState>,
    Json(query): Json<NumerologyQuery>,
) -> Result<Json<NumerologyReport>, HttpApiError> {
    require_text("name", &query.name)?;
    require_text("birth_date", &query.birth_date)?;

    let pending = state.inner.lock().await.start_numerology(&query);
    let report = pending.read().await;
    state.inner.lock().await.record_numerology(&query, &report);

    Ok(Json(report))
}

async fn cast_charms(
    State(state): State<AppState>,
    Json(request): Json<CastRequest>,
) -> Result<Json<CastReport>, HttpApiError> {
    let pending = state
        .inner
        .lock()
        .await
        .start_cast(&request)
        .map_err(HttpApiError::from_oracle)?;
    let report = pending.read().await;
    state.inner.lock().await.record_cast(&report);

    Ok(Json(report))
}
