#[derive(Clone)]
struct AppState {
    inner: Arc<Mutex<OracleApi>>,
}

impl AppState {
    fn new(api: OracleApi) -> Self {
        Self {
            inner: Arc::new(Mutex::new(api)),
        }
    }
}
