use std::sync::Arc;

pub struct InnerState {
    pub production: bool,
    pub db: academy_db::Pool,
}

pub type AppState = Arc<InnerState>;
